//! The splitter: one CSV in, one named CSV document per group out.

use crate::config::{ConfigValidationError, SplitConfig};
use crate::error::{Result, SplitError};
use crate::grouping::{partition_with_stats, resolve_grouping_column};
use crate::input::validate_source;
use crate::output::{build_archive, generate_files};
use crate::parser;
use crate::pipeline::progress::{
    CancellationToken, ClosureProgressReporter, ProgressReporter, ProgressUpdate, SplitStage,
};
use crate::types::{GeneratedFile, SourceFile, SplitOutcome, SplitSummary};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Runs the split stages over a source file.
///
/// The splitter holds no state between runs; every call to
/// [`split`](Self::split) works only from its arguments and configuration.
///
/// # Example
///
/// ```rust,ignore
/// use csv_split::{Splitter, SplitConfig, SourceFile};
///
/// let source = SourceFile::new("vendas.csv", std::fs::read("vendas.csv")?);
/// let outcome = Splitter::builder()
///     .config(SplitConfig::default())
///     .build()?
///     .split(&source)?;
///
/// for file in &outcome.files {
///     println!("{} ({} rows)", file.filename, file.row_count);
/// }
/// ```
pub struct Splitter {
    config: SplitConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cancellation_token: CancellationToken,
}

static_assertions::assert_impl_all!(Splitter: Send, Sync);

impl Splitter {
    pub fn builder() -> SplitterBuilder {
        SplitterBuilder::default()
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Parse `source`, group its rows and generate one CSV document per group.
    ///
    /// # Errors
    ///
    /// - [`SplitError::InvalidFileType`] if `source` is not a CSV file
    /// - [`SplitError::Parse`] if no rows could be parsed
    /// - [`SplitError::MissingGroupingColumn`] if no candidate column exists
    /// - [`SplitError::Cancelled`] if the cancellation token was triggered
    pub fn split(&self, source: &SourceFile) -> Result<SplitOutcome> {
        match self.split_internal(source) {
            Ok(outcome) => {
                self.report_progress(ProgressUpdate::complete(format!(
                    "Generated {} files",
                    outcome.files.len()
                )));
                Ok(outcome)
            }
            Err(e) => self.fail(e),
        }
    }

    /// Bundle generated files into a zip archive, reporting progress.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::Archive`] if the archive could not be built.
    pub fn build_archive(&self, files: &[GeneratedFile]) -> Result<Vec<u8>> {
        let result = self.check_cancelled().and_then(|()| {
            self.report_progress(ProgressUpdate::new(
                SplitStage::Archiving,
                0.0,
                format!("Creating {}...", self.config.archive_name),
            ));
            build_archive(files)
        });

        match result {
            Ok(bytes) => {
                info!(
                    "Built {} with {} entries ({} bytes)",
                    self.config.archive_name,
                    files.len(),
                    bytes.len()
                );
                self.report_progress(ProgressUpdate::complete(format!(
                    "Created {}",
                    self.config.archive_name
                )));
                Ok(bytes)
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail<T>(&self, e: SplitError) -> Result<T> {
        if e.is_cancelled() {
            self.report_progress(ProgressUpdate::cancelled());
        } else {
            self.report_progress(ProgressUpdate::failed(e.to_string()));
        }
        error!("Split error: {}", e);
        Err(e)
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancellation_token.is_cancelled() {
            return Err(SplitError::Cancelled);
        }
        Ok(())
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn split_internal(&self, source: &SourceFile) -> Result<SplitOutcome> {
        let start_time = Instant::now();

        info!("Splitting {} ({} bytes)", source.name, source.bytes.len());
        self.report_progress(ProgressUpdate::new(
            SplitStage::Initializing,
            0.0,
            format!("Checking {}...", source.name),
        ));
        validate_source(source)?;

        self.check_cancelled()?;

        // Step 1: decode and parse
        self.report_progress(ProgressUpdate::new(
            SplitStage::Decoding,
            0.0,
            "Reading CSV...",
        ));
        let parsed = parser::parse(&source.bytes, &self.config.grouping_candidates)?;
        debug!(
            "Parsed {} rows, {} columns as {}",
            parsed.rows.len(),
            parsed.headers.len(),
            parsed.encoding
        );
        self.report_progress(ProgressUpdate::new(
            SplitStage::Decoding,
            1.0,
            format!("Read {} rows ({})", parsed.rows.len(), parsed.encoding),
        ));

        self.check_cancelled()?;

        // Step 2: find the grouping column
        self.report_progress(ProgressUpdate::new(
            SplitStage::Resolving,
            0.0,
            "Looking for the grouping column...",
        ));
        let column = resolve_grouping_column(&parsed.rows, &self.config.grouping_candidates)
            .ok_or_else(|| SplitError::MissingGroupingColumn {
                candidates: self.config.grouping_candidates.clone(),
            })?
            .to_string();
        info!("Grouping by column '{}'", column);

        self.check_cancelled()?;

        // Step 3: bucket rows
        self.report_progress(ProgressUpdate::new(
            SplitStage::Partitioning,
            0.0,
            format!("Grouping rows by '{column}'..."),
        ));
        let (groups, stats) = partition_with_stats(&parsed.rows, &column);
        if stats.dropped_rows > 0 {
            info!(
                "Skipped {} rows with an empty '{}' value",
                stats.dropped_rows, column
            );
        }
        if groups.is_empty() {
            warn!("No row has a value in '{}'; nothing to generate", column);
        }
        self.report_progress(ProgressUpdate::new(
            SplitStage::Partitioning,
            1.0,
            format!("Found {} groups", groups.len()),
        ));

        self.check_cancelled()?;

        // Step 4: serialize and name
        self.report_progress(ProgressUpdate::with_items(
            SplitStage::Serializing,
            0,
            groups.len(),
            "Generating files...",
        ));
        let files = generate_files(&groups, self.config.collision_policy)?;
        self.report_progress(ProgressUpdate::with_items(
            SplitStage::Serializing,
            groups.len(),
            groups.len(),
            format!("Generated {} files", files.len()),
        ));

        let summary = SplitSummary {
            encoding: parsed.encoding.to_string(),
            grouping_column: column,
            total_rows: stats.total_rows,
            grouped_rows: stats.grouped_rows,
            dropped_rows: stats.dropped_rows,
            group_count: groups.len(),
            file_count: files.len(),
            warnings: parsed
                .issues
                .iter()
                .map(|issue| format!("line {}: {}", issue.row, issue.message))
                .collect(),
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            "Split {} rows into {} files in {} ms",
            summary.grouped_rows, summary.file_count, summary.duration_ms
        );

        Ok(SplitOutcome { files, summary })
    }
}

impl Default for Splitter {
    /// A splitter with the default configuration and no progress reporting.
    fn default() -> Self {
        Self {
            config: SplitConfig::default(),
            progress_reporter: None,
            cancellation_token: CancellationToken::default(),
        }
    }
}

/// Builder for creating a [`Splitter`].
#[derive(Default)]
pub struct SplitterBuilder {
    config: Option<SplitConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cancellation_token: Option<CancellationToken>,
}

static_assertions::assert_impl_all!(SplitterBuilder: Send);

impl SplitterBuilder {
    pub fn config(mut self, config: SplitConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a custom progress reporter.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Set a cancellation token. Clone it first to keep a handle for
    /// [`CancellationToken::cancel()`].
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Build the splitter.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Splitter, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Splitter {
            config,
            progress_reporter: self.progress_reporter,
            cancellation_token: self.cancellation_token.unwrap_or_default(),
        })
    }
}
