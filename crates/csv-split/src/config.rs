//! Configuration types for the CSV splitter.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic splitter setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Header names checked, in priority order, to find the grouping column.
pub const DEFAULT_GROUPING_CANDIDATES: [&str; 3] = [
    "Nome da operadora:",
    "Nome do restaurante:",
    "Nome da empresa:",
];

/// Name of the archive bundling every generated file.
pub const DEFAULT_ARCHIVE_NAME: &str = "planilhas_por_operadora.zip";

/// What to do when two group keys sanitize to the same file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Append `_2`, `_3`, ... to later names so every group keeps its own file
    #[default]
    Suffix,
    /// Later groups replace the content of the earlier file (last write wins)
    Overwrite,
}

/// Configuration for the splitter.
///
/// Use [`SplitConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use csv_split::config::{SplitConfig, CollisionPolicy};
///
/// let config = SplitConfig::builder()
///     .collision_policy(CollisionPolicy::Overwrite)
///     .create_archive(true)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Candidate grouping column names, checked in order.
    /// Default: `DEFAULT_GROUPING_CANDIDATES`
    pub grouping_candidates: Vec<String>,

    /// Policy applied when sanitized file names collide.
    /// Default: Suffix
    pub collision_policy: CollisionPolicy,

    /// Directory the generated files are saved into.
    /// Default: "outputs"
    pub output_dir: PathBuf,

    /// File name of the zip archive.
    /// Default: "planilhas_por_operadora.zip"
    pub archive_name: String,

    /// Whether to write each generated CSV individually.
    /// Default: true
    pub write_individual_files: bool,

    /// Whether to bundle the generated CSVs into a zip archive.
    /// Default: false
    pub create_archive: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            grouping_candidates: default_candidates(),
            collision_policy: CollisionPolicy::default(),
            output_dir: PathBuf::from("outputs"),
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
            write_individual_files: true,
            create_archive: false,
        }
    }
}

fn default_candidates() -> Vec<String> {
    DEFAULT_GROUPING_CANDIDATES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl SplitConfig {
    /// Create a new configuration builder.
    pub fn builder() -> SplitConfigBuilder {
        SplitConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.grouping_candidates.is_empty() {
            return Err(ConfigValidationError::NoGroupingCandidates);
        }

        if let Some(blank) = self
            .grouping_candidates
            .iter()
            .find(|c| c.trim().is_empty())
        {
            return Err(ConfigValidationError::BlankGroupingCandidate(blank.clone()));
        }

        if !self.archive_name.to_ascii_lowercase().ends_with(".zip")
            || self.archive_name.contains(['/', '\\'])
        {
            return Err(ConfigValidationError::InvalidArchiveName(
                self.archive_name.clone(),
            ));
        }

        if !self.write_individual_files && !self.create_archive {
            return Err(ConfigValidationError::NothingToWrite);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("At least one grouping column candidate is required")]
    NoGroupingCandidates,

    #[error("Invalid grouping column candidate: '{0}' (must not be blank)")]
    BlankGroupingCandidate(String),

    #[error("Invalid archive name: '{0}' (must be a plain file name ending in .zip)")]
    InvalidArchiveName(String),

    #[error("Nothing to write: enable individual files, the archive, or both")]
    NothingToWrite,
}

/// Builder for [`SplitConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct SplitConfigBuilder {
    grouping_candidates: Option<Vec<String>>,
    collision_policy: Option<CollisionPolicy>,
    output_dir: Option<PathBuf>,
    archive_name: Option<String>,
    write_individual_files: Option<bool>,
    create_archive: Option<bool>,
}

impl SplitConfigBuilder {
    /// Replace the grouping column candidates (checked in the given order).
    pub fn grouping_candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grouping_candidates = Some(candidates.into_iter().map(Into::into).collect());
        self
    }

    /// Set the file name collision policy.
    pub fn collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = Some(policy);
        self
    }

    /// Set the output directory for generated files.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the archive file name.
    pub fn archive_name(mut self, name: impl Into<String>) -> Self {
        self.archive_name = Some(name.into());
        self
    }

    /// Enable or disable writing each CSV individually.
    pub fn write_individual_files(mut self, write: bool) -> Self {
        self.write_individual_files = Some(write);
        self
    }

    /// Enable or disable the zip archive.
    pub fn create_archive(mut self, create: bool) -> Self {
        self.create_archive = Some(create);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `SplitConfig` or an error if validation fails.
    pub fn build(self) -> Result<SplitConfig, ConfigValidationError> {
        let config = SplitConfig {
            grouping_candidates: self.grouping_candidates.unwrap_or_else(default_candidates),
            collision_policy: self.collision_policy.unwrap_or_default(),
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from("outputs")),
            archive_name: self
                .archive_name
                .unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string()),
            write_individual_files: self.write_individual_files.unwrap_or(true),
            create_archive: self.create_archive.unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }
}
