//! Interactive session state around the splitter.
//!
//! A [`SplitSession`] keeps what a file-upload screen would keep: the chosen
//! file, the last generated files, the last error message and two busy
//! flags. Processing and archiving run as separate async operations on
//! tokio's blocking pool.

use crate::config::{ConfigValidationError, SplitConfig};
use crate::error::{Result, SplitError};
use crate::input::validate_source;
use crate::pipeline::Splitter;
use crate::types::{GeneratedFile, SourceFile, SplitOutcome};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct SessionState {
    selected: Option<Arc<SourceFile>>,
    outcome: Option<Arc<SplitOutcome>>,
    last_error: Option<String>,
    processing: bool,
    /// Bumped by every `process` call; only the newest run may store results.
    generation: u64,
}

/// Selected file, generated results and busy flags for one user.
pub struct SplitSession {
    splitter: Arc<Splitter>,
    state: Mutex<SessionState>,
    archiving: AtomicBool,
}

static_assertions::assert_impl_all!(SplitSession: Send, Sync);

/// Clears the archive busy flag when the archive step ends, however it ends.
struct ArchiveGuard<'a>(&'a AtomicBool);

impl Drop for ArchiveGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Clears the processing flag when the newest run ends, including when its
/// future is dropped before completion.
struct ProcessingGuard<'a> {
    state: &'a Mutex<SessionState>,
    generation: u64,
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        if state.generation == self.generation {
            state.processing = false;
        }
    }
}

impl SplitSession {
    pub fn new(splitter: Splitter) -> Self {
        Self {
            splitter: Arc::new(splitter),
            state: Mutex::new(SessionState::default()),
            archiving: AtomicBool::new(false),
        }
    }

    /// Create a session with a splitter built from `config`.
    pub fn with_config(config: SplitConfig) -> std::result::Result<Self, ConfigValidationError> {
        Ok(Self::new(Splitter::builder().config(config).build()?))
    }

    pub fn config(&self) -> &SplitConfig {
        self.splitter.config()
    }

    /// Choose the file to process next.
    ///
    /// A non-CSV file clears the selection and any previous results.
    pub fn select_file(&self, file: SourceFile) -> Result<()> {
        let mut state = self.state.lock();
        match validate_source(&file) {
            Ok(()) => {
                debug!("Selected {}", file.name);
                state.selected = Some(Arc::new(file));
                state.last_error = None;
                Ok(())
            }
            Err(e) => {
                state.selected = None;
                state.outcome = None;
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Forget the selected file, the results and the last error.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.selected = None;
        state.outcome = None;
        state.last_error = None;
    }

    /// Split the selected file and keep the generated files.
    ///
    /// Calling this again while a run is in flight does not cancel the
    /// earlier run; the results of the newest call are the ones kept.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::NoFileSelected`] without running anything if no
    /// file is selected, or the splitter's error. Parse and schema errors
    /// also discard previous results.
    pub async fn process(&self) -> Result<Arc<SplitOutcome>> {
        let (file, generation) = {
            let mut state = self.state.lock();
            let Some(file) = state.selected.clone() else {
                state.last_error = Some(SplitError::NoFileSelected.to_string());
                return Err(SplitError::NoFileSelected);
            };
            state.generation += 1;
            state.processing = true;
            state.last_error = None;
            (file, state.generation)
        };

        let _processing = ProcessingGuard {
            state: &self.state,
            generation,
        };

        let splitter = Arc::clone(&self.splitter);
        let result = tokio::task::spawn_blocking(move || splitter.split(&file))
            .await
            .map_err(|e| SplitError::Internal(format!("Split task failed: {e}")))
            .and_then(|result| result)
            .map(Arc::new);

        self.store_result(generation, &result);
        result
    }

    fn store_result(&self, generation: u64, result: &Result<Arc<SplitOutcome>>) {
        let mut state = self.state.lock();
        if state.generation != generation {
            debug!("Discarding results of superseded run {}", generation);
            return;
        }

        match result {
            Ok(outcome) => {
                info!("Session now holds {} files", outcome.files.len());
                state.outcome = Some(Arc::clone(outcome));
            }
            Err(e) => {
                if e.clears_results() {
                    state.outcome = None;
                }
                state.last_error = Some(e.to_string());
            }
        }
    }

    /// Bundle the current results into a zip archive.
    ///
    /// # Errors
    ///
    /// - [`SplitError::NoResults`] if nothing has been generated yet
    /// - [`SplitError::ArchiveBusy`] if an archive is already being built
    /// - [`SplitError::Archive`] if building failed; results are kept
    pub async fn build_archive(&self) -> Result<Vec<u8>> {
        let Some(outcome) = self.state.lock().outcome.clone() else {
            return Err(SplitError::NoResults);
        };

        if self
            .archiving
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Archive requested while another one is being built");
            return Err(SplitError::ArchiveBusy);
        }
        let _guard = ArchiveGuard(&self.archiving);

        let splitter = Arc::clone(&self.splitter);
        let result = tokio::task::spawn_blocking(move || splitter.build_archive(&outcome.files))
            .await
            .map_err(|e| SplitError::Internal(format!("Archive task failed: {e}")))
            .and_then(|result| result);

        if let Err(e) = &result {
            self.state.lock().last_error = Some(e.to_string());
        }

        result
    }

    pub fn selected_name(&self) -> Option<String> {
        self.state.lock().selected.as_ref().map(|f| f.name.clone())
    }

    pub fn outcome(&self) -> Option<Arc<SplitOutcome>> {
        self.state.lock().outcome.clone()
    }

    /// Generated files of the last successful run, empty if there is none.
    pub fn files(&self) -> Vec<GeneratedFile> {
        self.state
            .lock()
            .outcome
            .as_ref()
            .map(|o| o.files.clone())
            .unwrap_or_default()
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }

    pub fn is_processing(&self) -> bool {
        self.state.lock().processing
    }

    pub fn is_archiving(&self) -> bool {
        self.archiving.load(Ordering::Acquire)
    }
}

impl Default for SplitSession {
    fn default() -> Self {
        Self {
            splitter: Arc::new(Splitter::default()),
            state: Mutex::new(SessionState::default()),
            archiving: AtomicBool::new(false),
        }
    }
}
