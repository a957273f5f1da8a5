//! Error types for the CSV splitting pipeline.
//!
//! The `Display` text of the user-facing variants is the exact message a
//! host shows to the user. Errors serialize as `{ code, message }` so they
//! can be handed to a frontend or printed as JSON by the CLI.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the splitting pipeline and session.
#[derive(Error, Debug)]
pub enum SplitError {
    /// The selected file is not a CSV file.
    #[error("Invalid file type. Please upload a CSV file.")]
    InvalidFileType,

    /// The pipeline was triggered without a selected file.
    #[error("No file selected. Please upload a CSV file.")]
    NoFileSelected,

    /// The CSV could not be parsed into any usable rows, even after the
    /// encoding fallback.
    #[error("Error parsing CSV file on line {row}: {message}. Please check the file format.")]
    Parse { row: usize, message: String },

    /// None of the candidate grouping columns is present.
    #[error(
        "CSV must contain one of the following columns: {}",
        quote_list(.candidates)
    )]
    MissingGroupingColumn { candidates: Vec<String> },

    /// The zip archive could not be built.
    #[error("Could not create the ZIP file. Please try downloading files individually.")]
    Archive(String),

    /// An archive was requested before any files were generated.
    #[error("No generated files available. Please process a CSV file first.")]
    NoResults,

    /// An archive build is already running.
    #[error("A ZIP file is already being created")]
    ArchiveBusy,

    /// The run was cancelled through its cancellation token.
    #[error("Split cancelled")]
    Cancelled,

    /// Internal error (e.g., task join failure).
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<SplitError>,
    },
}

fn quote_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("'{item}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl SplitError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        SplitError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidFileType => "INVALID_FILE_TYPE",
            Self::NoFileSelected => "NO_FILE_SELECTED",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::MissingGroupingColumn { .. } => "MISSING_GROUPING_COLUMN",
            Self::Archive(_) => "ARCHIVE_ERROR",
            Self::NoResults => "NO_RESULTS",
            Self::ArchiveBusy => "ARCHIVE_BUSY",
            Self::Cancelled => "CANCELLED",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error represents a cancellation.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled => true,
            Self::WithContext { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }

    /// Check if this error was raised before any parsing happened.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidFileType | Self::NoFileSelected)
    }

    /// Whether previously generated results must be discarded after this error.
    ///
    /// Parse and schema failures abort the operation without partial output.
    /// Archive failures leave the per-file results available.
    pub fn clears_results(&self) -> bool {
        match self {
            Self::Parse { .. } | Self::MissingGroupingColumn { .. } | Self::InvalidFileType => {
                true
            }
            Self::WithContext { source, .. } => source.clears_results(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for SplitError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("SplitError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

impl From<csv::Error> for SplitError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            match err.into_kind() {
                csv::ErrorKind::Io(io) => SplitError::Io(io),
                other => SplitError::Internal(format!("CSV error: {other:?}")),
            }
        } else {
            SplitError::Internal(format!("CSV error: {err}"))
        }
    }
}

/// Result type alias for split operations.
pub type Result<T> = std::result::Result<T, SplitError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| SplitError::Io(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            SplitError::InvalidFileType.to_string(),
            "Invalid file type. Please upload a CSV file."
        );
        assert_eq!(
            SplitError::Archive("disk full".to_string()).to_string(),
            "Could not create the ZIP file. Please try downloading files individually."
        );
        assert_eq!(
            SplitError::Parse {
                row: 3,
                message: "Unexpected end of quoted field".to_string()
            }
            .to_string(),
            "Error parsing CSV file on line 3: Unexpected end of quoted field. Please check the file format."
        );
    }

    #[test]
    fn test_missing_column_message_lists_all_candidates() {
        let error = SplitError::MissingGroupingColumn {
            candidates: vec![
                "Nome da operadora:".to_string(),
                "Nome do restaurante:".to_string(),
                "Nome da empresa:".to_string(),
            ],
        };
        assert_eq!(
            error.to_string(),
            "CSV must contain one of the following columns: 'Nome da operadora:', 'Nome do restaurante:', 'Nome da empresa:'"
        );
    }

    #[test]
    fn test_error_code() {
        assert_eq!(SplitError::Cancelled.error_code(), "CANCELLED");
        assert_eq!(SplitError::InvalidFileType.error_code(), "INVALID_FILE_TYPE");
        assert_eq!(
            SplitError::Archive("x".to_string()).error_code(),
            "ARCHIVE_ERROR"
        );
    }

    #[test]
    fn test_clears_results() {
        assert!(SplitError::InvalidFileType.clears_results());
        assert!(
            SplitError::MissingGroupingColumn { candidates: vec![] }.clears_results()
        );
        assert!(!SplitError::Archive("x".to_string()).clears_results());
        assert!(!SplitError::ArchiveBusy.clears_results());
    }

    #[test]
    fn test_is_input_error() {
        assert!(SplitError::NoFileSelected.is_input_error());
        assert!(SplitError::InvalidFileType.is_input_error());
        assert!(!SplitError::NoResults.is_input_error());
    }

    #[test]
    fn test_error_serialization() {
        let error = SplitError::Parse {
            row: 2,
            message: "bad".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("PARSE_ERROR"));
        assert!(json.contains("line 2"));
    }

    #[test]
    fn test_with_context() {
        let error = SplitError::Cancelled.with_context("During partitioning");
        assert!(error.to_string().contains("During partitioning"));
        assert_eq!(error.error_code(), "CANCELLED");
        assert!(error.is_cancelled());
    }
}
