//! Source file validation, run before any parsing.

use crate::error::{Result, SplitError};
use crate::types::SourceFile;
use std::path::Path;
use tracing::debug;

/// Media types hosts report for CSV files. Windows browsers label `.csv`
/// files as `application/vnd.ms-excel`.
pub const CSV_MEDIA_TYPES: [&str; 3] = ["text/csv", "application/csv", "application/vnd.ms-excel"];

/// Whether `file` looks like a CSV file by extension or media type.
pub fn is_csv(file: &SourceFile) -> bool {
    let by_extension = Path::new(&file.name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let by_media_type = file.media_type.as_deref().is_some_and(|media_type| {
        let essence = media_type.split(';').next().unwrap_or_default().trim();
        CSV_MEDIA_TYPES
            .iter()
            .any(|known| essence.eq_ignore_ascii_case(known))
    });

    by_extension || by_media_type
}

/// Reject anything that is not a CSV file.
///
/// # Errors
///
/// Returns [`SplitError::InvalidFileType`] for non-CSV files.
pub fn validate_source(file: &SourceFile) -> Result<()> {
    if is_csv(file) {
        Ok(())
    } else {
        debug!(
            "Rejected '{}' (media type {:?})",
            file.name, file.media_type
        );
        Err(SplitError::InvalidFileType)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_extension_accepted() {
        assert!(is_csv(&SourceFile::new("dados.csv", b"".to_vec())));
        assert!(is_csv(&SourceFile::new("DADOS.CSV", b"".to_vec())));
    }

    #[test]
    fn test_media_type_accepted_without_extension() {
        let file = SourceFile::new("export", b"".to_vec()).with_media_type("text/csv; charset=utf-8");
        assert!(is_csv(&file));
        let file = SourceFile::new("export", b"".to_vec()).with_media_type("application/vnd.ms-excel");
        assert!(is_csv(&file));
    }

    #[test]
    fn test_other_files_rejected() {
        let err = validate_source(&SourceFile::new("planilha.xlsx", b"".to_vec())).unwrap_err();
        assert_eq!(err.to_string(), "Invalid file type. Please upload a CSV file.");
        assert!(!is_csv(&SourceFile::new("csv", b"".to_vec())));
        assert!(
            !is_csv(&SourceFile::new("notes.txt", b"".to_vec()).with_media_type("text/plain"))
        );
    }
}
