use crate::error::{Result, SplitError};
use crate::types::GeneratedFile;
use std::io::{Cursor, Write};
use tracing::{debug, error};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Bundle every generated file into one in-memory zip archive.
///
/// Entries are top-level, named after each file and written in order. Any
/// failure discards the partial archive.
///
/// # Errors
///
/// Returns [`SplitError::Archive`] if the zip writer fails.
pub fn build_archive(files: &[GeneratedFile]) -> Result<Vec<u8>> {
    write_entries(files).map_err(|e| {
        error!("Archive build failed: {}", e);
        SplitError::Archive(e.to_string())
    })
}

fn write_entries(files: &[GeneratedFile]) -> zip::result::ZipResult<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for file in files {
        zip.start_file(file.filename.as_str(), options)?;
        zip.write_all(file.content.as_bytes())?;
        debug!("Archived {} ({} bytes)", file.filename, file.content.len());
    }

    Ok(zip.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn file(name: &str, content: &str) -> GeneratedFile {
        GeneratedFile {
            filename: name.to_string(),
            content: content.to_string(),
            group_key: name.trim_end_matches(".csv").to_string(),
            row_count: 1,
        }
    }

    #[test]
    fn test_archive_contains_every_file() {
        let files = vec![file("A.csv", "h\r\n1\r\n"), file("B.csv", "h\r\n2\r\n")];
        let bytes = build_archive(&files).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut content = String::new();
        archive
            .by_name("B.csv")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "h\r\n2\r\n");
        assert_eq!(archive.by_index(0).unwrap().name(), "A.csv");
    }

    #[test]
    fn test_archive_preserves_utf8_content() {
        let files = vec![file("Agua.csv", "Nome da operadora:\r\nÁgua Viva\r\n")];
        let bytes = build_archive(&files).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut content = String::new();
        archive
            .by_index(0)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert!(content.contains("Água Viva"));
    }

    #[test]
    fn test_duplicate_entry_fails_whole_archive() {
        let files = vec![file("A.csv", "1"), file("A.csv", "2")];
        let err = build_archive(&files).unwrap_err();
        assert!(matches!(err, SplitError::Archive(_)));
    }

    #[test]
    fn test_empty_archive() {
        let bytes = build_archive(&[]).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
