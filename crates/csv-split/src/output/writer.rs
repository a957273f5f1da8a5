use crate::error::{Result, ResultExt};
use crate::types::GeneratedFile;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Save each generated file into `dir`, creating it if needed.
///
/// Returns the written paths in input order. Existing files with the same
/// name are replaced.
pub fn write_files(dir: &Path, files: &[GeneratedFile]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).context(format!("Creating {}", dir.display()))?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = dir.join(&file.filename);
        fs::write(&path, file.content.as_bytes())
            .context(format!("Writing {}", path.display()))?;
        written.push(path);
    }

    info!("Saved {} files to {}", written.len(), dir.display());
    Ok(written)
}

/// Save archive bytes as `dir/name`.
pub fn write_archive(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir).context(format!("Creating {}", dir.display()))?;

    let path = dir.join(name);
    fs::write(&path, bytes).context(format!("Writing {}", path.display()))?;

    info!("Archive saved: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, content: &str) -> GeneratedFile {
        GeneratedFile {
            filename: name.to_string(),
            content: content.to_string(),
            group_key: String::new(),
            row_count: 0,
        }
    }

    #[test]
    fn test_write_files_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested/out");
        let paths = write_files(&dir, &[file("A.csv", "x\r\n"), file("B.csv", "y\r\n")]).unwrap();

        assert_eq!(paths, vec![dir.join("A.csv"), dir.join("B.csv")]);
        assert_eq!(fs::read_to_string(dir.join("B.csv")).unwrap(), "y\r\n");
    }

    #[test]
    fn test_write_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_archive(tmp.path(), "bundle.zip", b"PK").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"PK");
    }
}
