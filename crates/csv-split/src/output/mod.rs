//! Turning groups into named CSV documents, archives and files on disk.

mod archive;
mod naming;
mod serializer;
mod writer;

pub use archive::build_archive;
pub use naming::{
    CSV_EXTENSION, EMPTY_NAME_FALLBACK, sanitize_basename, sanitize_filename, unique_filename,
};
pub use serializer::serialize;
pub use writer::{write_archive, write_files};

use crate::config::CollisionPolicy;
use crate::error::Result;
use crate::types::{GeneratedFile, Group};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Serialize and name every group, in group order.
///
/// With [`CollisionPolicy::Suffix`] each group gets its own file. With
/// [`CollisionPolicy::Overwrite`] a later group whose name collides replaces
/// the earlier file's content in place.
pub fn generate_files(groups: &[Group], policy: CollisionPolicy) -> Result<Vec<GeneratedFile>> {
    let mut files: Vec<GeneratedFile> = Vec::with_capacity(groups.len());
    let mut used = HashSet::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for group in groups {
        let content = serialize(&group.rows)?;
        let base = sanitize_basename(&group.key);

        let filename = match policy {
            CollisionPolicy::Suffix => unique_filename(&base, &mut used),
            CollisionPolicy::Overwrite => format!("{base}{CSV_EXTENSION}"),
        };

        let file = GeneratedFile {
            filename,
            content,
            group_key: group.key.clone(),
            row_count: group.rows.len(),
        };

        if let Some(&slot) = slots.get(&file.filename) {
            warn!(
                "'{}' and '{}' both map to {}; keeping the later group",
                files[slot].group_key, file.group_key, file.filename
            );
            files[slot] = file;
        } else {
            if file.filename != format!("{base}{CSV_EXTENSION}") {
                warn!("Renamed group '{}' to {} to avoid a collision", group.key, file.filename);
            }
            slots.insert(file.filename.clone(), files.len());
            files.push(file);
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Row;
    use std::sync::Arc;

    fn group(key: &str, n: usize) -> Group {
        let headers: Arc<[String]> = ["k"].iter().map(|s| s.to_string()).collect();
        Group {
            key: key.to_string(),
            rows: (0..n)
                .map(|_| Row::new(Arc::clone(&headers), vec![key.to_string()]))
                .collect(),
        }
    }

    #[test]
    fn test_one_file_per_group() {
        let files = generate_files(&[group("A", 2), group("B", 1)], CollisionPolicy::Suffix).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["A.csv", "B.csv"]);
        assert_eq!(files[0].row_count, 2);
        assert_eq!(files[0].content, "k\r\nA\r\nA\r\n");
    }

    #[test]
    fn test_suffix_policy_keeps_both() {
        let files =
            generate_files(&[group("Café", 1), group("Caf", 2)], CollisionPolicy::Suffix).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["Caf.csv", "Caf_2.csv"]);
        assert_eq!(files[1].group_key, "Caf");
    }

    #[test]
    fn test_overwrite_policy_last_write_wins() {
        let files = generate_files(
            &[group("Café", 1), group("X", 1), group("Caf", 2)],
            CollisionPolicy::Overwrite,
        )
        .unwrap();
        let names: Vec<_> = files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["Caf.csv", "X.csv"]);
        assert_eq!(files[0].group_key, "Caf");
        assert_eq!(files[0].row_count, 2);
    }
}
