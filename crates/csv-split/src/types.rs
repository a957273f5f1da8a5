use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A file handed to the splitter by a file chooser or the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    /// Media type reported by the host, if any (e.g. `text/csv`).
    pub media_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            media_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }
}

/// One data record, keyed by the header row it was parsed under.
///
/// Headers are shared by every row of a parse. Values are stored in source
/// column order and there is always exactly one value per header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl Row {
    /// Build a row, padding missing trailing values with empty strings and
    /// dropping values beyond the header count.
    pub fn new(headers: Arc<[String]>, mut values: Vec<String>) -> Self {
        values.resize(headers.len(), String::new());
        Self { headers, values }
    }

    /// Value of the first column named `header`, if the column exists.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.headers
            .iter()
            .position(|h| h == header)
            .and_then(|idx| self.values.get(idx))
            .map(String::as_str)
    }

    pub fn contains_header(&self, header: &str) -> bool {
        self.headers.iter().any(|h| h == header)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// `(header, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .zip(self.values.iter())
            .map(|(h, v)| (h.as_str(), v.as_str()))
    }
}

/// A row-level diagnostic produced while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseIssue {
    /// 1-based line in the source text.
    pub row: usize,
    pub message: String,
}

impl ParseIssue {
    pub fn new(row: usize, message: impl Into<String>) -> Self {
        Self {
            row,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
    pub issues: Vec<ParseIssue>,
    /// Name of the encoding the rows were decoded with.
    pub encoding: &'static str,
}

/// Rows sharing one trimmed grouping value, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub key: String,
    pub rows: Vec<Row>,
}

impl Group {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            rows: Vec::new(),
        }
    }
}

/// One output CSV document, ready to be saved or archived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub filename: String,
    pub content: String,
    /// Group key the file was generated from.
    pub group_key: String,
    pub row_count: usize,
}

/// Counters collected over one split run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSummary {
    pub encoding: String,
    pub grouping_column: String,
    pub total_rows: usize,
    pub grouped_rows: usize,
    pub dropped_rows: usize,
    pub group_count: usize,
    pub file_count: usize,
    /// Non-fatal parser diagnostics, formatted for display.
    pub warnings: Vec<String>,
    pub duration_ms: u64,
}

/// Result of a successful split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitOutcome {
    pub files: Vec<GeneratedFile>,
    pub summary: SplitSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Arc<[String]> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_row_pads_short_records() {
        let row = Row::new(headers(&["a", "b", "c"]), vec!["1".to_string()]);
        assert_eq!(row.values(), &["1", "", ""]);
        assert_eq!(row.get("c"), Some(""));
    }

    #[test]
    fn test_row_truncates_long_records() {
        let row = Row::new(
            headers(&["a"]),
            vec!["1".to_string(), "extra".to_string()],
        );
        assert_eq!(row.values(), &["1"]);
    }

    #[test]
    fn test_row_get_missing_header() {
        let row = Row::new(headers(&["a"]), vec!["1".to_string()]);
        assert_eq!(row.get("b"), None);
        assert!(!row.contains_header("b"));
        assert!(row.contains_header("a"));
    }

    #[test]
    fn test_row_iter_keeps_column_order() {
        let row = Row::new(
            headers(&["z", "a"]),
            vec!["1".to_string(), "2".to_string()],
        );
        let pairs: Vec<_> = row.iter().collect();
        assert_eq!(pairs, vec![("z", "1"), ("a", "2")]);
    }

    #[test]
    fn test_source_file_media_type() {
        let file = SourceFile::new("a.csv", b"x".to_vec()).with_media_type("text/csv");
        assert_eq!(file.media_type.as_deref(), Some("text/csv"));
    }
}
