use crate::types::{Group, Row};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Row accounting for one partition pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionStats {
    pub total_rows: usize,
    pub grouped_rows: usize,
    /// Rows whose grouping value was empty, whitespace-only or absent.
    pub dropped_rows: usize,
}

/// Bucket rows by the trimmed value of `column`.
///
/// Groups are created on first sight of a key and keep that order; rows keep
/// their source order inside a group. Rows with no usable key are skipped.
pub fn partition(rows: &[Row], column: &str) -> Vec<Group> {
    partition_with_stats(rows, column).0
}

/// Same as [`partition`], also returning how many rows were grouped or dropped.
pub fn partition_with_stats(rows: &[Row], column: &str) -> (Vec<Group>, PartitionStats) {
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut stats = PartitionStats {
        total_rows: rows.len(),
        ..PartitionStats::default()
    };

    for row in rows {
        let key = match row.get(column).map(str::trim) {
            Some(key) if !key.is_empty() => key,
            _ => {
                stats.dropped_rows += 1;
                continue;
            }
        };

        let slot = match index.get(key) {
            Some(&slot) => slot,
            None => {
                groups.push(Group::new(key));
                index.insert(key.to_string(), groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[slot].rows.push(row.clone());
        stats.grouped_rows += 1;
    }

    debug!(
        "Partitioned {} rows into {} groups ({} dropped)",
        stats.total_rows,
        groups.len(),
        stats.dropped_rows
    );
    (groups, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const COL: &str = "Nome da operadora:";

    fn rows(keys: &[&str]) -> Vec<Row> {
        let headers: Arc<[String]> = [COL, "id"].iter().map(|s| s.to_string()).collect();
        keys.iter()
            .enumerate()
            .map(|(i, k)| Row::new(Arc::clone(&headers), vec![k.to_string(), i.to_string()]))
            .collect()
    }

    #[test]
    fn test_first_seen_order() {
        let groups = partition(&rows(&["A", "B", "A"]), COL);
        let keys: Vec<_> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert_eq!(groups[0].rows.len(), 2);
        assert_eq!(groups[1].rows.len(), 1);
    }

    #[test]
    fn test_rows_keep_source_order_within_group() {
        let groups = partition(&rows(&["A", "B", "A", "A"]), COL);
        let ids: Vec<_> = groups[0].rows.iter().map(|r| r.get("id").unwrap()).collect();
        assert_eq!(ids, vec!["0", "2", "3"]);
    }

    #[test]
    fn test_keys_are_trimmed() {
        let groups = partition(&rows(&["  A", "A  ", "\tA\t"]), COL);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "A");
        assert_eq!(groups[0].rows.len(), 3);
    }

    #[test]
    fn test_whitespace_key_is_dropped() {
        let (groups, stats) = partition_with_stats(&rows(&["A", "  ", "", "B"]), COL);
        assert_eq!(groups.len(), 2);
        assert_eq!(stats.total_rows, 4);
        assert_eq!(stats.grouped_rows, 2);
        assert_eq!(stats.dropped_rows, 2);
    }

    #[test]
    fn test_missing_column_drops_every_row() {
        let (groups, stats) = partition_with_stats(&rows(&["A", "B"]), "absent");
        assert!(groups.is_empty());
        assert_eq!(stats.dropped_rows, 2);
    }

    #[test]
    fn test_no_case_folding() {
        let groups = partition(&rows(&["acme", "ACME"]), COL);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_every_row_accounted_for() {
        let input = rows(&["A", "", "B", "C", " ", "A"]);
        let (groups, stats) = partition_with_stats(&input, COL);
        let grouped: usize = groups.iter().map(|g| g.rows.len()).sum();
        assert_eq!(grouped + stats.dropped_rows, input.len());
        for group in &groups {
            for row in &group.rows {
                assert_eq!(row.get(COL).unwrap().trim(), group.key);
            }
        }
    }
}
