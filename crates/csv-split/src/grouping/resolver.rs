use crate::types::Row;

/// Find the first of `candidates` present in the header set of the first row.
///
/// Presence is a key check only: a column whose first value is empty still
/// resolves. Returns `None` for an empty row sequence or when no candidate
/// matches.
pub fn resolve_grouping_column<'a, S: AsRef<str>>(
    rows: &[Row],
    candidates: &'a [S],
) -> Option<&'a str> {
    let first = rows.first()?;
    candidates
        .iter()
        .map(AsRef::as_ref)
        .find(|candidate| first.contains_header(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_GROUPING_CANDIDATES;
    use std::sync::Arc;

    fn row(headers: &[&str], values: &[&str]) -> Row {
        let headers: Arc<[String]> = headers.iter().map(|s| s.to_string()).collect();
        Row::new(headers, values.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_resolves_single_candidate() {
        let rows = vec![row(&["Nome do restaurante:", "x"], &["Bar", "1"])];
        assert_eq!(
            resolve_grouping_column(&rows, &DEFAULT_GROUPING_CANDIDATES),
            Some("Nome do restaurante:")
        );
    }

    #[test]
    fn test_priority_order_wins() {
        let rows = vec![row(
            &["Nome da empresa:", "Nome da operadora:"],
            &["E", "O"],
        )];
        assert_eq!(
            resolve_grouping_column(&rows, &DEFAULT_GROUPING_CANDIDATES),
            Some("Nome da operadora:")
        );
    }

    #[test]
    fn test_empty_value_still_resolves() {
        let rows = vec![row(&["Nome da empresa:"], &[""])];
        assert_eq!(
            resolve_grouping_column(&rows, &DEFAULT_GROUPING_CANDIDATES),
            Some("Nome da empresa:")
        );
    }

    #[test]
    fn test_no_rows_is_not_found() {
        assert_eq!(
            resolve_grouping_column(&[], &DEFAULT_GROUPING_CANDIDATES),
            None
        );
    }

    #[test]
    fn test_no_candidate_is_not_found() {
        let rows = vec![row(&["Nome", "Empresa"], &["a", "b"])];
        assert_eq!(
            resolve_grouping_column(&rows, &DEFAULT_GROUPING_CANDIDATES),
            None
        );
    }

    #[test]
    fn test_match_is_exact() {
        let rows = vec![row(&["nome da empresa:"], &["a"])];
        assert_eq!(
            resolve_grouping_column(&rows, &DEFAULT_GROUPING_CANDIDATES),
            None
        );
    }
}
