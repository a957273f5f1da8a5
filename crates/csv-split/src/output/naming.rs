//! Group key to file name conversion.
//!
//! Only ASCII letters and digits, whitespace, `-` and `_` survive; accented
//! letters are dropped rather than transliterated, so `"Café & Cia!"`
//! becomes `Caf_Cia.csv`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static DISALLOWED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9\s_-]").expect("Invalid regex: disallowed chars"));

static WHITESPACE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid regex: whitespace runs"));

/// Extension appended to every generated file.
pub const CSV_EXTENSION: &str = ".csv";

/// Base used when nothing of the key survives sanitizing.
pub const EMPTY_NAME_FALLBACK: &str = "unnamed";

/// Sanitized file name without the extension.
///
/// Whitespace left at either end once symbols are removed is trimmed before
/// runs become `_`, so `"& Cia"` gives `Cia`, never `_Cia`.
pub fn sanitize_basename(key: &str) -> String {
    let kept = DISALLOWED_CHARS.replace_all(key, "");
    let base = WHITESPACE_RUNS.replace_all(kept.trim(), "_");
    if base.is_empty() {
        EMPTY_NAME_FALLBACK.to_string()
    } else {
        base.into_owned()
    }
}

/// Derive a filesystem-safe `.csv` file name from a group key.
pub fn sanitize_filename(key: &str) -> String {
    format!("{}{CSV_EXTENSION}", sanitize_basename(key))
}

/// Return `base.csv`, or the first free `base_N.csv` (N >= 2), and record it
/// in `used`.
pub fn unique_filename(base: &str, used: &mut HashSet<String>) -> String {
    let mut name = format!("{base}{CSV_EXTENSION}");
    let mut n = 2;
    while used.contains(&name) {
        name = format!("{base}_{n}{CSV_EXTENSION}");
        n += 1;
    }
    used.insert(name.clone());
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_leading_or_trailing_underscore() {
        assert_eq!(sanitize_filename("& Cia"), "Cia.csv");
        assert_eq!(sanitize_filename("Cia !"), "Cia.csv");
        assert_eq!(sanitize_filename("  Nova   Era  "), "Nova_Era.csv");
    }

    #[test]
    fn test_plain_key() {
        assert_eq!(sanitize_filename("A"), "A.csv");
        assert_eq!(sanitize_filename("Operadora-01"), "Operadora-01.csv");
    }

    #[test]
    fn test_whitespace_runs_become_one_underscore() {
        assert_eq!(sanitize_filename("Rede   Sul\tNorte"), "Rede_Sul_Norte.csv");
    }

    #[test]
    fn test_non_ascii_letters_are_dropped() {
        assert_eq!(sanitize_filename("Café & Cia!"), "Caf_Cia.csv");
        assert_eq!(sanitize_filename("São João"), "So_Joo.csv");
    }

    #[test]
    fn test_leading_and_trailing_residue_is_trimmed() {
        assert_eq!(sanitize_filename("! Bar !"), "Bar.csv");
    }

    #[test]
    fn test_path_separators_are_removed() {
        assert_eq!(sanitize_filename("../etc/passwd"), "etcpasswd.csv");
        assert_eq!(sanitize_filename("a\\b"), "ab.csv");
    }

    #[test]
    fn test_empty_result_uses_fallback() {
        assert_eq!(sanitize_filename("!!!"), "unnamed.csv");
        assert_eq!(sanitize_filename("çã"), "unnamed.csv");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for key in ["Café & Cia!", "A  B", "x-y_z", "  lead", "Ünïcödé 2024", "!!!"] {
            let once = sanitize_basename(key);
            assert_eq!(sanitize_filename(&once), sanitize_filename(key), "key: {key}");
        }
    }

    #[test]
    fn test_unique_filename_suffixes() {
        let mut used = HashSet::new();
        assert_eq!(unique_filename("A", &mut used), "A.csv");
        assert_eq!(unique_filename("A", &mut used), "A_2.csv");
        assert_eq!(unique_filename("A", &mut used), "A_3.csv");
        assert_eq!(unique_filename("B", &mut used), "B.csv");
    }

    #[test]
    fn test_unique_filename_skips_taken_suffix() {
        let mut used = HashSet::new();
        assert_eq!(unique_filename("A_2", &mut used), "A_2.csv");
        assert_eq!(unique_filename("A", &mut used), "A.csv");
        assert_eq!(unique_filename("A", &mut used), "A_3.csv");
    }
}
