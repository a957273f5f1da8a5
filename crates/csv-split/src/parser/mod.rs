//! Encoding-resilient CSV parsing.
//!
//! Exported spreadsheets are frequently saved by tools that do not write
//! UTF-8. Rather than sniffing the encoding, the parser decodes as UTF-8
//! first and treats "no usable grouping header" as a sign that the bytes
//! were misread, retrying once with a single-byte legacy encoding:
//!
//! 1. Decode strictly as UTF-8 and parse.
//! 2. If decoding failed, no rows were produced, or the first row has none
//!    of the candidate headers, decode with `windows-1252` and parse again.
//!    That second result is used as-is.
//! 3. Row-level issues alongside data are logged and kept; issues without
//!    any data fail the parse with the first issue.

mod decoding;
mod records;

pub use decoding::{FALLBACK_ENCODING, PRIMARY_ENCODING, decode_fallback, decode_primary};
pub use records::parse_text;

use crate::error::{Result, SplitError};
use crate::grouping::resolve_grouping_column;
use crate::types::ParseResult;
use tracing::{debug, info, warn};

/// Parse raw CSV bytes, falling back to the legacy encoding when the UTF-8
/// attempt does not expose any of `candidates` as a header.
///
/// # Errors
///
/// Returns [`SplitError::Parse`] when the chosen attempt produced issues but
/// no rows.
pub fn parse<S: AsRef<str>>(bytes: &[u8], candidates: &[S]) -> Result<ParseResult> {
    let primary = decode_primary(bytes).map(|text| parse_text(&text, PRIMARY_ENCODING.name()));

    let result = match primary {
        Some(result) if is_conclusive(&result, candidates) => result,
        Some(result) => {
            debug!(
                "{} attempt inconclusive ({} rows, no candidate header); retrying as {}",
                result.encoding,
                result.rows.len(),
                FALLBACK_ENCODING.name()
            );
            parse_fallback(bytes)
        }
        None => parse_fallback(bytes),
    };

    check_issues(result)
}

fn parse_fallback(bytes: &[u8]) -> ParseResult {
    info!("Decoding input as {}", FALLBACK_ENCODING.name());
    parse_text(&decode_fallback(bytes), FALLBACK_ENCODING.name())
}

fn is_conclusive<S: AsRef<str>>(result: &ParseResult, candidates: &[S]) -> bool {
    !result.rows.is_empty() && resolve_grouping_column(&result.rows, candidates).is_some()
}

fn check_issues(result: ParseResult) -> Result<ParseResult> {
    let Some(first) = result.issues.first() else {
        return Ok(result);
    };

    if result.rows.is_empty() {
        return Err(SplitError::Parse {
            row: first.row,
            message: first.message.clone(),
        });
    }

    for issue in &result.issues {
        warn!("CSV line {}: {}", issue.row, issue.message);
    }
    Ok(result)
}
