//! Decoded text to rows, using the `csv` crate.

use crate::types::{ParseIssue, ParseResult, Row};
use csv::{ReaderBuilder, StringRecord};
use std::sync::Arc;
use tracing::trace;

/// Parse decoded CSV text. The first record is the header row and blank
/// lines are skipped.
///
/// Records whose field count differs from the header are kept (padded or
/// truncated) and reported as issues. Reader errors are reported as issues
/// as well, so the result may hold partial data alongside diagnostics. A
/// quoted field left open at the end of the text drops the record it starts.
pub fn parse_text(text: &str, encoding: &'static str) -> ParseResult {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut issues = Vec::new();

    let mut headers: Vec<String> = match reader.headers() {
        Ok(record) => record.iter().map(str::to_string).collect(),
        Err(e) => {
            issues.push(ParseIssue::new(
                e.position().map(|p| p.line() as usize).unwrap_or(1),
                e.to_string(),
            ));
            Vec::new()
        }
    };
    let shared: Arc<[String]> = headers.iter().cloned().collect();

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    let mut last_line = 1;

    loop {
        match reader.read_record(&mut record) {
            Ok(true) => {
                let line = record
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(last_line + 1);
                last_line = line;

                if record.len() != shared.len() {
                    let kind = if record.len() < shared.len() {
                        "Too few fields"
                    } else {
                        "Too many fields"
                    };
                    issues.push(ParseIssue::new(
                        line,
                        format!(
                            "{kind}: expected {} fields but parsed {}",
                            shared.len(),
                            record.len()
                        ),
                    ));
                }

                let values = record.iter().map(str::to_string).collect();
                rows.push(Row::new(Arc::clone(&shared), values));
            }
            Ok(false) => break,
            Err(e) => {
                let line = e
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(last_line + 1);
                trace!("Record error on line {}: {}", line, e);
                issues.push(ParseIssue::new(line, e.to_string()));
                if e.is_io_error() {
                    break;
                }
                last_line = line;
            }
        }
    }

    // The reader silently swallows everything after an unclosed quote into
    // the last record, so that record is dropped and reported instead.
    if let Some(quote_line) = unterminated_quote_line(text) {
        let line = if rows.pop().is_some() {
            issues.retain(|issue| issue.row != last_line);
            last_line
        } else {
            headers.clear();
            quote_line
        };
        issues.push(ParseIssue::new(line, UNTERMINATED_QUOTE));
    }

    ParseResult {
        headers,
        rows,
        issues,
        encoding,
    }
}

const UNTERMINATED_QUOTE: &str = "Quoted field unterminated";

#[derive(Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Line of the opening quote when `text` ends inside a quoted field.
///
/// Follows the reader's rules: a quote only opens a quoted field at the
/// start of a field, and `""` inside a quoted field is an escaped quote.
fn unterminated_quote_line(text: &str) -> Option<usize> {
    let mut state = QuoteState::FieldStart;
    let mut line = 1;
    let mut opened_at = 1;

    for c in text.chars() {
        let boundary = matches!(c, ',' | '\n' | '\r');
        state = match (state, c) {
            (QuoteState::FieldStart, '"') => {
                opened_at = line;
                QuoteState::Quoted
            }
            (QuoteState::Quoted, '"') => QuoteState::QuoteInQuoted,
            (QuoteState::Quoted, _) => QuoteState::Quoted,
            (QuoteState::QuoteInQuoted, '"') => QuoteState::Quoted,
            (_, _) if boundary => QuoteState::FieldStart,
            (_, _) => QuoteState::Unquoted,
        };
        if c == '\n' {
            line += 1;
        }
    }

    (state == QuoteState::Quoted).then_some(opened_at)
}
