use crate::error::{Result, SplitError};
use crate::types::Row;
use csv::{Terminator, WriterBuilder};

/// Serialize rows back into CSV text.
///
/// The header row is taken from the first row, so column order matches the
/// source. Fields are quoted only when needed and records end in CRLF.
/// An empty slice serializes to an empty string.
pub fn serialize(rows: &[Row]) -> Result<String> {
    let Some(first) = rows.first() else {
        return Ok(String::new());
    };

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(first.headers())?;
    for row in rows {
        writer.write_record(row.values())?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| SplitError::Io(e.into_error()))?;
    // Every field came from a `String`, so the output is valid UTF-8.
    String::from_utf8(bytes).map_err(|e| SplitError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_text;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn row(headers: &Arc<[String]>, values: &[&str]) -> Row {
        Row::new(Arc::clone(headers), values.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_serialize_header_and_records() {
        let headers: Arc<[String]> = ["b", "a"].iter().map(|s| s.to_string()).collect();
        let text = serialize(&[row(&headers, &["1", "2"]), row(&headers, &["3", "4"])]).unwrap();
        assert_eq!(text, "b,a\r\n1,2\r\n3,4\r\n");
    }

    #[test]
    fn test_serialize_quotes_when_needed() {
        let headers: Arc<[String]> = ["x"].iter().map(|s| s.to_string()).collect();
        let text = serialize(&[row(&headers, &["a,b"]), row(&headers, &["say \"hi\""])]).unwrap();
        assert_eq!(text, "x\r\n\"a,b\"\r\n\"say \"\"hi\"\"\"\r\n");
    }

    #[test]
    fn test_serialize_empty() {
        assert_eq!(serialize(&[]).unwrap(), "");
    }

    #[test]
    fn test_round_trip_preserves_headers_and_values() {
        let source = "Nome da operadora:,Obs,Valor\nÁgua Viva,\"linha 1\nlinha 2\",\"1,50\"\nBeta,,3\n";
        let parsed = parse_text(source, "UTF-8");
        let text = serialize(&parsed.rows).unwrap();
        let reparsed = parse_text(&text, "UTF-8");

        assert_eq!(reparsed.headers, parsed.headers);
        let before: Vec<_> = parsed.rows.iter().map(|r| r.values().to_vec()).collect();
        let after: Vec<_> = reparsed.rows.iter().map(|r| r.values().to_vec()).collect();
        assert_eq!(after, before);
    }
}
