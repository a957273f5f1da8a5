//! Text decoding for raw CSV bytes.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use tracing::debug;

/// Encoding tried first.
pub const PRIMARY_ENCODING: &Encoding = UTF_8;

/// Single-byte legacy encoding used when the primary attempt is inconclusive.
///
/// `windows-1252` is what the `latin1` and `ISO-8859-1` labels resolve to in
/// browsers, so spreadsheets exported as "Latin-1" decode the same way here.
pub const FALLBACK_ENCODING: &Encoding = WINDOWS_1252;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Strictly decode `bytes` as UTF-8, dropping a leading BOM.
///
/// Returns `None` when the input contains malformed sequences.
pub fn decode_primary(bytes: &[u8]) -> Option<String> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let decoded = PRIMARY_ENCODING.decode_without_bom_handling_and_without_replacement(bytes);
    if decoded.is_none() {
        debug!("Input is not valid {}", PRIMARY_ENCODING.name());
    }
    decoded.map(|text| text.into_owned())
}

/// Decode `bytes` with the fallback encoding. Every byte maps to a character,
/// so this never fails.
pub fn decode_fallback(bytes: &[u8]) -> String {
    let (text, had_errors) = FALLBACK_ENCODING.decode_without_bom_handling(bytes);
    if had_errors {
        debug!("Replacement characters inserted while decoding {}", FALLBACK_ENCODING.name());
    }
    text.into_owned()
}
