//! Payload encoding and decoding.
//!
//! Wire grammar: `CODE (SEP field)*` where `SEP` is [`FIELD_SEPARATOR`].
//! A literal separator inside a field travels as `\¤`; decoding splits only
//! on separators whose single preceding character is not a backslash.
//!
//! The lookback is exactly one character, which makes a field ending in a
//! backslash ambiguous on the wire: the encoder side therefore rejects such
//! fields ([`is_wire_safe`]) and the decoder drops any payload whose last
//! field still ends in one. Doubled backslashes directly before a separator
//! remain inherently ambiguous under this scheme; callers that need a
//! trailing backslash must encode it themselves at a higher layer.

use crate::error::{Error, Result};
use crate::request::RequestKind;

/// The reserved field separator, chosen because it does not occur in
/// ordinary application text.
pub const FIELD_SEPARATOR: char = '¤';

/// The escape character placed before a literal separator inside a field.
pub const ESCAPE: char = '\\';

const ESCAPED_SEPARATOR: &str = "\\¤";
const SEPARATOR_STR: &str = "¤";

/// A decoded payload: the request kind plus its fields, in wire order,
/// with escapes collapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub kind: RequestKind,
    pub fields: Vec<String>,
}

/// Whether a field string can be put on the wire without becoming ambiguous.
///
/// Only strings ending in a backslash are unsafe; everything else, including
/// strings containing separators or interior backslashes, round-trips.
pub fn is_wire_safe(field: &str) -> bool {
    !field.ends_with(ESCAPE)
}

/// Encode a request kind and its fields into a single payload.
///
/// Fields containing the separator are escaped. Callers are responsible for
/// never passing a field that ends in a backslash (see [`is_wire_safe`]);
/// the command layer enforces this before any message is built.
pub fn encode<S: AsRef<str>>(kind: RequestKind, fields: &[S]) -> String {
    let mut payload = String::from(kind.code());
    for field in fields {
        payload.push(FIELD_SEPARATOR);
        payload.push_str(&escape(field.as_ref()));
    }
    payload
}

/// Decode a payload into its request kind and fields.
///
/// Fails if the payload has no code, the code is unknown, or the last field
/// ends in an unescaped backslash. A failed decode carries no partial result.
pub fn decode(payload: &str) -> Result<Decoded> {
    let mut segments = split_unescaped(payload).into_iter();
    // split_unescaped always yields at least one segment
    let code = segments.next().unwrap_or_default();
    if code.is_empty() {
        return Err(Error::MissingCode);
    }
    let kind =
        RequestKind::from_code(code).ok_or_else(|| Error::UnknownCode(code.to_string()))?;

    let fields: Vec<String> = segments.map(unescape).collect();
    if fields.last().is_some_and(|last| last.ends_with(ESCAPE)) {
        return Err(Error::TrailingBackslash);
    }
    Ok(Decoded { kind, fields })
}

fn escape(field: &str) -> String {
    field.replace(FIELD_SEPARATOR, ESCAPED_SEPARATOR)
}

fn unescape(segment: &str) -> String {
    segment.replace(ESCAPED_SEPARATOR, SEPARATOR_STR)
}

/// Split on separators not immediately preceded by a backslash.
fn split_unescaped(payload: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut prev = None;
    for (idx, ch) in payload.char_indices() {
        if ch == FIELD_SEPARATOR && prev != Some(ESCAPE) {
            segments.push(&payload[start..idx]);
            start = idx + ch.len_utf8();
        }
        prev = Some(ch);
    }
    segments.push(&payload[start..]);
    segments
}
