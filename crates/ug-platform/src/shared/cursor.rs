//! Opaque pagination cursors.
//!
//! A cursor is the standard-base64 encoding of `arrayconnection:<offset>`.
//! Only canonical encodings decode, so every accepted cursor re-encodes to
//! the exact same string.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::shared::error::{PlatformError, Result};

const PREFIX: &str = "arrayconnection:";

pub fn encode_cursor(offset: i64) -> String {
    STANDARD.encode(format!("{}{}", PREFIX, offset))
}

/// Offset for `cursor`, or `InvalidCursor`.
pub fn decode_cursor(cursor: &str) -> Result<i64> {
    parse(cursor).ok_or_else(|| PlatformError::invalid_cursor(cursor))
}

fn parse(cursor: &str) -> Option<i64> {
    let bytes = STANDARD.decode(cursor).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    let digits = text.strip_prefix(PREFIX)?;

    let canonical = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'));
    if !canonical {
        return None;
    }
    digits.parse().ok()
}
