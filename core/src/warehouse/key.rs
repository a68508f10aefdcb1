//! Content-derived surrogate keys
//!
//! A key is the MD5 digest of a canonical JSON rendering of the row's fields:
//! every value coerced to a string, members sorted by name. The rendering is
//! byte-compatible with keys already persisted by earlier ingest runs, so the
//! separators (`", "`, `": "`) and the ASCII-only escaping are part of the
//! contract.

use crate::types::Fields;
use md5::{Digest, Md5};
use std::collections::BTreeMap;

/// Derives the surrogate key of a field mapping
///
/// Insensitive to field order. Null values and the literal text `"NULL"`
/// produce the same key.
///
/// # Example
///
/// ```
/// use dicomstar_core::{derive_key, Fields};
///
/// let a = Fields::new().with("year", 2023_i64).with("month", 7_i64);
/// let b = Fields::new().with("month", 7_i64).with("year", 2023_i64);
///
/// assert_eq!(derive_key(&a), derive_key(&b));
/// assert_eq!(derive_key(&a).len(), 32);
/// ```
pub fn derive_key(fields: &Fields) -> String {
    let digest = Md5::digest(canonical_form(fields).as_bytes());
    hex::encode(digest)
}

/// Canonical serialization hashed by [`derive_key`]
pub fn canonical_form(fields: &Fields) -> String {
    let sorted: BTreeMap<&str, String> = fields
        .iter()
        .map(|(name, value)| (name, value.coerce()))
        .collect();

    let mut out = String::from("{");
    for (i, (name, value)) in sorted.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        push_json_string(&mut out, name);
        out.push_str(": ");
        push_json_string(&mut out, value);
    }
    out.push('}');
    out
}

/// Appends `s` as a JSON string literal restricted to printable ASCII
fn push_json_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            ' '..='~' => out.push(c),
            _ => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{:04x}", unit));
                }
            }
        }
    }
    out.push('"');
}
