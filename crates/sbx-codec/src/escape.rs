//! Percent-escaping of document keys used as filesystem names.
//!
//! Escaping must be a bijection over the valid key-character set: every key
//! written by `decompose` is recovered exactly by `recompose`.

use std::borrow::Cow;

/// Escape a document key for use as a directory or file name.
///
/// Standard URL component encoding: alphanumerics and `-_.~` pass through,
/// everything else (including `/`, `\` and `%` itself) is percent-encoded.
pub fn escape_key(key: &str) -> String {
    urlencoding::encode(key).into_owned()
}

/// Recover a document key from an escaped filesystem name.
///
/// Names that do not decode as valid UTF-8 percent-encoding are taken
/// literally; only `decompose` output is guaranteed to round-trip.
pub fn unescape_key(name: &str) -> String {
    match urlencoding::decode(name) {
        Ok(Cow::Borrowed(s)) => s.to_string(),
        Ok(Cow::Owned(s)) => s,
        Err(_) => name.to_string(),
    }
}
