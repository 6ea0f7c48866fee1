//! Filesystem paths carried inside a single URL path segment.
//!
//! The client replaces each path separator with [`MARKER`] and percent-encodes
//! the rest. Stored catalog paths and frontend links depend on this exact
//! marker; changing it breaks every existing URL.

use std::path::{PathBuf, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Stand-in for the native path separator.
pub const MARKER: &str = "__SLASH__";

/// Everything except RFC 3986 unreserved characters.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-decode `segment`, then turn every marker back into a separator.
///
/// Invalid UTF-8 after decoding is replaced lossily. The result is not checked
/// for existence.
pub fn decode(segment: &str) -> PathBuf {
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    PathBuf::from(decoded.replace(MARKER, MAIN_SEPARATOR_STR))
}

/// Inverse of [`decode`]: replace separators with the marker and
/// percent-encode the result.
pub fn encode(path: &std::path::Path) -> String {
    let raw = path.to_string_lossy().replace(MAIN_SEPARATOR, MARKER);
    utf8_percent_encode(&raw, SEGMENT).to_string()
}
