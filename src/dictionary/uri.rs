//! URI canonicalization for dictionary keys
//!
//! The primary site percent-encodes fullwidth quotation marks inconsistently:
//! `/item/%E2%80%9C总统%E2%80%9D/412` and `/item/总统/412` are the same page.
//! Both forms must collapse onto one dictionary key.

use percent_encoding::percent_decode_str;
use regex::Regex;
use std::sync::OnceLock;

use crate::models::SourcePolicy;

/// Lower-case, drop query/fragment and strip quotation marks around segments
pub fn canonical_uri(raw: &str) -> String {
    static ENCODED_QUOTES: OnceLock<Regex> = OnceLock::new();
    static LITERAL_QUOTES: OnceLock<Regex> = OnceLock::new();

    let lowered = raw.trim().to_lowercase();
    let path = lowered
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or_default();

    let encoded = ENCODED_QUOTES.get_or_init(|| {
        Regex::new(r"%e2%80%9c([^/]*?)%e2%80%9d").expect("Invalid regex pattern")
    });
    let literal =
        LITERAL_QUOTES.get_or_init(|| Regex::new(r"“([^/]*?)”").expect("Invalid regex pattern"));

    let path = encoded.replace_all(path, "${1}");
    literal.replace_all(&path, "${1}").into_owned()
}

/// Canonicalize and keep the fixed-depth prefix used as dictionary key
pub fn normalize_uri(raw: &str) -> String {
    truncate_segments(&canonical_uri(raw), SourcePolicy::URI_SEGMENT_DEPTH)
}

/// Keep the first `depth` `/`-delimited segments
pub fn truncate_segments(uri: &str, depth: usize) -> String {
    uri.split('/').take(depth).collect::<Vec<_>>().join("/")
}

/// Drop the last `/`-delimited segment, `None` when nothing would remain
pub fn drop_last_segment(uri: &str) -> Option<&str> {
    let idx = uri.rfind('/')?;
    let parent = &uri[..idx];
    if parent.is_empty() {
        None
    } else {
        Some(parent)
    }
}

/// Percent-decode a URI, replacing invalid UTF-8 sequences
pub fn decode_uri(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}
