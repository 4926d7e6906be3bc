//! Conditional request module
//!
//! Caching is disabled for this server (`Cache-Control: max-age=0` on
//! every success response), but conditional revalidation still works: each
//! file gets a weak validator derived from its metadata, and a matching
//! `If-None-Match` short-circuits to 304.

use std::time::{SystemTime, UNIX_EPOCH};

/// Build an `ETag` from file metadata (size and mtime)
///
/// Cheap to compute per request, and it changes whenever the site is
/// rebuilt.
pub fn metadata_etag(len: u64, modified: Option<SystemTime>) -> String {
    let mtime = modified
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_secs());
    format!("\"{len:x}-{mtime:x}\"")
}

/// Check a client's `If-None-Match` header against the computed `ETag`
///
/// Handles comma-separated lists and the `*` wildcard. Returns true when
/// the request should be answered 304.
pub fn none_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client| {
        client
            .split(',')
            .any(|candidate| candidate.trim() == etag || candidate.trim() == "*")
    })
}
