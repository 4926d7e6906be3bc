//! Byte-range resolution module
//!
//! Resolves a `Range` header against a known file size into concrete byte
//! bounds (RFC 7233, single `bytes` range only). Multi-range and malformed
//! headers are ignored rather than rejected: the caller serves the full
//! body, which every client accepts.

/// A resolved inclusive byte range within a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    /// Number of bytes the range covers (a resolved range is never empty)
    #[must_use]
    pub const fn byte_len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Outcome of resolving the `Range` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// No usable range; serve the whole file
    Full,
    /// Serve the given bounds with 206
    Partial(ByteRange),
    /// Range cannot be satisfied; answer 416
    Unsatisfiable,
}

/// Resolve a `Range` header value against the file size
///
/// Supported forms: `bytes=start-end`, `bytes=start-`, `bytes=-suffix`.
///
/// # Examples
/// ```
/// use sitekit::http::range::{resolve_range, ByteRange, RangeOutcome};
///
/// assert_eq!(
///     resolve_range(Some("bytes=0-99"), 1000),
///     RangeOutcome::Partial(ByteRange { start: 0, end: 99 })
/// );
/// assert_eq!(resolve_range(None, 1000), RangeOutcome::Full);
/// assert_eq!(resolve_range(Some("bytes=2000-"), 1000), RangeOutcome::Unsatisfiable);
/// ```
pub fn resolve_range(header: Option<&str>, file_size: usize) -> RangeOutcome {
    let Some(spec) = header.and_then(|h| h.strip_prefix("bytes=")) else {
        return RangeOutcome::Full;
    };

    // Single range only; multi-range requests get the full body
    if spec.contains(',') {
        return RangeOutcome::Full;
    }

    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeOutcome::Full;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    if file_size == 0 {
        return RangeOutcome::Unsatisfiable;
    }

    if start_str.is_empty() {
        return resolve_suffix(end_str, file_size);
    }

    let Ok(start) = start_str.parse::<usize>() else {
        return RangeOutcome::Full;
    };
    if start >= file_size {
        return RangeOutcome::Unsatisfiable;
    }

    let end = if end_str.is_empty() {
        file_size - 1
    } else {
        match end_str.parse::<usize>() {
            // Clients may ask past the end; clamp instead of failing
            Ok(e) => e.min(file_size - 1),
            Err(_) => return RangeOutcome::Full,
        }
    };

    if start > end {
        return RangeOutcome::Unsatisfiable;
    }

    RangeOutcome::Partial(ByteRange { start, end })
}

/// Resolve a suffix form (`bytes=-N`: the final N bytes)
fn resolve_suffix(suffix_str: &str, file_size: usize) -> RangeOutcome {
    let Ok(suffix) = suffix_str.parse::<usize>() else {
        return RangeOutcome::Full;
    };
    if suffix == 0 {
        return RangeOutcome::Unsatisfiable;
    }
    RangeOutcome::Partial(ByteRange {
        start: file_size.saturating_sub(suffix),
        end: file_size - 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_header_is_full() {
        assert_eq!(resolve_range(None, 100), RangeOutcome::Full);
    }

    #[test]
    fn test_bounded_range() {
        let out = resolve_range(Some("bytes=0-9"), 100);
        assert_eq!(out, RangeOutcome::Partial(ByteRange { start: 0, end: 9 }));
        if let RangeOutcome::Partial(r) = out {
            assert_eq!(r.byte_len(), 10);
        }
    }

    #[test]
    fn test_open_ended_range() {
        assert_eq!(
            resolve_range(Some("bytes=50-"), 100),
            RangeOutcome::Partial(ByteRange { start: 50, end: 99 })
        );
    }

    #[test]
    fn test_suffix_range() {
        assert_eq!(
            resolve_range(Some("bytes=-20"), 100),
            RangeOutcome::Partial(ByteRange { start: 80, end: 99 })
        );
        // A suffix longer than the file covers the whole file
        assert_eq!(
            resolve_range(Some("bytes=-500"), 100),
            RangeOutcome::Partial(ByteRange { start: 0, end: 99 })
        );
    }

    #[test]
    fn test_end_clamped_to_file_size() {
        assert_eq!(
            resolve_range(Some("bytes=90-200"), 100),
            RangeOutcome::Partial(ByteRange { start: 90, end: 99 })
        );
    }

    #[test]
    fn test_unsatisfiable() {
        assert_eq!(
            resolve_range(Some("bytes=200-"), 100),
            RangeOutcome::Unsatisfiable
        );
        assert_eq!(
            resolve_range(Some("bytes=-0"), 100),
            RangeOutcome::Unsatisfiable
        );
        assert_eq!(
            resolve_range(Some("bytes=5-3"), 100),
            RangeOutcome::Unsatisfiable
        );
        assert_eq!(
            resolve_range(Some("bytes=0-"), 0),
            RangeOutcome::Unsatisfiable
        );
    }

    #[test]
    fn test_ignored_forms_serve_full_body() {
        assert_eq!(resolve_range(Some("bytes=a-b"), 100), RangeOutcome::Full);
        assert_eq!(
            resolve_range(Some("bytes=0-9,20-29"), 100),
            RangeOutcome::Full
        );
        assert_eq!(resolve_range(Some("items=0-9"), 100), RangeOutcome::Full);
        assert_eq!(resolve_range(Some("bytes=10"), 100), RangeOutcome::Full);
    }
}
