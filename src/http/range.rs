//! `Range` header parsing
//!
//! Only the `bytes` unit and a single interval are understood (RFC 7233).

/// Inclusive byte interval inside a file of known size.
///
/// Always satisfies `start <= end < file_size` once produced by
/// [`parse_range_header`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    /// Inclusive
    pub end: u64,
}

impl ByteRange {
    #[inline]
    pub const fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// What to do with a request's `Range` header
#[derive(Debug, PartialEq, Eq)]
pub enum RangeParseResult {
    /// Serve this interval with 206
    Valid(ByteRange),
    /// Answer 416: outside the file, empty file, or several intervals
    NotSatisfiable,
    /// Header absent or unusable; serve the whole file
    None,
}

/// Interpret `range_header` against a file of `file_size` bytes.
///
/// Accepts `bytes=a-b`, `bytes=a-` and the suffix form `bytes=-n`. A list
/// such as `bytes=0-9,20-29` is refused as a whole rather than cut down to
/// its first interval.
pub fn parse_range_header(range_header: Option<&str>, file_size: u64) -> RangeParseResult {
    let Some(ranges) = range_header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeParseResult::None;
    };

    if ranges.contains(',') {
        return RangeParseResult::NotSatisfiable;
    }

    match ranges.split_once('-').map(|(a, b)| (a.trim(), b.trim())) {
        Some(("", count)) => suffix(count, file_size),
        Some((first, last)) => interval(first, last, file_size),
        None => RangeParseResult::None,
    }
}

/// `-n`: the final `n` bytes, clamped to the whole file
fn suffix(count: &str, file_size: u64) -> RangeParseResult {
    match parse_position(count) {
        None => RangeParseResult::None,
        Some(0) => RangeParseResult::NotSatisfiable,
        Some(_) if file_size == 0 => RangeParseResult::NotSatisfiable,
        Some(n) => RangeParseResult::Valid(ByteRange {
            start: file_size.saturating_sub(n),
            end: file_size - 1,
        }),
    }
}

/// `a-b` or `a-`, with an open end meaning the last byte
fn interval(first: &str, last: &str, file_size: u64) -> RangeParseResult {
    let start = parse_position(first);
    let end = if last.is_empty() {
        Some(file_size.saturating_sub(1))
    } else {
        parse_position(last)
    };

    let (Some(start), Some(end)) = (start, end) else {
        return RangeParseResult::None;
    };

    if start > end || end >= file_size {
        return RangeParseResult::NotSatisfiable;
    }

    RangeParseResult::Valid(ByteRange { start, end })
}

/// Digits only: `u64::from_str` would also accept a leading `+`
fn parse_position(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(start: u64, end: u64) -> RangeParseResult {
        RangeParseResult::Valid(ByteRange { start, end })
    }

    #[test]
    fn test_absent_header() {
        assert_eq!(parse_range_header(None, 100), RangeParseResult::None);
    }

    #[test]
    fn test_closed_interval() {
        assert_eq!(parse_range_header(Some("bytes=0-9"), 100), valid(0, 9));
        assert_eq!(parse_range_header(Some(" bytes=10 - 19 "), 100), valid(10, 19));
        assert_eq!(ByteRange { start: 0, end: 9 }.len(), 10);
    }

    #[test]
    fn test_open_ended() {
        assert_eq!(parse_range_header(Some("bytes=50-"), 100), valid(50, 99));
        assert_eq!(parse_range_header(Some("bytes=0-"), 100), valid(0, 99));
    }

    #[test]
    fn test_single_byte() {
        let result = parse_range_header(Some("bytes=99-99"), 100);
        assert_eq!(result, valid(99, 99));
    }

    #[test]
    fn test_suffix_range() {
        assert_eq!(parse_range_header(Some("bytes=-20"), 100), valid(80, 99));
        assert_eq!(parse_range_header(Some("bytes=-500"), 100), valid(0, 99));
        assert_eq!(
            parse_range_header(Some("bytes=-0"), 100),
            RangeParseResult::NotSatisfiable
        );
    }

    #[test]
    fn test_outside_file() {
        for header in ["bytes=200-", "bytes=100-100", "bytes=0-100", "bytes=50-10"] {
            assert_eq!(
                parse_range_header(Some(header), 100),
                RangeParseResult::NotSatisfiable,
                "{header}"
            );
        }
        for header in ["bytes=0-", "bytes=-5"] {
            assert_eq!(
                parse_range_header(Some(header), 0),
                RangeParseResult::NotSatisfiable,
                "{header} on empty file"
            );
        }
    }

    #[test]
    fn test_multi_range_rejected() {
        assert_eq!(
            parse_range_header(Some("bytes=0-9,20-29"), 100),
            RangeParseResult::NotSatisfiable
        );
    }

    #[test]
    fn test_unusable_headers_ignored() {
        assert_eq!(parse_range_header(Some("bytes=a-b"), 100), RangeParseResult::None);
        assert_eq!(parse_range_header(Some("bytes=5"), 100), RangeParseResult::None);
        assert_eq!(parse_range_header(Some("bytes=+5-9"), 100), RangeParseResult::None);
        assert_eq!(parse_range_header(Some("items=0-9"), 100), RangeParseResult::None);
        assert_eq!(parse_range_header(Some("bytes=0-9-10"), 100), RangeParseResult::None);
    }
}
