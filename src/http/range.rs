//! `Range` header resolution for single byte ranges.

use serde::Deserialize;

/// How a range with no start (`bytes=-N`) is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuffixMode {
    /// RFC 7233: the last N bytes of the file.
    #[default]
    Standard,
    /// Missing start means 0, so `bytes=-N` covers bytes `0..=N`.
    Legacy,
}

/// Inclusive byte span within a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteSpan {
    pub start: u64,
    pub end: u64,
}

impl ByteSpan {
    /// Number of bytes covered; never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    Full,
    Partial(ByteSpan),
    NotSatisfiable,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed Range header: {0:?}")]
pub struct MalformedRange(pub String);

/// Resolve an optional `Range` header value against a file of `file_size` bytes.
///
/// Only the first range of a multi-range request is honored. A bound larger
/// than the file size is unsatisfiable regardless of the other bound; an end
/// equal to the file size is clamped to the last byte.
pub fn resolve(
    header: Option<&str>,
    file_size: u64,
    suffix: SuffixMode,
) -> Result<RangeOutcome, MalformedRange> {
    let Some(header) = header else {
        return Ok(RangeOutcome::Full);
    };
    let malformed = || MalformedRange(header.to_owned());

    let spec = header.trim().strip_prefix("bytes=").ok_or_else(malformed)?;
    let first = spec.split(',').next().unwrap_or_default().trim();
    let (start_str, end_str) = first.split_once('-').ok_or_else(malformed)?;
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    let parse = |s: &str| s.parse::<u64>().map_err(|_| malformed());

    let (start, end) = match (start_str.is_empty(), end_str.is_empty()) {
        (true, true) => return Err(malformed()),
        (false, _) => {
            let start = parse(start_str)?;
            let end = if end_str.is_empty() {
                file_size.saturating_sub(1)
            } else {
                parse(end_str)?
            };
            (start, end)
        }
        (true, false) => {
            let n = parse(end_str)?;
            match suffix {
                SuffixMode::Legacy => (0, n),
                SuffixMode::Standard => {
                    if n == 0 || file_size == 0 {
                        return Ok(RangeOutcome::NotSatisfiable);
                    }
                    (file_size.saturating_sub(n), file_size - 1)
                }
            }
        }
    };

    if start > file_size || end > file_size || file_size == 0 {
        return Ok(RangeOutcome::NotSatisfiable);
    }

    let end = end.min(file_size - 1);
    if start > end {
        return Ok(RangeOutcome::NotSatisfiable);
    }

    Ok(RangeOutcome::Partial(ByteSpan { start, end }))
}
