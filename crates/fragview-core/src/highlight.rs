use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{FragviewError, Result};
use crate::models::{Line, MatchedLine};

/// Default markers wrapped around the matched span. Surfaces with their own
/// presentation (the CLI renderer, for one) supply their own literals.
pub const DEFAULT_OPEN_MARKER: &str = "<span class=\"match-highlighted\">";
pub const DEFAULT_CLOSE_MARKER: &str = "</span>";

/// Fixed-capacity mapping from marker literal to its encoded bytes, populated
/// at construction. The key set is statically known, so there is no lazy fill
/// and no eviction; this is not a general-purpose cache.
#[derive(Debug, Clone)]
pub struct MarkerCache {
    entries: Vec<(String, Vec<u8>)>,
}

impl MarkerCache {
    #[must_use]
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = markers
            .into_iter()
            .map(Into::into)
            .map(|marker| {
                let bytes = marker.as_bytes().to_vec();
                (marker, bytes)
            })
            .collect();
        Self { entries }
    }

    /// Cached encoded form for `key`, or `None` when `key` is not part of the
    /// fixed marker set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(marker, _)| marker == key)
            .map(|(_, bytes)| bytes.as_slice())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Renders lines as displayable text, wrapping the matched byte range of a
/// [`MatchedLine`] in the configured marker literals.
#[derive(Debug, Clone)]
pub struct Highlighter {
    open: String,
    close: String,
    cache: MarkerCache,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(DEFAULT_OPEN_MARKER, DEFAULT_CLOSE_MARKER)
    }
}

impl Highlighter {
    #[must_use]
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        let open = open.into();
        let close = close.into();
        let cache = MarkerCache::new([open.clone(), close.clone()]);
        Self { open, close, cache }
    }

    /// Decode a context line to displayable text. No marking is applied.
    pub fn render_plain(&self, line: &Line) -> Result<String> {
        let bytes = decode_content(&line.content)?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Render a matched line with the matched byte range wrapped in the open
    /// and close markers.
    ///
    /// The matched range is sliced on raw bytes, not decoded characters; the
    /// backend guarantees the offsets never split a multi-byte sequence. When
    /// that contract is violated the reassembled output fails UTF-8 decoding
    /// and the `Encoding` error surfaces instead of a repaired string.
    pub fn render_matched(&self, line: &MatchedLine) -> Result<String> {
        let start = line.line.start_index;
        let end = line.line.end_index;
        let matched_start = line.matched_start_index;
        let matched_end = line.matched_end_index;
        if matched_start < start || matched_end < matched_start || matched_end > end {
            return Err(FragviewError::InvalidRange {
                start,
                end,
                matched_start,
                matched_end,
            });
        }

        let bytes = decode_content(&line.line.content)?;
        let rel_start = matched_start - start;
        let rel_end = matched_end - start;
        if rel_end > bytes.len() {
            return Err(FragviewError::InvalidRange {
                start,
                end,
                matched_start,
                matched_end,
            });
        }

        let open = self.marker_bytes(&self.open);
        let close = self.marker_bytes(&self.close);
        let mut out = Vec::with_capacity(bytes.len() + open.len() + close.len());
        out.extend_from_slice(&bytes[..rel_start]);
        out.extend_from_slice(open);
        out.extend_from_slice(&bytes[rel_start..rel_end]);
        out.extend_from_slice(close);
        out.extend_from_slice(&bytes[rel_end..]);
        Ok(String::from_utf8(out)?)
    }

    #[must_use]
    pub fn open_marker(&self) -> &str {
        &self.open
    }

    #[must_use]
    pub fn close_marker(&self) -> &str {
        &self.close
    }

    fn marker_bytes<'a>(&'a self, key: &'a str) -> &'a [u8] {
        self.cache.get(key).unwrap_or_else(|| key.as_bytes())
    }
}

/// Decode a line's base64 `content` field to its raw bytes.
pub fn decode_content(content: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(content)?)
}
