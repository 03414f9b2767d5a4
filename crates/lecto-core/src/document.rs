//! Whitespace normalization and the normalized→source index map.
//!
//! The speech engine operates on *normalized* text: whitespace runs are
//! collapsed to a single space and the ends are trimmed. Every index the
//! engine reports is an offset into that normalized text. Document readers
//! that need to highlight the *original* text apply the
//! [`NormalizationMap`] built here to translate back.

/// Normalized text plus the map back into the source it came from.
#[derive(Debug, Clone)]
pub struct Normalized {
    /// The whitespace-normalized text.
    pub text: String,

    /// Map from normalized byte offsets to source byte offsets.
    pub map: NormalizationMap,
}

/// Maps byte offsets in normalized text back to byte offsets in the source.
///
/// For every retained byte of the normalized text (including the single
/// space that stands in for a collapsed whitespace run) the map records the
/// source offset it originated from. A collapsed space maps to the first
/// whitespace character of the run it replaced.
#[derive(Debug, Clone)]
pub struct NormalizationMap {
    source_offsets: Vec<usize>,
    source_len: usize,
}

impl NormalizationMap {
    /// Translate a normalized byte offset to a source byte offset.
    ///
    /// Offsets at or past the end of the normalized text map to the source
    /// length (one past the last byte), so `to_source` is total.
    #[must_use]
    pub fn to_source(&self, normalized_offset: usize) -> usize {
        self.source_offsets
            .get(normalized_offset)
            .copied()
            .unwrap_or(self.source_len)
    }

    /// Number of bytes in the normalized text this map covers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.source_offsets.len()
    }

    /// Whether the normalized text was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source_offsets.is_empty()
    }
}

/// Collapse whitespace runs to single spaces, trim both ends, and record
/// the source offset of every retained byte.
#[must_use]
pub fn normalize_whitespace(text: &str) -> Normalized {
    let mut out = String::with_capacity(text.len());
    let mut offsets = Vec::with_capacity(text.len());
    // Start of the whitespace run currently being collapsed, if any.
    let mut pending_space: Option<usize> = None;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if pending_space.is_none() {
                pending_space = Some(i);
            }
            continue;
        }

        // Leading whitespace is trimmed: only emit the collapsed space once
        // at least one non-whitespace character has been retained.
        if let Some(run_start) = pending_space.take() {
            if !out.is_empty() {
                out.push(' ');
                offsets.push(run_start);
            }
        }

        out.push(c);
        for k in 0..c.len_utf8() {
            offsets.push(i + k);
        }
    }

    Normalized {
        text: out,
        map: NormalizationMap {
            source_offsets: offsets,
            source_len: text.len(),
        },
    }
}
