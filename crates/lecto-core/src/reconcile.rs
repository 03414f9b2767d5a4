//! Re-anchoring a reading position after the document text is edited.
//!
//! [`remap_index`] is pure and stateless: it knows nothing about chunks,
//! sessions, or the speech backend. Given the text before and after an
//! edit plus the last known position, it finds where that position now
//! lives. The anchor match is heuristic (an identical window appearing
//! elsewhere in the document can mislead it), so an approximate answer is
//! always preferred over a failure.

/// Bytes taken on each side of the cursor to form the anchor window.
pub const ANCHOR_RADIUS: usize = 22;

/// Minimum non-whitespace characters the trimmed anchor must contain for
/// the precision path; anything shorter falls back to delta shifting.
pub const MIN_ANCHOR_CHARS: usize = 8;

/// Remap `old_index` (a byte offset into `old_text`) into `new_text`.
///
/// Strategy, in order:
/// 1. Unchanged text: return `old_index` clamped to bounds.
/// 2. Anchor match: take a window of [`ANCHOR_RADIUS`] bytes either side
///    of the cursor, trim it, and look for it verbatim in `new_text`. A
///    hit pins the cursor to the same surrounding words even when earlier
///    parts of the document grew or shrank.
/// 3. Delta shift: move the cursor by the raw length difference between
///    the two texts, clamped to bounds.
///
/// The result is always within `[0, new_text.len())`, or `0` when
/// `new_text` is empty.
#[must_use]
pub fn remap_index(old_text: &str, new_text: &str, old_index: usize) -> usize {
    if new_text.is_empty() {
        return 0;
    }
    let clamp = |i: usize| i.min(new_text.len() - 1);

    if old_text == new_text {
        return clamp(old_index);
    }

    let old_index = old_index.min(old_text.len());
    let window_start = floor_char_boundary(old_text, old_index.saturating_sub(ANCHOR_RADIUS));
    let window_end = ceil_char_boundary(old_text, (old_index + ANCHOR_RADIUS).min(old_text.len()));
    let window = &old_text[window_start..window_end];

    let anchor = window.trim();
    let non_space = anchor.chars().filter(|c| !c.is_whitespace()).count();

    if non_space >= MIN_ANCHOR_CHARS {
        // Offset of the trimmed anchor within old_text; the cursor keeps
        // the same offset relative to the anchor after relocation.
        let anchor_start = window_start + (window.len() - window.trim_start().len());
        if let Some(pos) = new_text.find(anchor) {
            return clamp(pos + old_index.saturating_sub(anchor_start));
        }
    }

    // Anchor absent: the edit went through the cursor, or the text is too
    // short for a meaningful anchor. Shift by the length delta instead.
    #[allow(clippy::cast_possible_wrap)]
    let shifted = old_index as isize + (new_text.len() as isize - old_text.len() as isize);
    #[allow(clippy::cast_sign_loss)]
    clamp(shifted.max(0) as usize)
}

/// Largest byte offset `<= index` that lies on a char boundary.
fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Smallest byte offset `>= index` that lies on a char boundary.
fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_on_unchanged_text() {
        let text = "The quick brown fox jumps over the lazy dog.";
        assert_eq!(remap_index(text, text, 10), 10);
        // Out-of-range input clamps to the last valid offset.
        assert_eq!(remap_index(text, text, 9999), text.len() - 1);
    }

    #[test]
    fn empty_new_text_maps_to_zero() {
        assert_eq!(remap_index("something", "", 5), 0);
    }

    /// Deterministic non-repeating ASCII text, so 44-byte windows are
    /// unique and the anchor can only match at its true location.
    fn scrambled_text(len: usize) -> String {
        let mut state: u64 = 0x2545_F491_4F6C_DD1D;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
                char::from(b'a' + ((state >> 33) % 26) as u8)
            })
            .collect()
    }

    #[test]
    fn insertion_before_cursor_shifts_by_anchor() {
        // 1000-char text, paused at 500; 40 chars inserted at index 100.
        let old = scrambled_text(1000);
        let mut new = old.clone();
        new.insert_str(100, &"?".repeat(40));
        assert_eq!(new.len(), 1040);
        assert_eq!(remap_index(&old, &new, 500), 540);
    }

    #[test]
    fn deletion_before_cursor_shifts_back() {
        let old = scrambled_text(600);
        let mut new = old.clone();
        new.replace_range(50..80, "");
        assert_eq!(remap_index(&old, &new, 400), 370);
    }

    #[test]
    fn edit_through_cursor_falls_back_to_delta() {
        // The anchor window around the cursor is destroyed by the edit, so
        // the delta path must be taken.
        let old = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
        let new = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
        let idx = remap_index(old, new, 20);
        assert_eq!(idx, 20 + (new.len() - old.len()));
    }

    #[test]
    fn short_text_uses_delta_path() {
        // Fewer than MIN_ANCHOR_CHARS non-space characters in the window.
        assert_eq!(remap_index("ab cd", "ab cde", 3), 4);
    }

    #[test]
    fn result_always_in_new_text_bounds() {
        let old = "one two three four five six seven eight nine ten";
        let new = "one";
        for i in 0..old.len() {
            let idx = remap_index(old, new, i);
            assert!(idx < new.len(), "index {idx} out of bounds for {i}");
        }
    }

    #[test]
    fn anchor_survives_far_away_edit() {
        // The cursor sits deep inside an unchanged sentence; only the
        // opening sentence is rewritten.
        let old = "Start. The quick brown fox jumps over the lazy dog again. End.";
        let new = "A much longer beginning sentence than before. \
                   The quick brown fox jumps over the lazy dog again. End.";
        let cursor = old.find("lazy").unwrap();
        let remapped = remap_index(old, new, cursor);
        assert_eq!(&new[remapped..remapped + 4], "lazy");
    }

    #[test]
    fn multibyte_cursor_does_not_panic() {
        let old = "héllo wörld, ça va très bien aujourd'hui même";
        let new = "héllo wörld, ça va très bien aujourd'hui même vraiment";
        // Probe every byte offset, including non-boundaries.
        for i in 0..=old.len() {
            let _ = remap_index(old, new, i);
        }
    }
}
