//! Splitting normalized text into bounded, speakable chunks.
//!
//! Sentences are the preferred unit: synthesis backends handle them best
//! and pause naturally between them. A sentence that exceeds the length
//! cap is packed greedily into word-boundary sub-chunks instead. Every
//! chunk remembers the offset it starts at so playback progress can be
//! reported in absolute document positions.

/// Default maximum byte length per chunk.
pub const MAX_CHUNK_LEN: usize = 220;

/// A contiguous span of the normalized text, submitted to the backend as
/// one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The chunk text. Never empty; at most the length cap, except for a
    /// single word that is itself longer than the cap.
    pub text: String,

    /// Byte offset of the first character within the text that was
    /// chunked.
    pub start: usize,
}

impl Chunk {
    /// Offset of the last byte of this chunk (inclusive).
    #[must_use]
    pub fn last_offset(&self) -> usize {
        self.start + self.text.len().saturating_sub(1)
    }
}

/// Split text into chunks of at most [`MAX_CHUNK_LEN`] bytes.
///
/// The input is expected to be whitespace-normalized (see
/// `lecto_core::document::normalize_whitespace`); offsets are relative to
/// the input as given. For normalized input, joining the chunk texts with
/// single spaces reconstructs it exactly.
#[must_use]
pub fn split_into_chunks(text: &str) -> Vec<Chunk> {
    split_into_chunks_with(text, MAX_CHUNK_LEN)
}

/// Like [`split_into_chunks`] with a caller-chosen length cap.
#[must_use]
pub fn split_into_chunks_with(text: &str, max_len: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();

    for (start, sentence) in split_sentences(text) {
        if sentence.len() <= max_len {
            chunks.push(Chunk {
                text: sentence.to_owned(),
                start,
            });
        } else {
            pack_words(sentence, start, max_len, &mut chunks);
        }
    }

    chunks
}

/// Split text into sentences at `.` `!` `?` followed by whitespace or
/// end-of-input, keeping the terminator with its sentence. Text without
/// any terminator is one long "sentence".
fn split_sentences(text: &str) -> Vec<(usize, &str)> {
    let mut sentences = Vec::new();
    let mut start: Option<usize> = None;

    let mut iter = text.char_indices().peekable();
    while let Some((i, c)) = iter.next() {
        if start.is_none() && !c.is_whitespace() {
            start = Some(i);
        }

        if matches!(c, '.' | '!' | '?') {
            // Runs like "?!" end on the last terminator of the run, since
            // only that one is followed by whitespace or end-of-input.
            let at_boundary = iter.peek().is_none_or(|&(_, next)| next.is_whitespace());
            if at_boundary {
                if let Some(s) = start.take() {
                    sentences.push((s, &text[s..i + c.len_utf8()]));
                }
            }
        }
    }

    // Trailing text without a terminator.
    if let Some(s) = start {
        let rest = text[s..].trim_end();
        if !rest.is_empty() {
            sentences.push((s, rest));
        }
    }

    sentences
}

/// Greedily pack the words of an oversized sentence into sub-chunks of at
/// most `max_len` bytes, each tagged with the offset of its first word.
fn pack_words(sentence: &str, sentence_start: usize, max_len: usize, out: &mut Vec<Chunk>) {
    let mut current = String::new();
    let mut current_start = sentence_start;

    for word in sentence.split_whitespace() {
        // split_whitespace yields subslices of `sentence`, so pointer
        // arithmetic recovers each word's offset.
        let word_offset = sentence_start + (word.as_ptr() as usize - sentence.as_ptr() as usize);

        if !current.is_empty() && current.len() + 1 + word.len() > max_len {
            out.push(Chunk {
                text: std::mem::take(&mut current),
                start: current_start,
            });
        }

        if current.is_empty() {
            current_start = word_offset;
            // A single word longer than the cap cannot be split further
            // at a word boundary; emit it oversized rather than dropping
            // text. Backends cope with long tokens better than with gaps.
            current.push_str(word);
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        out.push(Chunk {
            text: current,
            start: current_start,
        });
    }
}
