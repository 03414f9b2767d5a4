//! Local lexical analyzer: repeated words and vocabulary variety.
//!
//! A lightweight, offline complement to the remote analysis service, also
//! used as its degradation path. The thresholds have no firm rationale
//! beyond matching observed behaviour, so they are plain config values
//! rather than hard-coded invariants.

use serde::{Deserialize, Serialize};

use crate::contracts::{FindingKind, TextFinding};

/// Tunable thresholds for [`analyze_lexis`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// A word repeated within this many words of its previous occurrence
    /// is flagged.
    pub repeat_window_words: usize,

    /// Minimum unique/total word ratio before the text is flagged for low
    /// lexical variety.
    pub min_uniqueness: f32,

    /// Words at or below this length are ignored entirely (articles,
    /// prepositions, and the like repeat legitimately).
    pub min_word_len: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            repeat_window_words: 22,
            min_uniqueness: 0.45,
            min_word_len: 3,
        }
    }
}

/// Scan `text` for near-repetitions and low overall vocabulary variety.
///
/// Word comparison is case-insensitive and ignores surrounding
/// punctuation. Findings carry the byte offset of the *second* occurrence
/// so the caller can highlight the repetition itself.
#[must_use]
pub fn analyze_lexis(text: &str, config: &AnalyzerConfig) -> Vec<TextFinding> {
    let words: Vec<(usize, String)> = text
        .split_whitespace()
        .map(|w| {
            // split_whitespace yields subslices of `text`, so the offset
            // arithmetic below is sound.
            let offset = w.as_ptr() as usize - text.as_ptr() as usize;
            let cleaned: String = w
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            (offset, cleaned)
        })
        .filter(|(_, w)| w.len() > config.min_word_len)
        .collect();

    let mut findings = Vec::new();

    for (i, (offset, word)) in words.iter().enumerate() {
        let window_start = i.saturating_sub(config.repeat_window_words);
        if words[window_start..i].iter().any(|(_, prev)| prev == word) {
            findings.push(TextFinding {
                kind: FindingKind::Vocabulary,
                message: format!("\"{word}\" is repeated within a few words of itself"),
                excerpt: word.clone(),
                index: *offset,
            });
        }
    }

    if words.len() >= config.repeat_window_words {
        let unique: std::collections::HashSet<&str> =
            words.iter().map(|(_, w)| w.as_str()).collect();
        #[allow(clippy::cast_precision_loss)]
        let ratio = unique.len() as f32 / words.len() as f32;
        if ratio < config.min_uniqueness {
            findings.push(TextFinding {
                kind: FindingKind::Vocabulary,
                message: format!(
                    "low lexical variety: {unique} distinct words out of {total}",
                    unique = unique.len(),
                    total = words.len()
                ),
                excerpt: String::new(),
                index: 0,
            });
        }
    }

    findings
}
