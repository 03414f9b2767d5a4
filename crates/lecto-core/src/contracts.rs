//! Wire contracts for the external text-analysis service.
//!
//! These DTOs define the single call contract the reader has with the
//! analysis service; the transport adapter lives in `lecto-analysis`.

use serde::{Deserialize, Serialize};

/// Category of a finding reported by the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingKind {
    /// Reasoning or coherence issue in the text.
    Logic,
    /// Grammatical mistake.
    Grammar,
    /// Word choice / repetition / variety issue.
    Vocabulary,
}

/// One issue found in a reviewed span of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFinding {
    /// Category of the issue.
    #[serde(rename = "type")]
    pub kind: FindingKind,

    /// Human-readable description.
    pub message: String,

    /// The offending excerpt, verbatim.
    pub excerpt: String,

    /// Byte offset of the excerpt in the reviewed text.
    pub index: usize,
}

/// A whole-text diagnosis with a suggested correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    /// What is wrong with the text, in prose.
    pub diagnosis: String,

    /// The corrected text.
    pub correction: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finding_kind_serializes_lowercase() {
        let f = TextFinding {
            kind: FindingKind::Vocabulary,
            message: "repeated word".into(),
            excerpt: "very".into(),
            index: 12,
        };
        let json = serde_json::to_string(&f).unwrap();
        assert!(json.contains("\"type\":\"vocabulary\""));

        let back: TextFinding = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);
    }

    #[test]
    fn correction_round_trips() {
        let c = Correction {
            diagnosis: "tense mismatch".into(),
            correction: "He walked home.".into(),
        };
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(serde_json::from_str::<Correction>(&json).unwrap(), c);
    }
}
