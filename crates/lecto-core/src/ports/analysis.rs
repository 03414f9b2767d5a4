//! Text-analysis port definition and its local degradation path.
//!
//! The remote service reviews a span of text and returns findings, or
//! diagnoses the whole text and proposes a correction. Network or auth
//! failure must never disturb playback, so this module also provides the
//! local fallbacks an adapter degrades to.

use async_trait::async_trait;
use thiserror::Error;

use crate::analysis::{AnalyzerConfig, analyze_lexis};
use crate::contracts::{Correction, TextFinding};

/// Errors an analysis adapter can report.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The request never produced a usable response.
    #[error("Analysis service unreachable: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("Analysis service rejected the request: {0}")]
    Rejected(String),

    /// The response body could not be decoded.
    #[error("Malformed analysis response: {0}")]
    InvalidResponse(String),
}

/// Port for the external text-analysis service.
///
/// Implementations handle transport and auth; callers that must not fail
/// wrap them so errors degrade to [`fallback_findings`] /
/// [`fallback_correction`].
#[async_trait]
pub trait TextAnalyzer: Send + Sync {
    /// Review a span of text and return any findings.
    async fn review(&self, text: &str) -> Result<Vec<TextFinding>, AnalysisError>;

    /// Diagnose the whole text and propose a correction.
    async fn diagnose(&self, text: &str) -> Result<Correction, AnalysisError>;
}

/// Local findings used when the remote service is unavailable: the
/// offline lexical analyzer with default thresholds.
#[must_use]
pub fn fallback_findings(text: &str) -> Vec<TextFinding> {
    analyze_lexis(text, &AnalyzerConfig::default())
}

/// Local correction used when the remote service is unavailable. The text
/// is returned unchanged with an explanatory diagnosis.
#[must_use]
pub fn fallback_correction(text: &str) -> Correction {
    Correction {
        diagnosis: "The analysis service could not be reached; showing the text unchanged."
            .to_owned(),
        correction: text.to_owned(),
    }
}
