//! Degrading wrapper around any [`TextAnalyzer`].
//!
//! Analysis is advisory; the reader must keep working with no network,
//! bad credentials, or a struggling service. This wrapper swallows every
//! inner error and answers with the offline fallbacks instead, so callers
//! never see a failure.

use async_trait::async_trait;

use lecto_core::{
    AnalysisError, Correction, TextAnalyzer, TextFinding, fallback_correction, fallback_findings,
};

/// [`TextAnalyzer`] that never fails: inner errors degrade to local
/// results.
pub struct ResilientAnalyzer<A> {
    inner: A,
}

impl<A: TextAnalyzer> ResilientAnalyzer<A> {
    /// Wrap `inner` with offline degradation.
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<A: TextAnalyzer> TextAnalyzer for ResilientAnalyzer<A> {
    async fn review(&self, text: &str) -> Result<Vec<TextFinding>, AnalysisError> {
        match self.inner.review(text).await {
            Ok(findings) => Ok(findings),
            Err(error) => {
                tracing::warn!(%error, "Analysis service unavailable, reviewing offline");
                Ok(fallback_findings(text))
            }
        }
    }

    async fn diagnose(&self, text: &str) -> Result<Correction, AnalysisError> {
        match self.inner.diagnose(text).await {
            Ok(correction) => Ok(correction),
            Err(error) => {
                tracing::warn!(%error, "Analysis service unavailable, returning text unchanged");
                Ok(fallback_correction(text))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysFails;

    #[async_trait]
    impl TextAnalyzer for AlwaysFails {
        async fn review(&self, _text: &str) -> Result<Vec<TextFinding>, AnalysisError> {
            Err(AnalysisError::Transport("connection refused".into()))
        }

        async fn diagnose(&self, _text: &str) -> Result<Correction, AnalysisError> {
            Err(AnalysisError::Transport("connection refused".into()))
        }
    }

    struct AlwaysEmpty;

    #[async_trait]
    impl TextAnalyzer for AlwaysEmpty {
        async fn review(&self, _text: &str) -> Result<Vec<TextFinding>, AnalysisError> {
            Ok(Vec::new())
        }

        async fn diagnose(&self, text: &str) -> Result<Correction, AnalysisError> {
            Ok(Correction {
                diagnosis: "fine".into(),
                correction: text.to_owned(),
            })
        }
    }

    #[tokio::test]
    async fn failures_degrade_to_offline_review() {
        let analyzer = ResilientAnalyzer::new(AlwaysFails);

        // The offline lexical analyzer still flags the repetition.
        let findings = analyzer
            .review("splendid work, truly splendid work")
            .await
            .unwrap();
        assert!(!findings.is_empty());
    }

    #[tokio::test]
    async fn failures_degrade_to_unchanged_correction() {
        let analyzer = ResilientAnalyzer::new(AlwaysFails);
        let correction = analyzer.diagnose("Nothing wrong here.").await.unwrap();
        assert_eq!(correction.correction, "Nothing wrong here.");
    }

    #[tokio::test]
    async fn successful_inner_results_pass_through() {
        let analyzer = ResilientAnalyzer::new(AlwaysEmpty);
        let findings = analyzer.review("anything at all").await.unwrap();
        assert!(findings.is_empty());
    }
}
