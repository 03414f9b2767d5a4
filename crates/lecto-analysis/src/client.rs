//! HTTP implementation of the text-analysis port.

use async_trait::async_trait;
use url::Url;

use lecto_core::{AnalysisError, Correction, TextAnalyzer, TextFinding};

use crate::config::AnalysisConfig;
use crate::error::SetupError;
use crate::http::{HttpBackend, ReqwestBackend};

/// [`TextAnalyzer`] that talks to the analysis service over HTTP.
///
/// `review` posts to `<endpoint>/review` and expects a JSON array of
/// findings; `diagnose` posts to `<endpoint>/diagnose` and expects a
/// single correction object.
pub struct HttpTextAnalyzer<B = ReqwestBackend> {
    backend: B,
    review_url: Url,
    diagnose_url: Url,
}

impl HttpTextAnalyzer<ReqwestBackend> {
    /// Build a production client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidEndpoint`] if the configured endpoint
    /// cannot be parsed as a base URL.
    pub fn new(config: &AnalysisConfig) -> Result<Self, SetupError> {
        Self::with_backend(ReqwestBackend::new(config), config)
    }
}

impl<B: HttpBackend> HttpTextAnalyzer<B> {
    /// Build a client around an arbitrary backend.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidEndpoint`] if the configured endpoint
    /// cannot be parsed as a base URL.
    pub fn with_backend(backend: B, config: &AnalysisConfig) -> Result<Self, SetupError> {
        let base = Url::parse(&config.endpoint).map_err(|e| SetupError::InvalidEndpoint {
            endpoint: config.endpoint.clone(),
            reason: e.to_string(),
        })?;

        let join = |segment: &str| -> Result<Url, SetupError> {
            let mut url = base.clone();
            url.path_segments_mut()
                .map_err(|()| SetupError::InvalidEndpoint {
                    endpoint: config.endpoint.clone(),
                    reason: "endpoint cannot be a base URL".to_owned(),
                })?
                .push(segment);
            Ok(url)
        };

        Ok(Self {
            backend,
            review_url: join("review")?,
            diagnose_url: join("diagnose")?,
        })
    }
}

#[async_trait]
impl<B: HttpBackend> TextAnalyzer for HttpTextAnalyzer<B> {
    async fn review(&self, text: &str) -> Result<Vec<TextFinding>, AnalysisError> {
        let body = serde_json::json!({ "text": text });
        self.backend.post_json(&self.review_url, &body).await
    }

    async fn diagnose(&self, text: &str) -> Result<Correction, AnalysisError> {
        let body = serde_json::json!({ "text": text });
        self.backend.post_json(&self.diagnose_url, &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::FakeBackend;
    use lecto_core::FindingKind;
    use serde_json::json;

    fn client_with(backend: FakeBackend) -> HttpTextAnalyzer<FakeBackend> {
        HttpTextAnalyzer::with_backend(backend, &AnalysisConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn review_decodes_findings() {
        let backend = FakeBackend::new().with_response(
            "review",
            json!([{
                "type": "vocabulary",
                "message": "word repeated in close proximity",
                "excerpt": "splendid",
                "index": 24
            }]),
        );

        let findings = client_with(backend)
            .review("a splendid day and a splendid view")
            .await
            .unwrap();

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::Vocabulary);
        assert_eq!(findings[0].index, 24);
    }

    #[tokio::test]
    async fn diagnose_decodes_a_correction() {
        let backend = FakeBackend::new().with_response(
            "diagnose",
            json!({
                "diagnosis": "tense mismatch in the second clause",
                "correction": "He walked home and fed the cat."
            }),
        );

        let correction = client_with(backend)
            .diagnose("He walked home and feeds the cat.")
            .await
            .unwrap();

        assert_eq!(correction.correction, "He walked home and fed the cat.");
    }

    #[tokio::test]
    async fn malformed_payload_is_an_invalid_response() {
        let backend = FakeBackend::new().with_response("review", json!({"not": "an array"}));

        let result = client_with(backend).review("anything").await;
        assert!(matches!(result, Err(AnalysisError::InvalidResponse(_))));
    }

    #[test]
    fn bad_endpoint_is_rejected_at_construction() {
        let config = AnalysisConfig {
            endpoint: "not a url".into(),
            ..AnalysisConfig::default()
        };
        let result = HttpTextAnalyzer::with_backend(FakeBackend::new(), &config);
        assert!(matches!(result, Err(SetupError::InvalidEndpoint { .. })));
    }
}
