//! HTTP backend abstraction for the analysis service.
//!
//! A trait-based backend keeps the client testable without a network; the
//! production implementation uses reqwest with exponential backoff for
//! transient errors.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use lecto_core::AnalysisError;

use crate::config::AnalysisConfig;

/// Trait for HTTP backends that POST JSON and decode a JSON reply.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// POST `body` to `url` and deserialize the response.
    async fn post_json<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        body: &serde_json::Value,
    ) -> Result<T, AnalysisError>;
}

/// Production backend: reqwest with retry on 5xx and network errors.
pub struct ReqwestBackend {
    client: reqwest::Client,
    max_retries: u8,
    retry_base_delay_ms: u64,
    api_key: Option<String>,
}

impl ReqwestBackend {
    /// Create a backend with the given connection settings.
    #[must_use]
    pub fn new(config: &AnalysisConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to create HTTP client");

        Self {
            client,
            max_retries: config.max_retries,
            retry_base_delay_ms: config.retry_base_delay_ms,
            api_key: config.api_key.clone(),
        }
    }

    fn build_request(&self, url: &Url, body: &serde_json::Value) -> reqwest::RequestBuilder {
        let mut request = self.client.post(url.as_str()).json(body);
        if let Some(ref key) = self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }
        request
    }

    /// POST with automatic retry for transient errors.
    async fn post_with_retry(
        &self,
        url: &Url,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, AnalysisError> {
        let mut last_error: Option<AnalysisError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(
                    self.retry_base_delay_ms * 2u64.pow(u32::from(attempt) - 1),
                );
                tracing::debug!(attempt, ?delay, "Retrying analysis request");
                tokio::time::sleep(delay).await;
            }

            match self.build_request(url, body).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    // Server-side trouble is worth another attempt.
                    if status.is_server_error() && attempt < self.max_retries {
                        last_error = Some(AnalysisError::Rejected(format!(
                            "{status} from {url}"
                        )));
                        continue;
                    }

                    return Err(AnalysisError::Rejected(format!("{status} from {url}")));
                }
                Err(e) => {
                    if attempt < self.max_retries {
                        last_error = Some(AnalysisError::Transport(e.to_string()));
                        continue;
                    }
                    return Err(AnalysisError::Transport(e.to_string()));
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| AnalysisError::Transport("unknown error during request".into())))
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn post_json<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        body: &serde_json::Value,
    ) -> Result<T, AnalysisError> {
        let response = self.post_with_retry(url, body).await?;
        response
            .json()
            .await
            .map_err(|e| AnalysisError::InvalidResponse(e.to_string()))
    }
}
