//! Analysis service connection settings.

use serde::{Deserialize, Serialize};

/// Connection settings for the remote text-analysis service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Base URL of the analysis service.
    pub endpoint: String,

    /// Bearer token, if the service requires one.
    pub api_key: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// How many times to retry transient failures.
    pub max_retries: u8,

    /// Base delay for exponential backoff between retries.
    pub retry_base_delay_ms: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8790/api/analysis".to_owned(),
            api_key: None,
            timeout_secs: 30,
            max_retries: 3,
            retry_base_delay_ms: 500,
        }
    }
}
