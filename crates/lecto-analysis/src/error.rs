//! Setup errors for the analysis adapter.
//!
//! Runtime errors use `lecto_core::AnalysisError`; this covers only
//! construction-time failures.

/// Errors building an analysis client from configuration.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// The configured endpoint is not a usable base URL.
    #[error("Invalid analysis endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint {
        /// The endpoint as configured.
        endpoint: String,
        /// Why it was rejected.
        reason: String,
    },
}
