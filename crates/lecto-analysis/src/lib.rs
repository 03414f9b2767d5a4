//! HTTP adapter for the text-analysis service.
//!
//! Implements `lecto_core::TextAnalyzer` over HTTP with retry, and a
//! degrading wrapper that falls back to the offline lexical analyzer when
//! the service is unreachable.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod resilient;

pub use client::HttpTextAnalyzer;
pub use config::AnalysisConfig;
pub use error::SetupError;
pub use http::{HttpBackend, ReqwestBackend};
pub use resilient::ResilientAnalyzer;
