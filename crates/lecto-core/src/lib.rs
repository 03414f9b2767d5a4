//! Core domain types and port definitions for lecto.
//!
//! This crate holds everything the speech engine and its adapters share:
//! whitespace normalization with a source-index map, the edit reconciler
//! that re-anchors a reading position after the document text changes, the
//! peripheral lexical analyzer, and the ports for text analysis and reading
//! history. No adapter-specific dependencies live here; the dependency
//! arrow always points at this crate, never out of it.

pub mod analysis;
pub mod contracts;
pub mod document;
pub mod ports;
pub mod reconcile;

// Re-export commonly used types for convenience
pub use analysis::{AnalyzerConfig, analyze_lexis};
pub use contracts::{Correction, FindingKind, TextFinding};
pub use document::{Normalized, NormalizationMap, normalize_whitespace};
pub use ports::analysis::{
    AnalysisError, TextAnalyzer, fallback_correction, fallback_findings,
};
pub use ports::history::{HistoryEntry, NoopHistoryStore, ReadingHistoryStore};
pub use reconcile::remap_index;
