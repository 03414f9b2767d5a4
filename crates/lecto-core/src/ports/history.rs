//! Reading-history port definition.
//!
//! The engine reports `(document name, text, absolute index)` on a
//! debounced cadence; where and how that is stored is an adapter concern.

use chrono::{DateTime, Utc};

/// One debounced progress report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Display name of the document being read.
    pub document_name: String,

    /// The document text the index refers to.
    pub text: String,

    /// Last reported absolute character index.
    pub absolute_index: usize,

    /// When the report was made.
    pub recorded_at: DateTime<Utc>,
}

/// Port for persisting reading progress.
pub trait ReadingHistoryStore: Send + Sync {
    /// Record a progress snapshot. Implementations overwrite or append as
    /// they see fit; the caller has already debounced.
    fn record(&self, entry: HistoryEntry);
}

/// Store that discards every entry. Useful default for callers that do
/// not track history.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHistoryStore;

impl ReadingHistoryStore for NoopHistoryStore {
    fn record(&self, _entry: HistoryEntry) {}
}
