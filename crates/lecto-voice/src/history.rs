//! Debounced reading-history recording.
//!
//! Boundary events arrive many times per second during playback; writing
//! every one to the history store would swamp it for no benefit. The
//! reporter forwards at most one entry per interval and drops the rest.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use lecto_core::{HistoryEntry, ReadingHistoryStore};

/// Minimum time between recorded entries.
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Forwards playback positions to a [`ReadingHistoryStore`], at most one
/// entry per interval.
pub struct HistoryReporter {
    store: Arc<dyn ReadingHistoryStore>,
    min_interval: Duration,
    last_recorded: Option<Instant>,
}

impl HistoryReporter {
    /// Create a reporter with the default one-second interval.
    #[must_use]
    pub fn new(store: Arc<dyn ReadingHistoryStore>) -> Self {
        Self::with_interval(store, DEFAULT_MIN_INTERVAL)
    }

    /// Create a reporter with a caller-chosen interval.
    #[must_use]
    pub fn with_interval(store: Arc<dyn ReadingHistoryStore>, min_interval: Duration) -> Self {
        Self {
            store,
            min_interval,
            last_recorded: None,
        }
    }

    /// Record a playback position, unless one was recorded too recently.
    pub fn report(&mut self, document_name: &str, text: &str, absolute_index: usize, now: Instant) {
        if let Some(last) = self.last_recorded {
            if now.saturating_duration_since(last) < self.min_interval {
                return;
            }
        }
        self.last_recorded = Some(now);

        self.store.record(HistoryEntry {
            document_name: document_name.to_owned(),
            text: text.to_owned(),
            absolute_index,
            recorded_at: Utc::now(),
        });
    }
}
