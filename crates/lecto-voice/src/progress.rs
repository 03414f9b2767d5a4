//! Per-chunk playback position estimation.
//!
//! Real boundary events are authoritative, but some backends go quiet for
//! long stretches (or never emit boundaries at all). [`ChunkProgress`]
//! tracks enough timing state to extrapolate a plausible position from
//! wall-clock time whenever the signal stream stalls, while excluding any
//! time spent paused from the estimate.

use std::time::{Duration, Instant};

/// Timing state for the chunk currently being synthesized.
#[derive(Debug)]
pub(crate) struct ChunkProgress {
    /// Byte length of the chunk text.
    chunk_len: usize,

    /// When synthesis of this chunk was submitted.
    started_at: Instant,

    /// When the most recent backend signal for this chunk arrived.
    last_signal_at: Instant,

    /// Total time spent paused so far (closed pauses only).
    paused_total: Duration,

    /// Start of the currently open pause, if paused.
    paused_since: Option<Instant>,
}

impl ChunkProgress {
    pub(crate) fn new(chunk_len: usize, now: Instant) -> Self {
        Self {
            chunk_len,
            started_at: now,
            last_signal_at: now,
            paused_total: Duration::ZERO,
            paused_since: None,
        }
    }

    /// Note that a real backend signal arrived, resetting the silence
    /// clock.
    pub(crate) fn note_signal(&mut self, now: Instant) {
        self.last_signal_at = now;
    }

    /// Begin excluding time from the estimate. Idempotent.
    pub(crate) fn pause(&mut self, now: Instant) {
        if self.paused_since.is_none() {
            self.paused_since = Some(now);
        }
    }

    /// Close the current pause and fold it into the paused total.
    pub(crate) fn resume(&mut self, now: Instant) {
        if let Some(since) = self.paused_since.take() {
            self.paused_total += now.saturating_duration_since(since);
            // The silence clock must not count the pause either.
            self.last_signal_at = now;
        }
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused_since.is_some()
    }

    /// Whether the backend has been silent long enough to extrapolate.
    pub(crate) fn silence_exceeded(&self, now: Instant, threshold: Duration) -> bool {
        self.paused_since.is_none()
            && now.saturating_duration_since(self.last_signal_at) >= threshold
    }

    /// Estimate the current relative offset from active elapsed time.
    pub(crate) fn extrapolated_offset(&self, now: Instant, chars_per_sec: f64) -> usize {
        let mut active = now.saturating_duration_since(self.started_at);
        active = active.saturating_sub(self.paused_total);
        if let Some(since) = self.paused_since {
            active = active.saturating_sub(now.saturating_duration_since(since));
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let estimated = (active.as_secs_f64() * chars_per_sec) as usize;
        self.clamp_offset(estimated)
    }

    /// Clamp a relative offset into the chunk's valid range
    /// `[0, len - 1]`.
    pub(crate) fn clamp_offset(&self, offset: usize) -> usize {
        offset.min(self.chunk_len.saturating_sub(1))
    }
}
