//! Engine configuration.
//!
//! The timing constants come from observed speech-synthesis behaviour
//! rather than any formal model, so they are plain config values with the
//! defaults the engine was tuned against.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunable parameters of the speech engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum byte length of a single speakable chunk.
    pub max_chunk_len: usize,

    /// How long the backend may stay silent (no boundary events) during
    /// active playback before the estimator starts extrapolating.
    pub boundary_silence_ms: u64,

    /// Cadence of the extrapolation timer.
    pub tick_interval_ms: u64,

    /// Assumed synthesis speed at rate 1.0, in characters per second.
    pub base_chars_per_sec: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_chunk_len: 220,
            boundary_silence_ms: 500,
            tick_interval_ms: 180,
            base_chars_per_sec: 11.0,
        }
    }
}

impl EngineConfig {
    /// Boundary-silence threshold as a [`Duration`].
    #[must_use]
    pub const fn boundary_silence(&self) -> Duration {
        Duration::from_millis(self.boundary_silence_ms)
    }

    /// Tick cadence as a [`Duration`].
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
