//! Playback session state.
//!
//! One session exists per `speak()` call and is superseded wholesale by
//! the next. The session owns the chunk queue and the monotonic progress
//! watermark; nothing outside the engine mutates it.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::backend::UtteranceId;
use crate::chunk::Chunk;
use crate::progress::ChunkProgress;

/// Identifies a playback session. Monotonically increasing per engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

/// Playback options, fixed for the lifetime of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeakOptions {
    /// BCP-47 language tag.
    pub language: String,

    /// Specific voice id, or `None` for the backend default.
    pub voice: Option<String>,

    /// Speech rate multiplier (1.0 = normal).
    pub rate: f32,

    /// Pitch multiplier (1.0 = normal).
    pub pitch: f32,

    /// Volume (0.0–1.0).
    pub volume: f32,
}

impl Default for SpeakOptions {
    fn default() -> Self {
        Self {
            language: "en".to_owned(),
            voice: None,
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

/// The chunk currently held by the backend, with its timing state.
#[derive(Debug)]
pub(crate) struct ActiveChunk {
    pub(crate) chunk: Chunk,
    pub(crate) utterance: UtteranceId,
    pub(crate) progress: ChunkProgress,
}

/// Complete state of one in-progress `speak()` invocation.
#[derive(Debug)]
pub(crate) struct SpeechSession {
    pub(crate) id: SessionId,

    /// The full normalized document text. Always the whole document, even
    /// when playback covers only a suffix of it.
    pub(crate) source_text: String,

    /// Byte offset within `source_text` where this session's playback
    /// begins. Chunk offsets are relative to the suffix; absolute indices
    /// add this base.
    pub(crate) base_offset: usize,

    /// Chunks not yet submitted to the backend.
    pub(crate) queue: VecDeque<Chunk>,

    /// The chunk currently held by the backend, if any.
    pub(crate) active: Option<ActiveChunk>,

    /// Highest absolute index reported so far. Non-decreasing for the
    /// session's lifetime.
    pub(crate) last_index: usize,

    /// Options fixed at `speak()` time.
    pub(crate) options: SpeakOptions,
}

impl SpeechSession {
    pub(crate) fn new(
        id: SessionId,
        source_text: String,
        base_offset: usize,
        chunks: Vec<Chunk>,
        options: SpeakOptions,
    ) -> Self {
        let first_start = chunks.first().map_or(0, |c| c.start);
        Self {
            id,
            source_text,
            base_offset,
            queue: chunks.into(),
            active: None,
            last_index: base_offset + first_start,
            options,
        }
    }

    /// Translate a chunk-relative offset on the active chunk into an
    /// absolute index into the full document.
    pub(crate) fn absolute_index(&self, relative: usize) -> Option<usize> {
        let active = self.active.as_ref()?;
        Some(self.base_offset + active.chunk.start + active.progress.clamp_offset(relative))
    }
}
