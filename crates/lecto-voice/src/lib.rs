//! Chunked text-to-speech playback with live position tracking.
//!
//! Documents are split into speakable chunks ([`chunk`]), fed to a
//! platform backend one utterance at a time ([`backend`]), and driven by
//! a state machine that reports a monotonically non-decreasing absolute
//! position as playback progresses ([`engine`]). [`service`] wraps the
//! engine in an async task for use from application code.

pub mod backend;
pub mod chunk;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
mod progress;
pub mod service;
mod session;

pub use backend::{
    BackendEvent, BackendSignal, SignalSender, SpeechBackend, UnsupportedBackend, Utterance,
    UtteranceId, VoiceInfo,
};
pub use chunk::{Chunk, MAX_CHUNK_LEN, split_into_chunks, split_into_chunks_with};
pub use config::EngineConfig;
pub use engine::{SpeechEngine, SpeechEvent, SpeechSnapshot, SpeechStatus};
pub use error::SpeechError;
pub use history::HistoryReporter;
pub use service::{SpeechHandle, SpeechService};
pub use session::{SessionId, SpeakOptions};
