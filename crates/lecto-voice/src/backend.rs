//! Speech backend contract.
//!
//! The engine drives any synthesis backend through this trait: one
//! utterance at a time, with pause/resume/cancel control and two
//! synchronously pollable flags. Progress comes back asynchronously as
//! [`BackendSignal`]s on a channel the backend is given at construction;
//! every signal is tagged with the utterance it belongs to so the engine
//! can drop events from superseded sessions.

use serde::Serialize;
use tokio::sync::mpsc;

/// Identifies one submitted utterance. Ids are unique for the lifetime of
/// an engine, never reused across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtteranceId(pub u64);

/// One chunk of text handed to the backend for synthesis.
#[derive(Debug, Clone)]
pub struct Utterance {
    /// Id echoed back in every signal about this utterance.
    pub id: UtteranceId,

    /// The text to synthesize.
    pub text: String,

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

/// Progress event for a single utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// Synthesis of the utterance has begun.
    Started,

    /// Synthesis has reached the given byte offset within the utterance
    /// text.
    Boundary(usize),

    /// Playback paused.
    Paused,

    /// Playback resumed.
    Resumed,

    /// The utterance finished naturally.
    Ended,

    /// The utterance failed. Carries the backend's message.
    Error(String),
}

/// A [`BackendEvent`] tagged with the utterance it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSignal {
    /// The utterance this event refers to.
    pub utterance: UtteranceId,

    /// What happened.
    pub event: BackendEvent,
}

/// Channel on which a backend pushes its signals.
pub type SignalSender = mpsc::UnboundedSender<BackendSignal>;

/// A voice offered by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceInfo {
    /// Stable voice identifier.
    pub id: String,

    /// Human-readable name.
    pub name: String,

    /// BCP-47 language tag of the voice.
    pub language: String,
}

/// Trait every speech synthesis backend implements.
///
/// Methods are synchronous and best-effort: `cancel` in particular is not
/// acknowledged; the engine simply stops listening to the cancelled
/// utterance's signals. `is_speaking` / `is_paused` mirror the host
/// platform's pollable global flags and may lag the signal stream
/// slightly.
pub trait SpeechBackend: Send {
    /// Submit an utterance for synthesis. At most one utterance is ever
    /// in flight; the engine waits for `Ended`/`Error` before submitting
    /// the next.
    fn speak(&mut self, utterance: Utterance);

    /// Pause the current utterance, if any.
    fn pause(&mut self);

    /// Resume a paused utterance, if any.
    fn resume(&mut self);

    /// Discard the current utterance and any queued audio. Best-effort.
    fn cancel(&mut self);

    /// Whether the backend currently holds an utterance (speaking or
    /// paused).
    fn is_speaking(&self) -> bool;

    /// Whether the backend is paused.
    fn is_paused(&self) -> bool;

    /// Voices this backend offers.
    fn voices(&self) -> Vec<VoiceInfo>;

    /// Whether the host platform actually supports synthesis. Checked
    /// once at engine construction; `false` turns every engine operation
    /// into a no-op.
    fn is_supported(&self) -> bool {
        true
    }
}

/// Backend for platforms without any synthesis support. Every operation
/// is a no-op and [`SpeechBackend::is_supported`] reports `false`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedBackend;

impl SpeechBackend for UnsupportedBackend {
    fn speak(&mut self, _utterance: Utterance) {}
    fn pause(&mut self) {}
    fn resume(&mut self) {}
    fn cancel(&mut self) {}

    fn is_speaking(&self) -> bool {
        false
    }

    fn is_paused(&self) -> bool {
        false
    }

    fn voices(&self) -> Vec<VoiceInfo> {
        Vec::new()
    }

    fn is_supported(&self) -> bool {
        false
    }
}
