//! The speech-synchronization engine: playback driver and state machine.
//!
//! ```text
//!   Idle → Speaking → {Paused, Idle}
//!            ▲            │
//!            └────────────┘
//! ```
//!
//! The engine owns the chunk queue and feeds the backend one utterance at
//! a time, reporting a monotonically non-decreasing absolute character
//! index as playback progresses. It is deliberately synchronous and
//! timer-free: callers (normally [`crate::service::SpeechService`]) feed
//! it commands, backend signals, and periodic `tick(now)` calls, which
//! makes every state transition unit-testable with a fake clock.
//!
//! All indices are byte offsets into the *normalized* document text (see
//! `lecto_core::document`); callers holding the original text translate
//! them through the [`lecto_core::NormalizationMap`].

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use lecto_core::document::normalize_whitespace;
use lecto_core::reconcile::remap_index;

use crate::backend::{
    BackendEvent, BackendSignal, SpeechBackend, Utterance, UtteranceId, VoiceInfo,
};
use crate::chunk::split_into_chunks_with;
use crate::config::EngineConfig;
use crate::progress::ChunkProgress;
use crate::session::{ActiveChunk, SessionId, SpeakOptions, SpeechSession};

// ── Observable state ───────────────────────────────────────────────

/// Current playback status, owned exclusively by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeechStatus {
    /// No session in progress.
    Idle,

    /// A session is playing.
    Speaking,

    /// A session is paused (explicitly, or by a concurrent text edit).
    Paused,
}

/// Events emitted by the engine to the UI / application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// Playback status changed.
    StateChanged(SpeechStatus),

    /// Playback has reached this absolute index. Non-decreasing within a
    /// session.
    Boundary(usize),

    /// A chunk failed to synthesize and was skipped.
    ChunkSkipped {
        /// Absolute index the skipped chunk started at.
        start: usize,
        /// The backend's error message.
        message: String,
    },

    /// The session finished naturally (queue drained). Fired exactly once
    /// per session.
    Ended,
}

/// Read-only snapshot of the engine for the UI layer.
#[derive(Debug, Clone, Serialize)]
pub struct SpeechSnapshot {
    /// Current status.
    pub status: SpeechStatus,

    /// Whether a session is actively playing.
    pub is_speaking: bool,

    /// Whether a session is paused.
    pub is_paused: bool,

    /// Whether the host platform supports synthesis at all.
    pub is_supported: bool,

    /// Voices the backend offers.
    pub voices: Vec<VoiceInfo>,
}

// ── Engine ─────────────────────────────────────────────────────────

/// Playback driver, progress estimator, and state machine in one place.
pub struct SpeechEngine {
    backend: Box<dyn SpeechBackend>,
    config: EngineConfig,
    status: SpeechStatus,
    session: Option<SpeechSession>,

    /// Resume index recorded when a text edit tore down the in-flight
    /// utterance. Cleared on stop or on a successful resume.
    pending_edit: Option<usize>,

    next_session: u64,
    next_utterance: u64,
    event_tx: mpsc::UnboundedSender<SpeechEvent>,
}

impl SpeechEngine {
    /// Create an engine around `backend`.
    ///
    /// Returns the engine and the receiver for [`SpeechEvent`]s. Support
    /// is checked once here; an unsupported backend turns every
    /// operation into a no-op.
    #[must_use]
    pub fn new(
        backend: Box<dyn SpeechBackend>,
        config: EngineConfig,
    ) -> (Self, mpsc::UnboundedReceiver<SpeechEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        if !backend.is_supported() {
            tracing::warn!("Speech backend unsupported, engine operations will be no-ops");
        }

        let engine = Self {
            backend,
            config,
            status: SpeechStatus::Idle,
            session: None,
            pending_edit: None,
            next_session: 0,
            next_utterance: 0,
            event_tx,
        };

        (engine, event_rx)
    }

    // ── Queries ────────────────────────────────────────────────────

    /// Current playback status.
    #[must_use]
    pub const fn status(&self) -> SpeechStatus {
        self.status
    }

    /// Whether a session is actively playing.
    #[must_use]
    pub fn is_speaking(&self) -> bool {
        self.status == SpeechStatus::Speaking
    }

    /// Whether a session is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.status == SpeechStatus::Paused
    }

    /// Whether the host platform supports speech synthesis.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.backend.is_supported()
    }

    /// Highest absolute index reported in the current session, if any.
    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.last_index)
    }

    /// Read-only snapshot for the UI layer.
    #[must_use]
    pub fn snapshot(&self) -> SpeechSnapshot {
        SpeechSnapshot {
            status: self.status,
            is_speaking: self.is_speaking(),
            is_paused: self.is_paused(),
            is_supported: self.backend.is_supported(),
            voices: self.backend.voices(),
        }
    }

    // ── Commands ───────────────────────────────────────────────────

    /// Start reading `text` aloud, superseding any session in progress.
    ///
    /// Blank text is a silent no-op. The first boundary (the start of the
    /// first chunk) is reported immediately, before the backend has
    /// produced any audio, so the caller never stalls on a blank
    /// highlight during startup latency.
    pub fn speak(&mut self, text: &str, options: SpeakOptions, now: Instant) {
        if !self.backend.is_supported() {
            return;
        }

        let normalized = normalize_whitespace(text).text;
        if normalized.is_empty() {
            return;
        }

        // Supersede: cancel before the new session's first chunk goes
        // out, or overlapping audio from two utterances may be heard.
        self.clear_session();

        let chunks = split_into_chunks_with(&normalized, self.config.max_chunk_len);
        if chunks.is_empty() {
            self.set_status(SpeechStatus::Idle);
            return;
        }

        tracing::debug!(
            text_len = normalized.len(),
            num_chunks = chunks.len(),
            "Starting playback session"
        );
        self.start_session(normalized, 0, chunks, options, now);
    }

    /// Pause playback. Valid only while speaking; otherwise a no-op.
    pub fn pause(&mut self, now: Instant) {
        if self.status != SpeechStatus::Speaking || self.session.is_none() {
            return;
        }

        self.backend.pause();
        if let Some(session) = self.session.as_mut() {
            if let Some(active) = session.active.as_mut() {
                active.progress.pause(now);
            }
        }
        self.set_status(SpeechStatus::Paused);
    }

    /// Resume playback.
    ///
    /// If the backend still holds the paused utterance, playback resumes
    /// natively, same session, same queue. If an edit tore the
    /// utterance down, the document suffix from the recorded resume
    /// index is re-spoken as a brand-new session. No-op otherwise.
    pub fn resume(&mut self, now: Instant) {
        if self.status != SpeechStatus::Paused {
            return;
        }

        if self.pending_edit.is_none() {
            let Some(session) = self.session.as_mut() else {
                return;
            };
            if let Some(active) = session.active.as_mut() {
                active.progress.resume(now);
                self.backend.resume();
                self.set_status(SpeechStatus::Speaking);
            }
            return;
        }

        self.resume_from_edit(now);
    }

    /// Stop playback, discard the session, and reset all progress state.
    pub fn stop(&mut self) {
        if !self.backend.is_supported() {
            return;
        }

        self.clear_session();
        self.set_status(SpeechStatus::Idle);
    }

    /// The document text changed while a session references it.
    ///
    /// The last known position is remapped into the new text; if an
    /// utterance was in flight it is cancelled and the engine parks in
    /// `Paused` with the remapped index recorded, so a later `resume()`
    /// re-speaks the new text from (approximately) the same place.
    pub fn text_edited(&mut self, new_text: &str) {
        if !self.backend.is_supported() || self.status == SpeechStatus::Idle {
            return;
        }

        let normalized = normalize_whitespace(new_text).text;
        let was_speaking = self.status == SpeechStatus::Speaking;

        let Some(session) = self.session.as_mut() else {
            return;
        };

        let old_index = self.pending_edit.unwrap_or(session.last_index);
        let new_index = remap_index(&session.source_text, &normalized, old_index);

        tracing::debug!(
            old_index,
            new_index,
            was_speaking,
            "Document edited during playback, position remapped"
        );

        session.source_text = normalized;
        session.queue.clear();
        session.active = None;
        session.last_index = new_index;

        self.backend.cancel();
        self.pending_edit = Some(new_index);
        if was_speaking {
            self.set_status(SpeechStatus::Paused);
        }
    }

    // ── Inputs ─────────────────────────────────────────────────────

    /// Feed one backend signal into the engine.
    ///
    /// Signals for anything but the currently active utterance are from
    /// a superseded session and are dropped unconditionally.
    pub fn handle_signal(&mut self, signal: BackendSignal, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            tracing::trace!(utterance = ?signal.utterance, "Signal with no session, dropped");
            return;
        };
        let Some(active) = session.active.as_mut() else {
            tracing::trace!(utterance = ?signal.utterance, "Signal with no active chunk, dropped");
            return;
        };
        if active.utterance != signal.utterance {
            tracing::trace!(
                got = ?signal.utterance,
                want = ?active.utterance,
                "Stale utterance signal, dropped"
            );
            return;
        }

        match signal.event {
            BackendEvent::Started => {
                active.progress.note_signal(now);
            }

            BackendEvent::Boundary(relative) => {
                active.progress.note_signal(now);
                if let Some(absolute) = session.absolute_index(relative) {
                    self.report(absolute);
                }
            }

            BackendEvent::Paused => {
                active.progress.pause(now);
            }

            BackendEvent::Resumed => {
                active.progress.resume(now);
            }

            BackendEvent::Ended => {
                // Guarantee the highlight reaches the chunk's end even if
                // the backend's own boundary stream undershot it.
                let final_abs = session.base_offset + active.chunk.last_offset();
                session.active = None;
                self.report(final_abs);
                self.submit_next(now);
            }

            BackendEvent::Error(message) => {
                // A bad chunk must not stall the document: treated
                // exactly like natural completion, plus a skip event.
                let start_abs = session.base_offset + active.chunk.start;
                let final_abs = session.base_offset + active.chunk.last_offset();
                session.active = None;
                tracing::warn!(
                    chunk_start = start_abs,
                    error = %message,
                    "Chunk synthesis failed, skipping to next chunk"
                );
                self.emit(SpeechEvent::ChunkSkipped { start: start_abs, message });
                self.report(final_abs);
                self.submit_next(now);
            }
        }
    }

    /// Periodic clock input for boundary extrapolation.
    ///
    /// While the backend is actively producing audio but has been silent
    /// for longer than the configured threshold, the position is
    /// estimated from active elapsed time and reported through the same
    /// monotonic gate as real boundaries.
    pub fn tick(&mut self, now: Instant) {
        if self.status != SpeechStatus::Speaking {
            return;
        }
        if !self.backend.is_speaking() || self.backend.is_paused() {
            return;
        }
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let Some(active) = session.active.as_ref() else {
            return;
        };
        if active.progress.is_paused()
            || !active.progress.silence_exceeded(now, self.config.boundary_silence())
        {
            return;
        }

        let chars_per_sec = self.config.base_chars_per_sec * f64::from(session.options.rate);
        let relative = active.progress.extrapolated_offset(now, chars_per_sec);
        let absolute = session.base_offset + active.chunk.start + relative;
        self.report(absolute);
    }

    // ── Internal helpers ───────────────────────────────────────────

    /// Build and start a session over `text[base_offset..]`.
    fn start_session(
        &mut self,
        source_text: String,
        base_offset: usize,
        chunks: Vec<crate::chunk::Chunk>,
        options: SpeakOptions,
        now: Instant,
    ) {
        self.next_session += 1;
        let session = SpeechSession::new(
            SessionId(self.next_session),
            source_text,
            base_offset,
            chunks,
            options,
        );
        self.session = Some(session);
        self.set_status(SpeechStatus::Speaking);
        self.submit_next(now);
    }

    /// Dequeue and submit the next chunk, or finish the session.
    fn submit_next(&mut self, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if let Some(chunk) = session.queue.pop_front() {
            self.next_utterance += 1;
            let id = UtteranceId(self.next_utterance);
            let utterance = Utterance {
                id,
                text: chunk.text.clone(),
                language: session.options.language.clone(),
                voice: session.options.voice.clone(),
                rate: session.options.rate,
                pitch: session.options.pitch,
                volume: session.options.volume,
            };

            let start_abs = session.base_offset + chunk.start;
            let progress = ChunkProgress::new(chunk.text.len(), now);
            tracing::trace!(
                session = ?session.id,
                utterance = ?id,
                chunk_start = start_abs,
                "Submitting chunk to backend"
            );
            session.active = Some(ActiveChunk {
                chunk,
                utterance: id,
                progress,
            });

            self.backend.speak(utterance);
            self.report(start_abs);
        } else {
            self.session = None;
            self.emit(SpeechEvent::Ended);
            self.set_status(SpeechStatus::Idle);
        }
    }

    /// Re-speak the stored document from the pending-edit index as a
    /// brand-new session.
    fn resume_from_edit(&mut self, now: Instant) {
        let Some(index) = self.pending_edit.take() else {
            return;
        };
        let Some(session) = self.session.take() else {
            return;
        };

        let source_text = session.source_text;
        let options = session.options;
        let index = floor_char_boundary(&source_text, index.min(source_text.len()));

        let chunks = split_into_chunks_with(&source_text[index..], self.config.max_chunk_len);
        if chunks.is_empty() {
            // Nothing left to read after the edit.
            self.emit(SpeechEvent::Ended);
            self.set_status(SpeechStatus::Idle);
            return;
        }

        tracing::debug!(resume_index = index, "Resuming edited document as a new session");
        self.start_session(source_text, index, chunks, options, now);
    }

    /// Cancel backend activity and drop all session state, silently.
    fn clear_session(&mut self) {
        self.backend.cancel();
        self.session = None;
        self.pending_edit = None;
    }

    /// Report an absolute index through the monotonic gate.
    fn report(&mut self, absolute: usize) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if absolute >= session.last_index {
            session.last_index = absolute;
            self.emit(SpeechEvent::Boundary(absolute));
        } else {
            tracing::trace!(
                absolute,
                last = session.last_index,
                "Out-of-order boundary, dropped"
            );
        }
    }

    /// Transition to a new status and emit a state-change event.
    fn set_status(&mut self, new_status: SpeechStatus) {
        if self.status != new_status {
            tracing::debug!(old = ?self.status, new = ?new_status, "Speech state transition");
            self.status = new_status;
            self.emit(SpeechEvent::StateChanged(new_status));
        }
    }

    /// Emit an event (best-effort; if the receiver is dropped, log and
    /// move on).
    fn emit(&self, event: SpeechEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::warn!("Speech event receiver dropped");
        }
    }
}

/// Largest byte offset `<= index` that lies on a char boundary.
fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::UnsupportedBackend;

    #[test]
    fn engine_starts_idle() {
        let (engine, _rx) = SpeechEngine::new(Box::new(UnsupportedBackend), EngineConfig::default());
        assert_eq!(engine.status(), SpeechStatus::Idle);
        assert!(!engine.is_speaking());
        assert!(!engine.is_paused());
    }

    #[test]
    fn unsupported_backend_makes_operations_noops() {
        let (mut engine, mut rx) =
            SpeechEngine::new(Box::new(UnsupportedBackend), EngineConfig::default());
        assert!(!engine.is_supported());

        let now = Instant::now();
        engine.speak("Hello there. General text.", SpeakOptions::default(), now);
        engine.pause(now);
        engine.resume(now);
        engine.text_edited("Other text.");
        engine.stop();

        assert_eq!(engine.status(), SpeechStatus::Idle);
        assert!(rx.try_recv().is_err(), "no events expected");
    }

    #[test]
    fn snapshot_reflects_support_flag() {
        let (engine, _rx) = SpeechEngine::new(Box::new(UnsupportedBackend), EngineConfig::default());
        let snap = engine.snapshot();
        assert!(!snap.is_supported);
        assert!(!snap.is_speaking);
        assert!(snap.voices.is_empty());
    }
}
