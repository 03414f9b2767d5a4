//! Async service wrapper around [`SpeechEngine`].
//!
//! The engine itself is synchronous; this module runs it on a dedicated
//! task that multiplexes three inputs: commands from [`SpeechHandle`]s,
//! backend signals, and a periodic extrapolation tick. Handles are cheap
//! to clone and safe to share across the application.

use std::time::Instant;

use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;

use crate::backend::{BackendSignal, SpeechBackend};
use crate::config::EngineConfig;
use crate::engine::{SpeechEngine, SpeechEvent, SpeechSnapshot};
use crate::error::SpeechError;
use crate::session::SpeakOptions;

enum Command {
    Speak {
        text: String,
        options: SpeakOptions,
    },
    Pause,
    Resume,
    Stop,
    TextEdited {
        text: String,
    },
    Snapshot {
        reply: oneshot::Sender<SpeechSnapshot>,
    },
}

/// Cloneable handle for driving the speech service.
#[derive(Clone)]
pub struct SpeechHandle {
    cmd_tx: mpsc::UnboundedSender<Command>,
    supported: bool,
}

impl SpeechHandle {
    /// Start reading `text` aloud, superseding any session in progress.
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError::BackendUnsupported`] if the platform has no
    /// usable backend, or [`SpeechError::ServiceStopped`] if the service
    /// task has shut down.
    pub fn speak(&self, text: impl Into<String>, options: SpeakOptions) -> Result<(), SpeechError> {
        if !self.supported {
            return Err(SpeechError::BackendUnsupported);
        }
        self.send(Command::Speak {
            text: text.into(),
            options,
        })
    }

    /// Pause playback.
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError::ServiceStopped`] if the service task has
    /// shut down.
    pub fn pause(&self) -> Result<(), SpeechError> {
        self.send(Command::Pause)
    }

    /// Resume paused playback.
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError::ServiceStopped`] if the service task has
    /// shut down.
    pub fn resume(&self) -> Result<(), SpeechError> {
        self.send(Command::Resume)
    }

    /// Stop playback and discard the session.
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError::ServiceStopped`] if the service task has
    /// shut down.
    pub fn stop(&self) -> Result<(), SpeechError> {
        self.send(Command::Stop)
    }

    /// Notify the engine that the document text changed.
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError::ServiceStopped`] if the service task has
    /// shut down.
    pub fn text_edited(&self, text: impl Into<String>) -> Result<(), SpeechError> {
        self.send(Command::TextEdited { text: text.into() })
    }

    /// Fetch a read-only snapshot of the engine state.
    ///
    /// ```
    /// use lecto_voice::{EngineConfig, SpeechService, UnsupportedBackend};
    /// use tokio::sync::mpsc;
    ///
    /// tokio_test::block_on(async {
    ///     let (_signal_tx, signal_rx) = mpsc::unbounded_channel();
    ///     let (speech, _events) = SpeechService::spawn(
    ///         Box::new(UnsupportedBackend),
    ///         signal_rx,
    ///         EngineConfig::default(),
    ///     );
    ///     let snapshot = speech.snapshot().await.unwrap();
    ///     assert!(!snapshot.is_speaking);
    /// });
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError::ServiceStopped`] if the service task has
    /// shut down.
    pub async fn snapshot(&self) -> Result<SpeechSnapshot, SpeechError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply })?;
        rx.await.map_err(|_| SpeechError::ServiceStopped)
    }

    fn send(&self, command: Command) -> Result<(), SpeechError> {
        self.cmd_tx
            .send(command)
            .map_err(|_| SpeechError::ServiceStopped)
    }
}

/// Owner of the engine task.
pub struct SpeechService;

impl SpeechService {
    /// Spawn the service task around `backend`.
    ///
    /// `signal_rx` is the receiving half of the channel the backend
    /// pushes its [`BackendSignal`]s into. Returns a command handle and
    /// the engine's event stream.
    #[must_use]
    pub fn spawn(
        backend: Box<dyn SpeechBackend>,
        signal_rx: mpsc::UnboundedReceiver<BackendSignal>,
        config: EngineConfig,
    ) -> (SpeechHandle, mpsc::UnboundedReceiver<SpeechEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let tick_interval = config.tick_interval();
        let supported = backend.is_supported();
        let (engine, event_rx) = SpeechEngine::new(backend, config);

        tokio::spawn(run(engine, cmd_rx, signal_rx, tick_interval));

        (SpeechHandle { cmd_tx, supported }, event_rx)
    }
}

async fn run(
    mut engine: SpeechEngine,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
    mut signal_rx: mpsc::UnboundedReceiver<BackendSignal>,
    tick_interval: std::time::Duration,
) {
    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // Once the backend drops its sender the branch is disabled, or the
    // closed channel would spin the loop.
    let mut signal_open = true;

    loop {
        tokio::select! {
            command = cmd_rx.recv() => {
                match command {
                    Some(Command::Speak { text, options }) => {
                        engine.speak(&text, options, Instant::now());
                    }
                    Some(Command::Pause) => engine.pause(Instant::now()),
                    Some(Command::Resume) => engine.resume(Instant::now()),
                    Some(Command::Stop) => engine.stop(),
                    Some(Command::TextEdited { text }) => engine.text_edited(&text),
                    Some(Command::Snapshot { reply }) => {
                        let _ = reply.send(engine.snapshot());
                    }
                    None => {
                        tracing::debug!("All speech handles dropped, shutting down");
                        engine.stop();
                        break;
                    }
                }
            }

            signal = signal_rx.recv(), if signal_open => {
                match signal {
                    Some(signal) => engine.handle_signal(signal, Instant::now()),
                    None => {
                        tracing::debug!("Backend signal channel closed");
                        signal_open = false;
                    }
                }
            }

            _ = ticker.tick() => {
                engine.tick(Instant::now());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::UnsupportedBackend;
    use crate::engine::SpeechStatus;

    #[tokio::test]
    async fn snapshot_round_trips_through_the_service() {
        let (_signal_tx, signal_rx) = mpsc::unbounded_channel();
        let (handle, _events) = SpeechService::spawn(
            Box::new(UnsupportedBackend),
            signal_rx,
            EngineConfig::default(),
        );

        let snap = handle.snapshot().await.unwrap();
        assert_eq!(snap.status, SpeechStatus::Idle);
        assert!(!snap.is_supported);
    }

    #[tokio::test]
    async fn speak_fails_fast_when_the_backend_is_unsupported() {
        let (_signal_tx, signal_rx) = mpsc::unbounded_channel();
        let (handle, _events) = SpeechService::spawn(
            Box::new(UnsupportedBackend),
            signal_rx,
            EngineConfig::default(),
        );

        let err = handle
            .speak("Hello there.", SpeakOptions::default())
            .unwrap_err();
        assert!(matches!(err, SpeechError::BackendUnsupported));
    }

    #[tokio::test]
    async fn cloned_handles_share_the_service() {
        let (_signal_tx, signal_rx) = mpsc::unbounded_channel();
        let (handle, _events) = SpeechService::spawn(
            Box::new(UnsupportedBackend),
            signal_rx,
            EngineConfig::default(),
        );

        let probe = handle.clone();
        drop(handle);

        // The surviving clone keeps the task alive and reachable.
        probe.stop().unwrap();
        let snap = probe.snapshot().await.unwrap();
        assert_eq!(snap.status, SpeechStatus::Idle);
    }
}
