//! Reads a short document through a scripted backend that "synthesizes"
//! silence, printing the reported position as playback advances.
//!
//! ```sh
//! cargo run -p lecto-voice --example read_aloud
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::mpsc;

use lecto_core::NoopHistoryStore;
use lecto_voice::{
    BackendEvent, BackendSignal, EngineConfig, HistoryReporter, SignalSender, SpeakOptions,
    SpeechBackend, SpeechEvent, SpeechService, Utterance, VoiceInfo,
};

/// Pretends to synthesize by emitting a boundary at every word, one word
/// every 120 ms.
struct ScriptedBackend {
    signals: SignalSender,
    speaking: bool,
    paused: bool,
}

impl ScriptedBackend {
    fn new(signals: SignalSender) -> Self {
        Self {
            signals,
            speaking: false,
            paused: false,
        }
    }
}

impl SpeechBackend for ScriptedBackend {
    fn speak(&mut self, utterance: Utterance) {
        self.speaking = true;
        let signals = self.signals.clone();
        tokio::spawn(async move {
            let id = utterance.id;
            let _ = signals.send(BackendSignal {
                utterance: id,
                event: BackendEvent::Started,
            });

            let base = utterance.text.as_ptr() as usize;
            for word in utterance.text.split_whitespace() {
                tokio::time::sleep(Duration::from_millis(120)).await;
                let offset = word.as_ptr() as usize - base;
                let _ = signals.send(BackendSignal {
                    utterance: id,
                    event: BackendEvent::Boundary(offset),
                });
            }

            let _ = signals.send(BackendSignal {
                utterance: id,
                event: BackendEvent::Ended,
            });
        });
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn cancel(&mut self) {
        self.speaking = false;
        self.paused = false;
    }

    fn is_speaking(&self) -> bool {
        self.speaking
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn voices(&self) -> Vec<VoiceInfo> {
        vec![VoiceInfo {
            id: "scripted".into(),
            name: "Scripted Voice".into(),
            language: "en".into(),
        }]
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let (signal_tx, signal_rx) = mpsc::unbounded_channel();
    let backend = ScriptedBackend::new(signal_tx);
    let (speech, mut events) =
        SpeechService::spawn(Box::new(backend), signal_rx, EngineConfig::default());

    // A real application would hand the reporter a persistent store.
    let mut history = HistoryReporter::new(Arc::new(NoopHistoryStore));

    let text = "Reading aloud is easier to follow with a moving highlight. \
                Each word lights up as the voice reaches it. When the last \
                sentence finishes, the reader goes quiet.";
    speech.speak(text, SpeakOptions::default())?;

    while let Some(event) = events.recv().await {
        match event {
            SpeechEvent::StateChanged(status) => println!("state: {status:?}"),
            SpeechEvent::Boundary(index) => {
                history.report("read_aloud demo", text, index, Instant::now());
                println!("position: byte {index}");
            }
            SpeechEvent::ChunkSkipped { start, message } => {
                println!("skipped chunk at {start}: {message}");
            }
            SpeechEvent::Ended => {
                println!("finished");
                break;
            }
        }
    }

    Ok(())
}
