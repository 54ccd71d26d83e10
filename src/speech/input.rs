use crate::error::SpeechError;
use crate::session::{EventSender, SessionEvent};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// One recognition hypothesis from the speech-to-text engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionResult {
    /// Position of this result within the current capture session
    pub index: usize,
    pub text: String,
    /// Interim results are provisional and never committed
    pub is_final: bool,
}

/// Events emitted by a running capture session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    Result(RecognitionResult),
    /// Terminal: the capture failed and the engine is no longer usable
    Error(SpeechError),
    /// Capture stopped on the engine's side (silence timeout, etc.)
    Ended,
}

/// Continuous speech-to-text capture port
///
/// Implementations:
/// - Browser: Web Speech API `SpeechRecognition` with `continuous` and `interimResults`
/// - Terminal: none (typed input only)
/// - Tests: scripted fakes
#[async_trait::async_trait]
pub trait SpeechRecognizer: Send {
    /// Whether speech recognition exists in this environment
    fn is_available(&self) -> bool;

    /// Start capturing
    ///
    /// Returns a channel receiver that will receive recognition events
    async fn start(&mut self) -> Result<mpsc::Receiver<RecognitionEvent>, SpeechError>;

    /// Stop capturing; must tolerate being called when not capturing
    fn stop(&mut self);

    /// Get recognizer name for logging
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Idle,
    Listening,
    /// Capability missing or failed; never restarted automatically
    Unavailable,
}

/// What the controller should do with a routed recognition event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputUpdate {
    /// Finalized text to append to the pending input
    Final(String),
    /// Interim text changed (see [`SpeechInputAdapter::interim`])
    Interim,
    /// Capture ended normally
    Ended,
    /// Capture failed; the adapter is now unavailable
    Unavailable(SpeechError),
    /// Stale or duplicate event, nothing to do
    Ignored,
}

/// Wraps a [`SpeechRecognizer`] with start/stop bookkeeping
pub struct SpeechInputAdapter {
    recognizer: Box<dyn SpeechRecognizer>,
    events: EventSender,
    state: InputState,
    /// Incremented on every start; events from older captures are stale
    epoch: u64,
    /// Next result index expected to be final in this epoch
    committed_through: usize,
    interim: String,
    forwarder: Option<JoinHandle<()>>,
}

impl SpeechInputAdapter {
    pub fn new(recognizer: Box<dyn SpeechRecognizer>, events: EventSender) -> Self {
        let state = if recognizer.is_available() {
            InputState::Idle
        } else {
            info!("Speech recognition unavailable ({})", recognizer.name());
            InputState::Unavailable
        };

        Self {
            recognizer,
            events,
            state,
            epoch: 0,
            committed_through: 0,
            interim: String::new(),
            forwarder: None,
        }
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    pub fn is_available(&self) -> bool {
        self.state != InputState::Unavailable
    }

    pub fn is_listening(&self) -> bool {
        self.state == InputState::Listening
    }

    /// Provisional text of the result currently being recognised
    pub fn interim(&self) -> &str {
        &self.interim
    }

    pub fn clear_interim(&mut self) {
        self.interim.clear();
    }

    /// Begin a capture session. Errors instead of panicking when unavailable.
    pub async fn start(&mut self) -> Result<(), SpeechError> {
        match self.state {
            InputState::Listening => {
                warn!("Speech capture already started");
                return Ok(());
            }
            InputState::Unavailable => {
                return Err(SpeechError::Unavailable(self.recognizer.name().to_string()));
            }
            InputState::Idle => {}
        }

        self.epoch += 1;
        self.committed_through = 0;
        self.interim.clear();

        let mut results = match self.recognizer.start().await {
            Ok(rx) => rx,
            Err(e) => {
                warn!("Failed to start speech capture: {}", e);
                self.state = InputState::Unavailable;
                return Err(e);
            }
        };

        let epoch = self.epoch;
        let events = self.events.clone();
        self.forwarder = Some(tokio::spawn(async move {
            while let Some(event) = results.recv().await {
                if events
                    .send(SessionEvent::Recognition { epoch, event })
                    .is_err()
                {
                    break;
                }
            }
        }));

        self.state = InputState::Listening;
        info!("Speech capture started (epoch {})", epoch);
        Ok(())
    }

    /// End capture; idempotent
    pub fn stop(&mut self) {
        if let Some(task) = self.forwarder.take() {
            task.abort();
        }
        self.interim.clear();

        if self.state == InputState::Listening {
            self.recognizer.stop();
            self.state = InputState::Idle;
            info!("Speech capture stopped (epoch {})", self.epoch);
        }
    }

    /// Route a forwarded event. Only the current epoch's events count, and
    /// each final result index is committed at most once.
    pub fn handle_event(&mut self, epoch: u64, event: RecognitionEvent) -> InputUpdate {
        if epoch != self.epoch || self.state != InputState::Listening {
            debug!("Dropping stale recognition event from epoch {}", epoch);
            return InputUpdate::Ignored;
        }

        match event {
            RecognitionEvent::Result(result) if result.is_final => {
                if result.index < self.committed_through {
                    debug!("Duplicate final result {} ignored", result.index);
                    return InputUpdate::Ignored;
                }
                self.committed_through = result.index + 1;
                self.interim.clear();

                let text = result.text.trim();
                if text.is_empty() {
                    InputUpdate::Ignored
                } else {
                    InputUpdate::Final(text.to_string())
                }
            }
            RecognitionEvent::Result(result) => {
                self.interim = result.text;
                InputUpdate::Interim
            }
            RecognitionEvent::Ended => {
                if let Some(task) = self.forwarder.take() {
                    task.abort();
                }
                self.interim.clear();
                self.state = InputState::Idle;
                info!("Speech capture ended by recognizer");
                InputUpdate::Ended
            }
            RecognitionEvent::Error(e) => {
                warn!("Speech capture failed: {}", e);
                self.stop();
                self.state = InputState::Unavailable;
                InputUpdate::Unavailable(e)
            }
        }
    }
}
