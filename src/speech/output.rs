use crate::error::SpeechError;
use crate::session::{EventSender, SessionEvent};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A synthesis voice offered by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    pub lang: String,
    /// Platform default voice
    pub default: bool,
}

/// Voice selection and prosody applied to every utterance
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSettings {
    /// Substring matched against voice names
    pub filter: Option<String>,
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            filter: Some("Google US English".to_string()),
            lang: "en-US".to_string(),
            rate: 1.0,
            pitch: 1.0,
        }
    }
}

/// A request to speak one interviewer message
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub id: u64,
    pub text: String,
    /// `None` lets the platform pick its default voice
    pub voice: Option<Voice>,
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
}

/// Playback progress of a single utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    Started,
    Ended,
    Error(SpeechError),
}

/// Text-to-speech playback port
///
/// Implementations:
/// - Browser: Web Speech API `speechSynthesis`
/// - Terminal: prints the line (no audio)
/// - Tests: scripted fakes
#[async_trait::async_trait]
pub trait SpeechSynthesizer: Send {
    fn is_available(&self) -> bool;

    fn voices(&self) -> Vec<Voice>;

    /// Queue an utterance for playback
    ///
    /// Returns a channel receiver for that utterance's playback events
    async fn speak(&mut self, utterance: Utterance)
        -> Result<mpsc::Receiver<PlaybackEvent>, SpeechError>;

    /// Stop and discard whatever is playing or queued
    fn cancel(&mut self);

    /// Get synthesizer name for logging
    fn name(&self) -> &str;
}

/// Prefer the first voice whose name contains `filter`, then the platform
/// default voice, then none.
pub fn select_voice(voices: &[Voice], filter: Option<&str>) -> Option<Voice> {
    filter
        .and_then(|f| voices.iter().find(|v| v.name.contains(f)))
        .or_else(|| voices.iter().find(|v| v.default))
        .cloned()
}

/// What the controller should do with a routed playback event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackUpdate {
    Started,
    Ended,
    Failed(SpeechError),
    Ignored,
}

/// Wraps a [`SpeechSynthesizer`], keeping at most one utterance in flight
pub struct SpeechOutputAdapter {
    synthesizer: Box<dyn SpeechSynthesizer>,
    events: EventSender,
    settings: VoiceSettings,
    available: bool,
    next_id: u64,
    /// Utterance currently in flight, if any
    current: Option<u64>,
    speaking: bool,
    forwarder: Option<JoinHandle<()>>,
}

impl SpeechOutputAdapter {
    pub fn new(
        synthesizer: Box<dyn SpeechSynthesizer>,
        events: EventSender,
        settings: VoiceSettings,
    ) -> Self {
        let available = synthesizer.is_available();
        if !available {
            info!("Speech synthesis unavailable ({})", synthesizer.name());
        }

        Self {
            synthesizer,
            events,
            settings,
            available,
            next_id: 1,
            current: None,
            speaking: false,
            forwarder: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Audio is audibly playing (between `Started` and `Ended`)
    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    /// An utterance has been handed to the synthesizer and not yet finished
    pub fn in_flight(&self) -> Option<u64> {
        self.current
    }

    /// Cancel any pending utterance, then start speaking `text`
    pub async fn speak(&mut self, text: &str) -> Result<u64, SpeechError> {
        if !self.available {
            return Err(SpeechError::Unavailable(self.synthesizer.name().to_string()));
        }

        self.cancel();

        let id = self.next_id;
        self.next_id += 1;

        let voice = select_voice(&self.synthesizer.voices(), self.settings.filter.as_deref());
        let utterance = Utterance {
            id,
            text: text.to_string(),
            voice,
            lang: self.settings.lang.clone(),
            rate: self.settings.rate,
            pitch: self.settings.pitch,
        };

        let mut playback = self.synthesizer.speak(utterance).await.map_err(|e| {
            warn!("Failed to start utterance {}: {}", id, e);
            if matches!(e, SpeechError::Unavailable(_)) {
                self.available = false;
            }
            e
        })?;

        let events = self.events.clone();
        self.forwarder = Some(tokio::spawn(async move {
            while let Some(event) = playback.recv().await {
                if events
                    .send(SessionEvent::Playback { utterance: id, event })
                    .is_err()
                {
                    break;
                }
            }
        }));

        self.current = Some(id);
        debug!("Utterance {} queued", id);
        Ok(id)
    }

    /// Terminate the in-flight utterance, if any
    pub fn cancel(&mut self) {
        if let Some(task) = self.forwarder.take() {
            task.abort();
        }

        if let Some(id) = self.current.take() {
            self.synthesizer.cancel();
            debug!("Utterance {} cancelled", id);
        }
        self.speaking = false;
    }

    pub fn handle_event(&mut self, utterance: u64, event: PlaybackEvent) -> PlaybackUpdate {
        if self.current != Some(utterance) {
            debug!("Dropping stale playback event for utterance {}", utterance);
            return PlaybackUpdate::Ignored;
        }

        match event {
            PlaybackEvent::Started => {
                self.speaking = true;
                PlaybackUpdate::Started
            }
            PlaybackEvent::Ended => {
                self.finish();
                PlaybackUpdate::Ended
            }
            PlaybackEvent::Error(e) => {
                warn!("Utterance {} failed: {}", utterance, e);
                self.finish();
                PlaybackUpdate::Failed(e)
            }
        }
    }

    fn finish(&mut self) {
        if let Some(task) = self.forwarder.take() {
            task.abort();
        }
        self.current = None;
        self.speaking = false;
    }
}
