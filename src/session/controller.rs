use super::config::SessionConfig;
use super::event::{EventSender, SessionEvent, Ticker};
use super::indicators::{spawn_ticker, Indicators, NetworkQuality};
use super::state::{DeviceState, Session, SessionMode, SessionSnapshot};
use crate::api::{fetch_history, InterviewApi, SubmitInterviewRequest};
use crate::error::{ApiError, SessionError};
use crate::interview::{
    opening_line, Feedback, HistoryEntry, InterviewType, Message, QuestionEngine, Speaker,
    TranscriptBuilder,
};
use crate::media::{
    CameraBackend, FullscreenBackend, FullscreenGuard, MediaCaptureManager, TrackKind, VideoSink,
};
use crate::speech::{
    InputUpdate, PlaybackUpdate, SpeechInputAdapter, SpeechOutputAdapter, SpeechRecognizer,
    SpeechSynthesizer,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Platform capabilities and remote collaborators a controller runs on
pub struct SessionPorts {
    pub recognizer: Box<dyn SpeechRecognizer>,
    pub synthesizer: Box<dyn SpeechSynthesizer>,
    pub camera: Box<dyn CameraBackend>,
    pub video_sink: Option<Box<dyn VideoSink>>,
    pub fullscreen: Box<dyn FullscreenBackend>,
    pub api: Arc<dyn InterviewApi>,
}

/// A user turn waiting for its simulated interviewer reply
struct PendingResponse {
    token: u64,
    /// Messages in the log before the user turn was appended
    turns_so_far: usize,
    timer: JoinHandle<()>,
}

/// Single owner of the interview state.
///
/// Every asynchronous source (speech, playback, fullscreen, timers) feeds
/// one event queue; the owner drains it with [`step`](Self::step) or
/// [`handle_event`](Self::handle_event), so the message log has exactly one
/// writer.
pub struct SessionController {
    config: SessionConfig,
    api: Arc<dyn InterviewApi>,
    speech_in: SpeechInputAdapter,
    speech_out: SpeechOutputAdapter,
    media: MediaCaptureManager,
    fullscreen: FullscreenGuard,
    indicators: Indicators,
    events_tx: EventSender,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    mode: SessionMode,
    session: Option<Session>,
    messages: Vec<Message>,
    pending_input: String,
    feedback: Option<Feedback>,
    viewing: Option<HistoryEntry>,
    mic_enabled: bool,
    video_enabled: bool,
    pending: Option<PendingResponse>,
    next_token: u64,
    tickers: Vec<JoinHandle<()>>,
    /// Bumped by `start_tickers`; ticks from older sets are stale
    tick_generation: u64,
    last_error: Option<String>,
}

impl SessionController {
    pub fn new(config: SessionConfig, ports: SessionPorts) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let speech_in = SpeechInputAdapter::new(ports.recognizer, events_tx.clone());
        let speech_out =
            SpeechOutputAdapter::new(ports.synthesizer, events_tx.clone(), config.voice.clone());
        let media = MediaCaptureManager::new(ports.camera, ports.video_sink);
        let fullscreen = FullscreenGuard::new(ports.fullscreen, events_tx.clone());
        let indicators = Indicators::new(config.indicator_seed);

        Self {
            config,
            api: ports.api,
            speech_in,
            speech_out,
            media,
            fullscreen,
            indicators,
            events_tx,
            events_rx,
            mode: SessionMode::Setup,
            session: None,
            messages: Vec::new(),
            pending_input: String::new(),
            feedback: None,
            viewing: None,
            mic_enabled: true,
            video_enabled: true,
            pending: None,
            next_token: 0,
            tickers: Vec::new(),
            tick_generation: 0,
            last_error: None,
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// The stored interview shown in `view` mode
    pub fn viewing(&self) -> Option<&HistoryEntry> {
        self.viewing.as_ref()
    }

    /// Text staged for the next user turn (typed or dictated)
    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn interim_text(&self) -> &str {
        self.speech_in.interim()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_speaking(&self) -> bool {
        self.speech_out.is_speaking()
    }

    /// An utterance has been handed to the synthesizer and not yet finished
    pub fn has_utterance_in_flight(&self) -> bool {
        self.speech_out.in_flight().is_some()
    }

    pub fn is_media_live(&self) -> bool {
        self.media.is_live()
    }

    pub fn is_fullscreen_engaged(&self) -> bool {
        self.fullscreen.is_engaged()
    }

    /// Periodic timers still running
    pub fn has_running_timers(&self) -> bool {
        self.tickers.iter().any(|t| !t.is_finished())
    }

    pub fn elapsed_seconds(&self) -> u64 {
        match (&self.session, self.mode) {
            (Some(session), SessionMode::Active) => session.elapsed_seconds,
            _ => 0,
        }
    }

    pub fn audio_level(&self) -> u8 {
        self.indicators.audio_level()
    }

    pub fn network_quality(&self) -> NetworkQuality {
        self.indicators.network_quality()
    }

    pub fn devices(&self) -> DeviceState {
        DeviceState {
            mic_enabled: self.mic_enabled,
            video_enabled: self.video_enabled,
            listening: self.mode == SessionMode::Active && self.speech_in.is_listening(),
            fullscreen_active: self.fullscreen.is_active(),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let active = self.mode == SessionMode::Active;
        let awaiting = self.is_awaiting_response();
        let is_video = self
            .session
            .as_ref()
            .is_some_and(|s| s.interview_type == InterviewType::Video);

        SessionSnapshot {
            mode: self.mode,
            devices: self.devices(),
            message_count: self.messages.len(),
            awaiting_response: awaiting,
            speaking: self.is_speaking(),
            input_enabled: active && !awaiting,
            can_submit: active && !awaiting && !self.pending_input.trim().is_empty(),
            can_end: active && self.messages.len() >= self.config.min_messages_to_end,
            can_dictate: active && self.mic_enabled && self.speech_in.is_available(),
            show_video_feed: active && is_video && self.video_enabled && self.media.is_live(),
            fullscreen_warning: active && self.fullscreen.warning(),
            elapsed_seconds: self.elapsed_seconds(),
            audio_level: self.audio_level(),
            network_quality: self.network_quality(),
            interim_text: self.speech_in.interim().to_string(),
            error: self.last_error.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// setup -> active
    pub async fn start(
        &mut self,
        job_role: &str,
        interview_type: InterviewType,
    ) -> Result<(), SessionError> {
        self.require(SessionMode::Setup)?;

        let job_role = job_role.trim();
        if job_role.is_empty() {
            return Err(SessionError::EmptyJobRole);
        }

        let session = Session::new(job_role, interview_type);
        info!(
            "Starting {} interview session {} for {}",
            interview_type, session.id, job_role
        );

        self.messages.clear();
        self.pending_input.clear();
        self.feedback = None;
        self.viewing = None;
        self.last_error = None;

        if let Err(e) = self
            .media
            .acquire(interview_type.wants_camera(), self.mic_enabled, self.video_enabled)
            .await
        {
            warn!("Continuing without live video: {}", e);
            self.last_error = Some(e.to_string());
        }

        self.fullscreen.enter().await;

        self.session = Some(session);
        self.mode = SessionMode::Active;
        self.start_tickers();

        self.append_ai(opening_line(job_role)).await;

        Ok(())
    }

    /// Append a user turn and schedule the interviewer's reply.
    ///
    /// Rejected while a reply is pending so the log keeps alternating.
    pub fn submit(&mut self, text: &str) -> Result<(), SessionError> {
        self.require(SessionMode::Active)?;

        if self.pending.is_some() {
            return Err(SessionError::AwaitingResponse);
        }

        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyInput);
        }

        let turns_so_far = self.messages.len();
        self.push_message(Speaker::User, text.to_string());
        self.pending_input.clear();
        self.speech_in.clear_interim();

        self.arm_response(turns_so_far);
        Ok(())
    }

    /// Submit whatever is staged in the pending input
    pub fn submit_pending(&mut self) -> Result<(), SessionError> {
        let text = self.pending_input.clone();
        self.submit(&text)
    }

    /// Replace the staged input (typing)
    pub fn set_pending_input(&mut self, text: &str) {
        self.pending_input = text.to_string();
    }

    /// active -> completed.
    ///
    /// Capture, playback and any pending reply are cancelled before the
    /// scoring call. On failure the session stays active with its log
    /// untouched, and `end()` may be retried.
    pub async fn end(&mut self) -> Result<Feedback, SessionError> {
        self.require(SessionMode::Active)?;

        let required = self.config.min_messages_to_end;
        if self.messages.len() < required {
            return Err(SessionError::TooFewMessages {
                required,
                actual: self.messages.len(),
            });
        }

        let request = match &self.session {
            Some(session) => SubmitInterviewRequest {
                interview_type: session.interview_type,
                transcript: TranscriptBuilder::build(&self.messages),
                job_role: session.job_role.clone(),
            },
            None => return Err(self.wrong_mode(SessionMode::Active)),
        };

        self.speech_in.stop();
        self.speech_out.cancel();
        let abandoned = self.cancel_response();

        info!("Ending interview with {} messages", self.messages.len());

        let result = match self.api.submit_interview(&request).await {
            Ok(record) => record.feedback(),
            Err(e) => Err(e),
        };

        match result {
            Ok(feedback) => {
                self.release_resources();
                if let Some(session) = self.session.as_mut() {
                    session.elapsed_seconds = 0;
                }
                self.mode = SessionMode::Completed;
                self.last_error = None;
                self.feedback = Some(feedback.clone());

                info!("Interview completed with score {}", feedback.score);
                Ok(feedback)
            }
            Err(e) => {
                error!("Failed to submit interview: {}", e);
                self.last_error = Some(e.to_string());

                if let Some(turns_so_far) = abandoned {
                    self.arm_response(turns_so_far);
                }

                Err(SessionError::Submit(e))
            }
        }
    }

    /// completed/view -> setup
    pub fn start_new(&mut self) -> Result<(), SessionError> {
        match self.mode {
            SessionMode::Completed | SessionMode::View => {
                self.reset();
                info!("Ready for a new interview");
                Ok(())
            }
            other => Err(SessionError::WrongMode {
                expected: "completed or view",
                actual: other.as_str(),
            }),
        }
    }

    /// Show a stored interview read-only. Leaves an active session first.
    pub fn view_history(&mut self, entry: HistoryEntry) {
        if self.mode == SessionMode::Active {
            warn!("Leaving active session to view history");
            self.teardown();
        }

        self.reset();
        info!("Viewing interview {}", entry.id);
        self.feedback = Some(entry.feedback.clone());
        self.viewing = Some(entry);
        self.mode = SessionMode::View;
    }

    /// Abnormal exit (navigation away, unmount): cancel everything in
    /// flight, release devices and return to setup
    pub fn abort(&mut self) {
        self.teardown();
        if self.mode == SessionMode::Active {
            info!("Interview session aborted");
            self.reset();
        }
    }

    // ------------------------------------------------------------------
    // Device toggles
    // ------------------------------------------------------------------

    /// Start or stop dictation. Returns whether dictation is now running.
    ///
    /// A no-op returning `false` when speech recognition is unavailable or
    /// the microphone is off.
    pub async fn toggle_listening(&mut self) -> Result<bool, SessionError> {
        self.require(SessionMode::Active)?;

        if self.speech_in.is_listening() {
            self.speech_in.stop();
            return Ok(false);
        }

        if !self.mic_enabled || !self.speech_in.is_available() {
            debug!("Dictation not available");
            return Ok(false);
        }

        if let Err(e) = self.speech_in.start().await {
            self.last_error = Some(e.to_string());
            return Ok(false);
        }
        Ok(true)
    }

    /// Flip the microphone; also mutes the live audio track
    pub fn toggle_mic(&mut self) -> bool {
        self.mic_enabled = !self.mic_enabled;
        self.media.set_track_enabled(TrackKind::Audio, self.mic_enabled);
        if !self.mic_enabled {
            self.speech_in.stop();
        }
        info!("Microphone {}", if self.mic_enabled { "on" } else { "off" });
        self.mic_enabled
    }

    /// Flip the camera; also disables the live video track
    pub fn toggle_video(&mut self) -> bool {
        self.video_enabled = !self.video_enabled;
        self.media.set_track_enabled(TrackKind::Video, self.video_enabled);
        info!("Camera {}", if self.video_enabled { "on" } else { "off" });
        self.video_enabled
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    pub async fn load_history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        fetch_history(self.api.as_ref()).await
    }

    /// Fetch one stored interview and show it
    pub async fn open_interview(&mut self, id: i64) -> Result<(), ApiError> {
        let record = self.api.interview_details(id).await?;
        let entry = HistoryEntry::try_from(record)?;
        self.view_history(entry);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Event loop
    // ------------------------------------------------------------------

    /// Wait for the next queued event
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.recv().await
    }

    /// Take an already queued event without waiting
    pub fn try_next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Wait for and handle one event
    pub async fn step(&mut self) -> bool {
        match self.next_event().await {
            Some(event) => {
                self.handle_event(event).await;
                true
            }
            None => false,
        }
    }

    pub async fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Recognition { epoch, event } => {
                match self.speech_in.handle_event(epoch, event) {
                    InputUpdate::Final(text) if self.mode == SessionMode::Active => {
                        if !self.pending_input.is_empty() && !self.pending_input.ends_with(' ') {
                            self.pending_input.push(' ');
                        }
                        self.pending_input.push_str(&text);
                    }
                    InputUpdate::Unavailable(e) => {
                        self.last_error = Some(e.to_string());
                    }
                    _ => {}
                }
            }
            SessionEvent::Playback { utterance, event } => {
                if let PlaybackUpdate::Failed(e) = self.speech_out.handle_event(utterance, event) {
                    debug!("Playback failed: {}", e);
                }
            }
            SessionEvent::FullscreenChanged { generation, active } => {
                self.fullscreen.handle_change(generation, active)
            }
            SessionEvent::ThinkingElapsed { token } => self.deliver_response(token).await,
            SessionEvent::Tick { generation, ticker } => self.on_tick(generation, ticker),
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn require(&self, expected: SessionMode) -> Result<(), SessionError> {
        if self.mode == expected {
            Ok(())
        } else {
            Err(self.wrong_mode(expected))
        }
    }

    fn wrong_mode(&self, expected: SessionMode) -> SessionError {
        SessionError::WrongMode {
            expected: expected.as_str(),
            actual: self.mode.as_str(),
        }
    }

    fn push_message(&mut self, speaker: Speaker, text: String) {
        let turn_index = self.messages.len();
        self.messages.push(Message {
            turn_index,
            speaker,
            text,
        });
    }

    async fn append_ai(&mut self, text: String) {
        self.push_message(Speaker::Ai, text.clone());

        if !self.speech_out.is_available() {
            return;
        }
        if let Err(e) = self.speech_out.speak(&text).await {
            warn!("Could not voice interviewer message: {}", e);
        }
    }

    fn arm_response(&mut self, turns_so_far: usize) {
        let token = self.next_token;
        self.next_token += 1;

        let delay = self.config.thinking_delay;
        let events = self.events_tx.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(SessionEvent::ThinkingElapsed { token });
        });

        self.pending = Some(PendingResponse {
            token,
            turns_so_far,
            timer,
        });
    }

    /// Abandon the pending reply; returns its progress marker for re-arming
    fn cancel_response(&mut self) -> Option<usize> {
        self.pending.take().map(|pending| {
            pending.timer.abort();
            debug!("Pending interviewer response {} abandoned", pending.token);
            pending.turns_so_far
        })
    }

    async fn deliver_response(&mut self, token: u64) {
        let turns_so_far = match &self.pending {
            Some(pending) if pending.token == token && self.mode == SessionMode::Active => {
                pending.turns_so_far
            }
            _ => {
                debug!("Dropping stale thinking timer {}", token);
                return;
            }
        };
        self.pending = None;

        let question = QuestionEngine::next_question(turns_so_far);
        self.append_ai(question.to_string()).await;
    }

    fn on_tick(&mut self, generation: u64, ticker: Ticker) {
        if self.mode != SessionMode::Active || generation != self.tick_generation {
            return;
        }

        match ticker {
            Ticker::Elapsed => {
                if let Some(session) = self.session.as_mut() {
                    session.elapsed_seconds += 1;
                }
            }
            Ticker::AudioLevel => {
                if self.speech_out.is_speaking() {
                    self.indicators.sample_audio_level();
                } else {
                    self.indicators.silence();
                }
            }
            Ticker::NetworkQuality => {
                self.indicators.sample_network();
            }
        }
    }

    fn start_tickers(&mut self) {
        self.stop_tickers();
        self.tick_generation += 1;
        let generation = self.tick_generation;
        self.tickers = vec![
            spawn_ticker(
                std::time::Duration::from_secs(1),
                Ticker::Elapsed,
                generation,
                self.events_tx.clone(),
            ),
            spawn_ticker(
                self.config.audio_level_interval,
                Ticker::AudioLevel,
                generation,
                self.events_tx.clone(),
            ),
            spawn_ticker(
                self.config.network_interval,
                Ticker::NetworkQuality,
                generation,
                self.events_tx.clone(),
            ),
        ];
    }

    fn stop_tickers(&mut self) {
        for ticker in self.tickers.drain(..) {
            ticker.abort();
        }
        self.indicators.reset();
    }

    fn release_resources(&mut self) {
        self.media.release();
        self.fullscreen.exit();
        self.stop_tickers();
    }

    /// Every cancellation and release, safe in any mode
    fn teardown(&mut self) {
        self.speech_in.stop();
        self.speech_out.cancel();
        self.cancel_response();
        self.release_resources();
    }

    fn reset(&mut self) {
        self.mode = SessionMode::Setup;
        self.session = None;
        self.messages.clear();
        self.pending_input.clear();
        self.feedback = None;
        self.viewing = None;
        self.last_error = None;
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.teardown();
    }
}
