// Shared fakes for the capability ports and the interview API
//
// Every fake records what was done to it in a probe shared with the test,
// so assertions can check device state after the controller is gone.

#![allow(dead_code)]

use mock_interview::api::{InterviewApi, InterviewRecord, SubmitInterviewRequest};
use mock_interview::error::{ApiError, MediaError, SpeechError};
use mock_interview::media::{
    CameraBackend, FullscreenBackend, MediaConstraints, MediaStream, TrackKind, VideoSink,
};
use mock_interview::session::{SessionConfig, SessionController, SessionPorts};
use mock_interview::speech::{
    PlaybackEvent, RecognitionEvent, RecognitionResult, SpeechRecognizer, SpeechSynthesizer,
    Utterance, Voice,
};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

// ============================================================================
// Speech recognition
// ============================================================================

#[derive(Default)]
pub struct RecognizerProbe {
    pub starts: usize,
    pub stops: usize,
    pub capturing: bool,
    pub sender: Option<mpsc::Sender<RecognitionEvent>>,
    pub fail_start: Option<SpeechError>,
}

pub struct FakeRecognizer {
    pub available: bool,
    pub probe: Arc<Mutex<RecognizerProbe>>,
}

#[async_trait::async_trait]
impl SpeechRecognizer for FakeRecognizer {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn start(&mut self) -> Result<mpsc::Receiver<RecognitionEvent>, SpeechError> {
        let mut probe = self.probe.lock().unwrap();
        probe.starts += 1;
        if let Some(e) = probe.fail_start.clone() {
            return Err(e);
        }

        let (tx, rx) = mpsc::channel(32);
        probe.sender = Some(tx);
        probe.capturing = true;
        Ok(rx)
    }

    fn stop(&mut self) {
        let mut probe = self.probe.lock().unwrap();
        probe.stops += 1;
        probe.capturing = false;
        probe.sender = None;
    }

    fn name(&self) -> &str {
        "fake-recognizer"
    }
}

/// Sender of the capture currently running
pub fn capture_sender(probe: &Arc<Mutex<RecognizerProbe>>) -> mpsc::Sender<RecognitionEvent> {
    probe
        .lock()
        .unwrap()
        .sender
        .clone()
        .expect("recognizer is not capturing")
}

pub fn final_result(index: usize, text: &str) -> RecognitionEvent {
    RecognitionEvent::Result(RecognitionResult {
        index,
        text: text.to_string(),
        is_final: true,
    })
}

pub fn interim_result(index: usize, text: &str) -> RecognitionEvent {
    RecognitionEvent::Result(RecognitionResult {
        index,
        text: text.to_string(),
        is_final: false,
    })
}

// ============================================================================
// Speech synthesis
// ============================================================================

#[derive(Default)]
pub struct SynthProbe {
    /// "speak <id>" / "cancel" in call order
    pub log: Vec<String>,
    pub utterances: Vec<Utterance>,
    /// Sender of the utterance still playing
    pub playing: Option<(u64, mpsc::Sender<PlaybackEvent>)>,
    /// Send `Ended` right after `Started`
    pub auto_end: bool,
}

pub struct FakeSynthesizer {
    pub available: bool,
    pub voices: Vec<Voice>,
    pub probe: Arc<Mutex<SynthProbe>>,
}

#[async_trait::async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    fn is_available(&self) -> bool {
        self.available
    }

    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    async fn speak(
        &mut self,
        utterance: Utterance,
    ) -> Result<mpsc::Receiver<PlaybackEvent>, SpeechError> {
        let mut probe = self.probe.lock().unwrap();
        probe.log.push(format!("speak {}", utterance.id));

        let (tx, rx) = mpsc::channel(8);
        let _ = tx.try_send(PlaybackEvent::Started);
        if probe.auto_end {
            let _ = tx.try_send(PlaybackEvent::Ended);
        } else {
            probe.playing = Some((utterance.id, tx));
        }
        probe.utterances.push(utterance);
        Ok(rx)
    }

    fn cancel(&mut self) {
        let mut probe = self.probe.lock().unwrap();
        probe.log.push("cancel".to_string());
        probe.playing = None;
    }

    fn name(&self) -> &str {
        "fake-synthesizer"
    }
}

pub fn voice(name: &str, default: bool) -> Voice {
    Voice {
        name: name.to_string(),
        lang: "en-US".to_string(),
        default,
    }
}

// ============================================================================
// Camera
// ============================================================================

#[derive(Default)]
pub struct CameraProbe {
    pub opens: usize,
    pub stops: usize,
    pub live: bool,
    pub audio_enabled: bool,
    pub video_enabled: bool,
    pub last_constraints: Option<MediaConstraints>,
    pub deny: Option<MediaError>,
}

pub struct FakeCamera {
    pub available: bool,
    pub probe: Arc<Mutex<CameraProbe>>,
}

pub struct FakeStream {
    id: String,
    probe: Arc<Mutex<CameraProbe>>,
}

impl MediaStream for FakeStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_track_enabled(&mut self, kind: TrackKind, enabled: bool) -> bool {
        let mut probe = self.probe.lock().unwrap();
        match kind {
            TrackKind::Audio => probe.audio_enabled = enabled,
            TrackKind::Video => probe.video_enabled = enabled,
        }
        true
    }

    fn stop(&mut self) {
        let mut probe = self.probe.lock().unwrap();
        probe.stops += 1;
        probe.live = false;
    }
}

#[async_trait::async_trait]
impl CameraBackend for FakeCamera {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn open(
        &mut self,
        constraints: MediaConstraints,
    ) -> Result<Box<dyn MediaStream>, MediaError> {
        let mut probe = self.probe.lock().unwrap();
        probe.opens += 1;
        probe.last_constraints = Some(constraints);
        if let Some(e) = probe.deny.clone() {
            return Err(e);
        }

        probe.live = true;
        probe.audio_enabled = constraints.audio;
        probe.video_enabled = constraints.video;
        Ok(Box::new(FakeStream {
            id: format!("stream-{}", probe.opens),
            probe: Arc::clone(&self.probe),
        }))
    }

    fn name(&self) -> &str {
        "fake-camera"
    }
}

#[derive(Default)]
pub struct SinkProbe {
    pub attached: Option<String>,
    pub detaches: usize,
}

pub struct FakeSink {
    pub probe: Arc<Mutex<SinkProbe>>,
}

impl VideoSink for FakeSink {
    fn attach(&mut self, stream_id: &str) {
        self.probe.lock().unwrap().attached = Some(stream_id.to_string());
    }

    fn detach(&mut self) {
        let mut probe = self.probe.lock().unwrap();
        probe.attached = None;
        probe.detaches += 1;
    }
}

// ============================================================================
// Fullscreen
// ============================================================================

pub struct FullscreenProbe {
    pub supported: bool,
    pub reject: bool,
    pub fullscreen: bool,
    pub requests: usize,
    pub exits: usize,
    pub watcher: Option<mpsc::Sender<bool>>,
}

impl Default for FullscreenProbe {
    fn default() -> Self {
        Self {
            supported: true,
            reject: false,
            fullscreen: false,
            requests: 0,
            exits: 0,
            watcher: None,
        }
    }
}

pub struct FakeFullscreen {
    pub probe: Arc<Mutex<FullscreenProbe>>,
}

#[async_trait::async_trait]
impl FullscreenBackend for FakeFullscreen {
    fn is_supported(&self) -> bool {
        self.probe.lock().unwrap().supported
    }

    async fn request(&mut self) -> Result<(), MediaError> {
        let mut probe = self.probe.lock().unwrap();
        probe.requests += 1;
        if probe.reject {
            return Err(MediaError::Rejected("not triggered by user gesture".to_string()));
        }
        probe.fullscreen = true;
        Ok(())
    }

    fn exit(&mut self) {
        let mut probe = self.probe.lock().unwrap();
        probe.exits += 1;
        probe.fullscreen = false;
    }

    fn is_fullscreen(&self) -> bool {
        self.probe.lock().unwrap().fullscreen
    }

    fn watch(&mut self) -> mpsc::Receiver<bool> {
        let (tx, rx) = mpsc::channel(8);
        self.probe.lock().unwrap().watcher = Some(tx);
        rx
    }
}

// ============================================================================
// Interview API
// ============================================================================

#[derive(Default)]
pub struct FakeApi {
    pub submits: Mutex<Vec<SubmitInterviewRequest>>,
    pub responses: Mutex<VecDeque<Result<InterviewRecord, ApiError>>>,
    pub history: Mutex<Vec<InterviewRecord>>,
}

impl FakeApi {
    pub fn push_response(&self, response: Result<InterviewRecord, ApiError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn submitted(&self) -> Vec<SubmitInterviewRequest> {
        self.submits.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl InterviewApi for FakeApi {
    async fn submit_interview(
        &self,
        request: &SubmitInterviewRequest,
    ) -> Result<InterviewRecord, ApiError> {
        self.submits.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no response scripted".to_string())))
    }

    async fn interview_history(&self) -> Result<Vec<InterviewRecord>, ApiError> {
        Ok(self.history.lock().unwrap().clone())
    }

    async fn interview_details(&self, id: i64) -> Result<InterviewRecord, ApiError> {
        self.history
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == Some(id))
            .cloned()
            .ok_or(ApiError::Status {
                status: 404,
                body: "Interview not found".to_string(),
            })
    }
}

pub fn scored_record(id: i64, interview_type: &str, score: i64) -> InterviewRecord {
    serde_json::from_value(json!({
        "id": id,
        "type": interview_type,
        "score": score,
        "feedback": json!({
            "score": score,
            "strengths": ["Clear structure"],
            "weaknesses": ["Few concrete metrics"],
            "recommendations": ["Quantify your impact"],
            "overallFeedback": "Good effort."
        }).to_string(),
        "createdAt": "2025-01-15T10:30:00"
    }))
    .unwrap()
}

// ============================================================================
// Harness
// ============================================================================

pub const THINKING_MS: u64 = 1500;

pub struct Options {
    pub recognizer_available: bool,
    pub synthesizer_available: bool,
    pub camera_available: bool,
    pub auto_end_speech: bool,
    pub voices: Vec<Voice>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            recognizer_available: true,
            synthesizer_available: true,
            camera_available: true,
            auto_end_speech: true,
            voices: vec![voice("Samantha", true), voice("Google US English", false)],
        }
    }
}

pub struct Harness {
    pub controller: SessionController,
    pub recognizer: Arc<Mutex<RecognizerProbe>>,
    pub synth: Arc<Mutex<SynthProbe>>,
    pub camera: Arc<Mutex<CameraProbe>>,
    pub sink: Arc<Mutex<SinkProbe>>,
    pub fullscreen: Arc<Mutex<FullscreenProbe>>,
    pub api: Arc<FakeApi>,
}

pub fn harness() -> Harness {
    harness_with(Options::default())
}

pub fn harness_with(options: Options) -> Harness {
    let recognizer = Arc::new(Mutex::new(RecognizerProbe::default()));
    let synth = Arc::new(Mutex::new(SynthProbe {
        auto_end: options.auto_end_speech,
        ..Default::default()
    }));
    let camera = Arc::new(Mutex::new(CameraProbe::default()));
    let sink = Arc::new(Mutex::new(SinkProbe::default()));
    let fullscreen = Arc::new(Mutex::new(FullscreenProbe::default()));
    let api = Arc::new(FakeApi::default());

    let ports = SessionPorts {
        recognizer: Box::new(FakeRecognizer {
            available: options.recognizer_available,
            probe: Arc::clone(&recognizer),
        }),
        synthesizer: Box::new(FakeSynthesizer {
            available: options.synthesizer_available,
            voices: options.voices,
            probe: Arc::clone(&synth),
        }),
        camera: Box::new(FakeCamera {
            available: options.camera_available,
            probe: Arc::clone(&camera),
        }),
        video_sink: Some(Box::new(FakeSink {
            probe: Arc::clone(&sink),
        })),
        fullscreen: Box::new(FakeFullscreen {
            probe: Arc::clone(&fullscreen),
        }),
        api: api.clone(),
    };

    let config = SessionConfig {
        thinking_delay: Duration::from_millis(THINKING_MS),
        indicator_seed: Some(42),
        ..Default::default()
    };

    Harness {
        controller: SessionController::new(config, ports),
        recognizer,
        synth,
        camera,
        sink,
        fullscreen,
        api,
    }
}

/// Let forwarding tasks run and handle everything they queued
pub async fn settle(controller: &mut SessionController) {
    for _ in 0..8 {
        tokio::task::yield_now().await;
        while let Some(event) = controller.try_next_event() {
            controller.handle_event(event).await;
        }
    }
}

/// Advance the (paused) clock by `ms`, then settle
pub async fn advance(controller: &mut SessionController, ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    settle(controller).await;
}

/// Submit an answer and wait for the interviewer's follow-up
pub async fn exchange(controller: &mut SessionController, answer: &str) {
    controller.submit(answer).expect("submit should be accepted");
    advance(controller, THINKING_MS + 10).await;
}
