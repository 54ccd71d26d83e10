//! Capability ports for a plain terminal
//!
//! There is no microphone, camera or fullscreen here: those ports report
//! themselves unavailable and the controller degrades around them. The
//! synthesizer "speaks" by printing the interviewer's line.

use crate::api::InterviewApi;
use crate::error::{MediaError, SpeechError};
use crate::media::{CameraBackend, FullscreenBackend, MediaConstraints, MediaStream};
use crate::session::SessionPorts;
use crate::speech::{
    PlaybackEvent, RecognitionEvent, SpeechRecognizer, SpeechSynthesizer, Utterance, Voice,
};
use std::io::Write;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Ports for a terminal session against `api`
pub fn ports(api: Arc<dyn InterviewApi>) -> SessionPorts {
    SessionPorts {
        recognizer: Box::new(NoRecognizer),
        synthesizer: Box::new(ConsoleSynthesizer),
        camera: Box::new(NoCamera),
        video_sink: None,
        fullscreen: Box::new(NoFullscreen),
        api,
    }
}

pub struct NoRecognizer;

#[async_trait::async_trait]
impl SpeechRecognizer for NoRecognizer {
    fn is_available(&self) -> bool {
        false
    }

    async fn start(&mut self) -> Result<mpsc::Receiver<RecognitionEvent>, SpeechError> {
        Err(SpeechError::Unavailable("no speech recognition in terminal".to_string()))
    }

    fn stop(&mut self) {}

    fn name(&self) -> &str {
        "terminal"
    }
}

/// Prints each utterance on stdout and reports it finished immediately
pub struct ConsoleSynthesizer;

#[async_trait::async_trait]
impl SpeechSynthesizer for ConsoleSynthesizer {
    fn is_available(&self) -> bool {
        true
    }

    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    async fn speak(
        &mut self,
        utterance: Utterance,
    ) -> Result<mpsc::Receiver<PlaybackEvent>, SpeechError> {
        let mut stdout = std::io::stdout();
        writeln!(stdout, "\nInterviewer: {}\n", utterance.text)
            .and_then(|_| stdout.flush())
            .map_err(|e| SpeechError::Device(e.to_string()))?;

        let (tx, rx) = mpsc::channel(2);
        let _ = tx.try_send(PlaybackEvent::Started);
        let _ = tx.try_send(PlaybackEvent::Ended);
        Ok(rx)
    }

    fn cancel(&mut self) {}

    fn name(&self) -> &str {
        "console"
    }
}

pub struct NoCamera;

#[async_trait::async_trait]
impl CameraBackend for NoCamera {
    fn is_available(&self) -> bool {
        false
    }

    async fn open(
        &mut self,
        _constraints: MediaConstraints,
    ) -> Result<Box<dyn MediaStream>, MediaError> {
        Err(MediaError::Unavailable("no camera in terminal".to_string()))
    }

    fn name(&self) -> &str {
        "terminal"
    }
}

pub struct NoFullscreen;

#[async_trait::async_trait]
impl FullscreenBackend for NoFullscreen {
    fn is_supported(&self) -> bool {
        false
    }

    async fn request(&mut self) -> Result<(), MediaError> {
        Err(MediaError::Unavailable("no fullscreen in terminal".to_string()))
    }

    fn exit(&mut self) {}

    fn is_fullscreen(&self) -> bool {
        false
    }

    fn watch(&mut self) -> mpsc::Receiver<bool> {
        mpsc::channel(1).1
    }
}
