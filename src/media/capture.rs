use crate::error::MediaError;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Audio,
    Video,
}

/// What to request from the capture device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    pub video: bool,
    pub audio: bool,
}

/// A live capture stream
pub trait MediaStream: Send {
    fn id(&self) -> &str;

    /// Enable or disable the hardware track; returns false if the stream has
    /// no track of that kind
    fn set_track_enabled(&mut self, kind: TrackKind, enabled: bool) -> bool;

    /// Stop every track; the stream is unusable afterwards
    fn stop(&mut self);
}

/// Camera/microphone acquisition port (browser: `getUserMedia`)
#[async_trait::async_trait]
pub trait CameraBackend: Send {
    fn is_available(&self) -> bool;

    async fn open(&mut self, constraints: MediaConstraints) -> Result<Box<dyn MediaStream>, MediaError>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Where the live video is rendered (browser: a `<video>` element)
pub trait VideoSink: Send {
    fn attach(&mut self, stream_id: &str);
    fn detach(&mut self);
}

/// Owns the session's capture stream from acquisition to release
pub struct MediaCaptureManager {
    backend: Box<dyn CameraBackend>,
    sink: Option<Box<dyn VideoSink>>,
    stream: Option<Box<dyn MediaStream>>,
}

impl MediaCaptureManager {
    pub fn new(backend: Box<dyn CameraBackend>, sink: Option<Box<dyn VideoSink>>) -> Self {
        Self {
            backend,
            sink,
            stream: None,
        }
    }

    /// A stream is currently held
    pub fn is_live(&self) -> bool {
        self.stream.is_some()
    }

    /// Acquire the camera (and with it microphone permission) for a video
    /// session. A no-op returning `Ok(false)` when `video` is false.
    pub async fn acquire(
        &mut self,
        video: bool,
        mic_enabled: bool,
        video_enabled: bool,
    ) -> Result<bool, MediaError> {
        if !video {
            return Ok(false);
        }
        if self.stream.is_some() {
            warn!("Media stream already acquired");
            return Ok(true);
        }
        if !self.backend.is_available() {
            return Err(MediaError::Unavailable(self.backend.name().to_string()));
        }

        info!("Requesting camera and microphone ({})", self.backend.name());

        let mut stream = self
            .backend
            .open(MediaConstraints {
                video: true,
                audio: true,
            })
            .await?;

        stream.set_track_enabled(TrackKind::Audio, mic_enabled);
        stream.set_track_enabled(TrackKind::Video, video_enabled);

        if let Some(sink) = self.sink.as_mut() {
            sink.attach(stream.id());
        }

        info!("Media stream {} acquired", stream.id());
        self.stream = Some(stream);
        Ok(true)
    }

    /// Mute or unmute a hardware track of the live stream
    pub fn set_track_enabled(&mut self, kind: TrackKind, enabled: bool) -> bool {
        match self.stream.as_mut() {
            Some(stream) => stream.set_track_enabled(kind, enabled),
            None => false,
        }
    }

    /// Stop the stream and detach it from the sink; idempotent
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Some(sink) = self.sink.as_mut() {
                sink.detach();
            }
            stream.stop();
            info!("Media stream {} released", stream.id());
        }
    }
}
