//! Exclusive, session-scoped presentation resources
//!
//! - Camera/microphone stream for video interviews
//! - Fullscreen presentation while a session is active

mod capture;
mod fullscreen;

pub use capture::{CameraBackend, MediaCaptureManager, MediaConstraints, MediaStream, TrackKind, VideoSink};
pub use fullscreen::{FullscreenBackend, FullscreenGuard};
