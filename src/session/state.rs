use super::indicators::NetworkQuality;
use crate::interview::InterviewType;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    Setup,
    Active,
    Completed,
    /// Read-only display of a stored interview
    View,
}

impl SessionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Setup => "setup",
            SessionMode::Active => "active",
            SessionMode::Completed => "completed",
            SessionMode::View => "view",
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The interview being run (or just finished)
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// e.g. "interview-6f1c..."
    pub id: String,
    pub job_role: String,
    pub interview_type: InterviewType,
    pub started_at: DateTime<Utc>,
    /// Reset to 0 on leaving `active`
    pub elapsed_seconds: u64,
}

impl Session {
    pub fn new(job_role: &str, interview_type: InterviewType) -> Self {
        Self {
            id: format!("interview-{}", uuid::Uuid::new_v4()),
            job_role: job_role.to_string(),
            interview_type,
            started_at: Utc::now(),
            elapsed_seconds: 0,
        }
    }
}

/// Device toggles plus live device status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceState {
    pub mic_enabled: bool,
    pub video_enabled: bool,
    /// Always false outside `active`
    pub listening: bool,
    pub fullscreen_active: bool,
}

/// Everything a UI needs to render the session, derived from the
/// controller's state in one place
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub mode: SessionMode,
    pub devices: DeviceState,
    pub message_count: usize,
    /// Waiting for the simulated interviewer response
    pub awaiting_response: bool,
    /// Interviewer audio is playing
    pub speaking: bool,
    pub input_enabled: bool,
    pub can_submit: bool,
    pub can_end: bool,
    pub can_dictate: bool,
    pub show_video_feed: bool,
    pub fullscreen_warning: bool,
    pub elapsed_seconds: u64,
    pub audio_level: u8,
    pub network_quality: NetworkQuality,
    pub interim_text: String,
    pub error: Option<String>,
}
