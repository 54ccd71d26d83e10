pub mod api;
pub mod config;
pub mod error;
pub mod interview;
pub mod media;
pub mod session;
pub mod speech;
pub mod terminal;

pub use api::{HttpInterviewApi, InterviewApi, InterviewRecord, SubmitInterviewRequest};
pub use config::Config;
pub use error::{ApiError, MediaError, SessionError, SpeechError};
pub use interview::{
    Feedback, HistoryEntry, HistoryFilter, HistoryStats, InterviewType, Message, QuestionEngine,
    ScoreBand, Speaker, TranscriptBuilder,
};
pub use media::{FullscreenGuard, MediaCaptureManager};
pub use session::{
    DeviceState, SessionConfig, SessionController, SessionEvent, SessionMode, SessionPorts,
    SessionSnapshot,
};
pub use speech::{SpeechInputAdapter, SpeechOutputAdapter};
