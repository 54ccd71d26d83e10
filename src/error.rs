use thiserror::Error;

/// Errors reported by the speech-to-text and text-to-speech ports
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    #[error("speech capability unavailable: {0}")]
    Unavailable(String),
    #[error("microphone permission denied")]
    PermissionDenied,
    #[error("speech device error: {0}")]
    Device(String),
}

/// Errors reported by the camera and fullscreen ports
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("media capability unavailable: {0}")]
    Unavailable(String),
    #[error("camera/microphone permission denied")]
    PermissionDenied,
    #[error("media device error: {0}")]
    Device(String),
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Errors returned by the remote interview API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed feedback payload: {0}")]
    MalformedFeedback(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether a later retry of the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Status { status, .. } => *status >= 500 || *status == 429,
            ApiError::MalformedFeedback(_) | ApiError::Decode(_) => true,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Rejections and failures of session controller operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("job role must not be empty")]
    EmptyJobRole,
    #[error("input must not be empty")]
    EmptyInput,
    #[error("operation requires mode {expected}, session is {actual}")]
    WrongMode {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("still waiting for the interviewer's response")]
    AwaitingResponse,
    #[error("need at least {required} messages to end the interview, have {actual}")]
    TooFewMessages { required: usize, actual: usize },
    #[error("failed to submit interview: {0}")]
    Submit(#[from] ApiError),
}
