use crate::error::ApiError;
use crate::interview::{Feedback, HistoryEntry, InterviewType};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /interviews/submit`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitInterviewRequest {
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    pub transcript: String,
    pub job_role: String,
}

/// A scored interview as returned by submit, history and details
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "type", default)]
    pub interview_type: Option<InterviewType>,
    #[serde(default)]
    pub score: Option<i64>,
    /// JSON object, or a string containing one
    #[serde(default)]
    pub feedback: Value,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl InterviewRecord {
    pub fn feedback(&self) -> Result<Feedback, ApiError> {
        Feedback::from_payload(self.score, &self.feedback)
    }
}

impl TryFrom<InterviewRecord> for HistoryEntry {
    type Error = ApiError;

    fn try_from(record: InterviewRecord) -> Result<Self, Self::Error> {
        let feedback = record.feedback()?;
        let id = record
            .id
            .ok_or_else(|| ApiError::Decode("interview record without id".to_string()))?;
        let interview_type = record
            .interview_type
            .ok_or_else(|| ApiError::Decode(format!("interview {} without type", id)))?;
        let created_at = record
            .created_at
            .ok_or_else(|| ApiError::Decode(format!("interview {} without createdAt", id)))?;

        Ok(Self {
            id,
            interview_type,
            feedback,
            created_at,
        })
    }
}
