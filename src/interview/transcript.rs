use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interview format chosen at setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InterviewType {
    #[default]
    Chat,
    Video,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Chat => "Chat",
            InterviewType::Video => "Video",
        }
    }

    pub fn wants_camera(&self) -> bool {
        matches!(self, InterviewType::Video)
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chat" => Ok(InterviewType::Chat),
            "video" => Ok(InterviewType::Video),
            other => Err(format!("unknown interview type '{}' (chat, video)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Ai,
    User,
}

impl Speaker {
    /// Label used in the scoring transcript
    pub fn transcript_label(&self) -> &'static str {
        match self {
            Speaker::Ai => "Interviewer",
            Speaker::User => "Candidate",
        }
    }
}

/// One turn of the conversation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Insertion position, never reordered
    pub turn_index: usize,
    pub speaker: Speaker,
    pub text: String,
}

/// Renders a message log into the wire format sent for scoring
pub struct TranscriptBuilder;

impl TranscriptBuilder {
    /// `Interviewer: ...` / `Candidate: ...` paragraphs in `turn_index` order,
    /// separated by a blank line.
    pub fn build(messages: &[Message]) -> String {
        let mut ordered: Vec<&Message> = messages.iter().collect();
        ordered.sort_by_key(|m| m.turn_index);

        ordered
            .iter()
            .map(|m| format!("{}: {}", m.speaker.transcript_label(), m.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
