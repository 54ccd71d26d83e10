//! Interview domain types that need no devices or network
//!
//! - Question selection from conversation progress
//! - The ordered message log and its transcript rendering
//! - Feedback payload parsing and score bands
//! - Stored interview history, filters and aggregate stats

mod feedback;
mod history;
mod questions;
mod transcript;

pub use feedback::{Feedback, ScoreBand};
pub use history::{HistoryEntry, HistoryFilter, HistoryStats};
pub use questions::{opening_line, QuestionEngine, CLOSING_LINE, FOLLOW_UP_QUESTIONS};
pub use transcript::{InterviewType, Message, Speaker, TranscriptBuilder};
