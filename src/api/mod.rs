//! Remote interview API (scoring and history)
//!
//! - POST /interviews/submit - score a transcript
//! - GET /interviews/history - stored interviews of the current user
//! - GET /interviews/:id - one stored interview

pub mod client;
pub mod messages;

pub use client::{fetch_history, HttpInterviewApi, InterviewApi};
pub use messages::{InterviewRecord, SubmitInterviewRequest};
