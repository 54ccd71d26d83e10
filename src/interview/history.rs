use super::feedback::{Feedback, ScoreBand};
use super::transcript::InterviewType;
use chrono::NaiveDateTime;
use serde::Serialize;

/// A stored interview, read-only from the controller's point of view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub interview_type: InterviewType,
    pub feedback: Feedback,
    pub created_at: NaiveDateTime,
}

impl HistoryEntry {
    pub fn score(&self) -> u8 {
        self.feedback.score
    }
}

/// Narrowing applied to the history list; `None` fields match everything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub kind: Option<InterviewType>,
    pub band: Option<ScoreBand>,
}

impl HistoryFilter {
    pub fn matches(&self, entry: &HistoryEntry) -> bool {
        self.kind.map_or(true, |kind| entry.interview_type == kind)
            && self.band.map_or(true, |band| band.contains(entry.score()))
    }

    /// Matching entries, original order preserved
    pub fn apply<'a>(&self, entries: &'a [HistoryEntry]) -> Vec<&'a HistoryEntry> {
        entries.iter().filter(|e| self.matches(e)).collect()
    }
}

/// Aggregates shown under the history list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryStats {
    pub count: usize,
    /// Mean score rounded to the nearest integer
    pub average: u8,
    pub best: u8,
}

impl HistoryStats {
    /// `None` for an empty list
    pub fn from_entries(entries: &[&HistoryEntry]) -> Option<Self> {
        let best = entries.iter().map(|e| e.score()).max()?;
        let total: u32 = entries.iter().map(|e| e.score() as u32).sum();
        let average = (total as f64 / entries.len() as f64).round() as u8;

        Some(Self {
            count: entries.len(),
            average,
            best,
        })
    }
}
