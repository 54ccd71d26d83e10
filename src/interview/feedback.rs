use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Scoring result for one interview, immutable once received
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    /// 0-100
    pub score: u8,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub overall_feedback: String,
}

/// Body of the `feedback` field as produced by the scoring service
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackBody {
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    weaknesses: Vec<String>,
    #[serde(default)]
    recommendations: Vec<String>,
    #[serde(default)]
    overall_feedback: String,
}

impl Feedback {
    /// Build feedback from a response's `score` and `feedback` fields.
    ///
    /// `feedback` is either a JSON object or a string holding one. The
    /// top-level score wins; the body's `score` is the fallback.
    pub fn from_payload(score: Option<i64>, feedback: &Value) -> Result<Self, ApiError> {
        let object = match feedback {
            Value::Object(_) => feedback.clone(),
            Value::String(raw) => {
                let parsed: Value = serde_json::from_str(raw)
                    .map_err(|e| ApiError::MalformedFeedback(format!("invalid JSON string: {}", e)))?;
                if !parsed.is_object() {
                    return Err(ApiError::MalformedFeedback(
                        "feedback string is not a JSON object".to_string(),
                    ));
                }
                parsed
            }
            other => {
                return Err(ApiError::MalformedFeedback(format!(
                    "expected object or string, got {}",
                    json_kind(other)
                )))
            }
        };

        let body: FeedbackBody = serde_json::from_value(object)
            .map_err(|e| ApiError::MalformedFeedback(e.to_string()))?;

        let raw_score = score
            .or_else(|| body.score.map(|s| s.trunc() as i64))
            .ok_or_else(|| ApiError::MalformedFeedback("missing score".to_string()))?;

        if !(0..=100).contains(&raw_score) {
            return Err(ApiError::MalformedFeedback(format!(
                "score {} outside 0-100",
                raw_score
            )));
        }

        Ok(Self {
            score: raw_score as u8,
            strengths: body.strengths,
            weaknesses: body.weaknesses,
            recommendations: body.recommendations,
            overall_feedback: body.overall_feedback,
        })
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Coarse grouping of scores used for display and history filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreBand {
    /// 80 and above
    High,
    /// 60 to 79
    Medium,
    /// below 60
    Low,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => ScoreBand::High,
            60..=79 => ScoreBand::Medium,
            _ => ScoreBand::Low,
        }
    }

    pub fn contains(&self, score: u8) -> bool {
        Self::from_score(score) == *self
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::High => "EXCELLENT",
            ScoreBand::Medium => "GOOD",
            ScoreBand::Low => "NEEDS WORK",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ScoreBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(ScoreBand::High),
            "medium" => Ok(ScoreBand::Medium),
            "low" => Ok(ScoreBand::Low),
            other => Err(format!("unknown score band '{}' (high, medium, low)", other)),
        }
    }
}
