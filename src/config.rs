use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable prefix, e.g. `MOCK_INTERVIEW__API__TOKEN`
pub const ENV_PREFIX: &str = "MOCK_INTERVIEW";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub interview: InterviewConfig,
    pub speech: SpeechConfig,
    pub indicators: IndicatorConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InterviewConfig {
    /// Simulated "AI thinking" delay between a user turn and the next question
    pub thinking_delay_ms: u64,
    pub min_messages_to_end: usize,
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            thinking_delay_ms: 1500,
            min_messages_to_end: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Substring matched against available voice names
    pub voice_filter: Option<String>,
    pub language: String,
    pub rate: f32,
    pub pitch: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            voice_filter: Some("Google US English".to_string()),
            language: "en-US".to_string(),
            rate: 1.0,
            pitch: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub audio_level_interval_ms: u64,
    pub network_interval_ms: u64,
    /// Fixed RNG seed; unseeded when absent
    pub seed: Option<u64>,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            audio_level_interval_ms: 150,
            network_interval_ms: 3000,
            seed: None,
        }
    }
}

impl Config {
    /// Load configuration from `path` (extension optional, file optional),
    /// overridden by `MOCK_INTERVIEW__SECTION__KEY` environment variables.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .with_context(|| format!("Failed to read config from {}", path))?;

        settings
            .try_deserialize()
            .context("Failed to deserialize config")
    }
}
