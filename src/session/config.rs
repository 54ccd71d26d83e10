use crate::config::Config;
use crate::speech::VoiceSettings;
use std::time::Duration;

/// Configuration for the session controller
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Simulated interviewer "thinking" time before each follow-up
    /// Default: 1.5 seconds
    pub thinking_delay: Duration,

    /// Messages required before the interview may be ended
    /// Default: 4 (two full exchanges)
    pub min_messages_to_end: usize,

    /// Voice used for interviewer playback
    pub voice: VoiceSettings,

    /// How often the speaking audio level is resampled
    pub audio_level_interval: Duration,

    /// How often the network quality indicator is resampled
    pub network_interval: Duration,

    /// Seed for the indicator RNG; entropy when `None`
    pub indicator_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            thinking_delay: Duration::from_millis(1500),
            min_messages_to_end: 4,
            voice: VoiceSettings::default(),
            audio_level_interval: Duration::from_millis(150),
            network_interval: Duration::from_secs(3),
            indicator_seed: None,
        }
    }
}

impl From<&Config> for SessionConfig {
    fn from(config: &Config) -> Self {
        Self {
            thinking_delay: Duration::from_millis(config.interview.thinking_delay_ms),
            min_messages_to_end: config.interview.min_messages_to_end,
            voice: VoiceSettings {
                filter: config.speech.voice_filter.clone(),
                lang: config.speech.language.clone(),
                rate: config.speech.rate,
                pitch: config.speech.pitch,
            },
            audio_level_interval: Duration::from_millis(config.indicators.audio_level_interval_ms),
            network_interval: Duration::from_millis(config.indicators.network_interval_ms),
            indicator_seed: config.indicators.seed,
        }
    }
}
