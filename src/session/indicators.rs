use super::event::{EventSender, SessionEvent, Ticker};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Simulated audio level and network quality. Display only.
pub struct Indicators {
    rng: StdRng,
    audio_level: u8,
    network: NetworkQuality,
}

impl Indicators {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            rng,
            audio_level: 0,
            network: NetworkQuality::Excellent,
        }
    }

    pub fn audio_level(&self) -> u8 {
        self.audio_level
    }

    pub fn network_quality(&self) -> NetworkQuality {
        self.network
    }

    pub fn sample_audio_level(&mut self) -> u8 {
        self.audio_level = self.rng.gen_range(20..=100);
        self.audio_level
    }

    pub fn silence(&mut self) {
        self.audio_level = 0;
    }

    /// Mostly excellent, occasionally degraded
    pub fn sample_network(&mut self) -> NetworkQuality {
        self.network = match self.rng.gen_range(0..100) {
            0..=69 => NetworkQuality::Excellent,
            70..=89 => NetworkQuality::Good,
            90..=96 => NetworkQuality::Fair,
            _ => NetworkQuality::Poor,
        };
        self.network
    }

    pub fn reset(&mut self) {
        self.audio_level = 0;
        self.network = NetworkQuality::Excellent;
    }
}

/// Emit `Tick { generation, ticker }` every `period`, first tick one period
/// from now
pub(crate) fn spawn_ticker(
    period: Duration,
    ticker: Ticker,
    generation: u64,
    events: EventSender,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if events.send(SessionEvent::Tick { generation, ticker }).is_err() {
                break;
            }
        }
    })
}
