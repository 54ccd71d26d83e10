use crate::speech::{PlaybackEvent, RecognitionEvent};
use tokio::sync::mpsc;

/// Everything the controller reacts to, serialized through one queue
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Speech-to-text output of capture number `epoch`
    Recognition { epoch: u64, event: RecognitionEvent },
    /// Playback progress of utterance `utterance`
    Playback { utterance: u64, event: PlaybackEvent },
    /// Fullscreen state reported by watcher number `generation`
    FullscreenChanged { generation: u64, active: bool },
    /// The simulated thinking delay identified by `token` ran out
    ThinkingElapsed { token: u64 },
    /// Periodic tick from the timers started as set `generation`
    Tick { generation: u64, ticker: Ticker },
}

/// Periodic timers owned by an active session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ticker {
    /// Once per second
    Elapsed,
    AudioLevel,
    NetworkQuality,
}

pub type EventSender = mpsc::UnboundedSender<SessionEvent>;
