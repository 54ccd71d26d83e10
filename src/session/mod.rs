//! Live interview session management
//!
//! This module provides the `SessionController` that owns:
//! - The setup/active/completed/view state machine
//! - The append-only message log and the simulated interviewer turns
//! - Speech capture and playback through the speech adapters
//! - Camera and fullscreen lifetime for the active session
//! - Transcript submission for scoring
//! - Elapsed time and cosmetic audio/network indicators

mod config;
mod controller;
mod event;
mod indicators;
mod state;

pub use config::SessionConfig;
pub use controller::{SessionController, SessionPorts};
pub use event::{EventSender, SessionEvent, Ticker};
pub use indicators::{Indicators, NetworkQuality};
pub use state::{DeviceState, Session, SessionMode, SessionSnapshot};
