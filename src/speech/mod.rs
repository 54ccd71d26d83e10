//! Speech capability ports and the adapters the session controller drives
//!
//! Platform speech APIs sit behind [`SpeechRecognizer`] and
//! [`SpeechSynthesizer`]. Their event streams are forwarded into the
//! controller's event queue, tagged so that results from a stopped capture
//! or a cancelled utterance are recognised as stale and dropped.

mod input;
mod output;

pub use input::{
    InputState, InputUpdate, RecognitionEvent, RecognitionResult, SpeechInputAdapter,
    SpeechRecognizer,
};
pub use output::{
    select_voice, PlaybackEvent, PlaybackUpdate, SpeechOutputAdapter, SpeechSynthesizer,
    Utterance, Voice, VoiceSettings,
};
