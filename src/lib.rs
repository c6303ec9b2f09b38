//! Cadence - conversational timing engine
//!
//! This library provides the pieces behind the `cadence` demos:
//! - Timing: chunking text and pacing its delivery like a human typist
//! - Speech: simulated emotion and human-sounding decoration
//! - Training: a simulated bank customer for call-center practice
//! - Voice: a thin wrapper over hosted text-to-speech APIs
//!
//! # Layout
//!
//! ```text
//!   chat / train / serve / bridge        (assistant, training, api, bridge)
//!                 |
//!                 v
//!   plan chunks -> decorate -> type out  (timing, speech)
//!                 |
//!                 v
//!   console or hosted TTS                (voice)
//! ```

pub mod api;
pub mod assistant;
pub mod bridge;
pub mod config;
pub mod error;
pub mod input;
pub mod speech;
pub mod timing;
pub mod training;
pub mod voice;

pub use config::Config;
pub use error::{Error, Result};
pub use timing::{CadencePlan, Pace};

/// Whether a session keeps going after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}
