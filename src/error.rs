//! Error types for Cadence

use thiserror::Error;

/// Result type alias for Cadence operations
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong in the engine, servers and voice output
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Unknown conversation pace
    #[error("invalid pace: {0} (expected slow, normal or fast)")]
    InvalidPace(String),

    /// Unknown or unsupported emotional state
    #[error("invalid emotion: {0}")]
    InvalidEmotion(String),

    /// Customer profile not in the roster
    #[error("customer not found: {0}")]
    UnknownCustomer(String),

    #[error("scenario not found: {0}")]
    UnknownScenario(String),

    /// Voice wrapper error
    #[error("voice error: {0}")]
    Voice(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Editor bridge protocol error
    #[error("bridge error: {0}")]
    Bridge(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding of bridge events
    #[error("json error: {0}")]
    Serialization(#[from] serde_json::Error),
}
