//! NDJSON messages exchanged with the editor extension

use serde::{Deserialize, Serialize};

use crate::timing::TimingOverrides;

/// A line sent by the extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum BridgeRequest {
    /// Begin a conversation
    Start,
    /// Something the user said
    Input { text: String },
    /// Halt delivery and skip pauses until resumed
    Pause,
    Resume,
    /// End the conversation and exit
    Stop,
    /// Change timing values for later responses
    Configure {
        #[serde(flatten)]
        timing: TimingOverrides,
    },
}

/// A line sent back to the extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BridgeEvent {
    Started,
    /// The thinking pause has begun
    Thinking,
    /// One chunk of the response, to be spoken before waiting `pause_after_ms`
    Chunk { text: String, pause_after_ms: u64 },
    /// The full response once delivery ends
    Response { text: String },
    Paused,
    Resumed,
    Configured,
    Stopped,
    Error { message: String },
}

impl BridgeRequest {
    /// Parse one NDJSON line
    ///
    /// # Errors
    ///
    /// Returns `Error::Bridge` if the line is not a known request
    pub fn parse(line: &str) -> crate::Result<Self> {
        serde_json::from_str(line).map_err(|e| crate::Error::Bridge(format!("bad request: {e}")))
    }
}

impl BridgeEvent {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}
