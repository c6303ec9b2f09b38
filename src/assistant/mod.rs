//! Coding-assistant chat demo
//!
//! Canned replies delivered with thinking pauses, breathing pauses and a
//! typing rhythm that follows the chosen pace.

mod chat;
mod responder;

pub use chat::{ChatSession, GREETING, HistoryEntry, Role};
pub use responder::{CannedResponder, Topic};
