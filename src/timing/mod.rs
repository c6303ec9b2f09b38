//! Conversational timing engine
//!
//! Turns text into a delivery plan (what to type, how long to wait) and
//! plays that plan back with a human-sounding rhythm.

mod delivery;
mod markers;
mod pace;
mod plan;
mod segment;
mod typing;

pub use delivery::{THINKING_FRAMES, deliver_chunks, deliver_segments, thinking_indicator};
pub use markers::{Segment, plan_segments};
pub use pace::{Pace, TimingConfig, TimingOverrides};
pub use plan::{CadencePlan, PlannedChunk, PlannedSegment};
pub use segment::{
    Chunk, VOICE_CLAUSE_WORDS, is_breathing_point, is_paragraph_break, is_topic_transition,
    plan_chunks, plan_voice_chunks, split_sentences, total_pause,
};
pub use typing::{
    ActivityFlag, DEFAULT_JITTER, Interrupt, MIN_CHAR_DELAY, Pacer, RecordingPacer, TokioPacer,
    Typist, char_delay,
};
