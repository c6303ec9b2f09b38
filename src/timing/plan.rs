//! Serializable delivery plans
//!
//! Both chunk and marker plans, flattened to milliseconds so a GUI or
//! `cadence plan` can show where the pauses would fall.

use std::time::Duration;

use serde::Serialize;

use super::{Pace, TimingConfig, plan_chunks, plan_segments, total_pause};
use crate::speech::Emotion;

/// A chunk with its trailing pause
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedChunk {
    pub text: String,
    pub pause_after_ms: u64,
}

/// A marker segment with the pauses around it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedSegment {
    pub text: String,
    pub pause_before_ms: u64,
    pub pause_after_ms: u64,
}

/// Everything the engine would do with a piece of text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CadencePlan {
    pub pace: Pace,
    pub emotion: Emotion,
    pub thinking_ms: u64,
    pub typing_delay_ms: u64,
    pub chunks: Vec<PlannedChunk>,
    pub segments: Vec<PlannedSegment>,
    pub total_pause_ms: u64,
}

impl CadencePlan {
    /// Plan `text` with the preset for `pace`
    #[must_use]
    pub fn new(text: &str, pace: Pace, emotion: Emotion) -> Self {
        Self::with_timing(text, pace, &pace.timing(), emotion)
    }

    /// Plan `text` with explicit timing values
    #[must_use]
    pub fn with_timing(text: &str, pace: Pace, timing: &TimingConfig, emotion: Emotion) -> Self {
        let chunks = plan_chunks(text, timing);
        let total = total_pause(&chunks);

        let segments = plan_segments(text, emotion)
            .into_iter()
            .map(|s| PlannedSegment {
                text: s.text,
                pause_before_ms: millis(s.pause_before),
                pause_after_ms: millis(s.pause_after),
            })
            .collect();

        Self {
            pace,
            emotion,
            thinking_ms: millis(timing.thinking),
            typing_delay_ms: millis(timing.typing_delay),
            chunks: chunks
                .into_iter()
                .map(|c| PlannedChunk {
                    pause_after_ms: millis(c.pause_after),
                    text: c.text,
                })
                .collect(),
            segments,
            total_pause_ms: millis(total),
        }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
