//! Marker-based delivery plans
//!
//! Decorated customer replies carry inline markers: `*sighs*` style action
//! markers, `...` hesitations and punctuation. Each marker becomes its own
//! segment with pauses around it, shifted by the speaker's emotional state.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::speech::Emotion;

/// Action markers, hesitations and clause punctuation
static MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*[^*]+\*|\.\.\.|,|!|\?").expect("valid regex"));

const ACTION_BEFORE: Duration = Duration::from_millis(500);
const ACTION_AFTER: Duration = Duration::from_millis(300);
const HESITATION_BEFORE: Duration = Duration::from_millis(800);
const HESITATION_AFTER: Duration = Duration::from_millis(1200);
const COMMA_AFTER: Duration = Duration::from_millis(400);
const TERMINAL_AFTER: Duration = Duration::from_millis(600);

/// One typed piece of a reply with the pauses around it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Text to type; empty for action markers, which are acted out by pausing
    pub text: String,
    pub pause_before: Duration,
    pub pause_after: Duration,
    pub emotion: Emotion,
}

/// Split a reply into timed segments for the given emotion
#[must_use]
pub fn plan_segments(response: &str, emotion: Emotion) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for m in MARKER_REGEX.find_iter(response) {
        push_segment(&mut segments, &response[last..m.start()], emotion);
        push_segment(&mut segments, m.as_str(), emotion);
        last = m.end();
    }
    push_segment(&mut segments, &response[last..], emotion);

    segments
}

fn push_segment(out: &mut Vec<Segment>, part: &str, emotion: Emotion) {
    if part.trim().is_empty() {
        return;
    }

    let is_action = part.len() > 1 && part.starts_with('*') && part.ends_with('*');
    let (text, mut before, mut after) = if is_action {
        (String::new(), ACTION_BEFORE, ACTION_AFTER)
    } else {
        match part {
            "..." => (part.to_string(), HESITATION_BEFORE, HESITATION_AFTER),
            "," => (part.to_string(), Duration::ZERO, COMMA_AFTER),
            "." | "!" | "?" => (part.to_string(), Duration::ZERO, TERMINAL_AFTER),
            _ => (part.to_string(), Duration::ZERO, Duration::ZERO),
        }
    };

    match emotion {
        Emotion::Angry => {
            after = after
                .saturating_sub(Duration::from_millis(200))
                .max(Duration::from_millis(200));
        }
        Emotion::Worried => {
            before += Duration::from_millis(200);
            after += Duration::from_millis(300);
        }
        _ => {}
    }

    out.push(Segment {
        text,
        pause_before: before,
        pause_after: after,
        emotion,
    });
}
