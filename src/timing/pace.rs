//! Conversation pace presets
//!
//! A pace bundles every timing knob the cadence engine uses: how long to
//! "think" before answering, how long to breathe between clauses, how long
//! to rest after sentences and paragraphs, and how fast to type.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Number of words after which a clause gets a breathing pause
const DEFAULT_CLAUSE_WORDS: usize = 8;

/// Overall conversation speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl Pace {
    /// All paces, slowest first
    pub const ALL: [Self; 3] = [Self::Slow, Self::Normal, Self::Fast];

    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Normal => "normal",
            Self::Fast => "fast",
        }
    }

    /// Timing preset for this pace
    #[must_use]
    pub const fn timing(self) -> TimingConfig {
        match self {
            Self::Slow => TimingConfig {
                thinking: Duration::from_millis(3000),
                breath: Duration::from_millis(1000),
                sentence: Duration::from_millis(1500),
                paragraph: Duration::from_millis(2000),
                emphasis: Duration::from_millis(2000),
                typing_delay: Duration::from_millis(80),
                clause_words: DEFAULT_CLAUSE_WORDS,
            },
            Self::Normal => TimingConfig {
                thinking: Duration::from_millis(1500),
                breath: Duration::from_millis(500),
                sentence: Duration::from_millis(800),
                paragraph: Duration::from_millis(1000),
                emphasis: Duration::from_millis(1000),
                typing_delay: Duration::from_millis(40),
                clause_words: DEFAULT_CLAUSE_WORDS,
            },
            Self::Fast => TimingConfig {
                thinking: Duration::from_millis(800),
                breath: Duration::from_millis(250),
                sentence: Duration::from_millis(400),
                paragraph: Duration::from_millis(600),
                emphasis: Duration::from_millis(500),
                typing_delay: Duration::from_millis(20),
                clause_words: DEFAULT_CLAUSE_WORDS,
            },
        }
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pace {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "slow" => Ok(Self::Slow),
            "normal" => Ok(Self::Normal),
            "fast" => Ok(Self::Fast),
            other => Err(Error::InvalidPace(other.to_string())),
        }
    }
}

/// Concrete timing values used while chunking and delivering text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    /// Pause before responding
    pub thinking: Duration,
    /// Pause at clause boundaries
    pub breath: Duration,
    /// Pause after a sentence
    pub sentence: Duration,
    /// Pause before a new paragraph
    pub paragraph: Duration,
    /// Pause after questions, exclamations and topic transitions
    pub emphasis: Duration,
    /// Base delay per typed character
    pub typing_delay: Duration,
    /// Insert a breathing pause every `clause_words` words
    pub clause_words: usize,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Pace::Normal.timing()
    }
}

/// Partial timing update, all values in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_pause_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breath_pause_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_pause_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_pause_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emphasis_pause_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typing_delay_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clause_words: Option<usize>,
}

impl TimingConfig {
    /// Merge a partial update into this config
    ///
    /// A `clause_words` of zero is ignored since it would split after every word.
    pub fn apply(&mut self, overrides: &TimingOverrides) {
        let set = |slot: &mut Duration, ms: Option<u64>| {
            if let Some(ms) = ms {
                *slot = Duration::from_millis(ms);
            }
        };

        set(&mut self.thinking, overrides.thinking_pause_ms);
        set(&mut self.breath, overrides.breath_pause_ms);
        set(&mut self.sentence, overrides.sentence_pause_ms);
        set(&mut self.paragraph, overrides.paragraph_pause_ms);
        set(&mut self.emphasis, overrides.emphasis_pause_ms);
        set(&mut self.typing_delay, overrides.typing_delay_ms);

        if let Some(words) = overrides.clause_words.filter(|w| *w > 0) {
            self.clause_words = words;
        }
    }
}
