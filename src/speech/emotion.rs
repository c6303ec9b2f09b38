//! Simulated emotional state
//!
//! Emotions drive typing speed, marker pauses, voice prosody and which
//! canned reply a simulated customer gives.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Emotional state of a simulated speaker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Angry,
    Frustrated,
    Worried,
    Cautious,
    #[default]
    Neutral,
    Hopeful,
    Relieved,
    Satisfied,
    Confused,
    Anxious,
}

/// Direction to move along the emotional ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmotionShift {
    Calmer,
    MoreFrustrated,
    Confused,
}

/// Prosody for voice output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Emotion::Neutral.voice_settings()
    }
}

impl VoiceSettings {
    pub const RATE_RANGE: RangeInclusive<f32> = 0.5..=2.0;
    pub const VOLUME_RANGE: RangeInclusive<f32> = 0.0..=1.0;

    /// Set the speaking rate
    ///
    /// # Errors
    ///
    /// Returns error if `rate` is outside [`Self::RATE_RANGE`]
    pub fn set_rate(&mut self, rate: f32) -> crate::Result<()> {
        if !Self::RATE_RANGE.contains(&rate) {
            return Err(Error::Voice("rate must be between 0.5 and 2.0".to_string()));
        }
        self.rate = rate;
        Ok(())
    }

    /// Set the output volume
    ///
    /// # Errors
    ///
    /// Returns error if `volume` is outside [`Self::VOLUME_RANGE`]
    pub fn set_volume(&mut self, volume: f32) -> crate::Result<()> {
        if !Self::VOLUME_RANGE.contains(&volume) {
            return Err(Error::Voice("volume must be between 0 and 1.0".to_string()));
        }
        self.volume = volume;
        Ok(())
    }
}

impl Emotion {
    /// From most upset to most content
    pub const LADDER: [Self; 8] = [
        Self::Angry,
        Self::Frustrated,
        Self::Worried,
        Self::Cautious,
        Self::Neutral,
        Self::Hopeful,
        Self::Relieved,
        Self::Satisfied,
    ];

    /// States a trainer may set by hand
    pub const SETTABLE: [Self; 7] = [
        Self::Angry,
        Self::Frustrated,
        Self::Worried,
        Self::Cautious,
        Self::Neutral,
        Self::Hopeful,
        Self::Relieved,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Angry => "angry",
            Self::Frustrated => "frustrated",
            Self::Worried => "worried",
            Self::Cautious => "cautious",
            Self::Neutral => "neutral",
            Self::Hopeful => "hopeful",
            Self::Relieved => "relieved",
            Self::Satisfied => "satisfied",
            Self::Confused => "confused",
            Self::Anxious => "anxious",
        }
    }

    /// Position on the ladder; off-ladder states sit with `worried`
    #[must_use]
    pub fn ladder_index(self) -> usize {
        Self::LADDER
            .iter()
            .position(|e| *e == self)
            .unwrap_or(2)
    }

    /// Move along the ladder, saturating at both ends
    #[must_use]
    pub fn shift(self, shift: EmotionShift) -> Self {
        let idx = self.ladder_index();
        match shift {
            EmotionShift::Calmer => Self::LADDER[(idx + 1).min(Self::LADDER.len() - 1)],
            EmotionShift::MoreFrustrated => Self::LADDER[idx.saturating_sub(1)],
            EmotionShift::Confused => Self::Worried,
        }
    }

    /// Upset enough to count as an escalation signal
    #[must_use]
    pub const fn is_escalated(self) -> bool {
        matches!(self, Self::Angry | Self::Frustrated)
    }

    /// Base delay per typed character
    #[must_use]
    pub const fn typing_delay(self) -> Duration {
        let ms = match self {
            Self::Angry | Self::Relieved => 30,
            Self::Frustrated | Self::Hopeful => 35,
            Self::Worried => 60,
            Self::Cautious => 50,
            _ => 40,
        };
        Duration::from_millis(ms)
    }

    /// Voice prosody for this emotion
    #[must_use]
    pub const fn voice_settings(self) -> VoiceSettings {
        let (rate, pitch, volume) = match self {
            Self::Angry => (1.1, 1.1, 0.9),
            Self::Frustrated => (1.0, 1.0, 0.8),
            Self::Worried => (0.8, 0.9, 0.7),
            Self::Cautious => (0.85, 0.95, 0.8),
            Self::Hopeful => (0.95, 1.05, 0.8),
            _ => (0.9, 1.0, 0.8),
        };
        VoiceSettings {
            rate,
            pitch,
            volume,
        }
    }

    /// Phrases a speaker in this state blurts out
    #[must_use]
    pub const fn markers(self) -> &'static [&'static str] {
        match self {
            Self::Frustrated => &["*sigh*", "oh come on", "seriously?", "this is ridiculous"],
            Self::Worried => &["oh no", "oh my god", "what if", "I'm scared"],
            Self::Confused => &["wait, what?", "I don't understand", "huh?", "can you repeat"],
            Self::Relieved => &["thank goodness", "oh thank you", "finally", "that's great"],
            Self::Angry => &[
                "this is unacceptable",
                "I'm so frustrated",
                "what the hell",
                "I want a supervisor",
            ],
            _ => &[],
        }
    }

    /// Display icon
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Frustrated => "😤",
            Self::Cautious => "🤔",
            Self::Anxious => "😰",
            Self::Angry => "😡",
            Self::Worried => "😟",
            Self::Hopeful => "🙂",
            Self::Relieved => "😌",
            _ => "😐",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::LADDER
            .iter()
            .chain([Self::Confused, Self::Anxious].iter())
            .copied()
            .find(|e| e.as_str() == wanted)
            .ok_or_else(|| Error::InvalidEmotion(s.to_string()))
    }
}
