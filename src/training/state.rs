//! Conversation state and metrics

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;

use super::{CadenceAnalysis, CustomerProfile, Level, ResponseSpeed};
use crate::speech::{Emotion, EmotionShift};

/// Highest trust score
pub const MAX_TRUST: u8 = 10;

/// How the customer feels right now
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationState {
    pub emotion: Emotion,
    pub stress: Level,
    /// 0 to [`MAX_TRUST`]
    pub trust: u8,
    pub cooperation: Level,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self {
            emotion: Emotion::Neutral,
            stress: Level::Low,
            trust: 5,
            cooperation: Level::High,
        }
    }
}

impl ConversationState {
    /// Fresh state for a newly selected customer
    #[must_use]
    pub fn for_customer(customer: &CustomerProfile) -> Self {
        Self {
            emotion: customer.personality.base_emotion,
            ..Self::default()
        }
    }

    /// React to what the representative just said
    pub fn update(&mut self, analysis: &CadenceAnalysis, customer: &CustomerProfile) {
        if analysis.is_empathetic && self.emotion != Emotion::Relieved {
            self.emotion = self.emotion.shift(EmotionShift::Calmer);
        }

        if analysis.response_speed == ResponseSpeed::VerySlow && customer.is_impatient() {
            self.emotion = self.emotion.shift(EmotionShift::MoreFrustrated);
        }

        if analysis.uses_jargon && customer.is_low_tech() {
            self.emotion = self.emotion.shift(EmotionShift::Confused);
        }

        if analysis.shows_confidence {
            self.trust = (self.trust + 1).min(MAX_TRUST);
        }

        if analysis.shows_urgency {
            self.stress = Level::High;
        } else if analysis.shows_patience {
            self.stress = self.stress.lowered();
        }

        tracing::debug!(
            emotion = %self.emotion,
            stress = %self.stress,
            trust = self.trust,
            "conversation state updated"
        );
    }
}

/// Running statistics over a training session
#[derive(Debug, Clone, Default)]
pub struct ConversationMetrics {
    pub response_times: Vec<Duration>,
    pub emotion_history: Vec<Emotion>,
    pub keyword_density: HashMap<String, usize>,
    pub escalation_signals: usize,
}

impl ConversationMetrics {
    /// Record one customer reply given in `emotion`
    pub fn record_reply(&mut self, reply: &str, emotion: Emotion) {
        for word in reply.to_lowercase().split(' ') {
            *self.keyword_density.entry(word.to_string()).or_default() += 1;
        }

        self.emotion_history.push(emotion);
        if emotion.is_escalated() {
            self.escalation_signals += 1;
        }
    }

    /// Mean representative response time, if any were recorded
    #[must_use]
    pub fn average_response_time(&self) -> Option<Duration> {
        let count = u32::try_from(self.response_times.len()).ok()?;
        if count == 0 {
            return None;
        }
        Some(self.response_times.iter().sum::<Duration>() / count)
    }

    /// Most frequent customer words, ties broken alphabetically
    #[must_use]
    pub fn top_keywords(&self, n: usize) -> Vec<(String, usize)> {
        let mut words: Vec<_> = self
            .keyword_density
            .iter()
            .map(|(w, c)| (w.clone(), *c))
            .collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        words.truncate(n);
        words
    }
}
