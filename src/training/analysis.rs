//! Representative message analysis
//!
//! Flags what a representative's message does (empathy, jargon, urgency and
//! so on) and how quickly it arrived. The flags drive the customer's
//! emotional state.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

pattern!(EMPATHETIC, r"(?i)sorry|understand|apologize|concern");
pattern!(DIRECTIVE, r"(?i)need to|must|have to|require");
pattern!(PROVIDES_INFO, r"(?i)let me|I can|according to|shows that");
pattern!(JARGON, r"(?i)verification|authenticate|authorization|compliance");
pattern!(GREETING, r"(?i)hello|hi|good morning|thank you for calling");
pattern!(CLOSING, r"(?i)anything else|help you with|have a great day");
pattern!(URGENCY, r"(?i)immediately|right away|urgent|asap");
pattern!(PATIENCE, r"(?i)take your time|no rush|whenever you're ready");
pattern!(CONFIDENCE, r"(?i)I can help|I'll take care|let me handle");
pattern!(PROCESS, r"(?i)process|procedure|steps|next we'll");
pattern!(SENTENCE_END, r"[.!?]+");
pattern!(CASUAL, r"\b(yeah|ok|sure)\b");
pattern!(GUI_JARGON, r"\b(authenticate|verification|protocol|system)\b");

const SCRIPTED_PHRASES: &[&str] = &[
    "thank you for calling",
    "i'd be happy to help",
    "for security purposes",
    "i understand your concern",
    "let me look into that",
    "is there anything else",
];

const FINANCIAL_TERMS: &[&str] = &[
    "dispute",
    "chargeback",
    "authorization",
    "verification",
    "fraud",
    "transaction",
    "merchant",
    "settlement",
    "account",
    "balance",
];

/// How long the representative took to answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSpeed {
    VeryFast,
    Fast,
    Normal,
    Slow,
    VerySlow,
}

impl ResponseSpeed {
    #[must_use]
    pub fn categorize(elapsed: Duration) -> Self {
        match elapsed.as_millis() {
            0..2_000 => Self::VeryFast,
            2_000..5_000 => Self::Fast,
            5_000..10_000 => Self::Normal,
            10_000..20_000 => Self::Slow,
            _ => Self::VerySlow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

/// Everything noticed about one representative message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct CadenceAnalysis {
    pub response_speed: ResponseSpeed,
    pub is_empathetic: bool,
    pub is_directive: bool,
    pub asks_question: bool,
    pub provides_information: bool,
    pub uses_jargon: bool,
    pub contains_greeting: bool,
    pub contains_closing: bool,
    pub follows_script: bool,
    pub shows_urgency: bool,
    pub shows_patience: bool,
    pub shows_confidence: bool,
    pub explains_process: bool,
    pub terminology_count: usize,
    pub word_count: usize,
    pub sentence_count: usize,
    pub complexity: Complexity,
}

/// Analyze a representative message that took `elapsed` to arrive
#[must_use]
pub fn analyze(message: &str, elapsed: Duration) -> CadenceAnalysis {
    let lower = message.to_lowercase();

    CadenceAnalysis {
        response_speed: ResponseSpeed::categorize(elapsed),
        is_empathetic: EMPATHETIC.is_match(message),
        is_directive: DIRECTIVE.is_match(message),
        asks_question: message.contains('?'),
        provides_information: PROVIDES_INFO.is_match(message),
        uses_jargon: JARGON.is_match(message),
        contains_greeting: GREETING.is_match(message),
        contains_closing: CLOSING.is_match(message),
        follows_script: SCRIPTED_PHRASES.iter().any(|p| lower.contains(p)),
        shows_urgency: URGENCY.is_match(message),
        shows_patience: PATIENCE.is_match(message),
        shows_confidence: CONFIDENCE.is_match(message),
        explains_process: PROCESS.is_match(message),
        terminology_count: FINANCIAL_TERMS.iter().filter(|t| lower.contains(*t)).count(),
        word_count: message.split(' ').count(),
        sentence_count: SENTENCE_END.split(message).count(),
        complexity: complexity(message),
    }
}

fn complexity(message: &str) -> Complexity {
    let words: Vec<&str> = message.split(' ').collect();
    let letters: usize = words.iter().map(|w| w.chars().count()).sum();

    #[allow(clippy::cast_precision_loss)]
    let avg = letters as f64 / words.len() as f64;

    if avg > 6.0 && words.len() > 20 {
        Complexity::High
    } else if avg > 4.0 && words.len() > 10 {
        Complexity::Medium
    } else {
        Complexity::Low
    }
}

/// Quick quality scores for the training GUI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityScores {
    /// Simulated seconds the representative took
    pub response_time: f64,
    /// 0 to 10
    pub empathy_score: f64,
    /// 0 to 10
    pub professionalism_score: f64,
    /// Share of jargon words, 0 to 100
    pub jargon_score: f64,
}

/// Score a message with a little randomness, as the GUI expects
#[allow(clippy::cast_precision_loss)]
pub fn score_message<R: Rng + ?Sized>(message: &str, rng: &mut R) -> QualityScores {
    let lower = message.to_lowercase();
    let bonus = |word: &str, points: f64| if lower.contains(word) { points } else { 0.0 };

    let empathy = bonus("sorry", 3.0)
        + bonus("understand", 2.0)
        + bonus("help", 2.0)
        + rng.gen_range(0.0..5.0);

    let casual = CASUAL.find_iter(&lower).count() as f64;
    let professionalism = casual.mul_add(-2.0, 8.0) + rng.gen_range(0.0..2.0);

    let jargon = GUI_JARGON.find_iter(&lower).count() as f64;
    let words = message.split(' ').count() as f64;

    QualityScores {
        response_time: 2.5 + rng.gen_range(0.0..2.0),
        empathy_score: empathy.clamp(0.0, 10.0),
        professionalism_score: professionalism.clamp(0.0, 10.0),
        jargon_score: (jargon / words * 100.0).min(100.0),
    }
}
