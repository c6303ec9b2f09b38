//! Canned customer replies

use super::{AccountInfo, CadenceAnalysis};
use crate::speech::Emotion;

/// Reply used before any customer is selected
pub const NO_CUSTOMER_REPLY: &str = "I need help with my account.";

/// What the customer is replying to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Greeting,
    Verification,
    Transaction,
    Process,
    Question,
    General,
}

impl ReplyKind {
    /// Pick the reply kind, first match wins
    #[must_use]
    pub fn classify(message: &str, analysis: &CadenceAnalysis) -> Self {
        let lower = message.to_lowercase();

        if analysis.contains_greeting {
            Self::Greeting
        } else if lower.contains("verify") || lower.contains("security") {
            Self::Verification
        } else if lower.contains("transaction") || lower.contains("charge") {
            Self::Transaction
        } else if analysis.explains_process {
            Self::Process
        } else if analysis.asks_question {
            Self::Question
        } else {
            Self::General
        }
    }
}

/// Base reply before speech decoration
#[must_use]
pub fn contextual_reply(
    message: &str,
    analysis: &CadenceAnalysis,
    emotion: Emotion,
    account: &AccountInfo,
) -> String {
    match ReplyKind::classify(message, analysis) {
        ReplyKind::Greeting => greeting(emotion).to_string(),
        ReplyKind::Verification => verification(emotion).to_string(),
        ReplyKind::Transaction => transaction(emotion, account),
        ReplyKind::Process => process(emotion).to_string(),
        ReplyKind::Question => question(emotion).to_string(),
        ReplyKind::General => general(emotion).to_string(),
    }
}

const fn greeting(emotion: Emotion) -> &'static str {
    match emotion {
        Emotion::Angry => "Finally! I've been trying to reach someone for over an hour!",
        Emotion::Frustrated => "Thank goodness someone answered. I really need help here.",
        Emotion::Worried => {
            "Oh thank you for taking my call. I'm really concerned about my account."
        }
        Emotion::Cautious => "Hello, yes, I need assistance with my banking account please.",
        Emotion::Hopeful => "Hello! I'm hoping you can help me sort out an issue with my account.",
        _ => "Hi, thank you for taking my call. I have a question about my account.",
    }
}

const fn verification(emotion: Emotion) -> &'static str {
    match emotion {
        Emotion::Angry => {
            "Why do I have to go through all this every time? Fine, what do you need?"
        }
        Emotion::Frustrated => "*sigh* Okay, what information do you need from me?",
        Emotion::Worried => "Oh, um, yes of course. What do you need to verify?",
        Emotion::Cautious => "Certainly. I understand you need to verify my identity first.",
        _ => "Of course, what verification information do you need?",
    }
}

fn transaction(emotion: Emotion, account: &AccountInfo) -> String {
    let Some(t) = account.flagged_transaction() else {
        return "I'm not sure which transaction you're referring to.".to_string();
    };
    let merchant = &t.merchant;
    let amount = t.amount.abs();

    match emotion {
        Emotion::Angry => format!(
            "That {merchant} charge for ${amount}? I absolutely did NOT make that purchase!"
        ),
        Emotion::Frustrated => format!(
            "No, I definitely didn't make that purchase at {merchant}. That's why I'm calling."
        ),
        Emotion::Worried => format!(
            "Oh no, that {merchant} charge... I was afraid of that. No, I didn't make that purchase."
        ),
        Emotion::Cautious => {
            format!("The {merchant} transaction? No, I don't recall making that purchase.")
        }
        _ => format!("No, I didn't authorize that {merchant} transaction for ${amount}."),
    }
}

const fn process(emotion: Emotion) -> &'static str {
    match emotion {
        Emotion::Angry => "Fine, just get this fixed as quickly as possible.",
        Emotion::Frustrated => "Okay, I just want this resolved today.",
        Emotion::Worried => "Oh... okay, um, how long will all of this take?",
        Emotion::Cautious => "I see. And this process is secure, correct?",
        Emotion::Hopeful => "That sounds good. I appreciate you explaining the process.",
        _ => "Alright, I understand. What's the next step?",
    }
}

const fn question(emotion: Emotion) -> &'static str {
    match emotion {
        Emotion::Angry => "Look, I just need this fixed. What else do you need to know?",
        Emotion::Frustrated => "I already told you everything I know about this.",
        Emotion::Worried => "Um, I'm not sure... can you help me figure that out?",
        Emotion::Cautious => "Let me think about that for a moment...",
        _ => "Good question. Let me consider that.",
    }
}

const fn general(emotion: Emotion) -> &'static str {
    match emotion {
        Emotion::Angry => "This is ridiculous. I shouldn't have to deal with this.",
        Emotion::Frustrated => "I just want to get this sorted out.",
        Emotion::Worried => "I'm really not sure what to do about this situation.",
        Emotion::Cautious => "I want to make sure we handle this properly.",
        Emotion::Hopeful => "That sounds promising. What can we do?",
        _ => "I see. What would you recommend?",
    }
}
