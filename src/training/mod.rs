//! Customer-service training simulator
//!
//! A representative practices on simulated bank customers whose mood, speech
//! habits and timing react to how they are spoken to.

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: std::sync::LazyLock<regex::Regex> =
            std::sync::LazyLock::new(|| regex::Regex::new($re).expect("valid regex"));
    };
}

mod analysis;
mod call;
mod customer;
mod responses;
mod scenario;
mod session;
mod state;

pub use analysis::{
    CadenceAnalysis, Complexity, QualityScores, ResponseSpeed, analyze, score_message,
};
pub use call::{
    CallRecord, CallScenario, CallScore, Note, ProtocolCheck, ScenarioLevel, ServiceCheck,
    call_scenarios, find_call_scenario, progress_tips,
};
pub use customer::{
    AccountInfo, CardStatus, CommunicationStyle, CustomerProfile, Level, Personality,
    PreferredPace, Situation, Transaction, TransactionStatus, find_customer, roster,
};
pub use responses::{NO_CUSTOMER_REPLY, ReplyKind, contextual_reply};
pub use scenario::{Difficulty, Scenario, scenarios};
pub use session::{AnalysisReport, Interaction, TrainingSession};
pub use state::{ConversationMetrics, ConversationState, MAX_TRUST};

/// Walkthrough printed before the demo session starts
pub const DEMO_INTRO: &str = "🎬 Enhanced Financial Training AI Demo
════════════════════════════════════════
This demo shows natural conversation patterns including:
• Conversation cadence analysis
• Natural speech patterns (stuttering, pauses, breath control)
• Emotional state adaptation
• Human-like interactions

🎭 Demo Scenarios Available:

1. Frustrated customer with fraud concern
2. Elderly customer needing help
3. Anxious customer with compromised account

Starting interactive demo...

💡 Try different approaches and notice how the customer responds:
   - Quick vs. slow responses
   - Technical jargon vs. simple language
   - Empathetic vs. directive tone
   - Patient vs. urgent communication

🎯 Training Tips:
   • Watch for stuttering when customers are confused
   • Notice breathing patterns when customers are stressed
   • Observe how emotional state changes based on your approach
   • Pay attention to interruption patterns from impatient customers

";
