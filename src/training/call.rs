//! Scripted service calls
//!
//! A scenario briefs the representative, routes an incoming call from a
//! matching customer and then grades every message against service habits
//! and financial-services protocol.

use std::time::Instant;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use crate::{Error, Result};

pattern!(GREETING, r"(?i)\b(hello|hi|good (morning|afternoon|evening)|thank you for calling)\b");
pattern!(EMPATHY, r"(?i)understand|sorry|apologize|concern|help|assist");
pattern!(VERIFICATION, r"(?i)verify|confirm|security|identity|name|address|phone|ssn");
pattern!(INFORMS, r"(?i)let me|I can|here's|according to|shows|indicates");
pattern!(FILLER, r"(?i)\b(um|uh|like|totally|awesome|cool)\b");
pattern!(ACCOUNT_DIGITS, r"\b\d{4,}\b");
pattern!(SSN, r"\b\d{3}-\d{2}-\d{4}\b");
pattern!(PROFANITY, r"(?i)\b(damn|hell|crap|stupid)\b");
pattern!(SECURITY_FOCUS, r"(?i)verify|secure|protect|confirm");

const OBJECTIVES: usize = 5;
const OPENINGS: usize = 3;
/// Points per qualifying message, per category
const STEP: u32 = 20;
const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ScenarioLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Beginner => "🟢",
            Self::Intermediate => "🟡",
            Self::Advanced => "🔴",
        }
    }
}

/// A call the representative can practice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallScenario {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub level: ScenarioLevel,
    pub objectives: [&'static str; OBJECTIVES],
    /// What the customer may say first
    pub openings: [&'static str; OPENINGS],
    /// Roster id of the caller
    #[serde(skip)]
    pub customer_id: &'static str,
}

impl CallScenario {
    /// Title, level, description and numbered objectives
    #[must_use]
    pub fn briefing(&self) -> String {
        let mut out = format!(
            "\n🎭 Starting Scenario: {}\n📊 Difficulty: {}\n📝 Description: {}\n\n🎯 Training Objectives:\n",
            self.title,
            self.level.as_str().to_uppercase(),
            self.description,
        );
        for (i, objective) in self.objectives.iter().enumerate() {
            out.push_str(&format!("   {}. {objective}\n", i + 1));
        }
        out.push('\n');
        out
    }

    /// Pick one of the opening lines
    pub fn opening<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        self.openings[rng.gen_range(0..OPENINGS)]
    }
}

static CALL_SCENARIOS: [CallScenario; 5] = [
    CallScenario {
        id: "fraud_detection",
        title: "Fraud Detection & Response",
        description: "Customer calls about suspicious activity on their account",
        level: ScenarioLevel::Intermediate,
        objectives: [
            "Verify customer identity",
            "Review flagged transactions",
            "Determine if fraud occurred",
            "Take appropriate protective actions",
            "Educate customer on prevention",
        ],
        openings: [
            "Hi, I'm calling because I got an alert about suspicious activity on my account. I'm really worried someone might have stolen my card information.",
            "Hello, I need help right away. There's a charge on my account for over $500 from a merchant I've never heard of!",
            "I just checked my account online and there's a huge purchase I didn't make. What's going on with my account?",
        ],
        customer_id: "frustrated_sarah_1234",
    },
    CallScenario {
        id: "dispute_resolution",
        title: "Transaction Dispute Resolution",
        description: "Customer wants to dispute a charge they don't recognize",
        level: ScenarioLevel::Beginner,
        objectives: [
            "Gather dispute details",
            "Review transaction information",
            "Explain dispute process",
            "File dispute if appropriate",
            "Set expectations for timeline",
        ],
        openings: [
            "I need to dispute a charge on my account. There's something there that I definitely didn't authorize.",
            "Hi, I'm looking at my statement and there's a charge I don't recognize. Can you help me figure out what it is?",
            "I want to file a dispute. There's a merchant charge that doesn't look right to me.",
        ],
        customer_id: "elderly_robert_5678",
    },
    CallScenario {
        id: "account_verification",
        title: "Identity Verification",
        description: "Customer locked out needs to verify identity",
        level: ScenarioLevel::Beginner,
        objectives: [
            "Follow verification procedures",
            "Ask appropriate security questions",
            "Maintain security protocols",
            "Assist with account access",
            "Document verification attempt",
        ],
        openings: [
            "I'm locked out of my online banking and I need to access my account urgently.",
            "Hi, I can't log into my account and I need to check my balance for a payment today.",
            "My account seems to be frozen or something. I can't access anything online.",
        ],
        customer_id: "anxious_maria_9012",
    },
    CallScenario {
        id: "card_services",
        title: "Lost/Stolen Card Assistance",
        description: "Customer reports lost or stolen debit card",
        level: ScenarioLevel::Beginner,
        objectives: [
            "Secure the compromised card",
            "Review recent transactions",
            "Order replacement card",
            "Explain temporary solutions",
            "Provide follow-up information",
        ],
        openings: [
            "I think I lost my debit card. I can't find it anywhere and I'm worried someone might use it.",
            "My card was stolen from my car last night. I need to cancel it immediately!",
            "I can't find my debit card and I'm not sure if I lost it or if someone took it.",
        ],
        customer_id: "anxious_maria_9012",
    },
    CallScenario {
        id: "complex_fraud",
        title: "Complex Fraud Investigation",
        description: "Multiple suspicious transactions across several days",
        level: ScenarioLevel::Advanced,
        objectives: [
            "Analyze transaction patterns",
            "Coordinate with fraud team",
            "Manage customer expectations",
            "Document investigation steps",
            "Provide interim solutions",
        ],
        openings: [
            "This is the third time I'm calling about fraudulent charges. Nothing has been resolved and now there are even more suspicious transactions!",
            "I'm extremely frustrated. Despite reporting fraud last week, there are new unauthorized charges and my account still isn't secure!",
            "I need to speak to a supervisor immediately. This fraud situation is getting worse, not better.",
        ],
        customer_id: "frustrated_sarah_1234",
    },
];

/// Every practice call, in menu order
#[must_use]
pub fn call_scenarios() -> &'static [CallScenario] {
    &CALL_SCENARIOS
}

/// Look up a practice call by id
///
/// # Errors
///
/// Returns error if no scenario has this id
pub fn find_call_scenario(id: &str) -> Result<&'static CallScenario> {
    CALL_SCENARIOS
        .iter()
        .find(|s| s.id.eq_ignore_ascii_case(id.trim()))
        .ok_or_else(|| Error::UnknownScenario(id.to_string()))
}

/// Financial-services rules a message must keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ProtocolCheck {
    /// No run of four or more digits
    pub no_account_details: bool,
    pub no_ssn: bool,
    pub appropriate_language: bool,
    /// Talks about verifying or protecting the account
    pub security_focus: bool,
}

impl ProtocolCheck {
    #[must_use]
    pub fn check(message: &str) -> Self {
        Self {
            no_account_details: !ACCOUNT_DIGITS.is_match(message),
            no_ssn: !SSN.is_match(message),
            appropriate_language: !PROFANITY.is_match(message),
            security_focus: SECURITY_FOCUS.is_match(message),
        }
    }

    /// Warnings for every broken rule
    #[must_use]
    pub fn violations(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if !self.no_account_details {
            out.push("🚫 PROTOCOL: Never read out full account numbers");
        }
        if !self.no_ssn {
            out.push("🚫 PROTOCOL: Never share a Social Security number");
        }
        if !self.appropriate_language {
            out.push("🚫 PROTOCOL: Keep your language professional");
        }
        out
    }
}

/// What one representative message did well
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ServiceCheck {
    pub greeting: bool,
    pub empathy: bool,
    pub verification: bool,
    pub informs: bool,
    pub asks_question: bool,
    /// Free of filler and slang
    pub professional: bool,
    pub protocol: ProtocolCheck,
}

impl ServiceCheck {
    #[must_use]
    pub fn check(message: &str) -> Self {
        Self {
            greeting: GREETING.is_match(message),
            empathy: EMPATHY.is_match(message),
            verification: VERIFICATION.is_match(message),
            informs: INFORMS.is_match(message),
            asks_question: message.contains('?'),
            professional: !FILLER.is_match(message),
            protocol: ProtocolCheck::check(message),
        }
    }
}

/// Coaching shown after the latest message of `checks`
#[must_use]
pub fn progress_tips(checks: &[ServiceCheck]) -> Vec<&'static str> {
    let Some(latest) = checks.last() else {
        return Vec::new();
    };

    let mut tips = Vec::new();
    if checks.len() == 1 && !latest.greeting {
        tips.push("💡 TIP: Consider starting with a professional greeting");
    }
    if checks.len() >= 2 && !checks.iter().any(|c| c.verification) {
        tips.push("⚠️  REMINDER: Don't forget to verify customer identity");
    }
    tips.extend(latest.protocol.violations());
    tips
}

/// Running performance grade, each part out of 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CallScore {
    pub professionalism: u32,
    pub protocol: u32,
    pub empathy: u32,
    pub efficiency: u32,
}

impl CallScore {
    /// Grade a call; `None` before the first message
    #[must_use]
    pub fn from_checks(checks: &[ServiceCheck]) -> Option<Self> {
        if checks.is_empty() {
            return None;
        }

        let points = |hit: fn(&ServiceCheck) -> bool| {
            let hits = u32::try_from(checks.iter().filter(|c| hit(c)).count()).unwrap_or(u32::MAX);
            hits.saturating_mul(STEP).min(MAX_SCORE)
        };

        Some(Self {
            professionalism: points(|c| c.professional),
            protocol: points(|c| c.protocol.security_focus),
            empathy: points(|c| c.empathy),
            efficiency: points(|c| c.asks_question && c.informs),
        })
    }

    #[must_use]
    pub const fn overall(&self) -> u32 {
        let sum = self.professionalism + self.protocol + self.empathy + self.efficiency;
        (sum + 2) / 4
    }

    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "\n📊 Current Performance Score\n\
             ════════════════════════════\n\
             Professionalism: {}/100\n\
             Protocol Compliance: {}/100\n\
             Empathy & Service: {}/100\n\
             Efficiency: {}/100\n\n\
             Overall Score: {}/100\n",
            self.professionalism,
            self.protocol,
            self.empathy,
            self.efficiency,
            self.overall(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub at: DateTime<Utc>,
    pub text: String,
}

/// Everything logged about the current call
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub scenario: Option<&'static str>,
    started: Instant,
    checks: Vec<ServiceCheck>,
    notes: Vec<Note>,
    pub resolved: bool,
    pub escalated: bool,
}

impl Default for CallRecord {
    fn default() -> Self {
        Self::new(None)
    }
}

impl CallRecord {
    #[must_use]
    pub fn new(scenario: Option<&'static str>) -> Self {
        Self {
            scenario,
            started: Instant::now(),
            checks: Vec::new(),
            notes: Vec::new(),
            resolved: false,
            escalated: false,
        }
    }

    /// Grade `message` and keep the result
    pub fn record(&mut self, message: &str) -> ServiceCheck {
        let check = ServiceCheck::check(message);
        self.checks.push(check);
        check
    }

    #[must_use]
    pub fn checks(&self) -> &[ServiceCheck] {
        &self.checks
    }

    pub fn add_note(&mut self, text: &str) {
        self.notes.push(Note {
            at: Utc::now(),
            text: text.to_string(),
        });
    }

    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    #[must_use]
    pub fn score(&self) -> Option<CallScore> {
        CallScore::from_checks(&self.checks)
    }

    #[must_use]
    pub fn render_notes(&self) -> String {
        let mut out = String::from("\n📝 Call Notes\n═════════════\n");
        if self.notes.is_empty() {
            out.push_str("No notes recorded for this call\n");
        }
        for (i, note) in self.notes.iter().enumerate() {
            out.push_str(&format!("{}. [{}] {}\n", i + 1, note.at.format("%H:%M:%S"), note.text));
        }
        out
    }

    /// Duration, outcome flags and the score so far
    #[must_use]
    pub fn render_summary(&self) -> String {
        let yes_no = |flag: bool| if flag { "Yes" } else { "No" };
        let seconds = self.started.elapsed().as_secs_f64().round();

        let mut out = String::from("\n📋 Session Summary\n══════════════════\n");
        if let Some(id) = self.scenario {
            out.push_str(&format!("Scenario: {id}\n"));
        }
        out.push_str(&format!("Duration: {seconds}s\n"));
        out.push_str(&format!("Interactions: {}\n", self.checks.len()));
        out.push_str(&format!("Resolved: {}\n", yes_no(self.resolved)));
        out.push_str(&format!("Escalated: {}\n", yes_no(self.escalated)));
        out.push_str(&format!("Notes: {}\n", self.notes.len()));
        match self.score() {
            Some(score) => out.push_str(&score.render()),
            None => out.push_str("📊 No interactions to score yet\n"),
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::training::find_customer;

    #[test]
    fn every_call_has_a_caller() {
        for scenario in call_scenarios() {
            assert!(find_customer(scenario.customer_id).is_ok(), "{}", scenario.id);
        }
    }

    #[test]
    fn find_ignores_case_and_rejects_unknown() {
        assert_eq!(find_call_scenario("Card_Services").unwrap().level, ScenarioLevel::Beginner);
        assert!(matches!(
            find_call_scenario("small_talk"),
            Err(Error::UnknownScenario(_))
        ));
    }

    #[test]
    fn briefing_lists_objectives() {
        let text = find_call_scenario("complex_fraud").unwrap().briefing();
        assert!(text.contains("🎭 Starting Scenario: Complex Fraud Investigation"));
        assert!(text.contains("📊 Difficulty: ADVANCED"));
        assert!(text.contains("   5. Provide interim solutions"));
    }

    #[test]
    fn opening_comes_from_the_scenario() {
        let scenario = find_call_scenario("dispute_resolution").unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..10 {
            assert!(scenario.openings.contains(&scenario.opening(&mut rng)));
        }
    }

    #[test]
    fn protocol_flags_numbers_and_language() {
        let check = ProtocolCheck::check("Your account 12345678 is secure");
        assert!(!check.no_account_details);
        assert!(check.security_focus);

        let check = ProtocolCheck::check("Is your SSN 123-45-6789? What the hell.");
        assert!(!check.no_ssn);
        assert!(!check.appropriate_language);
        assert_eq!(check.violations().len(), 2);

        let check = ProtocolCheck::check("The card was used at the Shell station at 9:45");
        assert!(check.violations().is_empty());
    }

    #[test]
    fn filler_words_need_word_boundaries() {
        assert!(!ServiceCheck::check("Um, let me look").professional);
        assert!(!ServiceCheck::check("I would like to verify your name").professional);
        assert!(ServiceCheck::check("Let me check the likely cause").professional);
    }

    #[test]
    fn greeting_tip_only_on_first_message() {
        let checks = [ServiceCheck::check("What is the problem?")];
        assert_eq!(
            progress_tips(&checks),
            ["💡 TIP: Consider starting with a professional greeting"]
        );

        let checks = [ServiceCheck::check("Good morning, thank you for calling.")];
        assert!(progress_tips(&checks).is_empty());
    }

    #[test]
    fn verification_reminder_after_two_messages() {
        let mut record = CallRecord::new(None);
        record.record("Hello there.");
        record.record("I'm sorry to hear that.");
        assert_eq!(
            progress_tips(record.checks()),
            ["⚠️  REMINDER: Don't forget to verify customer identity"]
        );

        record.record("Can you confirm your phone number?");
        assert!(progress_tips(record.checks()).is_empty());
    }

    #[test]
    fn score_caps_each_part() {
        let mut record = CallRecord::new(Some("fraud_detection"));
        assert!(record.score().is_none());

        for _ in 0..6 {
            record.record("I understand. Let me verify your account, can you confirm your name?");
        }
        record.record("um cool");

        let score = record.score().unwrap();
        assert_eq!(score.professionalism, 100);
        assert_eq!(score.protocol, 100);
        assert_eq!(score.empathy, 100);
        assert_eq!(score.efficiency, 100);
        assert_eq!(score.overall(), 100);
    }

    #[test]
    fn overall_is_the_mean() {
        let score = CallScore {
            professionalism: 40,
            protocol: 20,
            empathy: 20,
            efficiency: 0,
        };
        assert_eq!(score.overall(), 20);
        assert!(score.render().contains("Protocol Compliance: 20/100"));
    }

    #[test]
    fn summary_tracks_outcome_and_notes() {
        let mut record = CallRecord::new(Some("card_services"));
        assert!(record.render_summary().contains("📊 No interactions to score yet"));

        record.add_note("Card blocked, Replacement ordered");
        record.record("Hello, I can help.");
        record.escalated = true;

        let summary = record.render_summary();
        assert!(summary.contains("Scenario: card_services"));
        assert!(summary.contains("Interactions: 1"));
        assert!(summary.contains("Resolved: No"));
        assert!(summary.contains("Escalated: Yes"));
        assert!(summary.contains("Notes: 1"));
        assert!(summary.contains("Overall Score:"));
        assert!(record.render_notes().contains("] Card blocked, Replacement ordered"));
    }
}
