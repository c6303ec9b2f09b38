//! Simulated customer profiles
//!
//! Each profile bundles a personality, an account snapshot and the speech
//! habits used to decorate replies.

use serde::{Deserialize, Serialize};

use crate::speech::{Emotion, SpeechPatterns};
use crate::{Error, Result};

/// Coarse ordinal level used for patience, trust and tech savvy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Level {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VeryLow => "very_low",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        }
    }

    /// One step down, never below `Low`
    #[must_use]
    pub const fn lowered(self) -> Self {
        match self {
            Self::VeryHigh => Self::High,
            Self::High => Self::Medium,
            Self::Medium | Self::Low => Self::Low,
            Self::VeryLow => Self::VeryLow,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a customer talks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationStyle {
    Direct,
    Polite,
    Apologetic,
}

impl CommunicationStyle {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Polite => "polite",
            Self::Apologetic => "apologetic",
        }
    }
}

/// Preferred conversation pace; `Variable` follows the moment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredPace {
    Slow,
    Fast,
    Variable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personality {
    pub base_emotion: Emotion,
    pub communication_style: CommunicationStyle,
    pub tech_savvy: Level,
    pub patience: Level,
    pub trust_in_banks: Level,
    pub preferred_pace: PreferredPace,
}

/// Circumstances of the call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Situation {
    pub stress: Level,
    pub time_constraints: String,
    pub previous_calls: u32,
    pub issue_complexity: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    Active,
    Locked,
    Compromised,
}

impl CardStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Locked => "locked",
            Self::Compromised => "compromised",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Posted,
    Pending,
}

impl TransactionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Posted => "posted",
            Self::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: String,
    pub amount: f64,
    pub merchant: String,
    pub flagged: bool,
    pub status: TransactionStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// e.g. `checking`
    pub account_type: String,
    pub balance: f64,
    pub card_status: CardStatus,
    pub recent_transactions: Vec<Transaction>,
}

impl AccountInfo {
    /// First transaction marked as suspicious
    #[must_use]
    pub fn flagged_transaction(&self) -> Option<&Transaction> {
        self.recent_transactions.iter().find(|t| t.flagged)
    }
}

/// A simulated customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub id: String,
    pub account_number: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub personality: Personality,
    pub situation: Situation,
    pub account: AccountInfo,
    pub speech: SpeechPatterns,
}

impl CustomerProfile {
    /// Customer loses patience quickly
    #[must_use]
    pub fn is_impatient(&self) -> bool {
        self.personality.patience <= Level::Low
    }

    /// Customer gets lost in technical language
    #[must_use]
    pub fn is_low_tech(&self) -> bool {
        self.personality.tech_savvy <= Level::Low
    }
}

fn txn(
    date: &str,
    amount: f64,
    merchant: &str,
    flagged: bool,
    status: TransactionStatus,
) -> Transaction {
    Transaction {
        date: date.to_string(),
        amount,
        merchant: merchant.to_string(),
        flagged,
        status,
    }
}

/// The built-in customers
#[must_use]
pub fn roster() -> Vec<CustomerProfile> {
    use TransactionStatus::{Pending, Posted};

    vec![
        CustomerProfile {
            id: "frustrated_sarah_1234".to_string(),
            account_number: "****1234".to_string(),
            name: "Sarah Johnson".to_string(),
            phone: "555-0123".to_string(),
            email: "sarah.j@email.com".to_string(),
            personality: Personality {
                base_emotion: Emotion::Frustrated,
                communication_style: CommunicationStyle::Direct,
                tech_savvy: Level::Low,
                patience: Level::Low,
                trust_in_banks: Level::Medium,
                preferred_pace: PreferredPace::Fast,
            },
            situation: Situation {
                stress: Level::High,
                time_constraints: "urgent".to_string(),
                previous_calls: 2,
                issue_complexity: "medium".to_string(),
            },
            account: AccountInfo {
                account_type: "checking".to_string(),
                balance: 1247.82,
                card_status: CardStatus::Active,
                recent_transactions: vec![
                    txn("2025-06-14", -523.99, "Unknown Merchant XYZ", true, Pending),
                    txn("2025-06-13", -45.00, "Gas Station", false, Posted),
                ],
            },
            speech: SpeechPatterns {
                interrupts_frequently: true,
                speaks_quickly: true,
                uses_slang: true,
                repeats_concerns: true,
                ..SpeechPatterns::default()
            },
        },
        CustomerProfile {
            id: "elderly_robert_5678".to_string(),
            account_number: "****5678".to_string(),
            name: "Robert Martinez".to_string(),
            phone: "555-0456".to_string(),
            email: "r.martinez@email.com".to_string(),
            personality: Personality {
                base_emotion: Emotion::Cautious,
                communication_style: CommunicationStyle::Polite,
                tech_savvy: Level::VeryLow,
                patience: Level::High,
                trust_in_banks: Level::High,
                preferred_pace: PreferredPace::Slow,
            },
            situation: Situation {
                stress: Level::Medium,
                time_constraints: "none".to_string(),
                previous_calls: 0,
                issue_complexity: "simple".to_string(),
            },
            account: AccountInfo {
                account_type: "savings".to_string(),
                balance: 8543.21,
                card_status: CardStatus::Locked,
                recent_transactions: vec![txn(
                    "2025-06-12",
                    -89.99,
                    "Online Purchase",
                    true,
                    Posted,
                )],
            },
            speech: SpeechPatterns {
                speaks_slowly: true,
                uses_polite_language: true,
                stutters_when_confused: true,
                asks_for_clarification: true,
                repeats_information: true,
                ..SpeechPatterns::default()
            },
        },
        CustomerProfile {
            id: "anxious_maria_9012".to_string(),
            account_number: "****9012".to_string(),
            name: "Maria Rodriguez".to_string(),
            phone: "555-0789".to_string(),
            email: "maria.r@email.com".to_string(),
            personality: Personality {
                base_emotion: Emotion::Anxious,
                communication_style: CommunicationStyle::Apologetic,
                tech_savvy: Level::Medium,
                patience: Level::Medium,
                trust_in_banks: Level::Low,
                preferred_pace: PreferredPace::Variable,
            },
            situation: Situation {
                stress: Level::VeryHigh,
                time_constraints: "moderate".to_string(),
                previous_calls: 1,
                issue_complexity: "high".to_string(),
            },
            account: AccountInfo {
                account_type: "checking".to_string(),
                balance: 156.43,
                card_status: CardStatus::Compromised,
                recent_transactions: vec![
                    txn("2025-06-14", -1200.00, "Cash Advance ATM", true, Pending),
                    txn("2025-06-14", -890.50, "Electronics Store", true, Pending),
                ],
            },
            speech: SpeechPatterns {
                uses_filler_words: true,
                stutters_when_stressed: true,
                breathes_heavily: true,
                repeats_questions: true,
                apologizes_often: true,
                ..SpeechPatterns::default()
            },
        },
    ]
}

/// Look up a customer by id
///
/// # Errors
///
/// Returns error if no customer has this id
pub fn find_customer(id: &str) -> Result<CustomerProfile> {
    roster()
        .into_iter()
        .find(|c| c.id.eq_ignore_ascii_case(id.trim()))
        .ok_or_else(|| Error::UnknownCustomer(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_has_three_customers() {
        let ids: Vec<_> = roster().into_iter().map(|c| c.id).collect();
        assert_eq!(
            ids,
            ["frustrated_sarah_1234", "elderly_robert_5678", "anxious_maria_9012"]
        );
    }

    #[test]
    fn find_is_case_insensitive() {
        let robert = find_customer("Elderly_Robert_5678").unwrap();
        assert_eq!(robert.name, "Robert Martinez");
        assert!(matches!(
            find_customer("nobody"),
            Err(Error::UnknownCustomer(_))
        ));
    }

    #[test]
    fn flagged_transaction_skips_clean_ones() {
        let sarah = find_customer("frustrated_sarah_1234").unwrap();
        let flagged = sarah.account.flagged_transaction().unwrap();
        assert_eq!(flagged.merchant, "Unknown Merchant XYZ");
    }

    #[test]
    fn levels_are_ordered() {
        assert!(Level::VeryLow < Level::Low);
        assert_eq!(Level::VeryHigh.lowered(), Level::High);
        assert_eq!(Level::Low.lowered(), Level::Low);
        assert_eq!(Level::VeryLow.lowered(), Level::VeryLow);
    }

    #[test]
    fn impatience_and_tech_savvy() {
        let sarah = find_customer("frustrated_sarah_1234").unwrap();
        let robert = find_customer("elderly_robert_5678").unwrap();
        let maria = find_customer("anxious_maria_9012").unwrap();
        assert!(sarah.is_impatient());
        assert!(!robert.is_impatient());
        assert!(robert.is_low_tech());
        assert!(!maria.is_low_tech());
    }
}
