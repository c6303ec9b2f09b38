//! Training scenarios offered by the GUI

use serde::Serialize;

use crate::speech::Emotion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub difficulty: Difficulty,
    pub emotion: Emotion,
    /// Roster id of the customer playing this scenario
    #[serde(skip)]
    pub customer_id: &'static str,
}

/// All scenarios, hardest first
#[must_use]
pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            id: "frustrated_sarah",
            name: "Frustrated Sarah",
            description: "Fraud concern, high emotion",
            difficulty: Difficulty::Hard,
            emotion: Emotion::Frustrated,
            customer_id: "frustrated_sarah_1234",
        },
        Scenario {
            id: "elderly_robert",
            name: "Elderly Robert",
            description: "Needs help, patient but confused",
            difficulty: Difficulty::Medium,
            emotion: Emotion::Confused,
            customer_id: "elderly_robert_5678",
        },
        Scenario {
            id: "anxious_maria",
            name: "Anxious Maria",
            description: "Compromised account, very worried",
            difficulty: Difficulty::Medium,
            emotion: Emotion::Anxious,
            customer_id: "anxious_maria_9012",
        },
    ]
}
