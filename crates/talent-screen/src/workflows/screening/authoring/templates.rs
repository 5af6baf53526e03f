use serde::{Deserialize, Serialize};

use super::super::domain::{
    KnockoutCondition, KnockoutValue, QuestionKind, QuestionRole, ScaleBounds, ScreeningQuestion,
};

/// Starter question sets offered when a posting is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionTemplate {
    General,
    SoftwareEngineer,
    CustomerSupport,
}

impl QuestionTemplate {
    pub const fn label(self) -> &'static str {
        match self {
            QuestionTemplate::General => "general",
            QuestionTemplate::SoftwareEngineer => "software_engineer",
            QuestionTemplate::CustomerSupport => "customer_support",
        }
    }

    /// Fresh questions for this template. Scored weights total 100.
    pub fn questions(self) -> Vec<ScreeningQuestion> {
        match self {
            QuestionTemplate::General => vec![
                knockout(
                    "Are you legally authorized to work in this country?",
                    QuestionKind::YesNo,
                    KnockoutCondition::Equals,
                    "no".into(),
                ),
                scored(
                    "How many years of relevant experience do you have?",
                    true,
                    scale(0, 10),
                    50,
                ),
                scored(
                    "How would you rate your written communication skills?",
                    false,
                    scale(1, 5),
                    30,
                ),
                scored(
                    "Are you willing to work on-site when required?",
                    false,
                    QuestionKind::YesNo,
                    20,
                ),
            ],
            QuestionTemplate::SoftwareEngineer => vec![
                knockout(
                    "How many years of professional software development experience do you have?",
                    scale(0, 20),
                    KnockoutCondition::LessThan,
                    KnockoutValue::Number(2.0),
                ),
                scored(
                    "Which languages have you shipped production code in?",
                    false,
                    choices(&["Rust", "Go", "TypeScript", "Python", "Java"]),
                    20,
                ),
                scored(
                    "Rate your experience operating services in production",
                    true,
                    scale(1, 5),
                    40,
                ),
                scored(
                    "Have you led code reviews for a team?",
                    false,
                    QuestionKind::YesNo,
                    20,
                ),
                scored(
                    "Describe a system you designed end to end",
                    false,
                    QuestionKind::ShortText {
                        max_length: Some(1000),
                    },
                    20,
                ),
            ],
            QuestionTemplate::CustomerSupport => vec![
                knockout(
                    "Are you available for weekend shifts?",
                    QuestionKind::YesNo,
                    KnockoutCondition::Equals,
                    "no".into(),
                ),
                scored(
                    "How many years of customer-facing experience do you have?",
                    true,
                    scale(0, 10),
                    40,
                ),
                scored(
                    "How comfortable are you with ticketing tools?",
                    false,
                    scale(1, 5),
                    30,
                ),
                scored(
                    "Which support channels have you worked?",
                    false,
                    choices(&["Phone", "Email", "Live chat", "Social media"]),
                    30,
                ),
            ],
        }
    }
}

fn scored(title: &str, required: bool, kind: QuestionKind, weight: u8) -> ScreeningQuestion {
    ScreeningQuestion::new(title, required, kind, QuestionRole::Scored { weight })
}

fn knockout(
    title: &str,
    kind: QuestionKind,
    condition: KnockoutCondition,
    value: KnockoutValue,
) -> ScreeningQuestion {
    ScreeningQuestion::new(
        title,
        true,
        kind,
        QuestionRole::Knockout {
            condition: Some(condition),
            value: Some(value),
        },
    )
}

fn scale(min: i64, max: i64) -> QuestionKind {
    let bounds = ScaleBounds::new(min, max).unwrap_or_default();
    QuestionKind::Scale { bounds }
}

fn choices(options: &[&str]) -> QuestionKind {
    QuestionKind::MultipleChoice {
        options: options.iter().map(|option| option.to_string()).collect(),
    }
}
