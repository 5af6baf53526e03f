use serde::Serialize;

use super::domain::{QuestionId, QuestionType, ScreeningQuestion};
use super::policy::ScreeningPolicy;

/// Authoring-time violations that block saving a single question.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("question title must not be empty")]
    EmptyTitle,
    #[error("multiple choice questions must keep at least 2 options (would leave {remaining})")]
    TooFewOptions { remaining: usize },
    #[error("option labels must not be empty")]
    EmptyOption,
    #[error("option index {index} is out of range for {len} options")]
    OptionOutOfRange { index: usize, len: usize },
    #[error("scale minimum {min} must be lower than maximum {max}")]
    InvalidScaleRange { min: i64, max: i64 },
    #[error("weight {0} is outside 0..=100")]
    WeightOutOfRange(u32),
    #[error("knockout questions cannot carry a scoring weight")]
    WeightOnKnockout,
    #[error("{field} only applies to knockout questions")]
    KnockoutFieldOnScoredQuestion { field: &'static str },
    #[error("knockout value must not be blank")]
    BlankKnockoutValue,
    #[error("{field} does not apply to {question_type} questions")]
    NotApplicable {
        field: &'static str,
        question_type: QuestionType,
    },
    #[error("question {0} already exists in this set")]
    DuplicateQuestion(QuestionId),
    #[error("question {0} is not part of this set")]
    UnknownQuestion(QuestionId),
    #[error("position {index} is out of range for {len} questions")]
    PositionOutOfRange { index: usize, len: usize },
}

/// Advisory findings for a whole question set. Never blocks publishing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    TooManyQuestions {
        count: usize,
        recommended: usize,
    },
    TooManyKnockouts {
        count: usize,
        recommended: usize,
    },
    WeightImbalance {
        total: u32,
        target: u32,
        tolerance: u32,
    },
    IncompleteKnockout {
        label: String,
        question_id: QuestionId,
    },
}

impl ValidationWarning {
    pub const fn code(&self) -> &'static str {
        match self {
            ValidationWarning::TooManyQuestions { .. } => "too_many_questions",
            ValidationWarning::TooManyKnockouts { .. } => "too_many_knockouts",
            ValidationWarning::WeightImbalance { .. } => "weight_imbalance",
            ValidationWarning::IncompleteKnockout { .. } => "incomplete_knockout",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ValidationWarning::TooManyQuestions { count, recommended } => format!(
                "{count} questions configured; reduce to {recommended} or fewer to protect the completion rate"
            ),
            ValidationWarning::TooManyKnockouts { count, recommended } => format!(
                "{count} knockout questions may shrink the applicant pool (recommended at most {recommended})"
            ),
            ValidationWarning::WeightImbalance {
                total,
                target,
                tolerance,
            } => format!(
                "scored question weights total {total}%, expected {target}% (within {tolerance} points)"
            ),
            ValidationWarning::IncompleteKnockout { label, .. } => {
                format!("{label} is a knockout question without a complete condition and value")
            }
        }
    }

    pub fn view(&self) -> WarningView {
        WarningView {
            code: self.code(),
            message: self.message(),
        }
    }
}

/// Serializable projection of a warning for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarningView {
    pub code: &'static str,
    pub message: String,
}

pub fn validate_question_set(
    questions: &[ScreeningQuestion],
    policy: &ScreeningPolicy,
) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if questions.len() > policy.max_recommended_questions {
        warnings.push(ValidationWarning::TooManyQuestions {
            count: questions.len(),
            recommended: policy.max_recommended_questions,
        });
    }

    let knockouts = questions.iter().filter(|question| question.is_knockout()).count();
    if knockouts > policy.max_recommended_knockouts {
        warnings.push(ValidationWarning::TooManyKnockouts {
            count: knockouts,
            recommended: policy.max_recommended_knockouts,
        });
    }

    let scored: Vec<_> = questions
        .iter()
        .filter(|question| !question.is_knockout())
        .collect();
    if !scored.is_empty() {
        let total: u32 = scored
            .iter()
            .map(|question| u32::from(question.weight()))
            .sum();
        if total.abs_diff(policy.target_weight_total) > policy.weight_tolerance {
            warnings.push(ValidationWarning::WeightImbalance {
                total,
                target: policy.target_weight_total,
                tolerance: policy.weight_tolerance,
            });
        }
    }

    for (index, question) in questions.iter().enumerate() {
        if question.is_knockout() && question.check_integrity().is_err() {
            warnings.push(ValidationWarning::IncompleteKnockout {
                label: format!("Q{}", index + 1),
                question_id: question.id().clone(),
            });
        }
    }

    warnings
}
