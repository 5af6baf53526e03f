//! Question creation and editing rules applied while a job poster builds a set.

mod set;
mod templates;

pub use set::QuestionSet;
pub use templates::QuestionTemplate;

use serde::{Deserialize, Serialize};

use super::domain::{
    KnockoutCondition, KnockoutValue, QuestionKind, QuestionRole, QuestionType, ScaleBounds,
    ScreeningQuestion, MAX_WEIGHT, MIN_CHOICE_OPTIONS,
};
use super::policy::ScreeningPolicy;
use super::validation::ValidationError;

const NEW_QUESTION_TITLE: &str = "New question";

/// Partial update for a question. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionPatch {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub question_type: Option<QuestionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_knockout: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knockout_condition: Option<KnockoutCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knockout_value: Option<KnockoutValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

/// New optional, scored question with type-specific defaults.
pub fn create_question(question_type: QuestionType) -> ScreeningQuestion {
    create_question_with(question_type, &ScreeningPolicy::default())
}

pub fn create_question_with(
    question_type: QuestionType,
    policy: &ScreeningPolicy,
) -> ScreeningQuestion {
    ScreeningQuestion::new(
        NEW_QUESTION_TITLE,
        false,
        QuestionKind::default_for(question_type),
        QuestionRole::Scored {
            weight: policy.default_scored_weight,
        },
    )
}

/// Apply `patch` to a copy of `question`. The original is untouched on error.
pub fn update_question(
    question: &ScreeningQuestion,
    patch: QuestionPatch,
) -> Result<ScreeningQuestion, ValidationError> {
    update_question_with(question, patch, &ScreeningPolicy::default())
}

pub fn update_question_with(
    question: &ScreeningQuestion,
    patch: QuestionPatch,
    policy: &ScreeningPolicy,
) -> Result<ScreeningQuestion, ValidationError> {
    let mut updated = question.clone();

    if let Some(question_type) = patch.question_type {
        if question_type != updated.question_type() {
            updated.kind = QuestionKind::default_for(question_type);
        }
    }

    if let Some(title) = patch.title {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        updated.title = title.to_string();
    }

    if let Some(required) = patch.required {
        updated.required = required;
    }

    match (patch.is_knockout, updated.is_knockout()) {
        (Some(true), false) => {
            updated.role = QuestionRole::Knockout {
                condition: Some(KnockoutCondition::Equals),
                value: None,
            };
        }
        (Some(false), true) => {
            updated.role = QuestionRole::Scored {
                weight: policy.default_scored_weight,
            };
        }
        _ => {}
    }

    if let Some(weight) = patch.weight {
        match &mut updated.role {
            QuestionRole::Scored { weight: current } => *current = checked_weight(weight)?,
            QuestionRole::Knockout { .. } if weight == 0 => {}
            QuestionRole::Knockout { .. } => return Err(ValidationError::WeightOnKnockout),
        }
    }

    if patch.knockout_condition.is_some() || patch.knockout_value.is_some() {
        match &mut updated.role {
            QuestionRole::Knockout { condition, value } => {
                if let Some(next) = patch.knockout_condition {
                    *condition = Some(next);
                }
                if let Some(next) = patch.knockout_value {
                    if next.is_blank() {
                        return Err(ValidationError::BlankKnockoutValue);
                    }
                    *value = Some(next);
                }
            }
            QuestionRole::Scored { .. } => {
                let field = if patch.knockout_condition.is_some() {
                    "knockout_condition"
                } else {
                    "knockout_value"
                };
                return Err(ValidationError::KnockoutFieldOnScoredQuestion { field });
            }
        }
    }

    if let Some(options) = patch.options {
        match &mut updated.kind {
            QuestionKind::MultipleChoice { options: current } => {
                *current = checked_options(options)?;
            }
            other => return Err(not_applicable("options", other)),
        }
    }

    if patch.min_value.is_some() || patch.max_value.is_some() {
        match &mut updated.kind {
            QuestionKind::Scale { bounds } => {
                let min = patch.min_value.unwrap_or(bounds.min());
                let max = patch.max_value.unwrap_or(bounds.max());
                *bounds = ScaleBounds::new(min, max)?;
            }
            other => {
                let field = if patch.min_value.is_some() {
                    "min_value"
                } else {
                    "max_value"
                };
                return Err(not_applicable(field, other));
            }
        }
    }

    if let Some(cap) = patch.max_length {
        match &mut updated.kind {
            QuestionKind::ShortText { max_length } => {
                *max_length = if cap == 0 { None } else { Some(cap) };
            }
            other => return Err(not_applicable("max_length", other)),
        }
    }

    Ok(updated)
}

/// Append a choice to a multiple choice question.
pub fn add_option(
    question: &ScreeningQuestion,
    label: impl Into<String>,
) -> Result<ScreeningQuestion, ValidationError> {
    let label = label.into().trim().to_string();
    if label.is_empty() {
        return Err(ValidationError::EmptyOption);
    }

    let mut updated = question.clone();
    match &mut updated.kind {
        QuestionKind::MultipleChoice { options } => options.push(label),
        other => return Err(not_applicable("options", other)),
    }
    Ok(updated)
}

/// Drop the choice at `index`, refusing to go below the two-option floor.
pub fn remove_option(
    question: &ScreeningQuestion,
    index: usize,
) -> Result<ScreeningQuestion, ValidationError> {
    let mut updated = question.clone();
    match &mut updated.kind {
        QuestionKind::MultipleChoice { options } => {
            if index >= options.len() {
                return Err(ValidationError::OptionOutOfRange {
                    index,
                    len: options.len(),
                });
            }
            if options.len() <= MIN_CHOICE_OPTIONS {
                return Err(ValidationError::TooFewOptions {
                    remaining: options.len() - 1,
                });
            }
            options.remove(index);
        }
        other => return Err(not_applicable("options", other)),
    }
    Ok(updated)
}

fn checked_weight(weight: u32) -> Result<u8, ValidationError> {
    u8::try_from(weight)
        .ok()
        .filter(|weight| *weight <= MAX_WEIGHT)
        .ok_or(ValidationError::WeightOutOfRange(weight))
}

fn checked_options(options: Vec<String>) -> Result<Vec<String>, ValidationError> {
    let options: Vec<String> = options
        .into_iter()
        .map(|option| option.trim().to_string())
        .collect();
    if options.iter().any(String::is_empty) {
        return Err(ValidationError::EmptyOption);
    }
    if options.len() < MIN_CHOICE_OPTIONS {
        return Err(ValidationError::TooFewOptions {
            remaining: options.len(),
        });
    }
    Ok(options)
}

fn not_applicable(field: &'static str, kind: &QuestionKind) -> ValidationError {
    ValidationError::NotApplicable {
        field,
        question_type: kind.question_type(),
    }
}
