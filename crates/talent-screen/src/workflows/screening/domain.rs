use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

/// Minimum number of choices a multiple choice question must keep.
pub const MIN_CHOICE_OPTIONS: usize = 2;
/// Upper bound for a scored question's weight.
pub const MAX_WEIGHT: u8 = 100;

/// Identifier wrapper for screening questions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(pub String);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&QuestionId> for QuestionId {
    fn from(value: &QuestionId) -> Self {
        value.clone()
    }
}

static QUESTION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_question_id() -> QuestionId {
    let id = QUESTION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    QuestionId(format!("q-{id:06}"))
}

/// Wire discriminant for the four supported question shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    YesNo,
    Scale,
    ShortText,
}

impl QuestionType {
    pub const fn label(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::YesNo => "yes_no",
            QuestionType::Scale => "scale",
            QuestionType::ShortText => "short_text",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive integer range for scale questions. Always satisfies `min < max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleBounds {
    min: i64,
    max: i64,
}

impl ScaleBounds {
    pub fn new(min: i64, max: i64) -> Result<Self, ValidationError> {
        if min >= max {
            return Err(ValidationError::InvalidScaleRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// Position of `value` within the range, clamped to `0.0..=1.0`.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = (i128::from(self.max) - i128::from(self.min)) as f64;
        ((value - self.min as f64) / span).clamp(0.0, 1.0)
    }
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self { min: 1, max: 5 }
    }
}

/// Type-specific shape of a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    MultipleChoice { options: Vec<String> },
    YesNo,
    Scale { bounds: ScaleBounds },
    ShortText { max_length: Option<u32> },
}

impl QuestionKind {
    /// Fresh, valid fields for a newly created or re-typed question.
    pub fn default_for(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::MultipleChoice => QuestionKind::MultipleChoice {
                options: vec!["Option 1".to_string(), "Option 2".to_string()],
            },
            QuestionType::YesNo => QuestionKind::YesNo,
            QuestionType::Scale => QuestionKind::Scale {
                bounds: ScaleBounds::default(),
            },
            QuestionType::ShortText => QuestionKind::ShortText { max_length: None },
        }
    }

    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionKind::MultipleChoice { .. } => QuestionType::MultipleChoice,
            QuestionKind::YesNo => QuestionType::YesNo,
            QuestionKind::Scale { .. } => QuestionType::Scale,
            QuestionKind::ShortText { .. } => QuestionType::ShortText,
        }
    }
}

/// Comparison applied to a candidate's answer on a knockout question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KnockoutCondition {
    Equals,
    LessThan,
    GreaterThan,
    Contains,
}

impl KnockoutCondition {
    pub const fn label(self) -> &'static str {
        match self {
            KnockoutCondition::Equals => "equals",
            KnockoutCondition::LessThan => "less-than",
            KnockoutCondition::GreaterThan => "greater-than",
            KnockoutCondition::Contains => "contains",
        }
    }
}

/// Comparison operand configured by the job poster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KnockoutValue {
    Number(f64),
    Text(String),
}

impl KnockoutValue {
    pub fn is_blank(&self) -> bool {
        match self {
            KnockoutValue::Number(value) => !value.is_finite(),
            KnockoutValue::Text(text) => text.trim().is_empty(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            KnockoutValue::Number(value) => Some(*value),
            KnockoutValue::Text(text) => text.trim().parse::<f64>().ok(),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            KnockoutValue::Number(value) => value.to_string(),
            KnockoutValue::Text(text) => text.clone(),
        }
    }
}

impl From<&str> for KnockoutValue {
    fn from(value: &str) -> Self {
        KnockoutValue::Text(value.to_string())
    }
}

impl From<f64> for KnockoutValue {
    fn from(value: f64) -> Self {
        KnockoutValue::Number(value)
    }
}

/// Whether a question contributes to the weighted score or can reject outright.
///
/// Knockout questions carry no weight. Their condition and value may be unset
/// while a draft is being edited; the evaluator refuses to run until both exist.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionRole {
    Scored {
        weight: u8,
    },
    Knockout {
        condition: Option<KnockoutCondition>,
        value: Option<KnockoutValue>,
    },
}

impl QuestionRole {
    pub fn is_knockout(&self) -> bool {
        matches!(self, QuestionRole::Knockout { .. })
    }

    pub fn weight(&self) -> u8 {
        match self {
            QuestionRole::Scored { weight } => *weight,
            QuestionRole::Knockout { .. } => 0,
        }
    }

    /// Fully configured knockout trigger, if any.
    pub fn knockout_rule(&self) -> Option<(KnockoutCondition, &KnockoutValue)> {
        match self {
            QuestionRole::Knockout {
                condition: Some(condition),
                value: Some(value),
            } if !value.is_blank() => Some((*condition, value)),
            _ => None,
        }
    }
}

/// A single screening question attached to a job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord", into = "QuestionRecord")]
pub struct ScreeningQuestion {
    pub(crate) id: QuestionId,
    pub(crate) title: String,
    pub(crate) required: bool,
    pub(crate) kind: QuestionKind,
    pub(crate) role: QuestionRole,
}

impl ScreeningQuestion {
    pub(crate) fn new(
        title: impl Into<String>,
        required: bool,
        kind: QuestionKind,
        role: QuestionRole,
    ) -> Self {
        Self {
            id: next_question_id(),
            title: title.into(),
            required,
            kind,
            role,
        }
    }

    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    pub fn role(&self) -> &QuestionRole {
        &self.role
    }

    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }

    pub fn is_knockout(&self) -> bool {
        self.role.is_knockout()
    }

    pub fn weight(&self) -> u8 {
        self.role.weight()
    }

    /// Same question under a newly issued id, for content imported from elsewhere.
    pub fn with_fresh_id(mut self) -> Self {
        self.id = next_question_id();
        self
    }

    /// Structural check run before evaluation and publishing.
    pub fn check_integrity(&self) -> Result<(), MalformedQuestion> {
        if let QuestionRole::Knockout { condition, value } = &self.role {
            if condition.is_none() {
                return Err(self.malformed(QuestionDefect::MissingKnockoutCondition));
            }
            if value.as_ref().map(KnockoutValue::is_blank).unwrap_or(true) {
                return Err(self.malformed(QuestionDefect::MissingKnockoutValue));
            }
        }
        Ok(())
    }

    fn malformed(&self, defect: QuestionDefect) -> MalformedQuestion {
        MalformedQuestion {
            question_id: self.id.clone(),
            defect,
        }
    }
}

/// Flat JSON record shared with storage and transport layers.
///
/// Field names and enumerated values are part of the persisted contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub title: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub is_knockout: bool,
    #[serde(default)]
    pub weight: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knockout_condition: Option<KnockoutCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knockout_value: Option<KnockoutValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

impl TryFrom<QuestionRecord> for ScreeningQuestion {
    type Error = MalformedQuestion;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let id = QuestionId(record.id);
        let malformed = |defect| MalformedQuestion {
            question_id: id.clone(),
            defect,
        };

        if id.0.trim().is_empty() {
            return Err(malformed(QuestionDefect::MissingId));
        }
        if record.title.trim().is_empty() {
            return Err(malformed(QuestionDefect::EmptyTitle));
        }

        let kind = match record.question_type {
            QuestionType::MultipleChoice => {
                let options = record.options.unwrap_or_default();
                if options.len() < MIN_CHOICE_OPTIONS {
                    return Err(malformed(QuestionDefect::TooFewOptions(options.len())));
                }
                QuestionKind::MultipleChoice { options }
            }
            QuestionType::YesNo => QuestionKind::YesNo,
            QuestionType::Scale => {
                let bounds = match (record.min_value, record.max_value) {
                    (Some(min), Some(max)) => ScaleBounds::new(min, max).ok(),
                    _ => None,
                };
                let bounds = bounds.ok_or_else(|| {
                    malformed(QuestionDefect::InvalidScaleRange {
                        min: record.min_value,
                        max: record.max_value,
                    })
                })?;
                QuestionKind::Scale { bounds }
            }
            QuestionType::ShortText => QuestionKind::ShortText {
                max_length: record.max_length,
            },
        };

        let role = if record.is_knockout {
            if record.weight != 0 {
                return Err(malformed(QuestionDefect::WeightOnKnockout(record.weight)));
            }
            QuestionRole::Knockout {
                condition: record.knockout_condition,
                value: record.knockout_value,
            }
        } else {
            let weight = u8::try_from(record.weight)
                .ok()
                .filter(|weight| *weight <= MAX_WEIGHT)
                .ok_or_else(|| malformed(QuestionDefect::WeightOutOfRange(record.weight)))?;
            QuestionRole::Scored { weight }
        };

        Ok(Self {
            id,
            title: record.title,
            required: record.required,
            kind,
            role,
        })
    }
}

impl From<ScreeningQuestion> for QuestionRecord {
    fn from(question: ScreeningQuestion) -> Self {
        let question_type = question.question_type();
        let is_knockout = question.is_knockout();
        let weight = u32::from(question.weight());

        let (knockout_condition, knockout_value) = match question.role {
            QuestionRole::Knockout { condition, value } => (condition, value),
            QuestionRole::Scored { .. } => (None, None),
        };

        let mut record = QuestionRecord {
            id: question.id.0,
            question_type,
            title: question.title,
            required: question.required,
            is_knockout,
            weight,
            knockout_condition,
            knockout_value,
            options: None,
            min_value: None,
            max_value: None,
            max_length: None,
        };

        match question.kind {
            QuestionKind::MultipleChoice { options } => record.options = Some(options),
            QuestionKind::YesNo => {}
            QuestionKind::Scale { bounds } => {
                record.min_value = Some(bounds.min());
                record.max_value = Some(bounds.max());
            }
            QuestionKind::ShortText { max_length } => record.max_length = max_length,
        }

        record
    }
}

/// Raised when a stored question is internally inconsistent and needs repair.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("question {question_id} is malformed: {defect}")]
pub struct MalformedQuestion {
    pub question_id: QuestionId,
    pub defect: QuestionDefect,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuestionDefect {
    #[error("question id is empty")]
    MissingId,
    #[error("question title is empty")]
    EmptyTitle,
    #[error("knockout question has no knockout_condition")]
    MissingKnockoutCondition,
    #[error("knockout question has no knockout_value")]
    MissingKnockoutValue,
    #[error("knockout question carries weight {0}")]
    WeightOnKnockout(u32),
    #[error("weight {0} is outside 0..=100")]
    WeightOutOfRange(u32),
    #[error("multiple choice question needs at least 2 options, found {0}")]
    TooFewOptions(usize),
    #[error("scale question requires min_value < max_value (found {min:?} and {max:?})")]
    InvalidScaleRange { min: Option<i64>, max: Option<i64> },
    #[error("question id appears more than once in the set")]
    DuplicateId,
}
