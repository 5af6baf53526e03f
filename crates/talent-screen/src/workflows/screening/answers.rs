use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{QuestionId, ScreeningQuestion};

const AFFIRMATIVE: &[&str] = &["yes", "y", "true"];
const NEGATIVE: &[&str] = &["no", "n", "false"];

/// A candidate's answer to one question, in whatever shape the form produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Flag(bool),
    Number(f64),
    Text(String),
    Choices(Vec<String>),
}

impl AnswerValue {
    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Flag(_) => false,
            AnswerValue::Number(value) => !value.is_finite(),
            AnswerValue::Text(text) => text.trim().is_empty(),
            AnswerValue::Choices(choices) => choices.iter().all(|choice| choice.trim().is_empty()),
        }
    }

    /// Numeric reading of the answer; text is parsed, lists and flags are not.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(value) if value.is_finite() => Some(*value),
            AnswerValue::Text(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    /// Yes/no reading of the answer, if it has one.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            AnswerValue::Flag(flag) => Some(*flag),
            AnswerValue::Text(text) => parse_flag(text),
            AnswerValue::Choices(choices) if choices.len() == 1 => parse_flag(&choices[0]),
            _ => None,
        }
    }
}

pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    let folded = raw.trim().to_lowercase();
    if AFFIRMATIVE.contains(&folded.as_str()) {
        Some(true)
    } else if NEGATIVE.contains(&folded.as_str()) {
        Some(false)
    } else {
        None
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        AnswerValue::Number(value)
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Flag(value)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(value: Vec<String>) -> Self {
        AnswerValue::Choices(value)
    }
}

/// Answers collected for one application submission, keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateAnswers(BTreeMap<QuestionId, AnswerValue>);

impl CandidateAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, question_id: impl Into<QuestionId>, answer: impl Into<AnswerValue>) -> Self {
        self.insert(question_id, answer);
        self
    }

    pub fn insert(&mut self, question_id: impl Into<QuestionId>, answer: impl Into<AnswerValue>) {
        self.0.insert(question_id.into(), answer.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The answer for `question_id`, treating blank input as unanswered.
    pub fn answer_for(&self, question_id: &QuestionId) -> Option<&AnswerValue> {
        self.0.get(question_id).filter(|answer| !answer.is_blank())
    }

    /// Ids of required questions that have no usable answer, in set order.
    pub fn missing_required(&self, questions: &[ScreeningQuestion]) -> Vec<QuestionId> {
        questions
            .iter()
            .filter(|question| question.required() && self.answer_for(question.id()).is_none())
            .map(|question| question.id().clone())
            .collect()
    }
}
