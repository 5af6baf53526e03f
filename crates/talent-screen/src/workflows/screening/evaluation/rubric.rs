use std::collections::BTreeMap;

use super::super::answers::AnswerValue;
use super::super::domain::{QuestionId, QuestionKind, ScreeningQuestion};

/// Grades answers the engine cannot score on its own (multiple choice and short text).
///
/// Implementations return a credit in `0.0..=1.0`, or `None` to leave the answer
/// ungraded. Free-text grading services plug in here.
pub trait AnswerRubric: Send + Sync {
    fn grade(&self, question: &ScreeningQuestion, answer: &AnswerValue) -> Option<f64>;
}

/// Default rubric: nothing is graded, so these question types contribute 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRubric;

impl AnswerRubric for NoRubric {
    fn grade(&self, _question: &ScreeningQuestion, _answer: &AnswerValue) -> Option<f64> {
        None
    }
}

/// Per-option credit table for multiple choice questions.
///
/// Multi-select answers earn the sum of their option credits, capped at 1.
#[derive(Debug, Clone, Default)]
pub struct ChoiceRubric {
    credits: BTreeMap<QuestionId, BTreeMap<String, f64>>,
}

impl ChoiceRubric {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credit(
        mut self,
        question_id: impl Into<QuestionId>,
        option: &str,
        credit: f64,
    ) -> Self {
        self.credits
            .entry(question_id.into())
            .or_default()
            .insert(fold(option), credit.clamp(0.0, 1.0));
        self
    }
}

impl AnswerRubric for ChoiceRubric {
    fn grade(&self, question: &ScreeningQuestion, answer: &AnswerValue) -> Option<f64> {
        if !matches!(question.kind(), QuestionKind::MultipleChoice { .. }) {
            return None;
        }
        let table = self.credits.get(question.id())?;

        let credit_for = |choice: &str| table.get(&fold(choice)).copied().unwrap_or(0.0);
        let total = match answer {
            AnswerValue::Text(choice) => credit_for(choice.as_str()),
            AnswerValue::Choices(choices) => choices
                .iter()
                .map(|choice| credit_for(choice.as_str()))
                .sum::<f64>(),
            _ => return None,
        };
        Some(total.min(1.0))
    }
}

fn fold(raw: &str) -> String {
    raw.trim().to_lowercase()
}
