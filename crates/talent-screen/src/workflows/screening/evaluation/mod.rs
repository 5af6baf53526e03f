mod knockout;
mod ranking;
mod rubric;
mod scoring;

pub use ranking::{CandidateId, RankedCandidate};
pub use rubric::{AnswerRubric, ChoiceRubric, NoRubric};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::answers::CandidateAnswers;
use super::domain::{MalformedQuestion, QuestionId, QuestionRecord, ScreeningQuestion};
use scoring::score_questions;

/// Stateless evaluator applying knockout rules and weights to one answer set.
///
/// Holds no per-call state, so a single engine can be shared across threads.
#[derive(Clone)]
pub struct EvaluationEngine {
    rubric: Arc<dyn AnswerRubric>,
}

impl Default for EvaluationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EvaluationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationEngine").finish_non_exhaustive()
    }
}

impl EvaluationEngine {
    pub fn new() -> Self {
        Self::with_rubric(NoRubric)
    }

    pub fn with_rubric(rubric: impl AnswerRubric + 'static) -> Self {
        Self {
            rubric: Arc::new(rubric),
        }
    }

    /// Evaluate `answers` against `questions` in set order.
    ///
    /// Knockout questions are checked first; the earliest one whose trigger matches
    /// rejects the candidate with a score of 0. Otherwise the weighted score is the
    /// sum of each scored question's normalized answer times its weight.
    pub fn evaluate(
        &self,
        questions: &[ScreeningQuestion],
        answers: &CandidateAnswers,
    ) -> Result<EvaluationResult, MalformedQuestion> {
        questions
            .iter()
            .try_for_each(ScreeningQuestion::check_integrity)?;

        for question in questions {
            let Some((condition, value)) = question.role().knockout_rule() else {
                continue;
            };
            let Some(answer) = answers.answer_for(question.id()) else {
                continue;
            };
            if knockout::triggers(condition, value, answer) {
                debug!(
                    question_id = %question.id(),
                    condition = condition.label(),
                    "knockout condition triggered"
                );
                return Ok(EvaluationResult::knocked_out(question.id().clone()));
            }
        }

        let (components, weighted_score) = score_questions(questions, answers, self.rubric.as_ref());
        Ok(EvaluationResult {
            is_knocked_out: false,
            knockout_question_id: None,
            weighted_score,
            components,
        })
    }

    /// Evaluate stored records directly, surfacing any record-level corruption.
    pub fn evaluate_records(
        &self,
        records: &[QuestionRecord],
        answers: &CandidateAnswers,
    ) -> Result<EvaluationResult, MalformedQuestion> {
        let questions = records
            .iter()
            .cloned()
            .map(ScreeningQuestion::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        self.evaluate(&questions, answers)
    }

    /// Evaluate every candidate and order them for review.
    ///
    /// Candidates who pass all knockouts come first by descending score; knocked
    /// out candidates follow in submission order.
    pub fn rank(
        &self,
        questions: &[ScreeningQuestion],
        candidates: &[(CandidateId, CandidateAnswers)],
    ) -> Result<Vec<RankedCandidate>, MalformedQuestion> {
        let evaluated = candidates
            .iter()
            .map(|(candidate_id, answers)| {
                self.evaluate(questions, answers)
                    .map(|result| (candidate_id.clone(), result))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ranking::order(evaluated))
    }
}

/// Contribution of one scored question, kept for audit trails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponent {
    pub question_id: QuestionId,
    pub weight: u8,
    pub normalized: f64,
    pub contribution: f64,
}

/// Outcome of evaluating one candidate. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub is_knocked_out: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knockout_question_id: Option<QuestionId>,
    pub weighted_score: f64,
    #[serde(default)]
    pub components: Vec<ScoreComponent>,
}

impl EvaluationResult {
    fn knocked_out(question_id: QuestionId) -> Self {
        Self {
            is_knocked_out: true,
            knockout_question_id: Some(question_id),
            weighted_score: 0.0,
            components: Vec::new(),
        }
    }

    pub fn summary(&self) -> String {
        match &self.knockout_question_id {
            Some(question_id) if self.is_knocked_out => {
                format!("knocked out by question {question_id}")
            }
            _ => format!("weighted score {:.2}", self.weighted_score),
        }
    }
}
