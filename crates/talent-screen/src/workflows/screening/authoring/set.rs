use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::super::domain::{
    MalformedQuestion, QuestionDefect, QuestionId, QuestionRecord, QuestionType,
    ScreeningQuestion,
};
use super::super::policy::ScreeningPolicy;
use super::super::validation::{validate_question_set, ValidationError, ValidationWarning};
use super::templates::QuestionTemplate;
use super::{create_question_with, update_question_with, QuestionPatch};

/// Ordered questions for one job posting. Position is display order (`Q1`, `Q2`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionSet {
    questions: Vec<ScreeningQuestion>,
}

impl QuestionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_template(template: QuestionTemplate) -> Self {
        Self {
            questions: template.questions(),
        }
    }

    /// Rebuild a set from stored records, rejecting inconsistent entries.
    pub fn from_records(records: Vec<QuestionRecord>) -> Result<Self, MalformedQuestion> {
        let mut seen = HashSet::new();
        let mut questions = Vec::with_capacity(records.len());
        for record in records {
            let question = ScreeningQuestion::try_from(record)?;
            if !seen.insert(question.id().clone()) {
                return Err(MalformedQuestion {
                    question_id: question.id().clone(),
                    defect: QuestionDefect::DuplicateId,
                });
            }
            questions.push(question);
        }
        Ok(Self { questions })
    }

    pub fn to_records(&self) -> Vec<QuestionRecord> {
        self.questions.iter().cloned().map(QuestionRecord::from).collect()
    }

    pub fn questions(&self) -> &[ScreeningQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: &QuestionId) -> Option<&ScreeningQuestion> {
        self.questions.iter().find(|question| question.id() == id)
    }

    pub fn position(&self, id: &QuestionId) -> Option<usize> {
        self.questions.iter().position(|question| question.id() == id)
    }

    /// Display label such as `Q3` for the question with `id`.
    pub fn label_of(&self, id: &QuestionId) -> Option<String> {
        self.position(id).map(|index| format!("Q{}", index + 1))
    }

    pub fn knockout_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|question| question.is_knockout())
            .count()
    }

    pub fn total_weight(&self) -> u32 {
        self.questions
            .iter()
            .map(|question| u32::from(question.weight()))
            .sum()
    }

    pub fn add(&mut self, question: ScreeningQuestion) -> Result<&ScreeningQuestion, ValidationError> {
        if self.get(question.id()).is_some() {
            return Err(ValidationError::DuplicateQuestion(question.id().clone()));
        }
        self.questions.push(question);
        let index = self.questions.len() - 1;
        Ok(&self.questions[index])
    }

    /// Append a freshly created question of `question_type`.
    pub fn add_new(
        &mut self,
        question_type: QuestionType,
        policy: &ScreeningPolicy,
    ) -> &ScreeningQuestion {
        self.questions
            .push(create_question_with(question_type, policy));
        let index = self.questions.len() - 1;
        &self.questions[index]
    }

    pub fn remove(&mut self, id: &QuestionId) -> Result<ScreeningQuestion, ValidationError> {
        let index = self.index_of(id)?;
        Ok(self.questions.remove(index))
    }

    pub fn update(
        &mut self,
        id: &QuestionId,
        patch: QuestionPatch,
        policy: &ScreeningPolicy,
    ) -> Result<&ScreeningQuestion, ValidationError> {
        let index = self.index_of(id)?;
        let updated = update_question_with(&self.questions[index], patch, policy)?;
        self.questions[index] = updated;
        Ok(&self.questions[index])
    }

    /// Swap in an already edited question, keeping its position.
    pub fn replace(&mut self, question: ScreeningQuestion) -> Result<(), ValidationError> {
        let index = self.index_of(question.id())?;
        self.questions[index] = question;
        Ok(())
    }

    /// Move the question with `id` so it ends up at `index`.
    pub fn move_to(&mut self, id: &QuestionId, index: usize) -> Result<(), ValidationError> {
        let from = self.index_of(id)?;
        if index >= self.questions.len() {
            return Err(ValidationError::PositionOutOfRange {
                index,
                len: self.questions.len(),
            });
        }
        let question = self.questions.remove(from);
        self.questions.insert(index, question);
        Ok(())
    }

    pub fn warnings(&self, policy: &ScreeningPolicy) -> Vec<ValidationWarning> {
        validate_question_set(&self.questions, policy)
    }

    /// First structural defect in set order, if any.
    pub fn check_integrity(&self) -> Result<(), MalformedQuestion> {
        self.questions
            .iter()
            .try_for_each(ScreeningQuestion::check_integrity)
    }

    fn index_of(&self, id: &QuestionId) -> Result<usize, ValidationError> {
        self.position(id)
            .ok_or_else(|| ValidationError::UnknownQuestion(id.clone()))
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a ScreeningQuestion;
    type IntoIter = std::slice::Iter<'a, ScreeningQuestion>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}
