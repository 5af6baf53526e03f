use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::answers::CandidateAnswers;
use super::authoring::{QuestionPatch, QuestionSet, QuestionTemplate};
use super::domain::{MalformedQuestion, QuestionId, QuestionType, ScreeningQuestion};
use super::evaluation::{CandidateId, EvaluationEngine, EvaluationResult, RankedCandidate};
use super::policy::ScreeningPolicy;
use super::repository::{PostingId, PostingRecord, PostingRepository, PostingStatus, RepositoryError};
use super::suggestions::{SuggestionError, SuggestionSource};
use super::validation::{ValidationError, ValidationWarning};

/// Service composing the posting repository, authoring rules, and evaluation engine.
pub struct ScreeningService<R> {
    repository: Arc<R>,
    engine: Arc<EvaluationEngine>,
    policy: ScreeningPolicy,
}

static POSTING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_posting_id() -> PostingId {
    let id = POSTING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PostingId(format!("posting-{id:06}"))
}

impl<R> ScreeningService<R>
where
    R: PostingRepository + 'static,
{
    pub fn new(repository: Arc<R>, policy: ScreeningPolicy) -> Self {
        Self::with_engine(repository, policy, EvaluationEngine::new())
    }

    pub fn with_engine(repository: Arc<R>, policy: ScreeningPolicy, engine: EvaluationEngine) -> Self {
        Self {
            repository,
            engine: Arc::new(engine),
            policy,
        }
    }

    pub fn policy(&self) -> &ScreeningPolicy {
        &self.policy
    }

    /// Open a draft posting, optionally seeded from a template.
    pub fn create_posting(
        &self,
        title: &str,
        template: Option<QuestionTemplate>,
    ) -> Result<PostingRecord, ServiceError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }

        let questions = template
            .map(QuestionSet::from_template)
            .unwrap_or_default();
        let record = PostingRecord {
            posting_id: next_posting_id(),
            title: title.to_string(),
            status: PostingStatus::Draft,
            questions,
            created_at: Utc::now(),
            published_at: None,
            revision: 0,
        };

        let stored = self.repository.insert(record)?;
        info!(
            posting_id = %stored.posting_id,
            template = template.map(QuestionTemplate::label),
            questions = stored.questions.len(),
            "screening posting created"
        );
        Ok(stored)
    }

    pub fn get(&self, posting_id: &PostingId) -> Result<PostingRecord, ServiceError> {
        let record = self
            .repository
            .fetch(posting_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn add_question(
        &self,
        posting_id: &PostingId,
        question_type: QuestionType,
    ) -> Result<ScreeningQuestion, ServiceError> {
        self.edit_draft(posting_id, |questions, policy| {
            Ok(questions.add_new(question_type, policy).clone())
        })
    }

    pub fn update_question(
        &self,
        posting_id: &PostingId,
        question_id: &QuestionId,
        patch: QuestionPatch,
    ) -> Result<ScreeningQuestion, ServiceError> {
        self.edit_draft(posting_id, |questions, policy| {
            Ok(questions.update(question_id, patch, policy)?.clone())
        })
    }

    pub fn remove_question(
        &self,
        posting_id: &PostingId,
        question_id: &QuestionId,
    ) -> Result<ScreeningQuestion, ServiceError> {
        self.edit_draft(posting_id, |questions, _| Ok(questions.remove(question_id)?))
    }

    pub fn move_question(
        &self,
        posting_id: &PostingId,
        question_id: &QuestionId,
        index: usize,
    ) -> Result<(), ServiceError> {
        self.edit_draft(posting_id, |questions, _| Ok(questions.move_to(question_id, index)?))
    }

    /// Append questions proposed by an external generator to a draft.
    pub fn apply_suggestions<S>(
        &self,
        posting_id: &PostingId,
        source: &S,
        description: &str,
    ) -> Result<Vec<ScreeningQuestion>, ServiceError>
    where
        S: SuggestionSource + ?Sized,
    {
        let record = self.get(posting_id)?;
        if record.is_published() {
            return Err(ServiceError::AlreadyPublished(posting_id.clone()));
        }

        let suggestions = source.generate_suggestions(&record.title, description)?;
        self.edit_draft(posting_id, |questions, _| {
            let mut added = Vec::with_capacity(suggestions.len());
            for suggestion in suggestions {
                added.push(questions.add(suggestion.with_fresh_id())?.clone());
            }
            Ok(added)
        })
    }

    pub fn validate(&self, posting_id: &PostingId) -> Result<Vec<ValidationWarning>, ServiceError> {
        let record = self.get(posting_id)?;
        Ok(record.questions.warnings(&self.policy))
    }

    /// Freeze the question set. Advisory warnings never block publishing.
    pub fn publish(&self, posting_id: &PostingId) -> Result<PostingRecord, ServiceError> {
        let mut record = self.get(posting_id)?;
        if record.is_published() {
            return Err(ServiceError::AlreadyPublished(posting_id.clone()));
        }
        record.questions.check_integrity()?;

        let warnings = record.questions.warnings(&self.policy);
        if !warnings.is_empty() {
            warn!(
                posting_id = %posting_id,
                warnings = warnings.len(),
                "publishing screening questions with advisory warnings"
            );
        }

        record.status = PostingStatus::Published;
        record.published_at = Some(Utc::now());
        let record = self.save(record)?;

        info!(
            posting_id = %posting_id,
            questions = record.questions.len(),
            knockouts = record.questions.knockout_count(),
            "screening posting published"
        );
        Ok(record)
    }

    /// Evaluate a complete application against a published posting.
    pub fn evaluate(
        &self,
        posting_id: &PostingId,
        answers: &CandidateAnswers,
    ) -> Result<EvaluationResult, ServiceError> {
        let record = self.published_record(posting_id)?;

        let missing = answers.missing_required(record.questions.questions());
        if !missing.is_empty() {
            return Err(ServiceError::MissingRequiredAnswers(missing));
        }

        let result = self.engine.evaluate(record.questions.questions(), answers)?;
        info!(
            posting_id = %posting_id,
            knocked_out = result.is_knocked_out,
            score = result.weighted_score,
            "screening answers evaluated"
        );
        Ok(result)
    }

    /// Evaluate a possibly partial answer set, e.g. while previewing a draft.
    pub fn preview(
        &self,
        posting_id: &PostingId,
        answers: &CandidateAnswers,
    ) -> Result<EvaluationResult, ServiceError> {
        let record = self.get(posting_id)?;
        Ok(self.engine.evaluate(record.questions.questions(), answers)?)
    }

    /// Rank submissions that already passed the required-answer check at intake.
    pub fn rank(
        &self,
        posting_id: &PostingId,
        candidates: &[(CandidateId, CandidateAnswers)],
    ) -> Result<Vec<RankedCandidate>, ServiceError> {
        let record = self.published_record(posting_id)?;
        Ok(self.engine.rank(record.questions.questions(), candidates)?)
    }

    fn published_record(&self, posting_id: &PostingId) -> Result<PostingRecord, ServiceError> {
        let record = self.get(posting_id)?;
        if !record.is_published() {
            return Err(ServiceError::NotPublished(posting_id.clone()));
        }
        Ok(record)
    }

    fn edit_draft<T>(
        &self,
        posting_id: &PostingId,
        edit: impl FnOnce(&mut QuestionSet, &ScreeningPolicy) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let mut record = self.get(posting_id)?;
        if record.is_published() {
            return Err(ServiceError::AlreadyPublished(posting_id.clone()));
        }

        let output = edit(&mut record.questions, &self.policy)?;
        self.save(record)?;
        Ok(output)
    }

    /// Write back a record read earlier. Losing the race to a publish reports the
    /// posting as published rather than reverting it to a draft.
    fn save(&self, mut record: PostingRecord) -> Result<PostingRecord, ServiceError> {
        let expected = record.revision;
        record.revision = expected + 1;
        match self.repository.update(record.clone(), expected) {
            Ok(()) => Ok(record),
            Err(RepositoryError::Stale) => {
                let current = self.get(&record.posting_id)?;
                if current.is_published() {
                    Err(ServiceError::AlreadyPublished(record.posting_id))
                } else {
                    Err(RepositoryError::Stale.into())
                }
            }
            Err(error) => Err(error.into()),
        }
    }
}

/// Error raised by the screening service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Malformed(#[from] MalformedQuestion),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Suggestion(#[from] SuggestionError),
    #[error("posting {0} is published and its questions can no longer change")]
    AlreadyPublished(PostingId),
    #[error("posting {0} has not been published yet")]
    NotPublished(PostingId),
    #[error("required questions are unanswered: {}", format_ids(.0))]
    MissingRequiredAnswers(Vec<QuestionId>),
}

fn format_ids(ids: &[QuestionId]) -> String {
    ids.iter()
        .map(|id| id.0.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
