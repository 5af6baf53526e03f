//! Screening questions for job postings: authoring, validation, knockout evaluation,
//! and weighted scoring of candidate answers.
//!
//! Questions are authored as a draft `QuestionSet`, frozen when the posting is
//! published, and then evaluated against each candidate's answers. Evaluation is
//! pure; the service layer adds persistence and the required-answer check.

pub mod answers;
pub mod authoring;
pub mod domain;
pub mod evaluation;
pub mod policy;
pub mod repository;
pub mod router;
pub mod service;
pub mod suggestions;
pub mod validation;

#[cfg(test)]
mod tests;

pub use answers::{AnswerValue, CandidateAnswers};
pub use authoring::{
    add_option, create_question, create_question_with, remove_option, update_question,
    update_question_with, QuestionPatch, QuestionSet, QuestionTemplate,
};
pub use domain::{
    KnockoutCondition, KnockoutValue, MalformedQuestion, QuestionDefect, QuestionId,
    QuestionKind, QuestionRecord, QuestionRole, QuestionType, ScaleBounds, ScreeningQuestion,
};
pub use evaluation::{
    AnswerRubric, CandidateId, ChoiceRubric, EvaluationEngine, EvaluationResult, NoRubric,
    RankedCandidate, ScoreComponent,
};
pub use policy::ScreeningPolicy;
pub use repository::{
    PostingId, PostingRecord, PostingRepository, PostingStatus, PostingView, RepositoryError,
};
pub use router::posting_router;
pub use service::{ScreeningService, ServiceError};
pub use suggestions::{SuggestionError, SuggestionSource};
pub use validation::{validate_question_set, ValidationError, ValidationWarning, WarningView};
