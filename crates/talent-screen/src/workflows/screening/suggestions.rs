use super::domain::ScreeningQuestion;

/// Outbound hook for question generators (e.g. an AI drafting service).
pub trait SuggestionSource: Send + Sync {
    fn generate_suggestions(
        &self,
        job_title: &str,
        description: &str,
    ) -> Result<Vec<ScreeningQuestion>, SuggestionError>;
}

/// Suggestion dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum SuggestionError {
    #[error("suggestion source unavailable: {0}")]
    Unavailable(String),
}
