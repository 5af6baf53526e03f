use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use talent_screen::error::AppError;
use talent_screen::workflows::screening::{
    create_question, update_question, KnockoutCondition, PostingId, PostingRecord,
    PostingRepository, QuestionPatch, QuestionTemplate, QuestionType,
    RepositoryError, ScreeningQuestion, SuggestionError, SuggestionSource,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPostingRepository {
    records: Arc<Mutex<HashMap<PostingId, PostingRecord>>>,
}

impl PostingRepository for InMemoryPostingRepository {
    fn insert(&self, record: PostingRecord) -> Result<PostingRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.posting_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.posting_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: PostingRecord, expected_revision: u64) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let stored = guard
            .get(&record.posting_id)
            .ok_or(RepositoryError::NotFound)?;
        if stored.revision != expected_revision {
            return Err(RepositoryError::Stale);
        }
        guard.insert(record.posting_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &PostingId) -> Result<Option<PostingRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// Offline stand-in for a question generator that proposes an on-call knockout.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct CannedSuggestions;

impl SuggestionSource for CannedSuggestions {
    fn generate_suggestions(
        &self,
        job_title: &str,
        _description: &str,
    ) -> Result<Vec<ScreeningQuestion>, SuggestionError> {
        let patch = QuestionPatch {
            title: Some(format!(
                "Can you take part in the on-call rotation for the {job_title} role?"
            )),
            required: Some(true),
            is_knockout: Some(true),
            knockout_condition: Some(KnockoutCondition::Equals),
            knockout_value: Some("no".into()),
            ..QuestionPatch::default()
        };
        let question = update_question(&create_question(QuestionType::YesNo), patch)
            .map_err(|err| SuggestionError::Unavailable(err.to_string()))?;
        Ok(vec![question])
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

pub(crate) fn parse_template(raw: &str) -> Result<QuestionTemplate, String> {
    let wanted = raw.trim().to_ascii_lowercase().replace('-', "_");
    [
        QuestionTemplate::General,
        QuestionTemplate::SoftwareEngineer,
        QuestionTemplate::CustomerSupport,
    ]
    .into_iter()
    .find(|template| template.label() == wanted)
    .ok_or_else(|| {
        format!("unknown template '{raw}' (expected general, software_engineer or customer_support)")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use talent_screen::workflows::screening::PostingStatus;

    #[test]
    fn parse_template_accepts_labels_and_dashes() {
        assert_eq!(
            parse_template("software-engineer"),
            Ok(QuestionTemplate::SoftwareEngineer)
        );
        assert_eq!(parse_template(" General "), Ok(QuestionTemplate::General));
        assert!(parse_template("astronaut").is_err());
    }

    #[test]
    fn canned_suggestions_are_complete_knockouts() {
        let questions = CannedSuggestions
            .generate_suggestions("Site Reliability Engineer", "")
            .expect("suggestions");
        assert_eq!(questions.len(), 1);
        assert!(questions[0].is_knockout());
        assert!(questions[0].check_integrity().is_ok());
        assert!(questions[0].title().contains("Site Reliability Engineer"));
    }

    fn draft(id: &str, revision: u64) -> PostingRecord {
        PostingRecord {
            posting_id: PostingId(id.to_string()),
            title: "Draft".to_string(),
            status: PostingStatus::Draft,
            questions: Default::default(),
            created_at: Default::default(),
            published_at: None,
            revision,
        }
    }

    #[test]
    fn update_requires_existing_posting() {
        let repository = InMemoryPostingRepository::default();
        assert!(matches!(
            repository.update(draft("posting-missing", 1), 0),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn update_rejects_stale_revision() {
        let repository = InMemoryPostingRepository::default();
        repository
            .insert(draft("posting-race", 0))
            .expect("insert works");

        let mut published = draft("posting-race", 1);
        published.status = PostingStatus::Published;
        repository.update(published, 0).expect("first writer wins");

        assert!(matches!(
            repository.update(draft("posting-race", 1), 0),
            Err(RepositoryError::Stale)
        ));
        let stored = repository
            .fetch(&PostingId("posting-race".to_string()))
            .expect("fetch works")
            .expect("record stored");
        assert_eq!(stored.status, PostingStatus::Published);
        assert_eq!(stored.revision, 1);
    }
}
