use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::workflows::screening::domain::{
    KnockoutCondition, KnockoutValue, QuestionKind, QuestionRole, ScaleBounds, ScreeningQuestion,
};
use crate::workflows::screening::repository::{
    PostingId, PostingRecord, PostingRepository, PostingStatus, RepositoryError,
};
use crate::workflows::screening::suggestions::{SuggestionError, SuggestionSource};
use crate::workflows::screening::{posting_router, ScreeningPolicy, ScreeningService};

pub(super) fn policy() -> ScreeningPolicy {
    ScreeningPolicy::default()
}

pub(super) fn scale_kind(min: i64, max: i64) -> QuestionKind {
    QuestionKind::Scale {
        bounds: ScaleBounds::new(min, max).expect("valid bounds"),
    }
}

pub(super) fn scored(title: &str, kind: QuestionKind, weight: u8) -> ScreeningQuestion {
    ScreeningQuestion::new(title, false, kind, QuestionRole::Scored { weight })
}

pub(super) fn required_scored(title: &str, kind: QuestionKind, weight: u8) -> ScreeningQuestion {
    ScreeningQuestion::new(title, true, kind, QuestionRole::Scored { weight })
}

pub(super) fn knockout(
    title: &str,
    kind: QuestionKind,
    condition: KnockoutCondition,
    value: KnockoutValue,
) -> ScreeningQuestion {
    ScreeningQuestion::new(
        title,
        false,
        kind,
        QuestionRole::Knockout {
            condition: Some(condition),
            value: Some(value),
        },
    )
}

pub(super) fn work_authorization() -> ScreeningQuestion {
    knockout(
        "Are you authorized to work here?",
        QuestionKind::YesNo,
        KnockoutCondition::Equals,
        "no".into(),
    )
}

pub(super) fn experience_scale(weight: u8) -> ScreeningQuestion {
    scored("Rate your Rust experience", scale_kind(1, 5), weight)
}

pub(super) fn incomplete_knockout() -> ScreeningQuestion {
    ScreeningQuestion::new(
        "Do you hold a forklift licence?",
        false,
        QuestionKind::YesNo,
        QuestionRole::Knockout {
            condition: Some(KnockoutCondition::Equals),
            value: None,
        },
    )
}

pub(super) fn build_service() -> (ScreeningService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = ScreeningService::new(repository.clone(), policy());
    (service, repository)
}

pub(super) fn router_with_service(service: ScreeningService<MemoryRepository>) -> axum::Router {
    posting_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<PostingId, PostingRecord>>>,
}

impl PostingRepository for MemoryRepository {
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

pub(super) struct UnavailableRepository;

impl PostingRepository for UnavailableRepository {
    fn insert(&self, _record: PostingRecord) -> Result<PostingRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: PostingRecord, _expected_revision: u64) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &PostingId) -> Result<Option<PostingRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Publishes each draft right after handing out a copy of it, the way a
/// concurrent publish request would between another caller's read and write.
#[derive(Default, Clone)]
pub(super) struct PublishAfterFetch {
    pub(super) inner: MemoryRepository,
}

impl PostingRepository for PublishAfterFetch {
    fn insert(&self, record: PostingRecord) -> Result<PostingRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn update(&self, record: PostingRecord, expected_revision: u64) -> Result<(), RepositoryError> {
        self.inner.update(record, expected_revision)
    }

    fn fetch(&self, id: &PostingId) -> Result<Option<PostingRecord>, RepositoryError> {
        let fetched = self.inner.fetch(id)?;
        if let Some(draft) = fetched.as_ref().filter(|record| !record.is_published()) {
            let mut published = draft.clone();
            published.status = PostingStatus::Published;
            published.published_at = Some(Utc::now());
            published.revision = draft.revision + 1;
            self.inner.update(published, draft.revision)?;
        }
        Ok(fetched)
    }
}

/// Returns the same canned questions for every request.
pub(super) struct StaticSuggestions(pub(super) Vec<ScreeningQuestion>);

impl SuggestionSource for StaticSuggestions {
    fn generate_suggestions(
        &self,
        _job_title: &str,
        _description: &str,
    ) -> Result<Vec<ScreeningQuestion>, SuggestionError> {
        Ok(self.0.clone())
    }
}

pub(super) struct OfflineSuggestions;

impl SuggestionSource for OfflineSuggestions {
    fn generate_suggestions(
        &self,
        _job_title: &str,
        _description: &str,
    ) -> Result<Vec<ScreeningQuestion>, SuggestionError> {
        Err(SuggestionError::Unavailable("model offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
