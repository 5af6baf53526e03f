use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::authoring::QuestionSet;
use super::domain::QuestionRecord;
use super::policy::ScreeningPolicy;
use super::validation::WarningView;

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PostingId(pub String);

impl fmt::Display for PostingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authoring lifecycle of a posting's question set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingStatus {
    Draft,
    Published,
}

impl PostingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PostingStatus::Draft => "draft",
            PostingStatus::Published => "published",
        }
    }
}

/// Repository record for a posting and its screening questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingRecord {
    pub posting_id: PostingId,
    pub title: String,
    pub status: PostingStatus,
    pub questions: QuestionSet,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    /// Bumped on every write; stale copies cannot overwrite newer state.
    #[serde(default)]
    pub revision: u64,
}

impl PostingRecord {
    pub fn is_published(&self) -> bool {
        self.status == PostingStatus::Published
    }

    pub fn view(&self, policy: &ScreeningPolicy) -> PostingView {
        PostingView {
            posting_id: self.posting_id.clone(),
            title: self.title.clone(),
            status: self.status.label(),
            questions: self.questions.to_records(),
            knockout_count: self.questions.knockout_count(),
            total_weight: self.questions.total_weight(),
            warnings: self
                .questions
                .warnings(policy)
                .iter()
                .map(|warning| warning.view())
                .collect(),
            created_at: self.created_at,
            published_at: self.published_at,
        }
    }
}

/// Storage abstraction so the service can be exercised in isolation.
pub trait PostingRepository: Send + Sync {
    fn insert(&self, record: PostingRecord) -> Result<PostingRecord, RepositoryError>;
    /// Replace the stored record only while its revision still equals `expected_revision`.
    fn update(&self, record: PostingRecord, expected_revision: u64) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &PostingId) -> Result<Option<PostingRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("record changed since it was read")]
    Stale,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// API projection of a posting, including advisory warnings.
#[derive(Debug, Clone, Serialize)]
pub struct PostingView {
    pub posting_id: PostingId,
    pub title: String,
    pub status: &'static str,
    pub questions: Vec<QuestionRecord>,
    pub knockout_count: usize,
    pub total_weight: u32,
    pub warnings: Vec<WarningView>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}
