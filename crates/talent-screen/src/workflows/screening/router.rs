use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::answers::CandidateAnswers;
use super::authoring::{QuestionPatch, QuestionTemplate};
use super::domain::{QuestionId, QuestionRecord, QuestionType};
use super::repository::{PostingId, PostingRepository, RepositoryError};
use super::service::{ScreeningService, ServiceError};

#[derive(Debug, Deserialize)]
pub(crate) struct CreatePostingRequest {
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) template: Option<QuestionTemplate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddQuestionRequest {
    #[serde(rename = "type")]
    pub(crate) question_type: QuestionType,
}

/// Router builder exposing posting authoring and evaluation endpoints.
pub fn posting_router<R>(service: Arc<ScreeningService<R>>) -> Router
where
    R: PostingRepository + 'static,
{
    Router::new()
        .route("/api/v1/postings", post(create_handler::<R>))
        .route("/api/v1/postings/:posting_id", get(detail_handler::<R>))
        .route(
            "/api/v1/postings/:posting_id/questions",
            post(add_question_handler::<R>),
        )
        .route(
            "/api/v1/postings/:posting_id/questions/:question_id",
            patch(update_question_handler::<R>).delete(remove_question_handler::<R>),
        )
        .route(
            "/api/v1/postings/:posting_id/publish",
            post(publish_handler::<R>),
        )
        .route(
            "/api/v1/postings/:posting_id/evaluations",
            post(evaluate_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    axum::Json(request): axum::Json<CreatePostingRequest>,
) -> Response
where
    R: PostingRepository + 'static,
{
    match service.create_posting(&request.title, request.template) {
        Ok(record) => {
            let view = record.view(service.policy());
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn detail_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    Path(posting_id): Path<String>,
) -> Response
where
    R: PostingRepository + 'static,
{
    match service.get(&PostingId(posting_id)) {
        Ok(record) => {
            let view = record.view(service.policy());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn add_question_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    Path(posting_id): Path<String>,
    axum::Json(request): axum::Json<AddQuestionRequest>,
) -> Response
where
    R: PostingRepository + 'static,
{
    match service.add_question(&PostingId(posting_id), request.question_type) {
        Ok(question) => (
            StatusCode::CREATED,
            axum::Json(QuestionRecord::from(question)),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_question_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    Path((posting_id, question_id)): Path<(String, String)>,
    axum::Json(question_patch): axum::Json<QuestionPatch>,
) -> Response
where
    R: PostingRepository + 'static,
{
    let posting_id = PostingId(posting_id);
    let question_id = QuestionId(question_id);
    match service.update_question(&posting_id, &question_id, question_patch) {
        Ok(question) => {
            (StatusCode::OK, axum::Json(QuestionRecord::from(question))).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn remove_question_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    Path((posting_id, question_id)): Path<(String, String)>,
) -> Response
where
    R: PostingRepository + 'static,
{
    match service.remove_question(&PostingId(posting_id), &QuestionId(question_id)) {
        Ok(question) => {
            (StatusCode::OK, axum::Json(QuestionRecord::from(question))).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn publish_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    Path(posting_id): Path<String>,
) -> Response
where
    R: PostingRepository + 'static,
{
    match service.publish(&PostingId(posting_id)) {
        Ok(record) => {
            let view = record.view(service.policy());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn evaluate_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    Path(posting_id): Path<String>,
    axum::Json(answers): axum::Json<CandidateAnswers>,
) -> Response
where
    R: PostingRepository + 'static,
{
    match service.evaluate(&PostingId(posting_id), &answers) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) fn status_for(error: &ServiceError) -> StatusCode {
    match error {
        ServiceError::Validation(_)
        | ServiceError::Malformed(_)
        | ServiceError::MissingRequiredAnswers(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ServiceError::Repository(RepositoryError::Conflict)
        | ServiceError::Repository(RepositoryError::Stale)
        | ServiceError::AlreadyPublished(_)
        | ServiceError::NotPublished(_) => StatusCode::CONFLICT,
        ServiceError::Repository(RepositoryError::Unavailable(_))
        | ServiceError::Suggestion(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: ServiceError) -> Response {
    let status = status_for(&error);
    let payload = match &error {
        ServiceError::MissingRequiredAnswers(missing) => json!({
            "error": error.to_string(),
            "missing_question_ids": missing,
        }),
        _ => json!({
            "error": error.to_string(),
        }),
    };
    (status, axum::Json(payload)).into_response()
}
