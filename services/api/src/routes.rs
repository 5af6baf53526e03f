use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use talent_screen::error::AppError;
use talent_screen::workflows::screening::{
    posting_router, CandidateAnswers, EvaluationEngine, EvaluationResult, PostingRepository,
    QuestionRecord, QuestionSet, ScreeningPolicy, ScreeningService, WarningView,
};

#[derive(Debug, Deserialize)]
pub(crate) struct ValidateRequest {
    pub(crate) questions: Vec<QuestionRecord>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ValidateResponse {
    pub(crate) question_count: usize,
    pub(crate) knockout_count: usize,
    pub(crate) total_weight: u32,
    pub(crate) warnings: Vec<WarningView>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluateRequest {
    pub(crate) questions: Vec<QuestionRecord>,
    #[serde(default)]
    pub(crate) answers: CandidateAnswers,
}

/// Shared inputs for the stateless screening endpoints.
#[derive(Debug, Clone)]
pub(crate) struct ScreeningState {
    pub(crate) policy: ScreeningPolicy,
    pub(crate) engine: EvaluationEngine,
}

pub(crate) fn with_screening_routes<R>(service: Arc<ScreeningService<R>>) -> axum::Router
where
    R: PostingRepository + 'static,
{
    let stateless = axum::Router::new()
        .route(
            "/api/v1/screening/validate",
            axum::routing::post(validate_endpoint),
        )
        .route(
            "/api/v1/screening/evaluate",
            axum::routing::post(evaluate_endpoint),
        )
        .with_state(ScreeningState {
            policy: service.policy().clone(),
            engine: EvaluationEngine::new(),
        });

    posting_router(service)
        .merge(stateless)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn validate_endpoint(
    State(state): State<ScreeningState>,
    Json(payload): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, AppError> {
    Ok(Json(validate_records(payload.questions, &state.policy)?))
}

pub(crate) async fn evaluate_endpoint(
    State(state): State<ScreeningState>,
    Json(payload): Json<EvaluateRequest>,
) -> Result<Json<EvaluationResult>, AppError> {
    let result = state
        .engine
        .evaluate_records(&payload.questions, &payload.answers)?;
    Ok(Json(result))
}

/// Rebuild a question set from records and collect its advisory warnings.
pub(crate) fn validate_records(
    records: Vec<QuestionRecord>,
    policy: &ScreeningPolicy,
) -> Result<ValidateResponse, AppError> {
    let questions = QuestionSet::from_records(records)?;
    Ok(ValidateResponse {
        question_count: questions.len(),
        knockout_count: questions.knockout_count(),
        total_weight: questions.total_weight(),
        warnings: questions
            .warnings(policy)
            .iter()
            .map(|warning| warning.view())
            .collect(),
    })
}
