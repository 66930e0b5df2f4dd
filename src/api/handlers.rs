//! Feature endpoints. Each one validates its body, runs the task workflow and
//! maps the outcome onto an HTTP response.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::error::ApiError;
use super::routes::AppState;
use super::types::*;
use crate::task::{RunOutcome, TaskRequest, ValidationError};

type Body<T> = Result<Json<T>, JsonRejection>;

/// Run a validated request and shape the response.
async fn run(state: &AppState, request: TaskRequest) -> Result<Response, ApiError> {
    let outcome = state.runner.run(&request).await?;

    Ok(match outcome {
        RunOutcome::Submitted(body) => (StatusCode::OK, Json(body)).into_response(),
        RunOutcome::Completed(result) => (StatusCode::OK, Json(result)).into_response(),
        RunOutcome::InProgress(handle) => (
            StatusCode::ACCEPTED,
            Json(InProgressResponse {
                status: "in_progress",
                task_id: handle.to_string(),
            }),
        )
            .into_response(),
    })
}

fn validated<T>(
    body: Body<T>,
    convert: impl FnOnce(T) -> Result<TaskRequest, ValidationError>,
) -> Result<TaskRequest, ApiError> {
    let Json(body) = body?;
    convert(body).map_err(|e| {
        tracing::debug!("Rejected request: {}", e);
        ApiError::from(e)
    })
}

/// POST /api/google-business-profile
pub async fn business_profile(
    State(state): State<Arc<AppState>>,
    body: Body<BusinessProfileRequest>,
) -> Result<Response, ApiError> {
    let request = validated(body, TaskRequest::try_from)?;
    run(&state, request).await
}

/// POST /api/google-business-info
pub async fn business_info(
    State(state): State<Arc<AppState>>,
    body: Body<BusinessInfoRequest>,
) -> Result<Response, ApiError> {
    let request = validated(body, TaskRequest::try_from)?;
    run(&state, request).await
}

/// POST /api/on-page-seo
pub async fn on_page_seo(
    State(state): State<Arc<AppState>>,
    body: Body<SiteRequest>,
) -> Result<Response, ApiError> {
    let request = validated(body, SiteRequest::into_crawl)?;
    run(&state, request).await
}

/// POST /api/page-audit
pub async fn page_audit(
    State(state): State<Arc<AppState>>,
    body: Body<PageAuditRequest>,
) -> Result<Response, ApiError> {
    let request = validated(body, TaskRequest::try_from)?;
    run(&state, request).await
}

/// POST /api/backlink-tracking
pub async fn backlink_tracking(
    State(state): State<Arc<AppState>>,
    body: Body<SiteRequest>,
) -> Result<Response, ApiError> {
    let request = validated(body, SiteRequest::into_backlinks)?;
    run(&state, request).await
}

/// POST /api/keyword-research
pub async fn keyword_research(
    State(state): State<Arc<AppState>>,
    body: Body<KeywordResearchRequest>,
) -> Result<Response, ApiError> {
    let request = validated(body, TaskRequest::try_from)?;
    run(&state, request).await
}

/// POST /api/competitor-analysis
pub async fn competitor_analysis(
    State(state): State<Arc<AppState>>,
    body: Body<CompetitorAnalysisRequest>,
) -> Result<Response, ApiError> {
    let request = validated(body, TaskRequest::try_from)?;
    run(&state, request).await
}

/// Any non-POST method on a feature route.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
