//! Queue API Handlers
//!
//! Read and cancel tracked jobs.

use axum::{
    Json,
    extract::{Path, State},
};
use neko_core::domain::job::Job;
use neko_core::dto::job::{CancelResponse, QueueResponse};
use uuid::Uuid;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};

/// GET /queue
/// All tracked jobs
pub async fn list_queue(State(service): State<AppState>) -> Json<QueueResponse> {
    tracing::debug!("Listing queue");

    Json(QueueResponse::from(service.list()))
}

/// GET /queue/{id}
/// One job by ID
pub async fn get_job(
    State(service): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Job>> {
    tracing::debug!("Getting job: {}", id);

    let job = service.get(parse_job_id(&id)?)?;

    Ok(Json(job))
}

/// DELETE /queue/{id}
/// Stop tracking a job
pub async fn cancel_job(
    State(service): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CancelResponse>> {
    let job = service.cancel(parse_job_id(&id)?)?;

    Ok(Json(CancelResponse::cancelled(job.id)))
}

/// A malformed id cannot name a tracked job
fn parse_job_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Job not found".to_string()))
}
