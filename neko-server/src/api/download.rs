//! Download API Handler
//!
//! Accepts new download requests.

use axum::{Json, extract::State};
use neko_core::dto::job::{DownloadAccepted, DownloadRequest};

use crate::api::AppState;
use crate::api::error::ApiResult;

/// POST /download
/// Queue a download; returns as soon as the job is registered
pub async fn submit_download(
    State(service): State<AppState>,
    Json(req): Json<DownloadRequest>,
) -> ApiResult<Json<DownloadAccepted>> {
    tracing::debug!("Download requested: {}", req.url);

    let job = service.submit(&req.url)?;

    Ok(Json(DownloadAccepted::queued(job.id)))
}
