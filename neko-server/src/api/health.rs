//! Health Check API Handlers
//!
//! Liveness endpoints for monitoring and clients.

use axum::{Json, http::StatusCode, response::IntoResponse};
use neko_core::dto::service::ServiceInfo;

/// GET /
/// Service name and version
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo::current())
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
