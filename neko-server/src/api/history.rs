//! History API Handler

use axum::{
    Json,
    extract::{Query, State},
};
use neko_core::dto::history::{HistoryQuery, HistoryResponse};

use crate::api::AppState;

/// GET /history
/// Most recent finished jobs, newest first (20 unless `limit` is given)
pub async fn get_history(
    State(service): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<HistoryResponse> {
    let (history, count) = service.history(query.limit_or_default());

    Json(HistoryResponse { history, count })
}
