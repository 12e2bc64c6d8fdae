//! History DTOs

use serde::{Deserialize, Serialize};

use crate::domain::history::HistoryEntry;

/// Number of entries `GET /history` returns when no limit is given
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Most recent finished jobs, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
    /// Total number of stored entries, not just the returned ones
    pub count: usize,
}

/// Query string of `GET /history`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

impl HistoryQuery {
    pub fn limit_or_default(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_HISTORY_LIMIT)
    }
}
