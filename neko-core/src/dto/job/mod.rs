//! Job DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::job::{Job, JobStatus};

/// Request to queue a new download
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRequest {
    /// A missing url is treated like an empty one
    #[serde(default)]
    pub url: String,
}

/// Response to an accepted download request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadAccepted {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub message: String,
}

impl DownloadAccepted {
    pub fn queued(job_id: Uuid) -> Self {
        Self {
            job_id,
            status: JobStatus::Queued,
            message: "Download started".to_string(),
        }
    }
}

/// All tracked jobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueResponse {
    pub queue: Vec<Job>,
    pub count: usize,
}

impl From<Vec<Job>> for QueueResponse {
    fn from(queue: Vec<Job>) -> Self {
        Self {
            count: queue.len(),
            queue,
        }
    }
}

/// Response to a cancellation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResponse {
    pub status: String,
    pub job_id: Uuid,
}

impl CancelResponse {
    pub fn cancelled(job_id: Uuid) -> Self {
        Self {
            status: "cancelled".to_string(),
            job_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_wire_shape() {
        let id = Uuid::new_v4();
        let value = serde_json::to_value(DownloadAccepted::queued(id)).unwrap();
        assert_eq!(value["job_id"], id.to_string());
        assert_eq!(value["status"], "queued");
    }

    #[test]
    fn test_queue_count_matches_jobs() {
        let jobs = vec![
            Job::new(Uuid::new_v4(), "https://example.com/a"),
            Job::new(Uuid::new_v4(), "https://example.com/b"),
        ];
        let response = QueueResponse::from(jobs);
        assert_eq!(response.count, 2);
    }
}
