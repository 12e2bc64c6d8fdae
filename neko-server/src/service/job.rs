//! Job Service
//!
//! Entry point for every job operation: accepts submissions, hands them to
//! the worker pool, and answers queue, cancellation and history queries.
//! Nothing here waits on a fetch.

use neko_core::domain::history::HistoryEntry;
use neko_core::domain::job::Job;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::fetcher::Fetcher;
use crate::repository::{HistoryStore, JobRegistry};
use crate::scheduler::{ScheduleError, WorkerPool};
use crate::service::lifecycle::LifecycleController;

/// Service error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Job {0} not found")]
    NotFound(Uuid),

    #[error("Download queue is full, try again later")]
    QueueFull,

    #[error("Download workers are unavailable")]
    Unavailable,
}

impl From<ScheduleError> for JobError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::QueueFull => JobError::QueueFull,
            ScheduleError::Closed => JobError::Unavailable,
        }
    }
}

/// Sizing of the job engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    /// Number of fetches allowed to run at once
    pub max_parallel_jobs: usize,
    /// Jobs that may wait for a free worker before submissions are refused
    pub queue_capacity: usize,
    pub history_capacity: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            max_parallel_jobs: 4,
            queue_capacity: 256,
            history_capacity: crate::repository::history::DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// Job registry, history and worker pool behind one handle
pub struct JobService {
    registry: JobRegistry,
    history: Arc<HistoryStore>,
    pool: WorkerPool,
}

impl JobService {
    /// Creates the service and starts its workers on the current runtime
    ///
    /// # Panics
    /// Panics if any field of `settings` is 0. `Config::validate` rejects
    /// such settings before the server builds the service.
    pub fn new(fetcher: Arc<dyn Fetcher>, settings: ServiceSettings) -> Self {
        let registry = JobRegistry::new();
        let history = Arc::new(HistoryStore::new(settings.history_capacity));
        let controller = Arc::new(LifecycleController::new(
            registry.clone(),
            Arc::clone(&history),
            fetcher,
        ));
        let pool = WorkerPool::start(
            controller,
            settings.max_parallel_jobs,
            settings.queue_capacity,
        );

        Self {
            registry,
            history,
            pool,
        }
    }

    /// Queues a download and returns the new job
    ///
    /// The job is visible to readers before any work on it starts.
    pub fn submit(&self, url: &str) -> Result<Job, JobError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(JobError::InvalidInput("No url provided".to_string()));
        }

        let job = self.registry.create(url);

        if let Err(e) = self.pool.schedule(job.id) {
            self.registry.remove(job.id);
            tracing::warn!("Rejected job for {}: {}", url, e);
            return Err(e.into());
        }

        tracing::info!("Job {} queued: {}", job.id, url);

        Ok(job)
    }

    /// Get a job by ID
    pub fn get(&self, id: Uuid) -> Result<Job, JobError> {
        self.registry.find_by_id(id).ok_or(JobError::NotFound(id))
    }

    /// All tracked jobs
    pub fn list(&self) -> Vec<Job> {
        self.registry.list_all()
    }

    /// Removes a job from the registry
    ///
    /// A fetch already running for it is not interrupted; its result is
    /// discarded when it comes back.
    pub fn cancel(&self, id: Uuid) -> Result<Job, JobError> {
        let job = self.registry.remove(id).ok_or(JobError::NotFound(id))?;
        tracing::info!("Job {} cancelled (was {})", id, job.status);
        Ok(job)
    }

    /// Up to `limit` most recent finished jobs and the total stored
    pub fn history(&self, limit: usize) -> (Vec<HistoryEntry>, usize) {
        (self.history.recent(limit), self.history.len())
    }
}
