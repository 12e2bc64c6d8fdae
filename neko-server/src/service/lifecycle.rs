//! Job lifecycle
//!
//! Drives a single job through `Queued -> Downloading -> Completed | Failed`:
//! - marks the job as downloading
//! - runs the blocking fetch on the blocking thread pool
//! - applies the terminal state and snapshots it into the history
//!
//! A job that disappears from the registry (cancelled) at any point has the
//! rest of its updates dropped; it is never re-inserted.

use neko_core::domain::audio::FetchedAudio;
use neko_core::domain::history::HistoryEntry;
use neko_core::domain::job::JobStatus;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::fetcher::Fetcher;
use crate::repository::{HistoryStore, JobRegistry};

/// URL prefix under which produced files are served
pub const STATIC_PREFIX: &str = "/static";

/// Runs jobs against a fetcher, updating the registry and history
pub struct LifecycleController {
    registry: JobRegistry,
    history: Arc<HistoryStore>,
    fetcher: Arc<dyn Fetcher>,
}

impl LifecycleController {
    pub fn new(registry: JobRegistry, history: Arc<HistoryStore>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            registry,
            history,
            fetcher,
        }
    }

    /// Runs one job to completion
    ///
    /// Returns the terminal status reached, or `None` when the job was
    /// cancelled or could not be started.
    pub async fn run(&self, job_id: Uuid) -> Option<JobStatus> {
        let source_url = match self.registry.update(job_id, |job| {
            job.mark_downloading().map(|()| job.source_url.clone())
        }) {
            Some(Ok(url)) => url,
            Some(Err(e)) => {
                warn!("Job {} cannot start: {}", job_id, e);
                return None;
            }
            None => {
                debug!("Job {} was cancelled before it started", job_id);
                return None;
            }
        };

        info!("Job {} downloading: {}", job_id, source_url);

        let outcome = self.fetch(source_url).await;
        self.finish(job_id, outcome)
    }

    async fn fetch(&self, url: String) -> Result<FetchedAudio, String> {
        let fetcher = Arc::clone(&self.fetcher);

        match tokio::task::spawn_blocking(move || fetcher.fetch(&url)).await {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(e) => Err(format!("fetcher panicked: {}", e)),
        }
    }

    /// Applies the terminal transition and records the snapshot
    ///
    /// The history entry is written while the registry record is still
    /// locked, so no reader sees a terminal job that is missing from the
    /// history. Lock order is always registry then history.
    fn finish(&self, job_id: Uuid, outcome: Result<FetchedAudio, String>) -> Option<JobStatus> {
        let finished = self.registry.update(job_id, |job| {
            let transition = match &outcome {
                Ok(audio) => job.mark_completed(audio, file_url(&audio.file_name)),
                Err(message) => job.mark_failed(message.clone()),
            };
            transition.map(|()| {
                self.history.record(HistoryEntry::from(&*job));
                job.status
            })
        });

        let status = match finished {
            Some(Ok(status)) => status,
            Some(Err(e)) => {
                warn!("Job {} cannot finish: {}", job_id, e);
                return None;
            }
            None => {
                info!("Job {} was cancelled while downloading, dropping result", job_id);
                return None;
            }
        };

        match &outcome {
            Ok(audio) => info!("Job {} completed: {}", job_id, audio.file_name),
            Err(message) => error!("Job {} failed: {}", job_id, message),
        }

        Some(status)
    }
}

/// Public locator of a stored file
pub fn file_url(file_name: &str) -> String {
    format!("{}/{}", STATIC_PREFIX, file_name)
}
