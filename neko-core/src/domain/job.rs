//! Job domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::audio::FetchedAudio;

/// Progress reported as soon as a worker picks a job up.
///
/// This is a UI hint, not a measured percentage.
pub const PROGRESS_STARTED: u8 = 10;

/// Progress of a completed job
pub const PROGRESS_DONE: u8 = 100;

/// One tracked download request
///
/// Created by the server on submission and mutated only through the
/// transition methods below, which keep the terminal fields consistent with
/// the status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    #[serde(rename = "url")]
    pub source_url: String,
    pub status: JobStatus,
    pub progress: u8,
    pub title: Option<String>,
    pub artist: Option<String>,
    /// Stored file name, without directory
    pub filename: Option<String>,
    /// Locator clients use to fetch the produced file
    pub file_url: Option<String>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Job lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Downloading,
    Completed,
    Failed,
}

/// Rejected state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid job transition from {from} to {to}")]
pub struct TransitionError {
    pub from: JobStatus,
    pub to: JobStatus,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Downloading => "downloading",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Completed and Failed are terminal: nothing leaves them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether the lifecycle allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Queued, JobStatus::Downloading)
                | (JobStatus::Downloading, JobStatus::Completed)
                | (JobStatus::Downloading, JobStatus::Failed)
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Job {
    /// Creates a freshly queued job
    pub fn new(id: Uuid, source_url: impl Into<String>) -> Self {
        Self {
            id,
            source_url: source_url.into(),
            status: JobStatus::Queued,
            progress: 0,
            title: None,
            artist: None,
            filename: None,
            file_url: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Queued -> Downloading
    pub fn mark_downloading(&mut self) -> Result<(), TransitionError> {
        self.transition(JobStatus::Downloading)?;
        self.progress = PROGRESS_STARTED;
        Ok(())
    }

    /// Downloading -> Completed
    ///
    /// Title and artist come from the fetcher when it supplies them, otherwise
    /// they are derived from the stored file name.
    pub fn mark_completed(
        &mut self,
        audio: &FetchedAudio,
        file_url: impl Into<String>,
    ) -> Result<(), TransitionError> {
        self.transition(JobStatus::Completed)?;

        let (title, artist) = audio.title_and_artist();
        self.progress = PROGRESS_DONE;
        self.title = Some(title);
        self.artist = artist;
        self.filename = Some(audio.file_name.clone());
        self.file_url = Some(file_url.into());
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Downloading -> Failed
    ///
    /// Progress is left where it was.
    pub fn mark_failed(&mut self, error: impl Into<String>) -> Result<(), TransitionError> {
        self.transition(JobStatus::Failed)?;
        self.error = Some(error.into());
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    fn transition(&mut self, next: JobStatus) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(TransitionError {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn audio(file_name: &str, title: Option<&str>, artist: Option<&str>) -> FetchedAudio {
        FetchedAudio {
            path: PathBuf::from("downloads").join(file_name),
            file_name: file_name.to_string(),
            title: title.map(str::to_string),
            artist: artist.map(str::to_string),
        }
    }

    #[test]
    fn test_new_job_is_queued_and_empty() {
        let job = Job::new(Uuid::new_v4(), "https://example.com/a");
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.progress, 0);
        assert!(job.title.is_none());
        assert!(job.file_url.is_none());
        assert!(job.error.is_none());
        assert!(job.completed_at.is_none());
    }

    #[test]
    fn test_allowed_transitions() {
        use JobStatus::*;
        assert!(Queued.can_transition_to(Downloading));
        assert!(Downloading.can_transition_to(Completed));
        assert!(Downloading.can_transition_to(Failed));

        assert!(!Queued.can_transition_to(Completed));
        assert!(!Queued.can_transition_to(Failed));
        assert!(!Downloading.can_transition_to(Queued));
        assert!(!Completed.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Downloading));
        assert!(!Completed.can_transition_to(Completed));
    }

    #[test]
    fn test_completion_populates_terminal_fields() {
        let mut job = Job::new(Uuid::new_v4(), "https://example.com/a");
        job.mark_downloading().unwrap();
        assert_eq!(job.progress, PROGRESS_STARTED);
        assert!(job.completed_at.is_none());

        job.mark_completed(
            &audio("Band - Song.mp3", Some("Song"), Some("Band")),
            "/static/Band - Song.mp3",
        )
        .unwrap();

        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress, PROGRESS_DONE);
        assert_eq!(job.title.as_deref(), Some("Song"));
        assert_eq!(job.artist.as_deref(), Some("Band"));
        assert_eq!(job.filename.as_deref(), Some("Band - Song.mp3"));
        assert_eq!(job.file_url.as_deref(), Some("/static/Band - Song.mp3"));
        assert!(job.error.is_none());
        assert!(job.completed_at.is_some());
    }

    #[test]
    fn test_completion_derives_names_from_file_name() {
        let mut job = Job::new(Uuid::new_v4(), "https://example.com/a");
        job.mark_downloading().unwrap();
        job.mark_completed(&audio("Band - Song.mp3", None, None), "/static/x")
            .unwrap();
        assert_eq!(job.title.as_deref(), Some("Song"));
        assert_eq!(job.artist.as_deref(), Some("Band"));
    }

    #[test]
    fn test_failure_keeps_progress() {
        let mut job = Job::new(Uuid::new_v4(), "https://example.com/a");
        job.mark_downloading().unwrap();
        job.mark_failed("network timeout").unwrap();

        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.progress, PROGRESS_STARTED);
        assert_eq!(job.error.as_deref(), Some("network timeout"));
        assert!(job.file_url.is_none());
        assert!(job.completed_at.is_some());
    }

    #[test]
    fn test_terminal_job_rejects_changes() {
        let mut job = Job::new(Uuid::new_v4(), "https://example.com/a");
        job.mark_downloading().unwrap();
        job.mark_failed("boom").unwrap();
        let completed_at = job.completed_at;

        let err = job
            .mark_completed(&audio("a.mp3", None, None), "/static/a.mp3")
            .unwrap_err();
        assert_eq!(err.from, JobStatus::Failed);
        assert_eq!(err.to, JobStatus::Completed);
        assert!(job.mark_failed("again").is_err());

        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error.as_deref(), Some("boom"));
        assert!(job.file_url.is_none());
        assert_eq!(job.completed_at, completed_at);
    }

    #[test]
    fn test_queued_job_cannot_finish_directly() {
        let mut job = Job::new(Uuid::new_v4(), "https://example.com/a");
        assert!(job.mark_failed("nope").is_err());
        assert_eq!(job.status, JobStatus::Queued);
        assert!(job.error.is_none());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&JobStatus::Downloading).unwrap();
        assert_eq!(json, "\"downloading\"");

        let job = Job::new(Uuid::new_v4(), "https://example.com/a");
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["status"], "queued");
        assert_eq!(value["url"], "https://example.com/a");
    }
}
