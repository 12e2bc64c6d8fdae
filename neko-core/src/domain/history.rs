//! History domain types

use serde::{Deserialize, Serialize};
use std::ops::Deref;

use crate::domain::job::Job;

/// Snapshot of a job taken when it reached a terminal state
///
/// Owns a copy of the job, so later changes to the live record never show up
/// here. Read access goes through `Deref`; there is no mutable access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryEntry(Job);

impl HistoryEntry {
    pub fn job(&self) -> &Job {
        &self.0
    }

    pub fn into_job(self) -> Job {
        self.0
    }
}

impl From<&Job> for HistoryEntry {
    fn from(job: &Job) -> Self {
        Self(job.clone())
    }
}

impl Deref for HistoryEntry {
    type Target = Job;

    fn deref(&self) -> &Job {
        &self.0
    }
}
