//! Job Registry
//!
//! Process-wide map from job id to job record, the single source of truth
//! for queue state. Every operation takes the lock for a short critical
//! section, so readers always see a job either before or after a whole
//! update, never halfway through one.

use neko_core::domain::job::Job;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// In-memory job registry
///
/// Cloning is cheap and every clone shares the same map.
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<RwLock<HashMap<Uuid, Job>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new queued job under a fresh id and returns a copy of it
    ///
    /// The id is checked against the map under the write lock, so concurrent
    /// creations never share an id.
    pub fn create(&self, source_url: &str) -> Job {
        let mut jobs = self.write();

        let mut id = Uuid::new_v4();
        while jobs.contains_key(&id) {
            id = Uuid::new_v4();
        }

        let job = Job::new(id, source_url);
        jobs.insert(id, job.clone());
        job
    }

    /// Find a job by ID
    pub fn find_by_id(&self, id: Uuid) -> Option<Job> {
        self.read().get(&id).cloned()
    }

    /// Snapshot of every tracked job, oldest first
    pub fn list_all(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self.read().values().cloned().collect();
        jobs.sort_by_key(|job| job.created_at);
        jobs
    }

    /// Applies `f` to the job in place
    ///
    /// Returns `None` when the job is no longer tracked; nothing is inserted
    /// in that case.
    pub fn update<T>(&self, id: Uuid, f: impl FnOnce(&mut Job) -> T) -> Option<T> {
        self.write().get_mut(&id).map(f)
    }

    /// Removes a job, returning it if it was tracked
    pub fn remove(&self, id: Uuid) -> Option<Job> {
        self.write().remove(&id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave a job half-written: updates
    // validate before they mutate. Keep serving instead of poisoning forever.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<Uuid, Job>> {
        self.jobs.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, Job>> {
        self.jobs.write().unwrap_or_else(PoisonError::into_inner)
    }
}
