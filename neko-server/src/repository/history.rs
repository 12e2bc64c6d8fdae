//! History Store
//!
//! Bounded record of finished jobs, newest first. Independent of the live
//! registry: entries are owned snapshots and are only ever evicted by
//! capacity, oldest first.

use neko_core::domain::history::HistoryEntry;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Number of entries kept by default
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

#[derive(Debug)]
pub struct HistoryStore {
    entries: Mutex<VecDeque<HistoryEntry>>,
    capacity: usize,
}

impl HistoryStore {
    /// Creates an empty store holding at most `capacity` entries
    ///
    /// # Panics
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be > 0");
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity + 1)),
            capacity,
        }
    }

    /// Inserts `entry` as the most recent one, evicting the oldest on overflow
    pub fn record(&self, entry: HistoryEntry) {
        let mut entries = self.lock();
        entries.push_front(entry);
        while entries.len() > self.capacity {
            entries.pop_back();
        }
    }

    /// Up to `limit` entries, most recent first
    pub fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        self.lock().iter().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<HistoryEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
