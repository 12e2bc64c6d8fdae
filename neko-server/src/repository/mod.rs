//! Repository Module
//!
//! In-memory state of the server. Nothing here outlives the process.

pub mod history;
pub mod job;

// Re-export for convenience
pub use history::HistoryStore;
pub use job::JobRegistry;
