//! Service Module
//!
//! Business logic layer of the server: the job service that accepts and
//! answers requests, and the lifecycle that runs each job.

pub mod job;
pub mod lifecycle;

// Re-export for convenience
pub use job::{JobError, JobService, ServiceSettings};
pub use lifecycle::LifecycleController;
