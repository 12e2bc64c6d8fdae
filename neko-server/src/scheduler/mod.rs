//! Scheduler layer
//!
//! Bounded work queue and the fixed set of workers that drain it. Each
//! worker runs one job lifecycle at a time, which caps the number of
//! concurrent fetches.

pub mod pool;

pub use pool::{ScheduleError, WorkerPool};
