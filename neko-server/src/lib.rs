//! Neko Server
//!
//! Turns media URLs into downloadable audio files. Each request becomes a job
//! that is queued, downloaded by a bounded pool of workers, and kept in a
//! short history once finished. All state lives in memory.
//!
//! Architecture:
//! - Repository: job registry and history store
//! - Service: job submission, queries and the per-job lifecycle
//! - Scheduler: bounded work queue and download workers
//! - Fetcher: turns a URL into a local audio file (yt-dlp)
//! - API: axum routes over the job service

pub mod api;
pub mod config;
pub mod fetcher;
pub mod repository;
pub mod scheduler;
pub mod service;
