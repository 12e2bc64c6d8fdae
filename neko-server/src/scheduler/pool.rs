//! Worker pool
//!
//! Jobs are handed over by id through a bounded channel. A fixed number of
//! worker tasks pull ids off the channel and run the lifecycle for each one.
//! Scheduling never waits: a full queue is reported back to the caller.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::service::lifecycle::LifecycleController;

/// Why a job could not be handed to the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("work queue is full")]
    QueueFull,

    #[error("worker pool has shut down")]
    Closed,
}

/// Fixed-size pool of lifecycle workers fed by a bounded queue
pub struct WorkerPool {
    sender: mpsc::Sender<Uuid>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Starts `worker_count` workers on the current tokio runtime
    ///
    /// # Panics
    /// Panics if `worker_count` or `queue_capacity` is 0.
    pub fn start(
        controller: Arc<LifecycleController>,
        worker_count: usize,
        queue_capacity: usize,
    ) -> Self {
        assert!(worker_count > 0, "worker_count must be > 0");
        assert!(queue_capacity > 0, "queue_capacity must be > 0");

        let (sender, receiver) = mpsc::channel::<Uuid>(queue_capacity);
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..worker_count)
            .map(|worker_id| {
                let receiver = Arc::clone(&receiver);
                let controller = Arc::clone(&controller);
                tokio::spawn(run_worker(worker_id, receiver, controller))
            })
            .collect();

        info!(
            "Started {} download workers (queue capacity {})",
            worker_count, queue_capacity
        );

        Self { sender, workers }
    }

    /// Queues a job without waiting
    pub fn schedule(&self, job_id: Uuid) -> Result<(), ScheduleError> {
        self.sender.try_send(job_id).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => ScheduleError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => ScheduleError::Closed,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Stops accepting jobs and waits for the queued ones to finish
    pub async fn shutdown(self) {
        drop(self.sender);
        for worker in self.workers {
            if let Err(e) = worker.await {
                tracing::warn!("Download worker panicked: {}", e);
            }
        }
        info!("Download workers stopped");
    }
}

async fn run_worker(
    worker_id: usize,
    receiver: Arc<Mutex<mpsc::Receiver<Uuid>>>,
    controller: Arc<LifecycleController>,
) {
    debug!("Worker {} started", worker_id);

    loop {
        // Only the waiting worker holds the lock; it is released before the
        // job runs so the next idle worker can wait for the next id.
        let next = receiver.lock().await.recv().await;
        let Some(job_id) = next else {
            break;
        };

        debug!("Worker {} picked up job {}", worker_id, job_id);
        controller.run(job_id).await;
    }

    debug!("Worker {} stopped", worker_id);
}
