//! Download and queue endpoints

use neko_core::domain::job::Job;
use neko_core::dto::job::{CancelResponse, DownloadAccepted, DownloadRequest, QueueResponse};
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

use crate::NekoClient;
use crate::error::{ClientError, Result};

impl NekoClient {
    /// Queue a download
    ///
    /// # Arguments
    /// * `url` - The media URL to download audio from
    ///
    /// # Returns
    /// The id of the queued job
    pub async fn submit_download(&self, url: &str) -> Result<DownloadAccepted> {
        let endpoint = format!("{}/download", self.base_url);
        let response = self
            .client
            .post(&endpoint)
            .json(&DownloadRequest {
                url: url.to_string(),
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get a job by ID
    pub async fn get_job(&self, job_id: Uuid) -> Result<Job> {
        let url = format!("{}/queue/{}", self.base_url, job_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// List all tracked jobs
    pub async fn list_queue(&self) -> Result<QueueResponse> {
        let url = format!("{}/queue", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Cancel (stop tracking) a job
    pub async fn cancel_job(&self, job_id: Uuid) -> Result<CancelResponse> {
        let url = format!("{}/queue/{}", self.base_url, job_id);
        let response = self.client.delete(&url).send().await?;

        self.handle_response(response).await
    }

    /// Poll a job until it completes or fails
    ///
    /// # Arguments
    /// * `job_id` - The job to watch
    /// * `interval` - Delay between polls
    /// * `timeout` - Give up after this long
    pub async fn wait_for_job(
        &self,
        job_id: Uuid,
        interval: Duration,
        timeout: Duration,
    ) -> Result<Job> {
        let deadline = Instant::now() + timeout;

        loop {
            let job = self.get_job(job_id).await?;
            if job.is_terminal() {
                return Ok(job);
            }

            tracing::debug!("Job {} is {} ({}%)", job_id, job.status, job.progress);

            if Instant::now() + interval > deadline {
                return Err(ClientError::Timeout(job_id));
            }
            tokio::time::sleep(interval).await;
        }
    }
}
