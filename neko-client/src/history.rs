//! History and service endpoints

use neko_core::dto::history::HistoryResponse;
use neko_core::dto::service::ServiceInfo;

use crate::NekoClient;
use crate::error::Result;

impl NekoClient {
    /// Most recent finished jobs, newest first
    ///
    /// # Arguments
    /// * `limit` - Max entries to return; the server default (20) when `None`
    pub async fn history(&self, limit: Option<usize>) -> Result<HistoryResponse> {
        let url = format!("{}/history", self.base_url);
        let mut request = self.client.get(&url);
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        let response = request.send().await?;

        self.handle_response(response).await
    }

    /// Service name and version
    pub async fn service_info(&self) -> Result<ServiceInfo> {
        let url = format!("{}/", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
