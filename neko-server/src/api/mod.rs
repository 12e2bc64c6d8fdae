//! API Module
//!
//! HTTP API layer of the server.
//! Each submodule handles the endpoints of one resource.

pub mod download;
pub mod error;
pub mod health;
pub mod history;
pub mod queue;

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::service::JobService;
use crate::service::lifecycle::STATIC_PREFIX;

/// Shared handler state
pub type AppState = Arc<JobService>;

/// Create the main API router with all endpoints
///
/// Finished files in `download_dir` are served under `/static`.
pub fn create_router(service: AppState, download_dir: &Path) -> Router {
    Router::new()
        // Service info and health
        .route("/", get(health::service_info))
        .route("/health", get(health::health_check))
        // Job endpoints
        .route("/download", post(download::submit_download))
        .route("/queue", get(queue::list_queue))
        .route("/queue/{id}", get(queue::get_job).delete(queue::cancel_job))
        .route("/history", get(history::get_history))
        // Produced audio files
        .nest_service(STATIC_PREFIX, ServeDir::new(download_dir))
        // Add state and middleware
        .with_state(service)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// Browser clients are served from other origins
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .expose_headers(Any)
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchError;
    use crate::service::ServiceSettings;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use neko_core::domain::audio::FetchedAudio;
    use neko_core::dto::job::DownloadAccepted;
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn fetch_song(url: &str) -> Result<FetchedAudio, FetchError> {
        if url.contains("broken") {
            return Err(FetchError::other("network timeout"));
        }
        Ok(FetchedAudio {
            path: "downloads/Band - Song.mp3".into(),
            file_name: "Band - Song.mp3".to_string(),
            title: Some("Song".to_string()),
            artist: Some("Band".to_string()),
        })
    }

    fn app(download_dir: &Path) -> (Router, AppState) {
        let service = Arc::new(JobService::new(
            Arc::new(fetch_song),
            ServiceSettings::default(),
        ));
        (create_router(Arc::clone(&service), download_dir), service)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = send(app, request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_download(url: &str) -> Request<Body> {
        Request::post("/download")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::json!({ "url": url }).to_string()))
            .unwrap()
    }

    async fn wait_for_terminal(service: &AppState, id: Uuid) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !service.get(id).unwrap().is_terminal() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(dir.path());

        let (status, body) = send_json(&app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[tokio::test]
    async fn test_download_lifecycle_over_http() {
        let dir = tempfile::tempdir().unwrap();
        let (app, service) = app(dir.path());

        let (status, body) = send_json(&app, post_download("https://example.com/a")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "queued");
        let accepted: DownloadAccepted = serde_json::from_value(body).unwrap();

        wait_for_terminal(&service, accepted.job_id).await;

        let (status, job) =
            send_json(&app, get(&format!("/queue/{}", accepted.job_id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(job["status"], "completed");
        assert_eq!(job["progress"], 100);
        assert_eq!(job["title"], "Song");
        assert_eq!(job["artist"], "Band");
        assert_eq!(job["file_url"], "/static/Band - Song.mp3");

        let (_, queue) = send_json(&app, get("/queue")).await;
        assert_eq!(queue["count"], 1);

        let (_, history) = send_json(&app, get("/history")).await;
        assert_eq!(history["count"], 1);
        assert_eq!(history["history"][0]["id"], accepted.job_id.to_string());
    }

    #[tokio::test]
    async fn test_failed_job_over_http() {
        let dir = tempfile::tempdir().unwrap();
        let (app, service) = app(dir.path());

        let (_, body) = send_json(&app, post_download("https://example.com/broken")).await;
        let accepted: DownloadAccepted = serde_json::from_value(body).unwrap();
        wait_for_terminal(&service, accepted.job_id).await;

        let (_, job) = send_json(&app, get(&format!("/queue/{}", accepted.job_id))).await;
        assert_eq!(job["status"], "failed");
        assert_eq!(job["error"], "network timeout");
        assert!(job["file_url"].is_null());
    }

    #[tokio::test]
    async fn test_empty_url_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let (app, service) = app(dir.path());

        let (status, body) = send_json(&app, post_download("  ")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No url provided");

        let missing = Request::post("/download")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let (status, _) = send_json(&app, missing).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert!(service.list().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(dir.path());

        let (status, body) = send_json(&app, get(&format!("/queue/{}", Uuid::new_v4()))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Job not found");

        let (status, _) = send_json(&app, get("/queue/not-a-uuid")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cancel_twice() {
        let dir = tempfile::tempdir().unwrap();
        let (app, service) = app(dir.path());
        let job = service.submit("https://example.com/a").unwrap();

        let delete = || {
            Request::delete(format!("/queue/{}", job.id))
                .body(Body::empty())
                .unwrap()
        };

        let (status, body) = send_json(&app, delete()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "cancelled");
        assert_eq!(body["job_id"], job.id.to_string());

        let (status, _) = send_json(&app, delete()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_history_limit() {
        let dir = tempfile::tempdir().unwrap();
        let (app, service) = app(dir.path());

        for i in 0..3 {
            let job = service.submit(&format!("https://example.com/{i}")).unwrap();
            wait_for_terminal(&service, job.id).await;
        }

        let (_, body) = send_json(&app, get("/history?limit=2")).await;
        assert_eq!(body["history"].as_array().unwrap().len(), 2);
        assert_eq!(body["count"], 3);
    }

    #[tokio::test]
    async fn test_static_files_are_served() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("song.mp3"), b"ID3").unwrap();
        let (app, _) = app(dir.path());

        let (status, body) = send(&app, get("/static/song.mp3")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ID3");
    }

    #[tokio::test]
    async fn test_cors_headers_present() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(dir.path());

        let request = Request::get("/health")
            .header("origin", "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }
}
