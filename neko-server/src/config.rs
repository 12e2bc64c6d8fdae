//! Server configuration
//!
//! Defines the configurable parameters of the server: where it listens,
//! where downloads go, how the yt-dlp fetcher is invoked and how the job
//! engine is sized.

use std::path::PathBuf;
use std::str::FromStr;

use crate::fetcher::ytdlp::{output_extension, supported_formats};
use crate::service::ServiceSettings;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to (e.g., "0.0.0.0:8982")
    pub bind_addr: String,

    /// Directory finished downloads are stored in and served from
    pub download_dir: PathBuf,

    /// Max downloads running at the same time
    pub max_parallel_jobs: usize,

    /// Jobs allowed to wait for a free worker
    pub queue_capacity: usize,

    /// Finished jobs kept in the history
    pub history_capacity: usize,

    /// Path or name of the yt-dlp executable
    pub ytdlp_path: String,

    /// Target codec passed to yt-dlp (e.g., "mp3")
    pub audio_format: String,

    /// Target quality passed to yt-dlp (e.g., "192K")
    pub audio_quality: String,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Every variable is optional:
    /// - NEKO_BIND_ADDR (default: 0.0.0.0:8982)
    /// - NEKO_DOWNLOAD_DIR (default: downloads)
    /// - NEKO_MAX_PARALLEL_JOBS (default: 4)
    /// - NEKO_QUEUE_CAPACITY (default: 256)
    /// - NEKO_HISTORY_CAPACITY (default: 50)
    /// - NEKO_YTDLP_PATH (default: yt-dlp)
    /// - NEKO_AUDIO_FORMAT (default: mp3)
    /// - NEKO_AUDIO_QUALITY (default: 192K)
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            bind_addr: env_or("NEKO_BIND_ADDR", defaults.bind_addr),
            download_dir: env_or("NEKO_DOWNLOAD_DIR", defaults.download_dir),
            max_parallel_jobs: env_or("NEKO_MAX_PARALLEL_JOBS", defaults.max_parallel_jobs),
            queue_capacity: env_or("NEKO_QUEUE_CAPACITY", defaults.queue_capacity),
            history_capacity: env_or("NEKO_HISTORY_CAPACITY", defaults.history_capacity),
            ytdlp_path: env_or("NEKO_YTDLP_PATH", defaults.ytdlp_path),
            audio_format: env_or("NEKO_AUDIO_FORMAT", defaults.audio_format),
            audio_quality: env_or("NEKO_AUDIO_QUALITY", defaults.audio_quality),
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_addr.is_empty() {
            anyhow::bail!("bind_addr cannot be empty");
        }

        if self.download_dir.as_os_str().is_empty() {
            anyhow::bail!("download_dir cannot be empty");
        }

        if self.max_parallel_jobs == 0 {
            anyhow::bail!("max_parallel_jobs must be greater than 0");
        }

        if self.queue_capacity == 0 {
            anyhow::bail!("queue_capacity must be greater than 0");
        }

        if self.history_capacity == 0 {
            anyhow::bail!("history_capacity must be greater than 0");
        }

        if self.ytdlp_path.is_empty() {
            anyhow::bail!("ytdlp_path cannot be empty");
        }

        if output_extension(&self.audio_format).is_none() {
            anyhow::bail!(
                "unsupported audio_format {:?} (expected one of: {})",
                self.audio_format,
                supported_formats().collect::<Vec<_>>().join(", ")
            );
        }

        Ok(())
    }

    /// Sizing of the job engine
    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            max_parallel_jobs: self.max_parallel_jobs,
            queue_capacity: self.queue_capacity,
            history_capacity: self.history_capacity,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let settings = ServiceSettings::default();
        Self {
            bind_addr: "0.0.0.0:8982".to_string(),
            download_dir: PathBuf::from("downloads"),
            max_parallel_jobs: settings.max_parallel_jobs,
            queue_capacity: settings.queue_capacity,
            history_capacity: settings.history_capacity,
            ytdlp_path: "yt-dlp".to_string(),
            audio_format: "mp3".to_string(),
            audio_quality: "192K".to_string(),
        }
    }
}

/// Reads and parses `key`, falling back to `default` when unset or invalid
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Ignoring invalid value for {}: {:?}", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}
