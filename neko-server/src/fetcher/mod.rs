//! Fetcher
//!
//! The seam between the job engine and whatever turns a URL into a local
//! audio file. The engine only sees the blocking [`Fetcher::fetch`] call and
//! treats every error as a terminal failure of the job.

pub mod filename;
pub mod ytdlp;

use neko_core::domain::audio::FetchedAudio;
use thiserror::Error;

pub use ytdlp::YtDlpFetcher;

/// Turns a media URL into a local audio file
///
/// Implementations may block for a long time; callers must keep them off
/// the async executor.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<FetchedAudio, FetchError>;
}

impl<F> Fetcher for F
where
    F: Fn(&str) -> Result<FetchedAudio, FetchError> + Send + Sync,
{
    fn fetch(&self, url: &str) -> Result<FetchedAudio, FetchError> {
        self(url)
    }
}

/// Errors reported by a fetcher
#[derive(Debug, Error)]
pub enum FetchError {
    /// The external tool could not be started
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external tool ran and reported failure
    #[error("{program} exited with {status}: {stderr}")]
    ToolFailed {
        program: String,
        status: String,
        stderr: String,
    },

    /// Media metadata could not be decoded
    #[error("failed to parse media metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    /// The tool succeeded but left no audio file behind
    #[error("Download failed: no {0} file produced")]
    NoOutput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl FetchError {
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
