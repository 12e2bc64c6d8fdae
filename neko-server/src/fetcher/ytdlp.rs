//! yt-dlp fetcher
//!
//! Drives the `yt-dlp` executable:
//! - probing the URL for title and artist metadata
//! - downloading the best audio stream and transcoding it with ffmpeg
//! - renaming the result to `"<artist> - <title>.<ext>"` in the download directory
//! - removing leftover thumbnails

use neko_core::domain::audio::FetchedAudio;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::fetcher::filename::{claim_unique_path, display_stem};
use crate::fetcher::{FetchError, Fetcher};

const UNKNOWN: &str = "Unknown";
const THUMBNAIL_EXTENSIONS: &[&str] = &["webp", "jpg", "png"];

/// Codecs accepted by `--audio-format` and the file extension each produces
const AUDIO_FORMATS: &[(&str, &str)] = &[
    ("mp3", "mp3"),
    ("aac", "m4a"),
    ("m4a", "m4a"),
    ("opus", "opus"),
    ("vorbis", "ogg"),
    ("flac", "flac"),
    ("alac", "m4a"),
    ("wav", "wav"),
];

/// Extension of the file yt-dlp writes for `format`, `None` if unsupported
///
/// `best` keeps the source container and is not supported.
pub fn output_extension(format: &str) -> Option<&'static str> {
    AUDIO_FORMATS
        .iter()
        .find(|(name, _)| *name == format)
        .map(|(_, ext)| *ext)
}

/// Names of the supported audio formats
pub fn supported_formats() -> impl Iterator<Item = &'static str> {
    AUDIO_FORMATS.iter().map(|(name, _)| *name)
}

/// Fetcher backed by the `yt-dlp` command line tool
#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    program: String,
    download_dir: PathBuf,
    audio_format: String,
    audio_quality: String,
}

/// Subset of the `--dump-single-json` output we care about
#[derive(Debug, Default, Deserialize)]
struct MediaInfo {
    title: Option<String>,
    uploader: Option<String>,
    artist: Option<String>,
    creator: Option<String>,
    track: Option<String>,
}

impl MediaInfo {
    fn artist(&self) -> &str {
        [&self.artist, &self.creator, &self.uploader]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .map(String::as_str)
            .unwrap_or(UNKNOWN)
    }

    fn title(&self) -> &str {
        [&self.track, &self.title]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .map(String::as_str)
            .unwrap_or(UNKNOWN)
    }
}

impl YtDlpFetcher {
    /// Creates a fetcher producing 192K mp3 files in `download_dir`
    pub fn new(program: impl Into<String>, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            download_dir: download_dir.into(),
            audio_format: "mp3".to_string(),
            audio_quality: "192K".to_string(),
        }
    }

    /// Overrides the target codec and quality passed to yt-dlp
    pub fn with_audio(mut self, format: impl Into<String>, quality: impl Into<String>) -> Self {
        self.audio_format = format.into();
        self.audio_quality = quality.into();
        self
    }

    fn extension(&self) -> &str {
        output_extension(&self.audio_format).unwrap_or(self.audio_format.as_str())
    }

    fn probe(&self, url: &str) -> Result<MediaInfo, FetchError> {
        info!("Extracting info for: {}", url);
        let output = self.run(&[
            "--dump-single-json",
            "--skip-download",
            "--no-warnings",
            "--no-playlist",
            url,
        ])?;
        Ok(serde_json::from_slice(&output.stdout)?)
    }

    fn download(&self, url: &str, temp_id: &str) -> Result<(), FetchError> {
        let template = self
            .download_dir
            .join(format!("temp_{temp_id}.%(ext)s"))
            .to_string_lossy()
            .into_owned();

        self.run(&[
            "--no-playlist",
            "-f",
            "bestaudio/best",
            "--extract-audio",
            "--audio-format",
            &self.audio_format,
            "--audio-quality",
            &self.audio_quality,
            "--embed-metadata",
            "--embed-thumbnail",
            "-o",
            &template,
            url,
        ])?;
        Ok(())
    }

    fn run(&self, args: &[&str]) -> Result<Output, FetchError> {
        debug!("Running {} {:?}", self.program, args);

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| FetchError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(FetchError::ToolFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: last_line(&output.stderr),
            });
        }

        Ok(output)
    }

    /// Locates the transcoded `temp_<id>*.<ext>` file
    fn find_output(&self, temp_id: &str) -> Result<PathBuf, FetchError> {
        let prefix = format!("temp_{temp_id}");

        for entry in std::fs::read_dir(&self.download_dir)? {
            let path = entry?.path();
            let matches = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(&prefix))
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(self.extension()));
            if matches {
                return Ok(path);
            }
        }

        Err(FetchError::NoOutput(self.audio_format.clone()))
    }

    /// Moves the transcoded file to a free `"<stem>.<ext>"` name
    fn store(&self, temp_file: &Path, stem: &str) -> Result<PathBuf, FetchError> {
        let final_path = claim_unique_path(&self.download_dir, stem, self.extension())?;

        if let Err(e) = std::fs::rename(temp_file, &final_path) {
            let _ = std::fs::remove_file(&final_path);
            return Err(e.into());
        }

        Ok(final_path)
    }

    fn cleanup_leftovers(&self, temp_id: &str) {
        let prefix = format!("temp_{temp_id}");
        let Ok(entries) = std::fs::read_dir(&self.download_dir) else {
            return;
        };

        for path in entries.flatten().map(|e| e.path()) {
            let is_leftover = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(&prefix))
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| THUMBNAIL_EXTENSIONS.contains(&e));
            if !is_leftover {
                continue;
            }

            match std::fs::remove_file(&path) {
                Ok(()) => debug!("Cleaned up: {}", path.display()),
                Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
            }
        }
    }
}

impl Fetcher for YtDlpFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedAudio, FetchError> {
        let info = self.probe(url)?;
        let artist = info.artist().to_string();
        let title = info.title().to_string();
        info!("Title: {} / Artist: {}", title, artist);

        let stem = display_stem(&artist, &title);
        let temp_id = Uuid::new_v4().simple().to_string()[..8].to_string();

        info!("Starting download: {}", stem);
        let result = self
            .download(url, &temp_id)
            .and_then(|()| self.find_output(&temp_id))
            .and_then(|temp_file| self.store(&temp_file, &stem));
        self.cleanup_leftovers(&temp_id);
        let final_path = result?;

        let file_name = final_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| FetchError::other("produced file has no name"))?;
        info!("Renamed to: {}", file_name);

        Ok(FetchedAudio {
            path: final_path,
            file_name,
            title: Some(title),
            artist: Some(artist),
        })
    }
}

fn last_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("no error output")
        .to_string()
}
