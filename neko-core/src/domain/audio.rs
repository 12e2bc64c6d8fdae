//! Fetched audio

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Separator between artist and title in display names
pub const DISPLAY_NAME_SEPARATOR: &str = " - ";

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "aac", "opus", "ogg", "flac", "wav"];

/// Audio file produced by a fetcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedAudio {
    /// Local path of the produced file
    pub path: PathBuf,
    /// File name under the download directory, used as the display name
    pub file_name: String,
    pub title: Option<String>,
    pub artist: Option<String>,
}

impl FetchedAudio {
    /// Resolves the `(title, artist)` pair for a completed job.
    ///
    /// A title supplied by the fetcher wins. Otherwise both are derived from
    /// the display name, with a supplied artist still taking precedence.
    pub fn title_and_artist(&self) -> (String, Option<String>) {
        if let Some(title) = &self.title {
            return (title.clone(), self.artist.clone());
        }

        let (artist, title) = split_display_name(&self.file_name);
        (title, self.artist.clone().or(artist))
    }
}

/// Splits `"<artist> - <title>[.ext]"` into its parts.
///
/// Without the separator the whole name is the title.
pub fn split_display_name(name: &str) -> (Option<String>, String) {
    let stem = strip_audio_extension(name);

    match stem.split_once(DISPLAY_NAME_SEPARATOR) {
        Some((artist, title)) => (Some(artist.to_string()), title.to_string()),
        None => (None, stem.to_string()),
    }
}

fn strip_audio_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) => stem,
        _ => name,
    }
}
