//! File naming for downloaded audio

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

/// Longest artist component kept in a file name
pub const MAX_ARTIST_LEN: usize = 50;

/// Longest title component kept in a file name
pub const MAX_TITLE_LEN: usize = 80;

const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Makes `input` safe to use as part of a file name on common filesystems.
///
/// Drops reserved and control characters, collapses runs of whitespace into
/// one space, trims, and keeps at most `max_len` characters.
pub fn sanitize_component(input: &str, max_len: usize) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| !FORBIDDEN.contains(c) && !c.is_control() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(max_len)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Builds the `"<artist> - <title>"` stem of a downloaded file
pub fn display_stem(artist: &str, title: &str) -> String {
    format!(
        "{} - {}",
        sanitize_component(artist, MAX_ARTIST_LEN),
        sanitize_component(title, MAX_TITLE_LEN)
    )
}

/// Claims the first free path among `stem.ext`, `stem (1).ext`, `stem (2).ext`, ...
///
/// The name is reserved by creating an empty file, so two callers never get
/// the same path. The caller replaces the placeholder with the real file.
pub fn claim_unique_path(dir: &Path, stem: &str, ext: &str) -> io::Result<PathBuf> {
    let mut counter = 0;

    loop {
        let candidate = match counter {
            0 => dir.join(format!("{stem}.{ext}")),
            n => dir.join(format!("{stem} ({n}).{ext}")),
        };

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(_) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => counter += 1,
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_reserved_characters() {
        assert_eq!(
            sanitize_component("AC/DC: Back <In> \"Black\"?", 100),
            "ACDC Back In Black"
        );
    }

    #[test]
    fn test_collapses_whitespace_and_control_characters() {
        assert_eq!(
            sanitize_component("  Song\t\tName \n Live\u{7}  ", 100),
            "Song Name Live"
        );
    }

    #[test]
    fn test_truncates_to_max_len() {
        let long = "a".repeat(200);
        assert_eq!(sanitize_component(&long, MAX_TITLE_LEN).len(), MAX_TITLE_LEN);
        assert_eq!(sanitize_component("abc def", 4), "abc");
    }

    #[test]
    fn test_display_stem() {
        assert_eq!(display_stem("Band", "Song | Official"), "Band - Song Official");
    }

    #[test]
    fn test_claim_unique_path_avoids_collisions() {
        let dir = tempfile::tempdir().unwrap();

        let first = claim_unique_path(dir.path(), "Band - Song", "mp3").unwrap();
        assert_eq!(first, dir.path().join("Band - Song.mp3"));
        assert!(first.exists());

        let second = claim_unique_path(dir.path(), "Band - Song", "mp3").unwrap();
        assert_eq!(second, dir.path().join("Band - Song (1).mp3"));

        let third = claim_unique_path(dir.path(), "Band - Song", "mp3").unwrap();
        assert_eq!(third, dir.path().join("Band - Song (2).mp3"));
    }

    #[test]
    fn test_concurrent_claims_get_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();

        let mut claimed: Vec<PathBuf> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| claim_unique_path(dir.path(), "Band - Song", "mp3").unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        claimed.sort();
        claimed.dedup();
        assert_eq!(claimed.len(), 8);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 8);
    }

    #[test]
    fn test_claim_in_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(claim_unique_path(&missing, "Band - Song", "mp3").is_err());
    }
}
