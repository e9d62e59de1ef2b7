//! Tracked product URL list: a text file with one URL per line.

use std::fs;
use std::path::Path;

use crate::error::SyncError;

/// Parses URL list text. Lines are trimmed; blank lines and `#` comments
/// are skipped; duplicates keep their first position.
#[must_use]
pub fn parse_tracked_urls(text: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if !urls.iter().any(|u| u == line) {
            urls.push(line.to_owned());
        }
    }
    urls
}

/// Loads the tracked URL list. A missing file is an empty list.
///
/// # Errors
///
/// Returns [`SyncError::Io`] if the file exists but cannot be read.
pub fn load_tracked_urls(path: &Path) -> Result<Vec<String>, SyncError> {
    match fs::read_to_string(path) {
        Ok(text) => {
            let urls = parse_tracked_urls(&text);
            tracing::info!(path = %path.display(), urls = urls.len(), "loaded tracked URLs");
            Ok(urls)
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "tracked URL file not found");
            Ok(Vec::new())
        }
        Err(source) => Err(SyncError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}

/// Writes `urls` one per line, replacing the file.
///
/// # Errors
///
/// Returns [`SyncError::Io`] if the file cannot be written.
pub fn save_tracked_urls(path: &Path, urls: &[String]) -> Result<(), SyncError> {
    let mut text = urls.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    fs::write(path, text).map_err(|source| SyncError::Io {
        path: path.display().to_string(),
        source,
    })
}
