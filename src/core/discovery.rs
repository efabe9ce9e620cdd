use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Turns a directory argument into `<dir>/*.gpx`; anything else is a glob.
pub fn resolve_pattern(input: &str) -> String {
    let path = Path::new(input);
    if path.is_dir() {
        path.join("*.gpx").to_string_lossy().into_owned()
    } else {
        input.to_string()
    }
}

/// Lists the files matching a directory or glob pattern, in glob order.
pub fn discover_files(input: &str) -> Result<Vec<PathBuf>> {
    let pattern = resolve_pattern(input);
    tracing::debug!("Collecting files matching: {}", pattern);

    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => tracing::warn!("⚠️ Skipping unreadable path {}: {}", e.path().display(), e),
        }
    }
    Ok(files)
}
