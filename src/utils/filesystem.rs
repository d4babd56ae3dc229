//! File system utility functions

use crate::constants::git::METADATA_DIR;
use anyhow::Result;
use std::io;
use std::path::Path;

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Whether `path` is missing or an empty directory
pub fn is_empty_or_missing(path: &Path) -> io::Result<bool> {
    match std::fs::read_dir(path) {
        Ok(mut entries) => Ok(entries.next().is_none()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(true),
        Err(error) => Err(error),
    }
}

/// Remove the git metadata directory under `destination`
///
/// A missing directory is not an error.
pub fn remove_git_metadata(destination: &Path) -> io::Result<()> {
    match std::fs::remove_dir_all(destination.join(METADATA_DIR)) {
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
