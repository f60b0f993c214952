//! Filesystem primitives for the storage root.
//!
//! Thin OS wrappers: folder listing/creation under the storage root and
//! guarded file renames. A folder has no state beyond its presence on disk.

use std::path::Path;

/// Errors produced by filesystem operations.
#[derive(Debug, thiserror::Error)]
pub enum FsOpsError {
    #[error("path exists but is not a directory: {0}")]
    NotADirectory(String),

    #[error("source file not found: {0}")]
    SourceMissing(String),

    #[error("destination already exists: {0}")]
    DestinationExists(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Lists folder names directly under `root`, sorted case-insensitively.
///
/// Creates `root` if it does not exist yet. Files and hidden directories
/// (leading `.`) are excluded.
pub fn list_folders(root: &Path) -> Result<Vec<String>, FsOpsError> {
    std::fs::create_dir_all(root)?;

    let mut names: Vec<String> = std::fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|ty| ty.is_dir()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.'))
        .collect();

    names.sort_by_key(|name| name.to_lowercase());
    Ok(names)
}

/// Creates a folder (and any missing parents).
///
/// Succeeds if the folder already exists; fails with
/// [`FsOpsError::NotADirectory`] when the path is occupied by a file.
pub fn create_folder(path: &Path) -> Result<(), FsOpsError> {
    if path.exists() && !path.is_dir() {
        return Err(FsOpsError::NotADirectory(path.display().to_string()));
    }
    std::fs::create_dir_all(path)?;
    tracing::debug!(folder = %path.display(), "folder ready");
    Ok(())
}

/// Renames `old` to `new`, refusing to overwrite.
pub fn rename_file(old: &Path, new: &Path) -> Result<(), FsOpsError> {
    if !old.exists() {
        return Err(FsOpsError::SourceMissing(old.display().to_string()));
    }
    if new.exists() {
        return Err(FsOpsError::DestinationExists(new.display().to_string()));
    }
    std::fs::rename(old, new)?;
    Ok(())
}
