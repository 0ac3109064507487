//! Filesystem convenience helpers shared by the pipeline stages.
//!
//! Every helper returns `nwkit_errors::Error` with the offending path attached.

use nwkit_errors::{Error, StorageError};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// Result type for filesystem operations
pub type Result<T> = std::result::Result<T, Error>;

fn storage_err(err: &std::io::Error, path: &Path) -> Error {
    StorageError::from_io_with_path(err, path).into()
}

/// Recursively copy a directory, overwriting existing files
///
/// Returns the number of files copied.
///
/// # Errors
///
/// Returns an error if:
/// - Creating the destination directory fails
/// - Reading the source directory fails
/// - Copying any file or subdirectory fails
pub async fn copy_directory(src: &Path, dst: &Path) -> Result<usize> {
    fs::create_dir_all(dst)
        .await
        .map_err(|e| storage_err(&e, dst))?;

    let mut copied = 0;
    let mut entries = fs::read_dir(src).await.map_err(|e| storage_err(&e, src))?;
    while let Some(entry) = entries.next_entry().await.map_err(|e| storage_err(&e, src))? {
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        let file_type = entry
            .file_type()
            .await
            .map_err(|e| storage_err(&e, &src_path))?;
        if file_type.is_dir() {
            copied += Box::pin(copy_directory(&src_path, &dst_path)).await?;
        } else if file_type.is_symlink() {
            copy_symlink(&src_path, &dst_path).await?;
            copied += 1;
        } else {
            fs::copy(&src_path, &dst_path)
                .await
                .map_err(|e| storage_err(&e, &dst_path))?;
            copied += 1;
        }
    }

    Ok(copied)
}

#[cfg(unix)]
async fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let target = fs::read_link(src).await.map_err(|e| storage_err(&e, src))?;
    remove_file(dst).await?;
    fs::symlink(&target, dst)
        .await
        .map_err(|e| storage_err(&e, dst))
}

#[cfg(not(unix))]
async fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    fs::copy(src, dst)
        .await
        .map(|_| ())
        .map_err(|e| storage_err(&e, dst))
}

/// Create a directory with all parent directories
///
/// # Errors
///
/// Returns an error if permission is denied or any I/O operation fails.
pub async fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| storage_err(&e, path))
}

/// Remove a directory and all its contents; a missing directory is not an error
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be removed.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(storage_err(&e, path)),
    }
}

/// Remove a single file; a missing file is not an error
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub async fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(storage_err(&e, path)),
    }
}

/// Atomically move `src` onto `dst`, replacing any existing file
///
/// # Errors
///
/// Returns `AtomicRenameFailed` if the rename fails.
pub async fn atomic_rename(src: &Path, dst: &Path) -> Result<()> {
    fs::rename(src, dst).await.map_err(|e| {
        StorageError::AtomicRenameFailed {
            message: format!("{} -> {}: {e}", src.display(), dst.display()),
        }
        .into()
    })
}

/// Check if a path exists
pub async fn exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

/// Ensure a directory exists and is empty
///
/// # Errors
///
/// Returns an error if removal or creation fails.
pub async fn ensure_empty_dir(path: &Path) -> Result<()> {
    remove_dir_all(path).await?;
    create_dir_all(path).await
}
