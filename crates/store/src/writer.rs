use chrono::Utc;
use nwkit_errors::{Error, StorageError};
use nwkit_hash::StreamHasher;
use nwkit_platform::fs;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::{entry_path, staging_path, CacheEntry};

/// Incremental writer for one archive
///
/// Bytes go to the staging file. Dropping the writer without [`commit`]
/// leaves `cache_path` untouched.
///
/// [`commit`]: CacheWriter::commit
pub struct CacheWriter {
    file: BufWriter<File>,
    hasher: StreamHasher,
    staging: PathBuf,
    cache_path: PathBuf,
}

impl CacheWriter {
    pub(crate) async fn create(cache_path: &Path) -> Result<Self, Error> {
        if let Some(parent) = cache_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let staging = staging_path(cache_path);
        let file = File::create(&staging)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, &staging))?;

        Ok(Self {
            file: BufWriter::new(file),
            hasher: StreamHasher::new(),
            staging,
            cache_path: cache_path.to_path_buf(),
        })
    }

    /// Append the next chunk of the archive
    ///
    /// # Errors
    ///
    /// Returns an error if the staging file cannot be written.
    pub async fn append(&mut self, chunk: &[u8]) -> Result<(), Error> {
        self.file
            .write_all(chunk)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, &self.staging))?;
        self.hasher.update(chunk);
        Ok(())
    }

    /// Bytes appended so far
    #[must_use]
    pub fn written(&self) -> u64 {
        self.hasher.size()
    }

    /// Flush, move the staging file onto `cache_path` and record the entry
    ///
    /// # Errors
    ///
    /// Returns an error if flushing, renaming or writing the entry record fails.
    pub async fn commit(mut self) -> Result<CacheEntry, Error> {
        self.file
            .flush()
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, &self.staging))?;
        self.file
            .get_mut()
            .sync_all()
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, &self.staging))?;
        drop(self.file);

        fs::atomic_rename(&self.staging, &self.cache_path).await?;

        let entry = CacheEntry {
            size: self.hasher.size(),
            blake3: self.hasher.finalize(),
            fetched_at: Utc::now(),
        };
        entry.save(&entry_path(&self.cache_path)).await?;

        Ok(entry)
    }

    /// Drop the partial download
    ///
    /// # Errors
    ///
    /// Returns an error if the staging file exists but cannot be removed.
    pub async fn discard(self) -> Result<(), Error> {
        drop(self.file);
        fs::remove_file(&self.staging).await
    }
}
