#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Local artifact cache for nwkit
//!
//! Each platform archive lives at its target's `cache_path`. Presence of that
//! file is what makes a later run skip the network. Downloads are written to a
//! staging file next to it and renamed into place only once complete, so a
//! file at `cache_path` is always a whole archive.

mod entry;
mod writer;

pub use entry::CacheEntry;
pub use writer::CacheWriter;

use nwkit_errors::Error;
use nwkit_hash::Hash;
use nwkit_platform::fs;
use nwkit_types::PlatformTarget;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// How a cached archive is judged usable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// The file exists
    #[default]
    Presence,
    /// The file exists and matches the size and digest in its entry record
    Verified,
}

/// Cache of downloaded platform archives
#[derive(Debug, Clone, Default)]
pub struct ArtifactCache {
    policy: CachePolicy,
}

impl ArtifactCache {
    #[must_use]
    pub fn new(policy: CachePolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Whether the target's archive can be used without fetching
    pub async fn is_cached(&self, target: &PlatformTarget) -> bool {
        let path = &target.cache_path;
        if !fs::exists(path).await {
            return false;
        }

        match self.policy {
            CachePolicy::Presence => true,
            CachePolicy::Verified => match Self::verify(path).await {
                Ok(valid) => valid,
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "cache verification failed");
                    false
                }
            },
        }
    }

    async fn verify(path: &Path) -> Result<bool, Error> {
        let Some(entry) = CacheEntry::load(&entry_path(path)).await? else {
            return Ok(false);
        };

        let (hash, size) = Hash::hash_file(path).await?;
        Ok(size == entry.size && hash == entry.blake3)
    }

    /// Entry record written when the archive was committed, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read or parsed.
    pub async fn entry(&self, target: &PlatformTarget) -> Result<Option<CacheEntry>, Error> {
        CacheEntry::load(&entry_path(&target.cache_path)).await
    }

    /// Open a staging writer for the target's archive
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory or staging file cannot be created.
    pub async fn writer(&self, target: &PlatformTarget) -> Result<CacheWriter, Error> {
        CacheWriter::create(&target.cache_path).await
    }

    /// Remove the cached archive, its entry record and any leftover staging file
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be removed.
    pub async fn evict(&self, target: &PlatformTarget) -> Result<(), Error> {
        let path = &target.cache_path;
        fs::remove_file(path).await?;
        fs::remove_file(&entry_path(path)).await?;
        fs::remove_file(&staging_path(path)).await
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// `<cache_path>.download`
#[must_use]
pub fn staging_path(cache_path: &Path) -> PathBuf {
    with_suffix(cache_path, ".download")
}

/// `<cache_path>.entry.json`
#[must_use]
pub fn entry_path(cache_path: &Path) -> PathBuf {
    with_suffix(cache_path, ".entry.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidecar_paths() {
        let cache = Path::new("/p/tmp/node-webkit-win-ia32.zip");
        assert_eq!(
            staging_path(cache),
            PathBuf::from("/p/tmp/node-webkit-win-ia32.zip.download")
        );
        assert_eq!(
            entry_path(cache),
            PathBuf::from("/p/tmp/node-webkit-win-ia32.zip.entry.json")
        );
    }
}
