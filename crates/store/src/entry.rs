use chrono::{DateTime, Utc};
use nwkit_errors::{Error, StorageError};
use nwkit_hash::Hash;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Record written next to a committed archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub size: u64,
    pub blake3: Hash,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Read a record; `None` when it does not exist
    pub(crate) async fn load(path: &Path) -> Result<Option<Self>, Error> {
        let contents = match fs::read(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::from_io_with_path(&e, path).into()),
        };

        serde_json::from_slice(&contents)
            .map(Some)
            .map_err(|e| {
                StorageError::CorruptedData {
                    message: format!("{}: {e}", path.display()),
                }
                .into()
            })
    }

    pub(crate) async fn save(&self, path: &Path) -> Result<(), Error> {
        let json = serde_json::to_vec_pretty(self)?;
        fs::write(path, json)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, path).into())
    }
}
