//! Format-dispatched archive extraction

mod zip;

pub use self::zip::ZipStrategy;

use async_trait::async_trait;
use nwkit_errors::{Error, ProvisionError};
use nwkit_events::{EventEmitter, EventSender, ProvisionEvent};
use nwkit_platform::fs;
use nwkit_types::{ArchiveFormat, ExtractMode, PlatformTarget};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Unpacks one archive format
#[async_trait]
pub trait ExtractStrategy: Send + Sync {
    /// Unpack `archive` into `dest`, returning the number of entries written
    async fn extract(&self, archive: &Path, dest: &Path) -> Result<usize, Error>;
}

/// Result of a successful extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOutcome {
    pub entries: usize,
    pub into: PathBuf,
}

/// Capability map from archive format to extraction strategy
///
/// A format without a registered strategy fails with `NotImplemented`.
#[derive(Clone)]
pub struct ArchiveExtractor {
    strategies: HashMap<ArchiveFormat, Arc<dyn ExtractStrategy>>,
}

impl ArchiveExtractor {
    /// Extractor with no formats registered
    #[must_use]
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Register (or replace) the strategy for a format
    #[must_use]
    pub fn with_strategy(mut self, format: ArchiveFormat, strategy: Arc<dyn ExtractStrategy>) -> Self {
        self.strategies.insert(format, strategy);
        self
    }

    #[must_use]
    pub fn supports(&self, format: ArchiveFormat) -> bool {
        self.strategies.contains_key(&format)
    }

    /// Extract the target's cached archive into its extraction directory
    ///
    /// Scratch-mode targets get a fresh scratch directory. Destination-mode
    /// targets are unpacked over whatever the destination already holds.
    ///
    /// # Errors
    ///
    /// Returns `NotImplemented` if no strategy handles the target's format and
    /// `ExtractionFailed` if unpacking fails.
    pub async fn extract(
        &self,
        target: &PlatformTarget,
        tx: &EventSender,
    ) -> Result<ExtractOutcome, Error> {
        let Some(strategy) = self.strategies.get(&target.archive_format) else {
            return Err(ProvisionError::NotImplemented {
                platform: target.id.to_string(),
                format: target.archive_format.to_string(),
            }
            .into());
        };

        let into = target.extraction_dir().to_path_buf();
        tx.emit_provision(ProvisionEvent::ExtractStarted {
            platform: target.id,
            format: target.archive_format,
            into: into.clone(),
        });

        let prepared = match target.extract_mode {
            ExtractMode::Scratch => fs::ensure_empty_dir(&into).await,
            ExtractMode::Destination => fs::create_dir_all(&into).await,
        };

        let entries = match prepared {
            Ok(()) => strategy.extract(&target.cache_path, &into).await,
            Err(e) => Err(e),
        }
        .map_err(|e| -> Error {
            ProvisionError::ExtractionFailed {
                platform: target.id.to_string(),
                message: e.to_string(),
            }
            .into()
        })?;

        tx.emit_provision(ProvisionEvent::ExtractCompleted {
            platform: target.id,
            entries,
        });

        Ok(ExtractOutcome { entries, into })
    }
}

impl Default for ArchiveExtractor {
    /// Zip only; tar.gz is left unregistered
    fn default() -> Self {
        Self::empty().with_strategy(ArchiveFormat::Zip, Arc::new(ZipStrategy))
    }
}

impl std::fmt::Debug for ArchiveExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveExtractor")
            .field("formats", &self.strategies.keys().collect::<Vec<_>>())
            .finish()
    }
}
