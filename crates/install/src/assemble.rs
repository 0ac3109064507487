//! Relocating extracted payloads into the resources tree

use nwkit_errors::{Error, ProvisionError};
use nwkit_events::{EventEmitter, EventSender, ProvisionEvent};
use nwkit_platform::fs;
use nwkit_store::ArtifactCache;
use nwkit_types::{ExtractMode, PlatformTarget};

/// Result of the assemble stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssembleOutcome {
    /// Extraction already wrote the destination
    Skipped,
    /// Files copied from scratch into the destination
    Copied { files: usize },
}

/// Moves extracted payloads into place and cleans up after them
#[derive(Debug, Clone, Default)]
pub struct AssetAssembler {
    cache: ArtifactCache,
}

impl AssetAssembler {
    #[must_use]
    pub fn new(cache: ArtifactCache) -> Self {
        Self { cache }
    }

    /// Copy the extracted payload (or its bundle) into the destination
    ///
    /// Existing files are overwritten. A failed copy may leave a partial tree.
    ///
    /// # Errors
    ///
    /// Returns `AssemblyFailed` if the bundle is missing from the extracted
    /// tree or the copy fails.
    pub async fn assemble(
        &self,
        target: &PlatformTarget,
        tx: &EventSender,
    ) -> Result<AssembleOutcome, Error> {
        if target.extract_mode == ExtractMode::Destination {
            tx.emit_provision(ProvisionEvent::AssembleSkipped {
                platform: target.id,
            });
            return Ok(AssembleOutcome::Skipped);
        }

        let (source, destination) = match &target.bundle {
            Some(bundle) => (
                target.scratch_path.join(bundle),
                target.destination_path.join(bundle),
            ),
            None => (target.scratch_path.clone(), target.destination_path.clone()),
        };

        let failed = |message: String| -> Error {
            ProvisionError::AssemblyFailed {
                platform: target.id.to_string(),
                message,
            }
            .into()
        };

        if !fs::exists(&source).await {
            return Err(failed(format!(
                "{} not found in extracted archive",
                source.display()
            )));
        }

        tx.emit_provision(ProvisionEvent::AssembleStarted {
            platform: target.id,
            destination: destination.clone(),
        });

        let files = fs::copy_directory(&source, &destination)
            .await
            .map_err(|e| failed(e.to_string()))?;

        tx.emit_provision(ProvisionEvent::AssembleCompleted {
            platform: target.id,
            files,
        });

        Ok(AssembleOutcome::Copied { files })
    }

    /// Best-effort removal of the scratch directory and cached archive
    ///
    /// Failures are reported as events and never returned.
    pub async fn cleanup(&self, target: &PlatformTarget, tx: &EventSender) {
        let mut clean = true;

        if target.extract_mode == ExtractMode::Scratch {
            if let Err(e) = fs::remove_dir_all(&target.scratch_path).await {
                clean = false;
                tx.emit_provision(ProvisionEvent::CleanupFailed {
                    platform: target.id,
                    path: target.scratch_path.clone(),
                    error: e.to_string(),
                });
            }
        }

        if let Err(e) = self.cache.evict(target).await {
            clean = false;
            tx.emit_provision(ProvisionEvent::CleanupFailed {
                platform: target.id,
                path: target.cache_path.clone(),
                error: e.to_string(),
            });
        }

        if clean {
            tx.emit_provision(ProvisionEvent::CleanupCompleted {
                platform: target.id,
            });
        }
    }
}
