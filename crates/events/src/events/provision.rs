use nwkit_types::{ArchiveFormat, PipelineStage, PlatformId};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::FailureContext;

/// Runtime provisioning events, one stream per platform pipeline plus batch bookends
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProvisionEvent {
    /// Pipelines are about to start for the resolved selection
    BatchStarted { platforms: Vec<PlatformId> },

    /// Every pipeline has settled
    BatchCompleted {
        completed: Vec<PlatformId>,
        failed: Vec<PlatformId>,
        duration: Duration,
    },

    /// Network retrieval started
    FetchStarted { platform: PlatformId, url: String },

    /// Artifact already cached, no network call made
    FetchSkipped {
        platform: PlatformId,
        cache_path: PathBuf,
    },

    /// Bytes received so far
    FetchProgress {
        platform: PlatformId,
        bytes: u64,
        total: Option<u64>,
    },

    /// Artifact committed to the cache
    FetchCompleted {
        platform: PlatformId,
        bytes: u64,
        hash: String,
    },

    ExtractStarted {
        platform: PlatformId,
        format: ArchiveFormat,
        into: PathBuf,
    },

    ExtractCompleted { platform: PlatformId, entries: usize },

    AssembleStarted {
        platform: PlatformId,
        destination: PathBuf,
    },

    /// Extraction already wrote the destination
    AssembleSkipped { platform: PlatformId },

    AssembleCompleted { platform: PlatformId, files: usize },

    CleanupCompleted { platform: PlatformId },

    /// Best-effort cleanup could not remove a path
    CleanupFailed {
        platform: PlatformId,
        path: PathBuf,
        error: String,
    },

    PlatformCompleted {
        platform: PlatformId,
        from_cache: bool,
        duration: Duration,
    },

    PlatformFailed {
        platform: PlatformId,
        stage: PipelineStage,
        failure: FailureContext,
    },
}

impl ProvisionEvent {
    /// Platform this event belongs to, if it is not a batch bookend
    #[must_use]
    pub fn platform(&self) -> Option<PlatformId> {
        match self {
            Self::BatchStarted { .. } | Self::BatchCompleted { .. } => None,
            Self::FetchStarted { platform, .. }
            | Self::FetchSkipped { platform, .. }
            | Self::FetchProgress { platform, .. }
            | Self::FetchCompleted { platform, .. }
            | Self::ExtractStarted { platform, .. }
            | Self::ExtractCompleted { platform, .. }
            | Self::AssembleStarted { platform, .. }
            | Self::AssembleSkipped { platform }
            | Self::AssembleCompleted { platform, .. }
            | Self::CleanupCompleted { platform }
            | Self::CleanupFailed { platform, .. }
            | Self::PlatformCompleted { platform, .. }
            | Self::PlatformFailed { platform, .. } => Some(*platform),
        }
    }
}
