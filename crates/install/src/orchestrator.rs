//! Concurrent provisioning of a platform selection

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use nwkit_config::Config;
use nwkit_errors::{ConfigError, Error};
use nwkit_events::{EventEmitter, EventSender, ProvisionEvent};
use nwkit_net::{ArtifactFetcher, NetClient, NetConfig};
use nwkit_platform::{PlatformCatalog, ProjectLayout};
use nwkit_store::{ArtifactCache, CachePolicy};
use nwkit_types::{
    FailureReason, Outcome, PipelineStage, PlatformId, PlatformOutcome, ProvisionReport,
};
use tokio::sync::watch;

use crate::assemble::AssetAssembler;
use crate::extract::ArchiveExtractor;
use crate::pipeline::PlatformPipeline;

/// Which platforms run the cleanup step after completing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CleanupPolicy {
    #[default]
    Never,
    Always,
    Only(HashSet<PlatformId>),
}

impl CleanupPolicy {
    /// Policy from a list of platform names
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a name that is not a platform.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, Error> {
        if names.is_empty() {
            return Ok(Self::Never);
        }

        let platforms = names
            .iter()
            .map(|name| {
                name.as_ref()
                    .parse::<PlatformId>()
                    .map_err(|_| -> Error {
                        ConfigError::InvalidValue {
                            field: "platforms.cleanup".to_string(),
                            value: name.as_ref().to_string(),
                        }
                        .into()
                    })
            })
            .collect::<Result<HashSet<_>, _>>()?;

        Ok(Self::Only(platforms))
    }

    #[must_use]
    pub fn applies_to(&self, platform: PlatformId) -> bool {
        match self {
            Self::Never => false,
            Self::Always => true,
            Self::Only(platforms) => platforms.contains(&platform),
        }
    }
}

/// Builds one pipeline per selected platform and runs them concurrently
pub struct ProvisioningOrchestrator {
    catalog: PlatformCatalog,
    layout: ProjectLayout,
    fetcher: ArtifactFetcher,
    extractor: Arc<ArchiveExtractor>,
    assembler: AssetAssembler,
    cleanup: CleanupPolicy,
}

impl ProvisioningOrchestrator {
    #[must_use]
    pub fn new(
        catalog: PlatformCatalog,
        layout: ProjectLayout,
        fetcher: ArtifactFetcher,
        extractor: ArchiveExtractor,
    ) -> Self {
        let assembler = AssetAssembler::new(fetcher.cache().clone());
        Self {
            catalog,
            layout,
            fetcher,
            extractor: Arc::new(extractor),
            assembler,
            cleanup: CleanupPolicy::Never,
        }
    }

    /// Wire every component from configuration for the project at `root`
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog overrides, cleanup list or base URL
    /// are invalid, or the HTTP client cannot be built.
    pub fn from_config(config: &Config, root: impl Into<PathBuf>) -> Result<Self, Error> {
        let catalog = PlatformCatalog::from_config(config)?;
        let layout = ProjectLayout::from_config(root, &config.paths);

        let policy = if config.cache.verify {
            CachePolicy::Verified
        } else {
            CachePolicy::Presence
        };
        let client = NetClient::new(NetConfig::from_config(&config.network))?;
        let fetcher = ArtifactFetcher::new(
            client,
            config.remote.base_url.clone(),
            ArtifactCache::new(policy),
            config.remote.content_type.clone(),
        )?;

        let cleanup = CleanupPolicy::from_names(&config.platforms.cleanup)?;

        Ok(Self::new(catalog, layout, fetcher, ArchiveExtractor::default()).with_cleanup(cleanup))
    }

    #[must_use]
    pub fn with_cleanup(mut self, cleanup: CleanupPolicy) -> Self {
        self.cleanup = cleanup;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &PlatformCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Provision every named platform
    ///
    /// Names are resolved up front, so an unknown name fails the whole call
    /// before any I/O. Repeated names collapse to one pipeline. Otherwise the
    /// call waits for every pipeline to settle and reports each outcome in
    /// selection order; platform failures are never returned as `Err`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPlatform` if any name does not resolve.
    pub async fn provision<S: AsRef<str>>(
        &self,
        names: &[S],
        tx: &EventSender,
    ) -> Result<ProvisionReport, Error> {
        let started = Instant::now();
        let specs = self.catalog.resolve(names)?;
        if specs.is_empty() {
            return Ok(ProvisionReport::default());
        }

        let targets = specs
            .iter()
            .map(|spec| self.catalog.target(spec.id, &self.layout))
            .collect::<Result<Vec<_>, _>>()?;

        tx.emit_provision(ProvisionEvent::BatchStarted {
            platforms: targets.iter().map(|t| t.id).collect(),
        });

        let mut platforms = Vec::with_capacity(targets.len());
        let mut stages = Vec::with_capacity(targets.len());
        let mut handles = Vec::with_capacity(targets.len());

        for target in targets {
            let pipeline = PlatformPipeline::new(
                self.fetcher.clone(),
                Arc::clone(&self.extractor),
                self.assembler.clone(),
                self.cleanup.applies_to(target.id),
            );
            let (stage_tx, stage_rx) = watch::channel(PipelineStage::Fetch);
            let tx = tx.clone();

            platforms.push(target.id);
            stages.push(stage_rx);
            handles.push(tokio::spawn(async move {
                pipeline.run(target, &tx, &stage_tx).await
            }));
        }

        // Settle-all barrier: every task is awaited regardless of failures
        let results = join_all(handles).await;

        let outcomes: Vec<PlatformOutcome> = results
            .into_iter()
            .zip(platforms)
            .zip(stages)
            .map(|((result, platform), stage)| match result {
                Ok(outcome) => outcome,
                Err(e) => {
                    let stage = *stage.borrow();
                    let error = Error::internal(format!("{platform} pipeline task failed: {e}"));
                    tx.emit_provision(ProvisionEvent::PlatformFailed {
                        platform,
                        stage,
                        failure: nwkit_events::FailureContext::from_error(&error),
                    });
                    PlatformOutcome {
                        platform,
                        outcome: Outcome::Failed(FailureReason { stage, error }),
                        from_cache: false,
                        duration: started.elapsed(),
                    }
                }
            })
            .collect();

        let report = ProvisionReport {
            outcomes,
            duration: started.elapsed(),
        };

        tx.emit_provision(ProvisionEvent::BatchCompleted {
            completed: report.completed().map(|o| o.platform).collect(),
            failed: report.failed().map(|o| o.platform).collect(),
            duration: report.duration,
        });

        Ok(report)
    }
}
