//! One platform's fetch → extract → assemble run

use std::sync::Arc;
use std::time::Instant;

use nwkit_errors::Error;
use nwkit_events::{EventEmitter, EventSender, FailureContext, ProvisionEvent};
use nwkit_net::ArtifactFetcher;
use nwkit_types::{
    FailureReason, Outcome, PipelineStage, PipelineStatus, PlatformOutcome, PlatformTarget,
};
use tokio::sync::watch;

use crate::assemble::AssetAssembler;
use crate::extract::ArchiveExtractor;

type StageError = (PipelineStage, Error);

/// Runs the three stages for a single platform, strictly in order
#[derive(Clone)]
pub struct PlatformPipeline {
    fetcher: ArtifactFetcher,
    extractor: Arc<ArchiveExtractor>,
    assembler: AssetAssembler,
    cleanup: bool,
}

impl PlatformPipeline {
    #[must_use]
    pub fn new(
        fetcher: ArtifactFetcher,
        extractor: Arc<ArchiveExtractor>,
        assembler: AssetAssembler,
        cleanup: bool,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            assembler,
            cleanup,
        }
    }

    /// Drive `target` to a terminal status
    ///
    /// Never returns an error: a failing stage is recorded in the outcome.
    /// The current stage is published on `stage` so a supervisor can
    /// attribute a panic.
    pub async fn run(
        &self,
        mut target: PlatformTarget,
        tx: &EventSender,
        stage: &watch::Sender<PipelineStage>,
    ) -> PlatformOutcome {
        let started = Instant::now();
        let platform = target.id;

        let (outcome, from_cache) = match self.drive(&mut target, tx, stage).await {
            Ok(from_cache) => {
                tx.emit_provision(ProvisionEvent::PlatformCompleted {
                    platform,
                    from_cache,
                    duration: started.elapsed(),
                });
                (Outcome::Complete, from_cache)
            }
            Err((failed_stage, error)) => {
                tx.emit_provision(ProvisionEvent::PlatformFailed {
                    platform,
                    stage: failed_stage,
                    failure: FailureContext::from_error(&error),
                });
                let reason = FailureReason {
                    stage: failed_stage,
                    error: error.clone(),
                };
                if let Err(e) = target.fail(failed_stage, error) {
                    tracing::debug!(platform = %platform, error = %e, "target already settled");
                }
                (Outcome::Failed(reason), false)
            }
        };

        PlatformOutcome {
            platform,
            outcome,
            from_cache,
            duration: started.elapsed(),
        }
    }

    async fn drive(
        &self,
        target: &mut PlatformTarget,
        tx: &EventSender,
        stage: &watch::Sender<PipelineStage>,
    ) -> Result<bool, StageError> {
        stage.send_replace(PipelineStage::Fetch);
        advance(target, PipelineStatus::Fetching, PipelineStage::Fetch)?;
        let fetched = self
            .fetcher
            .fetch(target, tx)
            .await
            .map_err(|e| (PipelineStage::Fetch, e))?;
        advance(target, PipelineStatus::Fetched, PipelineStage::Fetch)?;

        stage.send_replace(PipelineStage::Extract);
        advance(target, PipelineStatus::Extracting, PipelineStage::Extract)?;
        self.extractor
            .extract(target, tx)
            .await
            .map_err(|e| (PipelineStage::Extract, e))?;
        advance(target, PipelineStatus::Extracted, PipelineStage::Extract)?;

        stage.send_replace(PipelineStage::Assemble);
        advance(target, PipelineStatus::Assembling, PipelineStage::Assemble)?;
        self.assembler
            .assemble(target, tx)
            .await
            .map_err(|e| (PipelineStage::Assemble, e))?;
        advance(target, PipelineStatus::Complete, PipelineStage::Assemble)?;

        if self.cleanup {
            self.assembler.cleanup(target, tx).await;
        }

        Ok(fetched.from_cache())
    }
}

fn advance(
    target: &mut PlatformTarget,
    next: PipelineStatus,
    stage: PipelineStage,
) -> Result<(), StageError> {
    target.advance(next).map_err(|e| (stage, e))
}
