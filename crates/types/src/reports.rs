//! Aggregate result of a provisioning run

use crate::platform::PlatformId;
use crate::status::FailureReason;
use std::time::Duration;

/// Terminal result of one platform's pipeline
#[derive(Debug, Clone)]
pub enum Outcome {
    Complete,
    Failed(FailureReason),
}

/// Per-platform outcome record
#[derive(Debug, Clone)]
pub struct PlatformOutcome {
    pub platform: PlatformId,
    pub outcome: Outcome,
    /// The artifact was already cached; no network call was made
    pub from_cache: bool,
    pub duration: Duration,
}

impl PlatformOutcome {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.outcome, Outcome::Complete)
    }

    #[must_use]
    pub fn failure(&self) -> Option<&FailureReason> {
        match &self.outcome {
            Outcome::Complete => None,
            Outcome::Failed(reason) => Some(reason),
        }
    }
}

/// One outcome per selected platform, in selection order
#[derive(Debug, Clone, Default)]
pub struct ProvisionReport {
    pub outcomes: Vec<PlatformOutcome>,
    pub duration: Duration,
}

impl ProvisionReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Outcome for a given platform
    #[must_use]
    pub fn get(&self, platform: PlatformId) -> Option<&PlatformOutcome> {
        self.outcomes.iter().find(|o| o.platform == platform)
    }

    pub fn completed(&self) -> impl Iterator<Item = &PlatformOutcome> {
        self.outcomes.iter().filter(|o| o.is_complete())
    }

    pub fn failed(&self) -> impl Iterator<Item = &PlatformOutcome> {
        self.outcomes.iter().filter(|o| !o.is_complete())
    }

    /// True when no platform failed (vacuously true for an empty report)
    #[must_use]
    pub fn all_complete(&self) -> bool {
        self.outcomes.iter().all(PlatformOutcome::is_complete)
    }
}
