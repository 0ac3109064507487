//! Pipeline status machine

use nwkit_errors::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stage a failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Fetch,
    Extract,
    Assemble,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch => f.write_str("fetch"),
            Self::Extract => f.write_str("extract"),
            Self::Assemble => f.write_str("assemble"),
        }
    }
}

/// Why a platform's pipeline failed
#[derive(Debug, Clone)]
pub struct FailureReason {
    pub stage: PipelineStage,
    pub error: Error,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stage: {}", self.stage, self.error)
    }
}

/// Status of a platform target
///
/// Moves strictly forward through the happy path, or terminates at `Failed`.
#[derive(Debug, Clone)]
pub enum PipelineStatus {
    Pending,
    Fetching,
    Fetched,
    Extracting,
    Extracted,
    Assembling,
    Complete,
    Failed(FailureReason),
}

impl PipelineStatus {
    fn rank(&self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Fetching => Some(1),
            Self::Fetched => Some(2),
            Self::Extracting => Some(3),
            Self::Extracted => Some(4),
            Self::Assembling => Some(5),
            Self::Complete => Some(6),
            Self::Failed(_) => None,
        }
    }

    /// `Complete` or `Failed`
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed(_))
    }

    /// Whether `next` is a legal successor of this status
    #[must_use]
    pub fn can_advance_to(&self, next: &PipelineStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self.rank(), next.rank()) {
            (_, None) => true,
            (Some(current), Some(next)) => next == current + 1,
            (None, Some(_)) => false,
        }
    }
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Fetched => "fetched",
            Self::Extracting => "extracting",
            Self::Extracted => "extracted",
            Self::Assembling => "assembling",
            Self::Complete => "complete",
            Self::Failed(_) => "failed",
        };
        f.write_str(name)
    }
}
