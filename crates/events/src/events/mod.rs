use serde::{Deserialize, Serialize};

use crate::EventSource;
use nwkit_types::PlatformId;
use nwkit_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureContext {
    /// Stable error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    /// Construct a new failure context.
    #[must_use]
    pub fn new(
        code: Option<impl Into<String>>,
        message: impl Into<String>,
        hint: Option<impl Into<String>>,
        retryable: bool,
    ) -> Self {
        Self {
            code: code.map(Into::into),
            message: message.into(),
            hint: hint.map(Into::into),
            retryable,
        }
    }

    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self::new(
            error.user_code(),
            error.user_message().into_owned(),
            error.user_hint(),
            error.is_retryable(),
        )
    }
}

pub mod general;
pub mod provision;

pub use general::*;
pub use provision::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, errors, operations)
    General(GeneralEvent),

    /// Runtime provisioning pipeline events
    Provision(ProvisionEvent),
}

impl AppEvent {
    /// Identify the source domain for this event (used for metadata/logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::General(_) => EventSource::General,
            Self::Provision(event) => match event {
                ProvisionEvent::FetchStarted { .. }
                | ProvisionEvent::FetchSkipped { .. }
                | ProvisionEvent::FetchProgress { .. }
                | ProvisionEvent::FetchCompleted { .. } => EventSource::Fetch,
                ProvisionEvent::ExtractStarted { .. } | ProvisionEvent::ExtractCompleted { .. } => {
                    EventSource::Extract
                }
                ProvisionEvent::AssembleStarted { .. }
                | ProvisionEvent::AssembleSkipped { .. }
                | ProvisionEvent::AssembleCompleted { .. }
                | ProvisionEvent::CleanupCompleted { .. }
                | ProvisionEvent::CleanupFailed { .. } => EventSource::Assemble,
                _ => EventSource::Provision,
            },
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::General(GeneralEvent::Error { .. })
            | Self::Provision(ProvisionEvent::PlatformFailed { .. }) => Level::ERROR,

            Self::General(GeneralEvent::Warning { .. })
            | Self::Provision(ProvisionEvent::CleanupFailed { .. }) => Level::WARN,

            Self::General(GeneralEvent::DebugLog { .. })
            | Self::Provision(ProvisionEvent::FetchProgress { .. }) => Level::DEBUG,

            _ => Level::INFO,
        }
    }

    /// Platform whose pipeline emitted this event
    #[must_use]
    pub fn platform(&self) -> Option<PlatformId> {
        match self {
            Self::Provision(event) => event.platform(),
            Self::General(_) => None,
        }
    }
}
