//! Provisioning pipeline error types
//!
//! Every variant except `UnknownPlatform` and `InvalidTransition` is a
//! per-platform failure: it is recorded in that platform's outcome and never
//! aborts sibling pipelines.

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ProvisionError {
    #[error("unknown platform: {name}")]
    UnknownPlatform { name: String },

    #[error("unexpected content type for {platform}: expected {expected}, got {actual}")]
    UnexpectedContentType {
        platform: String,
        expected: String,
        actual: String,
    },

    #[error("transfer failed for {platform}: {message}")]
    TransferFailed { platform: String, message: String },

    #[error("extraction failed for {platform}: {message}")]
    ExtractionFailed { platform: String, message: String },

    #[error("{format} extraction is not implemented (platform {platform})")]
    NotImplemented { platform: String, format: String },

    #[error("assembly failed for {platform}: {message}")]
    AssemblyFailed { platform: String, message: String },

    #[error("invalid status transition for {platform}: {from} -> {to}")]
    InvalidTransition {
        platform: String,
        from: String,
        to: String,
    },
}

impl ProvisionError {
    /// Whether this error is confined to a single platform's pipeline
    #[must_use]
    pub fn is_isolated(&self) -> bool {
        !matches!(
            self,
            Self::UnknownPlatform { .. } | Self::InvalidTransition { .. }
        )
    }
}

impl UserFacingError for ProvisionError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::UnknownPlatform { .. } => {
                Some("Supported platforms: macos, linux32, linux64, windows.")
            }
            Self::UnexpectedContentType { .. } => Some(
                "The artifact store did not return an archive; check `remote.base_url` and the runtime version.",
            ),
            Self::TransferFailed { .. } => Some("Check your network connection and retry."),
            Self::ExtractionFailed { .. } => Some(
                "The cached archive may be corrupt; delete it from the cache directory and retry.",
            ),
            Self::NotImplemented { .. } => {
                Some("Unpack this platform's archive manually into its resources directory.")
            }
            Self::AssemblyFailed { .. } => {
                Some("Ensure the resources directory is writable and retry.")
            }
            Self::InvalidTransition { .. } => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::TransferFailed { .. } | Self::AssemblyFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::UnknownPlatform { .. } => "provision.unknown_platform",
            Self::UnexpectedContentType { .. } => "provision.unexpected_content_type",
            Self::TransferFailed { .. } => "provision.transfer_failed",
            Self::ExtractionFailed { .. } => "provision.extraction_failed",
            Self::NotImplemented { .. } => "provision.not_implemented",
            Self::AssemblyFailed { .. } => "provision.assembly_failed",
            Self::InvalidTransition { .. } => "provision.invalid_transition",
        };
        Some(code)
    }
}
