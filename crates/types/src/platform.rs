//! Platform identities and the per-platform pipeline target

use crate::status::{FailureReason, PipelineStage, PipelineStatus};
use nwkit_errors::{Error, ProvisionError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// A supported runtime platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformId {
    #[serde(rename = "macos")]
    MacOS,
    Linux32,
    Linux64,
    Windows,
}

impl PlatformId {
    /// All supported platforms, in catalog order
    pub const ALL: [PlatformId; 4] = [Self::MacOS, Self::Linux32, Self::Linux64, Self::Windows];

    /// Canonical lowercase name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MacOS => "macos",
            Self::Linux32 => "linux32",
            Self::Linux64 => "linux64",
            Self::Windows => "windows",
        }
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for PlatformId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for PlatformId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-', '_'], "");
        match normalized.as_str() {
            "macos" | "mac" | "osx" => Ok(Self::MacOS),
            "linux32" => Ok(Self::Linux32),
            "linux64" => Ok(Self::Linux64),
            "windows" | "win" => Ok(Self::Windows),
            _ => Err(ProvisionError::UnknownPlatform {
                name: s.to_string(),
            }
            .into()),
        }
    }
}

/// Archive container used by a platform's artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveFormat {
    Zip,
    TarGz,
}

impl ArchiveFormat {
    /// Media types the artifact store may declare for this format
    #[must_use]
    pub fn media_types(self) -> &'static [&'static str] {
        match self {
            Self::Zip => &["application/zip"],
            Self::TarGz => &["application/gzip", "application/x-gzip"],
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zip => f.write_str("zip"),
            Self::TarGz => f.write_str("tar.gz"),
        }
    }
}

/// Where extraction writes a platform's payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractMode {
    /// Extract into the platform's scratch directory, then assemble
    Scratch,
    /// Extract straight into the destination; assembly is a no-op
    Destination,
}

/// Filesystem locations derived for one platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPaths {
    /// Local cache file; its presence is the idempotency key
    pub cache: PathBuf,
    /// Platform-scoped scratch extraction directory
    pub scratch: PathBuf,
    /// Final directory under the project's resource tree
    pub destination: PathBuf,
}

/// One selected platform moving through the fetch → extract → assemble pipeline
#[derive(Debug, Clone)]
pub struct PlatformTarget {
    pub id: PlatformId,
    pub archive_suffix: String,
    pub archive_format: ArchiveFormat,
    pub extract_mode: ExtractMode,
    /// Subtree of the extracted payload relocated by assembly (whole tree when `None`)
    pub bundle: Option<String>,
    pub cache_path: PathBuf,
    pub scratch_path: PathBuf,
    pub destination_path: PathBuf,
    status: PipelineStatus,
}

impl PlatformTarget {
    /// Create a target in the `Pending` state
    #[must_use]
    pub fn new(
        id: PlatformId,
        archive_suffix: impl Into<String>,
        archive_format: ArchiveFormat,
        extract_mode: ExtractMode,
        bundle: Option<String>,
        paths: TargetPaths,
    ) -> Self {
        Self {
            id,
            archive_suffix: archive_suffix.into(),
            archive_format,
            extract_mode,
            bundle,
            cache_path: paths.cache,
            scratch_path: paths.scratch,
            destination_path: paths.destination,
            status: PipelineStatus::Pending,
        }
    }

    #[must_use]
    pub fn status(&self) -> &PipelineStatus {
        &self.status
    }

    /// Directory extraction writes into
    #[must_use]
    pub fn extraction_dir(&self) -> &std::path::Path {
        match self.extract_mode {
            ExtractMode::Scratch => &self.scratch_path,
            ExtractMode::Destination => &self.destination_path,
        }
    }

    /// Move the status forward
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if `next` is not the immediate successor of
    /// the current status or the current status is terminal.
    pub fn advance(&mut self, next: PipelineStatus) -> Result<(), Error> {
        if !self.status.can_advance_to(&next) {
            return Err(ProvisionError::InvalidTransition {
                platform: self.id.to_string(),
                from: self.status.to_string(),
                to: next.to_string(),
            }
            .into());
        }
        self.status = next;
        Ok(())
    }

    /// Terminate the pipeline with a failure recorded against `stage`
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the target already settled.
    pub fn fail(&mut self, stage: PipelineStage, error: Error) -> Result<(), Error> {
        self.advance(PipelineStatus::Failed(FailureReason { stage, error }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("mac".parse::<PlatformId>().unwrap(), PlatformId::MacOS);
        assert_eq!("OSX".parse::<PlatformId>().unwrap(), PlatformId::MacOS);
        assert_eq!("Linux 32".parse::<PlatformId>().unwrap(), PlatformId::Linux32);
        assert_eq!("linux-64".parse::<PlatformId>().unwrap(), PlatformId::Linux64);
        assert_eq!("win".parse::<PlatformId>().unwrap(), PlatformId::Windows);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "amiga".parse::<PlatformId>().unwrap_err();
        assert!(matches!(
            err,
            Error::Provision(ProvisionError::UnknownPlatform { ref name }) if name == "amiga"
        ));
    }

    #[test]
    fn test_round_trip_names() {
        for id in PlatformId::ALL {
            assert_eq!(id.as_str().parse::<PlatformId>().unwrap(), id);
        }
    }
}
