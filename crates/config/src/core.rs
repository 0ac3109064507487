//! Configuration sections

use crate::constants;
use nwkit_types::{ColorChoice, OutputFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// General application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    #[serde(default = "default_color_choice")]
    pub color: ColorChoice,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: OutputFormat::Tty,
            color: ColorChoice::Auto,
        }
    }
}

/// Remote artifact store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Overrides the accepted media type for every archive format
    #[serde(default)]
    pub content_type: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            content_type: None,
        }
    }
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_timeout")]
    pub timeout: u64, // seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64, // seconds
    #[serde(default = "default_chunk_timeout")]
    pub chunk_timeout: u64, // seconds between body chunks
}

impl NetworkConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    #[must_use]
    pub fn chunk_timeout(&self) -> Duration {
        Duration::from_secs(self.chunk_timeout)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout: constants::DEFAULT_TIMEOUT_SECS,
            connect_timeout: constants::DEFAULT_CONNECT_TIMEOUT_SECS,
            chunk_timeout: constants::DEFAULT_CHUNK_TIMEOUT_SECS,
        }
    }
}

/// Directory names relative to the project root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
    #[serde(default = "default_resources_dir")]
    pub resources_dir: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_artifact_prefix")]
    pub artifact_prefix: String,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            resources_dir: default_resources_dir(),
            namespace: default_namespace(),
            artifact_prefix: default_artifact_prefix(),
        }
    }
}

/// Artifact cache configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Check size and digest against the entry record instead of presence only
    #[serde(default)]
    pub verify: bool,
}

/// Per-platform catalog override
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformOverride {
    pub suffix: Option<String>,
    pub subdir: Option<String>,
    pub bundle: Option<String>,
}

/// Platform selection and catalog overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformsConfig {
    #[serde(default = "default_platforms")]
    pub default: Vec<String>,
    #[serde(default)]
    pub cleanup: Vec<String>,
    #[serde(default)]
    pub overrides: BTreeMap<String, PlatformOverride>,
}

impl Default for PlatformsConfig {
    fn default() -> Self {
        Self {
            default: default_platforms(),
            cleanup: Vec::new(),
            overrides: BTreeMap::new(),
        }
    }
}

// Default value functions for serde
fn default_output_format() -> OutputFormat {
    OutputFormat::Tty
}

fn default_color_choice() -> ColorChoice {
    ColorChoice::Auto
}

fn default_base_url() -> String {
    constants::DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    constants::DEFAULT_TIMEOUT_SECS
}

fn default_connect_timeout() -> u64 {
    constants::DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_chunk_timeout() -> u64 {
    constants::DEFAULT_CHUNK_TIMEOUT_SECS
}

fn default_cache_dir() -> String {
    constants::DEFAULT_CACHE_DIR.to_string()
}

fn default_resources_dir() -> String {
    constants::DEFAULT_RESOURCES_DIR.to_string()
}

fn default_namespace() -> String {
    constants::DEFAULT_NAMESPACE.to_string()
}

fn default_artifact_prefix() -> String {
    constants::DEFAULT_ARTIFACT_PREFIX.to_string()
}

fn default_platforms() -> Vec<String> {
    constants::DEFAULT_PLATFORMS
        .iter()
        .map(ToString::to_string)
        .collect()
}
