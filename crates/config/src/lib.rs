#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for nwkit
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (explicit path, `<project>/nwkit.toml`, or
//!   `~/.config/nwkit/config.toml`)
//! - Environment variables
//! - CLI flags (applied by the binary)

pub mod constants;
pub mod core;

pub use self::core::{
    CacheConfig, GeneralConfig, NetworkConfig, PathConfig, PlatformOverride, PlatformsConfig,
    RemoteConfig,
};

use nwkit_errors::{ConfigError, Error};
use nwkit_types::{ColorChoice, OutputFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub paths: PathConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub platforms: PlatformsConfig,
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("nwkit").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        Self::parse(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a field has the wrong type.
    pub fn parse(contents: &str) -> Result<Self, Error> {
        toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "loading user config");
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Load configuration for a project directory
    ///
    /// An explicit path wins, then `<project>/nwkit.toml`, then the user config.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected config file cannot be read or parsed
    pub async fn load_for_project(project: &Path, explicit: Option<&Path>) -> Result<Self, Error> {
        if explicit.is_some() {
            return Self::load_or_default(explicit).await;
        }

        let project_config = project.join(constants::PROJECT_CONFIG_FILE);
        if project_config.exists() {
            tracing::debug!(path = %project_config.display(), "loading project config");
            return Self::load_from_file(&project_config).await;
        }

        Self::load().await
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // NWKIT_OUTPUT
        if let Ok(output) = std::env::var("NWKIT_OUTPUT") {
            self.general.default_output = match output.as_str() {
                "plain" => OutputFormat::Plain,
                "tty" => OutputFormat::Tty,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "NWKIT_OUTPUT".to_string(),
                        value: output,
                    }
                    .into())
                }
            };
        }

        // NWKIT_COLOR
        if let Ok(color) = std::env::var("NWKIT_COLOR") {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "NWKIT_COLOR".to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        // NWKIT_BASE_URL
        if let Ok(base_url) = std::env::var("NWKIT_BASE_URL") {
            if base_url.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "NWKIT_BASE_URL".to_string(),
                    value: base_url,
                }
                .into());
            }
            self.remote.base_url = base_url;
        }

        // NWKIT_NAMESPACE
        if let Ok(namespace) = std::env::var("NWKIT_NAMESPACE") {
            if namespace.is_empty() || namespace.contains(['/', '\\']) {
                return Err(ConfigError::InvalidValue {
                    field: "NWKIT_NAMESPACE".to_string(),
                    value: namespace,
                }
                .into());
            }
            self.paths.namespace = namespace;
        }

        // NWKIT_TIMEOUT
        if let Ok(timeout) = std::env::var("NWKIT_TIMEOUT") {
            self.network.timeout = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                field: "NWKIT_TIMEOUT".to_string(),
                value: timeout,
            })?;
        }

        // NWKIT_VERIFY_CACHE
        if let Ok(verify) = std::env::var("NWKIT_VERIFY_CACHE") {
            self.cache.verify = match verify.as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "NWKIT_VERIFY_CACHE".to_string(),
                        value: verify,
                    }
                    .into())
                }
            };
        }

        Ok(())
    }
}
