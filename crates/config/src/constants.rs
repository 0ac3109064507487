//! Default values for the provisioning layout and remote store

/// Remote prefix; the platform suffix is appended verbatim.
pub const DEFAULT_BASE_URL: &str = "https://s3.amazonaws.com/node-webkit/v0.7.5/node-webkit-v0.7.5-";

pub const DEFAULT_CACHE_DIR: &str = "tmp";
pub const DEFAULT_RESOURCES_DIR: &str = "resources";
pub const DEFAULT_NAMESPACE: &str = "node-webkit";
pub const DEFAULT_ARTIFACT_PREFIX: &str = "node-webkit";

pub const DEFAULT_PLATFORMS: &[&str] = &["macos", "linux64", "windows"];

/// Project-local config file name
pub const PROJECT_CONFIG_FILE: &str = "nwkit.toml";

pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CHUNK_TIMEOUT_SECS: u64 = 30;
