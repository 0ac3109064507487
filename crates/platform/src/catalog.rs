//! Static description of every supported platform

use std::collections::HashSet;
use std::path::{Component, Path};

use nwkit_config::Config;
use nwkit_errors::{ConfigError, Error, ProvisionError};
use nwkit_types::{ArchiveFormat, ExtractMode, PlatformId, PlatformTarget};
use serde::{Deserialize, Serialize};

use crate::layout::ProjectLayout;

/// Everything needed to provision one platform, independent of any project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub id: PlatformId,
    /// Appended to the remote base URL and to the local cache file name
    pub suffix: String,
    pub format: ArchiveFormat,
    /// Destination subdirectory under the namespaced resources dir
    pub subdir: String,
    pub extract_mode: ExtractMode,
    /// Subtree relocated by assembly; the whole tree when `None`
    pub bundle: Option<String>,
}

impl PlatformSpec {
    fn builtin(id: PlatformId) -> Self {
        let (suffix, format, subdir, extract_mode, bundle) = match id {
            PlatformId::MacOS => (
                "osx-ia32.zip",
                ArchiveFormat::Zip,
                "mac",
                ExtractMode::Scratch,
                Some("node-webkit.app"),
            ),
            PlatformId::Linux32 => (
                "linux-ia32.tar.gz",
                ArchiveFormat::TarGz,
                "linux32",
                ExtractMode::Scratch,
                None,
            ),
            PlatformId::Linux64 => (
                "linux-x64.tar.gz",
                ArchiveFormat::TarGz,
                "linux64",
                ExtractMode::Scratch,
                None,
            ),
            PlatformId::Windows => (
                "win-ia32.zip",
                ArchiveFormat::Zip,
                "win",
                ExtractMode::Destination,
                None,
            ),
        };

        Self {
            id,
            suffix: suffix.to_string(),
            format,
            subdir: subdir.to_string(),
            extract_mode,
            bundle: bundle.map(str::to_string),
        }
    }
}

/// Lookup table from platform to [`PlatformSpec`]
#[derive(Debug, Clone)]
pub struct PlatformCatalog {
    specs: Vec<PlatformSpec>,
}

impl PlatformCatalog {
    /// Built-in catalog
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            specs: PlatformId::ALL.into_iter().map(PlatformSpec::builtin).collect(),
        }
    }

    /// Build a catalog from explicit specs
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if two platforms share an id, suffix or
    /// subdirectory, a suffix or subdirectory is not a single path component,
    /// or a bundle is absolute or climbs with `..`.
    pub fn new(specs: Vec<PlatformSpec>) -> Result<Self, Error> {
        let mut ids = HashSet::new();
        let mut suffixes = HashSet::new();
        let mut subdirs = HashSet::new();

        for spec in &specs {
            if !ids.insert(spec.id) {
                return Err(invalid(format!("platform {} is listed twice", spec.id)));
            }
            if !is_single_component(&spec.suffix) || !suffixes.insert(spec.suffix.as_str()) {
                return Err(invalid(format!(
                    "archive suffix '{}' for {} is invalid or not unique",
                    spec.suffix, spec.id
                )));
            }
            if !is_single_component(&spec.subdir) || !subdirs.insert(spec.subdir.as_str()) {
                return Err(invalid(format!(
                    "destination subdir '{}' for {} is invalid or not unique",
                    spec.subdir, spec.id
                )));
            }
            if let Some(bundle) = &spec.bundle {
                if !is_nested_relative(bundle) {
                    return Err(invalid(format!(
                        "bundle '{bundle}' for {} is invalid",
                        spec.id
                    )));
                }
            }
        }

        Ok(Self { specs })
    }

    /// Built-in catalog with `[platforms.overrides]` applied
    ///
    /// # Errors
    ///
    /// Returns an error if an override names an unknown platform or the
    /// resulting catalog fails validation.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let mut specs = Self::defaults().specs;

        for (name, overrides) in &config.platforms.overrides {
            let id: PlatformId = name.parse().map_err(|_| ConfigError::InvalidValue {
                field: "platforms.overrides".to_string(),
                value: name.clone(),
            })?;

            if let Some(spec) = specs.iter_mut().find(|spec| spec.id == id) {
                if let Some(suffix) = &overrides.suffix {
                    spec.suffix.clone_from(suffix);
                }
                if let Some(subdir) = &overrides.subdir {
                    spec.subdir.clone_from(subdir);
                }
                if let Some(bundle) = &overrides.bundle {
                    spec.bundle = Some(bundle.clone());
                }
            }
        }

        Self::new(specs)
    }

    /// All specs in catalog order
    #[must_use]
    pub fn specs(&self) -> &[PlatformSpec] {
        &self.specs
    }

    /// Look up a platform by id
    ///
    /// # Errors
    ///
    /// Returns `UnknownPlatform` if the catalog does not carry `id`.
    pub fn describe_id(&self, id: PlatformId) -> Result<&PlatformSpec, Error> {
        self.specs.iter().find(|spec| spec.id == id).ok_or_else(|| {
            ProvisionError::UnknownPlatform {
                name: id.to_string(),
            }
            .into()
        })
    }

    /// Look up a platform by user-supplied name
    ///
    /// # Errors
    ///
    /// Returns `UnknownPlatform` if the name does not parse or is not in the catalog.
    pub fn describe(&self, name: &str) -> Result<&PlatformSpec, Error> {
        let id: PlatformId = name.parse()?;
        self.describe_id(id)
    }

    /// Resolve a whole selection, dropping repeats but keeping first-seen order
    ///
    /// # Errors
    ///
    /// Returns `UnknownPlatform` for the first name that does not resolve.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&PlatformSpec>, Error> {
        let mut seen = HashSet::new();
        let mut resolved = Vec::with_capacity(names.len());

        for name in names {
            let spec = self.describe(name.as_ref())?;
            if seen.insert(spec.id) {
                resolved.push(spec);
            }
        }

        Ok(resolved)
    }

    /// Build a fresh `Pending` target for a platform within a project
    ///
    /// # Errors
    ///
    /// Returns `UnknownPlatform` if the catalog does not carry `id`.
    pub fn target(&self, id: PlatformId, layout: &ProjectLayout) -> Result<PlatformTarget, Error> {
        let spec = self.describe_id(id)?;
        Ok(PlatformTarget::new(
            spec.id,
            spec.suffix.clone(),
            spec.format,
            spec.extract_mode,
            spec.bundle.clone(),
            layout.paths_for(spec),
        ))
    }
}

impl Default for PlatformCatalog {
    fn default() -> Self {
        Self::defaults()
    }
}

fn is_single_component(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// Relative path that cannot climb out of the directory it is joined to
fn is_nested_relative(path: &str) -> bool {
    let path = Path::new(path);
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
        && path.components().any(|component| matches!(component, Component::Normal(_)))
}

fn invalid(message: String) -> Error {
    ConfigError::Invalid { message }.into()
}
