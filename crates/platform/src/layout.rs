//! Project directory layout

use nwkit_config::PathConfig;
use nwkit_types::TargetPaths;
use std::path::{Path, PathBuf};

use crate::catalog::PlatformSpec;

/// Directory layout of one project the runtime is provisioned into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    cache_dir: String,
    resources_dir: String,
    namespace: String,
    artifact_prefix: String,
}

impl ProjectLayout {
    /// Layout using the default directory names
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_config(root, &PathConfig::default())
    }

    #[must_use]
    pub fn from_config(root: impl Into<PathBuf>, paths: &PathConfig) -> Self {
        Self {
            root: root.into(),
            cache_dir: paths.cache_dir.clone(),
            resources_dir: paths.resources_dir.clone(),
            namespace: paths.namespace.clone(),
            artifact_prefix: paths.artifact_prefix.clone(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding cached archives and scratch extraction trees
    #[must_use]
    pub fn cache_root(&self) -> PathBuf {
        self.root.join(&self.cache_dir)
    }

    /// Namespaced directory receiving every platform's runtime
    #[must_use]
    pub fn resources_root(&self) -> PathBuf {
        self.root.join(&self.resources_dir).join(&self.namespace)
    }

    /// Derive the cache, scratch and destination paths for a platform
    #[must_use]
    pub fn paths_for(&self, spec: &PlatformSpec) -> TargetPaths {
        let cache_root = self.cache_root();
        TargetPaths {
            cache: cache_root.join(format!("{}-{}", self.artifact_prefix, spec.suffix)),
            scratch: cache_root.join(&spec.subdir),
            destination: self.resources_root().join(&spec.subdir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlatformCatalog;
    use nwkit_types::PlatformId;

    #[test]
    fn test_default_paths() {
        let catalog = PlatformCatalog::defaults();
        let layout = ProjectLayout::new("/work/app");
        let spec = catalog.describe_id(PlatformId::MacOS).unwrap();

        let paths = layout.paths_for(spec);
        assert_eq!(
            paths.cache,
            PathBuf::from("/work/app/tmp/node-webkit-osx-ia32.zip")
        );
        assert_eq!(paths.scratch, PathBuf::from("/work/app/tmp/mac"));
        assert_eq!(
            paths.destination,
            PathBuf::from("/work/app/resources/node-webkit/mac")
        );
    }

    #[test]
    fn test_configured_dirs() {
        let config = PathConfig {
            cache_dir: "cache".into(),
            resources_dir: "assets".into(),
            namespace: "nw".into(),
            artifact_prefix: "nwjs".into(),
        };
        let layout = ProjectLayout::from_config("/p", &config);
        let catalog = PlatformCatalog::defaults();
        let paths = layout.paths_for(catalog.describe_id(PlatformId::Windows).unwrap());

        assert_eq!(paths.cache, PathBuf::from("/p/cache/nwjs-win-ia32.zip"));
        assert_eq!(paths.destination, PathBuf::from("/p/assets/nw/win"));
        assert_eq!(layout.resources_root(), PathBuf::from("/p/assets/nw"));
    }
}
