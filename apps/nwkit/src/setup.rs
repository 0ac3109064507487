//! Project setup and initialization

use crate::error::CliError;
use nwkit_platform::{fs, ProjectLayout};
use tracing::{debug, info};

/// Prepares a project's directory tree before provisioning
pub struct ProjectSetup<'a> {
    layout: &'a ProjectLayout,
}

impl<'a> ProjectSetup<'a> {
    pub fn new(layout: &'a ProjectLayout) -> Self {
        Self { layout }
    }

    /// Check the project root and create the cache and resources directories
    pub async fn initialize(&self) -> Result<(), CliError> {
        let root = self.layout.root();
        info!(root = %root.display(), "Initializing project layout");

        match tokio::fs::metadata(root).await {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => {
                return Err(CliError::Setup(format!(
                    "{} is not a directory",
                    root.display()
                )))
            }
            Err(e) => {
                return Err(CliError::Setup(format!(
                    "project directory {} is not accessible: {e}",
                    root.display()
                )))
            }
        }

        for dir in [self.layout.cache_root(), self.layout.resources_root()] {
            debug!(path = %dir.display(), "Ensuring directory");
            fs::create_dir_all(&dir).await?;
        }

        Ok(())
    }
}
