//! Integration tests for the platform catalog

#[cfg(test)]
mod tests {
    use nwkit_platform::*;
    use nwkit_types::{ExtractMode, PipelineStatus, PlatformId};
    use std::path::PathBuf;

    #[test]
    fn test_every_default_target_is_pending_and_distinct() {
        let catalog = PlatformCatalog::defaults();
        let layout = ProjectLayout::new("/proj");

        let targets: Vec<_> = PlatformId::ALL
            .into_iter()
            .map(|id| catalog.target(id, &layout).unwrap())
            .collect();

        for target in &targets {
            assert!(matches!(target.status(), PipelineStatus::Pending));
        }

        let mut caches: Vec<_> = targets.iter().map(|t| t.cache_path.clone()).collect();
        caches.sort();
        caches.dedup();
        assert_eq!(caches.len(), targets.len());

        let mut destinations: Vec<_> = targets.iter().map(|t| t.destination_path.clone()).collect();
        destinations.sort();
        destinations.dedup();
        assert_eq!(destinations.len(), targets.len());
    }

    #[test]
    fn test_windows_extracts_into_destination() {
        let catalog = PlatformCatalog::defaults();
        let target = catalog
            .target(PlatformId::Windows, &ProjectLayout::new("/proj"))
            .unwrap();
        assert_eq!(target.extract_mode, ExtractMode::Destination);
        assert_eq!(
            target.extraction_dir(),
            PathBuf::from("/proj/resources/node-webkit/win")
        );
    }

    #[test]
    fn test_linux_cache_path() {
        let catalog = PlatformCatalog::defaults();
        let target = catalog
            .target(PlatformId::Linux32, &ProjectLayout::new("/proj"))
            .unwrap();
        assert_eq!(
            target.cache_path,
            PathBuf::from("/proj/tmp/node-webkit-linux-ia32.tar.gz")
        );
        assert_eq!(target.extraction_dir(), PathBuf::from("/proj/tmp/linux32"));
    }

    #[test]
    fn test_empty_selection() {
        let catalog = PlatformCatalog::defaults();
        let none: [&str; 0] = [];
        assert!(catalog.resolve(&none).unwrap().is_empty());
    }
}
