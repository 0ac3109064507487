//! Integration tests for the artifact cache

#[cfg(test)]
mod tests {
    use nwkit_hash::Hash;
    use nwkit_platform::{PlatformCatalog, ProjectLayout};
    use nwkit_store::*;
    use nwkit_types::{PlatformId, PlatformTarget};
    use tempfile::TempDir;

    fn target(dir: &TempDir, id: PlatformId) -> PlatformTarget {
        PlatformCatalog::defaults()
            .target(id, &ProjectLayout::new(dir.path()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_commit_makes_artifact_cached() {
        let dir = TempDir::new().unwrap();
        let target = target(&dir, PlatformId::Windows);
        let cache = ArtifactCache::default();

        assert!(!cache.is_cached(&target).await);

        let mut writer = cache.writer(&target).await.unwrap();
        writer.append(b"PK\x03\x04").await.unwrap();
        writer.append(b"rest-of-archive").await.unwrap();
        assert!(!cache.is_cached(&target).await);
        assert!(staging_path(&target.cache_path).exists());

        let entry = writer.commit().await.unwrap();
        assert_eq!(entry.size, 19);
        assert_eq!(entry.blake3, Hash::from_data(b"PK\x03\x04rest-of-archive"));

        assert!(cache.is_cached(&target).await);
        assert!(!staging_path(&target.cache_path).exists());
        assert_eq!(cache.entry(&target).await.unwrap(), Some(entry));
    }

    #[tokio::test]
    async fn test_uncommitted_writer_leaves_no_cache_file() {
        let dir = TempDir::new().unwrap();
        let target = target(&dir, PlatformId::MacOS);
        let cache = ArtifactCache::default();

        let mut writer = cache.writer(&target).await.unwrap();
        writer.append(b"partial").await.unwrap();
        drop(writer);

        assert!(!target.cache_path.exists());
        assert!(!cache.is_cached(&target).await);
    }

    #[tokio::test]
    async fn test_discard_removes_staging() {
        let dir = TempDir::new().unwrap();
        let target = target(&dir, PlatformId::MacOS);
        let cache = ArtifactCache::default();

        let mut writer = cache.writer(&target).await.unwrap();
        writer.append(b"partial").await.unwrap();
        writer.discard().await.unwrap();

        assert!(!staging_path(&target.cache_path).exists());
        assert!(!target.cache_path.exists());
    }

    #[tokio::test]
    async fn test_presence_policy_ignores_entry() {
        let dir = TempDir::new().unwrap();
        let target = target(&dir, PlatformId::Linux64);
        std::fs::create_dir_all(target.cache_path.parent().unwrap()).unwrap();
        std::fs::write(&target.cache_path, b"placed by hand").unwrap();

        assert!(ArtifactCache::new(CachePolicy::Presence)
            .is_cached(&target)
            .await);
        assert!(!ArtifactCache::new(CachePolicy::Verified)
            .is_cached(&target)
            .await);
    }

    #[tokio::test]
    async fn test_verified_policy_detects_tampering() {
        let dir = TempDir::new().unwrap();
        let target = target(&dir, PlatformId::Windows);
        let cache = ArtifactCache::new(CachePolicy::Verified);

        let mut writer = cache.writer(&target).await.unwrap();
        writer.append(b"original bytes").await.unwrap();
        writer.commit().await.unwrap();
        assert!(cache.is_cached(&target).await);

        std::fs::write(&target.cache_path, b"original bytez").unwrap();
        assert!(!cache.is_cached(&target).await);
    }

    #[tokio::test]
    async fn test_evict() {
        let dir = TempDir::new().unwrap();
        let target = target(&dir, PlatformId::Windows);
        let cache = ArtifactCache::default();

        let mut writer = cache.writer(&target).await.unwrap();
        writer.append(b"bytes").await.unwrap();
        writer.commit().await.unwrap();

        cache.evict(&target).await.unwrap();
        assert!(!target.cache_path.exists());
        assert!(!entry_path(&target.cache_path).exists());
        assert!(!cache.is_cached(&target).await);

        // evicting twice is fine
        cache.evict(&target).await.unwrap();
    }
}
