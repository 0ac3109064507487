//! Integration tests for hash crate

#[cfg(test)]
mod tests {
    use nwkit_hash::*;
    use tempfile::tempdir;

    #[test]
    fn test_hex_round_trip() {
        let hash = Hash::from_data(b"runtime archive");
        let parsed = Hash::from_hex(&hash.to_hex()).unwrap();
        assert_eq!(hash, parsed);
        assert!(Hash::from_hex("abcd").is_err());
        assert!(Hash::from_hex("not hex").is_err());
    }

    #[test]
    fn test_stream_hasher_matches_one_shot() {
        let mut hasher = StreamHasher::new();
        hasher.update(b"node-");
        hasher.update(b"webkit");
        assert_eq!(hasher.size(), 11);
        assert_eq!(hasher.finalize(), Hash::from_data(b"node-webkit"));
    }

    #[tokio::test]
    async fn test_hash_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("archive.zip");
        tokio::fs::write(&path, b"zip bytes").await.unwrap();

        let (hash, size) = Hash::hash_file(&path).await.unwrap();
        assert_eq!(hash, Hash::from_data(b"zip bytes"));
        assert_eq!(size, 9);

        assert!(Hash::hash_file(&temp.path().join("missing")).await.is_err());
    }

    #[test]
    fn test_serde_as_hex() {
        let hash = Hash::from_data(b"x");
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", hash.to_hex()));
        let back: Hash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }
}
