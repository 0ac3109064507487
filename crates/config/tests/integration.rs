//! Integration tests for config

#[cfg(test)]
mod tests {
    use nwkit_config::*;
    use nwkit_types::{ColorChoice, OutputFormat};
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_VARS: &[&str] = &[
        "NWKIT_OUTPUT",
        "NWKIT_COLOR",
        "NWKIT_BASE_URL",
        "NWKIT_NAMESPACE",
        "NWKIT_TIMEOUT",
        "NWKIT_VERIFY_CACHE",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.remote.base_url, constants::DEFAULT_BASE_URL);
        assert!(config.remote.content_type.is_none());
        assert_eq!(config.paths.cache_dir, "tmp");
        assert_eq!(config.paths.resources_dir, "resources");
        assert_eq!(config.paths.namespace, "node-webkit");
        assert_eq!(config.platforms.default, vec!["macos", "linux64", "windows"]);
        assert!(config.platforms.cleanup.is_empty());
        assert!(!config.cache.verify);
        assert_eq!(config.network.timeout, 300);
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[general]
default_output = "plain"
color = "never"

[remote]
base_url = "http://mirror.local/nw-"
content_type = "application/octet-stream"

[network]
chunk_timeout = 5

[paths]
namespace = "runtime"

[cache]
verify = true

[platforms]
default = ["windows"]
cleanup = ["macos"]

[platforms.overrides.macos]
bundle = "nwjs.app"
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.general.default_output, OutputFormat::Plain);
        assert_eq!(config.general.color, ColorChoice::Never);
        assert_eq!(config.remote.base_url, "http://mirror.local/nw-");
        assert_eq!(
            config.remote.content_type.as_deref(),
            Some("application/octet-stream")
        );
        assert_eq!(config.network.chunk_timeout, 5);
        assert_eq!(config.network.timeout, 300);
        assert_eq!(config.paths.namespace, "runtime");
        assert_eq!(config.paths.cache_dir, "tmp");
        assert!(config.cache.verify);
        assert_eq!(config.platforms.default, vec!["windows"]);
        assert_eq!(config.platforms.cleanup, vec!["macos"]);
        assert_eq!(
            config.platforms.overrides["macos"].bundle.as_deref(),
            Some("nwjs.app")
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from_file(&dir.path().join("absent.toml"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            nwkit_errors::Error::Config(nwkit_errors::ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn test_parse_error() {
        let err = Config::parse("[network]\ntimeout = \"soon\"").unwrap_err();
        assert!(matches!(
            err,
            nwkit_errors::Error::Config(nwkit_errors::ConfigError::ParseError { .. })
        ));
    }

    #[tokio::test]
    async fn test_project_config_preferred() {
        let project = tempfile::tempdir().unwrap();
        std::fs::write(
            project.path().join("nwkit.toml"),
            "[paths]\nresources_dir = \"assets\"\n",
        )
        .unwrap();

        let config = Config::load_for_project(project.path(), None).await.unwrap();
        assert_eq!(config.paths.resources_dir, "assets");

        let mut explicit = NamedTempFile::new().unwrap();
        writeln!(explicit, "[paths]\nresources_dir = \"other\"").unwrap();
        let config = Config::load_for_project(project.path(), Some(explicit.path()))
            .await
            .unwrap();
        assert_eq!(config.paths.resources_dir, "other");
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("NWKIT_OUTPUT", "json");
        std::env::set_var("NWKIT_COLOR", "always");
        std::env::set_var("NWKIT_BASE_URL", "http://127.0.0.1:9/nw-");
        std::env::set_var("NWKIT_TIMEOUT", "12");
        std::env::set_var("NWKIT_VERIFY_CACHE", "yes");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.general.default_output, OutputFormat::Json);
        assert_eq!(config.general.color, ColorChoice::Always);
        assert_eq!(config.remote.base_url, "http://127.0.0.1:9/nw-");
        assert_eq!(config.network.timeout, 12);
        assert!(config.cache.verify);

        clear_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("NWKIT_TIMEOUT", "forever");
        let mut config = Config::default();
        assert!(config.merge_env().is_err());
        clear_env();

        std::env::set_var("NWKIT_NAMESPACE", "a/b");
        let mut config = Config::default();
        assert!(config.merge_env().is_err());
        clear_env();
    }
}
