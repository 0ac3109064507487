//! Integration tests for error types

#[cfg(test)]
mod tests {
    use nwkit_errors::*;

    #[test]
    fn test_error_conversion() {
        let err: Error = ProvisionError::TransferFailed {
            platform: "macos".into(),
            message: "connection reset".into(),
        }
        .into();
        assert!(matches!(err, Error::Provision(_)));
        assert!(err.as_provision().is_some());
    }

    #[test]
    fn test_error_display() {
        let err = ProvisionError::NotImplemented {
            platform: "linux64".into(),
            format: "tar.gz".into(),
        };
        assert_eq!(
            err.to_string(),
            "tar.gz extraction is not implemented (platform linux64)"
        );
    }

    #[test]
    fn test_isolation_classification() {
        let unknown = ProvisionError::UnknownPlatform {
            name: "beos".into(),
        };
        let content = ProvisionError::UnexpectedContentType {
            platform: "windows".into(),
            expected: "application/zip".into(),
            actual: "text/html".into(),
        };
        assert!(!unknown.is_isolated());
        assert!(content.is_isolated());
    }

    #[test]
    fn test_user_facing_codes() {
        let err: Error = ProvisionError::UnknownPlatform {
            name: "beos".into(),
        }
        .into();
        assert_eq!(err.user_code(), Some("provision.unknown_platform"));
        assert!(err.user_hint().is_some());
        assert!(!err.is_retryable());

        let transfer: Error = ProvisionError::TransferFailed {
            platform: "macos".into(),
            message: "eof".into(),
        }
        .into();
        assert!(transfer.is_retryable());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "test");
        let storage_err: StorageError = io_err.into();
        assert!(matches!(storage_err, StorageError::IoError { .. }));

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "test");
        let with_path = StorageError::from_io_with_path(&io_err, std::path::Path::new("/tmp/x"));
        assert!(matches!(with_path, StorageError::PermissionDenied { .. }));
    }
}
