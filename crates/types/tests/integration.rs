//! Integration tests for types

#[cfg(test)]
mod tests {
    use nwkit_errors::{Error, ProvisionError};
    use nwkit_types::*;
    use proptest::prelude::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn target() -> PlatformTarget {
        PlatformTarget::new(
            PlatformId::MacOS,
            "osx-ia32.zip",
            ArchiveFormat::Zip,
            ExtractMode::Scratch,
            Some("node-webkit.app".to_string()),
            TargetPaths {
                cache: PathBuf::from("tmp/node-webkit-osx-ia32.zip"),
                scratch: PathBuf::from("tmp/mac"),
                destination: PathBuf::from("resources/node-webkit/mac"),
            },
        )
    }

    fn happy_path() -> Vec<PipelineStatus> {
        vec![
            PipelineStatus::Fetching,
            PipelineStatus::Fetched,
            PipelineStatus::Extracting,
            PipelineStatus::Extracted,
            PipelineStatus::Assembling,
            PipelineStatus::Complete,
        ]
    }

    fn failure() -> Error {
        ProvisionError::TransferFailed {
            platform: "macos".into(),
            message: "reset".into(),
        }
        .into()
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut t = target();
        assert!(matches!(t.status(), PipelineStatus::Pending));
        for next in happy_path() {
            t.advance(next).unwrap();
        }
        assert!(matches!(t.status(), PipelineStatus::Complete));
        assert!(t.status().is_terminal());
    }

    #[test]
    fn test_skipping_a_stage_is_rejected() {
        let mut t = target();
        let err = t.advance(PipelineStatus::Extracting).unwrap_err();
        assert!(matches!(
            err,
            Error::Provision(ProvisionError::InvalidTransition { .. })
        ));
        assert!(matches!(t.status(), PipelineStatus::Pending));
    }

    #[test]
    fn test_failed_is_terminal() {
        let mut t = target();
        t.advance(PipelineStatus::Fetching).unwrap();
        t.fail(PipelineStage::Fetch, failure()).unwrap();
        assert!(t.status().is_terminal());
        assert!(t.advance(PipelineStatus::Fetched).is_err());
        assert!(t.fail(PipelineStage::Fetch, failure()).is_err());
    }

    #[test]
    fn test_extraction_dir_follows_mode() {
        let mut t = target();
        assert_eq!(t.extraction_dir(), PathBuf::from("tmp/mac"));
        t.extract_mode = ExtractMode::Destination;
        assert_eq!(t.extraction_dir(), PathBuf::from("resources/node-webkit/mac"));
    }

    #[test]
    fn test_report_partitions() {
        let report = ProvisionReport {
            outcomes: vec![
                PlatformOutcome {
                    platform: PlatformId::MacOS,
                    outcome: Outcome::Complete,
                    from_cache: true,
                    duration: Duration::ZERO,
                },
                PlatformOutcome {
                    platform: PlatformId::Linux64,
                    outcome: Outcome::Failed(FailureReason {
                        stage: PipelineStage::Extract,
                        error: failure(),
                    }),
                    from_cache: false,
                    duration: Duration::ZERO,
                },
            ],
            duration: Duration::ZERO,
        };
        assert_eq!(report.completed().count(), 1);
        assert_eq!(report.failed().count(), 1);
        assert!(!report.all_complete());
        assert!(report.get(PlatformId::Windows).is_none());
        assert_eq!(
            report.get(PlatformId::Linux64).unwrap().failure().unwrap().stage,
            PipelineStage::Extract
        );
    }

    #[test]
    fn test_platform_serialization() {
        let json = serde_json::to_string(&PlatformId::MacOS).unwrap();
        assert_eq!(json, r#""macos""#);
        let json = serde_json::to_string(&ArchiveFormat::TarGz).unwrap();
        assert_eq!(json, r#""tar_gz""#);
    }

    proptest! {
        #[test]
        fn status_never_moves_backwards(steps in proptest::collection::vec(0usize..8, 0..32)) {
            let all = {
                let mut v = vec![PipelineStatus::Pending];
                v.extend(happy_path());
                v
            };
            let mut t = target();
            let mut last_rank = 0usize;
            let mut settled = false;
            for step in steps {
                let next = if step == 7 {
                    PipelineStatus::Failed(FailureReason { stage: PipelineStage::Fetch, error: failure() })
                } else {
                    all[step].clone()
                };
                let accepted = t.advance(next).is_ok();
                if settled {
                    prop_assert!(!accepted);
                    continue;
                }
                if accepted {
                    if step == 7 {
                        settled = true;
                    } else {
                        prop_assert_eq!(step, last_rank + 1);
                        last_rank = step;
                        settled = step == 6;
                    }
                }
            }
        }
    }
}
