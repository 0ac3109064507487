//! Integration tests for events

#[cfg(test)]
mod tests {
    use nwkit_events::*;
    use nwkit_types::{PipelineStage, PlatformId};

    #[tokio::test]
    async fn test_event_emitter() {
        let (tx, mut rx) = channel();

        tx.emit_error("test error");
        tx.emit_debug("test debug");

        let first = rx.recv().await.unwrap();
        assert!(matches!(
            first.event,
            AppEvent::General(GeneralEvent::Error { .. })
        ));
        assert_eq!(first.meta.level, EventLevel::Error);

        let second = rx.recv().await.unwrap();
        assert!(matches!(
            second.event,
            AppEvent::General(GeneralEvent::DebugLog { .. })
        ));
    }

    #[tokio::test]
    async fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when receiver is dropped
        tx.emit_warning("ignored");
    }

    #[tokio::test]
    async fn test_provision_events_carry_platform_correlation() {
        let (tx, mut rx) = channel();

        tx.emit_provision(ProvisionEvent::FetchStarted {
            platform: PlatformId::Windows,
            url: "https://example.com/win-ia32.zip".into(),
        });
        tx.emit_provision(ProvisionEvent::BatchStarted {
            platforms: vec![PlatformId::Windows],
        });

        let fetch = rx.recv().await.unwrap();
        assert_eq!(fetch.meta.platform, Some(PlatformId::Windows));
        assert_eq!(fetch.meta.source, EventSource::Fetch);

        let batch = rx.recv().await.unwrap();
        assert!(batch.meta.platform.is_none());
        assert_eq!(batch.meta.source, EventSource::Provision);
    }

    #[test]
    fn test_failure_event_is_error_level() {
        let event = AppEvent::Provision(ProvisionEvent::PlatformFailed {
            platform: PlatformId::Linux64,
            stage: PipelineStage::Extract,
            failure: FailureContext::new(
                Some("provision.not_implemented"),
                "tar.gz extraction is not implemented",
                None::<String>,
                false,
            ),
        });
        assert_eq!(event.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_event_serialization() {
        let event = AppEvent::Provision(ProvisionEvent::AssembleSkipped {
            platform: PlatformId::Windows,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["domain"], "provision");
        assert_eq!(json["event"]["type"], "AssembleSkipped");
        assert_eq!(json["event"]["platform"], "windows");
    }

    #[test]
    fn test_message_meta_serialization() {
        let message = EventMessage::new(AppEvent::Provision(ProvisionEvent::ExtractStarted {
            platform: PlatformId::MacOS,
            format: nwkit_types::ArchiveFormat::Zip,
            into: "tmp/mac".into(),
        }));
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["meta"]["source"], "extract");
        assert_eq!(json["meta"]["platform"], "macos");
        assert_eq!(json["meta"]["level"], "info");

        let general = EventMessage::new(AppEvent::General(GeneralEvent::debug("scan")));
        let json = serde_json::to_value(&general).unwrap();
        assert_eq!(json["meta"]["source"], "general");
        assert!(json["meta"].get("platform").is_none());
    }
}
