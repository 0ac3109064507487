//! Structured logging integration for events
//!
//! Converts provisioning events into tracing records with structured fields.

use nwkit_events::{AppEvent, EventMessage, GeneralEvent, ProvisionEvent};
use tracing::{debug, error, info, trace, warn};

/// Log an `AppEvent` using the tracing infrastructure with structured fields
pub fn log_event_with_tracing(message: &EventMessage) {
    let meta = &message.meta;

    match &message.event {
        AppEvent::Provision(event) => match event {
            ProvisionEvent::BatchStarted { platforms } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    platforms = ?platforms,
                    "Provisioning started"
                );
            }
            ProvisionEvent::BatchCompleted {
                completed,
                failed,
                duration,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    completed = ?completed,
                    failed = ?failed,
                    duration_ms = duration.as_millis(),
                    "Provisioning finished"
                );
            }
            ProvisionEvent::FetchStarted { platform, url } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    platform = %platform,
                    url = %url,
                    "Fetch started"
                );
            }
            ProvisionEvent::FetchSkipped {
                platform,
                cache_path,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    platform = %platform,
                    cache_path = %cache_path.display(),
                    "Archive already cached"
                );
            }
            ProvisionEvent::FetchProgress {
                platform,
                bytes,
                total,
            } => {
                trace!(
                    source = meta.source.as_str(),
                    platform = %platform,
                    bytes = bytes,
                    total = ?total,
                    "Fetch progress"
                );
            }
            ProvisionEvent::FetchCompleted {
                platform,
                bytes,
                hash,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    platform = %platform,
                    bytes = bytes,
                    blake3 = %hash,
                    "Fetch completed"
                );
            }
            ProvisionEvent::ExtractStarted {
                platform,
                format,
                into,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    platform = %platform,
                    format = %format,
                    into = %into.display(),
                    "Extraction started"
                );
            }
            ProvisionEvent::ExtractCompleted { platform, entries } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    platform = %platform,
                    entries = entries,
                    "Extraction completed"
                );
            }
            ProvisionEvent::AssembleStarted {
                platform,
                destination,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    platform = %platform,
                    destination = %destination.display(),
                    "Assembly started"
                );
            }
            ProvisionEvent::AssembleSkipped { platform } => {
                debug!(
                    source = meta.source.as_str(),
                    platform = %platform,
                    "Assembly not needed"
                );
            }
            ProvisionEvent::AssembleCompleted { platform, files } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    platform = %platform,
                    files = files,
                    "Assembly completed"
                );
            }
            ProvisionEvent::CleanupCompleted { platform } => {
                info!(
                    source = meta.source.as_str(),
                    platform = %platform,
                    "Cleanup completed"
                );
            }
            ProvisionEvent::CleanupFailed {
                platform,
                path,
                error,
            } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    platform = %platform,
                    path = %path.display(),
                    error = %error,
                    "Cleanup failed"
                );
            }
            ProvisionEvent::PlatformCompleted {
                platform,
                from_cache,
                duration,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    platform = %platform,
                    from_cache = from_cache,
                    duration_ms = duration.as_millis(),
                    "Platform provisioned"
                );
            }
            ProvisionEvent::PlatformFailed {
                platform,
                stage,
                failure,
            } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    platform = %platform,
                    stage = %stage,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Platform failed"
                );
            }
        },

        AppEvent::General(general_event) => match general_event {
            GeneralEvent::Warning { message, context } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    context = ?context,
                    "{message}"
                );
            }
            GeneralEvent::Error { message, details } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    details = ?details,
                    "{message}"
                );
            }
            _ => match meta.tracing_level() {
                tracing::Level::ERROR => {
                    error!(source = meta.source.as_str(), event_id = %meta.event_id, event = ?general_event, "General event");
                }
                tracing::Level::WARN => {
                    warn!(source = meta.source.as_str(), event_id = %meta.event_id, event = ?general_event, "General event");
                }
                tracing::Level::INFO => {
                    info!(source = meta.source.as_str(), event_id = %meta.event_id, event = ?general_event, "General event");
                }
                tracing::Level::DEBUG => {
                    debug!(source = meta.source.as_str(), event_id = %meta.event_id, event = ?general_event, "General event");
                }
                _ => {
                    trace!(source = meta.source.as_str(), event_id = %meta.event_id, event = ?general_event, "General event");
                }
            },
        },
    }
}
