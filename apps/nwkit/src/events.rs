//! Event handling and progress display

use console::{style, Term};
use nwkit_events::{AppEvent, EventMessage, GeneralEvent, ProvisionEvent};

use crate::logging::log_event_with_tracing;

/// Renders pipeline events as status lines on stderr
pub struct EventHandler {
    term: Term,
    colors_enabled: bool,
    /// No status lines when stdout carries JSON
    quiet: bool,
}

impl EventHandler {
    pub fn new(colors_enabled: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            colors_enabled,
            quiet,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, message: EventMessage) {
        log_event_with_tracing(&message);

        if self.quiet {
            return;
        }

        match message.event {
            AppEvent::Provision(event) => self.handle_provision(event),
            AppEvent::General(GeneralEvent::Warning { message, context }) => {
                let line = match context {
                    Some(context) => format!("{message} ({context})"),
                    None => message,
                };
                self.show_warning(&line);
            }
            AppEvent::General(GeneralEvent::Error { message, .. }) => self.show_error(&message),
            AppEvent::General(_) => {}
        }
    }

    fn handle_provision(&self, event: ProvisionEvent) {
        match event {
            ProvisionEvent::FetchStarted { platform, url } => {
                self.show_status(&format!("{platform}: fetching {url}"));
            }
            ProvisionEvent::FetchSkipped { platform, .. } => {
                self.show_status(&format!("{platform}: using cached archive"));
            }
            ProvisionEvent::FetchCompleted { platform, bytes, .. } => {
                self.show_status(&format!("{platform}: fetched {}", format_size(bytes)));
            }
            ProvisionEvent::ExtractCompleted { platform, entries } => {
                self.show_status(&format!("{platform}: extracted {entries} files"));
            }
            ProvisionEvent::AssembleCompleted { platform, files } => {
                self.show_status(&format!("{platform}: assembled {files} files"));
            }
            ProvisionEvent::CleanupFailed {
                platform,
                path,
                error,
            } => {
                self.show_warning(&format!(
                    "{platform}: could not remove {}: {error}",
                    path.display()
                ));
            }
            ProvisionEvent::PlatformCompleted { platform, .. } => {
                self.show_success(&format!("{platform}: ready"));
            }
            ProvisionEvent::PlatformFailed {
                platform,
                stage,
                failure,
            } => {
                self.show_error(&format!("{platform}: {stage} failed: {}", failure.message));
            }
            _ => {}
        }
    }

    fn show_status(&self, message: &str) {
        let _ = self.term.write_line(message);
    }

    fn show_success(&self, message: &str) {
        if self.colors_enabled {
            let _ = self.term.write_line(&style(message).green().to_string());
        } else {
            self.show_status(message);
        }
    }

    fn show_warning(&self, message: &str) {
        let line = format!("warning: {message}");
        if self.colors_enabled {
            let _ = self.term.write_line(&style(line).yellow().to_string());
        } else {
            self.show_status(&line);
        }
    }

    fn show_error(&self, message: &str) {
        let line = format!("error: {message}");
        if self.colors_enabled {
            let _ = self.term.write_line(&style(line).red().to_string());
        } else {
            self.show_status(&line);
        }
    }
}

/// Format byte size in human readable format
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{size:.0} {}", UNITS[unit_index])
    } else {
        format!("{size:.1} {}", UNITS[unit_index])
    }
}
