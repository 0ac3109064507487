//! Output rendering and formatting

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use console::Term;
use nwkit_events::FailureContext;
use nwkit_platform::{PlatformCatalog, ProjectLayout};
use nwkit_types::{ColorChoice, ExtractMode, OutputFormat, PlatformOutcome, ProvisionReport};
use serde_json::json;
use std::io;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    format: OutputFormat,
    color_choice: ColorChoice,
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(format: OutputFormat, color_choice: ColorChoice) -> Self {
        Self {
            format,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render the outcome of a provisioning run
    pub fn render_report(&self, report: &ProvisionReport) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return print_json(&report_json(report));
        }

        if report.is_empty() {
            println!("No platforms selected.");
            return Ok(());
        }

        let mut table = self.table();
        table.set_header(vec![
            Cell::new("Platform").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Source").add_attribute(Attribute::Bold),
            Cell::new("Time").add_attribute(Attribute::Bold),
            Cell::new("Details").add_attribute(Attribute::Bold),
        ]);

        for outcome in &report.outcomes {
            let (status, details) = match outcome.failure() {
                None => (self.status_cell("complete", Color::Green), String::new()),
                Some(reason) => (
                    self.status_cell(&format!("failed ({})", reason.stage), Color::Red),
                    reason.error.to_string(),
                ),
            };
            table.add_row(vec![
                Cell::new(outcome.platform),
                status,
                Cell::new(if outcome.from_cache { "cache" } else { "remote" }),
                Cell::new(format!("{}ms", outcome.duration.as_millis())),
                Cell::new(details),
            ]);
        }

        println!("{table}");
        println!(
            "{} of {} platforms provisioned in {}ms",
            report.completed().count(),
            report.outcomes.len(),
            report.duration.as_millis()
        );
        Ok(())
    }

    /// Render the platform catalog as seen from a project
    pub fn render_platforms(
        &self,
        catalog: &PlatformCatalog,
        layout: &ProjectLayout,
    ) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            let platforms: Vec<_> = catalog
                .specs()
                .iter()
                .map(|spec| {
                    let paths = layout.paths_for(spec);
                    json!({
                        "platform": spec.id,
                        "suffix": spec.suffix,
                        "format": spec.format,
                        "extract_mode": spec.extract_mode,
                        "bundle": spec.bundle,
                        "cache_path": paths.cache,
                        "destination": paths.destination,
                    })
                })
                .collect();
            return print_json(&json!({ "platforms": platforms }));
        }

        let mut table = self.table();
        table.set_header(vec![
            Cell::new("Platform").add_attribute(Attribute::Bold),
            Cell::new("Archive").add_attribute(Attribute::Bold),
            Cell::new("Format").add_attribute(Attribute::Bold),
            Cell::new("Destination").add_attribute(Attribute::Bold),
        ]);

        for spec in catalog.specs() {
            let paths = layout.paths_for(spec);
            let destination = match (spec.extract_mode, &spec.bundle) {
                (ExtractMode::Scratch, Some(bundle)) => paths.destination.join(bundle),
                _ => paths.destination,
            };
            table.add_row(vec![
                Cell::new(spec.id),
                Cell::new(&spec.suffix),
                Cell::new(spec.format),
                Cell::new(destination.display()),
            ]);
        }

        println!("{table}");
        Ok(())
    }

    fn table(&self) -> Table {
        let mut table = Table::new();
        match self.format {
            OutputFormat::Plain => table.load_preset(presets::NOTHING),
            _ => table.load_preset(presets::UTF8_FULL),
        };
        table.set_content_arrangement(ContentArrangement::Dynamic);
        if !self.supports_color() {
            table.force_no_tty();
        }
        table
    }

    fn status_cell(&self, text: &str, color: Color) -> Cell {
        let cell = Cell::new(text);
        if self.supports_color() {
            cell.fg(color)
        } else {
            cell
        }
    }

    /// Check if color output is supported
    fn supports_color(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}

fn print_json(value: &serde_json::Value) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    println!("{json}");
    Ok(())
}

fn outcome_json(outcome: &PlatformOutcome) -> serde_json::Value {
    let failure = outcome.failure();
    json!({
        "platform": outcome.platform,
        "status": if failure.is_some() { "failed" } else { "complete" },
        "stage": failure.map(|reason| reason.stage),
        "error": failure.map(|reason| FailureContext::from_error(&reason.error)),
        "from_cache": outcome.from_cache,
        "duration_ms": outcome.duration.as_millis(),
    })
}

fn report_json(report: &ProvisionReport) -> serde_json::Value {
    json!({
        "complete": report.all_complete(),
        "duration_ms": report.duration.as_millis(),
        "platforms": report.outcomes.iter().map(outcome_json).collect::<Vec<_>>(),
    })
}
