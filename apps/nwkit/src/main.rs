//! nwkit - provision node-webkit runtimes into a project
//!
//! The CLI wires configuration, the platform catalog and the provisioning
//! orchestrator together, renders pipeline events while the run is in
//! flight and reports the per-platform outcome when it settles.

mod cli;
mod display;
mod error;
mod events;
mod logging;
mod setup;

use crate::cli::{Cli, Commands};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use crate::setup::ProjectSetup;
use clap::Parser;
use nwkit_config::Config;
use nwkit_events::{EventReceiver, EventSender};
use nwkit_install::{CleanupPolicy, ProvisioningOrchestrator};
use nwkit_platform::{PlatformCatalog, ProjectLayout};
use nwkit_types::{ColorChoice, OutputFormat, ProvisionReport};
use std::path::PathBuf;
use std::process;
use tokio::select;
use tracing::{error, info};

/// Exit status when at least one platform failed
const EXIT_PARTIAL_FAILURE: i32 = 2;

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => process::exit(EXIT_PARTIAL_FAILURE),
        Err(e) => {
            error!("Application error: {}", e);
            if !json_mode {
                eprintln!("Error: {e}");
            }
            process::exit(1);
        }
    }
}

/// Main application logic; `Ok(false)` means some platform failed
async fn run(cli: Cli) -> Result<bool, CliError> {
    info!("Starting nwkit v{}", env!("CARGO_PKG_VERSION"));

    let project = cli.global.project.clone();

    // Precedence: project or explicit file, then environment, then flags
    let mut config = Config::load_for_project(&project, cli.global.config.as_deref()).await?;
    config.merge_env()?;
    apply_cli_config(&mut config, &cli.global);

    let renderer = OutputRenderer::new(config.general.default_output, config.general.color);

    match cli.command {
        Commands::Platforms => {
            let catalog = PlatformCatalog::from_config(&config)?;
            let layout = ProjectLayout::from_config(&project, &config.paths);
            renderer.render_platforms(&catalog, &layout)?;
            Ok(true)
        }
        Commands::Provision { platforms, cleanup } => {
            let names = if platforms.is_empty() {
                config.platforms.default.clone()
            } else {
                platforms
            };
            if names.is_empty() {
                return Err(CliError::InvalidArguments(
                    "no platforms selected; pass --platform or set platforms.default".to_string(),
                ));
            }

            let mut orchestrator = ProvisioningOrchestrator::from_config(&config, &project)?;
            if cleanup {
                orchestrator = orchestrator.with_cleanup(CleanupPolicy::Always);
            }

            // Unknown names abort before any directory is touched
            orchestrator.catalog().resolve(&names)?;
            ProjectSetup::new(orchestrator.layout()).initialize().await?;

            let colors_enabled = match config.general.color {
                ColorChoice::Always => true,
                ColorChoice::Never => false,
                ColorChoice::Auto => console::Term::stderr().features().colors_supported(),
            };
            let quiet = config.general.default_output == OutputFormat::Json;
            let mut event_handler = EventHandler::new(colors_enabled, quiet);

            let (event_sender, event_receiver) = nwkit_events::channel();
            let report = provision_with_events(
                &orchestrator,
                &names,
                event_sender,
                event_receiver,
                &mut event_handler,
            )
            .await?;

            renderer.render_report(&report)?;

            info!(
                completed = report.completed().count(),
                failed = report.failed().count(),
                "Provisioning finished"
            );
            Ok(report.all_complete())
        }
    }
}

/// Run the orchestrator while rendering its events
async fn provision_with_events(
    orchestrator: &ProvisioningOrchestrator,
    names: &[String],
    event_sender: EventSender,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<ProvisionReport, CliError> {
    let mut provision_future = Box::pin(orchestrator.provision(names, &event_sender));

    loop {
        select! {
            result = &mut provision_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return Ok(result?);
            }

            event = event_receiver.recv() => {
                if let Some(event) = event {
                    event_handler.handle_event(event);
                }
            }
        }
    }
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if json_mode {
        // JSON mode: keep stdout clean; debug logs still go to a file
        if debug_enabled {
            if let Some(file) = create_log_file() {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
                            |_| tracing_subscriber::EnvFilter::new("info,nwkit=debug"),
                        ),
                    )
                    .init();
                return;
            }
        }
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else if debug_enabled {
        if let Some(file) = create_log_file() {
            tracing_subscriber::fmt()
                .json()
                .with_writer(file)
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,nwkit=debug")),
                )
                .init();
        } else {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,nwkit=info")),
                )
                .init();
        }
    } else {
        // Normal mode: minimal logging to stderr
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,nwkit=warn")),
            )
            .init();
    }
}

/// Open a timestamped log file under the user cache directory
fn create_log_file() -> Option<std::fs::File> {
    let log_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("nwkit")
        .join("logs");
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {e}");
        return None;
    }

    let log_file: PathBuf = log_dir.join(format!(
        "nwkit-{}.log",
        chrono::Utc::now().format("%Y%m%d-%H%M%S")
    ));
    match std::fs::File::create(&log_file) {
        Ok(file) => {
            eprintln!("Debug logging enabled: {}", log_file.display());
            Some(file)
        }
        Err(e) => {
            eprintln!("Warning: Failed to create log file: {e}");
            None
        }
    }
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &cli::GlobalArgs) {
    if let Some(color) = global.color {
        config.general.color = color;
    }
    if global.json {
        config.general.default_output = OutputFormat::Json;
    }
}
