//! addonhub - command line client for the addon registry
//!
//! Parses the command line, loads configuration, wires the operations
//! context (settings, credentials, network client, cancellation) and runs
//! the selected operation while rendering its events.

mod cli;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::{AddonCommands, Cli, Commands, GlobalArgs};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use addonhub_config::{Config, FileSettingsStore, FileTokenProvider};
use addonhub_events::EventReceiver;
use addonhub_net::{NetClient, NetConfig};
use addonhub_ops::{OperationResult, OpsContextBuilder, OpsCtx, Supervisor};
use clap::Parser;
use console::Term;
use std::path::PathBuf;
use std::process;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    let config = match load_config(&cli.global).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    // Initialize tracing with JSON awareness
    init_tracing(json_mode, cli.global.debug, config.logs_dir().ok());

    // Run the application and handle errors
    if let Err(e) = run(cli, config).await {
        error!("Application error: {}", e);
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Load configuration with proper precedence
async fn load_config(global: &GlobalArgs) -> Result<Config, CliError> {
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(global.config.as_deref()).await?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    apply_cli_config(&mut config, global);

    Ok(config)
}

/// Main application logic
async fn run(cli: Cli, config: Config) -> Result<(), CliError> {
    info!("Starting addonhub v{}", env!("CARGO_PKG_VERSION"));

    // Cancels in-flight requests and transfers on SIGTERM
    let supervisor = Supervisor::install();

    // Create event channel
    let (event_sender, event_receiver) = addonhub_events::channel();

    let data_dir = config.data_dir()?;
    let net = NetClient::new(NetConfig::from(&config.network))?;
    let ops_ctx = OpsContextBuilder::new()
        .with_net(net)
        .with_event_sender(event_sender)
        .with_config(config)
        .with_cancellation(supervisor.token())
        .with_settings(FileSettingsStore::new(&data_dir))
        .with_token_provider(FileTokenProvider::new(&data_dir))
        .build()?;

    // Results go to stderr when stdout carries the addon itself
    let to_stderr = cli
        .command
        .download_target()
        .is_some_and(|target| target.is_stdout());
    let renderer = OutputRenderer::new(
        cli.global.json,
        to_stderr,
        Term::stdout().features().colors_supported() && !to_stderr,
    );
    let mut event_handler = EventHandler::new(
        Term::stderr().features().colors_supported(),
        cli.global.debug,
        cli.global.json,
    );

    // Execute command with event handling
    let result =
        execute_command_with_events(cli.command, ops_ctx, event_receiver, &mut event_handler)
            .await?;

    // Render final result
    renderer.render_result(&result)?;

    info!("Command completed successfully");
    Ok(())
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    ops_ctx: OpsCtx,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<OperationResult, CliError> {
    let mut command_future = Box::pin(execute_command(command, ops_ctx));

    // Handle events concurrently with command execution
    loop {
        select! {
            // Command completed
            result = &mut command_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result;
            }

            // Event received
            event = event_receiver.recv() => {
                match event {
                    Some(event) => event_handler.handle_event(event),
                    None => { /* Channel closed: keep waiting for command to finish */ }
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(command: Commands, ctx: OpsCtx) -> Result<OperationResult, CliError> {
    match command {
        Commands::Addon(AddonCommands::Download { reference, target }) => {
            let target = addonhub_types::Target::from(target.as_str());
            let report = addonhub_ops::download_addon(&ctx, &reference, &target).await?;
            Ok(OperationResult::AddonDownload(report))
        }

        Commands::Switch { team } => {
            let report = addonhub_ops::switch_team(&ctx, &team).await?;
            Ok(OperationResult::TeamSwitched(report))
        }
    }
}

/// Initialize tracing/logging
///
/// Console logging always goes to stderr; stdout may be carrying addon bytes.
fn init_tracing(json_mode: bool, debug_enabled_flag: bool, log_dir: Option<PathBuf>) {
    // Check if debug logging is enabled
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if debug_enabled {
        // Debug mode: structured JSON logs to file
        if let Some(log_dir) = log_dir {
            if let Err(e) = std::fs::create_dir_all(&log_dir) {
                if !json_mode {
                    eprintln!("Warning: Failed to create log directory: {e}");
                }
            }

            let log_file = log_dir.join(format!(
                "addonhub-{}.log",
                chrono::Utc::now().format("%Y%m%d-%H%M%S")
            ));

            match std::fs::File::create(&log_file) {
                Ok(file) => {
                    tracing_subscriber::fmt()
                        .json()
                        .with_writer(file)
                        .with_env_filter(
                            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
                                |_| {
                                    tracing_subscriber::EnvFilter::new(
                                        "info,addonhub=debug,addonhub_ops=debug,addonhub_net=debug",
                                    )
                                },
                            ),
                        )
                        .init();

                    if !json_mode {
                        eprintln!("Debug logging enabled: {}", log_file.display());
                    }
                    return;
                }
                Err(e) => {
                    if !json_mode {
                        eprintln!("Warning: Failed to create log file: {e}");
                    }
                }
            }
        }
    }

    if json_mode {
        // JSON mode: suppress console logging to keep output parseable
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else {
        // Normal mode: events are rendered by EventHandler, keep tracing quiet
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
            )
            .init();
    }
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &GlobalArgs) {
    if let Some(url) = &global.api_url {
        config.api.url.clone_from(url);
    }
}
