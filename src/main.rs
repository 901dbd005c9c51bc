#![deny(clippy::all)]
#![warn(clippy::pedantic)]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use devrelay::{supervisor, AppState, Config, DeviceRegistry, Forwarder};

/// Message relay between clients and self-registering devices.
#[derive(Parser)]
#[command(name = "devrelay", version)]
struct Cli {
    /// Path to TOML config file.
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run both HTTP APIs (default when no subcommand given).
    Serve,
    /// Load the config, validate the device list, and print a summary.
    CheckConfig,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("devrelay: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(config).await,
        Commands::CheckConfig => check_config(&config),
    }
}

fn check_config(config: &Config) -> ExitCode {
    if let Err(e) = DeviceRegistry::new(config.devices.clone()) {
        eprintln!("devrelay: {e}");
        return ExitCode::FAILURE;
    }
    println!("client API: {}", config.client_api.listen);
    println!("device API: {}", config.device_api.listen);
    println!("devices:");
    for d in &config.devices {
        println!("  {:<20} {:<16} {}", d.id, d.address, d.name);
    }
    ExitCode::SUCCESS
}

async fn run_server(config: Config) -> ExitCode {
    // Initialize tracing
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone());
    tracing_subscriber::fmt().with_env_filter(log_filter).init();

    info!("devrelay v{} starting", env!("CARGO_PKG_VERSION"));

    let registry = match DeviceRegistry::new(config.devices.clone()) {
        Ok(r) => r,
        Err(e) => {
            error!("Invalid device list: {e}");
            return ExitCode::FAILURE;
        }
    };
    let forwarder = match Forwarder::new(&config.forward) {
        Ok(f) => f,
        Err(e) => {
            error!("Failed to build HTTP client: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!("Seeded {} devices", config.devices.len());

    let state = AppState::new(config, registry, forwarder);

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        tokio::select! {
            () = supervisor::shutdown_signal() => signal_token.cancel(),
            () = signal_token.cancelled() => {}
        }
    });

    let result = supervisor::run(state, shutdown).await;
    match result {
        Ok(()) => {
            info!("Goodbye");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Relay stopped: {e}");
            ExitCode::FAILURE
        }
    }
}
