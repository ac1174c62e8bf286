//! vlcbridge Server - headless remote control bridge for VLC.
//!
//! This binary resolves the platform-specific player and shutdown commands,
//! then serves the relay until interrupted. On Ctrl+C or SIGTERM the listener
//! is dropped and the player is asked to terminate before the process exits
//! so it is not orphaned.

mod config;
mod platform;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use vlcbridge_core::{bind_listener, bootstrap_services, start_server, CommandLine, HostCommands};

use crate::config::ServerConfig;
use crate::platform::Platform;

/// vlcbridge Server - Relays remote control requests to a supervised VLC player.
#[derive(Parser, Debug)]
#[command(name = "vlcbridge-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (YAML).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(short, long, default_value = "info", env = "VLCBRIDGE_LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// Bind host (overrides config file). Empty binds all interfaces.
    #[arg(short = 'b', long)]
    bind_host: Option<String>,

    /// Bind port (overrides config file).
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Player control API port (overrides config file).
    #[arg(long)]
    control_port: Option<u16>,

    /// Player executable (overrides config file and auto-detection).
    #[arg(long, value_name = "PATH")]
    player: Option<PathBuf>,

    /// Host shutdown command (overrides config file and auto-detection).
    #[arg(long, value_name = "COMMAND")]
    shutdown_command: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(args.log_level)
        .format_timestamp_millis()
        .init();

    log::info!("vlcbridge Server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config =
        ServerConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    // Apply CLI overrides
    if let Some(host) = args.bind_host {
        config.bind_host = host;
    }
    if let Some(port) = args.port {
        config.bind_port = port;
    }
    if let Some(port) = args.control_port {
        config.control_port = port;
    }
    if let Some(player) = args.player {
        config.player_executable = Some(player);
    }
    if let Some(command) = args.shutdown_command {
        config.shutdown_command = Some(command);
    }

    log::info!(
        "Configuration: bind={}:{}, control_port={}, streaming_port={:?}",
        if config.bind_host.is_empty() { "*" } else { config.bind_host.as_str() },
        config.bind_port,
        config.control_port,
        config.streaming_port
    );

    // Resolve platform commands once
    let platform = Platform::current();
    let executable =
        platform::resolve_player_executable(platform, config.player_executable.as_deref());
    let version = platform::probe_player_version(&executable).await;
    log::info!("Player: {} (version {})", executable.display(), version);

    let launch_command = CommandLine::new(
        executable,
        platform::player_arguments(platform, config.control_port, config.streaming_port),
    );
    let shutdown_command =
        platform::resolve_shutdown_command(platform, config.shutdown_command.as_deref())
            .context("Failed to resolve host shutdown command")?;
    log::info!("Host shutdown command: {}", shutdown_command);

    // Bootstrap services
    let services = bootstrap_services(
        &config.to_core_config(),
        HostCommands {
            launch_command,
            shutdown_command,
        },
    )
    .context("Failed to bootstrap services")?;

    let listener = bind_listener(&services.address)
        .await
        .context("Failed to bind HTTP listener")?;

    // Spawn HTTP server on the main tokio runtime.
    let app_state = services.app_state();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(app_state, listener).await {
            log::error!("Server error: {}", e);
        }
    });

    log::info!("HTTP server started on port {}", config.bind_port);

    // Wait for shutdown signal
    shutdown_signal().await;

    log::info!("Shutdown signal received, cleaning up...");

    // Stop accepting first, then close the supervisor so requests still in
    // flight cannot relaunch the player.
    server_handle.abort();
    services.shutdown().await;

    log::info!("Shutdown complete");
    Ok(())
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
