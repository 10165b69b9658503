//! tether Agent Daemon
//!
//! Keeps an authenticated session open to the server and logs the
//! application messages it receives.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tether_agent::{run_until_stopped, LoggingHandler, TcpTransport};
use tether_client::Engine;
use tether_core::config::{self, AgentConfig};
use tether_core::{ConfigError, TetherError};

#[derive(Parser)]
#[command(name = "tether-agent")]
#[command(about = "tether agent - keeps a device session open to the server")]
#[command(version)]
struct Args {
    /// Server to connect to (host:port)
    #[arg(short, long)]
    server: Option<String>,

    /// Device auth token
    #[arg(short, long, env = "TETHER_AUTH_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Run in foreground with verbose output
    #[arg(short, long)]
    foreground: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.foreground {
        "debug"
    } else {
        &args.log_level
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("tether agent starting...");

    let config = resolve_config(args).context("Can't configure the session (is an auth token set?)")?;

    tracing::info!("Connecting to {}", config.server_address);

    let shutdown = Arc::new(AtomicBool::new(false));

    // The engine blocks on socket reads, so it runs off the runtime thread
    let stop = Arc::clone(&shutdown);
    let session = tokio::task::spawn_blocking(move || {
        let tick = config.tick_interval;
        let transport = TcpTransport::from_config(&config);
        let mut engine = Engine::new(transport, LoggingHandler::new(), config.session);

        run_until_stopped(&mut engine, &stop, tick);
        engine.handler().received()
    });

    let signal = wait_for_signal().await;
    shutdown.store(true, Ordering::Relaxed);

    let received = session.await.context("Session thread panicked")?;
    signal?;
    tracing::info!("tether agent stopped ({} messages received)", received);
    Ok(())
}

/// Load the config file and apply command-line overrides
fn resolve_config(args: Args) -> Result<AgentConfig, TetherError> {
    let config_path = args.config.unwrap_or_else(config::default_config_path);

    let mut config = match config::load_config(&config_path) {
        Ok(config) => config,
        Err(ConfigError::NotFound(path)) => {
            tracing::debug!("No config at {:?}, using defaults", path);
            AgentConfig::default()
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(server) = args.server {
        config.server_address = server;
    }
    if let Some(token) = args.token {
        config.session.auth_token = token;
    }
    config.session.validate()?;
    Ok(config)
}

/// Wait for Ctrl+C or, on unix, SIGTERM
async fn wait_for_signal() -> Result<()> {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    let mut terminate =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?;
    #[cfg(unix)]
    let terminate = terminate.recv();

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Option<()>>();

    tokio::select! {
        result = ctrl_c => {
            result.context("Failed to listen for Ctrl+C")?;
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
    Ok(())
}
