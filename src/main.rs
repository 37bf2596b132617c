//! Menu service binary.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ access log ─▶ timeout ─▶ router
//!                                   (span, status,            │
//!                                    duration)                ▼
//!                                                   ┌──────────────────┐
//!                                                   │ handlers         │
//!                                                   │  /health         │
//!                                                   │  /api/menu       │──▶ MenuService
//!                                                   │  /api/menu/{id}  │    (catalog +
//!                                                   └──────────────────┘     fault injector)
//!     ◀────────────── JSON response (or plain-text 500 fallback)
//! ```

use std::path::PathBuf;

use clap::Parser;
use menu_service::config::{load_config, validate_config, ConfigError, ServiceConfig};
use menu_service::http::{bind_listener, MenuServer};
use menu_service::lifecycle::{wait_for_signal, Shutdown};
use menu_service::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "menu-service")]
#[command(about = "Mock restaurant menu API with injected failures", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability)?;

    tracing::info!("menu-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        config_file = ?args.config,
        tracing_enabled = config.observability.tracing_enabled,
        metrics_enabled = config.observability.metrics_enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = bind_listener(&config.listener).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = MenuServer::new(config);
    let server_task = tokio::spawn(server.run(listener, server_shutdown));

    match wait_for_signal().await {
        Ok(_) => {}
        Err(e) => tracing::error!(error = %e, "Failed to install signal handlers, shutting down"),
    }
    shutdown.trigger();

    server_task.await??;

    tracing::info!("Server exited gracefully");
    Ok(())
}
