//! Edge gate server.
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!     Client Request      │                 EDGE GATE                     │
//!     ────────────────────┼─▶ bypass? ──yes──────────────────────┐        │
//!                         │     │ no                             │        │
//!                         │     ▼                                │        │
//!                         │  classify → gate ──redirect──▶ 307   │        │
//!                         │                │ allow               │        │
//!                         │                ▼                     ▼        │
//!                         │          edition rewrite → locale → forward ──┼──▶ Renderer
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use edge_gate::config::{self, ConfigError, EdgeConfig};
use edge_gate::lifecycle::signals::spawn_signal_handler;
use edge_gate::observability::{logging, metrics};
use edge_gate::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "edge-gate")]
#[command(about = "Edge request gate: auth redirects, edition rewrites, locale headers")]
struct Args {
    /// TOML configuration file. Built-in defaults when omitted.
    #[arg(short, long, env = "EDGE_GATE_CONFIG")]
    config: Option<PathBuf>,
}

fn load(args: &Args) -> Result<EdgeConfig, ConfigError> {
    match &args.config {
        Some(path) => config::load_config(path),
        None => config::loader::load_defaults(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load(&args)?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("edge-gate v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        edition_enabled = config.edition.paid_enterprise_features_enabled,
        locales = ?config.locale.supported,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
