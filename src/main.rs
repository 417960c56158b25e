//! edge-gate: denylist-enforcing edge filter for the auction demo.
//!
//! ```text
//!                    ┌───────────────────────────────┐
//!  client ──────────►│ trace ─ request-id ─ timeout  │
//!                    │            │                  │
//!                    │        gate middleware        │
//!                    │   (identity ► denylist ► …)   │
//!                    │       │            │          │
//!                    │   app routes   /internal      │
//!                    └───────────────────────────────┘
//!                         sweeper ⟳ denylist store
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use edge_gate::config::load_config;
use edge_gate::lifecycle::Shutdown;
use edge_gate::observability::{install_recorder, PrometheusMetrics};
use edge_gate::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edge_gate=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("edge-gate v{} starting", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = load_config(config_path.as_deref())?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        sweep_interval_secs = config.denylist.sweep_interval_secs,
        exempt_paths = ?config.gate.exempt_paths,
        "Configuration loaded"
    );

    let prometheus = install_recorder()?;
    let metrics = Arc::new(PrometheusMetrics);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.listen_for_ctrl_c();

    let server = HttpServer::new(config, metrics, prometheus);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
