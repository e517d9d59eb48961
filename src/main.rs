//! tenant-gateway (v1)
//!
//! Edge dispatch gateway built with Tokio and Axum. Fronts every inbound
//! request to a multi-tenant document-sharing service and decides, before
//! any business logic runs, which handling lane the request belongs to.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────────┐
//!                          │                 TENANT GATEWAY                    │
//!                          │                                                   │
//!     Client Request       │  ┌─────────┐    ┌──────────────┐                 │
//!     ─────────────────────┼─▶│  http   │───▶│   routing    │                 │
//!                          │  │ server  │    │  dispatcher  │                 │
//!                          │  └─────────┘    └──────┬───────┘                 │
//!                          │                        │ lane                    │
//!                          │        ┌───────────┬───┴───────┬───────────┐     │
//!                          │        ▼           ▼           ▼           ▼     │
//!                          │   analytics    webhooks     domains      app     │
//!                          │    upstream    upstream    upstream    upstream  │
//!                          │                                                   │
//!                          │  ┌─────────────────────────────────────────────┐ │
//!                          │  │           Cross-Cutting Concerns             │ │
//!                          │  │  ┌─────────┐ ┌───────────┐ ┌─────────────┐  │ │
//!                          │  │  │ config  │ │observa-   │ │  admin API  │  │ │
//!                          │  │  │ +reload │ │ bility    │ │  + CLI      │  │ │
//!                          │  │  └─────────┘ └───────────┘ └─────────────┘  │ │
//!                          │  └─────────────────────────────────────────────┘ │
//!                          └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use tenant_gateway::config::loader::{apply_env_overrides, load_config};
use tenant_gateway::config::watcher::ConfigWatcher;
use tenant_gateway::config::GatewayConfig;
use tenant_gateway::http::HttpServer;
use tenant_gateway::lifecycle::Shutdown;
use tenant_gateway::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional config file path as the only positional argument.
    let config_path = std::env::args().nth(1).map(PathBuf::from);

    let mut config = match &config_path {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    apply_env_overrides(&mut config);

    logging::init_logging(&config.observability);

    tracing::info!("tenant-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        mode = ?config.mode,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Initialize metrics server
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Hot reload: watch the config file when one was given.
    let (config_updates, _watcher) = match &config_path {
        Some(path) => {
            let (watcher, update_rx) = ConfigWatcher::new(path);
            let handle = watcher.run()?;
            (update_rx, Some(handle))
        }
        None => {
            let (_update_tx, update_rx) = mpsc::unbounded_channel();
            (update_rx, None)
        }
    };

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    server
        .run(listener, config_updates, shutdown.subscribe())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
