//! # Auction Gateway Server
//!
//! HTTP-facing command gateway for the auction pipeline. It accepts
//! administrative commands (download auction data, clean up derived
//! artifacts, compute live-auction views) and orchestrates them against
//! the backing resources: the durable endpoint registry, the object
//! storage tier and the message bus.
//!
//! ## Functionality:
//! - **Fail-fast Bootstrap**: Wires every outbound dependency in a strict
//!   order at startup; a missing load-bearing dependency stops the process
//!   before it serves traffic.
//! - **Command Routing**: Dispatches a fixed set of POST commands plus a
//!   liveness probe, with a logging middleware on every request.
//! - **Uniform Error Envelope**: Every failing command answers with a
//!   `{message, error}` JSON body through one rendering path.
//! - **Structured Logging**: `tracing` to console and a daily rotating
//!   JSON file.
//! - **Dynamic Configuration**: Defaults, JSON config file, environment
//!   variables and CLI arguments, merged in that order.

mod gateway_logic;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use static_init::dynamic;
use tracing::{error, info};

use crate::gateway_logic::config::{self, DEFAULT_PORT};
use crate::gateway_logic::logger::setup_logging;
use crate::gateway_logic::routes::build_router;
use crate::gateway_logic::state::GatewayState;

// load .env files before anything else
#[dynamic]
static DOTENV_INIT: () = {
    dotenvy::dotenv().ok();
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load_config();

    // Set up logging for the application. If logging initialization fails, the process exits.
    let _guard = match setup_logging(&config) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Failed to initialize logging: {err}");
            std::process::exit(1);
        }
    };

    info!(
        service = config.service_name.as_deref().unwrap_or(""),
        "initializing service"
    );

    let port = config.port.unwrap_or(DEFAULT_PORT);

    // The composition root owns the terminate-on-bootstrap-failure policy;
    // everything below it only returns errors.
    let state_config = match config.gateway_state_config() {
        Ok(state_config) => state_config,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            std::process::exit(1);
        }
    };

    info!(project = state_config.project_id.as_str(), port, "producing gateway state");
    let state = match GatewayState::new(state_config).await {
        Ok(state) => state,
        Err(err) => {
            error!(error = %err, "failed to produce gateway state");
            std::process::exit(1);
        }
    };

    info!(
        instance_id = state.instance_id(),
        fresh = state.is_fresh(),
        boot_bucket = state.boot_bucket().name.as_str(),
        realms_bucket = state.realms_bucket().name.as_str(),
        metrics_degraded = state.metrics_degraded(),
        "finished init"
    );

    let app = build_router(Arc::new(state));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "gateway listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("shutdown signal received");
}
