//! Workload engine HTTP server.
//!
//! Environment:
//! - `WORKLOAD_CONFIG_DIR`: configuration directory (default `./config/workload`)
//! - `WORKLOAD_ADDR`: listen address (default `0.0.0.0:3000`)
//! - `RUST_LOG`: log filter (default `info`)

use std::env;

use tracing::{error, info};

use workload_engine::api::{AppState, create_router};
use workload_engine::logging;

const DEFAULT_CONFIG_DIR: &str = "./config/workload";
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() {
    logging::init();

    let config_dir =
        env::var("WORKLOAD_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let addr = env::var("WORKLOAD_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    let state = match AppState::from_dir(&config_dir) {
        Ok(state) => state,
        Err(err) => {
            error!(error = %err, config_dir = %config_dir, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, addr = %addr, "Failed to bind listener");
            std::process::exit(1);
        }
    };

    info!(addr = %addr, config_dir = %config_dir, "Workload engine listening");
    if let Err(err) = axum::serve(listener, create_router(state)).await {
        error!(error = %err, "Server stopped");
        std::process::exit(1);
    }
}
