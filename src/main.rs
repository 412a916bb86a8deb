//! HTTP server for the attendance and payroll engine.

use std::env;
use std::process::ExitCode;

use attendance_payroll::api::{AppState, create_router};
use attendance_payroll::config::ConfigLoader;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_DIR: &str = "./config/default";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_dir = env::var("PAYROLL_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.into());
    let bind_addr = env::var("PAYROLL_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());

    let config = match ConfigLoader::load(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            error!(path = %config_dir, error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let listener = match TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %bind_addr, error = %e, "Failed to bind listener");
            return ExitCode::FAILURE;
        }
    };

    info!(addr = %bind_addr, config_dir = %config_dir, "Payroll API listening");
    if let Err(e) = axum::serve(listener, create_router(AppState::new(config))).await {
        error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
