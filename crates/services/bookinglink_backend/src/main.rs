// File: services/bookinglink_backend/src/main.rs
use std::process::ExitCode;
use std::sync::Arc;

use bookinglink_backend::app::{build_router, AppState};
use bookinglink_backend::sweeper::spawn_sweeper;
use bookinglink_common::init_logging;
use bookinglink_config::load_config;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            // logging is configured by the file we failed to read
            eprintln!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // keeps the non-blocking file writer flushing until main returns
    let _log_guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let state = AppState::new(config.clone());
    let sweeper = spawn_sweeper(
        state.registry.clone(),
        state.config.links.sweep_interval_secs,
    );
    let app = build_router(&state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    info!("Starting server at http://{}", addr);
    info!(
        public_base_url = %config.links.public_base_url,
        scheduler_url = %config.links.scheduler_url,
        "issuing links"
    );

    let served = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Some(handle) = sweeper {
        handle.abort();
    }

    match served {
        Ok(()) => {
            info!("server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "server error");
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
