// --- File: crates/bookinglink_links/src/routes.rs ---

use crate::handlers::{
    generate_link_handler, redirect_handler, webhook_handler, welcome_handler, LinksState,
};
use crate::logic::LinkRegistry;
use axum::{
    routing::{get, post},
    Router,
};
use bookinglink_config::AppConfig;
use std::sync::Arc;

/// Creates a router containing all routes for scheduling links.
///
/// The registry is passed in rather than built here so the backend's expiry
/// sweeper works on the same records the handlers see.
pub fn routes(config: Arc<AppConfig>, registry: Arc<LinkRegistry>) -> Router {
    let links_state = Arc::new(LinksState { config, registry });

    Router::new()
        .route("/", get(welcome_handler))
        .route("/generate", get(generate_link_handler))
        // User-facing redirect endpoint (GET)
        .route("/redirect/{token}", get(redirect_handler))
        // Scheduler-to-server notifications
        .route("/webhook", post(webhook_handler))
        .with_state(links_state)
}
