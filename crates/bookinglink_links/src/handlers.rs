use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use bookinglink_common::BookingLinkError;
use bookinglink_config::AppConfig;
use tracing::{info, warn};

use crate::logic::LinkRegistry;
use crate::models::{GenerateQuery, WebhookEvent};

pub const WELCOME_MESSAGE: &str = "Welcome to the booking link service!";
pub const WEBHOOK_ACK: &str = "Webhook received";

// --- State for link handlers ---
#[derive(Clone)]
pub struct LinksState {
    pub config: Arc<AppConfig>,
    pub registry: Arc<LinkRegistry>,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Welcome text", body = String, content_type = "text/plain")
    ),
    tag = "Links"
))]
pub async fn welcome_handler() -> &'static str {
    WELCOME_MESSAGE
}

/// Hands out the caller's active scheduling link, issuing one if needed.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/generate",
    params(GenerateQuery),
    responses(
        (
            status = 200,
            description = "Existing or newly issued link",
            body = String,
            content_type = "text/plain"
        ),
        (status = 500, description = "Link storage failure")
    ),
    tag = "Links"
))]
pub async fn generate_link_handler(
    State(state): State<Arc<LinksState>>,
    Query(params): Query<GenerateQuery>,
) -> Response {
    let user_id = params
        .user_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| state.config.links.default_user_id.clone());

    match state.registry.get_or_create(&user_id).await {
        Ok((record, issue)) => {
            format!("Your {} link: {}", issue.label(), record.unique_url).into_response()
        }
        Err(e) => {
            warn!(user_id = %user_id, error = %e, "failed to issue link");
            e.into_response()
        }
    }
}

/// Sends a valid token on to the meeting scheduler.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/redirect/{token}",
    params(("token" = String, Path, description = "Link token")),
    responses(
        (status = 302, description = "Redirect to the scheduler with `custom_token` appended"),
        (status = 400, description = "This link has expired"),
        (status = 404, description = "Invalid link"),
        (status = 410, description = "This link has already been used (`reject_used_links`)")
    ),
    tag = "Links"
))]
pub async fn redirect_handler(
    State(state): State<Arc<LinksState>>,
    Path(token): Path<String>,
) -> Response {
    match state.registry.resolve(&token).await {
        Ok(target) => {
            info!(token = %token, "redirecting to scheduler");
            (StatusCode::FOUND, [(header::LOCATION, target)]).into_response()
        }
        Err(e) => {
            info!(token = %token, reason = %e, "redirect refused");
            e.into_response()
        }
    }
}

/// Booking notifications from the scheduler.
///
/// Always acknowledged with 200: unparsable bodies, other events and unknown
/// tokens are logged and dropped.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/webhook",
    request_body = WebhookEvent,
    responses(
        (status = 200, description = "Webhook received", body = String, content_type = "text/plain")
    ),
    tag = "Links Webhooks"
))]
pub async fn webhook_handler(
    State(state): State<Arc<LinksState>>,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            let error = BookingLinkError::from(e);
            warn!(%error, "ignoring unparsable webhook payload");
            return (StatusCode::OK, WEBHOOK_ACK);
        }
    };

    if let Some(token) = event.booked_token() {
        match state.registry.mark_used(token).await {
            Ok(true) => info!(token, "Meeting booked with token"),
            Ok(false) => warn!(token, "Meeting booked with unknown token"),
            Err(e) => warn!(token, error = %e, "failed to mark link as used"),
        }
    } else {
        info!(event = ?event.event, "webhook event ignored");
    }

    (StatusCode::OK, WEBHOOK_ACK)
}
