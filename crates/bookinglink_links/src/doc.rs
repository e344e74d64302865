// --- File: crates/bookinglink_links/src/doc.rs ---
use utoipa::OpenApi;

use crate::models::{LinkRecord, WebhookEvent, WebhookProperties};

/// OpenAPI documentation for the scheduling link API
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::welcome_handler,
        crate::handlers::generate_link_handler,
        crate::handlers::redirect_handler,
        crate::handlers::webhook_handler
    ),
    components(
        schemas(LinkRecord, WebhookEvent, WebhookProperties)
    ),
    tags(
        (name = "Links", description = "Issue one-time scheduling links and redirect them"),
        (name = "Links Webhooks", description = "Booking notifications that consume links")
    )
)]
pub struct LinksApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_all_link_routes() {
        let doc = LinksApiDoc::openapi();
        for path in ["/", "/generate", "/redirect/{token}", "/webhook"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
