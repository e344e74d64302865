// --- File: crates/services/bookinglink_backend/src/app.rs ---
use std::sync::Arc;

use axum::Router;
use bookinglink_config::AppConfig;
use bookinglink_links::{routes as link_routes, LinkRegistry};
use tower_http::trace::TraceLayer;

/// Application state shared by the router and the expiry sweeper.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub registry: Arc<LinkRegistry>,
}

impl AppState {
    /// State backed by the in-memory link store.
    pub fn new(config: Arc<AppConfig>) -> Self {
        let registry = Arc::new(LinkRegistry::in_memory(&config.links));
        Self { config, registry }
    }
}

/// Builds the full HTTP application: link routes at the root, request
/// tracing and, with the `openapi` feature, Swagger UI under `/docs`.
pub fn build_router(state: &AppState) -> Router {
    #[allow(unused_mut)] // only mutated with the openapi feature
    let mut app = link_routes(state.config.clone(), state.registry.clone());

    #[cfg(feature = "openapi")]
    {
        use bookinglink_links::doc::LinksApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Booking Link API",
                version = "0.1.0",
                description = "One-time scheduling links and booking webhook",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            servers((url = "/", description = "Service root")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(LinksApiDoc::openapi());
        tracing::info!("Adding Swagger UI at /docs");

        let swagger_ui = SwaggerUi::new("/docs").url("/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    app.layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_router_serves_link_routes_at_root() {
        let state = AppState::new(Arc::new(AppConfig::default()));
        let app = build_router(&state);

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"Welcome to the booking link service!");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/generate?userId=alice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.starts_with("Your new link: https://yourapp.onrender.com/redirect/"));
        assert_eq!(state.registry.stored_links().await.unwrap(), 1);
    }

    #[cfg(feature = "openapi")]
    #[tokio::test]
    async fn test_openapi_json_served() {
        let app = build_router(&AppState::new(Arc::new(AppConfig::default())));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
