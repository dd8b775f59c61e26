use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::controllers::{health, podcast::PodcastController};
use crate::domain::auth::IdentityVerifier;
use crate::infrastructure::auth::{auth_middleware, request_id_middleware};
use crate::infrastructure::config::Config;
use crate::infrastructure::repositories::UserRepository;

/// Build the application router with every route and layer configured
pub fn build_router(
    podcast_controller: Arc<PodcastController>,
    verifier: Arc<dyn IdentityVerifier>,
    user_repo: Arc<dyn UserRepository>,
    allowed_origins: &[String],
) -> Router {
    // Podcast routes (require authentication)
    let podcast_routes = Router::new()
        .route("/api/generate", post(PodcastController::generate))
        .route(
            "/api/generate-from-url",
            post(PodcastController::generate_from_url),
        )
        .route(
            "/api/generate-from-text",
            post(PodcastController::generate_from_text),
        )
        .route("/api/podcasts", get(PodcastController::list_podcasts))
        .route(
            "/api/podcasts/:podcastId/favorite",
            post(PodcastController::toggle_favorite),
        )
        .with_state(podcast_controller)
        .route_layer(middleware::from_fn_with_state(verifier, auth_middleware));

    // Health routes (public)
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(user_repo);

    Router::new()
        .merge(health_routes)
        .merge(podcast_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}

/// Serve `app` on the configured address until a shutdown signal arrives
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
