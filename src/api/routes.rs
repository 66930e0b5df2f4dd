//! Router construction and server startup.

use std::path::Path;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::config::Config;
use crate::provider::DataForSeoClient;
use crate::task::{TaskRunner, TokioSleeper};

/// Shared application state.
pub struct AppState {
    pub runner: TaskRunner,
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let client = DataForSeoClient::new(&config)?;
    tracing::info!("Using task API at {}", config.base_url);

    let state = Arc::new(AppState {
        runner: TaskRunner::new(Arc::new(client), Arc::new(TokioSleeper)),
    });

    let app = router(state, &config.static_dir);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server is running on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the full application router.
///
/// Feature endpoints live under `/api` and, for older front-ends, under
/// `/seo`. Everything else falls through to the static directory.
pub fn router(state: Arc<AppState>, static_dir: &Path) -> Router {
    let api_routes = feature_routes().route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api_routes)
        .nest("/seo", feature_routes())
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn feature_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/google-business-profile",
            post(handlers::business_profile).fallback(handlers::method_not_allowed),
        )
        .route(
            "/google-business-info",
            post(handlers::business_info).fallback(handlers::method_not_allowed),
        )
        .route(
            "/on-page-seo",
            post(handlers::on_page_seo).fallback(handlers::method_not_allowed),
        )
        .route(
            "/page-audit",
            post(handlers::page_audit).fallback(handlers::method_not_allowed),
        )
        .route(
            "/backlink-tracking",
            post(handlers::backlink_tracking).fallback(handlers::method_not_allowed),
        )
        .route(
            "/keyword-research",
            post(handlers::keyword_research).fallback(handlers::method_not_allowed),
        )
        .route(
            "/competitor-analysis",
            post(handlers::competitor_analysis).fallback(handlers::method_not_allowed),
        )
}
