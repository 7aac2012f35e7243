use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use nt_core::{Error, Result};

pub mod analyzer;
pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

pub use analyzer::Analyzer;
pub use config::WebConfig;
pub use state::AppState;

/// Credentials are allowed, so methods and headers are mirrored back to the
/// configured origin instead of using a wildcard.
fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let origin = origin
        .parse::<HeaderValue>()
        .map_err(|e| Error::Config(format!("Invalid CORS origin {}: {}", origin, e)))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

pub fn create_app(state: AppState, config: &WebConfig) -> Result<Router> {
    let cors = cors_layer(&config.cors_origin)?;

    Ok(Router::new()
        .route("/analyze", post(handlers::analyze))
        .route("/test", get(handlers::test_route))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state)))
}

/// Bind and serve until Ctrl-C.
pub async fn serve(state: AppState, config: &WebConfig) -> Result<()> {
    let app = create_app(state, config)?;
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("🌐 Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

pub mod prelude {
    pub use nt_core::{AnalysisRequest, AnalysisResponse, Result, Error};
    pub use crate::{AppState, WebConfig};
}
