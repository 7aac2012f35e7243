use axum::{
    extract::State,
    Json,
    response::IntoResponse,
};
use std::sync::Arc;
use serde_json::json;
use tracing::info;
use nt_core::{AnalysisRequest, AnalysisResponse};
use crate::error::ApiError;
use crate::AppState;

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    info!("Analyzing {}", request.url);
    let response = state.analyzer.analyze(&request.url).await?;
    Ok(Json(response))
}

/// Liveness probe, touches nothing else.
pub async fn test_route() -> impl IntoResponse {
    Json(json!({ "message": "Backend is working" }))
}
