use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use nt_inference::ParseOutcome;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The model answered but no usable sentiment could be recovered.
    #[error("Failed to analyze sentiment")]
    Sentiment(ParseOutcome),

    #[error("{0}")]
    Inference(#[from] nt_core::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

/// Every failure reaches the client as `500 {"detail": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(e: AnalysisError) -> Self {
        match &e {
            AnalysisError::Sentiment(outcome) => error!("Sentiment analysis failed: {:?}", outcome),
            AnalysisError::Inference(inner) => error!("Analysis failed: {}", inner),
        }
        ApiError::internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}
