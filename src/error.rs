use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Routes API error: {0}")]
    RoutesApi(String),

    #[error("Geocoding API error: {0}")]
    Geocoding(String),

    #[error("Polyline decode error: {0}")]
    PolylineDecode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal database error")
            }
            AppError::RoutesApi(ref e) => {
                tracing::error!("Routes API error: {}", e);
                (StatusCode::BAD_GATEWAY, "Routing service error")
            }
            AppError::Geocoding(ref e) => {
                tracing::error!("Geocoding API error: {}", e);
                (StatusCode::BAD_GATEWAY, "Geocoding service error")
            }
            AppError::PolylineDecode(ref e) => {
                tracing::warn!("Polyline decode error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Route path could not be decoded")
            }
            AppError::InvalidRequest(ref e) => (StatusCode::BAD_REQUEST, e.as_str()),
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
