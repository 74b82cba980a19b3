use analytics::AnalyticsError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use core_types::CoreError;
use registry::RegistryError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Missing required query parameter '{0}'")]
    MissingParameter(&'static str),
    #[error("Invalid query parameter: {0}")]
    InvalidQuery(String),
    #[error("Missing or invalid bearer token")]
    Unauthorized,
    #[error("Export error: {0}")]
    Export(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Registry(RegistryError::DatasetNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Registry(RegistryError::InvalidPayload(_)) => StatusCode::BAD_REQUEST,
            AppError::Registry(RegistryError::Unavailable) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Analytics(AnalyticsError::LengthMismatch { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Analytics(_) => StatusCode::BAD_REQUEST,
            AppError::Core(_) => StatusCode::BAD_REQUEST,
            AppError::MissingParameter(_) | AppError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed.");
            "An internal error occurred".to_string()
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected.");
            self.to_string()
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
