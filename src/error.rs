use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::dto::ErrorResponse;

/// Failures that stop the process before it starts serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] envy::Error),
    #[error("database is not reachable after {attempts} attempts")]
    DatabaseUnreachable { attempts: u32 },
    #[error("failed to initialize schema: {0}")]
    Schema(#[from] tokio_postgres::Error),
    #[error("failed to bind listener: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("text is required")]
    TextRequired,
    #[error("note not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::TextRequired => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Database(e) => {
                // Driver details stay in the log
                tracing::error!("database error while handling request: {}", e);
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
