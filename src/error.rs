//! Error types for the library catalog

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

/// Standalone error page, rendered without the shared layout so that a broken
/// template environment can still report its own failure.
const ERROR_PAGE: &str = include_str!("../templates/error.html");

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::NotFound(msg) => msg.clone(),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Store(msg) => {
                tracing::error!("Store error: {}", msg);
                "Store error".to_string()
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {:#}", e);
                "Internal server error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
        };

        let body = minijinja::Environment::new()
            .render_str(
                ERROR_PAGE,
                minijinja::context! { message => &message, status => status.as_u16() },
            )
            .unwrap_or_else(|e| {
                tracing::error!("Error page failed to render: {}", e);
                message
            });

        (status, Html(body)).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
