use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::{Notice, RetryAction};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("document changed since it was read (now at version {current})")]
    Conflict { current: i64 },

    #[error("{0}")]
    NothingToExport(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::NothingToExport(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn notice(&self) -> Notice {
        match self {
            AppError::Database(_) | AppError::Store(_) => {
                Notice::error("Something went wrong. Please try again later.")
                    .with_retry(RetryAction::Resubmit)
            }
            AppError::Conflict { .. } => {
                Notice::error("Your data changed elsewhere. Reload and try again.")
                    .with_retry(RetryAction::Reload)
            }
            AppError::Validation(msg) => Notice::error(msg.clone()),
            AppError::NothingToExport(msg) => Notice::warning(msg.clone()),
            other => Notice::error(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = serde_json::json!({ "error": self.to_string(), "notice": self.notice() });
        (status, axum::Json(body)).into_response()
    }
}
