use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("{0}")]
    Validation(String),

    #[error("Check-in window {0} not found")]
    NotFound(u64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stored check-in window {id} is unreadable: {reason}")]
    CorruptRecord { id: u64, reason: String },
}

impl ResponseError for WindowError {
    fn status_code(&self) -> StatusCode {
        match self {
            WindowError::Validation(_) => StatusCode::BAD_REQUEST,
            WindowError::NotFound(_) => StatusCode::NOT_FOUND,
            WindowError::Database(_) | WindowError::CorruptRecord { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Check-in window request failed");
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(json!({ "message": message }))
    }
}
