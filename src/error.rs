use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// AppError
///
/// Every failure an admin endpoint can report. Each variant maps to exactly one
/// HTTP status; store failures are logged here and never echoed to the client.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthenticated.")]
    Unauthorized,

    #[error("This action is unauthorized.")]
    Forbidden,

    /// A required query parameter was absent or empty.
    #[error("The {field} field is required.")]
    Validation { field: &'static str },

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Validation { field } => {
                let mut errors = serde_json::Map::new();
                errors.insert(field.to_string(), json!([self.to_string()]));
                json!({ "message": "The given data was invalid.", "errors": errors })
            }
            AppError::Store(e) => {
                tracing::error!("store error: {:?}", e);
                json!({ "message": "Server Error" })
            }
            _ => json!({ "message": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Convenience alias used by every handler.
pub type AppResult<T> = std::result::Result<T, AppError>;
