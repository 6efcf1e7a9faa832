//! Domain error type shared by all core components.
//!
//! Every fallible core operation returns `Result<_, CoreError>`. The web
//! layer converts a `CoreError` into the JSON envelope through the
//! `ResponseError` impl, so handlers can use `?` directly.

use crate::storage::StorageError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use sea_orm::DbErr;

#[derive(Debug)]
pub enum CoreError {
    /// Referenced plant/user/comment/image/parent-comment does not exist
    NotFound(String),
    /// Principal lacks ownership or the admin role for the mutation
    Forbidden(String),
    /// Malformed enum literal, duplicate username/email, bad old password
    InvalidArgument(String),
    /// Operation not allowed in the entity's current status
    InvalidState(String),
    /// Database error
    Db(DbErr),
    /// File storage error
    Storage(StorageError),
    /// Anything else; reported generically, logged server-side
    Unexpected(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreError::NotFound(msg) => write!(f, "{}", msg),
            CoreError::Forbidden(msg) => write!(f, "{}", msg),
            CoreError::InvalidArgument(msg) => write!(f, "{}", msg),
            CoreError::InvalidState(msg) => write!(f, "{}", msg),
            CoreError::Db(e) => write!(f, "Database error: {}", e),
            CoreError::Storage(e) => write!(f, "Storage error: {}", e),
            CoreError::Unexpected(msg) => write!(f, "Unexpected error: {}", msg),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DbErr> for CoreError {
    fn from(e: DbErr) -> Self {
        CoreError::Db(e)
    }
}

impl From<StorageError> for CoreError {
    fn from(e: StorageError) -> Self {
        CoreError::Storage(e)
    }
}

impl actix_web::ResponseError for CoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
            CoreError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CoreError::InvalidState(_) => StatusCode::CONFLICT,
            CoreError::Db(_) | CoreError::Storage(_) | CoreError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Internal errors are logged server-side and reported generically.
        let message = match self {
            CoreError::Db(e) => {
                log::error!("Unexpected database error: {}", e);
                "An unexpected internal server error occurred.".to_string()
            }
            CoreError::Storage(e) => {
                log::error!("Unexpected storage error: {}", e);
                "An unexpected internal server error occurred.".to_string()
            }
            CoreError::Unexpected(msg) => {
                log::error!("Unexpected error: {}", msg);
                "An unexpected internal server error occurred.".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "message": message,
            "data": null,
        }))
    }
}
