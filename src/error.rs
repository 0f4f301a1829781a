//! Typed errors and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type AppResult<T> = Result<T, AppError>;

/// A single, specific reason why a product payload was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid product: body of request contained bad or no data")]
    NotAnObject,
    #[error("Invalid product: body is not valid JSON: {0}")]
    MalformedJson(String),
    #[error("Invalid product: missing {0}")]
    MissingField(&'static str),
    #[error("Invalid type for {field}: expected {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("Invalid product: {0} must not be empty")]
    EmptyField(&'static str),
    #[error("Invalid product: {field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("Invalid product: {0} must not contain NUL characters")]
    InvalidCharacter(&'static str),
    #[error("Invalid price: '{0}' is not a decimal number")]
    InvalidDecimal(String),
    #[error("Invalid price: must not be negative")]
    NegativePrice,
    #[error("Invalid category: '{0}'")]
    InvalidCategory(String),
    #[error("Invalid availability: '{0}' is not a boolean")]
    InvalidAvailability(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    UnsupportedMediaType(String),
    #[error("{0}")]
    NotFound(String),
    #[error("product {0} has already been persisted")]
    AlreadyPersisted(i32),
    #[error("product has not been persisted yet")]
    NotPersisted,
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::AlreadyPersisted(_) => StatusCode::BAD_REQUEST,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::NotPersisted | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Database(e) => {
                error!(error = %e, "Database operation failed");
                "Internal server error".to_string()
            }
            AppError::NotPersisted => {
                error!("Lifecycle operation on a transient product");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = json!({
            "status": status.as_u16(),
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": message,
        });
        (status, Json(body)).into_response()
    }
}
