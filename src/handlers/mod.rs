pub mod products;

use axum::{
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::Html,
    Json,
};
use serde_json::json;
use tracing::error;

use crate::error::{AppError, AppResult};

const INDEX_HTML: &str = include_str!("../../static/index.html");
const JSON_MEDIA_TYPE: &str = "application/json";

pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "status": 200, "message": "OK" })))
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Reject a mutating request unless it declares a JSON body. Parameters such
/// as `charset` are ignored.
pub fn require_json(headers: &HeaderMap) -> AppResult<()> {
    let Some(value) = headers.get(CONTENT_TYPE) else {
        error!("No Content-Type specified.");
        return Err(unsupported_media_type());
    };

    let essence = value
        .to_str()
        .ok()
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_ascii_lowercase());

    match essence.as_deref() {
        Some(JSON_MEDIA_TYPE) => Ok(()),
        _ => {
            error!(content_type = ?value, "Invalid Content-Type");
            Err(unsupported_media_type())
        }
    }
}

fn unsupported_media_type() -> AppError {
    AppError::UnsupportedMediaType(format!("Content-Type must be {}", JSON_MEDIA_TYPE))
}
