use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header::LOCATION, HeaderMap, StatusCode},
    Json,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    error::{AppResult, ValidationError},
    handlers::require_json,
    models::{not_found, parse_availability, Category, Product},
    AppState,
};

type JsonResponse = (StatusCode, Json<Value>);

fn parse_body(body: &Bytes) -> AppResult<Value> {
    let data = serde_json::from_slice(body)
        .map_err(|e| ValidationError::MalformedJson(e.to_string()))?;
    Ok(data)
}

fn list_response(products: &[Product]) -> JsonResponse {
    let items = products.iter().map(Product::to_json).collect();
    (StatusCode::OK, Json(Value::Array(items)))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<(StatusCode, [(axum::http::HeaderName, String); 1], Json<Value>)> {
    info!("Request to create a product");
    require_json(&headers)?;

    let data = parse_body(&body)?;
    debug!(payload = %data, "Processing");
    let mut product = Product::from_json(&data)?;
    product.create(&state.db).await?;

    let id = product.id.unwrap_or_default();
    info!(id, name = %product.name, "Product saved");

    Ok((
        StatusCode::CREATED,
        [(LOCATION, format!("/products/{}", id))],
        Json(product.to_json()),
    ))
}

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_products(State(state): State<AppState>) -> AppResult<JsonResponse> {
    let products = Product::all(&state.db).await?;
    info!(count = products.len(), "Listed products");
    Ok(list_response(&products))
}

// ── Read ──────────────────────────────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<JsonResponse> {
    let product = Product::find(&state.db, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(id, "Fetched product");
    Ok((StatusCode::OK, Json(product.to_json())))
}

// ── Update ────────────────────────────────────────────────────────────────────

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<JsonResponse> {
    info!(id, "Request to update a product");
    require_json(&headers)?;

    let changes = Product::from_json(&parse_body(&body)?)?;

    let mut product = Product::find(&state.db, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    product.replace_fields(changes);
    product.update(&state.db).await?;

    info!(id, "Updated product");
    Ok((StatusCode::OK, Json(product.to_json())))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    let product = Product::find(&state.db, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !product.delete(&state.db).await? {
        // Removed by a concurrent request after the lookup.
        return Err(not_found(id));
    }

    info!(id, "Deleted product");
    Ok(StatusCode::NO_CONTENT)
}

// ── Filters ───────────────────────────────────────────────────────────────────

pub async fn list_products_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<JsonResponse> {
    let products = Product::find_by_name(&state.db, &name).await?;
    info!(name = %name, count = products.len(), "Listed products by name");
    Ok(list_response(&products))
}

pub async fn list_products_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<JsonResponse> {
    // No stored row can carry an unrecognized category.
    let Ok(parsed) = category.parse::<Category>() else {
        info!(category = %category, "Unknown category, nothing to list");
        return Ok(list_response(&[]));
    };

    let products = Product::find_by_category(&state.db, parsed).await?;
    info!(category = %parsed, count = products.len(), "Listed products by category");
    Ok(list_response(&products))
}

pub async fn list_products_by_availability(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> AppResult<JsonResponse> {
    let available = parse_availability(&raw)?;
    let products = Product::find_by_availability(&state.db, available).await?;
    info!(available, count = products.len(), "Listed products by availability");
    Ok(list_response(&products))
}
