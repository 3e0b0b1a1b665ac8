//! Product catalog routes
//!
//! Reads are public; writes are admin-only. The list endpoint returns the
//! full catalog: filtering, search and sorting happen client-side, which is
//! the documented contract of this API.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{error::ApiError, models::UpdateProductRequest, state::AppState};

/// Get the full catalog
pub async fn list_products(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let products = state.product_repository.find_all().await.map_err(|e| {
        error!("Failed to list products: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(products))
}

/// Get a product by ID
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state
        .product_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get product: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

/// Create a catalog stub (admin); the client follows up with an update
/// carrying the real fields
pub async fn create_product(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let product = state.product_repository.create_stub().await.map_err(|e| {
        error!("Failed to create product: {}", e);
        ApiError::InternalServerError
    })?;

    info!("Created product stub {}", product.id);

    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product (admin)
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut product = state
        .product_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get product: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    product.apply_update(payload);

    state
        .product_repository
        .update(&product)
        .await
        .map_err(|e| {
            error!("Failed to update product: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(product))
}

/// Delete a product (admin)
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.product_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete product: {}", e);
        ApiError::InternalServerError
    })?;

    if !deleted {
        return Err(ApiError::NotFound("Product not found".to_string()));
    }

    Ok(Json(json!({ "message": "Product removed" })))
}
