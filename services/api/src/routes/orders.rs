//! Order routes
//!
//! Orders are created from the client's cart snapshot at checkout and are
//! only mutated afterwards through admin status updates.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{CreateOrderRequest, UpdateOrderStatusRequest, User},
    state::AppState,
};

/// Create an order owned by the caller
pub async fn create_order(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.order_items.is_empty() {
        return Err(ApiError::BadRequest("No order items".to_string()));
    }

    let order = state
        .order_repository
        .create(user.id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to create order: {}", e);
            ApiError::InternalServerError
        })?;

    info!("Created order {} for user {}", order.id, user.id);

    Ok((StatusCode::CREATED, Json(order)))
}

/// Get all orders with owning user names (admin)
pub async fn list_orders(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let orders = state
        .order_repository
        .find_all_with_user()
        .await
        .map_err(|e| {
            error!("Failed to list orders: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(orders))
}

/// Get the caller's orders, newest first
pub async fn my_orders(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse, ApiError> {
    let orders = state
        .order_repository
        .find_by_user(user.id)
        .await
        .map_err(|e| {
            error!("Failed to list orders: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(orders))
}

/// Get the full details of an order
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .order_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get order: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    Ok(Json(order))
}

/// Overwrite an order's status (admin). The delivered and paid flags are
/// independent of the status text and stay untouched.
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .order_repository
        .update_status(id, &payload.status)
        .await
        .map_err(|e| {
            error!("Failed to update order status: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    info!("Order {} status set to {}", order.id, order.status);

    Ok(Json(order))
}
