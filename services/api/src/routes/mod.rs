//! API service routes
//!
//! Routes are grouped by access level: public, authenticated (bearer token)
//! and admin (bearer token + admin flag). A catch-all 404 and the
//! `{ "message": ... }` error shape wrap everything.

use axum::{
    Json, Router, middleware,
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;

use crate::{
    middleware::{admin_middleware, auth_middleware},
    state::AppState,
};

pub mod dashboard;
pub mod orders;
pub mod products;
pub mod upload;
pub mod users;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/api/users", post(users::register))
        .route("/api/users/login", post(users::login))
        .route("/api/products", get(products::list_products))
        .route("/api/products/:id", get(products::get_product));

    let protected_routes = Router::new()
        .route(
            "/api/users/profile",
            get(users::get_profile).put(users::update_profile),
        )
        .route("/api/users/address", post(users::add_address))
        .route(
            "/api/users/address/:id",
            put(users::update_address).delete(users::delete_address),
        )
        .route("/api/orders", post(orders::create_order))
        .route("/api/orders/mine", get(orders::my_orders))
        .route("/api/orders/:id", get(orders::get_order))
        .route("/api/upload", post(upload::upload_image))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_routes = Router::new()
        .route("/api/users", get(users::list_users))
        .route(
            "/api/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/api/products", post(products::create_product))
        .route(
            "/api/products/:id",
            put(products::update_product).delete(products::delete_product),
        )
        .route("/api/orders", get(orders::list_orders))
        .route("/api/orders/:id/status", put(orders::update_order_status))
        .route("/api/dashboard/summary", get(dashboard::get_summary))
        .route_layer(middleware::from_fn(admin_middleware))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .fallback(not_found)
        .with_state(state)
}

/// Liveness endpoint
pub async fn index() -> impl IntoResponse {
    "API is running..."
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "storefront-api"
    }))
}

/// Catch-all 404 handler
pub async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "message": format!("Not Found - {}", uri.path()),
        })),
    )
}
