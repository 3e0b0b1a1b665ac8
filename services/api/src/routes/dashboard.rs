//! Admin dashboard aggregation
//!
//! The summary is computed per request; there is no caching and no
//! materialized view. Total revenue is computed by loading every order and
//! reducing in memory, which mirrors the shipped behavior of this API.

use axum::{Json, extract::State, response::IntoResponse};
use tracing::error;

use crate::{
    error::ApiError,
    models::{DashboardSummary, order},
    state::AppState,
};

/// Number of recent orders shown on the dashboard
const RECENT_ORDERS: i64 = 5;

/// Get the dashboard summary (admin)
pub async fn get_summary(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let internal = |e: anyhow::Error| {
        error!("Failed to compute dashboard summary: {}", e);
        ApiError::InternalServerError
    };

    let total_products = state.product_repository.count().await.map_err(internal)?;
    let total_orders = state.order_repository.count().await.map_err(internal)?;
    let total_users = state.user_repository.count().await.map_err(internal)?;

    let orders = state.order_repository.find_all().await.map_err(internal)?;
    let total_revenue = order::total_revenue(&orders);

    let pending_orders = state
        .order_repository
        .count_pending()
        .await
        .map_err(internal)?;
    let recent_orders = state
        .order_repository
        .recent_with_user(RECENT_ORDERS)
        .await
        .map_err(internal)?;
    let monthly_revenue = state
        .order_repository
        .monthly_revenue()
        .await
        .map_err(internal)?;

    Ok(Json(DashboardSummary {
        total_products,
        total_orders,
        total_users,
        total_revenue,
        pending_orders,
        recent_orders,
        monthly_revenue,
    }))
}
