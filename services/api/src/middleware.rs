//! Authentication middleware for bearer token validation
//!
//! The auth middleware verifies the token's signature and expiry, loads the
//! referenced user from the database, and stores it in the request
//! extensions for handlers. The admin middleware additionally requires the
//! loaded user to be an admin.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::error;

use crate::{error::ApiError, models::User, state::AppState};

/// Bearer token authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    // Extract the Authorization header
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Not authorized, no token".to_string()))?;

    // Check if it's a Bearer token
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Not authorized, no token".to_string()))?;

    // Validate the token
    let claims = state
        .jwt_service
        .validate_token(token)
        .map_err(|_| ApiError::Unauthorized("Not authorized, token failed".to_string()))?;

    // Load the referenced user; a token for a deleted user is rejected
    let user = state
        .user_repository
        .find_by_id(claims.sub)
        .await
        .map_err(|e| {
            error!("Failed to load user for token: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::Unauthorized("Not authorized, user not found".to_string()))?;

    // Insert the user into the request extensions
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Admin-only middleware; must run after `auth_middleware`
pub async fn admin_middleware(req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    let user = req
        .extensions()
        .get::<User>()
        .ok_or_else(|| ApiError::Unauthorized("Not authorized, no token".to_string()))?;

    if !user.is_admin {
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(req).await)
}
