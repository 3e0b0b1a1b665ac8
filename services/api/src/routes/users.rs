//! Authentication, profile, address and user administration routes

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        self, AddressInput, AddressPatch, AdminUpdateUserRequest, AuthResponse, LoginRequest,
        ProfileResponse, RegisterRequest, UpdateProfileRequest, User, UserSummary, user,
    },
    state::AppState,
    validation,
};

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_name(&payload.name).map_err(ApiError::BadRequest)?;
    validation::validate_email(&payload.email).map_err(ApiError::BadRequest)?;
    validation::validate_password(&payload.password).map_err(ApiError::BadRequest)?;

    let existing = state
        .user_repository
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::InternalServerError
        })?;

    if existing.is_some() {
        return Err(ApiError::BadRequest("User already exists".to_string()));
    }

    let user = state
        .user_repository
        .create(&payload.name, &payload.email, &payload.password)
        .await
        .map_err(|e| {
            error!("Failed to create user: {}", e);
            ApiError::InternalServerError
        })?;

    info!("Registered user {}", user.email);

    let token = state.jwt_service.generate_token(user.id).map_err(|e| {
        error!("Failed to generate token: {}", e);
        ApiError::InternalServerError
    })?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
            addresses: user.addresses,
            token,
        }),
    ))
}

/// Authenticate a user and hand back a token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Login attempt for {}", payload.email);

    let user = state
        .user_repository
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::InternalServerError
        })?;

    let Some(user) = user else {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    };

    let password_matches = state
        .user_repository
        .verify_password(&user, &payload.password)
        .map_err(|e| {
            error!("Failed to verify password: {}", e);
            ApiError::InternalServerError
        })?;

    if !password_matches {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    // A blocked account fails with a distinct message even on correct
    // credentials
    if user.is_blocked {
        return Err(ApiError::Unauthorized(
            "Your account is blocked. Please contact support.".to_string(),
        ));
    }

    let token = state.jwt_service.generate_token(user.id).map_err(|e| {
        error!("Failed to generate token: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(AuthResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        is_admin: user.is_admin,
        addresses: user.addresses,
        token,
    }))
}

/// Get the caller's profile
pub async fn get_profile(Extension(user): Extension<User>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(ProfileResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        is_admin: user.is_admin,
        phone: user.phone,
        addresses: user.addresses,
        token: None,
    }))
}

/// Update the caller's profile; only present-and-non-empty fields overwrite.
/// The response carries a refreshed token.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(mut user): Extension<User>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    models::merge_field(&mut user.name, payload.name);
    models::merge_field(&mut user.email, payload.email);
    models::merge_optional_field(&mut user.phone, payload.phone);

    if let Some(password) = payload.password.filter(|p| !p.is_empty()) {
        validation::validate_password(&password).map_err(ApiError::BadRequest)?;
        user.password_hash = state
            .user_repository
            .hash_password(&password)
            .map_err(|e| {
                error!("Failed to hash password: {}", e);
                ApiError::InternalServerError
            })?;
    }

    state.user_repository.update(&user).await.map_err(|e| {
        error!("Failed to update user: {}", e);
        ApiError::InternalServerError
    })?;

    let token = state.jwt_service.generate_token(user.id).map_err(|e| {
        error!("Failed to generate token: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(ProfileResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        is_admin: user.is_admin,
        phone: user.phone,
        addresses: user.addresses,
        token: Some(token),
    }))
}

/// Append a new address to the caller's address list
pub async fn add_address(
    State(state): State<AppState>,
    Extension(mut user): Extension<User>,
    Json(payload): Json<AddressInput>,
) -> Result<impl IntoResponse, ApiError> {
    user::push_address(&mut user.addresses, payload);

    state
        .user_repository
        .save_addresses(user.id, &user.addresses)
        .await
        .map_err(|e| {
            error!("Failed to save addresses: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((StatusCode::CREATED, Json(user.addresses)))
}

/// Patch one of the caller's addresses
pub async fn update_address(
    State(state): State<AppState>,
    Extension(mut user): Extension<User>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddressPatch>,
) -> Result<impl IntoResponse, ApiError> {
    if !user::patch_address(&mut user.addresses, id, payload) {
        return Err(ApiError::NotFound("Address not found".to_string()));
    }

    state
        .user_repository
        .save_addresses(user.id, &user.addresses)
        .await
        .map_err(|e| {
            error!("Failed to save addresses: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(user.addresses))
}

/// Remove one of the caller's addresses; removing an absent id is a no-op
pub async fn delete_address(
    State(state): State<AppState>,
    Extension(mut user): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user::remove_address(&mut user.addresses, id);

    state
        .user_repository
        .save_addresses(user.id, &user.addresses)
        .await
        .map_err(|e| {
            error!("Failed to save addresses: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(user.addresses))
}

/// Get all users with their order counts (admin)
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state
        .user_repository
        .list_with_order_counts()
        .await
        .map_err(|e| {
            error!("Failed to list users: {}", e);
            ApiError::InternalServerError
        })?;

    let summaries: Vec<UserSummary> = users
        .into_iter()
        .map(|(user, total_orders)| {
            let mut summary = UserSummary::from_user(user);
            summary.total_orders = Some(total_orders);
            summary
        })
        .collect();

    Ok(Json(summaries))
}

/// Get a user by ID (admin)
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserSummary::from_user(user)))
}

/// True when the payload would toggle role or block flags on an admin
/// account; such updates are always refused
fn admin_toggle_refused(target: &User, payload: &AdminUpdateUserRequest) -> bool {
    target.is_admin && (payload.is_admin.is_some() || payload.is_blocked.is_some())
}

/// Update a user's name, email and role/block flags (admin).
/// Role and block toggles never touch admin accounts.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdminUpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut user = state
        .user_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if admin_toggle_refused(&user, &payload) {
        return Err(ApiError::BadRequest("Cannot modify admin user".to_string()));
    }

    models::merge_field(&mut user.name, payload.name);
    models::merge_field(&mut user.email, payload.email);
    if let Some(is_admin) = payload.is_admin {
        user.is_admin = is_admin;
    }
    if let Some(is_blocked) = payload.is_blocked {
        user.is_blocked = is_blocked;
    }

    state.user_repository.update(&user).await.map_err(|e| {
        error!("Failed to update user: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(UserSummary::from_user(user)))
}

/// Delete a user (admin); admin accounts cannot be deleted
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if user.is_admin {
        return Err(ApiError::BadRequest("Cannot delete admin user".to_string()));
    }

    state.user_repository.delete(user.id).await.map_err(|e| {
        error!("Failed to delete user: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(json!({ "message": "User removed" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(is_admin: bool) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password_hash: String::new(),
            is_admin,
            is_blocked: false,
            phone: None,
            addresses: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_toggles_on_admin_are_refused() {
        let target = user(true);

        let block = AdminUpdateUserRequest {
            is_blocked: Some(true),
            ..Default::default()
        };
        assert!(admin_toggle_refused(&target, &block));

        let demote = AdminUpdateUserRequest {
            is_admin: Some(false),
            ..Default::default()
        };
        assert!(admin_toggle_refused(&target, &demote));
    }

    #[test]
    fn test_name_edit_on_admin_is_allowed() {
        let target = user(true);
        let rename = AdminUpdateUserRequest {
            name: Some("New Name".to_string()),
            ..Default::default()
        };
        assert!(!admin_toggle_refused(&target, &rename));
    }

    #[test]
    fn test_toggles_on_regular_user_are_allowed() {
        let target = user(false);
        let block = AdminUpdateUserRequest {
            is_blocked: Some(true),
            is_admin: Some(true),
            ..Default::default()
        };
        assert!(!admin_toggle_refused(&target, &block));
    }
}
