use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::dto::CreateAccountRequest;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::validation::validate_username;
use crate::types::AccountRequest;

/// Files a request for a new account. Open to unauthenticated callers.
pub async fn request_account(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    validate_username(&req.username).map_err(ApiError::bad_request)?;
    if req.password.is_empty() {
        return Err(ApiError::bad_request("Password cannot be empty"));
    }

    let password_hash = state
        .hasher
        .hash(&req.password)
        .api_err("Failed to hash password")?;

    let request = AccountRequest {
        username: req.username,
        password_hash,
        requested_at: Utc::now(),
    };

    state
        .store
        .create_account_request(&request)
        .inspect_err(|e| tracing::info!("account request for {} rejected: {e}", request.username))
        .api_err("Failed to create account request")?;

    tracing::info!("account requested for {}", request.username);

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(request))))
}

/// Deletes an account. Users may delete themselves; admins may delete anyone.
pub async fn delete_user(
    RequireUser(caller): RequireUser,
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> impl IntoResponse {
    if caller.username != username && !caller.is_admin() {
        return Err(ApiError::forbidden("Cannot delete another user's account"));
    }

    state
        .store
        .delete_user(&username)
        .inspect_err(|e| tracing::info!("{} failed to delete user {username}: {e}", caller.username))
        .api_err("Failed to delete user")?;

    tracing::info!("{} deleted user {username}", caller.username);

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
