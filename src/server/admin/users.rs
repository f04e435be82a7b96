use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::auth::RequireAdmin;
use crate::server::AppState;
use crate::server::dto::SetRoleRequest;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::types::Role;

pub async fn list_users(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let users = state.store.list_users().api_err("Failed to list users")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(users)))
}

pub async fn set_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    Json(req): Json<SetRoleRequest>,
) -> impl IntoResponse {
    let role: Role = req.role.parse().api_err("Invalid role")?;
    let store = state.store.as_ref();

    store
        .set_role(&username, role)
        .inspect_err(|e| {
            tracing::info!("{} failed to set role of {username}: {e}", admin.username)
        })
        .api_err("Failed to set role")?;

    tracing::info!("{} set role of {username} to {role}", admin.username);

    let user = store
        .get_user(&username)
        .api_err("Failed to get user")?
        .or_not_found("User not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(user)))
}
