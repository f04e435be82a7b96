use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::RequireAdmin;
use crate::server::AppState;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};

pub async fn list_requests(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let requests = state
        .store
        .list_account_requests()
        .api_err("Failed to list account requests")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(requests)))
}

pub async fn accept_request(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> impl IntoResponse {
    let user = state
        .store
        .accept_account_request(&username)
        .inspect_err(|e| {
            tracing::info!(
                "{} failed to accept account request for {username}: {e}",
                admin.username
            )
        })
        .api_err("Failed to accept account request")?;

    tracing::info!("{} accepted account request for {username}", admin.username);

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(user))))
}
