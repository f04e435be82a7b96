use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::{RequireAdmin, RequireUser};
use crate::server::AppState;
use crate::server::dto::CreateTagRequest;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::validation::validate_tag_name;
use crate::types::Tag;

pub async fn list_tags(
    _auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let tags = state.store.list_tags().api_err("Failed to list tags")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(tags)))
}

pub async fn create_tag(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTagRequest>,
) -> impl IntoResponse {
    validate_tag_name(&req.name)?;

    state
        .store
        .create_tag(&req.name)
        .inspect_err(|e| tracing::info!("{} failed to create tag {}: {e}", admin.username, req.name))
        .api_err("Failed to create tag")?;

    tracing::info!("{} created tag {}", admin.username, req.name);

    let tag = Tag {
        name: req.name,
        children: BTreeSet::new(),
        parents: BTreeSet::new(),
    };
    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(tag))))
}

pub async fn get_tag(
    _auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let tag = state.store.get_tag(&name).api_err("Failed to get tag")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(tag)))
}

pub async fn delete_tag(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    state
        .store
        .delete_tag(&name)
        .inspect_err(|e| tracing::info!("{} failed to delete tag {name}: {e}", admin.username))
        .api_err("Failed to delete tag")?;

    tracing::info!("{} deleted tag {name}", admin.username);

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

pub async fn list_children(
    _auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let children = state
        .store
        .get_children(&name)
        .api_err("Failed to get children")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(children)))
}

pub async fn list_parents(
    _auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let parents = state
        .store
        .get_parents(&name)
        .api_err("Failed to get parents")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(parents)))
}

pub async fn list_descendants(
    _auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let descendants = state
        .store
        .descendants(&name)
        .api_err("Failed to resolve descendants")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(descendants)))
}

pub async fn list_ancestors(
    _auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let ancestors = state
        .store
        .ancestors(&name)
        .api_err("Failed to resolve ancestors")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(ancestors)))
}

pub async fn add_child(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path((name, child)): Path<(String, String)>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    store
        .add_child(&name, &child)
        .inspect_err(|e| {
            tracing::info!(
                "{} failed to make {child} a child of {name}: {e}",
                admin.username
            )
        })
        .api_err("Failed to add child")?;

    tracing::info!("{} made {child} a child of {name}", admin.username);

    let tag = store.get_tag(&name).api_err("Failed to get tag")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(tag)))
}

pub async fn remove_child(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path((name, child)): Path<(String, String)>,
) -> impl IntoResponse {
    state
        .store
        .remove_child(&name, &child)
        .inspect_err(|e| {
            tracing::info!(
                "{} failed to remove child {child} from {name}: {e}",
                admin.username
            )
        })
        .api_err("Failed to remove child")?;

    tracing::info!("{} removed child {child} from {name}", admin.username);

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
