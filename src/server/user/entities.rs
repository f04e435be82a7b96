use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::dto::{EntityTagsResponse, RetrieveRequest};
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::types::RetrievalOperator;

pub async fn list_entities(
    RequireUser(user): RequireUser,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let entities = state
        .store
        .list_entities(&user.username)
        .api_err("Failed to list entities")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(entities)))
}

pub async fn create_entity(
    RequireUser(user): RequireUser,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let entity = state
        .store
        .create_entity(&user.username)
        .api_err("Failed to create entity")?;

    tracing::info!("{} created entity {}", user.username, entity.id);

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(entity))))
}

pub async fn remove_entity(
    RequireUser(user): RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    state
        .store
        .remove_entity(&user.username, &id)
        .inspect_err(|e| tracing::info!("{} failed to remove entity {id}: {e}", user.username))
        .api_err("Failed to remove entity")?;

    tracing::info!("{} removed entity {id}", user.username);

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

pub async fn retrieve(
    RequireUser(user): RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<RetrieveRequest>,
) -> impl IntoResponse {
    let operator: RetrievalOperator = req.operator.parse().api_err("Invalid operator")?;

    let ids = state
        .store
        .retrieve(&user.username, operator, &req.tags)
        .api_err("Failed to retrieve entities")?;

    tracing::debug!(
        "{} retrieved {} entities with {operator:?} {:?}",
        user.username,
        ids.len(),
        req.tags
    );

    Ok::<_, ApiError>(Json(ApiResponse::success(ids)))
}

pub async fn list_entity_tags(
    RequireUser(user): RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let tags = state
        .store
        .get_entity_tags(&user.username, &id)
        .api_err("Failed to get entity tags")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(tags)))
}

pub async fn add_entity_tag(
    RequireUser(user): RequireUser,
    State(state): State<Arc<AppState>>,
    Path((id, tag)): Path<(String, String)>,
) -> impl IntoResponse {
    let tags = state
        .store
        .add_entity_tag(&user.username, &id, &tag)
        .inspect_err(|e| {
            tracing::info!("{} failed to add tag {tag} to entity {id}: {e}", user.username)
        })
        .api_err("Failed to add tag")?;

    tracing::info!("{} added tag {tag} to entity {id}", user.username);

    Ok::<_, ApiError>(Json(ApiResponse::success(EntityTagsResponse { id, tags })))
}

pub async fn remove_entity_tag(
    RequireUser(user): RequireUser,
    State(state): State<Arc<AppState>>,
    Path((id, tag)): Path<(String, String)>,
) -> impl IntoResponse {
    state
        .store
        .remove_entity_tag(&user.username, &id, &tag)
        .inspect_err(|e| {
            tracing::info!(
                "{} failed to remove tag {tag} from entity {id}: {e}",
                user.username
            )
        })
        .api_err("Failed to remove tag")?;

    tracing::info!("{} removed tag {tag} from entity {id}", user.username);

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
