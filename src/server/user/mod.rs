mod account;
mod entities;
mod tags;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::server::AppState;

pub fn user_router() -> Router<Arc<AppState>> {
    Router::new()
        // Tags
        .route("/tags", get(tags::list_tags))
        .route("/tags", post(tags::create_tag))
        .route("/tags/{name}", get(tags::get_tag))
        .route("/tags/{name}", delete(tags::delete_tag))
        .route("/tags/{name}/children", get(tags::list_children))
        .route("/tags/{name}/parents", get(tags::list_parents))
        .route("/tags/{name}/descendants", get(tags::list_descendants))
        .route("/tags/{name}/ancestors", get(tags::list_ancestors))
        .route("/tags/{name}/children/{child}", post(tags::add_child))
        .route("/tags/{name}/children/{child}", delete(tags::remove_child))
        // Entities (owner-scoped)
        .route("/entities", get(entities::list_entities))
        .route("/entities", post(entities::create_entity))
        .route("/entities/retrieve", post(entities::retrieve))
        .route("/entities/{id}", delete(entities::remove_entity))
        .route("/entities/{id}/tags", get(entities::list_entity_tags))
        .route("/entities/{id}/tags/{tag}", post(entities::add_entity_tag))
        .route(
            "/entities/{id}/tags/{tag}",
            delete(entities::remove_entity_tag),
        )
        // Accounts
        .route("/users/requests", post(account::request_account))
        .route("/users/{username}", delete(account::delete_user))
}
