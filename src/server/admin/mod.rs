mod requests;
mod users;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::server::AppState;

pub fn admin_router() -> Router<Arc<AppState>> {
    Router::new()
        // User routes
        .route("/users", get(users::list_users))
        .route("/users/{username}/role", put(users::set_role))
        // Account request routes
        .route("/requests", get(requests::list_requests))
        .route("/requests/{username}", post(requests::accept_request))
}
