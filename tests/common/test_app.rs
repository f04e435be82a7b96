use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

use tagsystem::auth::PasswordHasher;
use tagsystem::config::HashingConfig;
use tagsystem::server::{AppState, create_router};
use tagsystem::store::{SqliteStore, Store, UserStore};
use tagsystem::types::{Role, User};

pub const ADMIN: (&str, &str) = ("admin", "admin-pass");
pub const ALICE: (&str, &str) = ("alice", "alice-pass");
pub const BOB: (&str, &str) = ("bob", "bob-pass");

/// In-process server over a private in-memory database.
pub struct TestApp {
    router: Router,
    pub store: Arc<SqliteStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(SqliteStore::in_memory().expect("open store"));
        store.initialize().expect("initialize store");

        let hasher = PasswordHasher::new(&HashingConfig {
            memory_kib: 1024,
            iterations: 1,
            ..HashingConfig::default()
        })
        .expect("hasher");

        for ((username, password), role) in [(ADMIN, Role::Admin), (ALICE, Role::User), (BOB, Role::User)]
        {
            store
                .create_user(&User {
                    username: username.to_string(),
                    password_hash: hasher.hash(password).expect("hash"),
                    role,
                    created_at: Utc::now(),
                })
                .expect("create user");
        }

        let state = Arc::new(AppState::new(store.clone(), hasher));
        Self {
            router: create_router(state),
            store,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        auth: Option<(&str, &str)>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.raw(method, uri, auth, body).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }

    pub async fn raw(
        &self,
        method: Method,
        uri: &str,
        auth: Option<(&str, &str)>,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((username, password)) = auth {
            let encoded = STANDARD.encode(format!("{username}:{password}"));
            builder = builder.header(header::AUTHORIZATION, format!("Basic {encoded}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible")
    }

    pub async fn get(&self, uri: &str, auth: (&str, &str)) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(auth), None).await
    }

    pub async fn post(&self, uri: &str, auth: (&str, &str), body: Option<Value>) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(auth), body).await
    }

    pub async fn delete(&self, uri: &str, auth: (&str, &str)) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(auth), None).await
    }

    /// Creates `name` as admin, panicking on failure.
    pub async fn tag(&self, name: &str) {
        let (status, _) = self
            .post("/api/v1/tags", ADMIN, Some(serde_json::json!({ "name": name })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create tag {name}");
    }

    /// Adds `child` under `parent` as admin, panicking on failure.
    pub async fn edge(&self, parent: &str, child: &str) {
        let (status, _) = self
            .post(&format!("/api/v1/tags/{parent}/children/{child}"), ADMIN, None)
            .await;
        assert_eq!(status, StatusCode::OK, "add {child} under {parent}");
    }

    /// Creates an entity for `auth` and returns its id.
    pub async fn entity(&self, auth: (&str, &str)) -> String {
        let (status, body) = self.post("/api/v1/entities", auth, None).await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["id"].as_str().expect("entity id").to_string()
    }
}
