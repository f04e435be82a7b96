//! # Tagsystem
//!
//! A hierarchical tagging server: tags form an inheritance DAG, entities carry
//! their most specific tags, and retrieval by a tag also finds everything
//! tagged with its descendants. Usable both as a standalone binary and as a
//! library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! tagsystem = { version = "0.0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tagsystem::auth::PasswordHasher;
//! use tagsystem::config::ServerConfig;
//! use tagsystem::server::{AppState, create_router};
//! use tagsystem::store::{SqliteStore, Store};
//!
//! let config = ServerConfig::default();
//! let store = SqliteStore::new(config.db_path()).unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(
//!     Arc::new(store),
//!     PasswordHasher::new(&config.hashing).unwrap(),
//! ));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes CLI module. Disable with `default-features = false`.

pub mod auth;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod server;
pub mod store;
pub mod types;
