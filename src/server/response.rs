use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::error::{Error, Result as StoreResult};

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    #[must_use]
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }
}

/// API error that converts to a proper HTTP response
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    /// Maps a store error onto a status code. Domain failures keep their own
    /// message; infrastructure failures are logged and reported as `fallback`.
    #[must_use]
    pub fn from_store(err: Error, fallback: &'static str) -> Self {
        let status = match &err {
            Error::NameInUse(_)
            | Error::AlreadyChild { .. }
            | Error::TagAlreadyOnEntity { .. }
            | Error::UsernameInUse(_)
            | Error::LastAdmin(_) => StatusCode::CONFLICT,
            Error::TagNotFound(_)
            | Error::NotAChild { .. }
            | Error::EntityNotFound { .. }
            | Error::UserNotFound(_)
            | Error::AccountRequestNotFound(_) => StatusCode::NOT_FOUND,
            Error::InheritanceLoop { .. } | Error::InvalidRole(_) | Error::InvalidOperator(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::NotOwned(_) => StatusCode::FORBIDDEN,
            Error::Database(_) | Error::Io(_) | Error::Config(_) | Error::PasswordHash(_) => {
                tracing::error!("{fallback}: {err}");
                return Self::internal(fallback);
            }
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "data": null, "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

/// Extension trait for converting store results to API errors with a custom message.
pub trait StoreResultExt<T> {
    fn api_err(self, message: &'static str) -> Result<T, ApiError>;
}

impl<T> StoreResultExt<T> for StoreResult<T> {
    fn api_err(self, message: &'static str) -> Result<T, ApiError> {
        self.map_err(|e| ApiError::from_store(e, message))
    }
}

/// Extension for Option types from store operations.
pub trait StoreOptionExt<T> {
    fn or_not_found(self, message: &'static str) -> Result<T, ApiError>;
}

impl<T> StoreOptionExt<T> for Option<T> {
    fn or_not_found(self, message: &'static str) -> Result<T, ApiError> {
        self.ok_or_else(|| ApiError::not_found(message))
    }
}
