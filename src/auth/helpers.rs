use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::server::AppState;
use crate::types::User;

pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub enum CredentialError {
    InvalidScheme,
    InvalidCredentials,
    InternalError,
}

/// Decodes a `Basic base64(username:password)` authorization header.
pub fn extract_basic_credentials(header: &str) -> Option<Credentials> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let credentials = String::from_utf8(decoded).ok()?;

    let (username, password) = credentials.split_once(':')?;
    if username.is_empty() {
        return None;
    }

    Some(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Resolves the account named in the header and checks its password.
/// Returns `Ok(None)` when no header is present.
pub fn authenticate(
    state: &AppState,
    auth_header: Option<&str>,
) -> Result<Option<User>, CredentialError> {
    let Some(header) = auth_header else {
        return Ok(None);
    };
    if !header.starts_with("Basic ") {
        return Err(CredentialError::InvalidScheme);
    }

    let credentials =
        extract_basic_credentials(header).ok_or(CredentialError::InvalidCredentials)?;

    let user = state
        .store
        .get_user(&credentials.username)
        .map_err(|_| CredentialError::InternalError)?
        .ok_or(CredentialError::InvalidCredentials)?;

    let valid = state
        .hasher
        .verify(&credentials.password, &user.password_hash)
        .map_err(|e| {
            tracing::error!("Failed to verify password for {}: {e}", user.username);
            CredentialError::InternalError
        })?;

    if !valid {
        return Err(CredentialError::InvalidCredentials);
    }

    Ok(Some(user))
}
