use crate::server::response::ApiError;

const MAX_TAG_NAME_LEN: usize = 32;
const MAX_USERNAME_LEN: usize = 64;

fn is_valid_name_char(c: char, allow_period: bool) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || (allow_period && c == '.')
}

fn validate_name(
    name: &str,
    kind: &str,
    max_len: usize,
    allow_period: bool,
    forbid_leading_special: bool,
) -> Result<(), String> {
    if name.is_empty() {
        return Err(format!("{kind} cannot be empty"));
    }
    if name.len() > max_len {
        return Err(format!("{kind} cannot exceed {max_len} characters"));
    }
    if !name.chars().all(|c| is_valid_name_char(c, allow_period)) {
        let mut allowed = "alphanumeric characters, hyphens, and underscores".to_string();
        if allow_period {
            allowed.push_str(", and periods");
        }
        return Err(format!("{kind} can only contain {allowed}"));
    }
    if forbid_leading_special && (name.starts_with('-') || name.starts_with('_')) {
        return Err(format!("{kind} cannot start with a hyphen or underscore"));
    }
    Ok(())
}

pub fn validate_tag_name(name: &str) -> Result<(), ApiError> {
    validate_name(name, "Tag name", MAX_TAG_NAME_LEN, true, false).map_err(ApiError::bad_request)
}

pub fn validate_username(name: &str) -> Result<(), String> {
    validate_name(name, "Username", MAX_USERNAME_LEN, false, true)
}
