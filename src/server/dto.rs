use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
}

/// Body of `POST /entities/retrieve`. The operator is parsed separately so an
/// unknown value is reported as a domain error instead of a JSON rejection.
#[derive(Debug, Deserialize)]
pub struct RetrieveRequest {
    pub operator: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EntityTagsResponse {
    pub id: String,
    pub tags: BTreeSet<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: String,
}
