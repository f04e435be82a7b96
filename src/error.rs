use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("tag name already in use: {0}")]
    NameInUse(String),

    #[error("tag {0} does not exist")]
    TagNotFound(String),

    #[error("making {child} a child of {parent} would cause a tag inheritance loop")]
    InheritanceLoop { parent: String, child: String },

    #[error("tag {child} is already a child of {parent}")]
    AlreadyChild { parent: String, child: String },

    #[error("tag {child} is not a child of {parent}")]
    NotAChild { parent: String, child: String },

    #[error("{}", describe_missing_entity(.id, .tag))]
    EntityNotFound { id: String, tag: Option<String> },

    #[error("entity {0} is not owned by the caller")]
    NotOwned(String),

    #[error("entity {id} already has tag {tag}")]
    TagAlreadyOnEntity { id: String, tag: String },

    #[error("user {0} does not exist")]
    UserNotFound(String),

    #[error("username {0} is already in use")]
    UsernameInUse(String),

    #[error("no account request for username {0}")]
    AccountRequestNotFound(String),

    #[error("{0} is the only admin")]
    LastAdmin(String),

    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error("invalid retrieval operator: {0}")]
    InvalidOperator(String),
}

impl Error {
    pub(crate) fn entity_not_found(id: &str) -> Self {
        Error::EntityNotFound {
            id: id.to_string(),
            tag: None,
        }
    }

    pub(crate) fn tag_not_on_entity(id: &str, tag: &str) -> Self {
        Error::EntityNotFound {
            id: id.to_string(),
            tag: Some(tag.to_string()),
        }
    }
}

fn describe_missing_entity(id: &str, tag: &Option<String>) -> String {
    match tag {
        Some(tag) => format!("tag {tag} is not on entity {id}"),
        None => format!("entity {id} does not exist"),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
