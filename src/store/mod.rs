mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use std::collections::BTreeSet;

use crate::error::Result;
use crate::types::*;

/// The tag hierarchy: nodes, inheritance edges, and their closures.
///
/// Every mutation keeps the hierarchy acyclic and is applied atomically.
pub trait TagStore {
    fn tag_exists(&self, name: &str) -> Result<bool>;
    fn create_tag(&self, name: &str) -> Result<()>;
    /// Removes the tag, every edge touching it, and every assignment of it.
    fn delete_tag(&self, name: &str) -> Result<()>;
    fn get_tag(&self, name: &str) -> Result<Tag>;
    fn list_tags(&self) -> Result<BTreeSet<String>>;

    fn add_child(&self, parent: &str, child: &str) -> Result<()>;
    fn remove_child(&self, parent: &str, child: &str) -> Result<()>;
    fn get_children(&self, name: &str) -> Result<BTreeSet<String>>;
    fn get_parents(&self, name: &str) -> Result<BTreeSet<String>>;

    /// The tag itself plus everything that inherits from it.
    fn descendants(&self, name: &str) -> Result<BTreeSet<String>>;
    /// Everything the tag inherits from, excluding itself.
    fn ancestors(&self, name: &str) -> Result<BTreeSet<String>>;
}

/// Owner-scoped entities and their most-specific tag sets.
pub trait EntityStore {
    fn create_entity(&self, owner: &str) -> Result<Entity>;
    fn remove_entity(&self, owner: &str, id: &str) -> Result<()>;
    fn list_entities(&self, owner: &str) -> Result<Vec<Entity>>;

    /// Assigns `tag`, retracting any of its ancestors already on the entity.
    /// Returns the entity's resulting tag set.
    fn add_entity_tag(&self, owner: &str, id: &str, tag: &str) -> Result<BTreeSet<String>>;
    fn remove_entity_tag(&self, owner: &str, id: &str, tag: &str) -> Result<()>;
    fn get_entity_tags(&self, owner: &str, id: &str) -> Result<BTreeSet<String>>;

    /// Ids of the owner's entities matching the query tags, expanded through
    /// their descendants and combined with `operator`.
    fn retrieve(
        &self,
        owner: &str,
        operator: RetrievalOperator,
        tags: &[String],
    ) -> Result<BTreeSet<String>>;
}

pub trait UserStore {
    fn create_user(&self, user: &User) -> Result<()>;
    fn get_user(&self, username: &str) -> Result<Option<User>>;
    fn list_users(&self) -> Result<Vec<User>>;
    /// Deletes the user together with every entity they own.
    fn delete_user(&self, username: &str) -> Result<()>;
    fn set_role(&self, username: &str, role: Role) -> Result<()>;
    fn has_admin(&self) -> Result<bool>;

    fn create_account_request(&self, request: &AccountRequest) -> Result<()>;
    fn list_account_requests(&self) -> Result<Vec<AccountRequest>>;
    /// Turns a pending request into a `USER` account.
    fn accept_account_request(&self, username: &str) -> Result<User>;
}

/// Store defines the database interface.
pub trait Store: TagStore + EntityStore + UserStore + Send + Sync {
    fn initialize(&self) -> Result<()>;
}
