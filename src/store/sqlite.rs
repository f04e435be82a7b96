use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use super::schema::SCHEMA;
use super::{EntityStore, Store, TagStore, UserStore};
use crate::error::{Error, Result};
use crate::graph::{self, TagGraph};
use crate::types::*;

/// SQLite-backed store.
///
/// A single connection sits behind a mutex and every logical operation runs
/// inside one transaction while holding it, so multi-step checks (existence,
/// cycle detection, ancestor retraction) are never interleaved with another
/// mutation and readers never see a half-applied one.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a private in-memory database, mostly useful for tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_role(s: &str) -> Role {
    s.parse().unwrap_or_else(|e| {
        tracing::error!("Invalid role in database: '{}' - {}", s, e);
        Role::User
    })
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// One-hop edge lookups against a connection or open transaction.
struct SqlGraph<'c>(&'c Connection);

impl SqlGraph<'_> {
    fn neighbours(&self, sql: &str, tag: &str) -> Result<Vec<String>> {
        let mut stmt = self.0.prepare_cached(sql)?;
        let rows = stmt.query_map(params![tag], |row| row.get(0))?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }
}

impl TagGraph for SqlGraph<'_> {
    fn children(&self, tag: &str) -> Result<Vec<String>> {
        self.neighbours(
            "SELECT child FROM tag_children WHERE parent = ?1 ORDER BY child",
            tag,
        )
    }

    fn parents(&self, tag: &str) -> Result<Vec<String>> {
        self.neighbours(
            "SELECT parent FROM tag_children WHERE child = ?1 ORDER BY parent",
            tag,
        )
    }
}

fn tag_exists(conn: &Connection, name: &str) -> Result<bool> {
    let count: i32 = conn.query_row(
        "SELECT COUNT(*) FROM tags WHERE name = ?1",
        params![name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn require_tag(conn: &Connection, name: &str) -> Result<()> {
    if tag_exists(conn, name)? {
        Ok(())
    } else {
        Err(Error::TagNotFound(name.to_string()))
    }
}

/// Fails with `LastAdmin` when `username` holds the only admin account.
fn require_other_admin(conn: &Connection, username: &str) -> Result<()> {
    let role: Option<String> = conn
        .query_row(
            "SELECT role FROM users WHERE username = ?1",
            params![username],
            |row| row.get(0),
        )
        .optional()?;
    let Some(role) = role else {
        return Err(Error::UserNotFound(username.to_string()));
    };
    if parse_role(&role) != Role::Admin {
        return Ok(());
    }

    let others: i32 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE role = ?1 AND username != ?2",
        params![Role::Admin.as_str(), username],
        |row| row.get(0),
    )?;
    if others == 0 {
        return Err(Error::LastAdmin(username.to_string()));
    }
    Ok(())
}

fn edge_exists(conn: &Connection, parent: &str, child: &str) -> Result<bool> {
    let count: i32 = conn.query_row(
        "SELECT COUNT(*) FROM tag_children WHERE parent = ?1 AND child = ?2",
        params![parent, child],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Fails unless the entity exists and belongs to `owner`.
fn require_owned(conn: &Connection, owner: &str, id: &str) -> Result<()> {
    let actual: Option<String> = conn
        .query_row(
            "SELECT owner FROM entities WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;

    match actual {
        None => Err(Error::entity_not_found(id)),
        Some(actual) if actual != owner => Err(Error::NotOwned(id.to_string())),
        Some(_) => Ok(()),
    }
}

fn entity_tags(conn: &Connection, id: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn.prepare_cached("SELECT tag FROM entity_tags WHERE entity_id = ?1")?;
    let rows = stmt.query_map(params![id], |row| row.get(0))?;
    rows.collect::<std::result::Result<BTreeSet<_>, _>>()
        .map_err(Error::from)
}

fn owned_entities(conn: &Connection, owner: &str) -> Result<Vec<Entity>> {
    let mut stmt = conn.prepare(
        "SELECT e.id, e.owner, e.created_at, et.tag
         FROM entities e
         LEFT JOIN entity_tags et ON et.entity_id = e.id
         WHERE e.owner = ?1
         ORDER BY e.created_at, e.id",
    )?;

    let rows = stmt.query_map(params![owner], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
        ))
    })?;

    let mut entities: Vec<Entity> = Vec::new();
    for row in rows {
        let (id, owner, created_at, tag) = row?;
        if entities.last().is_none_or(|e| e.id != id) {
            entities.push(Entity {
                id,
                owner,
                tags: BTreeSet::new(),
                created_at: parse_datetime(&created_at),
            });
        }
        if let (Some(tag), Some(entity)) = (tag, entities.last_mut()) {
            entity.tags.insert(tag);
        }
    }
    Ok(entities)
}

fn user_exists(conn: &Connection, username: &str) -> Result<bool> {
    let count: i32 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE username = ?1",
        params![username],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        username: row.get(0)?,
        password_hash: row.get(1)?,
        role: parse_role(&row.get::<_, String>(2)?),
        created_at: parse_datetime(&row.get::<_, String>(3)?),
    })
}

fn insert_user(conn: &Connection, user: &User) -> Result<()> {
    let result = conn.execute(
        "INSERT INTO users (username, password_hash, role, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            user.username,
            user.password_hash,
            user.role.as_str(),
            format_datetime(&user.created_at),
        ],
    );

    match result {
        Ok(_) => Ok(()),
        Err(e) if is_constraint_violation(&e) => {
            Err(Error::UsernameInUse(user.username.clone()))
        }
        Err(e) => Err(Error::from(e)),
    }
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }
}

impl TagStore for SqliteStore {
    fn tag_exists(&self, name: &str) -> Result<bool> {
        tag_exists(&self.conn(), name)
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO tags (name, created_at) VALUES (?1, ?2)",
            params![name, format_datetime(&Utc::now())],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_constraint_violation(&e) => Err(Error::NameInUse(name.to_string())),
            Err(e) => Err(Error::from(e)),
        }
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        // Edges and entity assignments go with it via ON DELETE CASCADE.
        let rows = tx.execute("DELETE FROM tags WHERE name = ?1", params![name])?;
        if rows == 0 {
            return Err(Error::TagNotFound(name.to_string()));
        }

        tx.commit()?;
        Ok(())
    }

    fn get_tag(&self, name: &str) -> Result<Tag> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        require_tag(&tx, name)?;

        let graph = SqlGraph(&tx);
        Ok(Tag {
            name: name.to_string(),
            children: graph.children(name)?.into_iter().collect(),
            parents: graph.parents(name)?.into_iter().collect(),
        })
    }

    fn list_tags(&self) -> Result<BTreeSet<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT name FROM tags ORDER BY name")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<std::result::Result<BTreeSet<_>, _>>()
            .map_err(Error::from)
    }

    fn add_child(&self, parent: &str, child: &str) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        require_tag(&tx, parent)?;
        require_tag(&tx, child)?;

        if graph::is_descendant(&SqlGraph(&tx), parent, child)? {
            return Err(Error::InheritanceLoop {
                parent: parent.to_string(),
                child: child.to_string(),
            });
        }

        if edge_exists(&tx, parent, child)? {
            return Err(Error::AlreadyChild {
                parent: parent.to_string(),
                child: child.to_string(),
            });
        }

        tx.execute(
            "INSERT INTO tag_children (parent, child) VALUES (?1, ?2)",
            params![parent, child],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn remove_child(&self, parent: &str, child: &str) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        require_tag(&tx, parent)?;
        require_tag(&tx, child)?;

        let rows = tx.execute(
            "DELETE FROM tag_children WHERE parent = ?1 AND child = ?2",
            params![parent, child],
        )?;
        if rows == 0 {
            return Err(Error::NotAChild {
                parent: parent.to_string(),
                child: child.to_string(),
            });
        }

        tx.commit()?;
        Ok(())
    }

    fn get_children(&self, name: &str) -> Result<BTreeSet<String>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        require_tag(&tx, name)?;
        Ok(SqlGraph(&tx).children(name)?.into_iter().collect())
    }

    fn get_parents(&self, name: &str) -> Result<BTreeSet<String>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        require_tag(&tx, name)?;
        Ok(SqlGraph(&tx).parents(name)?.into_iter().collect())
    }

    fn descendants(&self, name: &str) -> Result<BTreeSet<String>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        require_tag(&tx, name)?;
        graph::descendants(&SqlGraph(&tx), name)
    }

    fn ancestors(&self, name: &str) -> Result<BTreeSet<String>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        require_tag(&tx, name)?;
        graph::ancestors(&SqlGraph(&tx), name)
    }
}

impl EntityStore for SqliteStore {
    fn create_entity(&self, owner: &str) -> Result<Entity> {
        let entity = Entity {
            id: Uuid::new_v4().to_string(),
            owner: owner.to_string(),
            tags: BTreeSet::new(),
            created_at: Utc::now(),
        };

        self.conn().execute(
            "INSERT INTO entities (id, owner, created_at) VALUES (?1, ?2, ?3)",
            params![
                entity.id,
                entity.owner,
                format_datetime(&entity.created_at)
            ],
        )?;
        Ok(entity)
    }

    fn remove_entity(&self, owner: &str, id: &str) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        require_owned(&tx, owner, id)?;
        tx.execute("DELETE FROM entities WHERE id = ?1", params![id])?;

        tx.commit()?;
        Ok(())
    }

    fn list_entities(&self, owner: &str) -> Result<Vec<Entity>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        owned_entities(&tx, owner)
    }

    fn add_entity_tag(&self, owner: &str, id: &str, tag: &str) -> Result<BTreeSet<String>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        require_owned(&tx, owner, id)?;
        require_tag(&tx, tag)?;

        let mut current = entity_tags(&tx, id)?;
        if current.contains(tag) {
            return Err(Error::TagAlreadyOnEntity {
                id: id.to_string(),
                tag: tag.to_string(),
            });
        }

        // A more specific tag supersedes any of its ancestors already present.
        let ancestors = graph::ancestors(&SqlGraph(&tx), tag)?;
        let retracted: Vec<String> = current.intersection(&ancestors).cloned().collect();
        for old in &retracted {
            tx.execute(
                "DELETE FROM entity_tags WHERE entity_id = ?1 AND tag = ?2",
                params![id, old],
            )?;
            current.remove(old);
        }

        tx.execute(
            "INSERT INTO entity_tags (entity_id, tag) VALUES (?1, ?2)",
            params![id, tag],
        )?;
        current.insert(tag.to_string());

        tx.commit()?;

        if !retracted.is_empty() {
            tracing::debug!(entity = id, tag, ?retracted, "retracted ancestor tags");
        }
        Ok(current)
    }

    fn remove_entity_tag(&self, owner: &str, id: &str, tag: &str) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        require_owned(&tx, owner, id)?;
        require_tag(&tx, tag)?;

        let rows = tx.execute(
            "DELETE FROM entity_tags WHERE entity_id = ?1 AND tag = ?2",
            params![id, tag],
        )?;
        if rows == 0 {
            return Err(Error::tag_not_on_entity(id, tag));
        }

        tx.commit()?;
        Ok(())
    }

    fn get_entity_tags(&self, owner: &str, id: &str) -> Result<BTreeSet<String>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        require_owned(&tx, owner, id)?;
        entity_tags(&tx, id)
    }

    fn retrieve(
        &self,
        owner: &str,
        operator: RetrievalOperator,
        tags: &[String],
    ) -> Result<BTreeSet<String>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let graph = SqlGraph(&tx);
        let mut groups = Vec::with_capacity(tags.len());
        for tag in tags {
            require_tag(&tx, tag)?;
            groups.push(graph::descendants(&graph, tag)?);
        }

        Ok(owned_entities(&tx, owner)?
            .into_iter()
            .filter(|e| graph::matches(operator, &groups, &e.tags))
            .map(|e| e.id)
            .collect())
    }
}

impl UserStore for SqliteStore {
    fn create_user(&self, user: &User) -> Result<()> {
        insert_user(&self.conn(), user)
    }

    fn get_user(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT username, password_hash, role, created_at FROM users WHERE username = ?1",
            params![username],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT username, password_hash, role, created_at FROM users ORDER BY username",
        )?;
        let rows = stmt.query_map([], user_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn delete_user(&self, username: &str) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        require_other_admin(&tx, username)?;
        tx.execute("DELETE FROM users WHERE username = ?1", params![username])?;
        tx.execute("DELETE FROM entities WHERE owner = ?1", params![username])?;

        tx.commit()?;
        Ok(())
    }

    fn set_role(&self, username: &str, role: Role) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        if role != Role::Admin {
            require_other_admin(&tx, username)?;
        }
        let rows = tx.execute(
            "UPDATE users SET role = ?1 WHERE username = ?2",
            params![role.as_str(), username],
        )?;
        if rows == 0 {
            return Err(Error::UserNotFound(username.to_string()));
        }

        tx.commit()?;
        Ok(())
    }

    fn has_admin(&self) -> Result<bool> {
        let conn = self.conn();
        let count: i32 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE role = ?1",
            params![Role::Admin.as_str()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn create_account_request(&self, request: &AccountRequest) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        if user_exists(&tx, &request.username)? {
            return Err(Error::UsernameInUse(request.username.clone()));
        }

        let result = tx.execute(
            "INSERT INTO account_requests (username, password_hash, requested_at)
             VALUES (?1, ?2, ?3)",
            params![
                request.username,
                request.password_hash,
                format_datetime(&request.requested_at),
            ],
        );
        match result {
            Ok(_) => {}
            Err(e) if is_constraint_violation(&e) => {
                return Err(Error::UsernameInUse(request.username.clone()));
            }
            Err(e) => return Err(Error::from(e)),
        }

        tx.commit()?;
        Ok(())
    }

    fn list_account_requests(&self) -> Result<Vec<AccountRequest>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT username, password_hash, requested_at
             FROM account_requests ORDER BY requested_at, username",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(AccountRequest {
                username: row.get(0)?,
                password_hash: row.get(1)?,
                requested_at: parse_datetime(&row.get::<_, String>(2)?),
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn accept_account_request(&self, username: &str) -> Result<User> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let password_hash: String = tx
            .query_row(
                "SELECT password_hash FROM account_requests WHERE username = ?1",
                params![username],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| Error::AccountRequestNotFound(username.to_string()))?;

        let user = User {
            username: username.to_string(),
            password_hash,
            role: Role::User,
            created_at: Utc::now(),
        };
        insert_user(&tx, &user)?;
        tx.execute(
            "DELETE FROM account_requests WHERE username = ?1",
            params![username],
        )?;

        tx.commit()?;
        Ok(user)
    }
}
