pub const SCHEMA: &str = r#"
-- Tags are global and identified by name
CREATE TABLE IF NOT EXISTS tags (
    name TEXT PRIMARY KEY,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Inheritance edges: child is more specific than parent
CREATE TABLE IF NOT EXISTS tag_children (
    parent TEXT NOT NULL REFERENCES tags(name) ON DELETE CASCADE,
    child TEXT NOT NULL REFERENCES tags(name) ON DELETE CASCADE,
    PRIMARY KEY (parent, child)
);

-- User accounts (password_hash is argon2id PHC string)
CREATE TABLE IF NOT EXISTS users (
    username TEXT PRIMARY KEY,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'USER',
    created_at TEXT DEFAULT (datetime('now'))
);

-- Pending account requests awaiting admin approval
CREATE TABLE IF NOT EXISTS account_requests (
    username TEXT PRIMARY KEY,
    password_hash TEXT NOT NULL,
    requested_at TEXT DEFAULT (datetime('now'))
);

-- Entities are owner-scoped opaque resources
CREATE TABLE IF NOT EXISTS entities (
    id TEXT PRIMARY KEY,
    owner TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Most-specific tags currently assigned to each entity
CREATE TABLE IF NOT EXISTS entity_tags (
    entity_id TEXT NOT NULL REFERENCES entities(id) ON DELETE CASCADE,
    tag TEXT NOT NULL REFERENCES tags(name) ON DELETE CASCADE,
    PRIMARY KEY (entity_id, tag)
);

CREATE INDEX IF NOT EXISTS idx_tag_children_child ON tag_children(child);
CREATE INDEX IF NOT EXISTS idx_entities_owner ON entities(owner);
CREATE INDEX IF NOT EXISTS idx_entity_tags_tag ON entity_tags(tag);
"#;
