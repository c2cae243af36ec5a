//! SQLite schema initialization for symgraph.
//!
//! Four tables: `projects`, `entities` (declarations), `relationships`
//! (call edges), and `inheritance` (child → parent edges whose parent may be
//! unresolved). Relationship and inheritance rows are rebuilt wholesale on
//! every project refresh; entities are upserted.

use rusqlite::Connection;

// ---------------------------------------------------------------------------
// DDL constants, executed one statement at a time so a failure points at
// the offending table.
// ---------------------------------------------------------------------------

const CREATE_PROJECTS: &str = "\
CREATE TABLE IF NOT EXISTS projects (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL UNIQUE,
  root_path TEXT NOT NULL,
  generation INTEGER NOT NULL DEFAULT 0
)";

const CREATE_ENTITIES: &str = "\
CREATE TABLE IF NOT EXISTS entities (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  project_id INTEGER NOT NULL,
  language TEXT NOT NULL,
  symbol TEXT NOT NULL,
  type TEXT NOT NULL,
  filename TEXT NOT NULL,
  start_line INTEGER NOT NULL,
  end_line INTEGER NOT NULL,
  source TEXT,
  generation INTEGER NOT NULL DEFAULT 0,
  UNIQUE (project_id, language, symbol, type, filename)
)";

const CREATE_RELATIONSHIPS: &str = "\
CREATE TABLE IF NOT EXISTS relationships (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  project_id INTEGER NOT NULL,
  caller_id INTEGER NOT NULL,
  callee_id INTEGER,
  callee_symbol TEXT NOT NULL,
  line INTEGER NOT NULL DEFAULT 0,
  comment TEXT
)";

const CREATE_INHERITANCE: &str = "\
CREATE TABLE IF NOT EXISTS inheritance (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  child_entity_id INTEGER NOT NULL,
  parent_entity_id INTEGER,
  parent_symbol TEXT NOT NULL,
  relationship_type TEXT NOT NULL
    CHECK (relationship_type IN ('extends', 'implements', 'embeds', 'mixin', 'trait'))
)";

// Indexes ----------------------------------------------------------------

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_entities_symbol ON entities(project_id, symbol)",
    "CREATE INDEX IF NOT EXISTS idx_entities_type ON entities(project_id, type)",
    "CREATE INDEX IF NOT EXISTS idx_relationships_project ON relationships(project_id)",
    "CREATE INDEX IF NOT EXISTS idx_relationships_caller ON relationships(caller_id)",
    "CREATE INDEX IF NOT EXISTS idx_relationships_callee ON relationships(callee_id)",
    "CREATE INDEX IF NOT EXISTS idx_inheritance_child ON inheritance(child_entity_id)",
    "CREATE INDEX IF NOT EXISTS idx_inheritance_parent ON inheritance(parent_entity_id)",
    "CREATE INDEX IF NOT EXISTS idx_inheritance_symbol ON inheritance(parent_symbol)",
    // Duplicate policy: one row per (child, parent text, relationship type).
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_inheritance_unique \
     ON inheritance(child_entity_id, parent_symbol, relationship_type)",
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Open (or create) the SQLite database at `db_path` and apply the full
/// schema.
///
/// The returned connection has WAL mode and synchronous NORMAL configured.
/// Foreign keys stay off: inheritance rows legitimately point at parents
/// that never become entities.
///
/// # Errors
///
/// Returns a `rusqlite::Error` if the database cannot be opened or any DDL
/// statement fails.
pub fn initialize_database(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;

    // -- Pragmas ----------------------------------------------------------
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "OFF")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    // -- Core tables ------------------------------------------------------
    conn.execute_batch(CREATE_PROJECTS)?;
    conn.execute_batch(CREATE_ENTITIES)?;
    conn.execute_batch(CREATE_RELATIONSHIPS)?;
    conn.execute_batch(CREATE_INHERITANCE)?;

    // -- Indexes ----------------------------------------------------------
    for ddl in CREATE_INDEXES {
        conn.execute_batch(ddl)?;
    }

    tracing::debug!(db_path, "schema initialized");
    Ok(conn)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Connection {
        initialize_database(":memory:").expect("schema creation should succeed on :memory:")
    }

    fn object_exists(conn: &Connection, obj_type: &str, obj_name: &str) -> bool {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = ?1 AND name = ?2",
                rusqlite::params![obj_type, obj_name],
                |row| row.get(0),
            )
            .unwrap();
        count > 0
    }

    #[test]
    fn core_tables_exist() {
        let conn = setup();
        for table in &["projects", "entities", "relationships", "inheritance"] {
            assert!(
                object_exists(&conn, "table", table),
                "table '{table}' should exist"
            );
        }
    }

    #[test]
    fn indexes_exist() {
        let conn = setup();
        for idx in &[
            "idx_entities_symbol",
            "idx_relationships_caller",
            "idx_relationships_callee",
            "idx_inheritance_child",
            "idx_inheritance_parent",
            "idx_inheritance_unique",
        ] {
            assert!(
                object_exists(&conn, "index", idx),
                "index '{idx}' should exist"
            );
        }
    }

    #[test]
    fn schema_is_reapplicable() {
        let conn = setup();
        for ddl in [CREATE_PROJECTS, CREATE_ENTITIES, CREATE_RELATIONSHIPS, CREATE_INHERITANCE] {
            conn.execute_batch(ddl).expect("IF NOT EXISTS DDL should be idempotent");
        }
    }

    #[test]
    fn inheritance_rejects_unknown_relationship_type() {
        let conn = setup();
        let err = conn.execute(
            "INSERT INTO inheritance (child_entity_id, parent_symbol, relationship_type) \
             VALUES (1, 'Base', 'inherits')",
            [],
        );
        assert!(err.is_err(), "CHECK constraint should reject 'inherits'");
    }

    #[test]
    fn inheritance_parent_entity_is_nullable() {
        let conn = setup();
        conn.execute(
            "INSERT INTO inheritance (child_entity_id, parent_symbol, relationship_type) \
             VALUES (1, 'ExternalBase', 'extends')",
            [],
        )
        .unwrap();
        let parent: Option<i64> = conn
            .query_row("SELECT parent_entity_id FROM inheritance", [], |row| row.get(0))
            .unwrap();
        assert_eq!(parent, None);
    }

    #[test]
    fn entity_natural_key_is_unique() {
        let conn = setup();
        let insert = "INSERT INTO entities (project_id, language, symbol, type, filename, start_line, end_line) \
                      VALUES (1, 'java', 'Dog', 'class', 'Dog.java', 1, 10)";
        conn.execute(insert, []).unwrap();
        assert!(conn.execute(insert, []).is_err());
    }

    #[test]
    fn pragmas_are_set() {
        let conn = setup();
        let fk: i64 = conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 0);
        let sync: i64 = conn
            .pragma_query_value(None, "synchronous", |row| row.get(0))
            .unwrap();
        assert_eq!(sync, 1, "synchronous should be NORMAL (1)");
    }
}
