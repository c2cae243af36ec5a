//! SQLite CRUD layer for the symgraph entity, relationship, and inheritance
//! tables.
//!
//! Every query goes through [`Connection::prepare_cached`]. Bulk writes run
//! inside one transaction with one cached statement, so a refresh of a large
//! repository costs a single commit instead of a round trip per row.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::db::converters::{
    row_to_entity, row_to_inheritance_edge, row_to_relationship, ENTITY_COLUMNS,
    INHERITANCE_COLUMNS, RELATIONSHIP_COLUMNS,
};
use crate::config::loader::database_path;
use crate::config::SymGraphConfig;
use crate::db::schema::initialize_database;
use crate::error::{Result, SymGraphError};
use crate::types::{
    Entity, EntityKind, InheritanceEdge, InheritanceRow, NewEntity, NewRelationship, Project,
    Relationship,
};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Aggregate counts for one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub entities: usize,
    pub files: usize,
    pub relationships: usize,
    pub inheritance_edges: usize,
    pub unresolved_parents: usize,
}

/// Outcome of a bulk inheritance-candidate insert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InsertReport {
    /// Rows written.
    pub inserted: usize,
    /// Rows rejected for a missing child id, parent symbol, or relationship type.
    pub dropped: usize,
    /// Valid rows ignored because an identical edge already exists.
    pub duplicates: usize,
}

/// One end of a call edge as seen from a traversal frontier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallNeighbor {
    /// `None` when the call target never matched an entity.
    pub entity_id: Option<i64>,
    pub symbol: String,
    pub line: u32,
}

// ---------------------------------------------------------------------------
// GraphStore
// ---------------------------------------------------------------------------

/// Typed wrapper around the symgraph SQLite database.
pub struct GraphStore {
    pub conn: Connection,
}

impl std::fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphStore").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// SQL constants
// ---------------------------------------------------------------------------

const UPSERT_PROJECT_SQL: &str = "\
INSERT INTO projects (name, root_path) VALUES (?1, ?2)
ON CONFLICT(name) DO UPDATE SET root_path = excluded.root_path
RETURNING id, name, root_path, generation";

const UPSERT_ENTITY_SQL: &str = "\
INSERT INTO entities (project_id, language, symbol, type, filename, start_line, end_line, source, generation)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
ON CONFLICT(project_id, language, symbol, type, filename) DO UPDATE SET
  start_line = excluded.start_line,
  end_line = excluded.end_line,
  source = excluded.source,
  generation = excluded.generation
RETURNING id";

const INSERT_RELATIONSHIP_SQL: &str = "\
INSERT INTO relationships (project_id, caller_id, callee_id, callee_symbol, line, comment)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

const INSERT_INHERITANCE_SQL: &str = "\
INSERT OR IGNORE INTO inheritance (child_entity_id, parent_entity_id, parent_symbol, relationship_type)
VALUES (?1, NULL, ?2, ?3)";

const DELETE_PROJECT_RELATIONSHIPS_SQL: &str = "\
DELETE FROM relationships WHERE project_id = ?1";

const DELETE_PROJECT_INHERITANCE_SQL: &str = "\
DELETE FROM inheritance
WHERE child_entity_id IN (SELECT id FROM entities WHERE project_id = ?1)";

const CALLEE_NEIGHBORS_SQL: &str = "\
SELECT callee_id, callee_symbol, line
FROM relationships
WHERE caller_id = ?1
ORDER BY line ASC, callee_symbol ASC, id ASC";

const CALLER_NEIGHBORS_SQL: &str = "\
SELECT r.caller_id, e.symbol, r.line
FROM relationships r
JOIN entities e ON e.id = r.caller_id
WHERE r.callee_id = ?1
ORDER BY e.symbol ASC, r.caller_id ASC, r.line ASC";

// ---------------------------------------------------------------------------
// Implementation
// ---------------------------------------------------------------------------

impl GraphStore {
    /// Open (or create) the database at `db_path` and apply the schema.
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = initialize_database(db_path)?;
        Ok(Self { conn })
    }

    /// Open the database `config` points at, creating its directory.
    pub fn open(config: &SymGraphConfig) -> Result<Self> {
        let path = database_path(config);
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let path = path.to_str().ok_or_else(|| {
            SymGraphError::Config(format!("database path {} is not UTF-8", path.display()))
        })?;
        Self::new(path)
    }

    /// Fresh in-memory store with the schema applied.
    pub fn open_in_memory() -> Result<Self> {
        Self::new(":memory:")
    }

    // -------------------------------------------------------------------
    // Projects
    // -------------------------------------------------------------------

    /// Create the project if needed and return it.
    pub fn upsert_project(&self, name: &str, root_path: &str) -> Result<Project> {
        let mut stmt = self.conn.prepare_cached(UPSERT_PROJECT_SQL)?;
        let project = stmt.query_row(params![name, root_path], |row| {
            Ok(Project {
                id: row.get(0)?,
                name: row.get(1)?,
                root_path: row.get(2)?,
                generation: row.get(3)?,
            })
        })?;
        Ok(project)
    }

    /// Look up a project by name.
    pub fn get_project(&self, name: &str) -> Result<Option<Project>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, name, root_path, generation FROM projects WHERE name = ?1",
        )?;
        let project = stmt
            .query_row(params![name], |row| {
                Ok(Project {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    root_path: row.get(2)?,
                    generation: row.get(3)?,
                })
            })
            .optional()?;
        Ok(project)
    }

    /// Bump and return the project's refresh generation.
    pub fn begin_generation(&self, project_id: i64) -> Result<i64> {
        let mut stmt = self.conn.prepare_cached(
            "UPDATE projects SET generation = generation + 1 WHERE id = ?1 RETURNING generation",
        )?;
        stmt.query_row(params![project_id], |row| row.get(0))
            .optional()?
            .ok_or_else(|| SymGraphError::NotFound(format!("project id {project_id}")))
    }

    // -------------------------------------------------------------------
    // Entities
    // -------------------------------------------------------------------

    /// Insert or update a single entity and return its id.
    pub fn upsert_entity(&self, project_id: i64, generation: i64, entity: &NewEntity) -> Result<i64> {
        let mut stmt = self.conn.prepare_cached(UPSERT_ENTITY_SQL)?;
        let id = stmt.query_row(
            params![
                project_id,
                entity.language.as_str(),
                entity.symbol,
                entity.kind.as_str(),
                entity.filename,
                entity.start_line,
                entity.end_line,
                entity.source,
                generation,
            ],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Batch-upsert entities inside one transaction; ids come back in input
    /// order. Entities sharing a natural key collapse onto the same id.
    pub fn upsert_entities(
        &self,
        project_id: i64,
        generation: i64,
        entities: &[NewEntity],
    ) -> Result<Vec<i64>> {
        let tx = self.conn.unchecked_transaction()?;
        let mut ids = Vec::with_capacity(entities.len());
        {
            let mut stmt = tx.prepare_cached(UPSERT_ENTITY_SQL)?;
            for entity in entities {
                let id: i64 = stmt.query_row(
                    params![
                        project_id,
                        entity.language.as_str(),
                        entity.symbol,
                        entity.kind.as_str(),
                        entity.filename,
                        entity.start_line,
                        entity.end_line,
                        entity.source,
                        generation,
                    ],
                    |row| row.get(0),
                )?;
                ids.push(id);
            }
        }
        tx.commit()?;
        Ok(ids)
    }

    /// Delete entities not touched by the current generation, along with any
    /// edge that still references them. Returns the number of entities removed.
    pub fn purge_stale_entities(&self, project_id: i64, generation: i64) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = {
            let stale = "SELECT id FROM entities WHERE project_id = ?1 AND generation < ?2";
            tx.execute(
                &format!(
                    "DELETE FROM relationships WHERE caller_id IN ({stale}) OR callee_id IN ({stale})"
                ),
                params![project_id, generation],
            )?;
            tx.execute(
                &format!(
                    "DELETE FROM inheritance WHERE child_entity_id IN ({stale}) \
                     OR parent_entity_id IN ({stale})"
                ),
                params![project_id, generation],
            )?;
            tx.execute(
                "DELETE FROM entities WHERE project_id = ?1 AND generation < ?2",
                params![project_id, generation],
            )?
        };
        tx.commit()?;
        Ok(removed)
    }

    /// Retrieve a single entity by id.
    pub fn get_entity(&self, id: i64) -> Result<Option<Entity>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("SELECT {ENTITY_COLUMNS} FROM entities WHERE id = ?1"))?;
        Ok(stmt.query_row(params![id], row_to_entity).optional()?)
    }

    /// Entities in `project_id` named `symbol`, restricted to `kinds` when
    /// non-empty. Ordered by id so callers can take the first as the
    /// deterministic winner.
    pub fn find_entities(
        &self,
        project_id: i64,
        symbol: &str,
        kinds: &[EntityKind],
    ) -> Result<Vec<Entity>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {ENTITY_COLUMNS} FROM entities \
             WHERE project_id = ?1 AND symbol = ?2 ORDER BY id ASC"
        ))?;
        let rows = stmt.query_and_then(params![project_id, symbol], row_to_entity)?;
        let entities = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        if kinds.is_empty() {
            return Ok(entities);
        }
        Ok(entities
            .into_iter()
            .filter(|e| kinds.contains(&e.kind))
            .collect())
    }

    /// Every entity in a project, ordered by id.
    pub fn get_project_entities(&self, project_id: i64) -> Result<Vec<Entity>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {ENTITY_COLUMNS} FROM entities WHERE project_id = ?1 ORDER BY id ASC"
        ))?;
        let rows = stmt.query_and_then(params![project_id], row_to_entity)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Into::into)
    }

    // -------------------------------------------------------------------
    // Relationships
    // -------------------------------------------------------------------

    /// Replace every call edge of a project: bulk delete, then bulk insert,
    /// in one transaction. Returns the number of edges written.
    pub fn replace_relationships(
        &self,
        project_id: i64,
        relationships: &[NewRelationship],
    ) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        {
            tx.prepare_cached(DELETE_PROJECT_RELATIONSHIPS_SQL)?
                .execute(params![project_id])?;
            let mut ins = tx.prepare_cached(INSERT_RELATIONSHIP_SQL)?;
            for rel in relationships {
                ins.execute(params![
                    project_id,
                    rel.caller_id,
                    rel.callee_id,
                    rel.callee_symbol,
                    rel.line,
                    rel.comment,
                ])?;
            }
        }
        tx.commit()?;
        Ok(relationships.len())
    }

    /// Outgoing call edges of `entity_id`, ordered by call line.
    pub fn callee_neighbors(&self, entity_id: i64) -> Result<Vec<CallNeighbor>> {
        let mut stmt = self.conn.prepare_cached(CALLEE_NEIGHBORS_SQL)?;
        let rows = stmt.query_map(params![entity_id], |row| {
            Ok(CallNeighbor {
                entity_id: row.get(0)?,
                symbol: row.get(1)?,
                line: row.get(2)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Into::into)
    }

    /// Incoming call edges of `entity_id`, ordered by caller symbol.
    pub fn caller_neighbors(&self, entity_id: i64) -> Result<Vec<CallNeighbor>> {
        let mut stmt = self.conn.prepare_cached(CALLER_NEIGHBORS_SQL)?;
        let rows = stmt.query_map(params![entity_id], |row| {
            Ok(CallNeighbor {
                entity_id: Some(row.get(0)?),
                symbol: row.get(1)?,
                line: row.get(2)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Into::into)
    }

    /// Every call site from `caller_id` to `callee_id`, ordered by line.
    pub fn call_sites(&self, caller_id: i64, callee_id: i64) -> Result<Vec<Relationship>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {RELATIONSHIP_COLUMNS} FROM relationships \
             WHERE caller_id = ?1 AND callee_id = ?2 ORDER BY line ASC, id ASC"
        ))?;
        let rows = stmt.query_and_then(params![caller_id, callee_id], row_to_relationship)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Into::into)
    }

    // -------------------------------------------------------------------
    // Inheritance
    // -------------------------------------------------------------------

    /// Bulk-insert extraction-time candidates with `parent_entity_id = NULL`.
    ///
    /// Malformed rows are counted and skipped; the batch itself never aborts
    /// on them.
    pub fn insert_inheritance_candidates(&self, rows: &[InheritanceRow]) -> Result<InsertReport> {
        let tx = self.conn.unchecked_transaction()?;
        let report = insert_candidates(&tx, rows)?;
        tx.commit()?;
        Ok(report)
    }

    /// Replace every inheritance edge whose child belongs to `project_id`.
    pub fn replace_inheritance(
        &self,
        project_id: i64,
        rows: &[InheritanceRow],
    ) -> Result<InsertReport> {
        let tx = self.conn.unchecked_transaction()?;
        tx.prepare_cached(DELETE_PROJECT_INHERITANCE_SQL)?
            .execute(params![project_id])?;
        let report = insert_candidates(&tx, rows)?;
        tx.commit()?;
        Ok(report)
    }

    /// Every inheritance edge whose child belongs to `project_id`, by id.
    pub fn get_project_inheritance(&self, project_id: i64) -> Result<Vec<InheritanceEdge>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {INHERITANCE_COLUMNS} FROM inheritance \
             WHERE child_entity_id IN (SELECT id FROM entities WHERE project_id = ?1) \
             ORDER BY id ASC"
        ))?;
        let rows = stmt.query_and_then(params![project_id], row_to_inheritance_edge)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Into::into)
    }

    // -------------------------------------------------------------------
    // Aggregates
    // -------------------------------------------------------------------

    /// Counts for one project.
    pub fn get_stats(&self, project_id: i64) -> Result<GraphStats> {
        let count = |sql: &str| -> Result<usize> {
            let n: i64 = self
                .conn
                .prepare_cached(sql)?
                .query_row(params![project_id], |row| row.get(0))?;
            Ok(n as usize)
        };
        Ok(GraphStats {
            entities: count("SELECT count(*) FROM entities WHERE project_id = ?1")?,
            files: count("SELECT count(DISTINCT filename) FROM entities WHERE project_id = ?1")?,
            relationships: count("SELECT count(*) FROM relationships WHERE project_id = ?1")?,
            inheritance_edges: count(
                "SELECT count(*) FROM inheritance \
                 WHERE child_entity_id IN (SELECT id FROM entities WHERE project_id = ?1)",
            )?,
            unresolved_parents: count(
                "SELECT count(*) FROM inheritance \
                 WHERE parent_entity_id IS NULL \
                   AND child_entity_id IN (SELECT id FROM entities WHERE project_id = ?1)",
            )?,
        })
    }
}

fn insert_candidates(conn: &Connection, rows: &[InheritanceRow]) -> Result<InsertReport> {
    let mut report = InsertReport::default();
    let mut stmt = conn.prepare_cached(INSERT_INHERITANCE_SQL)?;
    for row in rows {
        let (Some(child), Some(parent), Some(rel)) = (
            row.child_entity_id,
            row.parent_symbol.as_deref().map(str::trim).filter(|s| !s.is_empty()),
            row.relationship_type,
        ) else {
            report.dropped += 1;
            continue;
        };
        match stmt.execute(params![child, parent, rel.as_str()])? {
            0 => report.duplicates += 1,
            _ => report.inserted += 1,
        }
    }
    if report.dropped > 0 {
        tracing::warn!(dropped = report.dropped, "dropped malformed inheritance candidates");
    }
    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Language, RelationshipType};

    fn setup() -> (GraphStore, Project) {
        let store = GraphStore::open_in_memory().unwrap();
        let project = store.upsert_project("demo", "/tmp/demo").unwrap();
        (store, project)
    }

    fn class(symbol: &str, file: &str) -> NewEntity {
        NewEntity {
            language: Language::Java,
            symbol: symbol.to_string(),
            kind: EntityKind::Class,
            filename: file.to_string(),
            start_line: 1,
            end_line: 10,
            source: None,
        }
    }

    fn candidate(child: Option<i64>, parent: Option<&str>, rel: Option<RelationshipType>) -> InheritanceRow {
        InheritanceRow {
            child_entity_id: child,
            parent_symbol: parent.map(str::to_string),
            relationship_type: rel,
        }
    }

    #[test]
    fn upsert_project_is_stable() {
        let (store, project) = setup();
        let again = store.upsert_project("demo", "/elsewhere").unwrap();
        assert_eq!(project.id, again.id);
        assert_eq!(again.root_path, "/elsewhere");
        assert!(store.get_project("missing").unwrap().is_none());
    }

    #[test]
    fn begin_generation_increments() {
        let (store, project) = setup();
        assert_eq!(store.begin_generation(project.id).unwrap(), 1);
        assert_eq!(store.begin_generation(project.id).unwrap(), 2);
        assert!(matches!(
            store.begin_generation(9999),
            Err(SymGraphError::NotFound(_))
        ));
    }

    #[test]
    fn upsert_entity_returns_same_id_for_natural_key() {
        let (store, project) = setup();
        let first = store.upsert_entity(project.id, 1, &class("Dog", "Dog.java")).unwrap();
        let mut moved = class("Dog", "Dog.java");
        moved.start_line = 40;
        let second = store.upsert_entity(project.id, 1, &moved).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.get_entity(first).unwrap().unwrap().start_line, 40);
    }

    #[test]
    fn upsert_entities_returns_ids_in_order() {
        let (store, project) = setup();
        let ids = store
            .upsert_entities(project.id, 1, &[class("A", "a.java"), class("B", "b.java")])
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(store.get_entity(ids[0]).unwrap().unwrap().symbol, "A");
        assert_eq!(store.get_entity(ids[1]).unwrap().unwrap().symbol, "B");
    }

    #[test]
    fn find_entities_filters_kinds_and_orders_by_id() {
        let (store, project) = setup();
        let a = store.upsert_entity(project.id, 1, &class("Shape", "a.java")).unwrap();
        let b = store.upsert_entity(project.id, 1, &class("Shape", "b.java")).unwrap();
        let mut func = class("Shape", "c.java");
        func.kind = EntityKind::Function;
        store.upsert_entity(project.id, 1, &func).unwrap();

        let classes = store.find_entities(project.id, "Shape", &[EntityKind::Class]).unwrap();
        assert_eq!(classes.iter().map(|e| e.id).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(store.find_entities(project.id, "Shape", &[]).unwrap().len(), 3);
    }

    #[test]
    fn purge_removes_stale_entities_and_their_edges() {
        let (store, project) = setup();
        let old = store.upsert_entity(project.id, 1, &class("Old", "old.java")).unwrap();
        let kept = store.upsert_entity(project.id, 2, &class("Kept", "kept.java")).unwrap();
        store
            .insert_inheritance_candidates(&[candidate(Some(old), Some("Kept"), Some(RelationshipType::Extends))])
            .unwrap();

        let removed = store.purge_stale_entities(project.id, 2).unwrap();
        assert_eq!(removed, 1);
        assert!(store.get_entity(old).unwrap().is_none());
        assert!(store.get_entity(kept).unwrap().is_some());
        assert!(store.get_project_inheritance(project.id).unwrap().is_empty());
    }

    #[test]
    fn replace_relationships_is_wholesale() {
        let (store, project) = setup();
        let a = store.upsert_entity(project.id, 1, &class("a", "x.java")).unwrap();
        let b = store.upsert_entity(project.id, 1, &class("b", "x.java")).unwrap();
        let edge = |line| NewRelationship {
            caller_id: a,
            callee_id: Some(b),
            callee_symbol: "b".into(),
            line,
            comment: None,
        };
        store.replace_relationships(project.id, &[edge(3), edge(7)]).unwrap();
        assert_eq!(store.call_sites(a, b).unwrap().len(), 2);

        store.replace_relationships(project.id, &[edge(9)]).unwrap();
        let sites = store.call_sites(a, b).unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].line, 9);
    }

    #[test]
    fn neighbors_keep_unresolved_callees() {
        let (store, project) = setup();
        let a = store.upsert_entity(project.id, 1, &class("a", "x.java")).unwrap();
        store
            .replace_relationships(
                project.id,
                &[NewRelationship {
                    caller_id: a,
                    callee_id: None,
                    callee_symbol: "println".into(),
                    line: 2,
                    comment: None,
                }],
            )
            .unwrap();
        let callees = store.callee_neighbors(a).unwrap();
        assert_eq!(callees.len(), 1);
        assert_eq!(callees[0].entity_id, None);
        assert_eq!(callees[0].symbol, "println");
    }

    #[test]
    fn candidate_insert_counts_dropped_and_duplicate_rows() {
        let (store, project) = setup();
        let dog = store.upsert_entity(project.id, 1, &class("Dog", "Dog.java")).unwrap();
        let report = store
            .insert_inheritance_candidates(&[
                candidate(Some(dog), Some("Animal"), Some(RelationshipType::Extends)),
                candidate(Some(dog), Some("Animal"), Some(RelationshipType::Extends)),
                candidate(None, Some("Animal"), Some(RelationshipType::Extends)),
                candidate(Some(dog), None, Some(RelationshipType::Extends)),
                candidate(Some(dog), Some("  "), Some(RelationshipType::Extends)),
                candidate(Some(dog), Some("Runnable"), None),
            ])
            .unwrap();
        assert_eq!(
            report,
            InsertReport {
                inserted: 1,
                dropped: 4,
                duplicates: 1
            }
        );
        let edges = store.get_project_inheritance(project.id).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].parent_entity_id, None);
    }

    #[test]
    fn stats_count_per_project() {
        let (store, project) = setup();
        let other = store.upsert_project("other", "/tmp/other").unwrap();
        let dog = store.upsert_entity(project.id, 1, &class("Dog", "Dog.java")).unwrap();
        store.upsert_entity(other.id, 1, &class("Cat", "Cat.java")).unwrap();
        store
            .replace_inheritance(
                project.id,
                &[candidate(Some(dog), Some("Animal"), Some(RelationshipType::Extends))],
            )
            .unwrap();

        let stats = store.get_stats(project.id).unwrap();
        assert_eq!(stats.entities, 1);
        assert_eq!(stats.files, 1);
        assert_eq!(stats.inheritance_edges, 1);
        assert_eq!(stats.unresolved_parents, 1);
        assert_eq!(stats.relationships, 0);
    }
}
