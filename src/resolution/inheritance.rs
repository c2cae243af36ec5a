//! Post-import inheritance resolution.
//!
//! Extraction stores every heritage edge with `parent_entity_id = NULL`
//! because the parent may be declared later in the same file, in a file not
//! yet parsed, or outside the project entirely. Once all of a project's
//! entities exist, one set-oriented `UPDATE` links each NULL-parent edge to
//! a type entity of the same project whose symbol equals `parent_symbol`.
//!
//! # Rules
//!
//! - Only `class`, `struct`, `interface`, and `trait` entities can be parents.
//! - Ties go to the lowest entity id.
//! - A declaration never resolves to itself (`class Model(Model)` picks
//!   another `Model` or stays unresolved).
//! - Rows with no match keep `parent_entity_id = NULL`; that is a valid
//!   terminal state for external bases.
//! - Only NULL-parent rows are touched, so a second run updates nothing.

use rusqlite::params;
use serde::Serialize;

use crate::error::Result;
use crate::graph::store::GraphStore;

/// Outcome of one resolution pass over a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionReport {
    /// Edges linked by this pass.
    pub resolved: usize,
    /// Edges still without a parent entity afterwards.
    pub unresolved: usize,
}

const RESOLVE_SQL: &str = "\
UPDATE inheritance
SET parent_entity_id = (
  SELECT MIN(e.id) FROM entities e
  WHERE e.project_id = ?1
    AND e.symbol = inheritance.parent_symbol
    AND e.type IN ('class', 'struct', 'interface', 'trait')
    AND e.id <> inheritance.child_entity_id
)
WHERE parent_entity_id IS NULL
  AND child_entity_id IN (SELECT id FROM entities WHERE project_id = ?1)
  AND EXISTS (
    SELECT 1 FROM entities e
    WHERE e.project_id = ?1
      AND e.symbol = inheritance.parent_symbol
      AND e.type IN ('class', 'struct', 'interface', 'trait')
      AND e.id <> inheritance.child_entity_id
  )";

const COUNT_UNRESOLVED_SQL: &str = "\
SELECT count(*) FROM inheritance
WHERE parent_entity_id IS NULL
  AND child_entity_id IN (SELECT id FROM entities WHERE project_id = ?1)";

/// Link every unresolved inheritance edge of `project_id` that has a
/// matching type entity.
pub fn resolve_inheritance(store: &GraphStore, project_id: i64) -> Result<ResolutionReport> {
    let tx = store.conn.unchecked_transaction()?;
    let resolved = tx.prepare_cached(RESOLVE_SQL)?.execute(params![project_id])?;
    let unresolved: i64 = tx
        .prepare_cached(COUNT_UNRESOLVED_SQL)?
        .query_row(params![project_id], |row| row.get(0))?;
    tx.commit()?;

    tracing::debug!(project_id, resolved, unresolved, "inheritance resolution pass");
    Ok(ResolutionReport {
        resolved,
        unresolved: unresolved as usize,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
