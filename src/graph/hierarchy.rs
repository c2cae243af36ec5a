//! Inheritance hierarchy queries and analytics.
//!
//! Reads only; the edges are written by the refresh pipeline and linked by
//! [`crate::resolution::inheritance`].

use std::collections::{BTreeMap, HashMap, HashSet};

use rusqlite::params;
use serde::Serialize;

use crate::db::converters::{row_to_inheritance_edge, INHERITANCE_COLUMNS};
use crate::error::Result;
use crate::graph::store::GraphStore;
use crate::types::{InheritanceEdge, RelationshipType};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// One parent of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentLink {
    pub relationship_type: RelationshipType,
    pub parent_symbol: String,
    /// `None` while the parent is unresolved.
    pub parent_entity_id: Option<i64>,
}

/// One child of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildLink {
    pub child_entity_id: i64,
    pub child_symbol: String,
    pub relationship_type: RelationshipType,
}

/// Project-wide hierarchy summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InheritanceStats {
    /// Edge count per relationship type, resolved or not.
    pub by_type: BTreeMap<String, usize>,
    /// Classes, structs, and interfaces that have no parent edge at all.
    /// Traits (and Ruby modules) are never roots.
    pub root_class_count: usize,
    /// Longest upward chain of resolved edges, counted in declarations.
    /// Traits count here, unlike in `root_class_count`.
    pub max_hierarchy_depth: usize,
    pub total_edges: usize,
    pub unresolved_edges: usize,
}

// ---------------------------------------------------------------------------
// SQL
// ---------------------------------------------------------------------------

const CHILDREN_BY_ID_SQL: &str = "\
SELECT i.child_entity_id, e.symbol, i.relationship_type
FROM inheritance i JOIN entities e ON e.id = i.child_entity_id
WHERE i.parent_entity_id = ?1
ORDER BY i.id ASC";

const CHILDREN_BY_SYMBOL_SQL: &str = "\
SELECT i.child_entity_id, e.symbol, i.relationship_type
FROM inheritance i JOIN entities e ON e.id = i.child_entity_id
WHERE e.project_id = ?1 AND i.parent_symbol = ?2
ORDER BY i.id ASC";

const COUNT_BY_TYPE_SQL: &str = "\
SELECT relationship_type, count(*) FROM inheritance
WHERE child_entity_id IN (SELECT id FROM entities WHERE project_id = ?1)
GROUP BY relationship_type";

const COUNT_ROOTS_SQL: &str = "\
SELECT count(*) FROM entities e
WHERE e.project_id = ?1
  AND e.type IN ('class', 'struct', 'interface')
  AND NOT EXISTS (SELECT 1 FROM inheritance i WHERE i.child_entity_id = e.id)";

fn row_to_child(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChildLink> {
    let rel: String = row.get(2)?;
    Ok(ChildLink {
        child_entity_id: row.get(0)?,
        child_symbol: row.get(1)?,
        relationship_type: RelationshipType::from_str_loose(&rel).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                format!("unknown relationship type '{rel}'").into(),
            )
        })?,
    })
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Hierarchy reads over a [`GraphStore`].
pub struct Hierarchy<'a> {
    store: &'a GraphStore,
}

impl<'a> Hierarchy<'a> {
    pub fn new(store: &'a GraphStore) -> Self {
        Self { store }
    }

    /// Parents of `child_entity_id` in extraction order. Empty for a
    /// declaration with no heritage.
    pub fn get_parents(&self, child_entity_id: i64) -> Result<Vec<ParentLink>> {
        let mut stmt = self.store.conn.prepare_cached(&format!(
            "SELECT {INHERITANCE_COLUMNS} FROM inheritance \
             WHERE child_entity_id = ?1 ORDER BY id ASC"
        ))?;
        let rows = stmt.query_and_then(params![child_entity_id], row_to_inheritance_edge)?;
        let mut parents = Vec::new();
        for edge in rows {
            let edge = edge?;
            parents.push(ParentLink {
                relationship_type: edge.relationship_type,
                parent_symbol: edge.parent_symbol,
                parent_entity_id: edge.parent_entity_id,
            });
        }
        Ok(parents)
    }

    /// Children linked to `parent_entity_id` through resolved edges.
    pub fn get_children(&self, parent_entity_id: i64) -> Result<Vec<ChildLink>> {
        let mut stmt = self.store.conn.prepare_cached(CHILDREN_BY_ID_SQL)?;
        let rows = stmt.query_and_then(params![parent_entity_id], row_to_child)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Into::into)
    }

    /// Children naming `parent_symbol`, resolved or not. Finds subclasses of
    /// external bases that have no entity of their own.
    pub fn get_children_by_symbol(
        &self,
        project_id: i64,
        parent_symbol: &str,
    ) -> Result<Vec<ChildLink>> {
        let mut stmt = self.store.conn.prepare_cached(CHILDREN_BY_SYMBOL_SQL)?;
        let rows = stmt.query_and_then(params![project_id, parent_symbol], row_to_child)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Into::into)
    }

    /// Every inheritance edge of the project.
    pub fn get_project_hierarchy(&self, project_id: i64) -> Result<Vec<InheritanceEdge>> {
        self.store.get_project_inheritance(project_id)
    }

    pub fn get_inheritance_stats(&self, project_id: i64) -> Result<InheritanceStats> {
        let conn = &self.store.conn;
        let mut stats = InheritanceStats::default();

        {
            let mut stmt = conn.prepare_cached(COUNT_BY_TYPE_SQL)?;
            let rows = stmt.query_map(params![project_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in rows {
                let (rel, n) = row?;
                stats.total_edges += n as usize;
                stats.by_type.insert(rel, n as usize);
            }
        }

        let roots: i64 = conn
            .prepare_cached(COUNT_ROOTS_SQL)?
            .query_row(params![project_id], |row| row.get(0))?;
        stats.root_class_count = roots as usize;

        let edges = self.store.get_project_inheritance(project_id)?;
        stats.unresolved_edges = edges.iter().filter(|e| e.parent_entity_id.is_none()).count();

        let types: Vec<i64> = self
            .store
            .get_project_entities(project_id)?
            .into_iter()
            .filter(|e| e.kind.is_type())
            .map(|e| e.id)
            .collect();
        stats.max_hierarchy_depth = max_depth(&types, &edges);
        Ok(stats)
    }
}

// ---------------------------------------------------------------------------
// Depth
// ---------------------------------------------------------------------------

/// Cap on backtracking steps spent inside cyclic regions, shared by all
/// starts of one [`max_depth`] call.
const CYCLE_SEARCH_BUDGET: usize = 1_000_000;

/// Longest simple upward path through resolved edges, counted in nodes,
/// starting from any of `entities`. Zero for an empty entity set.
///
/// Nodes that cannot reach a cycle are peeled off in topological order and
/// get an exact height in one linear pass. Only starts that can reach a
/// cycle fall back to a backtracking search over simple paths, bounded by
/// [`CYCLE_SEARCH_BUDGET`].
fn max_depth(entities: &[i64], edges: &[InheritanceEdge]) -> usize {
    let mut parents: HashMap<i64, Vec<i64>> = HashMap::new();
    let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
    let mut nodes: HashSet<i64> = entities.iter().copied().collect();
    for edge in edges {
        if let Some(parent) = edge.parent_entity_id {
            let ups = parents.entry(edge.child_entity_id).or_default();
            if !ups.contains(&parent) {
                ups.push(parent);
                children.entry(parent).or_default().push(edge.child_entity_id);
            }
            nodes.insert(edge.child_entity_id);
            nodes.insert(parent);
        }
    }

    let height = acyclic_heights(&nodes, &parents, &children);

    let mut budget = CYCLE_SEARCH_BUDGET;
    let mut best = 0;
    for &start in entities {
        let depth = match height.get(&start) {
            Some(&h) => h,
            None => longest_simple_path(start, &parents, &height, &mut budget),
        };
        best = best.max(depth);
    }
    if budget == 0 {
        tracing::warn!(
            steps = CYCLE_SEARCH_BUDGET,
            "hierarchy depth search hit its budget; reporting a lower bound"
        );
    }
    best
}

/// Heights of every node whose ancestors contain no cycle. Roots first; a
/// node is settled once all of its parents are.
fn acyclic_heights(
    nodes: &HashSet<i64>,
    parents: &HashMap<i64, Vec<i64>>,
    children: &HashMap<i64, Vec<i64>>,
) -> HashMap<i64, usize> {
    let mut pending: HashMap<i64, usize> = nodes
        .iter()
        .map(|&n| (n, parents.get(&n).map_or(0, Vec::len)))
        .collect();
    let mut ready: Vec<i64> = pending
        .iter()
        .filter(|&(_, &n)| n == 0)
        .map(|(&id, _)| id)
        .collect();

    let mut height = HashMap::with_capacity(nodes.len());
    while let Some(node) = ready.pop() {
        let above = parents
            .get(&node)
            .into_iter()
            .flatten()
            .filter_map(|p| height.get(p))
            .max()
            .copied()
            .unwrap_or(0);
        height.insert(node, above + 1);
        for child in children.get(&node).into_iter().flatten() {
            if let Some(left) = pending.get_mut(child) {
                *left -= 1;
                if *left == 0 {
                    ready.push(*child);
                }
            }
        }
    }
    height
}

/// Exhaustive iterative search from a start that reaches a cycle. Settled
/// nodes contribute their exact height, since none of their ancestors can
/// be on the current path.
fn longest_simple_path(
    start: i64,
    parents: &HashMap<i64, Vec<i64>>,
    height: &HashMap<i64, usize>,
    budget: &mut usize,
) -> usize {
    let mut on_path = HashSet::from([start]);
    let mut stack: Vec<(i64, usize)> = vec![(start, 0)];
    let mut best = 1;

    while let Some(&(node, next)) = stack.last() {
        let ups = parents.get(&node).map(Vec::as_slice).unwrap_or(&[]);
        let Some(&up) = ups.get(next) else {
            on_path.remove(&node);
            stack.pop();
            continue;
        };
        if let Some(top) = stack.last_mut() {
            top.1 += 1;
        }
        if let Some(&h) = height.get(&up) {
            best = best.max(stack.len() + h);
        } else if *budget > 0 && on_path.insert(up) {
            *budget -= 1;
            stack.push((up, 0));
            best = best.max(stack.len());
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
