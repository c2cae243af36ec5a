//! Shared traversal utilities: hard bounds, the on-path set used for loop
//! detection, call-site grouping, and a per-request entity cache.
//!
//! Nothing here is global. Each traversal call builds its own instances and
//! drops them when it returns.

use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::graph::store::{CallNeighbor, GraphStore};
use crate::types::Entity;

/// Absolute ceiling on any traversal depth, regardless of configuration.
pub const HARD_MAX_DEPTH: u32 = 64;

/// Absolute ceiling on the number of nodes a single traversal may emit.
pub const HARD_MAX_NODES: usize = 50_000;

// ---------------------------------------------------------------------------
// PathSet
// ---------------------------------------------------------------------------

/// The entities on the current root-to-node path, with O(1) membership.
#[derive(Debug, Default)]
pub struct PathSet {
    stack: Vec<i64>,
    members: HashSet<i64>,
}

impl PathSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `id`; returns `false` (and leaves the path unchanged) if it is
    /// already on the path.
    pub fn enter(&mut self, id: i64) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.stack.push(id);
        true
    }

    /// Pop the most recently entered id.
    pub fn leave(&mut self) {
        if let Some(id) = self.stack.pop() {
            self.members.remove(&id);
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.members.contains(&id)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

// ---------------------------------------------------------------------------
// NodeBudget
// ---------------------------------------------------------------------------

/// Counts emitted nodes against a ceiling.
#[derive(Debug, Clone, Copy)]
pub struct NodeBudget {
    limit: usize,
    used: usize,
}

impl NodeBudget {
    /// `limit` is clamped to [`HARD_MAX_NODES`]; zero means the hard maximum.
    pub fn new(limit: usize) -> Self {
        let limit = if limit == 0 { HARD_MAX_NODES } else { limit.min(HARD_MAX_NODES) };
        Self { limit, used: 0 }
    }

    /// Reserve one node; `false` once the budget is spent.
    pub fn take(&mut self) -> bool {
        if self.used >= self.limit {
            return false;
        }
        self.used += 1;
        true
    }

    pub fn exhausted(&self) -> bool {
        self.used >= self.limit
    }

    pub fn used(&self) -> usize {
        self.used
    }
}

/// Clamp a requested depth against a configured ceiling and the hard one.
/// A request of zero means "as deep as allowed".
pub fn clamp_depth(requested: u32, ceiling: u32) -> u32 {
    let ceiling = ceiling.clamp(1, HARD_MAX_DEPTH);
    if requested == 0 {
        ceiling
    } else {
        requested.min(ceiling)
    }
}

// ---------------------------------------------------------------------------
// Call-site grouping
// ---------------------------------------------------------------------------

/// All call sites from one node to one neighbor, collapsed into one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedNeighbor {
    pub entity_id: Option<i64>,
    pub symbol: String,
    pub lines: Vec<u32>,
}

/// Collapse repeated edges to the same endpoint, keeping first-seen order.
///
/// Resolved neighbors group by entity id; unresolved ones by symbol text.
pub fn group_by_endpoint(neighbors: Vec<CallNeighbor>) -> Vec<GroupedNeighbor> {
    let mut index: HashMap<(Option<i64>, Option<String>), usize> = HashMap::new();
    let mut grouped: Vec<GroupedNeighbor> = Vec::new();
    for n in neighbors {
        let key = match n.entity_id {
            Some(id) => (Some(id), None),
            None => (None, Some(n.symbol.clone())),
        };
        match index.get(&key) {
            Some(&pos) => grouped[pos].lines.push(n.line),
            None => {
                index.insert(key, grouped.len());
                grouped.push(GroupedNeighbor {
                    entity_id: n.entity_id,
                    symbol: n.symbol,
                    lines: vec![n.line],
                });
            }
        }
    }
    grouped
}

// ---------------------------------------------------------------------------
// EntityCache
// ---------------------------------------------------------------------------

/// Request-scoped memo of entity lookups.
pub struct EntityCache<'a> {
    store: &'a GraphStore,
    entries: HashMap<i64, Option<Entity>>,
}

impl<'a> EntityCache<'a> {
    pub fn new(store: &'a GraphStore) -> Self {
        Self {
            store,
            entries: HashMap::new(),
        }
    }

    pub fn get(&mut self, id: i64) -> Result<Option<&Entity>> {
        if !self.entries.contains_key(&id) {
            let entity = self.store.get_entity(id)?;
            self.entries.insert(id, entity);
        }
        Ok(self.entries.get(&id).and_then(Option::as_ref))
    }
}
