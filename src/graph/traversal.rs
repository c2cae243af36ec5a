//! Call-graph traversal: caller/callee trees, the bidirectional call graph,
//! and the reverse (callers-only) call graph.
//!
//! All traversals are read-only and keep their state (on-path set, node
//! budget, entity cache) local to one call, so independent queries can run
//! in parallel on separate connections. Every traversal is bounded by a
//! depth ceiling and a node budget that configuration can lower but never
//! remove.

use std::collections::{HashMap, VecDeque};

use serde::Serialize;

use crate::config::{SymGraphConfig, TraversalConfig};
use crate::error::Result;
use crate::graph::store::{CallNeighbor, GraphStore};
use crate::graph::visit::{clamp_depth, group_by_endpoint, EntityCache, NodeBudget, PathSet};
use crate::types::{Entity, EntityKind};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Which edges a traversal follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Walk incoming call edges: who calls this?
    Callers,
    /// Walk outgoing call edges: what does this call?
    Callees,
}

/// Either a result or a marker that the requested root symbol has no
/// entity in the project. An existing root with no edges is `Found`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum TraversalOutcome<T> {
    Found(T),
    RootNotFound { symbol: String },
}

impl<T> TraversalOutcome<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::RootNotFound { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RootNotFound { .. })
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// One node of a caller or callee tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<i64>,
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntityKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_line: Option<u32>,
    /// Lines of every call site linking this node to its tree parent.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub call_lines: Vec<u32>,
    pub children: Vec<TreeNode>,
    /// Already on the current path; not expanded.
    #[serde(rename = "loop", skip_serializing_if = "is_false")]
    pub is_loop: bool,
    /// Has unexpanded children (depth limit or node budget).
    #[serde(skip_serializing_if = "is_false")]
    pub truncated: bool,
    /// Call target with no matching entity.
    #[serde(skip_serializing_if = "is_false")]
    pub not_found: bool,
}

impl TreeNode {
    fn from_entity(entity: &Entity, call_lines: Vec<u32>) -> Self {
        Self {
            entity_id: Some(entity.id),
            symbol: entity.symbol.clone(),
            kind: Some(entity.kind),
            filename: Some(entity.filename.clone()),
            start_line: Some(entity.start_line),
            call_lines,
            children: Vec::new(),
            is_loop: false,
            truncated: false,
            not_found: false,
        }
    }

    fn unresolved(symbol: String, call_lines: Vec<u32>) -> Self {
        Self {
            entity_id: None,
            symbol,
            kind: None,
            filename: None,
            start_line: None,
            call_lines,
            children: Vec::new(),
            is_loop: false,
            truncated: false,
            not_found: true,
        }
    }
}

/// A rooted caller or callee tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallTree {
    pub direction: Direction,
    /// Effective depth after clamping.
    pub depth: u32,
    pub root: TreeNode,
    pub node_count: usize,
}

/// A node of a flat call graph, labelled with its hop distance from the
/// root along each direction it was reached by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: i64,
    pub symbol: String,
    pub kind: EntityKind,
    pub filename: String,
    pub start_line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller_depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callee_depth: Option<u32>,
}

/// A deduplicated caller → callee edge.
///
/// `caller_depth` is set when the edge was walked in the caller direction
/// (distance of the caller from the root); `callee_depth` likewise for the
/// callee direction. Clients can drop edges whose label exceeds a shallower
/// depth without refetching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub caller_id: i64,
    pub callee_id: i64,
    pub call_lines: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller_depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callee_depth: Option<u32>,
}

/// Flat `{nodes, edges, root}` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallGraph {
    pub root: i64,
    /// Effective depth after clamping.
    pub max_depth: u32,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// The node budget ran out before the frontier was exhausted.
    pub truncated: bool,
}

// ---------------------------------------------------------------------------
// GraphTraversal
// ---------------------------------------------------------------------------

/// Tree and graph builders over a [`GraphStore`].
pub struct GraphTraversal<'a> {
    store: &'a GraphStore,
    limits: TraversalConfig,
}

/// Per-call state for tree construction.
struct TreeWalk<'a> {
    cache: EntityCache<'a>,
    path: PathSet,
    budget: NodeBudget,
    direction: Direction,
    max_depth: u32,
}

impl<'a> GraphTraversal<'a> {
    /// Traversal with default limits.
    pub fn new(store: &'a GraphStore) -> Self {
        Self::with_config(store, TraversalConfig::default())
    }

    /// Traversal with the limits of a loaded config.
    pub fn from_config(store: &'a GraphStore, config: &SymGraphConfig) -> Self {
        Self::with_config(store, config.traversal)
    }

    /// Traversal with explicit limits (clamped to the hard ceilings).
    pub fn with_config(store: &'a GraphStore, limits: TraversalConfig) -> Self {
        Self {
            store,
            limits: limits.clamped(),
        }
    }

    // -------------------------------------------------------------------
    // Root lookup
    // -------------------------------------------------------------------

    /// Pick the entity a symbol query starts from: functions before types,
    /// then lowest id.
    pub fn resolve_root(&self, project_id: i64, symbol: &str) -> Result<Option<Entity>> {
        let candidates = self.store.find_entities(project_id, symbol, &[])?;
        let root = candidates
            .iter()
            .find(|e| e.kind == EntityKind::Function)
            .or_else(|| candidates.first())
            .cloned();
        Ok(root)
    }

    fn neighbors(&self, direction: Direction, entity_id: i64) -> Result<Vec<CallNeighbor>> {
        match direction {
            Direction::Callers => self.store.caller_neighbors(entity_id),
            Direction::Callees => self.store.callee_neighbors(entity_id),
        }
    }

    // -------------------------------------------------------------------
    // Trees
    // -------------------------------------------------------------------

    /// Who calls `symbol`, transitively, up to `depth` levels.
    pub fn build_caller_tree(
        &self,
        project_id: i64,
        symbol: &str,
        depth: u32,
    ) -> Result<TraversalOutcome<CallTree>> {
        self.build_tree(project_id, symbol, Direction::Callers, depth)
    }

    /// What `symbol` calls, transitively, up to `depth` levels.
    pub fn build_callee_tree(
        &self,
        project_id: i64,
        symbol: &str,
        depth: u32,
    ) -> Result<TraversalOutcome<CallTree>> {
        self.build_tree(project_id, symbol, Direction::Callees, depth)
    }

    /// Rooted DFS along one direction.
    ///
    /// `depth` counts levels below the root; zero selects the configured
    /// default. Nodes already on the current path are marked `loop`, nodes
    /// at the depth limit that still have edges are marked `truncated`, and
    /// call targets without an entity are marked `not_found`.
    pub fn build_tree(
        &self,
        project_id: i64,
        symbol: &str,
        direction: Direction,
        depth: u32,
    ) -> Result<TraversalOutcome<CallTree>> {
        let Some(root_entity) = self.resolve_root(project_id, symbol)? else {
            return Ok(TraversalOutcome::RootNotFound {
                symbol: symbol.to_string(),
            });
        };

        let requested = if depth == 0 { self.limits.default_depth } else { depth };
        let max_depth = clamp_depth(requested, self.limits.max_tree_depth);

        let mut walk = TreeWalk {
            cache: EntityCache::new(self.store),
            path: PathSet::new(),
            budget: NodeBudget::new(self.limits.max_nodes),
            direction,
            max_depth,
        };
        walk.budget.take();
        walk.path.enter(root_entity.id);

        let mut root = TreeNode::from_entity(&root_entity, Vec::new());
        let (children, cut) = self.expand(&mut walk, root_entity.id, 0)?;
        root.children = children;
        root.truncated = cut;

        if walk.budget.exhausted() {
            tracing::warn!(symbol, ?direction, nodes = walk.budget.used(), "tree hit node budget");
        }

        Ok(TraversalOutcome::Found(CallTree {
            direction,
            depth: max_depth,
            node_count: walk.budget.used(),
            root,
        }))
    }

    /// Build the children of `entity_id`, which sits at `level`. The second
    /// value is true when the node budget stopped expansion early.
    fn expand(
        &self,
        walk: &mut TreeWalk<'a>,
        entity_id: i64,
        level: u32,
    ) -> Result<(Vec<TreeNode>, bool)> {
        let grouped = group_by_endpoint(self.neighbors(walk.direction, entity_id)?);
        let mut children = Vec::with_capacity(grouped.len());

        for neighbor in grouped {
            if !walk.budget.take() {
                return Ok((children, true));
            }

            let Some(child_id) = neighbor.entity_id else {
                children.push(TreeNode::unresolved(neighbor.symbol, neighbor.lines));
                continue;
            };
            let Some(entity) = walk.cache.get(child_id)?.cloned() else {
                children.push(TreeNode::unresolved(neighbor.symbol, neighbor.lines));
                continue;
            };

            let mut node = TreeNode::from_entity(&entity, neighbor.lines);
            let child_level = level + 1;

            if walk.path.contains(child_id) {
                node.is_loop = true;
            } else if child_level >= walk.max_depth {
                node.truncated = !self.neighbors(walk.direction, child_id)?.is_empty();
            } else {
                walk.path.enter(child_id);
                let (grandchildren, cut) = self.expand(walk, child_id, child_level)?;
                walk.path.leave();
                node.children = grandchildren;
                node.truncated = cut;
            }
            children.push(node);
        }

        Ok((children, false))
    }

    // -------------------------------------------------------------------
    // Flat graphs
    // -------------------------------------------------------------------

    /// Bidirectional call graph around `symbol`.
    ///
    /// `depth` of zero means "unlimited", which is still capped by the
    /// configured graph ceiling.
    pub fn build_call_graph(
        &self,
        project_id: i64,
        symbol: &str,
        depth: u32,
    ) -> Result<TraversalOutcome<CallGraph>> {
        let max_depth = clamp_depth(depth, self.limits.max_graph_depth);
        self.build_graph(
            project_id,
            symbol,
            &[Direction::Callers, Direction::Callees],
            max_depth,
        )
    }

    /// Callers-only graph with a server-enforced depth bound.
    pub fn build_reverse_call_graph(
        &self,
        project_id: i64,
        symbol: &str,
        depth: u32,
    ) -> Result<TraversalOutcome<CallGraph>> {
        let max_depth = clamp_depth(depth, self.limits.reverse_graph_max_depth);
        self.build_graph(project_id, symbol, &[Direction::Callers], max_depth)
    }

    /// One BFS whose queue carries the direction each entry was reached by,
    /// so caller and callee distances are labelled independently.
    fn build_graph(
        &self,
        project_id: i64,
        symbol: &str,
        directions: &[Direction],
        max_depth: u32,
    ) -> Result<TraversalOutcome<CallGraph>> {
        let Some(root) = self.resolve_root(project_id, symbol)? else {
            return Ok(TraversalOutcome::RootNotFound {
                symbol: symbol.to_string(),
            });
        };

        let mut cache = EntityCache::new(self.store);
        let mut budget = NodeBudget::new(self.limits.max_nodes);
        let mut nodes: Vec<GraphNode> = Vec::new();
        let mut node_index: HashMap<i64, usize> = HashMap::new();
        let mut edges: Vec<GraphEdge> = Vec::new();
        let mut edge_index: HashMap<(i64, i64), usize> = HashMap::new();
        let mut queue: VecDeque<(i64, Direction, u32)> = VecDeque::new();
        let mut truncated = false;

        budget.take();
        node_index.insert(root.id, 0);
        nodes.push(GraphNode {
            id: root.id,
            symbol: root.symbol.clone(),
            kind: root.kind,
            filename: root.filename.clone(),
            start_line: root.start_line,
            caller_depth: directions.contains(&Direction::Callers).then_some(0),
            callee_depth: directions.contains(&Direction::Callees).then_some(0),
        });
        for &dir in directions {
            queue.push_back((root.id, dir, 0));
        }

        'bfs: while let Some((current, dir, dist)) = queue.pop_front() {
            if dist >= max_depth {
                continue;
            }
            let next = dist + 1;

            for neighbor in group_by_endpoint(self.neighbors(dir, current)?) {
                let Some(other) = neighbor.entity_id else {
                    continue;
                };

                let pos = match node_index.get(&other) {
                    Some(&pos) => pos,
                    None => {
                        let Some(entity) = cache.get(other)? else {
                            continue;
                        };
                        if !budget.take() {
                            truncated = true;
                            break 'bfs;
                        }
                        let pos = nodes.len();
                        nodes.push(GraphNode {
                            id: entity.id,
                            symbol: entity.symbol.clone(),
                            kind: entity.kind,
                            filename: entity.filename.clone(),
                            start_line: entity.start_line,
                            caller_depth: None,
                            callee_depth: None,
                        });
                        node_index.insert(other, pos);
                        pos
                    }
                };

                let key = match dir {
                    Direction::Callers => (other, current),
                    Direction::Callees => (current, other),
                };
                let edge = match edge_index.get(&key) {
                    Some(&i) => &mut edges[i],
                    None => {
                        edge_index.insert(key, edges.len());
                        edges.push(GraphEdge {
                            caller_id: key.0,
                            callee_id: key.1,
                            call_lines: neighbor.lines,
                            caller_depth: None,
                            callee_depth: None,
                        });
                        let last = edges.len() - 1;
                        &mut edges[last]
                    }
                };

                let node = &mut nodes[pos];
                let (edge_label, node_label) = match dir {
                    Direction::Callers => (&mut edge.caller_depth, &mut node.caller_depth),
                    Direction::Callees => (&mut edge.callee_depth, &mut node.callee_depth),
                };
                edge_label.get_or_insert(next);
                if node_label.is_none() {
                    *node_label = Some(next);
                    queue.push_back((other, dir, next));
                }
            }
        }

        if truncated {
            tracing::warn!(symbol, nodes = nodes.len(), "call graph hit node budget");
        }

        Ok(TraversalOutcome::Found(CallGraph {
            root: root.id,
            max_depth,
            nodes,
            edges,
            truncated,
        }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
