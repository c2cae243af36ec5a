//! Configuration data structures for symgraph.
//!
//! Defines the YAML config format: traversal limits and indexing knobs.
//! Every traversal limit is later clamped against the hard ceilings in
//! [`crate::graph::visit`], so no value here can switch termination off.

use serde::{Deserialize, Serialize};

use crate::graph::visit::{HARD_MAX_DEPTH, HARD_MAX_NODES};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymGraphConfig {
    /// Config format version (currently "1.0").
    #[serde(default = "default_version")]
    pub version: String,

    /// SQLite database path. `None` means the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    #[serde(default)]
    pub traversal: TraversalConfig,

    #[serde(default)]
    pub indexing: IndexingConfig,
}

impl Default for SymGraphConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            database: None,
            traversal: TraversalConfig::default(),
            indexing: IndexingConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// TraversalConfig
// ---------------------------------------------------------------------------

/// Depth and breadth limits for tree and graph queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalConfig {
    /// Depth used when a caller asks for depth 0 on a tree query.
    #[serde(default = "default_tree_depth")]
    pub default_depth: u32,

    /// Ceiling for caller/callee trees.
    #[serde(default = "default_max_tree_depth")]
    pub max_tree_depth: u32,

    /// Ceiling for the bidirectional graph when the caller asks for
    /// "unlimited" (depth 0).
    #[serde(default = "default_max_graph_depth")]
    pub max_graph_depth: u32,

    /// Server-enforced bound on the reverse (callers-only) graph.
    #[serde(default = "default_reverse_graph_depth")]
    pub reverse_graph_max_depth: u32,

    /// Maximum nodes a single tree or graph response may contain.
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            default_depth: default_tree_depth(),
            max_tree_depth: default_max_tree_depth(),
            max_graph_depth: default_max_graph_depth(),
            reverse_graph_max_depth: default_reverse_graph_depth(),
            max_nodes: default_max_nodes(),
        }
    }
}

impl TraversalConfig {
    /// Copy with every limit pulled inside the hard ceilings.
    pub fn clamped(self) -> Self {
        let depth = |d: u32| d.clamp(1, HARD_MAX_DEPTH);
        Self {
            default_depth: depth(self.default_depth),
            max_tree_depth: depth(self.max_tree_depth),
            max_graph_depth: depth(self.max_graph_depth),
            reverse_graph_max_depth: depth(self.reverse_graph_max_depth),
            max_nodes: self.max_nodes.clamp(1, HARD_MAX_NODES),
        }
    }
}

// ---------------------------------------------------------------------------
// IndexingConfig
// ---------------------------------------------------------------------------

/// Knobs for the refresh pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingConfig {
    /// Files larger than this are skipped.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// Skip files whose path looks like a test.
    #[serde(default)]
    pub exclude_tests: bool,

    /// Store declaration source text on entities.
    #[serde(default = "default_true")]
    pub store_source: bool,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: default_max_file_bytes(),
            exclude_tests: false,
            store_source: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_version() -> String {
    "1.0".to_string()
}

fn default_tree_depth() -> u32 {
    3
}

fn default_max_tree_depth() -> u32 {
    10
}

fn default_max_graph_depth() -> u32 {
    32
}

fn default_reverse_graph_depth() -> u32 {
    5
}

fn default_max_nodes() -> usize {
    2_000
}

fn default_max_file_bytes() -> u64 {
    1024 * 1024
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SymGraphConfig::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.database, None);
        assert_eq!(config.traversal.default_depth, 3);
        assert_eq!(config.traversal.reverse_graph_max_depth, 5);
        assert!(config.indexing.store_source);
        assert!(!config.indexing.exclude_tests);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "traversal:\n  max_tree_depth: 4\n";
        let config: SymGraphConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.traversal.max_tree_depth, 4);
        assert_eq!(config.traversal.max_nodes, 2_000);
        assert_eq!(config.indexing.max_file_bytes, 1024 * 1024);
    }

    #[test]
    fn test_clamped_cannot_disable_bounds() {
        let config = TraversalConfig {
            default_depth: 0,
            max_tree_depth: 10_000,
            max_graph_depth: 0,
            reverse_graph_max_depth: u32::MAX,
            max_nodes: usize::MAX,
        }
        .clamped();
        assert_eq!(config.default_depth, 1);
        assert_eq!(config.max_tree_depth, HARD_MAX_DEPTH);
        assert_eq!(config.max_graph_depth, 1);
        assert_eq!(config.reverse_graph_max_depth, HARD_MAX_DEPTH);
        assert_eq!(config.max_nodes, HARD_MAX_NODES);
    }

    #[test]
    fn test_serde_yaml_roundtrip() {
        let mut config = SymGraphConfig::default();
        config.database = Some("/tmp/graph.db".into());
        config.indexing.exclude_tests = true;
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: SymGraphConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.database.as_deref(), Some("/tmp/graph.db"));
        assert!(back.indexing.exclude_tests);
        assert_eq!(back.traversal, config.traversal);
    }
}
