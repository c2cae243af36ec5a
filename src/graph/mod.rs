//! Graph layer: SQLite-backed store, call traversal, and hierarchy analytics.

pub mod hierarchy;
pub mod store;
pub mod traversal;
pub mod visit;

pub use hierarchy::{ChildLink, Hierarchy, InheritanceStats, ParentLink};
pub use store::{GraphStats, GraphStore, InsertReport};
pub use traversal::{CallGraph, CallTree, Direction, GraphTraversal, TraversalOutcome};
