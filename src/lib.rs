//! symgraph: a knowledge graph of source declarations.
//!
//! Declarations (functions, classes, structs, interfaces, traits) are
//! extracted with tree-sitter and stored in SQLite together with call edges
//! and inheritance edges. Inheritance parents are recorded by name first and
//! linked to entities in a later bulk pass. On top of the store sit bounded,
//! cycle-safe caller/callee trees, flat call graphs, and hierarchy analytics.

pub mod config;
pub mod db;
pub mod error;
pub mod graph;
pub mod indexer;
pub mod observability;
pub mod resolution;
pub mod types;

pub use error::{Result, SymGraphError};
