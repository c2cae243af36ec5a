//! Configuration: YAML schema and loader.

pub mod loader;
pub mod schema;

pub use schema::{IndexingConfig, SymGraphConfig, TraversalConfig};
