//! Persistence layer: schema and row converters.

pub mod converters;
pub mod schema;
