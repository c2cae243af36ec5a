//! Symbol resolution passes run after a project's entities are persisted.

pub mod inheritance;

pub use inheritance::{resolve_inheritance, ResolutionReport};
