//! Crate-wide error type.
//!
//! Traversal misses and unresolved references are *values*, not errors (see
//! [`crate::graph::traversal::TraversalOutcome`]); this enum only covers
//! storage, I/O, parsing, and configuration failures.

use thiserror::Error;

/// Every failure a symgraph operation can surface.
#[derive(Debug, Error)]
pub enum SymGraphError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, SymGraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_errors_convert() {
        let err: SymGraphError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, SymGraphError::Sqlite(_)));
        assert!(err.to_string().starts_with("sqlite error"));
    }

    #[test]
    fn not_found_display_includes_subject() {
        let err = SymGraphError::NotFound("project 'demo'".into());
        assert_eq!(err.to_string(), "not found: project 'demo'");
    }
}
