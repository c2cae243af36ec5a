//! Config discovery and loading.
//!
//! Priority (highest first): `SYMGRAPH_DB` env var for the database path,
//! `.symgraph.yaml` in the project root, `config.yaml` in the user config
//! dir, built-in defaults.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use super::schema::SymGraphConfig;
use crate::error::{Result, SymGraphError};

/// File name looked up in a project root.
pub const PROJECT_CONFIG_FILE: &str = ".symgraph.yaml";

/// Environment variable overriding the database path.
pub const DB_ENV_VAR: &str = "SYMGRAPH_DB";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "symgraph", "symgraph")
}

/// Parse a YAML config file.
pub fn load_from_file(path: &Path) -> Result<SymGraphConfig> {
    let text = std::fs::read_to_string(path)?;
    let config: SymGraphConfig = serde_yaml::from_str(&text)?;
    if config.version != "1.0" {
        return Err(SymGraphError::Config(format!(
            "unsupported config version '{}' in {}",
            config.version,
            path.display()
        )));
    }
    Ok(config)
}

/// Resolve the effective config for a project root.
pub fn load(project_root: Option<&Path>) -> Result<SymGraphConfig> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(root) = project_root {
        candidates.push(root.join(PROJECT_CONFIG_FILE));
    }
    if let Some(dirs) = project_dirs() {
        candidates.push(dirs.config_dir().join("config.yaml"));
    }

    let mut config = SymGraphConfig::default();
    for path in candidates {
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config");
            config = load_from_file(&path)?;
            break;
        }
    }

    if let Ok(db) = std::env::var(DB_ENV_VAR) {
        if !db.trim().is_empty() {
            config.database = Some(db);
        }
    }
    Ok(config)
}

/// Database path for `config`: explicit setting, else the platform data dir,
/// else a file in the working directory.
pub fn database_path(config: &SymGraphConfig) -> PathBuf {
    if let Some(ref db) = config.database {
        return PathBuf::from(db);
    }
    project_dirs()
        .map(|dirs| dirs.data_dir().join("graph.db"))
        .unwrap_or_else(|| PathBuf::from(".symgraph.db"))
}
