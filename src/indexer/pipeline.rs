//! Whole-project refresh.
//!
//! Files are discovered with `ignore` (gitignore-aware) and parsed in
//! parallel on rayon workers into owned [`FileExtraction`]s. The store is
//! then written in four serialized bulk phases:
//!
//! 1. entities (upsert, then purge entities left over from older refreshes)
//! 2. call relationships (wholesale replace)
//! 3. inheritance candidates (wholesale replace, parents unresolved)
//! 4. inheritance resolution
//!
//! Queries against a project while its refresh is running see whatever the
//! last committed phase left behind; no lock is taken.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use ignore::WalkBuilder;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{IndexingConfig, SymGraphConfig};
use crate::error::Result;
use crate::graph::store::{GraphStore, InsertReport};
use crate::indexer::declarations::{extract_file, FileExtraction};
use crate::indexer::parser::CodeParser;
use crate::resolution::inheritance::{resolve_inheritance, ResolutionReport};
use crate::types::{EntityKind, InheritanceRow, Language, NewEntity, NewRelationship};

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Counts from one refresh, suitable for logging or JSON output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub project_id: i64,
    pub generation: i64,
    pub files_scanned: usize,
    pub files_indexed: usize,
    pub files_failed: usize,
    pub entities: usize,
    pub stale_entities_removed: usize,
    pub relationships: usize,
    pub unresolved_calls: usize,
    pub inheritance: InsertReport,
    pub resolution: ResolutionReport,
    pub elapsed_ms: u64,
}

/// A file selected for indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path relative to the project root, `/`-separated.
    pub relative: String,
    pub language: Language,
}

// ---------------------------------------------------------------------------
// File discovery
// ---------------------------------------------------------------------------

/// Heuristic test-file check on a `/`-separated relative path.
pub fn is_test_path(relative: &str) -> bool {
    let lower = relative.to_ascii_lowercase();
    let in_test_dir = lower
        .split('/')
        .rev()
        .skip(1)
        .any(|dir| matches!(dir, "test" | "tests" | "__tests__" | "spec"));
    let file = lower.rsplit('/').next().unwrap_or("");
    let stem = file.split('.').next().unwrap_or("");
    in_test_dir
        || file.starts_with("test_")
        || stem.ends_with("_test")
        || stem.ends_with("_spec")
        || file.contains(".test.")
        || file.contains(".spec.")
}

/// Every supported source file under `root`, sorted by relative path.
pub fn collect_files(root: &Path, config: &IndexingConfig) -> Vec<SourceFile> {
    let mut files = Vec::new();
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .require_git(false);

    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                warn!("failed to read entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        let Some(relative) = path.strip_prefix(root).ok().map(|p| {
            p.to_string_lossy().replace('\\', "/")
        }) else {
            continue;
        };
        let Some(language) = CodeParser::detect_language(&relative) else {
            continue;
        };
        if config.exclude_tests && is_test_path(&relative) {
            debug!(file = %relative, "skipping test file");
            continue;
        }
        if let Ok(meta) = entry.metadata() {
            if meta.len() > config.max_file_bytes {
                debug!(file = %relative, bytes = meta.len(), "skipping large file");
                continue;
            }
        }
        files.push(SourceFile {
            path: path.to_path_buf(),
            relative,
            language,
        });
    }

    files.sort_by(|a, b| a.relative.cmp(&b.relative));
    files
}

// ---------------------------------------------------------------------------
// Symbol lookup
// ---------------------------------------------------------------------------

struct IndexedEntity {
    id: i64,
    kind: EntityKind,
    filename: String,
}

/// Refresh-scoped symbol → entity lookup.
struct SymbolIndex {
    by_symbol: HashMap<String, Vec<IndexedEntity>>,
}

impl SymbolIndex {
    fn build(entities: &[NewEntity], ids: &[i64]) -> Self {
        let mut by_symbol: HashMap<String, Vec<IndexedEntity>> = HashMap::new();
        for (entity, &id) in entities.iter().zip(ids) {
            let bucket = by_symbol.entry(entity.symbol.clone()).or_default();
            if bucket.iter().any(|e| e.id == id) {
                continue;
            }
            bucket.push(IndexedEntity {
                id,
                kind: entity.kind,
                filename: entity.filename.clone(),
            });
        }
        for bucket in by_symbol.values_mut() {
            bucket.sort_by_key(|e| e.id);
        }
        Self { by_symbol }
    }

    /// Same-file match first, then the lowest id in the project.
    fn lookup(&self, symbol: &str, filename: &str, kinds: &[EntityKind]) -> Option<i64> {
        let bucket = self.by_symbol.get(symbol)?;
        let mut accepted = bucket.iter().filter(|e| kinds.contains(&e.kind));
        let first = accepted.clone().next()?;
        Some(
            accepted
                .find(|e| e.filename == filename)
                .unwrap_or(first)
                .id,
        )
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Rebuilds one project's graph from its source tree.
pub struct RefreshPipeline<'a> {
    store: &'a GraphStore,
    config: IndexingConfig,
    parser: CodeParser,
}

impl<'a> RefreshPipeline<'a> {
    pub fn new(store: &'a GraphStore, config: IndexingConfig) -> Self {
        Self {
            store,
            config,
            parser: CodeParser::new(),
        }
    }

    /// Pipeline using the `indexing` section of a loaded config.
    pub fn from_config(store: &'a GraphStore, config: &SymGraphConfig) -> Self {
        Self::new(store, config.indexing.clone())
    }

    /// Parse every file under `root` and rebuild project `project_name`.
    pub fn refresh(&self, project_name: &str, root: &Path) -> Result<RefreshReport> {
        let started = Instant::now();
        let project = self
            .store
            .upsert_project(project_name, &root.to_string_lossy())?;
        let generation = self.store.begin_generation(project.id)?;
        let mut report = RefreshReport {
            project_id: project.id,
            generation,
            ..RefreshReport::default()
        };

        let files = collect_files(root, &self.config);
        report.files_scanned = files.len();
        info!(project = project_name, files = files.len(), "refresh started");

        let extractions = self.parse_all(&files);
        report.files_failed = files.len() - extractions.len();
        report.files_indexed = extractions.len();

        // Phase 1: entities.
        let mut entities = Vec::new();
        let mut offsets = Vec::with_capacity(extractions.len());
        for fx in &extractions {
            offsets.push(entities.len());
            entities.extend(fx.declarations.iter().map(|d| NewEntity {
                language: fx.language,
                symbol: d.symbol.clone(),
                kind: d.kind,
                filename: fx.filename.clone(),
                start_line: d.start_line,
                end_line: d.end_line,
                source: d.source.clone(),
            }));
        }
        let ids = self.store.upsert_entities(project.id, generation, &entities)?;
        report.stale_entities_removed = self.store.purge_stale_entities(project.id, generation)?;
        report.entities = ids.len();
        info!(
            entities = ids.len(),
            stale = report.stale_entities_removed,
            "entity phase done"
        );

        let index = SymbolIndex::build(&entities, &ids);

        // Phase 2: call relationships.
        let mut relationships = Vec::new();
        for (fx, &offset) in extractions.iter().zip(&offsets) {
            for call in &fx.calls {
                let callee_id = index.lookup(&call.callee, &fx.filename, &[EntityKind::Function]);
                if callee_id.is_none() {
                    report.unresolved_calls += 1;
                }
                relationships.push(NewRelationship {
                    caller_id: ids[offset + call.caller],
                    callee_id,
                    callee_symbol: call.callee.clone(),
                    line: call.line,
                    comment: call.snippet.clone(),
                });
            }
        }
        report.relationships = self.store.replace_relationships(project.id, &relationships)?;
        info!(
            relationships = report.relationships,
            unresolved = report.unresolved_calls,
            "relationship phase done"
        );

        // Phase 3: inheritance candidates.
        let mut rows = Vec::new();
        for (fx, &offset) in extractions.iter().zip(&offsets) {
            for (i, decl) in fx.declarations.iter().enumerate() {
                rows.extend(decl.parents.iter().map(|p| InheritanceRow {
                    child_entity_id: Some(ids[offset + i]),
                    parent_symbol: Some(p.parent_symbol.clone()),
                    relationship_type: Some(p.relationship_type),
                }));
            }
            for block in &fx.impls {
                let child = index.lookup(&block.subject, &fx.filename, &EntityKind::TYPE_KINDS);
                if child.is_none() {
                    debug!(
                        subject = %block.subject,
                        file = %fx.filename,
                        line = block.line,
                        "impl subject has no entity"
                    );
                }
                rows.extend(block.parents.iter().map(|p| InheritanceRow {
                    child_entity_id: child,
                    parent_symbol: Some(p.parent_symbol.clone()),
                    relationship_type: Some(p.relationship_type),
                }));
            }
        }
        report.inheritance = self.store.replace_inheritance(project.id, &rows)?;
        info!(
            inserted = report.inheritance.inserted,
            dropped = report.inheritance.dropped,
            duplicates = report.inheritance.duplicates,
            "inheritance phase done"
        );

        // Phase 4: resolution.
        report.resolution = resolve_inheritance(self.store, project.id)?;
        report.elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            resolved = report.resolution.resolved,
            unresolved = report.resolution.unresolved,
            elapsed_ms = report.elapsed_ms,
            "refresh finished"
        );
        Ok(report)
    }

    /// Read and extract files in parallel. Failures are logged and skipped;
    /// output order follows `files`.
    ///
    /// Workers borrow only the parser and config: the store's connection
    /// is not `Sync`.
    fn parse_all(&self, files: &[SourceFile]) -> Vec<FileExtraction> {
        let parser = &self.parser;
        let store_source = self.config.store_source;
        files
            .par_iter()
            .filter_map(|file| match parse_one(parser, file, store_source) {
                Ok(fx) => Some(fx),
                Err(e) => {
                    warn!(file = %file.relative, error = %e, "skipping file");
                    None
                }
            })
            .collect()
    }
}

fn parse_one(parser: &CodeParser, file: &SourceFile, store_source: bool) -> Result<FileExtraction> {
    let content = std::fs::read_to_string(&file.path)?;
    extract_file(parser, &file.relative, file.language, &content, store_source)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use test_case::test_case;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test_case("src/app.py", false ; "plain_source")]
    #[test_case("tests/app.py", true ; "tests_dir")]
    #[test_case("src/__tests__/a.js", true ; "jest_dir")]
    #[test_case("pkg/server_test.go", true ; "go_suffix")]
    #[test_case("test_app.py", true ; "pytest_prefix")]
    #[test_case("src/app.spec.ts", true ; "spec_infix")]
    #[test_case("src/contest.py", false ; "substring_not_test")]
    fn test_path_heuristic(path: &str, expected: bool) {
        assert_eq!(is_test_path(path), expected);
    }

    #[test]
    fn collect_files_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.py", "x = 1\n");
        write(dir.path(), "a/main.go", "package main\n");
        write(dir.path(), "README.md", "# hi\n");
        write(dir.path(), ".hidden/secret.py", "x = 1\n");
        write(dir.path(), "build/gen.py", "x = 1\n");
        write(dir.path(), ".gitignore", "build/\n");
        write(dir.path(), "tests/t.py", "x = 1\n");

        let rel = |cfg: &IndexingConfig| -> Vec<String> {
            collect_files(dir.path(), cfg)
                .into_iter()
                .map(|f| f.relative)
                .collect()
        };
        assert_eq!(rel(&IndexingConfig::default()), vec!["a/main.go", "b.py", "tests/t.py"]);

        let no_tests = IndexingConfig {
            exclude_tests: true,
            ..IndexingConfig::default()
        };
        assert_eq!(rel(&no_tests), vec!["a/main.go", "b.py"]);
    }

    #[test]
    fn collect_files_skips_large_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "big.py", &"x = 1\n".repeat(100));
        write(dir.path(), "small.py", "x = 1\n");
        let config = IndexingConfig {
            max_file_bytes: 64,
            ..IndexingConfig::default()
        };
        let files = collect_files(dir.path(), &config);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative, "small.py");
        assert_eq!(files[0].language, Language::Python);
    }

    #[test]
    fn symbol_index_prefers_same_file_then_lowest_id() {
        let entity = |symbol: &str, kind: EntityKind, file: &str| NewEntity {
            language: Language::Python,
            symbol: symbol.to_string(),
            kind,
            filename: file.to_string(),
            start_line: 1,
            end_line: 1,
            source: None,
        };
        let entities = vec![
            entity("run", EntityKind::Function, "b.py"),
            entity("run", EntityKind::Function, "a.py"),
            entity("run", EntityKind::Class, "c.py"),
        ];
        let index = SymbolIndex::build(&entities, &[7, 3, 1]);
        assert_eq!(index.lookup("run", "b.py", &[EntityKind::Function]), Some(7));
        assert_eq!(index.lookup("run", "z.py", &[EntityKind::Function]), Some(3));
        assert_eq!(index.lookup("run", "z.py", &EntityKind::TYPE_KINDS), Some(1));
        assert_eq!(index.lookup("walk", "a.py", &[EntityKind::Function]), None);
    }

    #[test]
    fn refresh_builds_and_rebuilds_a_project() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "zoo.py",
            "class Animal:\n    pass\n\nclass Dog(Animal):\n    def bark(self):\n        speak()\n\ndef speak():\n    print('woof')\n",
        );
        let store = GraphStore::open_in_memory().unwrap();
        let pipeline = RefreshPipeline::new(&store, IndexingConfig::default());

        let first = pipeline.refresh("zoo", dir.path()).unwrap();
        assert_eq!(first.files_indexed, 1);
        assert_eq!(first.entities, 4);
        assert_eq!(first.relationships, 2);
        assert_eq!(first.unresolved_calls, 1);
        assert_eq!(first.inheritance.inserted, 1);
        assert_eq!(first.resolution.resolved, 1);

        // Dropping Animal leaves Dog's parent unresolved and removes the entity.
        write(
            dir.path(),
            "zoo.py",
            "class Dog(Animal):\n    def bark(self):\n        pass\n",
        );
        let second = pipeline.refresh("zoo", dir.path()).unwrap();
        assert_eq!(second.generation, first.generation + 1);
        assert_eq!(second.entities, 2);
        assert_eq!(second.stale_entities_removed, 2);
        assert_eq!(second.relationships, 0);
        assert_eq!(second.resolution, ResolutionReport { resolved: 0, unresolved: 1 });

        let json = serde_json::to_value(&second).unwrap();
        assert_eq!(json["inheritance"]["inserted"], 1);
    }
}
