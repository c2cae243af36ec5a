//! Core domain types: languages, entity kinds, inheritance relationship
//! types, and the row structs persisted by the graph store.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Source languages the refresh pipeline can parse (14 variants counting
/// JSX/TSX).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    TypeScript,
    Tsx,
    JavaScript,
    Jsx,
    Python,
    Go,
    Rust,
    Java,
    C,
    Cpp,
    CSharp,
    Php,
    Ruby,
    Swift,
}

impl Language {
    /// Every supported variant, in declaration order.
    pub const ALL: [Language; 14] = [
        Self::TypeScript,
        Self::Tsx,
        Self::JavaScript,
        Self::Jsx,
        Self::Python,
        Self::Go,
        Self::Rust,
        Self::Java,
        Self::C,
        Self::Cpp,
        Self::CSharp,
        Self::Php,
        Self::Ruby,
        Self::Swift,
    ];

    /// Map a file extension (including the dot) to a language.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            ".ts" | ".mts" | ".cts" => Some(Self::TypeScript),
            ".tsx" => Some(Self::Tsx),
            ".js" | ".mjs" | ".cjs" => Some(Self::JavaScript),
            ".jsx" => Some(Self::Jsx),
            ".py" | ".pyi" => Some(Self::Python),
            ".go" => Some(Self::Go),
            ".rs" => Some(Self::Rust),
            ".java" => Some(Self::Java),
            ".c" | ".h" => Some(Self::C),
            ".cpp" | ".cc" | ".cxx" | ".hpp" | ".hxx" | ".hh" => Some(Self::Cpp),
            ".cs" => Some(Self::CSharp),
            ".php" => Some(Self::Php),
            ".rb" => Some(Self::Ruby),
            ".swift" => Some(Self::Swift),
            _ => None,
        }
    }

    /// String representation stored in the `entities.language` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
            Self::JavaScript => "javascript",
            Self::Jsx => "jsx",
            Self::Python => "python",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Java => "java",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::CSharp => "csharp",
            Self::Php => "php",
            Self::Ruby => "ruby",
            Self::Swift => "swift",
        }
    }

    /// Parse from a string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "typescript" | "ts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            "javascript" | "js" => Some(Self::JavaScript),
            "jsx" => Some(Self::Jsx),
            "python" | "py" => Some(Self::Python),
            "go" | "golang" => Some(Self::Go),
            "rust" | "rs" => Some(Self::Rust),
            "java" => Some(Self::Java),
            "c" => Some(Self::C),
            "cpp" | "c++" => Some(Self::Cpp),
            "csharp" | "c#" | "c_sharp" => Some(Self::CSharp),
            "php" => Some(Self::Php),
            "ruby" | "rb" => Some(Self::Ruby),
            "swift" => Some(Self::Swift),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// Kinds of declarations stored in the entity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Function,
    Class,
    Struct,
    Interface,
    Trait,
}

impl EntityKind {
    /// Kinds that may sit on either end of an inheritance edge.
    pub const TYPE_KINDS: [EntityKind; 4] =
        [Self::Class, Self::Struct, Self::Interface, Self::Trait];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Trait => "trait",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s {
            "function" | "method" => Some(Self::Function),
            "class" => Some(Self::Class),
            "struct" => Some(Self::Struct),
            "interface" | "protocol" => Some(Self::Interface),
            "trait" => Some(Self::Trait),
            _ => None,
        }
    }

    /// True for class-like kinds (everything except functions).
    pub fn is_type(&self) -> bool {
        !matches!(self, Self::Function)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RelationshipType
// ---------------------------------------------------------------------------

/// How a child type relates to its parent in an inheritance edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Extends,
    Implements,
    Embeds,
    Mixin,
    Trait,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extends => "extends",
            Self::Implements => "implements",
            Self::Embeds => "embeds",
            Self::Mixin => "mixin",
            Self::Trait => "trait",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s {
            "extends" => Some(Self::Extends),
            "implements" => Some(Self::Implements),
            "embeds" => Some(Self::Embeds),
            "mixin" => Some(Self::Mixin),
            "trait" => Some(Self::Trait),
            _ => None,
        }
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A persisted declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: i64,
    pub project_id: i64,
    pub language: Language,
    pub symbol: String,
    pub kind: EntityKind,
    pub filename: String,
    pub start_line: u32,
    pub end_line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// An entity before it has been assigned an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntity {
    pub language: Language,
    pub symbol: String,
    pub kind: EntityKind,
    pub filename: String,
    pub start_line: u32,
    pub end_line: u32,
    pub source: Option<String>,
}

// ---------------------------------------------------------------------------
// Relationship (call edge)
// ---------------------------------------------------------------------------

/// A directed caller → callee call-site edge.
///
/// `callee_id` is `None` when the called symbol did not match any entity in
/// the project; `callee_symbol` always carries the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: i64,
    pub caller_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callee_id: Option<i64>,
    pub callee_symbol: String,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// A call edge ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRelationship {
    pub caller_id: i64,
    pub callee_id: Option<i64>,
    pub callee_symbol: String,
    pub line: u32,
    pub comment: Option<String>,
}

// ---------------------------------------------------------------------------
// Inheritance
// ---------------------------------------------------------------------------

/// A `{parent_symbol, relationship_type}` pair produced by extraction,
/// before any child or parent id is known.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InheritanceCandidate {
    pub parent_symbol: String,
    pub relationship_type: RelationshipType,
}

impl InheritanceCandidate {
    pub fn new(parent_symbol: impl Into<String>, relationship_type: RelationshipType) -> Self {
        Self {
            parent_symbol: parent_symbol.into(),
            relationship_type,
        }
    }
}

/// A candidate row queued for the extraction-time insert.
///
/// Every field is optional so that malformed rows can reach the store and be
/// counted there instead of being silently lost upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InheritanceRow {
    pub child_entity_id: Option<i64>,
    pub parent_symbol: Option<String>,
    pub relationship_type: Option<RelationshipType>,
}

/// A persisted inheritance edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InheritanceEdge {
    pub id: i64,
    pub child_entity_id: i64,
    pub parent_entity_id: Option<i64>,
    pub parent_symbol: String,
    pub relationship_type: RelationshipType,
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A project: the boundary of symbol resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub root_path: String,
    pub generation: i64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
