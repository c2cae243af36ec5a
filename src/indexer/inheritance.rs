//! Per-language inheritance extraction.
//!
//! Turns a parsed class/struct/interface/impl declaration into candidate
//! `{parent_symbol, relationship_type}` pairs. Nothing is resolved here:
//! parents are raw symbol text, linked to entities later by
//! [`crate::resolution::inheritance`].
//!
//! Dispatch is a strategy table keyed on [`Language`]. Each strategy knows
//! which child node holds the heritage clause for its grammar and how to
//! classify what it finds; the identifier walk itself is shared
//! ([`collect_identifiers`]).

use std::collections::{HashMap, HashSet};

use crate::indexer::syntax::{children_of_kind, collect_identifiers, first_identifier, SyntaxNode};
use crate::types::{InheritanceCandidate, Language, RelationshipType};

/// One language's extraction rule.
pub type Strategy<N> = fn(&N) -> Vec<InheritanceCandidate>;

/// Strategy table. Build one per refresh; it holds no other state.
pub struct InheritanceExtractor<N: SyntaxNode> {
    strategies: HashMap<Language, Strategy<N>>,
}

impl<N: SyntaxNode> InheritanceExtractor<N> {
    pub fn new() -> Self {
        let mut strategies: HashMap<Language, Strategy<N>> = HashMap::new();
        strategies.insert(Language::Java, java::<N>);
        strategies.insert(Language::TypeScript, typescript::<N>);
        strategies.insert(Language::Tsx, typescript::<N>);
        strategies.insert(Language::JavaScript, typescript::<N>);
        strategies.insert(Language::Jsx, typescript::<N>);
        strategies.insert(Language::Python, python::<N>);
        strategies.insert(Language::CSharp, csharp::<N>);
        strategies.insert(Language::Cpp, cpp::<N>);
        strategies.insert(Language::Ruby, ruby::<N>);
        strategies.insert(Language::Rust, rust::<N>);
        strategies.insert(Language::Swift, swift::<N>);
        strategies.insert(Language::Php, php::<N>);
        strategies.insert(Language::Go, go::<N>);
        Self { strategies }
    }

    pub fn supports(&self, language: Language) -> bool {
        self.strategies.contains_key(&language)
    }

    /// Candidates for one declaration node, deduplicated in source order.
    ///
    /// A language without a strategy, or a declaration without a heritage
    /// clause, yields an empty list.
    pub fn extract(&self, language: Language, node: &N) -> Vec<InheritanceCandidate> {
        let Some(strategy) = self.strategies.get(&language) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        strategy(node)
            .into_iter()
            .filter(|c| seen.insert(c.clone()))
            .collect()
    }
}

impl<N: SyntaxNode> Default for InheritanceExtractor<N> {
    fn default() -> Self {
        Self::new()
    }
}

fn push_all<N: SyntaxNode>(
    out: &mut Vec<InheritanceCandidate>,
    node: &N,
    relationship_type: RelationshipType,
) {
    out.extend(
        collect_identifiers(node)
            .into_iter()
            .map(|symbol| InheritanceCandidate::new(symbol, relationship_type)),
    );
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn java<N: SyntaxNode>(node: &N) -> Vec<InheritanceCandidate> {
    let mut out = Vec::new();
    for child in node.children() {
        match child.kind() {
            "superclass" | "extends_interfaces" => {
                push_all(&mut out, &child, RelationshipType::Extends)
            }
            "super_interfaces" => push_all(&mut out, &child, RelationshipType::Implements),
            _ => {}
        }
    }
    out
}

/// TypeScript, TSX, JavaScript, and JSX.
fn typescript<N: SyntaxNode>(node: &N) -> Vec<InheritanceCandidate> {
    let mut out = Vec::new();
    for child in node.children() {
        match child.kind() {
            "class_heritage" => {
                let clauses = children_of_kind(&child, &["extends_clause", "implements_clause"]);
                if clauses.is_empty() {
                    // JavaScript: `extends <expr>` sits directly in the heritage.
                    push_all(&mut out, &child, RelationshipType::Extends);
                }
                for clause in clauses {
                    let rel = if clause.kind() == "extends_clause" {
                        RelationshipType::Extends
                    } else {
                        RelationshipType::Implements
                    };
                    push_all(&mut out, &clause, rel);
                }
            }
            "extends_type_clause" => push_all(&mut out, &child, RelationshipType::Extends),
            _ => {}
        }
    }
    out
}

fn python<N: SyntaxNode>(node: &N) -> Vec<InheritanceCandidate> {
    let args = node
        .child_by_field("superclasses")
        .or_else(|| children_of_kind(node, &["argument_list"]).into_iter().next());
    let Some(args) = args else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for entry in args.children() {
        if entry.kind() == "keyword_argument" || entry.text().contains('=') {
            continue;
        }
        push_all(&mut out, &entry, RelationshipType::Extends);
    }
    out
}

/// One `base_list` holds base class and interfaces alike; the grammar gives
/// no way to tell them apart, so everything is `implements` unless the
/// declaration is itself an interface.
fn csharp<N: SyntaxNode>(node: &N) -> Vec<InheritanceCandidate> {
    let rel = if node.kind() == "interface_declaration" {
        RelationshipType::Extends
    } else {
        RelationshipType::Implements
    };
    let mut out = Vec::new();
    for list in children_of_kind(node, &["base_list"]) {
        push_all(&mut out, &list, rel);
    }
    out
}

fn cpp<N: SyntaxNode>(node: &N) -> Vec<InheritanceCandidate> {
    let mut out = Vec::new();
    for clause in children_of_kind(node, &["base_class_clause"]) {
        push_all(&mut out, &clause, RelationshipType::Extends);
    }
    out
}

const RUBY_MIXIN_METHODS: &[&str] = &["include", "extend", "prepend"];

fn ruby<N: SyntaxNode>(node: &N) -> Vec<InheritanceCandidate> {
    let mut out = Vec::new();
    for child in node.children() {
        match child.kind() {
            "superclass" => push_all(&mut out, &child, RelationshipType::Extends),
            "call" => ruby_mixin(&mut out, &child),
            "body_statement" => {
                for stmt in children_of_kind(&child, &["call"]) {
                    ruby_mixin(&mut out, &stmt);
                }
            }
            _ => {}
        }
    }
    out
}

fn ruby_mixin<N: SyntaxNode>(out: &mut Vec<InheritanceCandidate>, call: &N) {
    if call.child_by_field("receiver").is_some() {
        return;
    }
    let Some(method) = call.child_by_field("method") else {
        return;
    };
    if !RUBY_MIXIN_METHODS.contains(&method.text()) {
        return;
    }
    let Some(args) = call.child_by_field("arguments") else {
        return;
    };
    for arg in args.children() {
        push_all(out, &arg, RelationshipType::Mixin);
    }
}

/// `impl Trait for Type` yields `Trait`; inherent impls yield nothing.
fn rust<N: SyntaxNode>(node: &N) -> Vec<InheritanceCandidate> {
    if node.kind() != "impl_item" {
        return Vec::new();
    }
    let children = node.children();
    let Some(for_pos) = children.iter().position(|c| c.kind() == "for") else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for child in &children[..for_pos] {
        if child.kind() == "type_parameters" {
            continue;
        }
        push_all(&mut out, child, RelationshipType::Implements);
    }
    out
}

/// The type an `impl` block attaches to: `Point` in `impl Display for Point`.
pub fn rust_impl_subject<N: SyntaxNode>(node: &N) -> Option<String> {
    if node.kind() != "impl_item" {
        return None;
    }
    node.child_by_field("type")
        .and_then(|ty| first_identifier(&ty))
}

fn swift<N: SyntaxNode>(node: &N) -> Vec<InheritanceCandidate> {
    let mut out = Vec::new();
    let clauses = children_of_kind(
        node,
        &["inheritance_clause", "type_inheritance_clause", "inheritance_specifier"],
    );
    for clause in clauses {
        push_all(&mut out, &clause, RelationshipType::Extends);
    }
    out
}

fn php<N: SyntaxNode>(node: &N) -> Vec<InheritanceCandidate> {
    let mut out = Vec::new();
    for child in node.children() {
        match child.kind() {
            "base_clause" => push_all(&mut out, &child, RelationshipType::Extends),
            "class_interface_clause" => {
                push_all(&mut out, &child, RelationshipType::Implements)
            }
            "declaration_list" => {
                for usage in children_of_kind(&child, &["use_declaration"]) {
                    for name in usage.children() {
                        // `use A { foo as bar; }` conflict blocks are not parents.
                        if name.kind() == "use_list" {
                            continue;
                        }
                        push_all(&mut out, &name, RelationshipType::Trait);
                    }
                }
            }
            _ => {}
        }
    }
    out
}

/// Anonymous struct fields and embedded interfaces. Only the declared type's
/// own body counts; struct or interface types nested inside a field are not
/// heritage.
fn go<N: SyntaxNode>(node: &N) -> Vec<InheritanceCandidate> {
    let mut out = Vec::new();
    let Some(ty) = node.child_by_field("type") else {
        return out;
    };

    match ty.kind() {
        "struct_type" => {
            for fields in children_of_kind(&ty, &["field_declaration_list"]) {
                for field in children_of_kind(&fields, &["field_declaration"]) {
                    let named = field
                        .children()
                        .iter()
                        .any(|c| c.kind() == "field_identifier");
                    if !named {
                        push_all(&mut out, &field, RelationshipType::Embeds);
                    }
                }
            }
        }
        "interface_type" => {
            let elems = children_of_kind(&ty, &["type_elem", "constraint_elem", "interface_type_name"]);
            for elem in elems {
                push_all(&mut out, &elem, RelationshipType::Embeds);
            }
        }
        _ => {}
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
