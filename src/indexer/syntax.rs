//! A minimal view of a parsed syntax node, plus the identifier-collection
//! primitive every inheritance strategy builds on.
//!
//! Strategies are written against [`SyntaxNode`] instead of
//! `tree_sitter::Node` directly, so they can be exercised on hand-built
//! trees and so a different parser could be slotted in later.

/// Read-only access to one node of a concrete syntax tree.
pub trait SyntaxNode: Clone {
    /// Grammar node type, e.g. `class_declaration` or `(`.
    fn kind(&self) -> &str;
    /// Source text covered by the node.
    fn text(&self) -> &str;
    /// All children in source order, anonymous tokens included.
    fn children(&self) -> Vec<Self>;
    /// Child stored under a grammar field name.
    fn child_by_field(&self, field: &str) -> Option<Self>;
}

// ---------------------------------------------------------------------------
// tree-sitter adapter
// ---------------------------------------------------------------------------

/// A tree-sitter node paired with the source it was parsed from.
#[derive(Debug, Clone, Copy)]
pub struct TsNode<'a> {
    node: tree_sitter::Node<'a>,
    source: &'a str,
}

impl<'a> TsNode<'a> {
    pub fn new(node: tree_sitter::Node<'a>, source: &'a str) -> Self {
        Self { node, source }
    }

    /// 1-based first line.
    pub fn start_line(&self) -> u32 {
        self.node.start_position().row as u32 + 1
    }

    /// 1-based last line.
    pub fn end_line(&self) -> u32 {
        self.node.end_position().row as u32 + 1
    }
}

impl SyntaxNode for TsNode<'_> {
    fn kind(&self) -> &str {
        self.node.kind()
    }

    fn text(&self) -> &str {
        self.node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn children(&self) -> Vec<Self> {
        let mut cursor = self.node.walk();
        self.node
            .children(&mut cursor)
            .map(|node| TsNode {
                node,
                source: self.source,
            })
            .collect()
    }

    fn child_by_field(&self, field: &str) -> Option<Self> {
        self.node.child_by_field_name(field).map(|node| TsNode {
            node,
            source: self.source,
        })
    }
}

// ---------------------------------------------------------------------------
// Identifier collection
// ---------------------------------------------------------------------------

/// Recursion bound for every walk in this module.
pub const MAX_WALK_DEPTH: usize = 64;

/// Keywords some grammars surface as identifier-like leaves.
const STOPLIST: &[&str] = &[
    "extends",
    "implements",
    "public",
    "private",
    "protected",
    "virtual",
];

/// Generic and call argument lists: never a parent, always skipped.
const SKIPPED_KINDS: &[&str] = &[
    "type_arguments",
    "type_parameters",
    "type_argument_list",
    "type_parameter_list",
    "template_argument_list",
    "arguments",
    "argument_list",
    "keyword_argument",
    "list_splat",
    "dictionary_splat",
];

/// Dotted or scoped names; only the final segment is kept.
const QUALIFIED_KINDS: &[&str] = &[
    "scoped_type_identifier",
    "scoped_identifier",
    "qualified_name",
    "nested_type_identifier",
    "member_expression",
    "attribute",
    "scope_resolution",
    "qualified_identifier",
    "qualified_type",
];

fn is_identifier_kind(kind: &str) -> bool {
    kind == "identifier" || kind.ends_with("_identifier") || kind == "constant" || kind == "name"
}

fn is_identifier_text(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Every identifier named under `node`, in source order.
///
/// Generic and call argument lists are skipped, qualified names keep only their
/// last segment, and keywords on the stoplist are dropped. Duplicates are
/// kept; callers dedup.
pub fn collect_identifiers<N: SyntaxNode>(node: &N) -> Vec<String> {
    let mut out = Vec::new();
    walk_identifiers(node, 0, &mut out);
    out
}

fn walk_identifiers<N: SyntaxNode>(node: &N, depth: usize, out: &mut Vec<String>) {
    if depth > MAX_WALK_DEPTH {
        return;
    }
    let kind = node.kind();
    if SKIPPED_KINDS.contains(&kind) {
        return;
    }
    if QUALIFIED_KINDS.contains(&kind) {
        if let Some(last) = last_identifier(node, depth) {
            out.push(last);
        }
        return;
    }
    // `Generic[T]` in a Python base list: only the subscripted value counts.
    if kind == "subscript" {
        if let Some(value) = node.child_by_field("value") {
            walk_identifiers(&value, depth + 1, out);
        }
        return;
    }

    let children = node.children();
    if children.is_empty() {
        let text = node.text().trim();
        if is_identifier_kind(kind) && is_identifier_text(text) && !STOPLIST.contains(&text) {
            out.push(text.to_string());
        }
        return;
    }
    for child in &children {
        walk_identifiers(child, depth + 1, out);
    }
}

fn last_identifier<N: SyntaxNode>(node: &N, depth: usize) -> Option<String> {
    let mut found = Vec::new();
    for child in node.children() {
        if SKIPPED_KINDS.contains(&child.kind()) {
            continue;
        }
        walk_identifiers(&child, depth + 1, &mut found);
    }
    found.pop()
}

/// First collectible identifier under `node`.
pub fn first_identifier<N: SyntaxNode>(node: &N) -> Option<String> {
    collect_identifiers(node).into_iter().next()
}

/// Direct children whose kind is one of `kinds`.
pub fn children_of_kind<N: SyntaxNode>(node: &N, kinds: &[&str]) -> Vec<N> {
    node.children()
        .into_iter()
        .filter(|c| kinds.contains(&c.kind()))
        .collect()
}

/// First node of kind `kind` at or below `node`, breadth-first, within
/// [`MAX_WALK_DEPTH`] levels.
pub fn find_descendant<N: SyntaxNode>(node: N, kind: &str) -> Option<N> {
    let mut frontier = vec![node];
    for _ in 0..=MAX_WALK_DEPTH {
        let mut next = Vec::new();
        for n in frontier {
            if n.kind() == kind {
                return Some(n);
            }
            next.extend(n.children());
        }
        if next.is_empty() {
            return None;
        }
        frontier = next;
    }
    None
}

// ---------------------------------------------------------------------------
// Hand-built trees for tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct OwnedNode {
    pub kind: String,
    pub text: String,
    pub field: Option<String>,
    pub children: Vec<OwnedNode>,
}

#[cfg(test)]
impl OwnedNode {
    pub fn leaf(kind: &str, text: &str) -> Self {
        Self {
            kind: kind.to_string(),
            text: text.to_string(),
            field: None,
            children: Vec::new(),
        }
    }

    pub fn branch(kind: &str, children: Vec<OwnedNode>) -> Self {
        let text = children
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            kind: kind.to_string(),
            text,
            field: None,
            children,
        }
    }

    pub fn with_field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }
}

#[cfg(test)]
impl SyntaxNode for OwnedNode {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn children(&self) -> Vec<Self> {
        self.children.clone()
    }

    fn child_by_field(&self, field: &str) -> Option<Self> {
        self.children
            .iter()
            .find(|c| c.field.as_deref() == Some(field))
            .cloned()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
