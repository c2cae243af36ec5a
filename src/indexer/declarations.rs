//! Declaration and call-site extraction from one parsed file.
//!
//! Produces owned data only ([`FileExtraction`]), so files can be parsed on
//! rayon workers and handed to the serialized store phases afterwards.

use serde::Serialize;

use crate::error::Result;
use crate::indexer::inheritance::{rust_impl_subject, InheritanceExtractor};
use crate::indexer::parser::CodeParser;
use crate::indexer::syntax::{collect_identifiers, SyntaxNode, TsNode};
use crate::types::{EntityKind, InheritanceCandidate, Language};

/// Call-site snippets longer than this are cut.
const MAX_SNIPPET_CHARS: usize = 120;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A declaration found in a file, with its heritage candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedDeclaration {
    pub symbol: String,
    pub kind: EntityKind,
    pub start_line: u32,
    pub end_line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub parents: Vec<InheritanceCandidate>,
}

/// `impl Trait for Type`: parents that belong to another declaration,
/// found by symbol once every entity of the project exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedImpl {
    pub subject: String,
    pub line: u32,
    pub parents: Vec<InheritanceCandidate>,
}

/// A call site inside a function-kind declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedCall {
    /// Index into [`FileExtraction::declarations`].
    pub caller: usize,
    pub callee: String,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// Everything one file contributes to the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileExtraction {
    pub filename: String,
    pub language: Language,
    pub declarations: Vec<ExtractedDeclaration>,
    pub impls: Vec<ExtractedImpl>,
    pub calls: Vec<ExtractedCall>,
}

// ---------------------------------------------------------------------------
// Classification tables
// ---------------------------------------------------------------------------

/// Entity kind for a declaration node, or `None` if the node declares
/// nothing we index.
fn declaration_kind<N: SyntaxNode>(language: Language, node: &N) -> Option<EntityKind> {
    use crate::types::EntityKind::*;
    let kind = node.kind();
    match language {
        Language::Java => match kind {
            "class_declaration" | "record_declaration" => Some(Class),
            "interface_declaration" => Some(Interface),
            "method_declaration" | "constructor_declaration" => Some(Function),
            _ => None,
        },
        Language::TypeScript | Language::Tsx | Language::JavaScript | Language::Jsx => match kind {
            "function_declaration" | "generator_function_declaration" | "method_definition" => {
                Some(Function)
            }
            "class_declaration" | "abstract_class_declaration" => Some(Class),
            "interface_declaration" => Some(Interface),
            "variable_declarator" => {
                let value = node.child_by_field("value")?;
                matches!(value.kind(), "arrow_function" | "function_expression" | "function")
                    .then_some(Function)
            }
            _ => None,
        },
        Language::Python => match kind {
            "function_definition" => Some(Function),
            "class_definition" => Some(Class),
            _ => None,
        },
        Language::Go => match kind {
            "function_declaration" | "method_declaration" => Some(Function),
            "type_spec" => match node.child_by_field("type")?.kind() {
                "struct_type" => Some(Struct),
                "interface_type" => Some(Interface),
                _ => None,
            },
            _ => None,
        },
        Language::Rust => match kind {
            "function_item" => Some(Function),
            "struct_item" | "enum_item" | "union_item" => Some(Struct),
            "trait_item" => Some(Trait),
            _ => None,
        },
        Language::C | Language::Cpp => match kind {
            "function_definition" => Some(Function),
            "class_specifier" if node.child_by_field("body").is_some() => Some(Class),
            "struct_specifier" if node.child_by_field("body").is_some() => Some(Struct),
            _ => None,
        },
        Language::CSharp => match kind {
            "class_declaration" | "record_declaration" => Some(Class),
            "struct_declaration" => Some(Struct),
            "interface_declaration" => Some(Interface),
            "method_declaration" | "constructor_declaration" | "local_function_statement" => {
                Some(Function)
            }
            _ => None,
        },
        Language::Php => match kind {
            "class_declaration" => Some(Class),
            "interface_declaration" => Some(Interface),
            "trait_declaration" => Some(Trait),
            "function_definition" | "method_declaration" => Some(Function),
            _ => None,
        },
        Language::Ruby => match kind {
            "class" => Some(Class),
            // Modules are what `include` / `extend` pull in.
            "module" => Some(Trait),
            "method" | "singleton_method" => Some(Function),
            _ => None,
        },
        Language::Swift => match kind {
            "class_declaration" => {
                let keyword = node
                    .child_by_field("declaration_kind")
                    .map(|k| k.text().to_string())
                    .unwrap_or_else(|| "class".to_string());
                match keyword.as_str() {
                    "class" | "actor" => Some(Class),
                    "struct" | "enum" => Some(Struct),
                    _ => None,
                }
            }
            "protocol_declaration" => Some(Interface),
            "function_declaration" => Some(Function),
            _ => None,
        },
    }
}

/// Last identifier of `node`, falling back to its trimmed text for names
/// like Ruby's `save!`.
fn last_segment<N: SyntaxNode>(node: &N) -> Option<String> {
    collect_identifiers(node).pop().or_else(|| {
        let text = node.text().trim();
        (!text.is_empty() && !text.contains(char::is_whitespace)).then(|| text.to_string())
    })
}

fn declaration_name<N: SyntaxNode>(language: Language, node: &N) -> Option<String> {
    if matches!(language, Language::C | Language::Cpp) && node.kind() == "function_definition" {
        // int *Foo::bar(int) -> follow declarator fields down to the name.
        let mut current = node.child_by_field("declarator")?;
        while let Some(inner) = current.child_by_field("declarator") {
            current = inner;
        }
        return last_segment(&current);
    }
    last_segment(&node.child_by_field("name")?)
}

const CALL_KINDS: &[&str] = &[
    "call_expression",
    "call",
    "method_invocation",
    "invocation_expression",
    "function_call_expression",
    "member_call_expression",
    "scoped_call_expression",
    "nullsafe_member_call_expression",
];

fn callee_name<N: SyntaxNode>(node: &N) -> Option<String> {
    let target = node
        .child_by_field("function")
        .or_else(|| node.child_by_field("method"))
        .or_else(|| node.child_by_field("name"))
        .or_else(|| node.children().into_iter().next())?;
    collect_identifiers(&target).pop()
}

fn snippet(text: &str) -> Option<String> {
    let line = text.lines().next()?.trim();
    if line.is_empty() {
        return None;
    }
    Some(line.chars().take(MAX_SNIPPET_CHARS).collect())
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Parse `content` and extract declarations, impl blocks, and call sites.
pub fn extract_file(
    parser: &CodeParser,
    filename: &str,
    language: Language,
    content: &str,
    store_source: bool,
) -> Result<FileExtraction> {
    let tree = parser.parse(content, language)?;
    let root = TsNode::new(tree.root_node(), content);
    Ok(extract_from_root(root, filename, language, store_source))
}

fn extract_from_root(
    root: TsNode<'_>,
    filename: &str,
    language: Language,
    store_source: bool,
) -> FileExtraction {
    let extractor = InheritanceExtractor::new();
    let mut out = FileExtraction {
        filename: filename.to_string(),
        language,
        declarations: Vec::new(),
        impls: Vec::new(),
        calls: Vec::new(),
    };

    // (node, innermost enclosing function declaration)
    let mut stack: Vec<(TsNode<'_>, Option<usize>)> = vec![(root, None)];
    while let Some((node, enclosing)) = stack.pop() {
        let mut scope = enclosing;

        if let Some(kind) = declaration_kind(language, &node) {
            if let Some(symbol) = declaration_name(language, &node) {
                let parents = if kind.is_type() {
                    extractor.extract(language, &node)
                } else {
                    Vec::new()
                };
                out.declarations.push(ExtractedDeclaration {
                    symbol,
                    kind,
                    start_line: node.start_line(),
                    end_line: node.end_line(),
                    source: store_source.then(|| node.text().to_string()),
                    parents,
                });
                if kind == EntityKind::Function {
                    scope = Some(out.declarations.len() - 1);
                }
            }
        } else if node.kind() == "impl_item" {
            let parents = extractor.extract(language, &node);
            if let (Some(subject), false) = (rust_impl_subject(&node), parents.is_empty()) {
                out.impls.push(ExtractedImpl {
                    subject,
                    line: node.start_line(),
                    parents,
                });
            }
        } else if CALL_KINDS.contains(&node.kind()) {
            if let (Some(caller), Some(callee)) = (enclosing, callee_name(&node)) {
                out.calls.push(ExtractedCall {
                    caller,
                    callee,
                    line: node.start_line(),
                    snippet: snippet(node.text()),
                });
            }
        }

        let children = node.children();
        stack.extend(children.into_iter().rev().map(|child| (child, scope)));
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RelationshipType;
    use pretty_assertions::assert_eq;

    fn run(language: Language, source: &str) -> FileExtraction {
        extract_file(&CodeParser::new(), "sample", language, source, false).unwrap()
    }

    fn symbols(fx: &FileExtraction) -> Vec<(&str, EntityKind)> {
        fx.declarations
            .iter()
            .map(|d| (d.symbol.as_str(), d.kind))
            .collect()
    }

    fn calls(fx: &FileExtraction) -> Vec<(&str, &str)> {
        fx.calls
            .iter()
            .map(|c| (fx.declarations[c.caller].symbol.as_str(), c.callee.as_str()))
            .collect()
    }

    #[test]
    fn python_functions_classes_and_calls() {
        let fx = run(
            Language::Python,
            "class Dog(Animal):\n    def bark(self):\n        self.say('woof')\n\ndef main():\n    d = Dog()\n    d.bark()\n",
        );
        assert_eq!(
            symbols(&fx),
            vec![
                ("Dog", EntityKind::Class),
                ("bark", EntityKind::Function),
                ("main", EntityKind::Function),
            ]
        );
        assert_eq!(
            fx.declarations[0].parents,
            vec![InheritanceCandidate::new("Animal", RelationshipType::Extends)]
        );
        assert_eq!(calls(&fx), vec![("bark", "say"), ("main", "Dog"), ("main", "bark")]);
        assert_eq!(fx.calls[0].line, 3);
    }

    #[test]
    fn top_level_calls_have_no_caller() {
        let fx = run(Language::Python, "print('hi')\n");
        assert!(fx.calls.is_empty());
    }

    #[test]
    fn calls_attach_to_innermost_function() {
        let fx = run(
            Language::JavaScript,
            "function outer() {\n  function inner() { helper(); }\n  inner();\n}\n",
        );
        assert_eq!(calls(&fx), vec![("inner", "helper"), ("outer", "inner")]);
    }

    #[test]
    fn typescript_arrow_functions_and_member_calls() {
        let fx = run(
            Language::TypeScript,
            "const load = () => { api.fetch(); };\ninterface Repo { get(): void }\n",
        );
        assert_eq!(
            symbols(&fx),
            vec![("load", EntityKind::Function), ("Repo", EntityKind::Interface)]
        );
        assert_eq!(calls(&fx), vec![("load", "fetch")]);
    }

    #[test]
    fn go_structs_interfaces_and_selector_calls() {
        let fx = run(
            Language::Go,
            "package main\n\ntype Dog struct {\n\tAnimal\n}\n\ntype Runner interface {\n\tRun()\n}\n\nfunc main() {\n\tfmt.Println(\"x\")\n\trun()\n}\n",
        );
        assert_eq!(
            symbols(&fx),
            vec![
                ("Dog", EntityKind::Struct),
                ("Runner", EntityKind::Interface),
                ("main", EntityKind::Function),
            ]
        );
        assert_eq!(
            fx.declarations[0].parents,
            vec![InheritanceCandidate::new("Animal", RelationshipType::Embeds)]
        );
        assert_eq!(calls(&fx), vec![("main", "Println"), ("main", "run")]);
    }

    #[test]
    fn rust_items_and_trait_impls() {
        let fx = run(
            Language::Rust,
            "struct Point;\ntrait Shape { fn area(&self) -> f64; }\nimpl Shape for Point {\n    fn area(&self) -> f64 { compute::area(self) }\n}\nimpl Point { fn new() -> Self { Point } }\n",
        );
        assert_eq!(
            symbols(&fx),
            vec![
                ("Point", EntityKind::Struct),
                ("Shape", EntityKind::Trait),
                ("area", EntityKind::Function),
                ("new", EntityKind::Function),
            ]
        );
        assert_eq!(
            fx.impls,
            vec![ExtractedImpl {
                subject: "Point".to_string(),
                line: 3,
                parents: vec![InheritanceCandidate::new("Shape", RelationshipType::Implements)],
            }]
        );
        assert_eq!(calls(&fx), vec![("area", "area")]);
    }

    #[test]
    fn c_function_names_follow_declarators() {
        let fx = run(
            Language::C,
            "struct point { int x; };\nstruct point;\nint *make(void) { return alloc(4); }\n",
        );
        assert_eq!(
            symbols(&fx),
            vec![("point", EntityKind::Struct), ("make", EntityKind::Function)]
        );
        assert_eq!(calls(&fx), vec![("make", "alloc")]);
    }

    #[test]
    fn java_methods_and_invocations() {
        let fx = run(
            Language::Java,
            "class Dog extends Animal {\n  void bark() { this.speak(); log(\"x\"); }\n}\n",
        );
        assert_eq!(
            symbols(&fx),
            vec![("Dog", EntityKind::Class), ("bark", EntityKind::Function)]
        );
        assert_eq!(calls(&fx), vec![("bark", "speak"), ("bark", "log")]);
    }

    #[test]
    fn ruby_modules_are_mixin_targets() {
        let fx = run(
            Language::Ruby,
            "module Walkable\nend\n\nclass Dog < Animal\n  include Walkable\n  def run\n    walk\n  end\nend\n",
        );
        assert_eq!(
            symbols(&fx),
            vec![
                ("Walkable", EntityKind::Trait),
                ("Dog", EntityKind::Class),
                ("run", EntityKind::Function),
            ]
        );
        assert_eq!(
            fx.declarations[1].parents,
            vec![
                InheritanceCandidate::new("Animal", RelationshipType::Extends),
                InheritanceCandidate::new("Walkable", RelationshipType::Mixin),
            ]
        );
    }

    #[test]
    fn source_text_is_optional() {
        let parser = CodeParser::new();
        let with = extract_file(&parser, "a.py", Language::Python, "def f():\n    pass\n", true)
            .unwrap();
        assert_eq!(with.declarations[0].source.as_deref(), Some("def f():\n    pass"));
        let without = run(Language::Python, "def f():\n    pass\n");
        assert_eq!(without.declarations[0].source, None);
    }

    #[test]
    fn snippet_is_first_line_and_bounded() {
        assert_eq!(snippet("  foo(a,\n b)"), Some("foo(a,".to_string()));
        assert_eq!(snippet(&"x".repeat(500)).unwrap().len(), MAX_SNIPPET_CHARS);
        assert_eq!(snippet("   "), None);
    }
}
