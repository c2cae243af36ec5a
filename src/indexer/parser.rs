//! Native tree-sitter parser wrapper.
//!
//! Grammars are statically linked, so parsing needs no runtime setup.
//!
//! # Design decisions
//!
//! - **No stored state.** `CodeParser` carries no fields. Tree-sitter's
//!   `Parser` is `!Send + !Sync`, so rather than wrestling with thread-safety
//!   wrappers we create a fresh parser on every call. `Parser::new()` is a
//!   single allocation and `set_language` is a pointer swap.
//!
//! - **Language detection by extension.** Delegates to [`Language::from_extension`],
//!   keeping the mapping in one canonical place.

use crate::error::{Result, SymGraphError};
use crate::types::Language;

/// Thin wrapper around native tree-sitter parsing.
///
/// Create one with [`CodeParser::new`] and reuse freely; the struct is `Send`,
/// `Sync`, and zero-sized, so rayon workers can share it.
pub struct CodeParser;

impl CodeParser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse `content` using the grammar for `language` and return the
    /// concrete syntax tree.
    pub fn parse(&self, content: &str, language: Language) -> Result<tree_sitter::Tree> {
        let ts_lang = Self::get_ts_language(language);

        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&ts_lang)
            .map_err(|e| SymGraphError::Parse(format!("Language version mismatch: {e}")))?;

        parser.parse(content, None).ok_or_else(|| {
            SymGraphError::Parse("tree-sitter returned None (timeout or cancellation)".into())
        })
    }

    /// Return the native `tree_sitter::Language` for a [`Language`] variant.
    #[must_use]
    pub fn get_ts_language(language: Language) -> tree_sitter::Language {
        match language {
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Language::JavaScript | Language::Jsx => tree_sitter_javascript::LANGUAGE.into(),
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::Go => tree_sitter_go::LANGUAGE.into(),
            Language::Rust => tree_sitter_rust::LANGUAGE.into(),
            Language::Java => tree_sitter_java::LANGUAGE.into(),
            Language::C => tree_sitter_c::LANGUAGE.into(),
            Language::Cpp => tree_sitter_cpp::LANGUAGE.into(),
            Language::CSharp => tree_sitter_c_sharp::LANGUAGE.into(),
            Language::Php => tree_sitter_php::LANGUAGE_PHP.into(),
            Language::Ruby => tree_sitter_ruby::LANGUAGE.into(),
            Language::Swift => tree_sitter_swift::LANGUAGE.into(),
        }
    }

    /// Detect the [`Language`] for a file path based on its extension.
    ///
    /// Returns `None` for unsupported extensions.
    #[must_use]
    pub fn detect_language(file_path: &str) -> Option<Language> {
        std::path::Path::new(file_path)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|e| Language::from_extension(&format!(".{e}")))
    }

    /// Check whether the file at `file_path` has a supported extension.
    #[must_use]
    pub fn is_supported(file_path: &str) -> bool {
        Self::detect_language(file_path).is_some()
    }
}

impl Default for CodeParser {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn parser_initializes_for_every_language() {
        let parser = CodeParser::new();
        for lang in Language::ALL {
            let result = parser.parse("", lang);
            assert!(
                result.is_ok(),
                "Parser should initialize for {:?}: {:?}",
                lang,
                result.err()
            );
        }
    }

    #[test_case("src/app.ts", Some(Language::TypeScript) ; "detect_ts")]
    #[test_case("src/app.tsx", Some(Language::Tsx) ; "detect_tsx")]
    #[test_case("lib/util.mjs", Some(Language::JavaScript) ; "detect_mjs")]
    #[test_case("components/Button.jsx", Some(Language::Jsx) ; "detect_jsx")]
    #[test_case("scripts/run.py", Some(Language::Python) ; "detect_py")]
    #[test_case("main.go", Some(Language::Go) ; "detect_go")]
    #[test_case("lib.rs", Some(Language::Rust) ; "detect_rs")]
    #[test_case("Main.java", Some(Language::Java) ; "detect_java")]
    #[test_case("util.h", Some(Language::C) ; "detect_h")]
    #[test_case("main.cpp", Some(Language::Cpp) ; "detect_cpp")]
    #[test_case("Program.cs", Some(Language::CSharp) ; "detect_cs")]
    #[test_case("index.php", Some(Language::Php) ; "detect_php")]
    #[test_case("app.rb", Some(Language::Ruby) ; "detect_rb")]
    #[test_case("App.swift", Some(Language::Swift) ; "detect_swift")]
    #[test_case("Main.kt", None ; "detect_kotlin_none")]
    #[test_case("README.md", None ; "detect_md_none")]
    #[test_case("Makefile", None ; "detect_makefile_none")]
    #[test_case(".gitignore", None ; "detect_dotfile_none")]
    fn detect_language_parameterized(path: &str, expected: Option<Language>) {
        assert_eq!(
            CodeParser::detect_language(path),
            expected,
            "detect_language({path:?})"
        );
    }

    #[test_case("foo.ts", true ; "supported_ts")]
    #[test_case("qux.rs", true ; "supported_rs")]
    #[test_case("config.yaml", false ; "unsupported_yaml")]
    #[test_case("", false ; "unsupported_empty")]
    fn is_supported_parameterized(path: &str, expected: bool) {
        assert_eq!(CodeParser::is_supported(path), expected, "is_supported({path:?})");
    }

    #[test_case(Language::TypeScript, "const x: number = 42;", "program" ; "parse_trivial_ts")]
    #[test_case(Language::JavaScript, "function f() { return 1; }", "program" ; "parse_trivial_js")]
    #[test_case(Language::Python, "def f():\n    pass\n", "module" ; "parse_trivial_py")]
    #[test_case(Language::Go, "package main\nfunc main() {}\n", "source_file" ; "parse_trivial_go")]
    #[test_case(Language::Rust, "fn main() {}\n", "source_file" ; "parse_trivial_rust")]
    #[test_case(Language::Java, "class Foo {}\n", "program" ; "parse_trivial_java")]
    #[test_case(Language::C, "int main() { return 0; }\n", "translation_unit" ; "parse_trivial_c")]
    #[test_case(Language::Cpp, "int main() { return 0; }\n", "translation_unit" ; "parse_trivial_cpp")]
    #[test_case(Language::CSharp, "class Foo {}\n", "compilation_unit" ; "parse_trivial_csharp")]
    #[test_case(Language::Php, "<?php function f() {} \n", "program" ; "parse_trivial_php")]
    #[test_case(Language::Ruby, "def foo; end\n", "program" ; "parse_trivial_ruby")]
    #[test_case(Language::Swift, "func main() {}\n", "source_file" ; "parse_trivial_swift")]
    fn parse_trivial_source(lang: Language, source: &str, expected_root: &str) {
        let parser = CodeParser::new();
        let tree = parser.parse(source, lang).unwrap_or_else(|e| {
            panic!("Failed to parse {:?}: {:?}", lang, e);
        });
        let root = tree.root_node();
        assert_eq!(root.kind(), expected_root, "Root node kind for {:?}", lang);
        assert!(root.child_count() > 0, "Expected children for {:?}", lang);
    }

    #[test]
    fn code_parser_default_works() {
        let parser = CodeParser;
        let tree = parser.parse("fn main() {}", Language::Rust);
        assert!(tree.is_ok());
    }
}
