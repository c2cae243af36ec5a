//! Indexer: parse source files, extract declarations, calls, and heritage,
//! and rebuild a project's graph.

pub mod declarations;
pub mod inheritance;
pub mod parser;
pub mod pipeline;
pub mod syntax;

pub use declarations::{extract_file, FileExtraction};
pub use inheritance::InheritanceExtractor;
pub use parser::CodeParser;
pub use pipeline::{RefreshPipeline, RefreshReport};
pub use syntax::{SyntaxNode, TsNode};
