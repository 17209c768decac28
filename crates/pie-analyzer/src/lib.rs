//! Piethon semantic analyzer and call graph builder
//!
//! This library checks Piethon scripts for scope and type errors and, for
//! scripts that pass, derives the directed call graph between procedures.
//!
//! ## Architecture
//!
//! The analyzer is organized into:
//! - **Frontend** (`frontend/`): Lexer, parser, AST and semantic checker
//! - **Graph** (`graph/`): Call graph construction and DOT export
//! - **Driver** (`driver/`): Parse / check / graph orchestration
//! - **Common** (`common/`): Shared infrastructure (diagnostics, spans, sources)
//! - **Types** (`types/`): Piethon type system

pub mod common;
pub mod types;
pub mod frontend;
pub mod graph;
pub mod driver;

// Re-exports for convenience
pub use common::{CompileError, CompileResult, Diagnostic, DiagnosticReporter, SourceLocation, Span, TextInput};
pub use frontend::{check_script, CheckResult, CheckedScript};
pub use graph::{build_call_graph, CallGraph, Digraph, GraphError, ProcNode};
pub use driver::{AnalyzerError, AnalyzerResult, Options, PieAnalyzer};
pub use types::{PieType, SymbolKind};
