//! Semantic analysis module
//!
//! Checking runs in two passes over a parsed [`Script`](crate::frontend::ast::Script):
//! a signature pass that fills the global procedure table, then one body
//! check per procedure against a fresh local scope.

mod scope;
mod analyzer;
mod types;

pub use scope::{GlobalTable, LocalScope, ParamEntry, ProcEntry, SymbolEntry, VarEntry};
pub use analyzer::{check_script, CheckResult, CheckedScript, ScriptChecker};
pub use types::{Operand, OperandMismatch, TypeChecker};
