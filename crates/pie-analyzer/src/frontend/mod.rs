//! Piethon front end
//!
//! 1. Lexing source code into tokens
//! 2. Parsing tokens into an AST
//! 3. Semantic analysis (scopes, types, return counts)

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod sema;

pub use parser::Parser;
pub use sema::{check_script, CheckResult, CheckedScript};
