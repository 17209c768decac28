//! Recursive descent parser producing a [`Script`](super::ast::Script)

#[allow(clippy::module_inception)]
mod parser;

pub use parser::Parser;
