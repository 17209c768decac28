//! Abstract Syntax Tree definitions

mod expr;
mod stmt;
mod decl;

pub use expr::*;
pub use stmt::*;
pub use decl::*;

/// A complete script (one source file)
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub procedures: Vec<ProcDecl>,
}

impl Script {
    pub fn new(procedures: Vec<ProcDecl>) -> Self {
        Self { procedures }
    }

    /// Names of all declared procedures, in source order
    pub fn procedure_names(&self) -> impl Iterator<Item = &str> {
        self.procedures.iter().map(|p| p.name.as_str())
    }
}
