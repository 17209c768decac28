//! Statement AST nodes

use super::{Call, Expr};
use crate::common::Span;
use crate::types::PieType;

/// Statement node
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement kinds
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Variable declaration: var x : Int32 := 0;
    VarDecl {
        name: String,
        name_span: Span,
        ty: PieType,
        init: Option<Expr>,
    },

    /// Assignment: x := e;
    Assign {
        target: String,
        target_span: Span,
        value: Expr,
    },

    /// Call statement: f(a, b);
    Call(Call),

    /// Return statement: return [expr];
    Return(Option<Expr>),
}
