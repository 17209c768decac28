//! Procedure declaration AST nodes

use super::Stmt;
use crate::common::Span;
use crate::types::PieType;

/// Procedure definition: `def name(params) : Type is ... end`
#[derive(Debug, Clone, PartialEq)]
pub struct ProcDecl {
    pub name: String,
    /// Span of the name alone
    pub name_span: Span,
    pub params: Vec<ParamDecl>,
    pub return_type: PieType,
    pub body: Vec<Stmt>,
    /// Span of the whole definition
    pub span: Span,
}

impl ProcDecl {
    pub fn new(
        name: String,
        name_span: Span,
        params: Vec<ParamDecl>,
        return_type: PieType,
        span: Span,
    ) -> Self {
        Self {
            name,
            name_span,
            params,
            return_type,
            body: Vec::new(),
            span,
        }
    }

    pub fn with_body(mut self, body: Vec<Stmt>) -> Self {
        self.body = body;
        self
    }
}

/// Formal parameter: `name : Type`
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    pub name: String,
    pub ty: PieType,
    pub span: Span,
}

impl ParamDecl {
    pub fn new(name: String, ty: PieType, span: Span) -> Self {
        Self { name, ty, span }
    }
}
