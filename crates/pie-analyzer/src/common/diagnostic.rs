//! User-facing diagnostics
//!
//! Every problem found in a script, syntactic or semantic, is reported as a
//! [`Diagnostic`]. Diagnostics are collected, never thrown: the checker keeps
//! going after each one so that a single run surfaces everything it can.

use thiserror::Error;
use super::{CompileError, SourceLocation, TextInput};
use crate::types::{PieType, SymbolKind};

/// A located problem in a script
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Lexer or parser failure; never mixed with semantic diagnostics
    #[error(">> Parse Error ({loc}) - {message}")]
    ParseError { message: String, loc: SourceLocation },

    /// A procedure, variable or parameter name declared twice in one scope
    #[error(">> Duplicate {kind} symbol ({loc}) - {name}")]
    DupSymbol {
        name: String,
        kind: SymbolKind,
        loc: SourceLocation,
    },

    /// Reference to an undeclared procedure or variable
    #[error(">> No such symbol ({loc}) - {name}")]
    NoSuchSymbol { name: String, loc: SourceLocation },

    #[error(">> Type mismatch ({loc}) - expected: {expected}, but got: {actual}")]
    TypeMismatch {
        expected: PieType,
        actual: PieType,
        loc: SourceLocation,
    },

    /// Call site arity differs from the callee's formal parameter count
    #[error(">> Operation call too few args ({loc}) - expected: {expected}, but got: {provided}")]
    ArgCountMismatch {
        expected: usize,
        provided: usize,
        loc: SourceLocation,
    },

    #[error(">> Too many or too few return statements ({loc}) - expected: {expected} return statement")]
    TooFewOrTooManyReturns { expected: usize, loc: SourceLocation },
}

impl Diagnostic {
    pub fn parse_error(error: &CompileError, source: &TextInput) -> Self {
        Self::ParseError {
            message: error.message().to_string(),
            loc: source.locate(error.span()),
        }
    }

    pub fn dup_symbol(name: impl Into<String>, kind: SymbolKind, loc: SourceLocation) -> Self {
        Self::DupSymbol {
            name: name.into(),
            kind,
            loc,
        }
    }

    pub fn no_such_symbol(name: impl Into<String>, loc: SourceLocation) -> Self {
        Self::NoSuchSymbol {
            name: name.into(),
            loc,
        }
    }

    pub fn type_mismatch(expected: PieType, actual: PieType, loc: SourceLocation) -> Self {
        Self::TypeMismatch { expected, actual, loc }
    }

    pub fn arg_count_mismatch(expected: usize, provided: usize, loc: SourceLocation) -> Self {
        Self::ArgCountMismatch {
            expected,
            provided,
            loc,
        }
    }

    pub fn too_few_or_too_many_returns(expected: usize, loc: SourceLocation) -> Self {
        Self::TooFewOrTooManyReturns { expected, loc }
    }

    /// Category of the diagnostic, e.g. "Parse error"
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::ParseError { .. } => "Parse error",
            Diagnostic::DupSymbol { .. }
            | Diagnostic::NoSuchSymbol { .. }
            | Diagnostic::TypeMismatch { .. }
            | Diagnostic::ArgCountMismatch { .. }
            | Diagnostic::TooFewOrTooManyReturns { .. } => "Semantic error",
        }
    }

    /// Variant tag, e.g. "TypeMismatch"
    pub fn name(&self) -> &'static str {
        match self {
            Diagnostic::ParseError { .. } => "ParseError",
            Diagnostic::DupSymbol { .. } => "DupSymbol",
            Diagnostic::NoSuchSymbol { .. } => "NoSuchSymbol",
            Diagnostic::TypeMismatch { .. } => "TypeMismatch",
            Diagnostic::ArgCountMismatch { .. } => "ArgCountMismatch",
            Diagnostic::TooFewOrTooManyReturns { .. } => "TooFewOrTooManyReturns",
        }
    }

    pub fn location(&self) -> &SourceLocation {
        match self {
            Diagnostic::ParseError { loc, .. }
            | Diagnostic::DupSymbol { loc, .. }
            | Diagnostic::NoSuchSymbol { loc, .. }
            | Diagnostic::TypeMismatch { loc, .. }
            | Diagnostic::ArgCountMismatch { loc, .. }
            | Diagnostic::TooFewOrTooManyReturns { loc, .. } => loc,
        }
    }

    /// Rendered one-line message embedding the location
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self, Diagnostic::ParseError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Span;

    fn loc() -> SourceLocation {
        TextInput::new("<test>", "def f() : Void is\nend\n").locate(Span::new(4, 5))
    }

    #[test]
    fn test_messages_embed_location() {
        let diagnostic = Diagnostic::dup_symbol("f", SymbolKind::Procedure, loc());
        assert_eq!(diagnostic.message(), ">> Duplicate Procedure symbol (<test>:1:5) - f");

        let diagnostic = Diagnostic::arg_count_mismatch(2, 1, loc());
        assert_eq!(
            diagnostic.message(),
            ">> Operation call too few args (<test>:1:5) - expected: 2, but got: 1"
        );
    }

    #[test]
    fn test_kind_and_name() {
        let diagnostic = Diagnostic::no_such_symbol("x", loc());
        assert_eq!(diagnostic.kind(), "Semantic error");
        assert_eq!(diagnostic.name(), "NoSuchSymbol");
        assert!(!diagnostic.is_parse_error());

        let source = TextInput::new("<test>", "def");
        let err = CompileError::parser("expected identifier", Span::new(3, 3));
        let diagnostic = Diagnostic::parse_error(&err, &source);
        assert_eq!(diagnostic.kind(), "Parse error");
        assert_eq!(diagnostic.location().begin_col, 4);
    }
}
