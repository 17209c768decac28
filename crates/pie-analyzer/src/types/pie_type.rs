//! Primitive types and symbol kind tags

use std::fmt;

/// All (primitive) types supported by Piethon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieType {
    /// 32-bit signed integer
    Int32,
    /// Boolean
    Bool,
    /// No value
    Void,
    /// Type of an expression that could not be typed soundly
    ///
    /// Never written in source. Any check that sees `Error` on either side
    /// stays silent.
    Error,
}

impl PieType {
    pub fn is_error(self) -> bool {
        matches!(self, PieType::Error)
    }

    /// True when `self` may be stored where `expected` is declared
    ///
    /// `Error` is compatible with everything so that it never produces a
    /// second diagnostic.
    pub fn is_compatible_with(self, expected: PieType) -> bool {
        self.is_error() || expected.is_error() || self == expected
    }
}

impl fmt::Display for PieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieType::Int32 => "Int32",
            PieType::Bool => "Bool",
            PieType::Void => "Void",
            PieType::Error => "Error",
        };
        f.write_str(name)
    }
}

/// Kinds of definitions in a script; only used to label diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Procedure,
    Variable,
    Parameter,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolKind::Procedure => "Procedure",
            SymbolKind::Variable => "Variable",
            SymbolKind::Parameter => "Parameter",
        };
        f.write_str(name)
    }
}
