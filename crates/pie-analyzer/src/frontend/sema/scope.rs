//! Symbol tables: the global procedure table and per-procedure local scopes

use crate::common::SourceLocation;
use crate::types::{PieType, SymbolKind};
use std::collections::HashMap;

/// Signature of a declared procedure
#[derive(Debug, Clone, PartialEq)]
pub struct ProcEntry {
    pub name: String,
    pub params: Vec<ParamEntry>,
    pub return_type: PieType,
    pub loc: SourceLocation,
}

impl ProcEntry {
    pub fn new(name: String, params: Vec<ParamEntry>, return_type: PieType, loc: SourceLocation) -> Self {
        Self {
            name,
            params,
            return_type,
            loc,
        }
    }

    /// Declared formal parameter types, in order
    pub fn param_types(&self) -> Vec<PieType> {
        self.params.iter().map(|p| p.ty).collect()
    }
}

/// A local variable declaration
#[derive(Debug, Clone, PartialEq)]
pub struct VarEntry {
    pub name: String,
    pub ty: PieType,
    pub loc: SourceLocation,
}

impl VarEntry {
    pub fn new(name: String, ty: PieType, loc: SourceLocation) -> Self {
        Self { name, ty, loc }
    }
}

/// A formal parameter declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ParamEntry {
    pub name: String,
    pub ty: PieType,
    pub loc: SourceLocation,
}

impl ParamEntry {
    pub fn new(name: String, ty: PieType, loc: SourceLocation) -> Self {
        Self { name, ty, loc }
    }
}

/// A name bound in a local scope
///
/// Procedures live in the [`GlobalTable`] as [`ProcEntry`] and never appear
/// here.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolEntry {
    Variable(VarEntry),
    Parameter(ParamEntry),
}

impl SymbolEntry {
    pub fn ty(&self) -> PieType {
        match self {
            SymbolEntry::Variable(v) => v.ty,
            SymbolEntry::Parameter(p) => p.ty,
        }
    }

    pub fn kind(&self) -> SymbolKind {
        match self {
            SymbolEntry::Variable(_) => SymbolKind::Variable,
            SymbolEntry::Parameter(_) => SymbolKind::Parameter,
        }
    }
}

/// Procedure name to signature, filled once by the signature pass
#[derive(Debug, Default)]
pub struct GlobalTable {
    procedures: HashMap<String, ProcEntry>,
}

impl GlobalTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a signature; a taken name hands the rejected entry back
    pub fn define(&mut self, entry: ProcEntry) -> Result<(), ProcEntry> {
        if self.procedures.contains_key(&entry.name) {
            return Err(entry);
        }
        self.procedures.insert(entry.name.clone(), entry);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&ProcEntry> {
        self.procedures.get(name)
    }
}

/// Flat binding environment for one procedure body
///
/// Holds only parameters and variables. A name can be bound once; a second
/// declaration is a duplicate, never a shadow.
#[derive(Debug, Default)]
pub struct LocalScope {
    symbols: HashMap<String, SymbolEntry>,
}

impl LocalScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define_parameter(&mut self, entry: ParamEntry) -> Result<(), ParamEntry> {
        if self.symbols.contains_key(&entry.name) {
            return Err(entry);
        }
        self.symbols.insert(entry.name.clone(), SymbolEntry::Parameter(entry));
        Ok(())
    }

    pub fn define_variable(&mut self, entry: VarEntry) -> Result<(), VarEntry> {
        if self.symbols.contains_key(&entry.name) {
            return Err(entry);
        }
        self.symbols.insert(entry.name.clone(), SymbolEntry::Variable(entry));
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&SymbolEntry> {
        self.symbols.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Span, TextInput};

    fn loc() -> SourceLocation {
        TextInput::new("<test>", "x").locate(Span::new(0, 1))
    }

    #[test]
    fn test_global_table_keeps_first_definition() {
        let mut table = GlobalTable::new();
        table
            .define(ProcEntry::new("f".into(), Vec::new(), PieType::Void, loc()))
            .unwrap();
        let rejected = table
            .define(ProcEntry::new("f".into(), Vec::new(), PieType::Int32, loc()))
            .unwrap_err();

        assert_eq!(rejected.return_type, PieType::Int32);
        assert_eq!(table.lookup("f").unwrap().return_type, PieType::Void);
    }

    #[test]
    fn test_local_scope_rejects_reuse_across_kinds() {
        let mut scope = LocalScope::new();
        scope
            .define_parameter(ParamEntry::new("x".into(), PieType::Bool, loc()))
            .unwrap();
        assert!(scope
            .define_variable(VarEntry::new("x".into(), PieType::Int32, loc()))
            .is_err());

        let entry = scope.lookup("x").unwrap();
        assert_eq!(entry.kind(), SymbolKind::Parameter);
        assert_eq!(entry.ty(), PieType::Bool);
        assert!(scope.lookup("y").is_none());
    }

    #[test]
    fn test_param_types_in_order() {
        let entry = ProcEntry::new(
            "f".into(),
            vec![
                ParamEntry::new("a".into(), PieType::Int32, loc()),
                ParamEntry::new("b".into(), PieType::Bool, loc()),
            ],
            PieType::Void,
            loc(),
        );
        assert_eq!(entry.param_types(), vec![PieType::Int32, PieType::Bool]);
    }
}
