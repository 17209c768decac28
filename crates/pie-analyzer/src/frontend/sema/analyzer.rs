//! Semantic analyzer - scope resolution and type checking

use log::debug;

use crate::common::{Diagnostic, SourceLocation, Span, TextInput};
use crate::frontend::ast::*;
use crate::types::{PieType, SymbolKind};
use super::scope::{GlobalTable, LocalScope, ParamEntry, ProcEntry, VarEntry};
use super::types::{Operand, TypeChecker};

/// A script that passed semantic checking, unchanged
///
/// Only the checker can produce one, so holding a `CheckedScript` is proof
/// that the tree is scope- and type-correct.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedScript {
    script: Script,
}

impl CheckedScript {
    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn into_script(self) -> Script {
        self.script
    }
}

/// Either the validated tree or every diagnostic found, in source order
pub type CheckResult = Result<CheckedScript, Vec<Diagnostic>>;

/// Check `script` with a fresh checker
pub fn check_script(script: Script, source: &TextInput) -> CheckResult {
    ScriptChecker::new(source).check(script)
}

/// Semantic checker for one script
///
/// [`check`](Self::check) consumes the checker, so the global table and the
/// diagnostic list never carry over between runs.
pub struct ScriptChecker<'src> {
    source: &'src TextInput,
    globals: GlobalTable,
    type_checker: TypeChecker,
    diagnostics: Vec<Diagnostic>,
}

/// State for the body of the procedure being checked
struct ProcContext {
    scope: LocalScope,
    return_type: PieType,
    returns: usize,
}

impl ProcContext {
    fn new(return_type: PieType) -> Self {
        Self {
            scope: LocalScope::new(),
            return_type,
            returns: 0,
        }
    }
}

impl<'src> ScriptChecker<'src> {
    pub fn new(source: &'src TextInput) -> Self {
        Self {
            source,
            globals: GlobalTable::new(),
            type_checker: TypeChecker::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Run both passes and aggregate the result
    pub fn check(mut self, script: Script) -> CheckResult {
        // First pass: procedure signatures, so bodies may call forward
        self.collect_signatures(&script);

        // Second pass: procedure bodies
        for procedure in &script.procedures {
            self.check_procedure(procedure);
        }

        debug!(
            "checked {} procedure(s) in '{}': {} diagnostic(s)",
            script.procedures.len(),
            self.source.name(),
            self.diagnostics.len()
        );

        if self.diagnostics.is_empty() {
            return Ok(CheckedScript { script });
        }

        // Both passes append in their own order; report in source order
        self.diagnostics.sort_by_key(|d| d.location().span.start);
        Err(self.diagnostics)
    }

    fn locate(&self, span: Span) -> SourceLocation {
        self.source.locate(span)
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        debug!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    /// Report a mismatch unless the types agree or either one is `Error`
    fn expect_type(&mut self, expected: PieType, actual: PieType, span: Span) {
        if !actual.is_compatible_with(expected) {
            let loc = self.locate(span);
            self.report(Diagnostic::type_mismatch(expected, actual, loc));
        }
    }

    // =========================================================================
    // Signature pass
    // =========================================================================

    fn collect_signatures(&mut self, script: &Script) {
        let mut defined = 0;
        for procedure in &script.procedures {
            let params = procedure
                .params
                .iter()
                .map(|p| ParamEntry::new(p.name.clone(), p.ty, self.locate(p.span)))
                .collect();
            let entry = ProcEntry::new(
                procedure.name.clone(),
                params,
                procedure.return_type,
                self.locate(procedure.name_span),
            );

            match self.globals.define(entry) {
                Ok(()) => defined += 1,
                Err(dup) => self.report(Diagnostic::dup_symbol(dup.name, SymbolKind::Procedure, dup.loc)),
            }
        }
        debug!("collected {defined} procedure signature(s)");
    }

    // =========================================================================
    // Procedure bodies
    // =========================================================================

    fn check_procedure(&mut self, procedure: &ProcDecl) {
        debug!("checking procedure '{}'", procedure.name);
        let mut ctx = ProcContext::new(procedure.return_type);

        for param in &procedure.params {
            let entry = ParamEntry::new(param.name.clone(), param.ty, self.locate(param.span));
            if let Err(dup) = ctx.scope.define_parameter(entry) {
                self.report(Diagnostic::dup_symbol(dup.name, SymbolKind::Parameter, dup.loc));
            }
        }

        for stmt in &procedure.body {
            self.check_stmt(stmt, &mut ctx);
        }

        self.check_return_count(procedure, &ctx);
    }

    /// A non-void procedure without any return; surplus returns are
    /// reported where they occur
    fn check_return_count(&mut self, procedure: &ProcDecl, ctx: &ProcContext) {
        if ctx.returns == 0 && procedure.return_type != PieType::Void {
            let loc = self.locate(procedure.name_span);
            self.report(Diagnostic::too_few_or_too_many_returns(1, loc));
        }
    }

    fn check_stmt(&mut self, stmt: &Stmt, ctx: &mut ProcContext) {
        match &stmt.kind {
            StmtKind::VarDecl {
                name,
                name_span,
                ty,
                init,
            } => {
                // The initializer is checked before the name is bound
                if let Some(init) = init {
                    let actual = self.infer_expr(init, &ctx.scope);
                    self.expect_type(*ty, actual, init.span);
                }

                // Registered with the declared type even after a mismatch
                let entry = VarEntry::new(name.clone(), *ty, self.locate(*name_span));
                if let Err(dup) = ctx.scope.define_variable(entry) {
                    self.report(Diagnostic::dup_symbol(dup.name, SymbolKind::Variable, dup.loc));
                }
            }

            StmtKind::Assign {
                target,
                target_span,
                value,
            } => {
                let target_ty = match ctx.scope.lookup(target) {
                    Some(entry) => entry.ty(),
                    None => {
                        let loc = self.locate(*target_span);
                        self.report(Diagnostic::no_such_symbol(target.clone(), loc));
                        PieType::Error
                    }
                };
                let actual = self.infer_expr(value, &ctx.scope);
                self.expect_type(target_ty, actual, value.span);
            }

            StmtKind::Call(call) => {
                self.check_call(call, &ctx.scope);
            }

            StmtKind::Return(value) => {
                // Non-void procedures need exactly one return, void ones at most one
                ctx.returns += 1;
                if ctx.returns == 2 {
                    let loc = self.locate(stmt.span);
                    self.report(Diagnostic::too_few_or_too_many_returns(1, loc));
                }

                let (actual, span) = match value {
                    Some(expr) => (self.infer_expr(expr, &ctx.scope), expr.span),
                    None => (PieType::Void, stmt.span),
                };
                self.expect_type(ctx.return_type, actual, span);
            }
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Infer the type of `expr`, reporting problems found inside it
    fn infer_expr(&mut self, expr: &Expr, scope: &LocalScope) -> PieType {
        match &expr.kind {
            ExprKind::IntLiteral(_) => PieType::Int32,
            ExprKind::BoolLiteral(_) => PieType::Bool,

            // Locals only: the global table never holds variables
            ExprKind::Identifier(name) => match scope.lookup(name) {
                Some(entry) => entry.ty(),
                None => {
                    let loc = self.locate(expr.span);
                    self.report(Diagnostic::no_such_symbol(name.clone(), loc));
                    PieType::Error
                }
            },

            ExprKind::Call(call) => self.check_call(call, scope),

            ExprKind::Binary { op, left, right } => {
                let left_ty = self.infer_expr(left, scope);
                let right_ty = self.infer_expr(right, scope);
                if left_ty.is_error() || right_ty.is_error() {
                    return PieType::Error;
                }

                match self.type_checker.binary_result_type(*op, left_ty, right_ty) {
                    Ok(ty) => ty,
                    Err(mismatch) => {
                        let span = match mismatch.operand {
                            Operand::Left | Operand::Only => left.span,
                            Operand::Right => right.span,
                        };
                        self.expect_type(mismatch.expected, mismatch.actual, span);
                        PieType::Error
                    }
                }
            }

            ExprKind::Unary { op, operand } => {
                let operand_ty = self.infer_expr(operand, scope);
                if operand_ty.is_error() {
                    return PieType::Error;
                }

                match self.type_checker.unary_result_type(*op, operand_ty) {
                    Ok(ty) => ty,
                    Err(mismatch) => {
                        self.expect_type(mismatch.expected, mismatch.actual, operand.span);
                        PieType::Error
                    }
                }
            }
        }
    }

    /// Resolve and check a call; its type is the callee's return type
    fn check_call(&mut self, call: &Call, scope: &LocalScope) -> PieType {
        let signature = self
            .globals
            .lookup(&call.callee)
            .map(|entry| (entry.param_types(), entry.return_type));

        let call_ty = match &signature {
            None => {
                let loc = self.locate(call.callee_span);
                self.report(Diagnostic::no_such_symbol(call.callee.clone(), loc));
                PieType::Error
            }
            Some((params, return_type)) => {
                if params.len() != call.args.len() {
                    let loc = self.locate(call.span);
                    self.report(Diagnostic::arg_count_mismatch(params.len(), call.args.len(), loc));
                }
                *return_type
            }
        };

        // Arguments are always inferred; only aligned pairs are compared
        for (index, arg) in call.args.iter().enumerate() {
            let actual = self.infer_expr(arg, scope);
            let expected = signature
                .as_ref()
                .and_then(|(params, _)| params.get(index).copied());
            if let Some(expected) = expected {
                self.expect_type(expected, actual, arg.span);
            }
        }

        call_ty
    }
}
