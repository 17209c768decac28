//! Operator typing rules

use crate::frontend::ast::{BinaryOp, UnaryOp};
use crate::types::PieType;

/// Which operand of an operator application was ill-typed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Left,
    Right,
    /// The single operand of a unary operator
    Only,
}

/// An operand whose type the operator does not accept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperandMismatch {
    pub operand: Operand,
    pub expected: PieType,
    pub actual: PieType,
}

impl OperandMismatch {
    fn new(operand: Operand, expected: PieType, actual: PieType) -> Self {
        Self {
            operand,
            expected,
            actual,
        }
    }
}

/// Type checker for Piethon operators
///
/// Callers deal with `Error` operands before asking; these rules only see
/// real types.
#[derive(Debug, Default)]
pub struct TypeChecker;

impl TypeChecker {
    pub fn new() -> Self {
        Self
    }

    /// Get the result type of a binary operation
    pub fn binary_result_type(
        &self,
        op: BinaryOp,
        left: PieType,
        right: PieType,
    ) -> Result<PieType, OperandMismatch> {
        if op.is_equality() {
            return self.equality_result_type(left, right);
        }

        // Every other operator takes operands of one fixed type
        let (operand_ty, result_ty) = if op.is_arithmetic() {
            (PieType::Int32, PieType::Int32)
        } else if op.is_ordering() {
            (PieType::Int32, PieType::Bool)
        } else {
            debug_assert!(op.is_logical());
            (PieType::Bool, PieType::Bool)
        };

        if left != operand_ty {
            return Err(OperandMismatch::new(Operand::Left, operand_ty, left));
        }
        if right != operand_ty {
            return Err(OperandMismatch::new(Operand::Right, operand_ty, right));
        }
        Ok(result_ty)
    }

    /// `==`/`!=`: both sides must share one non-void type
    fn equality_result_type(&self, left: PieType, right: PieType) -> Result<PieType, OperandMismatch> {
        if left == PieType::Void {
            let expected = if right == PieType::Void { PieType::Int32 } else { right };
            return Err(OperandMismatch::new(Operand::Left, expected, left));
        }
        if right != left {
            return Err(OperandMismatch::new(Operand::Right, left, right));
        }
        Ok(PieType::Bool)
    }

    /// Get the result type of a unary operation
    pub fn unary_result_type(&self, op: UnaryOp, operand: PieType) -> Result<PieType, OperandMismatch> {
        let expected = match op {
            UnaryOp::Neg => PieType::Int32,
            UnaryOp::Not => PieType::Bool,
        };
        if operand == expected {
            Ok(expected)
        } else {
            Err(OperandMismatch::new(Operand::Only, expected, operand))
        }
    }
}
