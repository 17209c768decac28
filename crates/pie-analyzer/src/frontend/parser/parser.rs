//! Recursive descent parser for Piethon
//!
//! The parser does not stop at the first syntax error. A malformed statement
//! is skipped up to the next `;`, a malformed procedure header up to the next
//! `def`, and every error seen along the way is returned together.

use crate::frontend::ast::*;
use crate::common::{CompileError, CompileResult, Span};
use crate::frontend::lexer::{Lexer, Token, TokenKind};
use crate::types::PieType;

/// Deepest expression nesting accepted before parsing gives up
const MAX_EXPR_DEPTH: usize = 64;

/// Recursive descent parser for Piethon
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    errors: Vec<CompileError>,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source
    pub fn new(source: &'a str) -> Self {
        let mut parser = Self {
            lexer: Lexer::new(source),
            current: Token::new(TokenKind::Eof, Span::default()),
            errors: Vec::new(),
            depth: 0,
        };
        parser.current = parser.next_valid_token();
        parser
    }

    /// Parse a complete script
    pub fn parse(mut self) -> Result<Script, Vec<CompileError>> {
        let mut procedures = Vec::new();

        while !self.at_end() {
            if !self.check(&TokenKind::Def) {
                let err = CompileError::parser(
                    format!("expected 'def', found {}", self.current.kind),
                    self.current.span,
                );
                self.errors.push(err);
                self.advance();
                self.synchronize_procedure();
                continue;
            }

            match self.parse_procedure() {
                Ok(procedure) => procedures.push(procedure),
                Err(err) => {
                    self.errors.push(err);
                    self.synchronize_procedure();
                }
            }
        }

        if self.errors.is_empty() {
            Ok(Script::new(procedures))
        } else {
            Err(self.errors)
        }
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    fn at_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Eof)
    }

    /// Pull tokens until one lexes cleanly, recording lexer errors on the way
    fn next_valid_token(&mut self) -> Token {
        loop {
            match self.lexer.next_token() {
                Ok(token) => return token,
                Err(err) => self.errors.push(err),
            }
        }
    }

    fn advance(&mut self) -> Token {
        let next = self.next_valid_token();
        std::mem::replace(&mut self.current, next)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> CompileResult<Token> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(CompileError::parser(
                format!("expected {}, found {}", kind, self.current.kind),
                self.current.span,
            ))
        }
    }

    fn expect_identifier(&mut self) -> CompileResult<(String, Span)> {
        if let TokenKind::Identifier(name) = &self.current.kind {
            let name = name.clone();
            let token = self.advance();
            Ok((name, token.span))
        } else {
            Err(CompileError::parser(
                format!("expected identifier, found {}", self.current.kind),
                self.current.span,
            ))
        }
    }

    /// Skip to the start of the next procedure
    fn synchronize_procedure(&mut self) {
        while !self.at_end() && !self.check(&TokenKind::Def) {
            self.advance();
        }
    }

    /// Skip past the end of the current statement
    ///
    /// Stops after a `;`, or before `end`/`def` so the enclosing procedure can
    /// still be closed.
    fn synchronize_statement(&mut self) {
        while !self.at_end() {
            match self.current.kind {
                TokenKind::Semi => {
                    self.advance();
                    return;
                }
                TokenKind::End | TokenKind::Def => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    // =========================================================================
    // Procedures
    // =========================================================================

    fn parse_procedure(&mut self) -> CompileResult<ProcDecl> {
        let start_span = self.expect(TokenKind::Def)?.span;
        let (name, name_span) = self.expect_identifier()?;

        self.expect(TokenKind::LParen)?;
        let params = self.parse_parameter_list()?;
        self.expect(TokenKind::RParen)?;

        self.expect(TokenKind::Colon)?;
        let return_type = self.parse_type()?;
        self.expect(TokenKind::Is)?;

        let mut body = Vec::new();
        while !self.check(&TokenKind::End) && !self.check(&TokenKind::Def) && !self.at_end() {
            match self.parse_statement() {
                Ok(stmt) => body.push(stmt),
                Err(err) => {
                    self.errors.push(err);
                    self.synchronize_statement();
                }
            }
        }

        let end = self.expect(TokenKind::End)?;
        let span = start_span.merge(end.span);

        Ok(ProcDecl::new(name, name_span, params, return_type, span).with_body(body))
    }

    fn parse_parameter_list(&mut self) -> CompileResult<Vec<ParamDecl>> {
        let mut params = Vec::new();
        if self.check(&TokenKind::RParen) {
            return Ok(params);
        }

        loop {
            let (name, name_span) = self.expect_identifier()?;
            self.expect(TokenKind::Colon)?;
            let type_span = self.current.span;
            let ty = self.parse_type()?;
            params.push(ParamDecl::new(name, ty, name_span.merge(type_span)));

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        Ok(params)
    }

    fn parse_type(&mut self) -> CompileResult<PieType> {
        let ty = match self.current.kind {
            TokenKind::Int32 => PieType::Int32,
            TokenKind::Bool => PieType::Bool,
            TokenKind::Void => PieType::Void,
            _ => {
                return Err(CompileError::parser(
                    format!("expected type, found {}", self.current.kind),
                    self.current.span,
                ));
            }
        };
        self.advance();
        Ok(ty)
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_statement(&mut self) -> CompileResult<Stmt> {
        match &self.current.kind {
            TokenKind::Var => self.parse_var_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Identifier(_) => self.parse_identifier_statement(),
            _ => Err(CompileError::parser(
                format!("expected statement, found {}", self.current.kind),
                self.current.span,
            )),
        }
    }

    fn parse_var_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.expect(TokenKind::Var)?.span;
        let (name, name_span) = self.expect_identifier()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;

        let init = if self.match_token(&TokenKind::ColonEq) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let semi = self.expect(TokenKind::Semi)?;
        Ok(Stmt::new(
            StmtKind::VarDecl {
                name,
                name_span,
                ty,
                init,
            },
            start_span.merge(semi.span),
        ))
    }

    fn parse_return_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.expect(TokenKind::Return)?.span;

        let value = if self.check(&TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        let semi = self.expect(TokenKind::Semi)?;
        Ok(Stmt::new(StmtKind::Return(value), start_span.merge(semi.span)))
    }

    /// Assignment (`x := e;`) or call statement (`f(a);`)
    fn parse_identifier_statement(&mut self) -> CompileResult<Stmt> {
        let (name, name_span) = self.expect_identifier()?;

        let kind = if self.match_token(&TokenKind::ColonEq) {
            let value = self.parse_expression()?;
            StmtKind::Assign {
                target: name,
                target_span: name_span,
                value,
            }
        } else if self.check(&TokenKind::LParen) {
            StmtKind::Call(self.parse_call(name, name_span)?)
        } else {
            return Err(CompileError::parser(
                format!("expected ':=' or '(' after identifier, found {}", self.current.kind),
                self.current.span,
            ));
        };

        let semi = self.expect(TokenKind::Semi)?;
        Ok(Stmt::new(kind, name_span.merge(semi.span)))
    }

    fn parse_call(&mut self, callee: String, callee_span: Span) -> CompileResult<Call> {
        self.expect(TokenKind::LParen)?;
        let args = self.parse_argument_list()?;
        let rparen = self.expect(TokenKind::RParen)?;
        Ok(Call::new(callee, callee_span, args, callee_span.merge(rparen.span)))
    }

    fn parse_argument_list(&mut self) -> CompileResult<Vec<Expr>> {
        let mut args = Vec::new();
        if self.check(&TokenKind::RParen) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        Ok(args)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expression(&mut self) -> CompileResult<Expr> {
        self.parse_or_expression()
    }

    fn parse_or_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_and_expression()?;
        while self.match_token(&TokenKind::Or) {
            let right = self.parse_and_expression()?;
            left = binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_equality_expression()?;
        while self.match_token(&TokenKind::And) {
            let right = self.parse_equality_expression()?;
            left = binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_equality_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_relational_expression()?;
        loop {
            let op = match self.current.kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::Ne,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational_expression()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_relational_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_additive_expression()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::LtEq => BinaryOp::Le,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::GtEq => BinaryOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive_expression()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_multiplicative_expression()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative_expression()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_unary_expression()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary_expression()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    /// Every nested expression passes through here, so this is where
    /// nesting depth is bounded
    fn parse_unary_expression(&mut self) -> CompileResult<Expr> {
        if self.depth >= MAX_EXPR_DEPTH {
            return Err(CompileError::parser(
                format!("expression nested deeper than {} levels", MAX_EXPR_DEPTH),
                self.current.span,
            ));
        }

        self.depth += 1;
        let result = self.parse_unary_operand();
        self.depth -= 1;
        result
    }

    fn parse_unary_operand(&mut self) -> CompileResult<Expr> {
        let op = match self.current.kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Not => UnaryOp::Not,
            _ => return self.parse_primary_expression(),
        };
        let start_span = self.advance().span;

        // `-2147483648` only fits once the sign is part of the literal
        if op == UnaryOp::Neg {
            if let TokenKind::IntLiteral(text) = &self.current.kind {
                let span = start_span.merge(self.current.span);
                let value = parse_int_literal(&format!("-{}", text), span)?;
                self.advance();
                return Ok(Expr::new(ExprKind::IntLiteral(value), span));
            }
        }

        let operand = self.parse_unary_expression()?;
        let span = start_span.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_primary_expression(&mut self) -> CompileResult<Expr> {
        let start_span = self.current.span;

        match &self.current.kind {
            TokenKind::IntLiteral(text) => {
                let value = parse_int_literal(text, start_span)?;
                self.advance();
                Ok(Expr::new(ExprKind::IntLiteral(value), start_span))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::new(ExprKind::BoolLiteral(true), start_span))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::new(ExprKind::BoolLiteral(false), start_span))
            }
            TokenKind::Identifier(_) => {
                let (name, name_span) = self.expect_identifier()?;
                if self.check(&TokenKind::LParen) {
                    let call = self.parse_call(name, name_span)?;
                    let span = call.span;
                    Ok(Expr::new(ExprKind::Call(call), span))
                } else {
                    Ok(Expr::new(ExprKind::Identifier(name), name_span))
                }
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                let rparen = self.expect(TokenKind::RParen)?;
                Ok(Expr::new(inner.kind, start_span.merge(rparen.span)))
            }
            _ => Err(CompileError::parser(
                format!("expected expression, found {}", self.current.kind),
                start_span,
            )),
        }
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    )
}

fn parse_int_literal(text: &str, span: Span) -> CompileResult<i32> {
    text.parse::<i32>().map_err(|_| {
        CompileError::parser(format!("integer literal '{}' does not fit in Int32", text), span)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_ok(source: &str) -> Script {
        match Parser::new(source).parse() {
            Ok(script) => script,
            Err(errors) => panic!("unexpected parse errors: {:?}", errors),
        }
    }

    #[test]
    fn test_parse_simple_procedure() {
        let script = parse_ok("def moo(x : Bool, y : Int32) : Int32 is\n    return y;\nend\n");

        assert_eq!(script.procedures.len(), 1);
        let procedure = &script.procedures[0];
        assert_eq!(procedure.name, "moo");
        assert_eq!(procedure.return_type, PieType::Int32);
        assert_eq!(
            procedure.params.iter().map(|p| (p.name.as_str(), p.ty)).collect::<Vec<_>>(),
            vec![("x", PieType::Bool), ("y", PieType::Int32)]
        );
        assert!(matches!(procedure.body[0].kind, StmtKind::Return(Some(_))));
    }

    #[test]
    fn test_parse_statements() {
        let script = parse_ok(
            "def f() : Void is
                var x : Int32 := 1;
                var b : Bool;
                x := x + 1;
                g(x, true);
                return;
            end",
        );

        let body = &script.procedures[0].body;
        assert_eq!(body.len(), 5);
        assert!(matches!(&body[0].kind, StmtKind::VarDecl { name, init: Some(_), .. } if name == "x"));
        assert!(matches!(&body[1].kind, StmtKind::VarDecl { init: None, ty: PieType::Bool, .. }));
        assert!(matches!(&body[2].kind, StmtKind::Assign { target, .. } if target == "x"));
        assert!(matches!(&body[3].kind, StmtKind::Call(call) if call.callee == "g" && call.args.len() == 2));
        assert!(matches!(body[4].kind, StmtKind::Return(None)));
    }

    #[test]
    fn test_operator_precedence() {
        let script = parse_ok("def f() : Bool is return 1 + 2 * 3 < 10 and not false; end");

        let StmtKind::Return(Some(expr)) = &script.procedures[0].body[0].kind else {
            panic!("expected return statement");
        };
        let ExprKind::Binary { op: BinaryOp::And, left, right } = &expr.kind else {
            panic!("expected 'and' at the root");
        };
        assert!(matches!(left.kind, ExprKind::Binary { op: BinaryOp::Lt, .. }));
        assert!(matches!(right.kind, ExprKind::Unary { op: UnaryOp::Not, .. }));

        let ExprKind::Binary { left: sum, .. } = &left.kind else {
            unreachable!()
        };
        let ExprKind::Binary { op, right: product, .. } = &sum.kind else {
            panic!("expected addition");
        };
        assert_eq!(*op, BinaryOp::Add);
        assert!(matches!(product.kind, ExprKind::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn test_nested_call_expression() {
        let script = parse_ok("def f() : Int32 is return g(h(1), (2)); end");

        let StmtKind::Return(Some(expr)) = &script.procedures[0].body[0].kind else {
            panic!("expected return statement");
        };
        let ExprKind::Call(call) = &expr.kind else {
            panic!("expected call");
        };
        assert_eq!(call.callee, "g");
        assert!(matches!(&call.args[0].kind, ExprKind::Call(inner) if inner.callee == "h"));
        assert!(matches!(call.args[1].kind, ExprKind::IntLiteral(2)));
    }

    #[test]
    fn test_recovers_after_bad_statement() {
        let errors = Parser::new(
            "def f() : Void is
                x + ;
                y := ;
                g();
            end
            def h() : Void is
            end",
        )
        .parse()
        .unwrap_err();

        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| matches!(e, CompileError::Parser { .. })));
    }

    #[test]
    fn test_recovers_after_bad_header() {
        let errors = Parser::new(
            "def f( : Void is end
             def g() : Int32 is return 1 end",
        )
        .parse()
        .unwrap_err();

        // one error per broken procedure
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_lexer_errors_are_collected() {
        let errors = Parser::new("def f() : Void is @ end").parse().unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], CompileError::Lexer { .. }));
    }

    #[test]
    fn test_int_literal_out_of_range() {
        let errors = Parser::new("def f() : Int32 is return 2147483648; end")
            .parse()
            .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(errors[0].message().contains("does not fit in Int32"));
    }

    #[test]
    fn test_negative_literals() {
        let script = parse_ok("def f() : Int32 is return -2147483648 - -1 + -(2); end");

        let StmtKind::Return(Some(expr)) = &script.procedures[0].body[0].kind else {
            panic!("expected return statement");
        };
        let ExprKind::Binary { op: BinaryOp::Add, left, right } = &expr.kind else {
            panic!("expected addition at the root");
        };
        let ExprKind::Binary { op: BinaryOp::Sub, left: min, right: minus_one } = &left.kind else {
            panic!("expected subtraction");
        };
        assert!(matches!(min.kind, ExprKind::IntLiteral(i32::MIN)));
        assert!(matches!(minus_one.kind, ExprKind::IntLiteral(-1)));
        assert!(matches!(right.kind, ExprKind::Unary { op: UnaryOp::Neg, .. }));

        let errors = Parser::new("def f() : Int32 is return -2147483649; end")
            .parse()
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message().contains("'-2147483649' does not fit in Int32"));
    }

    #[test]
    fn test_deep_nesting_is_an_error() {
        let depth = 20_000;
        let source = format!(
            "def f() : Int32 is return {}1{}; end def g() : Void is end",
            "(".repeat(depth),
            ")".repeat(depth)
        );
        let errors = Parser::new(&source).parse().unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(errors[0].message().contains("nested deeper than"));
    }

    #[test]
    fn test_nesting_within_limit() {
        let source = format!(
            "def f() : Int32 is return {}1{}; end",
            "(".repeat(50),
            ")".repeat(50)
        );
        assert!(matches!(
            parse_ok(&source).procedures[0].body[0].kind,
            StmtKind::Return(Some(Expr { kind: ExprKind::IntLiteral(1), .. }))
        ));
    }

    #[test]
    fn test_empty_script() {
        assert_eq!(parse_ok("  // nothing here\n").procedures.len(), 0);
    }
}
