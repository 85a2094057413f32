//! Expression parsing
//!
//! This module implements a Pratt (top-down operator precedence) parser for
//! Verilog/SystemVerilog expressions.
//!
//! # Operator Precedence (lowest to highest)
//!
//! 1. Assignment: `=`, `+=`, ..., and `<=` at statement depth (right-assoc)
//! 2. Implication: `->`, `<->`
//! 3. Conditional: `? :` (right-assoc)
//! 4. Logical OR: `||`
//! 5. Logical AND: `&&`
//! 6. Bitwise OR: `|`, `~|`
//! 7. Bitwise XOR: `^`, `~^`, `^~`
//! 8. Bitwise AND: `&`, `~&`
//! 9. Equality: `==`, `!=`, `===`, `!==`, `==?`, `!=?`
//! 10. Relational: `<`, `<=`, `>`, `>=`, `inside`
//! 11. Shift: `<<`, `>>`, `<<<`, `>>>`
//! 12. Additive: `+`, `-`
//! 13. Multiplicative: `*`, `/`, `%`
//! 14. Power: `**`
//! 15. Unary: `+`, `-`, `!`, `~`, reductions, `++`, `--`
//! 16. Postfix: `[]`, `::`, `.`, `++`, `--`
//!
//! # Grammar
//!
//! ```text
//! primary ::= literal | identifier [ '(' args ')' ] | '$' identifier [ '(' args ')' ]
//!           | '(' expression ')' | '{' list '}' | '{' expr '{' list '}' '}'
//!           | '\'' '{' list '}'
//! delay   ::= '#' primary [ time_unit ]
//! ```
//!
//! The engine tracks a nesting depth. At depth 0 the expression heads a
//! statement, so `<=` is a non-blocking assignment; at any other depth it is
//! the relational operator.

use super::ast::*;
use super::context::Context;
use super::errors::{ErrorKind, Result};
use super::parse::Parser;
use super::token::TokenKind;

const PREFIX_BP: u8 = 150;
const POSTFIX_BP: u8 = 160;
const CONDITIONAL_BP: u8 = 30;

/// Binding power of `kind` in prefix or infix position.
///
/// `assign_statement` selects the statement-depth reading of `<=`.
pub fn binding_power(kind: TokenKind, prefix: bool, assign_statement: bool) -> Option<u8> {
    use TokenKind as K;

    if prefix {
        return prefix_op(kind).map(|_| PREFIX_BP);
    }

    match kind {
        K::LBracket | K::ScopeResolution | K::Dot | K::SelfIncrement | K::SelfDecrement => {
            Some(POSTFIX_BP)
        }
        K::Pow => Some(140),
        K::Mul | K::Div | K::Mod => Some(130),
        K::Add | K::Sub => Some(120),
        K::LogicLeftShift | K::LogicRightShift | K::ArithLeftShift | K::ArithRightShift => {
            Some(110)
        }
        K::LessEqual if assign_statement => Some(10),
        K::LessThan | K::LessEqual | K::GreaterThan | K::GreaterEqual | K::Inside => Some(100),
        K::Equal
        | K::Inequal
        | K::CaseEqual
        | K::CaseInequal
        | K::WildcardEqual
        | K::WildcardInequal => Some(90),
        K::BitAnd | K::BitNand => Some(80),
        K::BitXor | K::BitXnor | K::BitXnorAlt => Some(70),
        K::BitOr | K::BitNor => Some(60),
        K::LogicAnd => Some(50),
        K::LogicOr => Some(40),
        K::QuestionMark => Some(CONDITIONAL_BP),
        K::Implication | K::Equivalence => Some(20),
        kind if assign_op(kind, false).is_some() => Some(10),
        _ => None,
    }
}

fn prefix_op(kind: TokenKind) -> Option<UnaryOp> {
    use TokenKind as K;
    Some(match kind {
        K::Add => UnaryOp::Plus,
        K::Sub => UnaryOp::Minus,
        K::LogicNot => UnaryOp::LogicNot,
        K::BitNot => UnaryOp::BitNot,
        K::BitAnd => UnaryOp::ReduceAnd,
        K::BitOr => UnaryOp::ReduceOr,
        K::BitXor => UnaryOp::ReduceXor,
        K::BitNand => UnaryOp::ReduceNand,
        K::BitNor => UnaryOp::ReduceNor,
        K::BitXnor | K::BitXnorAlt => UnaryOp::ReduceXnor,
        K::SelfIncrement => UnaryOp::PreIncrement,
        K::SelfDecrement => UnaryOp::PreDecrement,
        _ => return None,
    })
}

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    use TokenKind as K;
    Some(match kind {
        K::Pow => BinaryOp::Pow,
        K::Mul => BinaryOp::Mul,
        K::Div => BinaryOp::Div,
        K::Mod => BinaryOp::Mod,
        K::Add => BinaryOp::Add,
        K::Sub => BinaryOp::Sub,
        K::LogicLeftShift => BinaryOp::LogicLeftShift,
        K::LogicRightShift => BinaryOp::LogicRightShift,
        K::ArithLeftShift => BinaryOp::ArithLeftShift,
        K::ArithRightShift => BinaryOp::ArithRightShift,
        K::LessThan => BinaryOp::LessThan,
        K::LessEqual => BinaryOp::LessEqual,
        K::GreaterThan => BinaryOp::GreaterThan,
        K::GreaterEqual => BinaryOp::GreaterEqual,
        K::Inside => BinaryOp::Inside,
        K::Equal => BinaryOp::Equal,
        K::Inequal => BinaryOp::Inequal,
        K::CaseEqual => BinaryOp::CaseEqual,
        K::CaseInequal => BinaryOp::CaseInequal,
        K::WildcardEqual => BinaryOp::WildcardEqual,
        K::WildcardInequal => BinaryOp::WildcardInequal,
        K::BitAnd => BinaryOp::BitAnd,
        K::BitNand => BinaryOp::BitNand,
        K::BitXor => BinaryOp::BitXor,
        K::BitXnor | K::BitXnorAlt => BinaryOp::BitXnor,
        K::BitOr => BinaryOp::BitOr,
        K::BitNor => BinaryOp::BitNor,
        K::LogicAnd => BinaryOp::LogicAnd,
        K::LogicOr => BinaryOp::LogicOr,
        K::Implication => BinaryOp::Implication,
        K::Equivalence => BinaryOp::Equivalence,
        _ => return None,
    })
}

fn assign_op(kind: TokenKind, assign_statement: bool) -> Option<AssignOp> {
    use TokenKind as K;
    Some(match kind {
        K::Assignment => AssignOp::Assign,
        K::LessEqual if assign_statement => AssignOp::NonBlocking,
        K::AddAssignment => AssignOp::Add,
        K::SubAssignment => AssignOp::Sub,
        K::MulAssignment => AssignOp::Mul,
        K::DivAssignment => AssignOp::Div,
        K::ModAssignment => AssignOp::Mod,
        K::BitAndAssignment => AssignOp::BitAnd,
        K::BitOrAssignment => AssignOp::BitOr,
        K::BitXorAssignment => AssignOp::BitXor,
        K::LogicLeftShiftAssignment => AssignOp::LogicLeftShift,
        K::LogicRightShiftAssignment => AssignOp::LogicRightShift,
        K::ArithLeftShiftAssignment => AssignOp::ArithLeftShift,
        K::ArithRightShiftAssignment => AssignOp::ArithRightShift,
        _ => return None,
    })
}

fn literal_kind(kind: TokenKind, text: &str) -> LiteralKind {
    if kind == TokenKind::StringLiteral {
        LiteralKind::String
    } else if text.starts_with('\'') && text.len() == 2 {
        LiteralKind::Unbased
    } else if text.contains('\'') {
        LiteralKind::Based
    } else if text.contains(['.', 'e', 'E']) {
        LiteralKind::Real
    } else {
        LiteralKind::Integer
    }
}

impl Parser {
    /// Parse an expression in operand position (`<=` is relational)
    pub(crate) fn parse_expression(&self, ctx: &mut Context<'_>) -> Result<Expr> {
        self.expression(ctx, 0, 1)
    }

    /// Parse an expression heading a statement (`<=` is non-blocking)
    pub(crate) fn parse_statement_expression(&self, ctx: &mut Context<'_>) -> Result<Expr> {
        self.expression(ctx, 0, 0)
    }

    /// Parse a single operand; no binary operator is absorbed.
    pub(crate) fn parse_operand(&self, ctx: &mut Context<'_>) -> Result<Expr> {
        self.expression(ctx, PREFIX_BP, 1)
    }

    /// Comma-separated expressions filling the whole context
    pub(crate) fn parse_expression_list(&self, ctx: &mut Context<'_>) -> Result<Vec<Expr>> {
        self.expression_list(ctx, 1)
    }

    /// Parse `#magnitude[unit]`; the unit must touch the magnitude.
    pub(crate) fn parse_delay(&self, ctx: &mut Context<'_>, depth: usize) -> Result<DelayNode> {
        let start = ctx.position();
        let location = ctx.location();
        ctx.expect(TokenKind::Sharp)?;

        let magnitude = self.expression(ctx, PREFIX_BP, depth + 1)?;
        let unit = match (ctx.last(), ctx.current()) {
            (Some(last), Some(token))
                if token.kind.is_time_unit() && token.offset == last.end_offset() =>
            {
                ctx.advance();
                TimeUnit::from_kind(token.kind)
            }
            _ => None,
        };

        Ok(DelayNode {
            magnitude: Box::new(magnitude),
            unit,
            location,
            range: ctx.range_from(start),
        })
    }

    fn expression(&self, ctx: &mut Context<'_>, min_bp: u8, depth: usize) -> Result<Expr> {
        let mut lhs = self.parse_prefix(ctx, depth)?;

        while let Some(token) = ctx.current() {
            let Some(bp) = binding_power(token.kind, false, depth == 0) else {
                break;
            };
            if bp <= min_bp {
                break;
            }
            lhs = self.parse_infix(ctx, lhs, bp, depth)?;
        }

        Ok(lhs)
    }

    fn expression_list(&self, ctx: &mut Context<'_>, depth: usize) -> Result<Vec<Expr>> {
        let mut items = Vec::new();
        if ctx.is_at_end() {
            return Ok(items);
        }
        loop {
            items.push(self.expression(ctx, 0, depth)?);
            if ctx.is_at_end() {
                return Ok(items);
            }
            ctx.expect_described(TokenKind::Comma, "',' or end of list")?;
        }
    }

    fn parse_prefix(&self, ctx: &mut Context<'_>, depth: usize) -> Result<Expr> {
        let Some(token) = ctx.current() else {
            return Err(ctx.unexpected_end("expression"));
        };
        let start = ctx.position();
        let location = token.location;

        if let Some(op) = prefix_op(token.kind) {
            ctx.advance();
            let operand = self.expression(ctx, PREFIX_BP, depth + 1)?;
            return Ok(Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                location,
                ctx.range_from(start),
            ));
        }

        let kind = match token.kind {
            TokenKind::LParen => {
                let (_, mut inner) = ctx.enclosed(TokenKind::LParen, TokenKind::RParen)?;
                let expr = self.expression(&mut inner, 0, depth + 1)?;
                inner.expect_end("')'")?;
                ExprKind::Parenthesis(Box::new(expr))
            }
            TokenKind::LBrace => return self.parse_braces(ctx, depth),
            TokenKind::SingleQuote if ctx.peek_kind(1) == Some(TokenKind::LBrace) => {
                ctx.advance();
                let (_, mut inner) = ctx.enclosed(TokenKind::LBrace, TokenKind::RBrace)?;
                ExprKind::UnpackedArrayCat(self.expression_list(&mut inner, depth + 1)?)
            }
            TokenKind::Literal | TokenKind::StringLiteral => {
                ctx.advance();
                ExprKind::Literal {
                    kind: literal_kind(token.kind, &token.text),
                    text: token.text.clone(),
                }
            }
            kind if kind == TokenKind::Identifier || kind.is_time_unit() => {
                ctx.advance();
                let name = Expr::new(
                    ExprKind::Identifier(token.text.clone()),
                    location,
                    ctx.range_from(start),
                );
                return self.parse_call_suffix(ctx, name, depth);
            }
            TokenKind::Dollar => {
                let word = ctx
                    .peek(1)
                    .filter(|word| word.kind.is_word() && word.offset == token.end_offset());
                let Some(word) = word else {
                    return Err(ctx.error(
                        ErrorKind::InvalidExpressionToken {
                            found: token.describe(),
                        },
                        location,
                    ));
                };
                ctx.advance();
                ctx.advance();
                let name = Expr::new(
                    ExprKind::SystemIdentifier(format!("${}", word.text)),
                    location,
                    ctx.range_from(start),
                );
                return self.parse_call_suffix(ctx, name, depth);
            }
            _ => {
                return Err(ctx.error(
                    ErrorKind::InvalidExpressionToken {
                        found: token.describe(),
                    },
                    location,
                ))
            }
        };

        Ok(Expr::new(kind, location, ctx.range_from(start)))
    }

    /// `{a, b}` or `{n{a, b}}`
    fn parse_braces(&self, ctx: &mut Context<'_>, depth: usize) -> Result<Expr> {
        let start = ctx.position();
        let location = ctx.location();
        let (_, mut inner) = ctx.enclosed(TokenKind::LBrace, TokenKind::RBrace)?;

        let first = self.expression(&mut inner, 0, depth + 1)?;
        let kind = if inner.check(TokenKind::LBrace) {
            let (_, mut items) = inner.enclosed(TokenKind::LBrace, TokenKind::RBrace)?;
            let items = self.expression_list(&mut items, depth + 1)?;
            inner.expect_end("'}'")?;
            ExprKind::Repeat {
                count: Box::new(first),
                items,
            }
        } else {
            let mut items = vec![first];
            while !inner.is_at_end() {
                inner.expect_described(TokenKind::Comma, "',' or '}'")?;
                items.push(self.expression(&mut inner, 0, depth + 1)?);
            }
            ExprKind::Concatenation(items)
        };

        Ok(Expr::new(kind, location, ctx.range_from(start)))
    }

    fn parse_call_suffix(&self, ctx: &mut Context<'_>, name: Expr, depth: usize) -> Result<Expr> {
        if !ctx.check(TokenKind::LParen) {
            return Ok(name);
        }
        let args_location = ctx.location();
        let (open, mut inner) = ctx.enclosed(TokenKind::LParen, TokenKind::RParen)?;
        let args = ArgsNode {
            args: self.expression_list(&mut inner, depth + 1)?,
            location: args_location,
            range: ctx.range_from(open),
        };
        let location = name.location;
        let range = ctx.range_from(name.range.start);
        Ok(Expr::new(
            ExprKind::FuncCall {
                name: Box::new(name),
                args,
            },
            location,
            range,
        ))
    }

    fn parse_infix(&self, ctx: &mut Context<'_>, lhs: Expr, bp: u8, depth: usize) -> Result<Expr> {
        let Some(token) = ctx.current() else {
            return Err(ctx.unexpected_end("operator"));
        };
        let start = lhs.range.start;
        let location = lhs.location;
        let target = Box::new(lhs);

        let kind = match token.kind {
            TokenKind::LBracket => {
                let (_, mut inner) = ctx.enclosed(TokenKind::LBracket, TokenKind::RBracket)?;
                let first = self.expression(&mut inner, 0, depth + 1)?;
                let slice = match inner.current() {
                    None => {
                        return Ok(Expr::new(
                            ExprKind::Index {
                                target,
                                index: Box::new(first),
                            },
                            location,
                            ctx.range_from(start),
                        ))
                    }
                    Some(sep) if sep.is(TokenKind::Colon) => SliceKind::Range,
                    Some(sep) if sep.is(TokenKind::PlusColon) => SliceKind::IndexedUp,
                    Some(sep) if sep.is(TokenKind::MinusColon) => SliceKind::IndexedDown,
                    Some(sep) => return Err(inner.unexpected("']', ':', '+:' or '-:'", sep)),
                };
                inner.advance();
                let second = self.expression(&mut inner, 0, depth + 1)?;
                inner.expect_end("']'")?;
                ExprKind::Slice {
                    target,
                    kind: slice,
                    left: Box::new(first),
                    right: Box::new(second),
                }
            }
            TokenKind::QuestionMark => {
                ctx.advance();
                let then_expr = self.expression(ctx, 0, depth + 1)?;
                ctx.expect_described(TokenKind::Colon, "':' in conditional expression")?;
                let else_expr = self.expression(ctx, bp - 1, depth + 1)?;
                ExprKind::Conditional {
                    condition: target,
                    then_expr: Box::new(then_expr),
                    else_expr: Box::new(else_expr),
                }
            }
            TokenKind::ScopeResolution => {
                ctx.advance();
                ExprKind::ScopeResolution {
                    scope: target,
                    member: ctx.expect_identifier()?.text.clone(),
                }
            }
            TokenKind::Dot => {
                ctx.advance();
                ExprKind::MemberAccess {
                    target,
                    member: ctx.expect_identifier()?.text.clone(),
                }
            }
            TokenKind::SelfIncrement | TokenKind::SelfDecrement => {
                ctx.advance();
                let op = if token.is(TokenKind::SelfIncrement) {
                    UnaryOp::PostIncrement
                } else {
                    UnaryOp::PostDecrement
                };
                ExprKind::Unary {
                    op,
                    operand: target,
                }
            }
            kind => {
                if let Some(op) = assign_op(kind, depth == 0) {
                    ctx.advance();
                    let delay = if ctx.check(TokenKind::Sharp) {
                        Some(self.parse_delay(ctx, depth + 1)?)
                    } else {
                        None
                    };
                    let value = self.expression(ctx, bp - 1, depth + 1)?;
                    ExprKind::Assignment {
                        op,
                        target,
                        delay,
                        value: Box::new(value),
                    }
                } else if let Some(op) = binary_op(kind) {
                    ctx.advance();
                    let rhs = self.expression(ctx, bp, depth + 1)?;
                    ExprKind::Binary {
                        op,
                        lhs: target,
                        rhs: Box::new(rhs),
                    }
                } else {
                    return Err(ctx.error(
                        ErrorKind::InvalidExpressionToken {
                            found: token.describe(),
                        },
                        token.location,
                    ));
                }
            }
        };

        Ok(Expr::new(kind, location, ctx.range_from(start)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn expr(source: &str) -> Expr {
        Parser::new(source)
            .expect("Parser creation failed")
            .parse_standalone_expression()
            .expect("Parsing failed")
    }

    fn binary_parts(expr: &Expr) -> (BinaryOp, &Expr, &Expr) {
        match &expr.kind {
            ExprKind::Binary { op, lhs, rhs } => (*op, lhs, rhs),
            other => panic!("Expected binary expression, got {:?}", other),
        }
    }

    #[rstest]
    #[case(TokenKind::Mul, false, Some(130))]
    #[case(TokenKind::LessEqual, false, Some(100))]
    #[case(TokenKind::LessEqual, true, Some(10))]
    #[case(TokenKind::Sub, true, Some(120))]
    #[case(TokenKind::Sub, false, Some(120))]
    #[case(TokenKind::Comma, false, None)]
    fn test_binding_power(
        #[case] kind: TokenKind,
        #[case] assign_statement: bool,
        #[case] expected: Option<u8>,
    ) {
        assert_eq!(binding_power(kind, false, assign_statement), expected);
    }

    #[test]
    fn test_prefix_binding_power() {
        assert_eq!(binding_power(TokenKind::Sub, true, false), Some(150));
        assert_eq!(binding_power(TokenKind::Mul, true, false), None);
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        let e = expr("a + b * c");
        let (op, lhs, rhs) = binary_parts(&e);
        assert_eq!(op, BinaryOp::Add);
        assert_eq!(lhs.as_identifier(), Some("a"));
        assert_eq!(binary_parts(rhs).0, BinaryOp::Mul);
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let e = expr("a - b - c");
        let (op, lhs, rhs) = binary_parts(&e);
        assert_eq!(op, BinaryOp::Sub);
        assert_eq!(binary_parts(lhs).0, BinaryOp::Sub);
        assert_eq!(rhs.as_identifier(), Some("c"));
    }

    #[test]
    fn test_conditional_is_right_associative() {
        let e = expr("a ? b : c ? d : e");
        match &e.kind {
            ExprKind::Conditional { else_expr, .. } => {
                assert!(matches!(else_expr.kind, ExprKind::Conditional { .. }));
            }
            _ => panic!("Expected conditional"),
        }
    }

    #[test]
    fn test_unary_binds_tighter_than_binary() {
        let e = expr("-a * b");
        let (op, lhs, _) = binary_parts(&e);
        assert_eq!(op, BinaryOp::Mul);
        assert!(matches!(
            lhs.kind,
            ExprKind::Unary {
                op: UnaryOp::Minus,
                ..
            }
        ));
    }

    #[test]
    fn test_reduction_operators() {
        let e = expr("~&bus");
        assert!(matches!(
            e.kind,
            ExprKind::Unary {
                op: UnaryOp::ReduceNand,
                ..
            }
        ));
    }

    #[test]
    fn test_part_selects() {
        let e = expr("data[7:0]");
        assert!(matches!(
            e.kind,
            ExprKind::Slice {
                kind: SliceKind::Range,
                ..
            }
        ));
        let e = expr("data[i*8 +: 8]");
        assert!(matches!(
            e.kind,
            ExprKind::Slice {
                kind: SliceKind::IndexedUp,
                ..
            }
        ));
        let e = expr("mem[addr][3]");
        match &e.kind {
            ExprKind::Index { target, .. } => {
                assert!(matches!(target.kind, ExprKind::Index { .. }));
            }
            _ => panic!("Expected index"),
        }
    }

    #[test]
    fn test_system_call() {
        let e = expr("$clog2(DEPTH)");
        match &e.kind {
            ExprKind::FuncCall { name, args } => {
                assert_eq!(name.kind, ExprKind::SystemIdentifier("$clog2".to_string()));
                assert_eq!(args.args.len(), 1);
            }
            _ => panic!("Expected call"),
        }
    }

    #[test]
    fn test_detached_dollar_is_rejected() {
        let err = Parser::new("$ display")
            .unwrap()
            .parse_standalone_expression()
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidExpressionToken { .. }));
    }

    #[test]
    fn test_literal_kinds() {
        let kinds: Vec<LiteralKind> = ["8'hff", "'1", "42", "1.5e3", "\"s\""]
            .iter()
            .map(|source| match expr(source).kind {
                ExprKind::Literal { kind, .. } => kind,
                other => panic!("Expected literal, got {:?}", other),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                LiteralKind::Based,
                LiteralKind::Unbased,
                LiteralKind::Integer,
                LiteralKind::Real,
                LiteralKind::String
            ]
        );
    }

    #[test]
    fn test_expression_ranges_cover_tokens() {
        let e = expr("f(a, b) + 1");
        assert_eq!(e.range, TokenRange::new(0, 8));
        let (_, lhs, _) = binary_parts(&e);
        assert_eq!(lhs.range, TokenRange::new(0, 6));
    }

    #[test]
    fn test_trailing_operator_reports_end() {
        let err = Parser::new("a +")
            .unwrap()
            .parse_standalone_expression()
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnexpectedEnd { .. }));
        assert_eq!(err.location, SourceLocation::new(1, 4));
    }
}
