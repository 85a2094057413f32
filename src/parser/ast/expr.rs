//! Expression nodes built by the Pratt engine

use super::{syntax_node, SourceLocation, SyntaxNode, TimeUnit, TokenRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    LogicNot,
    BitNot,
    ReduceAnd,
    ReduceOr,
    ReduceXor,
    ReduceNand,
    ReduceNor,
    ReduceXnor,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Pow,
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    LogicLeftShift,
    LogicRightShift,
    ArithLeftShift,
    ArithRightShift,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Inside,
    Equal,
    Inequal,
    CaseEqual,
    CaseInequal,
    WildcardEqual,
    WildcardInequal,
    BitAnd,
    BitNand,
    BitXor,
    BitXnor,
    BitOr,
    BitNor,
    LogicAnd,
    LogicOr,
    Implication,
    Equivalence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    NonBlocking,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    LogicLeftShift,
    LogicRightShift,
    ArithLeftShift,
    ArithRightShift,
}

/// Part-select flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceKind {
    /// `[msb:lsb]`
    Range,
    /// `[base+:width]`
    IndexedUp,
    /// `[base-:width]`
    IndexedDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// `8'hff`, `'b1`
    Based,
    /// `'0`, `'1`, `'x`, `'z`
    Unbased,
    Integer,
    Real,
    String,
}

/// `#magnitude[unit]`
#[derive(Debug, Clone, PartialEq)]
pub struct DelayNode {
    pub magnitude: Box<Expr>,
    pub unit: Option<TimeUnit>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

/// Comma-separated call arguments
#[derive(Debug, Clone, PartialEq)]
pub struct ArgsNode {
    pub args: Vec<Expr>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub location: SourceLocation,
    pub range: TokenRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Identifier(String),
    /// `$name`
    SystemIdentifier(String),
    Literal {
        kind: LiteralKind,
        text: String,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Parenthesis(Box<Expr>),
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    Slice {
        target: Box<Expr>,
        kind: SliceKind,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    Assignment {
        op: AssignOp,
        target: Box<Expr>,
        delay: Option<DelayNode>,
        value: Box<Expr>,
    },
    Concatenation(Vec<Expr>),
    Repeat {
        count: Box<Expr>,
        items: Vec<Expr>,
    },
    UnpackedArrayCat(Vec<Expr>),
    FuncCall {
        name: Box<Expr>,
        args: ArgsNode,
    },
    MemberAccess {
        target: Box<Expr>,
        member: String,
    },
    ScopeResolution {
        scope: Box<Expr>,
        member: String,
    },
}

syntax_node!(Expr, DelayNode, ArgsNode);

impl Expr {
    pub fn new(kind: ExprKind, location: SourceLocation, range: TokenRange) -> Self {
        Self {
            kind,
            location,
            range,
        }
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Radix and digits (separators removed) of a plain or based integer
    /// literal. The digits are not validated against the radix.
    pub fn integer_digits(&self) -> Option<(u32, String)> {
        let ExprKind::Literal { kind, text } = &self.kind else {
            return None;
        };
        match kind {
            LiteralKind::Integer => Some((10, text.replace('_', ""))),
            LiteralKind::Based => {
                let (_, spec) = text.split_once('\'')?;
                let spec = spec.trim_start_matches(['s', 'S']);
                let mut chars = spec.chars();
                let radix = match chars.next()?.to_ascii_lowercase() {
                    'b' => 2,
                    'o' => 8,
                    'd' => 10,
                    'h' => 16,
                    _ => return None,
                };
                Some((radix, chars.filter(|&c| c != '_').collect()))
            }
            LiteralKind::Unbased | LiteralKind::Real | LiteralKind::String => None,
        }
    }

    /// Value of a plain or based integer literal without unknown digits
    pub fn integer_value(&self) -> Option<u128> {
        let (radix, digits) = self.integer_digits()?;
        u128::from_str_radix(&digits, radix).ok()
    }

    /// Visit this expression and every sub-expression, parents first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expr)) {
        visit(self);
        match &self.kind {
            ExprKind::Identifier(_)
            | ExprKind::SystemIdentifier(_)
            | ExprKind::Literal { .. } => {}
            ExprKind::Unary { operand, .. } => operand.walk(visit),
            ExprKind::Binary { lhs, rhs, .. } => {
                lhs.walk(visit);
                rhs.walk(visit);
            }
            ExprKind::Parenthesis(inner) => inner.walk(visit),
            ExprKind::Index { target, index } => {
                target.walk(visit);
                index.walk(visit);
            }
            ExprKind::Slice {
                target,
                left,
                right,
                ..
            } => {
                target.walk(visit);
                left.walk(visit);
                right.walk(visit);
            }
            ExprKind::Conditional {
                condition,
                then_expr,
                else_expr,
            } => {
                condition.walk(visit);
                then_expr.walk(visit);
                else_expr.walk(visit);
            }
            ExprKind::Assignment {
                target,
                delay,
                value,
                ..
            } => {
                target.walk(visit);
                if let Some(delay) = delay {
                    delay.magnitude.walk(visit);
                }
                value.walk(visit);
            }
            ExprKind::Concatenation(items) | ExprKind::UnpackedArrayCat(items) => {
                items.iter().for_each(|item| item.walk(visit));
            }
            ExprKind::Repeat { count, items } => {
                count.walk(visit);
                items.iter().for_each(|item| item.walk(visit));
            }
            ExprKind::FuncCall { name, args } => {
                name.walk(visit);
                args.args.iter().for_each(|arg| arg.walk(visit));
            }
            ExprKind::MemberAccess { target, .. } => target.walk(visit),
            ExprKind::ScopeResolution { scope, .. } => scope.walk(visit),
        }
    }

    /// Names of all plain identifiers referenced by this expression
    pub fn identifiers(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.walk(&mut |expr| {
            if let ExprKind::Identifier(name) = &expr.kind {
                names.push(name.as_str());
            }
        });
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(kind: LiteralKind, text: &str) -> Expr {
        Expr::new(
            ExprKind::Literal {
                kind,
                text: text.to_string(),
            },
            SourceLocation::new(1, 1),
            TokenRange::new(0, 1),
        )
    }

    #[test]
    fn test_integer_value() {
        assert_eq!(literal(LiteralKind::Integer, "1_000").integer_value(), Some(1000));
        assert_eq!(literal(LiteralKind::Based, "8'hff").integer_value(), Some(255));
        assert_eq!(literal(LiteralKind::Based, "4'sb1_01").integer_value(), Some(5));
        assert_eq!(literal(LiteralKind::Based, "'o17").integer_value(), Some(15));
        assert_eq!(literal(LiteralKind::Based, "4'bx0").integer_value(), None);
        assert_eq!(literal(LiteralKind::Real, "1.5").integer_value(), None);
        assert_eq!(
            literal(LiteralKind::Based, "64'hFFFF_FFFF_FFFF_FFFF").integer_value(),
            Some(u64::MAX as u128)
        );
        assert_eq!(
            literal(LiteralKind::Based, "8'hzz").integer_digits(),
            Some((16, "zz".to_string()))
        );
    }
}
