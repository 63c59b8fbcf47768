// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree (AST) definitions.
//!
//! Expressions live in an arena owned by a [`SyntaxTree`] and refer to their
//! children by [`ExprId`]. Ids are stable for the lifetime of the tree, which
//! lets later passes keep per-node side tables (inferred types, for example)
//! without relying on reference identity.
//!
//! # Design Philosophy
//!
//! - **Closed node set** - [`Expression`] is a sum type; every pass matches it
//!   exhaustively, so adding a variant is a compile error until each pass
//!   handles it
//! - **Tokens are kept** - nodes retain the tokens that produced them so
//!   [`SyntaxTree::span`] can reconstruct source regions for diagnostics
//! - **Error recovery** - the parser fills absent pieces with
//!   [`Expression::Missing`] nodes and [`TokenKind::Missing`] tokens
//!
//! # Example
//!
//! ```
//! use expreval_core::ast::Expression;
//! use expreval_core::source_analysis::{DiagnosticsBag, parse_expression};
//!
//! let mut diagnostics = DiagnosticsBag::new();
//! let tree = parse_expression("2 + 3 * 6", &mut diagnostics);
//! assert!(matches!(tree.root_expression(), Expression::Binary { .. }));
//! assert_eq!(tree.to_sexpr(tree.root()), "(+ 2 (* 3 6))");
//! ```

use std::fmt::{self, Write as _};
use std::ops::Index;

use crate::source_analysis::{Span, Token, TokenKind};

/// Stable handle to an expression inside a [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExprId(u32);

impl ExprId {
    /// Returns the arena index of this expression.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Power,
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    And,
    Or,
}

impl BinaryOperator {
    /// Maps an operator token kind to its operator.
    #[must_use]
    pub const fn from_token_kind(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Plus => Self::Add,
            TokenKind::Minus => Self::Subtract,
            TokenKind::Star => Self::Multiply,
            TokenKind::Slash => Self::Divide,
            TokenKind::Percent => Self::Remainder,
            TokenKind::Caret => Self::Power,
            TokenKind::Equal => Self::Equal,
            TokenKind::NotEqual => Self::NotEqual,
            TokenKind::Less => Self::Less,
            TokenKind::LessOrEqual => Self::LessOrEqual,
            TokenKind::Greater => Self::Greater,
            TokenKind::GreaterOrEqual => Self::GreaterOrEqual,
            TokenKind::And => Self::And,
            TokenKind::Or => Self::Or,
            _ => return None,
        })
    }

    /// Returns the source spelling.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Remainder => "%",
            Self::Power => "^",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }

    /// Applies the operator to two numeric values.
    ///
    /// Comparisons and logical operators produce `1.0` or `0.0`; `&&` and
    /// `||` test truthiness and take both operands.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Self::Add => left + right,
            Self::Subtract => left - right,
            Self::Multiply => left * right,
            Self::Divide => left / right,
            Self::Remainder => left % right,
            Self::Power => left.powf(right),
            Self::Equal => from_bool(left == right),
            Self::NotEqual => from_bool(left != right),
            Self::Less => from_bool(left < right),
            Self::LessOrEqual => from_bool(left <= right),
            Self::Greater => from_bool(left > right),
            Self::GreaterOrEqual => from_bool(left >= right),
            Self::And => from_bool(is_truthy(left) && is_truthy(right)),
            Self::Or => from_bool(is_truthy(left) || is_truthy(right)),
        }
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// `+x`
    Plus,
    /// `-x`
    Minus,
    /// `not x`
    Not,
}

impl UnaryOperator {
    /// Returns the source spelling.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Not => "not",
        }
    }

    /// Applies the operator to a numeric value.
    #[must_use]
    pub fn apply(self, operand: f64) -> f64 {
        match self {
            Self::Plus => operand,
            Self::Minus => -operand,
            Self::Not => from_bool(!is_truthy(operand)),
        }
    }
}

/// Non-zero values are true.
#[must_use]
pub fn is_truthy(value: f64) -> bool {
    value != 0.0
}

/// Encodes a boolean as `1.0` or `0.0`.
#[must_use]
pub fn from_bool(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

/// One argument of a method invocation, with the comma that followed it.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub expression: ExprId,
    pub separator: Option<Token>,
}

/// The optional `else` arm of a conditional.
#[derive(Debug, Clone, PartialEq)]
pub struct ElseClause {
    pub else_token: Token,
    pub body: ExprId,
}

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// `42`
    IntegerLiteral { token: Token },

    /// `3.25`, assembled from the tokens `3`, `.` and `25`.
    RealLiteral {
        number: Token,
        separator: Token,
        fraction: Token,
    },

    /// `fib`
    Identifier { token: Token },

    /// `true` / `false`
    BooleanLiteral { token: Token, value: bool },

    /// `(inner)`
    Parenthesized {
        open: Token,
        inner: ExprId,
        close: Token,
    },

    /// `-x`, `+x`, `not x`
    Unary {
        operator: UnaryOperator,
        operator_token: Token,
        operand: ExprId,
    },

    /// `left op right`
    Binary {
        operator: BinaryOperator,
        operator_token: Token,
        left: ExprId,
        right: ExprId,
    },

    /// `if condition then body [else else_body] [end]`
    IfThenElse {
        if_token: Token,
        condition: ExprId,
        then_token: Token,
        body: ExprId,
        else_clause: Option<ElseClause>,
        end_token: Token,
    },

    /// `let name params... = bound`
    Let {
        let_token: Token,
        name: Token,
        parameters: Vec<Token>,
        assign: Token,
        bound: ExprId,
    },

    /// `callee(arg, arg)`
    MethodInvoke {
        callee: Token,
        open: Token,
        arguments: Vec<Argument>,
        close: Token,
    },

    /// A sequence of expressions evaluated in order.
    Block { expressions: Vec<ExprId> },

    /// Placeholder for an expression the parser could not find.
    Missing { token: Token },
}

impl Expression {
    /// Returns true for recovery placeholders.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }

    /// Returns the node's direct children in source order.
    #[must_use]
    pub fn children(&self) -> Vec<ExprId> {
        match self {
            Self::IntegerLiteral { .. }
            | Self::RealLiteral { .. }
            | Self::Identifier { .. }
            | Self::BooleanLiteral { .. }
            | Self::Missing { .. } => Vec::new(),
            Self::Parenthesized { inner, .. } => vec![*inner],
            Self::Unary { operand, .. } => vec![*operand],
            Self::Binary { left, right, .. } => vec![*left, *right],
            Self::IfThenElse {
                condition,
                body,
                else_clause,
                ..
            } => {
                let mut children = vec![*condition, *body];
                children.extend(else_clause.as_ref().map(|e| e.body));
                children
            }
            Self::Let { bound, .. } => vec![*bound],
            Self::MethodInvoke { arguments, .. } => {
                arguments.iter().map(|a| a.expression).collect()
            }
            Self::Block { expressions } => expressions.clone(),
        }
    }
}

/// Returns the numeric value of an integer literal token.
#[must_use]
pub fn integer_value(token: &Token) -> f64 {
    token.text().parse().unwrap_or_default()
}

/// Returns the numeric value of a real literal's `number.fraction` tokens.
#[must_use]
pub fn real_value(number: &Token, fraction: &Token) -> f64 {
    if fraction.is_missing() {
        return integer_value(number);
    }
    format!("{}.{}", number.text(), fraction.text())
        .parse()
        .unwrap_or_default()
}

// ============================================================================
// Arena
// ============================================================================

/// An expression arena plus the id of its root.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    nodes: Vec<Expression>,
    root: ExprId,
}

impl SyntaxTree {
    pub(crate) fn from_parts(nodes: Vec<Expression>, root: ExprId) -> Self {
        debug_assert!(root.index() < nodes.len(), "root {root} outside arena");
        Self { nodes, root }
    }

    /// Returns the id of the root expression.
    #[must_use]
    pub fn root(&self) -> ExprId {
        self.root
    }

    /// Returns the root expression.
    #[must_use]
    pub fn root_expression(&self) -> &Expression {
        &self[self.root]
    }

    /// Returns the expression for `id`, if it belongs to this tree.
    #[must_use]
    pub fn get(&self, id: ExprId) -> Option<&Expression> {
        self.nodes.get(id.index())
    }

    /// Returns the number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates all nodes in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (ExprId, &Expression)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, expr)| (id_for(index), expr))
    }

    /// Reconstructs the source region covered by `id` from its tokens.
    #[must_use]
    pub fn span(&self, id: ExprId) -> Span {
        stacker::maybe_grow(32 * 1024, 256 * 1024, || match &self[id] {
            Expression::IntegerLiteral { token }
            | Expression::Identifier { token }
            | Expression::BooleanLiteral { token, .. }
            | Expression::Missing { token } => token.span(),
            Expression::RealLiteral {
                number, fraction, ..
            } => number.span().merge(fraction.span()),
            Expression::Parenthesized { open, inner, close } => open
                .span()
                .merge(self.span(*inner))
                .merge(close.span()),
            Expression::Unary {
                operator_token,
                operand,
                ..
            } => operator_token.span().merge(self.span(*operand)),
            Expression::Binary { left, right, .. } => self.span(*left).merge(self.span(*right)),
            Expression::IfThenElse {
                if_token,
                body,
                else_clause,
                end_token,
                ..
            } => {
                let last = else_clause.as_ref().map_or(*body, |e| e.body);
                let span = if_token.span().merge(self.span(last));
                if end_token.is_missing() {
                    span
                } else {
                    span.merge(end_token.span())
                }
            }
            Expression::Let { let_token, bound, .. } => let_token.span().merge(self.span(*bound)),
            Expression::MethodInvoke { callee, close, .. } => callee.span().merge(close.span()),
            Expression::Block { expressions } => match (expressions.first(), expressions.last()) {
                (Some(first), Some(last)) => self.span(*first).merge(self.span(*last)),
                _ => Span::default(),
            },
        })
    }

    /// Renders `id` as an s-expression, for debugging and tests.
    #[must_use]
    pub fn to_sexpr(&self, id: ExprId) -> String {
        let mut out = String::new();
        self.write_sexpr(&mut out, id);
        out
    }

    fn write_sexpr(&self, out: &mut String, id: ExprId) {
        stacker::maybe_grow(32 * 1024, 256 * 1024, || match &self[id] {
            Expression::IntegerLiteral { token } | Expression::Identifier { token } => {
                out.push_str(token.text());
            }
            Expression::RealLiteral {
                number, fraction, ..
            } => {
                let _ = write!(out, "{}.{}", number.text(), fraction.text());
            }
            Expression::BooleanLiteral { value, .. } => {
                let _ = write!(out, "{value}");
            }
            Expression::Missing { .. } => out.push_str("<missing>"),
            Expression::Parenthesized { inner, .. } => {
                out.push_str("(paren ");
                self.write_sexpr(out, *inner);
                out.push(')');
            }
            Expression::Unary {
                operator, operand, ..
            } => {
                let _ = write!(out, "({} ", operator.symbol());
                self.write_sexpr(out, *operand);
                out.push(')');
            }
            Expression::Binary {
                operator,
                left,
                right,
                ..
            } => {
                let _ = write!(out, "({} ", operator.symbol());
                self.write_sexpr(out, *left);
                out.push(' ');
                self.write_sexpr(out, *right);
                out.push(')');
            }
            Expression::IfThenElse {
                condition,
                body,
                else_clause,
                ..
            } => {
                out.push_str("(if ");
                self.write_sexpr(out, *condition);
                out.push(' ');
                self.write_sexpr(out, *body);
                if let Some(else_clause) = else_clause {
                    out.push(' ');
                    self.write_sexpr(out, else_clause.body);
                }
                out.push(')');
            }
            Expression::Let {
                name,
                parameters,
                bound,
                ..
            } => {
                let _ = write!(out, "(let {}", name.text());
                if !parameters.is_empty() {
                    out.push_str(" (");
                    let names: Vec<_> = parameters.iter().map(Token::text).collect();
                    out.push_str(&names.join(" "));
                    out.push(')');
                }
                out.push(' ');
                self.write_sexpr(out, *bound);
                out.push(')');
            }
            Expression::MethodInvoke {
                callee, arguments, ..
            } => {
                let _ = write!(out, "(call {}", callee.text());
                for argument in arguments {
                    out.push(' ');
                    self.write_sexpr(out, argument.expression);
                }
                out.push(')');
            }
            Expression::Block { expressions } => {
                out.push_str("(block");
                for expr in expressions {
                    out.push(' ');
                    self.write_sexpr(out, *expr);
                }
                out.push(')');
            }
        });
    }
}

impl Index<ExprId> for SyntaxTree {
    type Output = Expression;

    fn index(&self, id: ExprId) -> &Self::Output {
        &self.nodes[id.index()]
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "arenas over u32::MAX nodes are not supported"
)]
pub(crate) fn id_for(index: usize) -> ExprId {
    ExprId(index as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::{DiagnosticsBag, Location, parse_expression, parse_program};

    fn parse(source: &str) -> SyntaxTree {
        let mut diagnostics = DiagnosticsBag::new();
        let tree = parse_expression(source, &mut diagnostics);
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics}");
        tree
    }

    #[test]
    fn binary_operator_from_token_kind() {
        assert_eq!(
            BinaryOperator::from_token_kind(TokenKind::Caret),
            Some(BinaryOperator::Power)
        );
        assert_eq!(BinaryOperator::from_token_kind(TokenKind::Comma), None);
    }

    #[test]
    fn operator_semantics() {
        assert!((BinaryOperator::Power.apply(2.0, 9.0) - 512.0).abs() < f64::EPSILON);
        assert!((BinaryOperator::Remainder.apply(7.5, 2.0) - 1.5).abs() < f64::EPSILON);
        assert!((BinaryOperator::Less.apply(1.0, 2.0) - 1.0).abs() < f64::EPSILON);
        assert!(BinaryOperator::GreaterOrEqual.apply(1.0, 2.0).abs() < f64::EPSILON);
        assert!((BinaryOperator::And.apply(3.0, -1.0) - 1.0).abs() < f64::EPSILON);
        assert!(BinaryOperator::And.apply(3.0, 0.0).abs() < f64::EPSILON);
        assert!((BinaryOperator::Or.apply(0.0, 0.5) - 1.0).abs() < f64::EPSILON);
        assert!((UnaryOperator::Minus.apply(4.0) + 4.0).abs() < f64::EPSILON);
        assert!((UnaryOperator::Not.apply(0.0) - 1.0).abs() < f64::EPSILON);
        assert!(UnaryOperator::Not.apply(f64::NAN).abs() < f64::EPSILON);
        assert!(BinaryOperator::Divide.apply(1.0, 0.0).is_infinite());
    }

    #[test]
    fn literal_values() {
        let number = Token::with_value(TokenKind::Number, 1, 1, 2, "12");
        let fraction = Token::with_value(TokenKind::Number, 1, 4, 2, "05");
        assert!((integer_value(&number) - 12.0).abs() < f64::EPSILON);
        assert!((real_value(&number, &fraction) - 12.05).abs() < f64::EPSILON);
        let missing = Token::missing(Location::new(1, 4));
        assert!((real_value(&number, &missing) - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn children_in_source_order() {
        let tree = parse("if a then b else c end");
        let children = tree.root_expression().children();
        let rendered: Vec<_> = children.iter().map(|id| tree.to_sexpr(*id)).collect();
        assert_eq!(rendered, ["a", "b", "c"]);
    }

    #[test]
    fn span_covers_whole_binary_expression() {
        let tree = parse("12 + x");
        assert_eq!(tree.span(tree.root()), Span::on_line(1, 1, 6));
    }

    #[test]
    fn span_of_conditional_includes_end_keyword() {
        let tree = parse("if 1 then 2 else 3 end");
        assert_eq!(tree.span(tree.root()), Span::on_line(1, 1, 22));
    }

    #[test]
    fn span_of_real_literal() {
        let tree = parse("3.25");
        assert_eq!(tree.span(tree.root()), Span::on_line(1, 1, 4));
    }

    #[test]
    fn ids_are_stable_and_indexable() {
        let tree = parse("1 + 2");
        assert_eq!(tree.len(), 3);
        for (id, expr) in tree.iter() {
            assert_eq!(tree.get(id), Some(expr));
        }
        assert!(tree.get(id_for(99)).is_none());
    }

    #[test]
    fn sexpr_rendering() {
        let mut diagnostics = DiagnosticsBag::new();
        let tree = parse_program("let f x y = f(x, -y)\nnot true", &mut diagnostics);
        assert!(diagnostics.is_empty());
        assert_eq!(
            tree.to_sexpr(tree.root()),
            "(block (let f (x y) (call f x (- y))) (not true))"
        );
    }
}
