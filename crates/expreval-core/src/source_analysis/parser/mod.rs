// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive-descent parser.
//!
//! The parser pulls tokens from a [`Lexer`], skipping trivia, and builds an
//! arena-backed [`SyntaxTree`]. It never fails: each problem is reported to
//! the lexer's [`DiagnosticsBag`] and a placeholder is substituted.
//!
//! # Precedence Tiers (from lowest to highest)
//!
//! | Tier | Syntax | Associativity |
//! |------|--------|---------------|
//! | Or | `a \|\| b` | Left |
//! | And | `a && b` | Left |
//! | Not | `not a` | Prefix |
//! | Comparison | `== != < <= > >=` | Right (the rest of a chain nests) |
//! | Additive | `+ -` | Left |
//! | Multiplicative | `* / %` | Left |
//! | Sign | `+a` `-a` | Prefix |
//! | Power | `a ^ b` | Right |
//! | Primary | literals, names, calls, `if`, `let`, `( )` | |
//!
//! The additive and multiplicative tiers share one precedence-climbing loop
//! driven by [`binary_binding_power`]. `^` binds tighter than a sign on its
//! left, so `-2^2` is `-(2^2)`, but its right operand may carry a sign.
//!
//! # Example
//!
//! ```
//! use expreval_core::source_analysis::{DiagnosticsBag, Lexer, Parser};
//!
//! let mut diagnostics = DiagnosticsBag::new();
//! let mut parser = Parser::new(Lexer::new("a < b < c", &mut diagnostics));
//! let root = parser.parse_expression();
//! let tree = parser.finish(root);
//! assert_eq!(tree.to_sexpr(root), "(< a (< b c))");
//! ```

use ecow::EcoVec;

use super::{DiagnosticsBag, Lexer, MessageKey, Span, Token, TokenKind, Trivia};
use crate::ast::{Expression, ExprId, SyntaxTree, id_for};

mod expressions;


/// Binding power for a binary operator in the precedence-climbing loop.
///
/// Only the arithmetic operators go through the loop; comparison and logical
/// operators have their own tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct BindingPower {
    /// How tightly the operator binds to its left operand.
    pub(super) left: u8,
    /// Minimum binding power for its right operand.
    pub(super) right: u8,
}

impl BindingPower {
    /// Creates a left-associative binding power.
    const fn left_assoc(precedence: u8) -> Self {
        Self {
            left: precedence,
            right: precedence + 1,
        }
    }
}

/// Gets the binding power for an arithmetic operator.
///
/// Returns `None` for anything else, which ends the loop.
///
/// | Level | Operators |
/// |-------|-----------|
/// | 1 | `+` `-` |
/// | 2 | `*` `/` `%` |
pub(super) const fn binary_binding_power(kind: TokenKind) -> Option<BindingPower> {
    match kind {
        TokenKind::Plus | TokenKind::Minus => Some(BindingPower::left_assoc(1)),
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => {
            Some(BindingPower::left_assoc(2))
        }
        _ => None,
    }
}

/// Maximum depth of nested groups (parentheses, arguments, `if` and `let`
/// parts) before the parser bails out.
///
/// Operator chains such as `a < b < c` or `- - - 1` do not count; their
/// recursion relies on `stacker::maybe_grow` alone.
const MAX_NESTING_DEPTH: usize = 64;

/// The parser state.
pub struct Parser<'src, 'd> {
    lexer: Lexer<'src, 'd>,
    /// The next significant token, with its leading trivia attached.
    current: Option<Token>,
    /// Number of significant tokens consumed so far.
    consumed: usize,
    nodes: Vec<Expression>,
    nesting_depth: usize,
}

impl<'src, 'd> Parser<'src, 'd> {
    /// Creates a parser reading from `lexer`.
    #[must_use]
    pub fn new(lexer: Lexer<'src, 'd>) -> Self {
        Self {
            lexer,
            current: None,
            consumed: 0,
            nodes: Vec::new(),
            nesting_depth: 0,
        }
    }

    /// Consumes the parser, returning the tree rooted at `root`.
    #[must_use]
    pub fn finish(self, root: ExprId) -> SyntaxTree {
        tracing::debug!(nodes = self.nodes.len(), %root, "parse finished");
        SyntaxTree::from_parts(self.nodes, root)
    }

    // ========================================================================
    // Token access
    // ========================================================================

    /// Returns the next significant token, reading past trivia if needed.
    pub(super) fn peek(&mut self) -> &Token {
        let lexer = &mut self.lexer;
        self.current.get_or_insert_with(|| {
            let mut trivia = EcoVec::new();
            while let Some(piece) = Trivia::from_token(&lexer.peek()) {
                trivia.push(piece);
                lexer.read();
            }
            let mut token = lexer.read();
            token.set_leading_trivia(trivia);
            token
        })
    }

    /// Returns the kind of the next significant token.
    pub(super) fn current_kind(&mut self) -> TokenKind {
        self.peek().kind()
    }

    /// Consumes and returns the next significant token.
    pub(super) fn advance(&mut self) -> Token {
        self.peek();
        self.consumed += 1;
        let lexer_location = self.lexer.location();
        self.current
            .take()
            .unwrap_or_else(|| Token::missing(lexer_location))
    }

    /// Returns true if the next token has the given kind.
    pub(super) fn check(&mut self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Consumes the next token if it has the given kind.
    pub(super) fn match_token(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consumes a token of `kind`, or reports `key` and returns a Missing token.
    pub(super) fn expect(&mut self, kind: TokenKind, key: MessageKey) -> Token {
        if let Some(token) = self.match_token(kind) {
            return token;
        }
        let span = self.peek().span();
        let text = kind.to_string();
        self.error(key, &[&text], span);
        self.missing_token()
    }

    /// A zero-width placeholder positioned at the next token.
    pub(super) fn missing_token(&mut self) -> Token {
        Token::missing(self.peek().location())
    }

    /// Returns true once the end-of-file token is next.
    pub(super) fn is_at_end(&mut self) -> bool {
        self.current_kind().is_eof()
    }

    // ========================================================================
    // Tree building and diagnostics
    // ========================================================================

    /// Adds a node to the arena.
    pub(super) fn alloc(&mut self, expression: Expression) -> ExprId {
        let id = id_for(self.nodes.len());
        self.nodes.push(expression);
        id
    }

    /// Allocates a Missing node at the next token.
    pub(super) fn missing_expression(&mut self) -> ExprId {
        let token = self.missing_token();
        self.alloc(Expression::Missing { token })
    }

    pub(super) fn diagnostics(&mut self) -> &mut DiagnosticsBag {
        self.lexer.diagnostics()
    }

    /// Reports an error.
    pub(super) fn error(&mut self, key: MessageKey, args: &[&str], span: Span) {
        self.diagnostics().error(key, args, span);
    }

    /// Runs `parse` one nesting level deeper, or reports and returns a
    /// Missing node once [`MAX_NESTING_DEPTH`] is exceeded.
    ///
    /// Only grouping constructs (parentheses, argument lists, `if` and `let`
    /// parts) go through here. After the limit is hit the rest of the
    /// over-deep group is skipped, so one group yields one diagnostic.
    pub(super) fn nested(&mut self, parse: impl FnOnce(&mut Self) -> ExprId) -> ExprId {
        self.grow(|parser| {
            if parser.nesting_depth >= MAX_NESTING_DEPTH {
                let span = parser.peek().span();
                parser.error(MessageKey::NestingTooDeep, &[], span);
                let missing = parser.missing_expression();
                parser.skip_group();
                return missing;
            }
            parser.nesting_depth += 1;
            let result = parse(parser);
            parser.nesting_depth -= 1;
            result
        })
    }

    /// Runs a recursive step that does not count towards the nesting limit.
    ///
    /// Grows the stack on the heap when less than 32 KiB remain.
    pub(super) fn grow(&mut self, parse: impl FnOnce(&mut Self) -> ExprId) -> ExprId {
        stacker::maybe_grow(32 * 1024, 256 * 1024, || parse(self))
    }

    /// Skips tokens up to the one that closes the enclosing level.
    ///
    /// Parentheses and `if ... end` pairs opened inside the skipped region are
    /// skipped whole.
    fn skip_group(&mut self) {
        let mut open = 0_usize;
        loop {
            match self.current_kind() {
                TokenKind::EndOfFile => return,
                TokenKind::OpenParen | TokenKind::IfKeyword => open += 1,
                TokenKind::CloseParen | TokenKind::EndKeyword => {
                    if open == 0 {
                        return;
                    }
                    open -= 1;
                }
                TokenKind::ThenKeyword
                | TokenKind::ElseKeyword
                | TokenKind::Comma
                | TokenKind::Semicolon
                    if open == 0 =>
                {
                    return;
                }
                _ => {}
            }
            self.advance();
        }
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Parses a single expression from `source`.
///
/// Tokens after the first complete expression are left unread.
pub fn parse_expression(source: &str, diagnostics: &mut DiagnosticsBag) -> SyntaxTree {
    let mut parser = Parser::new(Lexer::new(source, diagnostics));
    let root = parser.parse_expression();
    parser.finish(root)
}

/// Parses every expression in `source` into a root [`Expression::Block`].
pub fn parse_program(source: &str, diagnostics: &mut DiagnosticsBag) -> SyntaxTree {
    let mut parser = Parser::new(Lexer::new(source, diagnostics));
    let root = parser.parse();
    parser.finish(root)
}
