// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing, one method per precedence tier.

use super::{Parser, binary_binding_power};
use crate::ast::{Argument, BinaryOperator, ElseClause, ExprId, Expression, UnaryOperator};
use crate::source_analysis::{MessageKey, Token, TokenKind};

impl Parser<'_, '_> {
    // ========================================================================
    // Entry points
    // ========================================================================

    /// Parses one full expression.
    ///
    /// Always returns a node; problems are reported and replaced by
    /// [`Expression::Missing`] placeholders.
    pub fn parse_expression(&mut self) -> ExprId {
        self.nested(Self::parse_or)
    }

    /// Parses expressions until end of input, collecting them into a block.
    ///
    /// Semicolons between expressions are optional separators.
    pub fn parse(&mut self) -> ExprId {
        let mut expressions = Vec::new();
        loop {
            while self.match_token(TokenKind::Semicolon).is_some() {}
            if self.is_at_end() {
                break;
            }
            expressions.push(self.parse_expression());
        }
        self.alloc(Expression::Block { expressions })
    }

    // ========================================================================
    // Logical tiers
    // ========================================================================

    fn parse_or(&mut self) -> ExprId {
        let mut left = self.parse_and();
        while let Some(operator_token) = self.match_token(TokenKind::Or) {
            let right = self.parse_and();
            left = self.alloc(Expression::Binary {
                operator: BinaryOperator::Or,
                operator_token,
                left,
                right,
            });
        }
        left
    }

    fn parse_and(&mut self) -> ExprId {
        let mut left = self.parse_not();
        while let Some(operator_token) = self.match_token(TokenKind::And) {
            let right = self.parse_not();
            left = self.alloc(Expression::Binary {
                operator: BinaryOperator::And,
                operator_token,
                left,
                right,
            });
        }
        left
    }

    fn parse_not(&mut self) -> ExprId {
        let Some(operator_token) = self.match_token(TokenKind::NotKeyword) else {
            return self.parse_comparison();
        };
        let operand = self.grow(Self::parse_not);
        self.alloc(Expression::Unary {
            operator: UnaryOperator::Not,
            operator_token,
            operand,
        })
    }

    /// Comparison chains nest to the right: `a < b < c` is `a < (b < c)`.
    fn parse_comparison(&mut self) -> ExprId {
        let left = self.parse_arithmetic(0);
        let kind = self.current_kind();
        let operator = match BinaryOperator::from_token_kind(kind) {
            Some(operator) if kind.is_comparison() => operator,
            _ => return left,
        };
        let operator_token = self.advance();
        let right = self.grow(Self::parse_comparison);
        self.alloc(Expression::Binary {
            operator,
            operator_token,
            left,
            right,
        })
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    /// Precedence climbing over `+ - * / %`.
    ///
    /// Only operators whose left binding power is at least `min_bp` are
    /// consumed here; weaker ones are left for the caller's loop.
    fn parse_arithmetic(&mut self, min_bp: u8) -> ExprId {
        let mut left = self.parse_sign();
        loop {
            let kind = self.current_kind();
            let Some(bp) = binary_binding_power(kind) else {
                break;
            };
            if bp.left < min_bp {
                break;
            }
            let Some(operator) = BinaryOperator::from_token_kind(kind) else {
                break;
            };
            let operator_token = self.advance();
            let right = self.parse_arithmetic(bp.right);
            left = self.alloc(Expression::Binary {
                operator,
                operator_token,
                left,
                right,
            });
        }
        left
    }

    /// Prefix `+` / `-`.
    fn parse_sign(&mut self) -> ExprId {
        let operator = match self.current_kind() {
            TokenKind::Plus => UnaryOperator::Plus,
            TokenKind::Minus => UnaryOperator::Minus,
            _ => return self.parse_power(),
        };
        let operator_token = self.advance();
        let operand = self.grow(Self::parse_sign);
        self.alloc(Expression::Unary {
            operator,
            operator_token,
            operand,
        })
    }

    /// Right-associative `^`; the right operand may carry a sign.
    fn parse_power(&mut self) -> ExprId {
        let base = self.parse_primary();
        let Some(operator_token) = self.match_token(TokenKind::Caret) else {
            return base;
        };
        let exponent = self.grow(Self::parse_sign);
        self.alloc(Expression::Binary {
            operator: BinaryOperator::Power,
            operator_token,
            left: base,
            right: exponent,
        })
    }

    // ========================================================================
    // Primary expressions
    // ========================================================================

    fn parse_primary(&mut self) -> ExprId {
        match self.current_kind() {
            TokenKind::Number => self.parse_number(),
            TokenKind::Identifier => self.parse_identifier(),
            TokenKind::TrueKeyword | TokenKind::FalseKeyword => {
                let token = self.advance();
                let value = token.kind() == TokenKind::TrueKeyword;
                self.alloc(Expression::BooleanLiteral { token, value })
            }
            TokenKind::IfKeyword => self.parse_if(),
            TokenKind::LetKeyword => self.parse_let(),
            TokenKind::OpenParen => self.parse_parenthesized(),
            TokenKind::EndOfFile => {
                let span = self.peek().span();
                self.error(MessageKey::UnexpectedEndOfInput, &[], span);
                self.missing_expression()
            }
            TokenKind::Invalid => {
                // Already reported by the lexer.
                let token = self.advance();
                self.alloc(Expression::Missing { token })
            }
            _ => {
                let token = self.advance();
                self.error(MessageKey::UnexpectedToken, &[token.text()], token.span());
                self.alloc(Expression::Missing { token })
            }
        }
    }

    /// `42` or `4.25` (a number, a period and a number).
    fn parse_number(&mut self) -> ExprId {
        let number = self.advance();
        let Some(separator) = self.match_token(TokenKind::Period) else {
            return self.alloc(Expression::IntegerLiteral { token: number });
        };
        let fraction = self.expect(TokenKind::Number, MessageKey::ExpectedToken);
        self.alloc(Expression::RealLiteral {
            number,
            separator,
            fraction,
        })
    }

    /// `name` or `name(args)`.
    ///
    /// An opening parenthesis on a later line starts a new expression
    /// instead of an argument list.
    fn parse_identifier(&mut self) -> ExprId {
        let token = self.advance();
        let starts_call = {
            let next = self.peek();
            next.kind() == TokenKind::OpenParen && !next.has_leading_line_break()
        };
        if starts_call {
            self.parse_arguments(token)
        } else {
            self.alloc(Expression::Identifier { token })
        }
    }

    /// Parses `(arg, arg, ...)` after a callee name.
    ///
    /// Commas are optional separators; a comma directly before `)` is reported.
    fn parse_arguments(&mut self, callee: Token) -> ExprId {
        let open = self.advance();
        let mut arguments = Vec::new();
        let close = loop {
            match self.current_kind() {
                TokenKind::CloseParen => break self.advance(),
                TokenKind::EndOfFile => {
                    break self.expect(TokenKind::CloseParen, MessageKey::ExpectedToken);
                }
                _ => {}
            }

            let before = self.consumed;
            let expression = self.parse_expression();
            let separator = self.match_token(TokenKind::Comma);
            if let Some(comma) = &separator {
                if self.check(TokenKind::CloseParen) {
                    self.error(MessageKey::TrailingComma, &[], comma.span());
                }
            }
            arguments.push(Argument {
                expression,
                separator,
            });

            if self.consumed == before {
                // No progress: the nesting limit was hit and already reported.
                break self.missing_token();
            }
        };
        self.alloc(Expression::MethodInvoke {
            callee,
            open,
            arguments,
            close,
        })
    }

    /// `( inner )`
    fn parse_parenthesized(&mut self) -> ExprId {
        let open = self.advance();
        let inner = if self.check(TokenKind::CloseParen) {
            let span = self.peek().span();
            self.error(MessageKey::InvalidExpressionTerm, &[")"], span);
            self.missing_expression()
        } else {
            self.parse_expression()
        };
        let close = self.expect(TokenKind::CloseParen, MessageKey::ExpectedToken);
        self.alloc(Expression::Parenthesized { open, inner, close })
    }

    /// `if cond then body [else other] [end]`
    ///
    /// The closing `end` is consumed when present; its absence is not reported.
    fn parse_if(&mut self) -> ExprId {
        let if_token = self.advance();
        let condition = self.parse_expression();
        let then_token = self.expect(TokenKind::ThenKeyword, MessageKey::ExpectedKeyword);

        let body = if self.check(TokenKind::EndKeyword) || self.check(TokenKind::ElseKeyword) {
            let span = self.peek().span();
            self.error(MessageKey::ExpectedExpression, &[], span);
            self.missing_expression()
        } else {
            self.parse_expression()
        };

        let else_clause = self
            .match_token(TokenKind::ElseKeyword)
            .map(|else_token| ElseClause {
                else_token,
                body: self.parse_expression(),
            });

        let end_token = match self.match_token(TokenKind::EndKeyword) {
            Some(token) => token,
            None => self.missing_token(),
        };

        self.alloc(Expression::IfThenElse {
            if_token,
            condition,
            then_token,
            body,
            else_clause,
            end_token,
        })
    }

    /// `let name [params...] = bound`
    fn parse_let(&mut self) -> ExprId {
        let let_token = self.advance();
        let name = match self.match_token(TokenKind::Identifier) {
            Some(name) => name,
            None => {
                let span = self.peek().span();
                self.error(MessageKey::ExpectedIdentifier, &[], span);
                self.missing_token()
            }
        };
        let mut parameters = Vec::new();
        while let Some(parameter) = self.match_token(TokenKind::Identifier) {
            parameters.push(parameter);
        }
        let assign = self.expect(TokenKind::Assign, MessageKey::ExpectedToken);
        let bound = self.parse_expression();
        self.alloc(Expression::Let {
            let_token,
            name,
            parameters,
            assign,
            bound,
        })
    }
}
