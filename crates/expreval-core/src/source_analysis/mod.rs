// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexing, parsing and diagnostics.
//!
//! # Lexical Analysis
//!
//! The [`Lexer`] converts source text into [`Token`]s on demand, with one
//! token of lookahead. Each token carries a 1-based line/column position and
//! a character width.
//!
//! ```
//! use expreval_core::source_analysis::{DiagnosticsBag, TokenKind, tokenize};
//!
//! let mut diagnostics = DiagnosticsBag::new();
//! let tokens = tokenize("1.5", &mut diagnostics);
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind()).collect();
//! assert_eq!(
//!     kinds,
//!     [TokenKind::Number, TokenKind::Period, TokenKind::Number, TokenKind::EndOfFile]
//! );
//! ```
//!
//! # Parsing
//!
//! The [`Parser`] builds a [`SyntaxTree`](crate::ast::SyntaxTree) by
//! recursive descent, using precedence climbing for arithmetic operators
//! (see the [`parser`] module for the full tier list).
//!
//! # Error Handling
//!
//! Neither stage stops on bad input. Problems are appended to a
//! [`DiagnosticsBag`] passed in by the caller, and the parser substitutes
//! placeholder nodes so a structurally complete tree is always returned.

mod diagnostics;
mod lexer;
pub mod parser;
mod span;
mod token;


pub use diagnostics::{
    DefaultMessages, Diagnostic, DiagnosticsBag, MessageCatalog, MessageKey, Severity, interpolate,
};
pub use lexer::{Lexer, read_source, tokenize};
pub use parser::{Parser, parse_expression, parse_program};
pub use span::{Location, Span};
pub use token::{Token, TokenKind, Trivia};
