// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! `expreval tokens` and `expreval ast`: dumps of the front end's output.

use std::fmt::Write as _;

use expreval_core::source_analysis::{DiagnosticsBag, Token, TokenKind, parse_program, tokenize};

use super::Input;
use crate::diagnostic::emit_all;

/// Renders every token of `input`, one per line, including trivia and EOF.
///
/// Lexical errors are printed to stderr but do not stop the listing.
#[must_use]
pub fn tokens(input: &Input) -> String {
    let mut diagnostics = DiagnosticsBag::new();
    let tokens = tokenize(&input.source, &mut diagnostics);
    emit_all(&diagnostics, &input.name, &input.source);
    let mut out = String::new();
    for token in &tokens {
        let _ = writeln!(out, "{}", describe(token));
    }
    out
}

/// Renders the syntax tree of `input` as an s-expression.
///
/// Parse errors are printed to stderr; the recovered tree is still shown.
#[must_use]
pub fn ast(input: &Input) -> String {
    let mut diagnostics = DiagnosticsBag::new();
    let tree = parse_program(&input.source, &mut diagnostics);
    emit_all(&diagnostics, &input.name, &input.source);
    tree.to_sexpr(tree.root())
}

fn describe(token: &Token) -> String {
    let position = format!("{}:{}", token.line(), token.column());
    let kind = token.kind();
    match token.value() {
        Some(value) if matches!(kind, TokenKind::Number | TokenKind::Identifier | TokenKind::Invalid) => {
            format!("{position:<8}{:<16}{value:?}", kind.to_string())
        }
        _ if kind.is_trivia() => format!("{position:<8}{kind:?}"),
        _ => format!("{position:<8}{kind}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_tokens_with_positions() {
        let listing = tokens(&Input::inline("x <= 12"));
        let lines: Vec<_> = listing.lines().map(str::trim_end).collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "1:1     identifier      \"x\"");
        assert!(lines[2].starts_with("1:3"));
        assert_eq!(lines[4], "1:6     number          \"12\"");
        assert_eq!(lines[5], "1:8     <eof>");
    }

    #[test]
    fn trivia_is_named_not_printed() {
        let listing = tokens(&Input::inline("1\n\t2"));
        let lines: Vec<_> = listing.lines().map(str::trim_end).collect();
        assert_eq!(lines[1], "1:2     Newline");
        assert_eq!(lines[2], "2:1     Tab");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn renders_recovered_tree() {
        assert_eq!(ast(&Input::inline("2^3^2; a < b")), "(block (^ 2 (^ 3 2)) (< a b))");
        assert_eq!(ast(&Input::inline("(1 +")), "(block (paren (+ 1 <missing>)))");
    }
}
