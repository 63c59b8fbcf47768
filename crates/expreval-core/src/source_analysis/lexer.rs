// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis.
//!
//! The lexer converts source text into a lazy sequence of [`Token`]s with
//! one token of lookahead. Unlike a batch tokenizer it is pulled by the
//! parser through [`Lexer::peek`] and [`Lexer::read`].
//!
//! # Design Principles
//!
//! - **Error recovery**: never panic on malformed input; unknown characters
//!   become [`TokenKind::Invalid`] tokens plus an error diagnostic
//! - **Trivia as tokens**: spaces, tabs and line breaks are returned as their
//!   own token kinds so the parser decides what to skip
//! - **Side-effect free peeking**: a peeked token is cached together with the
//!   cursor it leaves behind; position queries keep reporting the pre-peek
//!   position until [`Lexer::read`] promotes the cache
//!
//! # Example
//!
//! ```
//! use expreval_core::source_analysis::{DiagnosticsBag, Lexer, TokenKind};
//!
//! let mut diagnostics = DiagnosticsBag::new();
//! let kinds: Vec<_> = Lexer::new("x + 1", &mut diagnostics)
//!     .map(|t| t.kind())
//!     .collect();
//! assert_eq!(
//!     kinds,
//!     [
//!         TokenKind::Identifier,
//!         TokenKind::Whitespace,
//!         TokenKind::Plus,
//!         TokenKind::Whitespace,
//!         TokenKind::Number,
//!     ]
//! );
//! ```

use std::io::{self, Read};

use super::{DiagnosticsBag, Location, MessageKey, Token, TokenKind};

/// Reads a whole character stream into memory for lexing.
///
/// # Errors
///
/// Returns any I/O error from the reader, including invalid UTF-8.
pub fn read_source(mut reader: impl Read) -> io::Result<String> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    Ok(source)
}

/// A position in the source: byte offset plus the user-facing line/column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    offset: usize,
    line: u32,
    column: u32,
}

impl Cursor {
    const START: Self = Self {
        offset: 0,
        line: 1,
        column: 1,
    };
}

/// A scanned but not yet consumed token, with the cursor it leaves behind.
#[derive(Debug, Clone)]
struct Lookahead {
    token: Token,
    after: Cursor,
}

/// A pull-based lexer with one token of lookahead.
///
/// Lexing errors are appended to the injected [`DiagnosticsBag`] when the
/// offending token is read, not when it is peeked.
pub struct Lexer<'src, 'd> {
    source: &'src str,
    cursor: Cursor,
    lookahead: Option<Lookahead>,
    diagnostics: &'d mut DiagnosticsBag,
}

impl std::fmt::Debug for Lexer<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("cursor", &self.cursor)
            .field("remaining", &self.source.get(self.cursor.offset..).unwrap_or(""))
            .field("lookahead", &self.lookahead)
            .finish()
    }
}

impl<'src, 'd> Lexer<'src, 'd> {
    /// Creates a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str, diagnostics: &'d mut DiagnosticsBag) -> Self {
        Self {
            source,
            cursor: Cursor::START,
            lookahead: None,
            diagnostics,
        }
    }

    /// Returns the next token without consuming it.
    ///
    /// Repeated calls return equal tokens and leave [`Self::location`] unchanged.
    pub fn peek(&mut self) -> Token {
        if let Some(lookahead) = &self.lookahead {
            return lookahead.token.clone();
        }
        let (token, after) = scan(self.source, self.cursor);
        self.lookahead = Some(Lookahead {
            token: token.clone(),
            after,
        });
        token
    }

    /// Consumes and returns the next token.
    pub fn read(&mut self) -> Token {
        let Lookahead { token, after } = match self.lookahead.take() {
            Some(lookahead) => lookahead,
            None => {
                let (token, after) = scan(self.source, self.cursor);
                Lookahead { token, after }
            }
        };
        self.cursor = after;
        if token.kind().is_error() {
            self.diagnostics
                .error(MessageKey::InvalidToken, &[token.text()], token.span());
        }
        tracing::trace!(%token, "read token");
        token
    }

    /// Returns true if the next token is the end-of-input sentinel.
    pub fn is_at_end(&mut self) -> bool {
        self.peek().kind().is_eof()
    }

    /// Returns true if the next unread character is a line terminator.
    #[must_use]
    pub fn is_at_line_break(&self) -> bool {
        matches!(self.char_at_cursor(), Some('\n' | '\r'))
    }

    /// Returns the position of the next unread character.
    #[must_use]
    pub fn location(&self) -> Location {
        Location::new(self.cursor.line, self.cursor.column)
    }

    /// Returns the 1-based line of the next unread character.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.cursor.line
    }

    /// Returns the 1-based column of the next unread character.
    #[must_use]
    pub fn column(&self) -> u32 {
        self.cursor.column
    }

    /// Returns the diagnostics bag this lexer reports into.
    pub fn diagnostics(&mut self) -> &mut DiagnosticsBag {
        &mut *self.diagnostics
    }

    /// Returns the source text being lexed.
    #[must_use]
    pub fn source(&self) -> &'src str {
        self.source
    }

    fn char_at_cursor(&self) -> Option<char> {
        self.source.get(self.cursor.offset..)?.chars().next()
    }
}

/// Yields tokens up to, but not including, end of input.
impl Iterator for Lexer<'_, '_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_at_end() {
            None
        } else {
            Some(self.read())
        }
    }
}

/// Tokenizes a complete source string, including the trailing end-of-file token.
pub fn tokenize(source: &str, diagnostics: &mut DiagnosticsBag) -> Vec<Token> {
    let mut lexer = Lexer::new(source, diagnostics);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.read();
        let done = token.kind().is_eof();
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

// ============================================================================
// Scanning
// ============================================================================

/// Scanning state for a single token.
struct Scanner<'src> {
    source: &'src str,
    start: Cursor,
    pos: Cursor,
}

impl<'src> Scanner<'src> {
    fn peek_char(&self) -> Option<char> {
        self.source[self.pos.offset..].chars().next()
    }

    /// Consumes the next character, advancing the column.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos.offset += c.len_utf8();
        self.pos.column += 1;
        Some(c)
    }

    /// Consumes the next character if it equals `expected`.
    fn advance_if(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    fn text(&self) -> &'src str {
        &self.source[self.start.offset..self.pos.offset]
    }

    fn width(&self) -> u32 {
        self.pos.column - self.start.column
    }

    fn token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.start.line, self.start.column, self.width())
    }

    fn token_with_text(&self, kind: TokenKind) -> Token {
        Token::with_value(
            kind,
            self.start.line,
            self.start.column,
            self.width(),
            self.text(),
        )
    }
}

/// Scans one token starting at `cursor`, returning it and the cursor after it.
fn scan(source: &str, cursor: Cursor) -> (Token, Cursor) {
    let mut s = Scanner {
        source,
        start: cursor,
        pos: cursor,
    };

    let Some(c) = s.advance() else {
        return (s.token(TokenKind::EndOfFile), cursor);
    };

    let token = match c {
        c if is_identifier_start(c) => {
            s.advance_while(is_identifier_continue);
            match TokenKind::keyword(s.text()) {
                Some(keyword) => s.token_with_text(keyword),
                None => s.token_with_text(TokenKind::Identifier),
            }
        }
        c if c.is_ascii_digit() => {
            s.advance_while(|c| c.is_ascii_digit());
            s.token_with_text(TokenKind::Number)
        }
        ' ' => {
            s.advance_while(|c| c == ' ');
            s.token(TokenKind::Whitespace)
        }
        '\t' => s.token(TokenKind::Tab),
        '\r' => s.token(TokenKind::CarriageReturn),
        '\n' => {
            let token = s.token(TokenKind::Newline);
            s.pos.line += 1;
            s.pos.column = 1;
            token
        }
        '+' => s.token(TokenKind::Plus),
        '-' => s.token(TokenKind::Minus),
        '*' => s.token(TokenKind::Star),
        '/' => s.token(TokenKind::Slash),
        '%' => s.token(TokenKind::Percent),
        '^' => s.token(TokenKind::Caret),
        '(' => s.token(TokenKind::OpenParen),
        ')' => s.token(TokenKind::CloseParen),
        ',' => s.token(TokenKind::Comma),
        '.' => s.token(TokenKind::Period),
        ':' => s.token(TokenKind::Colon),
        ';' => s.token(TokenKind::Semicolon),
        '=' if s.advance_if('=') => s.token_with_text(TokenKind::Equal),
        '=' => s.token(TokenKind::Assign),
        '!' if s.advance_if('=') => s.token_with_text(TokenKind::NotEqual),
        '!' => s.token(TokenKind::Negate),
        '<' if s.advance_if('=') => s.token_with_text(TokenKind::LessOrEqual),
        '<' => s.token(TokenKind::Less),
        '>' if s.advance_if('=') => s.token_with_text(TokenKind::GreaterOrEqual),
        '>' => s.token(TokenKind::Greater),
        '&' if s.advance_if('&') => s.token_with_text(TokenKind::And),
        '|' if s.advance_if('|') => s.token_with_text(TokenKind::Or),
        _ => s.token_with_text(TokenKind::Invalid),
    };

    (token, s.pos)
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::Span;

    fn lex_kinds(source: &str) -> Vec<TokenKind> {
        let mut diagnostics = DiagnosticsBag::new();
        Lexer::new(source, &mut diagnostics)
            .map(|t| t.kind())
            .collect()
    }

    fn significant_kinds(source: &str) -> Vec<TokenKind> {
        lex_kinds(source)
            .into_iter()
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn lex_empty() {
        assert!(lex_kinds("").is_empty());
    }

    #[test]
    fn lex_digits_as_one_number() {
        let mut diagnostics = DiagnosticsBag::new();
        let mut lexer = Lexer::new("12345", &mut diagnostics);
        let token = lexer.read();
        assert_eq!(token.kind(), TokenKind::Number);
        assert_eq!(token.value(), Some("12345"));
        assert_eq!(token.width(), 5);
        assert!(lexer.is_at_end());
    }

    #[test]
    fn lex_real_number_as_three_tokens() {
        assert_eq!(
            lex_kinds("1.25"),
            [TokenKind::Number, TokenKind::Period, TokenKind::Number]
        );
    }

    #[test]
    fn lex_identifiers_and_keywords() {
        assert_eq!(
            significant_kinds("if x then y1 else not end"),
            [
                TokenKind::IfKeyword,
                TokenKind::Identifier,
                TokenKind::ThenKeyword,
                TokenKind::Identifier,
                TokenKind::ElseKeyword,
                TokenKind::NotKeyword,
                TokenKind::EndKeyword,
            ]
        );
        assert_eq!(
            significant_kinds("for each while do true false let"),
            [
                TokenKind::ForKeyword,
                TokenKind::EachKeyword,
                TokenKind::WhileKeyword,
                TokenKind::DoKeyword,
                TokenKind::TrueKeyword,
                TokenKind::FalseKeyword,
                TokenKind::LetKeyword,
            ]
        );
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(significant_kinds("If THEN"), [TokenKind::Identifier; 2]);
    }

    #[test]
    fn identifier_keeps_its_text() {
        let mut diagnostics = DiagnosticsBag::new();
        let token = Lexer::new("fib_2", &mut diagnostics).read();
        assert_eq!(token.kind(), TokenKind::Identifier);
        assert_eq!(token.value(), Some("fib_2"));
    }

    #[test]
    fn lex_two_character_operators() {
        assert_eq!(
            significant_kinds("== != <= >= && ||"),
            [
                TokenKind::Equal,
                TokenKind::NotEqual,
                TokenKind::LessOrEqual,
                TokenKind::GreaterOrEqual,
                TokenKind::And,
                TokenKind::Or,
            ]
        );
    }

    #[test]
    fn lex_single_character_operators() {
        assert_eq!(
            lex_kinds("+-*/%^=!<>(),.:;"),
            [
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::Caret,
                TokenKind::Assign,
                TokenKind::Negate,
                TokenKind::Less,
                TokenKind::Greater,
                TokenKind::OpenParen,
                TokenKind::CloseParen,
                TokenKind::Comma,
                TokenKind::Period,
                TokenKind::Colon,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn lone_ampersand_and_pipe_are_invalid() {
        let mut diagnostics = DiagnosticsBag::new();
        let kinds: Vec<_> = Lexer::new("&|", &mut diagnostics)
            .map(|t| t.kind())
            .collect();
        assert_eq!(kinds, [TokenKind::Invalid, TokenKind::Invalid]);
        assert_eq!(diagnostics.error_count(), 2);
    }

    #[test]
    fn spaces_coalesce_into_one_token() {
        let mut diagnostics = DiagnosticsBag::new();
        let tokens: Vec<_> = Lexer::new("1    2", &mut diagnostics).collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].kind(), TokenKind::Whitespace);
        assert_eq!(tokens[1].width(), 4);
        assert_eq!(tokens[2].column(), 6);
    }

    #[test]
    fn tab_and_line_breaks_are_single_tokens() {
        assert_eq!(
            lex_kinds("\t\t\r\n"),
            [
                TokenKind::Tab,
                TokenKind::Tab,
                TokenKind::CarriageReturn,
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn newline_advances_line_and_resets_column() {
        let mut diagnostics = DiagnosticsBag::new();
        let tokens = tokenize("ab\n  cd", &mut diagnostics);
        let cd = &tokens[3];
        assert_eq!(cd.value(), Some("cd"));
        assert_eq!((cd.line(), cd.column()), (2, 3));
        let eof = tokens.last().map(Token::location);
        assert_eq!(eof, Some(Location::new(2, 5)));
    }

    #[test]
    fn invalid_character_reports_error() {
        let mut diagnostics = DiagnosticsBag::new();
        let tokens = tokenize("1 # 2", &mut diagnostics);
        assert_eq!(tokens[2].kind(), TokenKind::Invalid);
        assert_eq!(tokens[2].value(), Some("#"));
        let reported: Vec<_> = diagnostics.iter().collect();
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].message.as_str(), "Invalid token '#'");
        assert_eq!(reported[0].span, Span::on_line(1, 3, 1));
    }

    #[test]
    fn non_ascii_characters_count_as_one_column() {
        let mut diagnostics = DiagnosticsBag::new();
        let tokens = tokenize("é+€", &mut diagnostics);
        assert_eq!(tokens[0].kind(), TokenKind::Identifier);
        assert_eq!(tokens[1].column(), 2);
        assert_eq!(tokens[2].kind(), TokenKind::Invalid);
        assert_eq!(tokens[2].width(), 1);
    }

    #[test]
    fn eof_is_zero_width_and_repeatable() {
        let mut diagnostics = DiagnosticsBag::new();
        let mut lexer = Lexer::new("7", &mut diagnostics);
        lexer.read();
        let first = lexer.read();
        let second = lexer.read();
        assert_eq!(first.kind(), TokenKind::EndOfFile);
        assert_eq!(first.width(), 0);
        assert_eq!(first, second);
    }

    #[test]
    fn peek_is_idempotent_and_does_not_move() {
        let mut diagnostics = DiagnosticsBag::new();
        let mut lexer = Lexer::new("  42", &mut diagnostics);
        let before = lexer.location();
        let a = lexer.peek();
        let b = lexer.peek();
        assert_eq!(a, b);
        assert_eq!(lexer.location(), before);
        assert_eq!(lexer.read(), a);
        assert_eq!(lexer.location(), Location::new(1, 3));
        assert_eq!((lexer.line(), lexer.column()), (1, 3));
        assert_eq!(lexer.read().value(), Some("42"));
    }

    #[test]
    fn peek_defers_invalid_token_diagnostic_until_read() {
        let mut diagnostics = DiagnosticsBag::new();
        let mut lexer = Lexer::new("@", &mut diagnostics);
        lexer.peek();
        lexer.peek();
        lexer.read();
        lexer.read();
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn line_break_query_sees_unread_character() {
        let mut diagnostics = DiagnosticsBag::new();
        let mut lexer = Lexer::new("x\ny", &mut diagnostics);
        assert!(!lexer.is_at_line_break());
        lexer.read();
        assert!(lexer.is_at_line_break());
        lexer.peek();
        assert!(lexer.is_at_line_break());
        lexer.read();
        assert!(!lexer.is_at_line_break());
    }

    #[test]
    fn read_source_buffers_reader() {
        let source = read_source(std::io::Cursor::new("1 + 2")).unwrap();
        assert_eq!(source, "1 + 2");
    }
}
