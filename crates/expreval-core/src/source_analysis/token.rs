// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types produced by the lexer.
//!
//! # Token Structure
//!
//! Each token consists of:
//! - A [`TokenKind`] indicating the type of token
//! - A 1-based line/column position and a character `width`
//! - An optional literal `value` (identifiers, numbers, keywords, two-character
//!   operators and invalid characters keep their source text)
//! - Leading [`Trivia`], filled in by the parser when it skips whitespace
//!
//! Tokens are cheap to clone: text is held in an [`EcoString`] and trivia in
//! an [`EcoVec`].

use std::fmt;

use ecow::{EcoString, EcoVec};

use super::{Location, Span};

/// The kind of token, not including position or text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Placeholder synthesized by the parser when expected input is absent.
    Missing,
    /// A character the language does not recognise.
    Invalid,
    /// End of input. Zero width, returned repeatedly once reached.
    EndOfFile,

    // === Trivia ===
    /// A run of spaces.
    Whitespace,
    /// `\t`
    Tab,
    /// `\r`
    CarriageReturn,
    /// `\n`
    Newline,

    // === Literals and names ===
    /// A run of decimal digits: `42`
    Number,
    /// A name that is not a keyword: `fib`, `x1`
    Identifier,

    // === Operators ===
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `^`
    Caret,
    /// `=`
    Assign,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `!`
    Negate,
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
    /// `&&`
    And,
    /// `||`
    Or,

    // === Punctuation ===
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `,`
    Comma,
    /// `.`
    Period,
    /// `:`
    Colon,
    /// `;`
    Semicolon,

    // === Keywords ===
    IfKeyword,
    ThenKeyword,
    ElseKeyword,
    ForKeyword,
    EachKeyword,
    WhileKeyword,
    DoKeyword,
    EndKeyword,
    TrueKeyword,
    FalseKeyword,
    LetKeyword,
    NotKeyword,
}

/// Reserved words, matched case-sensitively against identifier text.
const KEYWORDS: &[(&str, TokenKind)] = &[
    ("if", TokenKind::IfKeyword),
    ("then", TokenKind::ThenKeyword),
    ("else", TokenKind::ElseKeyword),
    ("for", TokenKind::ForKeyword),
    ("each", TokenKind::EachKeyword),
    ("while", TokenKind::WhileKeyword),
    ("do", TokenKind::DoKeyword),
    ("end", TokenKind::EndKeyword),
    ("true", TokenKind::TrueKeyword),
    ("false", TokenKind::FalseKeyword),
    ("let", TokenKind::LetKeyword),
    ("not", TokenKind::NotKeyword),
];

impl TokenKind {
    /// Looks up the keyword kind for `word`, if it is reserved.
    #[must_use]
    pub fn keyword(word: &str) -> Option<Self> {
        KEYWORDS
            .iter()
            .find(|(text, _)| *text == word)
            .map(|&(_, kind)| kind)
    }

    /// Returns true for whitespace and line-break tokens.
    #[must_use]
    pub const fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::Tab | Self::CarriageReturn | Self::Newline
        )
    }

    /// Returns true for reserved words.
    #[must_use]
    pub const fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::IfKeyword
                | Self::ThenKeyword
                | Self::ElseKeyword
                | Self::ForKeyword
                | Self::EachKeyword
                | Self::WhileKeyword
                | Self::DoKeyword
                | Self::EndKeyword
                | Self::TrueKeyword
                | Self::FalseKeyword
                | Self::LetKeyword
                | Self::NotKeyword
        )
    }

    /// Returns true for `==`, `!=`, `<`, `<=`, `>` and `>=`.
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::NotEqual
                | Self::Less
                | Self::LessOrEqual
                | Self::Greater
                | Self::GreaterOrEqual
        )
    }

    /// Returns true for the end-of-input sentinel.
    #[must_use]
    pub const fn is_eof(self) -> bool {
        matches!(self, Self::EndOfFile)
    }

    /// Returns true for tokens that represent a lexing error.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Invalid)
    }

    /// Returns the fixed source text of this kind, if it has one.
    #[must_use]
    pub const fn as_str(self) -> Option<&'static str> {
        let text = match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Caret => "^",
            Self::Assign => "=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Negate => "!",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::OpenParen => "(",
            Self::CloseParen => ")",
            Self::Comma => ",",
            Self::Period => ".",
            Self::Colon => ":",
            Self::Semicolon => ";",
            Self::Tab => "\t",
            Self::CarriageReturn => "\r",
            Self::Newline => "\n",
            Self::IfKeyword => "if",
            Self::ThenKeyword => "then",
            Self::ElseKeyword => "else",
            Self::ForKeyword => "for",
            Self::EachKeyword => "each",
            Self::WhileKeyword => "while",
            Self::DoKeyword => "do",
            Self::EndKeyword => "end",
            Self::TrueKeyword => "true",
            Self::FalseKeyword => "false",
            Self::LetKeyword => "let",
            Self::NotKeyword => "not",
            Self::Missing
            | Self::Invalid
            | Self::EndOfFile
            | Self::Whitespace
            | Self::Number
            | Self::Identifier => return None,
        };
        Some(text)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(text) => f.write_str(text),
            None => match self {
                Self::Missing => f.write_str("<missing>"),
                Self::Invalid => f.write_str("<invalid>"),
                Self::EndOfFile => f.write_str("<eof>"),
                Self::Whitespace => f.write_str("<whitespace>"),
                Self::Number => f.write_str("number"),
                _ => f.write_str("identifier"),
            },
        }
    }
}

/// Non-semantic source text skipped by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trivia {
    /// A run of spaces of the given width.
    Whitespace(u32),
    /// `\t`
    Tab,
    /// `\r`
    CarriageReturn,
    /// `\n`
    Newline,
}

impl Trivia {
    /// Converts a trivia token into its trivia form.
    #[must_use]
    pub fn from_token(token: &Token) -> Option<Self> {
        match token.kind() {
            TokenKind::Whitespace => Some(Self::Whitespace(token.width())),
            TokenKind::Tab => Some(Self::Tab),
            TokenKind::CarriageReturn => Some(Self::CarriageReturn),
            TokenKind::Newline => Some(Self::Newline),
            _ => None,
        }
    }

    /// Returns true for line terminators.
    #[must_use]
    pub const fn is_line_break(self) -> bool {
        matches!(self, Self::Newline | Self::CarriageReturn)
    }
}

/// A lexical token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    kind: TokenKind,
    line: u32,
    column: u32,
    width: u32,
    value: Option<EcoString>,
    leading_trivia: EcoVec<Trivia>,
}

impl Token {
    /// Creates a token without literal text.
    #[must_use]
    pub fn new(kind: TokenKind, line: u32, column: u32, width: u32) -> Self {
        Self {
            kind,
            line,
            column,
            width,
            value: None,
            leading_trivia: EcoVec::new(),
        }
    }

    /// Creates a token carrying its source text.
    #[must_use]
    pub fn with_value(
        kind: TokenKind,
        line: u32,
        column: u32,
        width: u32,
        value: impl Into<EcoString>,
    ) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::new(kind, line, column, width)
        }
    }

    /// Creates a zero-width placeholder at `location`.
    #[must_use]
    pub fn missing(location: Location) -> Self {
        Self::new(TokenKind::Missing, location.line(), location.column(), 0)
    }

    /// Returns the token kind.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Returns the 1-based line.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Returns the 1-based column.
    #[must_use]
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Returns the number of characters consumed.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the literal text, if the token kept it.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns the source text of the token: its value, or its fixed spelling.
    #[must_use]
    pub fn text(&self) -> &str {
        self.value()
            .or_else(|| self.kind.as_str())
            .unwrap_or_default()
    }

    /// Returns true if this is a synthesized placeholder.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.kind == TokenKind::Missing
    }

    /// Returns the start location.
    #[must_use]
    pub fn location(&self) -> Location {
        Location::new(self.line, self.column)
    }

    /// Returns the region covered by the token.
    #[must_use]
    pub fn span(&self) -> Span {
        Span::on_line(self.line, self.column, self.width)
    }

    /// Returns the trivia that preceded this token.
    #[must_use]
    pub fn leading_trivia(&self) -> &[Trivia] {
        &self.leading_trivia
    }

    /// Returns true if a line break precedes this token.
    #[must_use]
    pub fn has_leading_line_break(&self) -> bool {
        self.leading_trivia.iter().any(|t| t.is_line_break())
    }

    /// Attaches leading trivia.
    pub fn set_leading_trivia(&mut self, trivia: EcoVec<Trivia>) {
        self.leading_trivia = trivia;
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.value, self.kind) {
            (Some(value), TokenKind::Identifier | TokenKind::Number | TokenKind::Invalid) => {
                write!(f, "{:?}({value}) @ {}", self.kind, self.location())
            }
            _ => write!(f, "{:?} @ {}", self.kind, self.location()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_is_case_sensitive() {
        assert_eq!(TokenKind::keyword("if"), Some(TokenKind::IfKeyword));
        assert_eq!(TokenKind::keyword("not"), Some(TokenKind::NotKeyword));
        assert_eq!(TokenKind::keyword("If"), None);
        assert_eq!(TokenKind::keyword("iffy"), None);
    }

    #[test]
    fn every_keyword_round_trips_through_as_str() {
        for &(text, kind) in KEYWORDS {
            assert!(kind.is_keyword());
            assert_eq!(kind.as_str(), Some(text));
        }
    }

    #[test]
    fn token_kind_predicates() {
        assert!(TokenKind::Whitespace.is_trivia());
        assert!(TokenKind::Newline.is_trivia());
        assert!(!TokenKind::Number.is_trivia());
        assert!(TokenKind::LessOrEqual.is_comparison());
        assert!(!TokenKind::And.is_comparison());
        assert!(TokenKind::EndOfFile.is_eof());
        assert!(TokenKind::Invalid.is_error());
    }

    #[test]
    fn token_kind_display() {
        assert_eq!(TokenKind::CloseParen.to_string(), ")");
        assert_eq!(TokenKind::ThenKeyword.to_string(), "then");
        assert_eq!(TokenKind::Number.to_string(), "number");
        assert_eq!(TokenKind::Identifier.to_string(), "identifier");
        assert_eq!(TokenKind::EndOfFile.to_string(), "<eof>");
    }

    #[test]
    fn token_creation_and_accessors() {
        let token = Token::with_value(TokenKind::Identifier, 2, 4, 3, "fib");
        assert_eq!(token.kind(), TokenKind::Identifier);
        assert_eq!(token.value(), Some("fib"));
        assert_eq!(token.text(), "fib");
        assert_eq!(token.span(), Span::on_line(2, 4, 3));
        assert!(token.leading_trivia().is_empty());
    }

    #[test]
    fn text_falls_back_to_fixed_spelling() {
        assert_eq!(Token::new(TokenKind::Plus, 1, 1, 1).text(), "+");
        assert_eq!(Token::new(TokenKind::EndOfFile, 1, 1, 0).text(), "");
    }

    #[test]
    fn missing_token_is_zero_width() {
        let token = Token::missing(Location::new(3, 9));
        assert!(token.is_missing());
        assert_eq!(token.width(), 0);
        assert!(token.span().is_empty());
    }

    #[test]
    fn tokens_compare_structurally() {
        let a = Token::with_value(TokenKind::Number, 1, 1, 2, "42");
        let b = Token::with_value(TokenKind::Number, 1, 1, 2, "42");
        assert_eq!(a, b);
        assert_ne!(a, Token::with_value(TokenKind::Number, 1, 2, 2, "42"));
    }

    #[test]
    fn leading_line_break_detection() {
        let mut token = Token::new(TokenKind::Plus, 2, 1, 1);
        token.set_leading_trivia(EcoVec::from([Trivia::Whitespace(2)]));
        assert!(!token.has_leading_line_break());
        token.set_leading_trivia(EcoVec::from([Trivia::Newline, Trivia::Tab]));
        assert!(token.has_leading_line_break());
    }

    #[test]
    fn trivia_from_token() {
        let ws = Token::new(TokenKind::Whitespace, 1, 1, 4);
        assert_eq!(Trivia::from_token(&ws), Some(Trivia::Whitespace(4)));
        assert_eq!(Trivia::from_token(&Token::new(TokenKind::Plus, 1, 1, 1)), None);
    }
}
