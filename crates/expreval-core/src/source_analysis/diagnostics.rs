// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Diagnostics and the message catalogue.
//!
//! Every stage of the pipeline reports problems by appending to a shared
//! [`DiagnosticsBag`]. The bag is passed by `&mut` reference into each stage
//! so tests can inspect one stage's output in isolation.
//!
//! Message text comes from a [`MessageCatalog`], keyed by [`MessageKey`] and
//! interpolated with positional arguments (`{0}`, `{1}`, ...). The default
//! catalogue is English; a different one can be injected with
//! [`DiagnosticsBag::with_catalog`].
//!
//! ```
//! use expreval_core::source_analysis::{DiagnosticsBag, MessageKey, Severity, Span};
//!
//! let mut bag = DiagnosticsBag::new();
//! bag.report(Severity::Error, MessageKey::ExpectedToken, &[")"], Span::on_line(1, 5, 0));
//! assert_eq!(bag.to_string(), "Error: Expected token ')' (1:5)\n");
//! ```

use std::fmt;

use ecow::EcoString;

use super::Span;

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational note.
    Info,
    /// A warning that should be addressed.
    Warning,
    /// An error; the generated function should not be trusted.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Error => "Error",
        })
    }
}

/// A rendered compile message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity of the diagnostic.
    pub severity: Severity,
    /// The rendered message.
    pub message: EcoString,
    /// The source region it refers to.
    pub span: Span,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    #[must_use]
    pub fn error(message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            span,
        }
    }

    /// Creates a new warning diagnostic.
    #[must_use]
    pub fn warning(message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            span,
        }
    }

    /// Creates a new informational diagnostic.
    #[must_use]
    pub fn info(message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
            span,
        }
    }

    /// Returns true for error-severity diagnostics.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.severity, self.message, self.span.start())
    }
}

// ============================================================================
// Message catalogue
// ============================================================================

/// Stable keys for diagnostic message templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// `{0}`: the offending character.
    InvalidToken,
    /// `{0}`: the offending token text.
    UnexpectedToken,
    UnexpectedEndOfInput,
    /// `{0}`: the expected token.
    ExpectedToken,
    /// `{0}`: the expected keyword.
    ExpectedKeyword,
    ExpectedIdentifier,
    ExpectedExpression,
    /// `{0}`: the token found where an expression term should start.
    InvalidExpressionTerm,
    TrailingComma,
    NestingTooDeep,
    IncompatibleBranchTypes,
}

/// A source of message templates.
pub trait MessageCatalog {
    /// Returns the template for `key`. Placeholders are `{0}`, `{1}`, ...
    fn template(&self, key: MessageKey) -> &str;
}

/// The built-in English messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessages;

impl MessageCatalog for DefaultMessages {
    fn template(&self, key: MessageKey) -> &str {
        match key {
            MessageKey::InvalidToken => "Invalid token '{0}'",
            MessageKey::UnexpectedToken => "Unexpected token '{0}'",
            MessageKey::UnexpectedEndOfInput => "Unexpected end of input",
            MessageKey::ExpectedToken => "Expected token '{0}'",
            MessageKey::ExpectedKeyword => "Expected keyword '{0}'",
            MessageKey::ExpectedIdentifier => "Expected identifier",
            MessageKey::ExpectedExpression => "Expected expression",
            MessageKey::InvalidExpressionTerm => "Invalid expression term '{0}'",
            MessageKey::TrailingComma => "Unexpected ',' before ')'",
            MessageKey::NestingTooDeep => "Expression nests too deeply",
            MessageKey::IncompatibleBranchTypes => {
                "The return types in each codepath are not compatible with each other."
            }
        }
    }
}

/// Substitutes `{n}` placeholders in `template` with `args[n]`.
///
/// Placeholders without a matching argument are left as written.
#[must_use]
pub fn interpolate(template: &str, args: &[&str]) -> EcoString {
    let mut out = EcoString::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substituted = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            let arg = args.get(index)?;
            Some((arg, close))
        });
        match substituted {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

// ============================================================================
// Bag
// ============================================================================

/// Append-only, insertion-ordered collection of diagnostics for one run.
pub struct DiagnosticsBag {
    diagnostics: Vec<Diagnostic>,
    catalog: Box<dyn MessageCatalog>,
}

impl DiagnosticsBag {
    /// Creates an empty bag using the English messages.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(Box::new(DefaultMessages))
    }

    /// Creates an empty bag rendering messages from `catalog`.
    #[must_use]
    pub fn with_catalog(catalog: Box<dyn MessageCatalog>) -> Self {
        Self {
            diagnostics: Vec::new(),
            catalog,
        }
    }

    /// Appends an already rendered diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::trace!(%diagnostic, "diagnostic reported");
        self.diagnostics.push(diagnostic);
    }

    /// Renders the template for `key` with `args` and appends it.
    pub fn report(&mut self, severity: Severity, key: MessageKey, args: &[&str], span: Span) {
        let message = interpolate(self.catalog.template(key), args);
        self.push(Diagnostic {
            severity,
            message,
            span,
        });
    }

    /// Appends an error-severity message.
    pub fn error(&mut self, key: MessageKey, args: &[&str], span: Span) {
        self.report(Severity::Error, key, args, span);
    }

    /// Iterates the diagnostics in the order they were reported.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    /// Returns the number of diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns true if nothing has been reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Returns the number of error-severity diagnostics.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Returns true if any error has been reported.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Returns the diagnostics as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consumes the bag, returning its diagnostics.
    #[must_use]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl Default for DiagnosticsBag {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DiagnosticsBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.diagnostics).finish()
    }
}

/// One line per diagnostic, `Severity: Message (line:column)`.
impl fmt::Display for DiagnosticsBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.diagnostics {
            writeln!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a DiagnosticsBag {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Shouty;

    impl MessageCatalog for Shouty {
        fn template(&self, key: MessageKey) -> &str {
            match key {
                MessageKey::ExpectedToken => "WANTED {0}!",
                _ => "NOPE",
            }
        }
    }

    #[test]
    fn interpolate_positional_arguments() {
        assert_eq!(interpolate("a {0} b {1}", &["x", "y"]).as_str(), "a x b y");
        assert_eq!(interpolate("{1}{0}", &["x", "y"]).as_str(), "yx");
    }

    #[test]
    fn interpolate_leaves_unmatched_placeholders() {
        assert_eq!(interpolate("{2} and {", &["x"]).as_str(), "{2} and {");
        assert_eq!(interpolate("{name}", &["x"]).as_str(), "{name}");
    }

    #[test]
    fn bag_preserves_insertion_order() {
        let mut bag = DiagnosticsBag::new();
        bag.push(Diagnostic::warning("first", Span::on_line(1, 1, 1)));
        bag.push(Diagnostic::error("second", Span::on_line(1, 2, 1)));
        bag.push(Diagnostic::info("third", Span::on_line(1, 3, 1)));
        let messages: Vec<_> = bag.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, ["first", "second", "third"]);
        assert_eq!(bag.len(), 3);
        assert_eq!(bag.error_count(), 1);
        assert!(bag.has_errors());
    }

    #[test]
    fn empty_bag_has_no_errors() {
        let bag = DiagnosticsBag::default();
        assert!(bag.is_empty());
        assert!(!bag.has_errors());
        assert_eq!(bag.to_string(), "");
    }

    #[test]
    fn report_uses_default_messages() {
        let mut bag = DiagnosticsBag::new();
        bag.error(MessageKey::ExpectedKeyword, &["then"], Span::on_line(2, 7, 0));
        assert_eq!(bag.as_slice()[0].message.as_str(), "Expected keyword 'then'");
        assert_eq!(bag.to_string(), "Error: Expected keyword 'then' (2:7)\n");
    }

    #[test]
    fn report_uses_injected_catalog() {
        let mut bag = DiagnosticsBag::with_catalog(Box::new(Shouty));
        bag.error(MessageKey::ExpectedToken, &[")"], Span::on_line(1, 1, 0));
        bag.error(MessageKey::TrailingComma, &[], Span::on_line(1, 1, 0));
        let messages: Vec<_> = bag.into_vec().into_iter().map(|d| d.message.to_string()).collect();
        assert_eq!(messages, ["WANTED )!", "NOPE"]);
    }

    #[test]
    fn severity_display() {
        assert_eq!(Severity::Info.to_string(), "Info");
        assert_eq!(Severity::Warning.to_string(), "Warning");
        assert_eq!(Severity::Error.to_string(), "Error");
    }
}
