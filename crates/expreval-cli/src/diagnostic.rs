// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Rich diagnostics using miette.
//!
//! Converts expreval-core diagnostics into miette-formatted reports that show
//! the offending source with the span underlined. Core spans are
//! line/column based; they are mapped to byte offsets against the source
//! they were produced from.

// Suppress unused_assignments for struct fields used by derive macros
#![allow(unused_assignments)]

use expreval_core::source_analysis::{Diagnostic as CoreDiagnostic, DiagnosticsBag, Severity};
use miette::{Diagnostic, SourceSpan};

/// A compilation diagnostic with source context.
#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("{message}")]
#[diagnostic(code(expreval::compile))]
pub struct SourceDiagnostic {
    pub severity: Severity,
    pub message: String,
    #[source_code]
    pub src: miette::NamedSource<String>,
    #[label("{label}")]
    pub span: SourceSpan,
    pub label: String,
}

impl SourceDiagnostic {
    /// Creates a report for `diagnostic`, which was produced from `source`.
    #[must_use]
    pub fn from_core_diagnostic(diagnostic: &CoreDiagnostic, name: &str, source: &str) -> Self {
        let label = match diagnostic.severity {
            Severity::Error => "error here",
            Severity::Warning => "warning here",
            Severity::Info => "note",
        };
        let range = diagnostic.span.byte_range(source);

        Self {
            severity: diagnostic.severity,
            message: diagnostic.message.to_string(),
            src: miette::NamedSource::new(name, source.to_string()),
            span: (range.start, range.len()).into(),
            label: label.to_string(),
        }
    }
}

/// Prints every diagnostic in `diagnostics` to stderr.
pub fn emit_all(diagnostics: &DiagnosticsBag, name: &str, source: &str) {
    for diagnostic in diagnostics {
        let report = SourceDiagnostic::from_core_diagnostic(diagnostic, name, source);
        eprintln!("{:?}", miette::Report::new(report));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expreval_core::source_analysis::{Location, Span};

    #[test]
    fn maps_line_and_column_to_bytes() {
        let core = CoreDiagnostic::error("Expected token ')'", Span::on_line(2, 3, 2));
        let source = "1 +\nab(cd";
        let diag = SourceDiagnostic::from_core_diagnostic(&core, "input.expr", source);

        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "Expected token ')'");
        assert_eq!(diag.span.offset(), 6);
        assert_eq!(diag.span.len(), 2);
        assert_eq!(diag.label, "error here");
    }

    #[test]
    fn counts_columns_in_characters() {
        let core = CoreDiagnostic::error("Invalid token '$'", Span::on_line(1, 3, 1));
        let diag = SourceDiagnostic::from_core_diagnostic(&core, "<expr>", "é $");
        assert_eq!(diag.span.offset(), 3);
        assert_eq!(diag.span.len(), 1);
    }

    #[test]
    fn zero_length_span_at_end_of_input() {
        let end = Location::new(1, 4);
        let core = CoreDiagnostic::warning("Unexpected end of input", Span::new(end, end));
        let diag = SourceDiagnostic::from_core_diagnostic(&core, "<expr>", "1 +");
        assert_eq!(diag.span.offset(), 3);
        assert_eq!(diag.span.len(), 0);
        assert_eq!(diag.label, "warning here");
    }
}
