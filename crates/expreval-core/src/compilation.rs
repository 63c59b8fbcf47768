// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The end-to-end pipeline.
//!
//! [`compile`] parses the whole input as a program, optionally infers its
//! type and optionally lowers it to a [`CompiledFunction`]. All stages report
//! into one [`DiagnosticsBag`] owned by the resulting [`Compilation`].
//!
//! ```
//! use expreval_core::compilation::{CompileOptions, compile};
//! use expreval_core::semantic_analysis::TypeSymbol;
//!
//! let compilation = compile("let x = 2; (x + 3) * 2.0", &CompileOptions::default());
//! assert!(compilation.diagnostics.is_empty());
//! assert_eq!(compilation.root_type, Some(TypeSymbol::Double));
//! assert_eq!(compilation.value(), Some(10.0));
//! ```

use std::io::{self, Read};

use crate::ast::SyntaxTree;
use crate::codegen::{CodegenError, CompiledFunction, Generator};
use crate::semantic_analysis::{TypeSymbol, analyse};
use crate::source_analysis::{DiagnosticsBag, parse_program, read_source};

/// Which stages to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Run type inference.
    pub check_types: bool,
    /// Run code generation.
    pub generate: bool,
    /// Skip later stages once any error has been reported.
    pub stop_on_errors: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            check_types: true,
            generate: true,
            stop_on_errors: false,
        }
    }
}

/// Everything one pipeline run produced.
#[derive(Debug)]
pub struct Compilation {
    pub diagnostics: DiagnosticsBag,
    pub tree: SyntaxTree,
    /// Type of the program, if type inference ran.
    pub root_type: Option<TypeSymbol>,
    /// The lowered program, if code generation ran and succeeded.
    pub function: Option<CompiledFunction>,
    /// Why code generation failed, if it ran and did not succeed.
    pub codegen_error: Option<CodegenError>,
}

impl Compilation {
    /// Returns true if a function was produced and no errors were reported.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.function.is_some() && !self.diagnostics.has_errors()
    }

    /// Runs the compiled function, if there is one.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        self.function.as_ref().map(CompiledFunction::call)
    }
}

/// Compiles `source` with a fresh default diagnostics bag.
#[must_use]
pub fn compile(source: &str, options: &CompileOptions) -> Compilation {
    compile_with(source, options, DiagnosticsBag::new())
}

/// Compiles `source`, reporting into `diagnostics`.
///
/// Use this to supply a bag with a custom message catalog.
#[must_use]
pub fn compile_with(
    source: &str,
    options: &CompileOptions,
    mut diagnostics: DiagnosticsBag,
) -> Compilation {
    let tree = parse_program(source, &mut diagnostics);
    let halted = |diagnostics: &DiagnosticsBag| options.stop_on_errors && diagnostics.has_errors();

    let root_type = if options.check_types && !halted(&diagnostics) {
        Some(analyse(&tree, &mut diagnostics).root_type)
    } else {
        None
    };

    let (function, codegen_error) = if options.generate && !halted(&diagnostics) {
        match Generator::generate(&tree, tree.root()) {
            Ok(function) => (Some(function), None),
            Err(error) => {
                tracing::debug!(%error, "code generation failed");
                (None, Some(error))
            }
        }
    } else {
        (None, None)
    };

    tracing::debug!(
        diagnostics = diagnostics.len(),
        errors = diagnostics.error_count(),
        root_type = ?root_type,
        generated = function.is_some(),
        "compilation finished"
    );

    Compilation {
        diagnostics,
        tree,
        root_type,
        function,
        codegen_error,
    }
}

/// Reads all of `reader` and compiles it.
///
/// # Errors
///
/// Returns any I/O error from reading, including invalid UTF-8.
pub fn compile_reader(reader: impl Read, options: &CompileOptions) -> io::Result<Compilation> {
    let source = read_source(reader)?;
    Ok(compile(&source, options))
}
