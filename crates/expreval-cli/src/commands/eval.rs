// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! `expreval eval` and `expreval check`.

use expreval_core::compilation::{Compilation, CompileOptions, compile};
use expreval_core::semantic_analysis::TypeSymbol;
use tracing::{debug, instrument};

use super::Input;
use crate::diagnostic::emit_all;
use crate::error::CliError;

/// Compiles and runs `input`, returning its value.
///
/// Diagnostics are printed to stderr. Any error diagnostic fails the command,
/// even when code generation still produced a function.
///
/// # Errors
///
/// Returns [`CliError::Compile`] when errors were reported and
/// [`CliError::Codegen`] when the program cannot be lowered.
#[instrument(skip_all, fields(name = %input.name))]
pub fn evaluate(input: &Input, options: &CompileOptions) -> Result<f64, CliError> {
    let options = CompileOptions {
        generate: true,
        ..*options
    };
    let compilation = compile_reporting(input, &options)?;
    if let Some(error) = compilation.codegen_error {
        return Err(error.into());
    }
    let value = compilation.value().unwrap_or(f64::NAN);
    debug!(value, "evaluated");
    Ok(value)
}

/// Type-checks `input` without generating code and returns its type.
///
/// # Errors
///
/// Returns [`CliError::Compile`] when errors were reported.
#[instrument(skip_all, fields(name = %input.name))]
pub fn check(input: &Input, options: &CompileOptions) -> Result<TypeSymbol, CliError> {
    let options = CompileOptions {
        check_types: true,
        generate: false,
        ..*options
    };
    let compilation = compile_reporting(input, &options)?;
    Ok(compilation.root_type.unwrap_or(TypeSymbol::Object))
}

fn compile_reporting(input: &Input, options: &CompileOptions) -> Result<Compilation, CliError> {
    let compilation = compile(&input.source, options);
    emit_all(&compilation.diagnostics, &input.name, &input.source);
    let errors = compilation.diagnostics.error_count();
    if errors > 0 {
        return Err(CliError::Compile {
            name: input.name.clone(),
            errors,
        });
    }
    Ok(compilation)
}
