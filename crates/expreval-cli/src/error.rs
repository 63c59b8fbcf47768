// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Command failures.

use camino::Utf8PathBuf;
use expreval_core::codegen::CodegenError;
use miette::Diagnostic;

/// Why a command failed.
///
/// Source-level problems have already been printed as diagnostics by the
/// time a [`CliError::Compile`] is returned.
#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum CliError {
    #[error("failed to read '{path}'")]
    #[diagnostic(code(expreval::io))]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no input: pass an expression or --file <PATH>")]
    #[diagnostic(code(expreval::usage))]
    NoInput,

    #[error("{errors} error{} in {name}", plural(.errors))]
    #[diagnostic(code(expreval::compile))]
    Compile { name: String, errors: usize },

    #[error(transparent)]
    #[diagnostic(code(expreval::codegen))]
    Codegen(#[from] CodegenError),

    #[error("line editor failed")]
    #[diagnostic(code(expreval::repl))]
    Readline(#[from] rustyline::error::ReadlineError),
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn plural(count: &usize) -> &'static str {
    if *count == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_pluralizes() {
        let one = CliError::Compile {
            name: "<expr>".into(),
            errors: 1,
        };
        assert_eq!(one.to_string(), "1 error in <expr>");
        let two = CliError::Compile {
            name: "a.expr".into(),
            errors: 2,
        };
        assert_eq!(two.to_string(), "2 errors in a.expr");
    }
}
