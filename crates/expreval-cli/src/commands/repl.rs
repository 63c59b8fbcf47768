// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Interactive read-eval-print loop.
//!
//! Each line is compiled on its own; nothing carries over between lines.
//! Diagnostics are printed in their plain `Severity: Message (line:column)`
//! form rather than as source reports, since the input is on screen
//! already.

use expreval_core::compilation::{CompileOptions, compile};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::error::CliError;

/// Prompt shown before each line.
pub const PROMPT: &str = "Expression> ";

/// Runs the loop until end of input (Ctrl+D).
///
/// # Errors
///
/// Returns [`CliError::Readline`] if the terminal cannot be read.
pub fn run(options: &CompileOptions) -> Result<(), CliError> {
    let mut editor = DefaultEditor::new()?;

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line.as_str());
                println!("{}", respond(&line, options));
                println!();
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C abandons the current line only
                println!();
            }
            Err(ReadlineError::Eof) => break,
            Err(error) => return Err(error.into()),
        }
    }

    Ok(())
}

/// Compiles and runs one line, returning what the loop prints for it.
#[must_use]
pub fn respond(line: &str, options: &CompileOptions) -> String {
    let compilation = compile(line, options);
    if !compilation.diagnostics.is_empty() {
        return compilation.diagnostics.to_string().trim_end().to_string();
    }
    match (compilation.value(), compilation.codegen_error) {
        (Some(value), _) => value.to_string(),
        (None, Some(error)) => format!("Error: {error}"),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_value() {
        assert_eq!(respond("2+3*6", &CompileOptions::default()), "20");
        assert_eq!(respond("7 / 2", &CompileOptions::default()), "3.5");
        assert_eq!(respond("1 < 2", &CompileOptions::default()), "1");
    }

    #[test]
    fn prints_diagnostics_one_per_line() {
        assert_eq!(
            respond("(2+3", &CompileOptions::default()),
            "Error: Expected token ')' (1:5)"
        );
        assert_eq!(
            respond("1 $ 2 #", &CompileOptions::default()),
            "Error: Invalid token '$' (1:3)\nError: Invalid token '#' (1:7)"
        );
    }

    #[test]
    fn prints_codegen_failures() {
        assert_eq!(
            respond("f(1)", &CompileOptions::default()),
            "Error: a method invocation cannot be compiled (1:1..1:5)"
        );
    }

    #[test]
    fn nothing_to_print_without_generation() {
        let options = CompileOptions {
            generate: false,
            ..CompileOptions::default()
        };
        assert_eq!(respond("1", &options), "");
    }
}
