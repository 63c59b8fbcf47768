// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! CLI command implementations.

pub mod eval;
pub mod inspect;
pub mod repl;

use camino::Utf8Path;

use crate::error::CliError;

/// Name shown in diagnostics for expressions given on the command line.
pub const INLINE_SOURCE_NAME: &str = "<expr>";

/// Source text together with the name it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub name: String,
    pub source: String,
}

impl Input {
    /// Wraps an expression given on the command line.
    #[must_use]
    pub fn inline(source: impl Into<String>) -> Self {
        Self {
            name: INLINE_SOURCE_NAME.to_string(),
            source: source.into(),
        }
    }

    /// Reads a source file.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Read`] if the file cannot be read as UTF-8.
    pub fn from_file(path: &Utf8Path) -> Result<Self, CliError> {
        let file = std::fs::File::open(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let source = expreval_core::source_analysis::read_source(file).map_err(|source| {
            CliError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;
        tracing::debug!(%path, bytes = source.len(), "read source file");
        Ok(Self {
            name: path.to_string(),
            source,
        })
    }

    /// Picks the file if one is given, otherwise the inline expression.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::NoInput`] when neither is present.
    pub fn resolve(expression: Option<String>, file: Option<&Utf8Path>) -> Result<Self, CliError> {
        match (file, expression) {
            (Some(path), _) => Self::from_file(path),
            (None, Some(expression)) => Ok(Self::inline(expression)),
            (None, None) => Err(CliError::NoInput),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::io::Write as _;

    #[test]
    fn resolve_prefers_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "1 + 2").unwrap();
        let path = Utf8PathBuf::from_path_buf(file.path().to_path_buf()).unwrap();

        let input = Input::resolve(Some("3".into()), Some(&path)).unwrap();
        assert_eq!(input.source, "1 + 2");
        assert_eq!(input.name, path.as_str());
    }

    #[test]
    fn resolve_inline_and_missing() {
        assert_eq!(Input::resolve(Some("3".into()), None).unwrap(), Input::inline("3"));
        assert!(matches!(Input::resolve(None, None), Err(CliError::NoInput)));
    }

    #[test]
    fn unreadable_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.expr")).unwrap();
        let error = Input::from_file(&path).unwrap_err();
        assert_eq!(error.to_string(), format!("failed to read '{path}'"));
    }
}
