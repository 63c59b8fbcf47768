// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expreval compiler core.
//!
//! This crate contains the expression language pipeline:
//! - Lexical analysis (tokenization with one-token lookahead)
//! - Parsing (arena AST construction with error recovery)
//! - Semantic analysis (memoized type inference)
//! - Code generation (stack machine lowering)
//!
//! A tree-walking [`evaluator`] mirrors the generated code, and
//! [`compilation`] chains the stages together.

pub mod ast;
pub mod codegen;
pub mod compilation;
pub mod evaluator;
pub mod semantic_analysis;
pub mod source_analysis;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::ast::{ExprId, Expression, SyntaxTree};
    pub use crate::codegen::{CodegenError, CompiledFunction, Generator};
    pub use crate::compilation::{Compilation, CompileOptions, compile};
    pub use crate::semantic_analysis::{SemanticModel, TypeSymbol};
    pub use crate::source_analysis::{Diagnostic, DiagnosticsBag, Severity, Span};
}
