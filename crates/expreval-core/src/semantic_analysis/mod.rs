// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Type inference.
//!
//! The [`SemanticModel`] assigns every expression a [`TypeSymbol`] on demand.
//! Results are cached in a side table keyed by [`ExprId`], so asking twice for
//! the same node does no extra work and reports no duplicate diagnostics.
//!
//! # Typing Rules
//!
//! | Expression | Type |
//! |------------|------|
//! | integer / real / boolean literal | `Int` / `Double` / `Bool` |
//! | any binary operator, including comparisons, `&&` and `\|\|` | equal types kept, else `Double` if either side is, else `Int` |
//! | `not a` | `Bool` |
//! | `-a`, `+a`, `(a)` | type of `a` |
//! | `if` | common branch type; `Int` with `Double` is `Double`; otherwise an error and `Object` |
//! | `let x = a` | type of `a` (`Object` when the let has parameters) |
//! | identifiers, calls, placeholders | `Object` |
//! | block | type of its last expression |
//!
//! Identifiers have no binding environment, so a name never picks up the type
//! of a `let`.
//!
//! ```
//! use expreval_core::semantic_analysis::{SemanticModel, TypeSymbol};
//! use expreval_core::source_analysis::{DiagnosticsBag, parse_expression};
//!
//! let mut diagnostics = DiagnosticsBag::new();
//! let tree = parse_expression("if true then 1 else 2.0 end", &mut diagnostics);
//! let mut model = SemanticModel::new(&tree, &mut diagnostics);
//! assert_eq!(model.type_of(tree.root()), TypeSymbol::Double);
//! ```

use std::collections::HashMap;

use crate::ast::{ExprId, Expression, SyntaxTree, UnaryOperator};
use crate::source_analysis::{DiagnosticsBag, MessageKey};

mod types;

pub use types::TypeSymbol;

/// An expression paired with its inferred type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpressionInfo {
    pub expression: ExprId,
    pub type_symbol: TypeSymbol,
}

/// Cache entry; `InProgress` marks nodes on the current inference path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    InProgress,
    Done(TypeSymbol),
}

/// On-demand, memoized type inference over one tree.
pub struct SemanticModel<'t, 'd> {
    tree: &'t SyntaxTree,
    diagnostics: &'d mut DiagnosticsBag,
    types: HashMap<ExprId, Slot>,
}

impl<'t, 'd> SemanticModel<'t, 'd> {
    /// Creates a model for `tree`, reporting into `diagnostics`.
    #[must_use]
    pub fn new(tree: &'t SyntaxTree, diagnostics: &'d mut DiagnosticsBag) -> Self {
        Self {
            tree,
            diagnostics,
            types: HashMap::new(),
        }
    }

    /// Returns the type information for `id`, inferring it if needed.
    ///
    /// # Panics
    ///
    /// Panics if inference re-enters a node it is still analyzing, which
    /// means the tree is not acyclic.
    pub fn expression_info(&mut self, id: ExprId) -> ExpressionInfo {
        ExpressionInfo {
            expression: id,
            type_symbol: self.type_of(id),
        }
    }

    /// Returns the inferred type of `id`.
    ///
    /// # Panics
    ///
    /// See [`Self::expression_info`].
    pub fn type_of(&mut self, id: ExprId) -> TypeSymbol {
        match self.types.get(&id) {
            Some(Slot::Done(symbol)) => return *symbol,
            Some(Slot::InProgress) => {
                panic!("type inference re-entered expression {id}; the syntax tree has a cycle")
            }
            None => {}
        }

        self.types.insert(id, Slot::InProgress);
        let symbol = stacker::maybe_grow(32 * 1024, 256 * 1024, || self.infer(id));
        self.types.insert(id, Slot::Done(symbol));
        tracing::trace!(%id, %symbol, "inferred type");
        symbol
    }

    /// Returns the cached type of `id` without inferring anything.
    #[must_use]
    pub fn cached(&self, id: ExprId) -> Option<TypeSymbol> {
        match self.types.get(&id)? {
            Slot::Done(symbol) => Some(*symbol),
            Slot::InProgress => None,
        }
    }

    /// Returns the number of nodes analyzed so far.
    #[must_use]
    pub fn analyzed_count(&self) -> usize {
        self.types.len()
    }

    fn infer(&mut self, id: ExprId) -> TypeSymbol {
        let tree = self.tree;
        match &tree[id] {
            Expression::IntegerLiteral { .. } => TypeSymbol::Int,
            Expression::RealLiteral { .. } => TypeSymbol::Double,
            Expression::BooleanLiteral { .. } => TypeSymbol::Bool,
            Expression::Identifier { .. } | Expression::Missing { .. } => TypeSymbol::Object,
            Expression::Parenthesized { inner, .. } => self.type_of(*inner),
            Expression::Unary {
                operator, operand, ..
            } => {
                let operand = self.type_of(*operand);
                match operator {
                    UnaryOperator::Plus | UnaryOperator::Minus => operand,
                    UnaryOperator::Not => TypeSymbol::Bool,
                }
            }
            Expression::Binary {
                operator,
                left,
                right,
                ..
            } => {
                let left = self.type_of(*left);
                let right = self.type_of(*right);
                left.arithmetic(right)
            }
            Expression::IfThenElse {
                condition,
                body,
                else_clause,
                ..
            } => {
                self.type_of(*condition);
                let body = self.type_of(*body);
                let Some(else_clause) = else_clause else {
                    return body;
                };
                let other = self.type_of(else_clause.body);
                body.unify(other).unwrap_or_else(|| {
                    self.diagnostics.error(
                        MessageKey::IncompatibleBranchTypes,
                        &[body.name(), other.name()],
                        tree.span(id),
                    );
                    TypeSymbol::Object
                })
            }
            Expression::Let {
                parameters, bound, ..
            } => {
                let bound = self.type_of(*bound);
                if parameters.is_empty() {
                    bound
                } else {
                    TypeSymbol::Object
                }
            }
            Expression::MethodInvoke { arguments, .. } => {
                for argument in arguments {
                    self.type_of(argument.expression);
                }
                TypeSymbol::Object
            }
            Expression::Block { expressions } => {
                let mut last = TypeSymbol::Object;
                for expr in expressions {
                    last = self.type_of(*expr);
                }
                last
            }
        }
    }
}

/// Result of analyzing a whole tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    /// Type of the root expression.
    pub root_type: TypeSymbol,
    /// Inferred type of every node reachable from the root.
    pub types: HashMap<ExprId, TypeSymbol>,
}

impl AnalysisResult {
    /// Returns the inferred type of `id`, if it was reached.
    #[must_use]
    pub fn type_of(&self, id: ExprId) -> Option<TypeSymbol> {
        self.types.get(&id).copied()
    }
}

/// Infers types for every node reachable from the root of `tree`.
pub fn analyse(tree: &SyntaxTree, diagnostics: &mut DiagnosticsBag) -> AnalysisResult {
    let mut model = SemanticModel::new(tree, diagnostics);
    let root_type = model.type_of(tree.root());
    let types = model
        .types
        .iter()
        .filter_map(|(id, slot)| match slot {
            Slot::Done(symbol) => Some((*id, *symbol)),
            Slot::InProgress => None,
        })
        .collect();
    tracing::debug!(%root_type, nodes = model.analyzed_count(), "semantic analysis finished");
    AnalysisResult { root_type, types }
}
