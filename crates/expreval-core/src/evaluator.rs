// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Direct interpretation of a syntax tree.
//!
//! Produces the same values as the code generator without building a
//! program, so it doubles as a reference for checking generated code.

use crate::ast::{ExprId, Expression, SyntaxTree, from_bool, integer_value, is_truthy, real_value};
use crate::source_analysis::Span;

/// Why a tree could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("{construct} cannot be evaluated ({span})")]
    Unsupported { construct: &'static str, span: Span },

    #[error("cannot evaluate an incomplete expression ({span})")]
    MissingExpression { span: Span },
}

/// Evaluates the expression `id` of `tree`.
///
/// Identifiers are zero, a parameterless `let` yields its bound value, and
/// both arms of `&&`/`||` are always evaluated.
///
/// # Errors
///
/// Returns [`EvalError::Unsupported`] for parameterized `let` and method
/// invocation, and [`EvalError::MissingExpression`] for recovery
/// placeholders.
///
/// ```
/// use expreval_core::evaluator::evaluate;
/// use expreval_core::source_analysis::{DiagnosticsBag, parse_expression};
///
/// let mut diagnostics = DiagnosticsBag::new();
/// let tree = parse_expression("2^3^2", &mut diagnostics);
/// assert_eq!(evaluate(&tree, tree.root()), Ok(512.0));
/// ```
pub fn evaluate(tree: &SyntaxTree, id: ExprId) -> Result<f64, EvalError> {
    stacker::maybe_grow(32 * 1024, 256 * 1024, || {
        Ok(match &tree[id] {
            Expression::IntegerLiteral { token } => integer_value(token),
            Expression::RealLiteral {
                number, fraction, ..
            } => real_value(number, fraction),
            Expression::BooleanLiteral { value, .. } => from_bool(*value),
            Expression::Identifier { .. } => 0.0,
            Expression::Parenthesized { inner, .. } => evaluate(tree, *inner)?,
            Expression::Unary {
                operator, operand, ..
            } => operator.apply(evaluate(tree, *operand)?),
            Expression::Binary {
                operator,
                left,
                right,
                ..
            } => {
                let left = evaluate(tree, *left)?;
                let right = evaluate(tree, *right)?;
                operator.apply(left, right)
            }
            Expression::IfThenElse {
                condition,
                body,
                else_clause,
                ..
            } => {
                if is_truthy(evaluate(tree, *condition)?) {
                    evaluate(tree, *body)?
                } else if let Some(else_clause) = else_clause {
                    evaluate(tree, else_clause.body)?
                } else {
                    0.0
                }
            }
            Expression::Let {
                parameters, bound, ..
            } => {
                if !parameters.is_empty() {
                    return Err(EvalError::Unsupported {
                        construct: "a let with parameters",
                        span: tree.span(id),
                    });
                }
                evaluate(tree, *bound)?
            }
            Expression::MethodInvoke { .. } => {
                return Err(EvalError::Unsupported {
                    construct: "a method invocation",
                    span: tree.span(id),
                });
            }
            Expression::Block { expressions } => {
                let mut value = 0.0;
                for expr in expressions {
                    value = evaluate(tree, *expr)?;
                }
                value
            }
            Expression::Missing { token } => {
                return Err(EvalError::MissingExpression { span: token.span() });
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::{DiagnosticsBag, parse_expression, parse_program};

    fn eval(source: &str) -> Result<f64, EvalError> {
        let mut diagnostics = DiagnosticsBag::new();
        let tree = parse_program(source, &mut diagnostics);
        evaluate(&tree, tree.root())
    }

    fn assert_evaluates_to(source: &str, expected: f64) {
        let actual = eval(source).unwrap_or_else(|error| panic!("{source}: {error}"));
        assert!(
            (actual - expected).abs() < 1e-9,
            "{source}: expected {expected}, got {actual}"
        );
    }

    #[test]
    fn arithmetic() {
        assert_evaluates_to("2+3*6", 20.0);
        assert_evaluates_to("(2+3)*2", 10.0);
        assert_evaluates_to("2^3^2", 512.0);
        assert_evaluates_to("10 % 4 / 4", 0.5);
        assert_evaluates_to("- -3", 3.0);
    }

    #[test]
    fn logic_and_conditionals() {
        assert_evaluates_to("not (1 < 2)", 0.0);
        assert_evaluates_to("1 != 2 && 3 >= 3", 1.0);
        assert_evaluates_to("if x then 1 else 2 end", 2.0);
        assert_evaluates_to("if 0.5 then 7", 7.0);
        assert_evaluates_to("if 0 then 7", 0.0);
    }

    #[test]
    fn let_and_blocks() {
        assert_evaluates_to("let x = 4; x + 1", 1.0);
        assert_evaluates_to("let x = 4", 4.0);
        assert_evaluates_to("", 0.0);
    }

    #[test]
    fn unsupported_constructs() {
        assert!(matches!(
            eval("let fib n = n"),
            Err(EvalError::Unsupported { .. })
        ));
        assert!(matches!(eval("fib(3)"), Err(EvalError::Unsupported { .. })));
        // Only the taken branch is evaluated.
        assert_evaluates_to("if 1 then 2 else f(1) end", 2.0);
    }

    #[test]
    fn missing_expression() {
        let mut diagnostics = DiagnosticsBag::new();
        let tree = parse_expression("2 *", &mut diagnostics);
        assert!(matches!(
            evaluate(&tree, tree.root()),
            Err(EvalError::MissingExpression { .. })
        ));
    }

    #[test]
    fn evaluates_subexpressions() {
        let mut diagnostics = DiagnosticsBag::new();
        let tree = parse_expression("(1 + 2) * 4", &mut diagnostics);
        let Expression::Binary { left, .. } = tree.root_expression() else {
            panic!("expected binary");
        };
        assert_eq!(evaluate(&tree, *left), Ok(3.0));
    }
}
