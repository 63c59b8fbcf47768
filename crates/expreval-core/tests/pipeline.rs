// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! End-to-end tests through the public pipeline.

use expreval_core::ast::Expression;
use expreval_core::codegen::Generator;
use expreval_core::compilation::{CompileOptions, compile};
use expreval_core::evaluator::evaluate;
use expreval_core::semantic_analysis::TypeSymbol;
use expreval_core::source_analysis::{DiagnosticsBag, Severity, parse_expression, parse_program};
use proptest::prelude::*;

fn value_of(source: &str) -> f64 {
    let compilation = compile(source, &CompileOptions::default());
    assert!(
        compilation.diagnostics.is_empty(),
        "{source}: {}",
        compilation.diagnostics
    );
    compilation
        .value()
        .unwrap_or_else(|| panic!("{source}: {:?}", compilation.codegen_error))
}

fn assert_value(source: &str, expected: f64) {
    let actual = value_of(source);
    assert!(
        (actual - expected).abs() < 1e-9,
        "{source}: expected {expected}, got {actual}"
    );
}

#[test]
fn evaluation_examples() {
    assert_value("2+3*6", 20.0);
    assert_value("(2+3)*2", 10.0);
    assert_value("2^3^2", 512.0);
    assert_value("x * 100 + 1", 1.0);
}

#[test]
fn multiline_program_layout() {
    let source = "let a = 3\nlet b = 4.5\r\n\t(a + b) * 2\n";
    let compilation = compile(source, &CompileOptions::default());
    assert!(compilation.diagnostics.is_empty());
    assert_eq!(compilation.root_type, Some(TypeSymbol::Int));
    // Identifiers are not bound by `let`.
    assert_eq!(compilation.value(), Some(0.0));
}

#[test]
fn conditional_types() {
    let types = [
        ("if true then 1 else 2 end", TypeSymbol::Int, 0),
        ("if true then 1 else 2.0 end", TypeSymbol::Double, 0),
        ("if true then 1 else false end", TypeSymbol::Object, 1),
        ("if true then 1 < 2 else 3 end", TypeSymbol::Int, 0),
    ];
    for (source, expected, errors) in types {
        let compilation = compile(source, &CompileOptions::default());
        assert_eq!(compilation.root_type, Some(expected), "{source}");
        assert_eq!(compilation.diagnostics.error_count(), errors, "{source}");
    }
}

#[test]
fn unclosed_parenthesis_recovers() {
    let mut diagnostics = DiagnosticsBag::new();
    let tree = parse_expression("(2+3", &mut diagnostics);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.as_slice()[0].severity, Severity::Error);
    assert!(matches!(
        tree.root_expression(),
        Expression::Parenthesized { .. }
    ));
}

#[test]
fn trailing_comma_is_diagnosed() {
    let compilation = compile("max(1, 2,)", &CompileOptions::default());
    let rendered: Vec<_> = compilation
        .diagnostics
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(rendered, ["Error: Unexpected ',' before ')' (1:9)"]);
}

#[test]
fn invalid_characters_are_reported_once_each() {
    let compilation = compile("1 $ 2 @", &CompileOptions::default());
    let messages: Vec<_> = compilation
        .diagnostics
        .iter()
        .map(|d| d.message.to_string())
        .collect();
    assert_eq!(messages, ["Invalid token '$'", "Invalid token '@'"]);
}

#[test]
fn recursive_definition_parses_but_does_not_compile() {
    let source = "let fib n = if n <= 2 then 1 else fib(n - 1) + fib(n - 2) end\nfib(10)";
    let compilation = compile(source, &CompileOptions::default());
    assert!(compilation.diagnostics.is_empty());
    let Expression::Block { expressions } = compilation.tree.root_expression() else {
        panic!("program root is a block");
    };
    assert_eq!(expressions.len(), 2);
    assert!(compilation.codegen_error.is_some());
}

// ============================================================================
// Codegen agrees with the evaluator
// ============================================================================

fn leaf() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..100).prop_map(|n| n.to_string()),
        (0u32..100, 0u32..100).prop_map(|(a, b)| format!("{a}.{b}")),
        Just("true".to_string()),
        Just("false".to_string()),
        Just("x".to_string()),
    ]
}

fn expression() -> impl Strategy<Value = String> {
    const OPERATORS: &[&str] = &[
        "+", "-", "*", "/", "%", "^", "==", "!=", "<", "<=", ">", ">=", "&&", "||",
    ];
    leaf().prop_recursive(6, 64, 3, |inner| {
        prop_oneof![
            (inner.clone(), prop::sample::select(OPERATORS), inner.clone())
                .prop_map(|(l, op, r)| format!("{l} {op} {r}")),
            inner.clone().prop_map(|e| format!("({e})")),
            inner.clone().prop_map(|e| format!("-{e}")),
            inner.clone().prop_map(|e| format!("not {e}")),
            (inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(c, b, e)| format!("if {c} then {b} else {e} end")),
            (inner.clone(), inner.clone()).prop_map(|(c, b)| format!("if {c} then {b} end")),
            inner.prop_map(|e| format!("let v = {e}")),
        ]
    })
}

fn same_value(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a.to_bits() == b.to_bits() || a == b
}

proptest! {
    #[test]
    fn codegen_agrees_with_evaluator(source in expression()) {
        let mut diagnostics = DiagnosticsBag::new();
        let tree = parse_program(&source, &mut diagnostics);
        let evaluated = evaluate(&tree, tree.root());
        if let Ok(function) = Generator::generate(&tree, tree.root()) {
            let expected = evaluated.expect("evaluator accepts what codegen accepts");
            let actual = function.call();
            prop_assert!(
                same_value(actual, expected),
                "{:?}: generated {} but evaluated {}", source, actual, expected
            );
        }
    }

    #[test]
    fn pipeline_never_panics(source in "\\PC{0,200}") {
        let compilation = compile(&source, &CompileOptions::default());
        let _ = compilation.value();
    }
}
