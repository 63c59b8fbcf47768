// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for pipeline crash safety.
//!
//! Feeds arbitrary UTF-8 through lexing, parsing, type inference and code
//! generation. Any panic is a bug; diagnostics and codegen errors are not.
//! Whenever a function is produced it is run and compared with the
//! tree-walking evaluator.

#![no_main]

use expreval_core::compilation::{CompileOptions, compile};
use expreval_core::evaluator::evaluate;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Invalid UTF-8 is rejected before lexing and is not interesting here
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };

    let compilation = compile(source, &CompileOptions::default());
    let Some(function) = &compilation.function else {
        return;
    };

    let generated = function.call();
    let evaluated = evaluate(&compilation.tree, compilation.tree.root())
        .expect("evaluator accepts every program the generator accepts");
    assert!(
        generated.to_bits() == evaluated.to_bits() || (generated.is_nan() && evaluated.is_nan()),
        "generated {generated} but evaluated {evaluated} for {source:?}"
    );
});
