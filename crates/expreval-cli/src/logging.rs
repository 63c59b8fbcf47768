// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Tracing setup.

use tracing_subscriber::EnvFilter;

/// Default filter for a `-v` count when `RUST_LOG` is unset.
#[must_use]
pub fn directive_for_verbosity(v: u8) -> &'static str {
    // Targets are crate module paths, so the core needs its own entry.
    match v {
        0 => "expreval_cli=warn,expreval_core=warn",
        1 => "expreval_cli=info,expreval_core=info",
        2 => "expreval_cli=debug,expreval_core=debug",
        _ => "expreval_cli=trace,expreval_core=trace",
    }
}

/// Installs a stderr subscriber, preferring `RUST_LOG` over `verbosity`.
pub fn init(verbosity: u8) {
    let default_directive = directive_for_verbosity(verbosity);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
