// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Command-line front end for the expreval expression language.
//!
//! The `expreval` binary is a thin clap layer over [`commands`]; the pieces
//! live in this library so they can be tested without spawning a process.

pub mod commands;
pub mod diagnostic;
mod error;
pub mod logging;

pub use error::CliError;
