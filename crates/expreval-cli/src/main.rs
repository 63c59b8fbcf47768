// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expreval command-line interface.
//!
//! This is the main entry point for the `expreval` command.

use camino::Utf8PathBuf;
use clap::{ArgAction, Args, Parser, Subcommand};
use expreval_cli::commands::{Input, eval, inspect, repl};
use expreval_cli::logging;
use expreval_core::compilation::CompileOptions;
use miette::Result;

/// Expreval: compile and run arithmetic expressions
#[derive(Debug, Parser)]
#[command(name = "expreval")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compile an expression and print its value
    Eval {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Parse and type-check without generating code
    Check {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Print the token stream
    Tokens {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print the syntax tree
    Ast {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Start an interactive prompt
    Repl {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Expression text
    #[arg(conflicts_with = "file")]
    expression: Option<String>,

    /// Read the program from a file instead
    #[arg(short, long, value_name = "PATH")]
    file: Option<Utf8PathBuf>,
}

impl SourceArgs {
    fn load(self) -> Result<Input> {
        Ok(Input::resolve(self.expression, self.file.as_deref())?)
    }
}

#[derive(Debug, Clone, Copy, Args)]
struct PipelineArgs {
    /// Skip type checking
    #[arg(long)]
    no_check: bool,

    /// Stop after the first stage that reports an error
    #[arg(long, env = "EXPREVAL_STRICT")]
    strict: bool,
}

impl From<PipelineArgs> for CompileOptions {
    fn from(args: PipelineArgs) -> Self {
        Self {
            check_types: !args.no_check,
            stop_on_errors: args.strict,
            ..Self::default()
        }
    }
}

fn main() -> Result<()> {
    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Eval { source, pipeline } => {
            let value = eval::evaluate(&source.load()?, &pipeline.into())?;
            println!("{value}");
        }
        Command::Check { source, pipeline } => {
            let input = source.load()?;
            let ty = eval::check(&input, &pipeline.into())?;
            println!("{}: {ty}", input.name);
        }
        Command::Tokens { source } => print!("{}", inspect::tokens(&source.load()?)),
        Command::Ast { source } => println!("{}", inspect::ast(&source.load()?)),
        Command::Repl { pipeline } => repl::run(&pipeline.into())?,
    }

    Ok(())
}
