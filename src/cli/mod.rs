//! CLI modules for the medex binary.
//!
//! Argument structures live in [`parser`]; each subcommand's implementation
//! lives under [`commands`] so it can be tested without spawning the binary.

pub mod commands;
pub mod parser;

use std::process::ExitCode;

use self::parser::{Cli, Commands};

/// Dispatch a parsed CLI invocation.
#[must_use]
pub fn dispatch(cli: &Cli) -> ExitCode {
    let result = match &cli.command {
        Commands::Score(args) => commands::score::run(args).map(|()| ExitCode::SUCCESS),
        Commands::Run(args) => commands::run::run(args).map(|()| ExitCode::SUCCESS),
        Commands::Validate(args) => commands::validate::run(args).map(|clean| {
            if clean {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }),
    };
    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
