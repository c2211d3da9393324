//! Foreman: hierarchical LLM agent orchestrator for software projects.
//!
//! This is the main entry point for the `foreman` CLI. It parses
//! arguments, dispatches to the appropriate command handler, and handles
//! errors with proper exit codes.

mod cli;
mod commands;
pub mod agent;
pub mod config;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod patch;
pub mod project;
pub mod prompt;
pub mod team;
pub mod tools;
pub mod transcript;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
