//! CLI argument parsing for foreman.
//!
//! Uses clap derive macros for declarative argument definitions. This
//! module defines the command structure; actual implementations are in
//! the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Foreman: hierarchical LLM agent orchestrator for software projects.
///
/// A coordinator agent drives a project towards an objective by having
/// architecture and plan artifacts drafted and reviewed, then delegating
/// plan tasks to executor sub-agents that modify the project files.
#[derive(Parser, Debug)]
#[command(name = "foreman")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for foreman.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the orchestrator towards an objective.
    ///
    /// Drafts architecture and plan, then loops delegating tasks until
    /// the coordinator reports a final result.
    Run(RunArgs),

    /// Print the project file-tree summary the agents see.
    Tree(TreeArgs),
}

/// Arguments for the `run` command.
#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// The objective to achieve, in natural language.
    pub objective: String,

    /// Project folder to work in (default: current directory).
    #[arg(short, long, default_value = ".")]
    pub workdir: PathBuf,

    /// Config file path (default: <workdir>/foreman.yaml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the `tree` command.
#[derive(clap::Args, Debug)]
pub struct TreeArgs {
    /// Project folder to summarize (default: current directory).
    #[arg(short, long, default_value = ".")]
    pub workdir: PathBuf,

    /// Config file path (default: <workdir>/foreman.yaml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        // Verifies the CLI arguments configuration is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn run_parses_objective_and_flags() {
        let cli = Cli::try_parse_from([
            "foreman",
            "run",
            "build a todo app",
            "--workdir",
            "/tmp/project",
        ])
        .unwrap();
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.objective, "build a todo app");
                assert_eq!(args.workdir, PathBuf::from("/tmp/project"));
                assert!(args.config.is_none());
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn tree_defaults_to_current_directory() {
        let cli = Cli::try_parse_from(["foreman", "tree"]).unwrap();
        match cli.command {
            Command::Tree(args) => assert_eq!(args.workdir, PathBuf::from(".")),
            other => panic!("expected tree, got {other:?}"),
        }
    }

    #[test]
    fn run_requires_an_objective() {
        assert!(Cli::try_parse_from(["foreman", "run"]).is_err());
    }
}
