//! Command implementations for foreman.
//!
//! Routes CLI commands to their implementations. The binary stays thin:
//! orchestration lives in the library modules, commands only wire them
//! together.

mod run;
mod tree;

use crate::cli::Command;
use crate::config::{CONFIG_FILE_NAME, Config};
use crate::error::{ForemanError, Result};
use std::path::{Path, PathBuf};

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Run(args) => run::cmd_run(args),
        Command::Tree(args) => tree::cmd_tree(args),
    }
}

/// Resolve and check the project folder.
fn require_workdir(workdir: &Path) -> Result<PathBuf> {
    if !workdir.is_dir() {
        return Err(ForemanError::UserError(format!(
            "project folder '{}' does not exist or is not a directory",
            workdir.display()
        )));
    }
    workdir.canonicalize().map_err(|e| {
        ForemanError::UserError(format!(
            "failed to resolve project folder '{}': {}",
            workdir.display(),
            e
        ))
    })
}

/// Load config from the explicit path or `<workdir>/foreman.yaml`.
///
/// With no explicit path and no file on disk, defaults are returned when
/// `required` is false; `run` needs a generator command and so requires
/// the file.
fn load_config(workdir: &Path, explicit: Option<PathBuf>, required: bool) -> Result<Config> {
    match explicit {
        Some(path) => Config::load(path),
        None => {
            let path = workdir.join(CONFIG_FILE_NAME);
            if path.is_file() {
                Config::load(path)
            } else if required {
                Err(ForemanError::UserError(format!(
                    "no config file found at '{}'\n\
                     Fix: create {} with at least a 'generator: {{ command: ... }}' entry.",
                    path.display(),
                    CONFIG_FILE_NAME
                )))
            } else {
                Ok(Config::default())
            }
        }
    }
}
