//! Configuration model for foreman.
//!
//! Represents `foreman.yaml` in the project folder. Unknown fields are
//! ignored for forward compatibility; every field has a sensible default so
//! a config file is optional apart from the generator command.

use crate::error::{ForemanError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up inside the project folder.
pub const CONFIG_FILE_NAME: &str = "foreman.yaml";

/// Configuration for a foreman run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The external generator command.
    pub generator: GeneratorConfig,

    /// Turn budget per agent loop (coordinator and each executor).
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,

    /// Evaluation retries per artifact before degrading to the last draft.
    #[serde(default = "default_review_retries")]
    pub review_retries: u32,

    /// Glob patterns excluded from the project file-tree summary, on top
    /// of the built-in `.git` and `.foreman` exclusions.
    #[serde(default)]
    pub tree_excludes: Vec<String>,

    /// Executor roster the coordinator may delegate to.
    #[serde(default = "default_executors")]
    pub executors: Vec<ExecutorProfile>,
}

/// The command-line generator backing every agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Command executed per generation; the prompt arrives on stdin and
    /// the continuation is read from stdout. Shell-words quoting applies.
    pub command: String,

    /// Seconds before a generation is killed.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            command: String::new(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// One named executor the coordinator can address with `Subagent @Name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorProfile {
    /// Name the coordinator writes after `Subagent @`.
    pub name: String,

    /// Short specialty blurb interpolated into the coordinator prompt and
    /// into the executor's own prompt when a task is delegated to it.
    pub specialty: String,
}

impl Default for ExecutorProfile {
    fn default() -> Self {
        Self {
            name: "Executor".to_string(),
            specialty: "implements tasks by reading, writing, and patching project files"
                .to_string(),
        }
    }
}

// Default value functions for serde
fn default_max_turns() -> u32 {
    30
}
fn default_review_retries() -> u32 {
    2
}
fn default_timeout_seconds() -> u64 {
    600
}
fn default_executors() -> Vec<ExecutorProfile> {
    vec![ExecutorProfile::default()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            max_turns: default_max_turns(),
            review_retries: default_review_retries(),
            tree_excludes: Vec::new(),
            executors: default_executors(),
        }
    }
}

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward
    /// compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            ForemanError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| ForemanError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate config values.
    ///
    /// Rules:
    /// - `generator.command` must be non-empty
    /// - `generator.timeout_seconds` must be positive
    /// - `max_turns` must be positive
    /// - at least one executor, with unique non-empty names and no
    ///   whitespace in names (they appear after `Subagent @` on one line)
    pub fn validate(&self) -> Result<()> {
        if self.generator.command.trim().is_empty() {
            return Err(ForemanError::UserError(
                "config validation failed: generator.command must be set\n\
                 Fix: add a 'generator: { command: ... }' entry to foreman.yaml."
                    .to_string(),
            ));
        }

        if self.generator.timeout_seconds == 0 {
            return Err(ForemanError::UserError(
                "config validation failed: generator.timeout_seconds must be greater than 0"
                    .to_string(),
            ));
        }

        if self.max_turns == 0 {
            return Err(ForemanError::UserError(
                "config validation failed: max_turns must be greater than 0".to_string(),
            ));
        }

        if self.executors.is_empty() {
            return Err(ForemanError::UserError(
                "config validation failed: at least one executor must be configured".to_string(),
            ));
        }

        let mut seen = Vec::new();
        for executor in &self.executors {
            let name = executor.name.trim();
            if name.is_empty() {
                return Err(ForemanError::UserError(
                    "config validation failed: executor names must be non-empty".to_string(),
                ));
            }
            if name.chars().any(char::is_whitespace) {
                return Err(ForemanError::UserError(format!(
                    "config validation failed: executor name '{}' must not contain whitespace",
                    name
                )));
            }
            if seen.contains(&name) {
                return Err(ForemanError::UserError(format!(
                    "config validation failed: duplicate executor name '{}'",
                    name
                )));
            }
            seen.push(name);
        }

        Ok(())
    }
}
