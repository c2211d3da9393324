//! Run log subsystem for foreman.
//!
//! Every orchestration run appends events to an NDJSON log (one JSON object
//! per line) under `<workdir>/.foreman/events.ndjson`. The log is the audit
//! trail for a run: which artifacts were drafted, which reviews rejected
//! them, which tasks were delegated and how they ended.
//!
//! # Event Format
//!
//! Each event is a JSON object with the following fields:
//! - `ts`: RFC3339 timestamp
//! - `action`: the action performed (run_start, delegate, task_failed, ...)
//! - `actor`: the owner string (e.g., `user@HOST`)
//! - `task`: optional task description for task-specific events
//! - `details`: freeform object with action-specific details

use crate::error::{ForemanError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Actions that can be logged as run events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// A run started with an objective.
    RunStart,
    /// A run finished (successfully or not).
    RunComplete,
    /// A task was delegated to a sub-agent.
    Delegate,
    /// A sub-agent returned a report.
    Report,
    /// An artifact draft was produced (architecture or plan).
    Draft,
    /// A reviewer accepted an artifact.
    EvaluateAccept,
    /// A reviewer rejected an artifact with feedback.
    EvaluateReject,
    /// A plan task completed.
    TaskComplete,
    /// A plan task failed.
    TaskFailed,
    /// Shared project state was updated (architecture, plan, context).
    StateUpdate,
}

/// An event record for the run log.
///
/// Events are serialized as single-line JSON objects and appended to
/// the events.ndjson file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// The actor who performed the action (e.g., `user@HOST`).
    pub actor: String,

    /// Optional task description for task-specific events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event with the given action.
    ///
    /// The timestamp is set to the current time, and the actor is
    /// determined from the environment (USER@HOSTNAME).
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            task: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the task description for this event.
    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            ForemanError::UserError(format!("failed to serialize event to JSON: {}", e))
        })
    }
}

/// Get the actor string for event metadata.
fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append-only handle on a run's event log.
///
/// Cloning is cheap; the file is opened per append so concurrent readers
/// (e.g. `tail -f`) always see complete lines.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    /// Create a run log rooted at the given project workdir.
    ///
    /// The log file lives at `<workdir>/.foreman/events.ndjson`.
    pub fn for_workdir(workdir: &Path) -> Self {
        Self {
            path: workdir.join(".foreman").join("events.ndjson"),
        }
    }

    /// Path to the underlying NDJSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an event to the log.
    ///
    /// The parent directory is created on first use. Each append results in
    /// one line with a trailing newline, synced to disk.
    pub fn append(&self, event: &Event) -> Result<()> {
        let json_line = event.to_ndjson_line()?;

        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                ForemanError::UserError(format!(
                    "failed to create run log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                ForemanError::UserError(format!(
                    "failed to open run log '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;

        writeln!(file, "{}", json_line).map_err(|e| {
            ForemanError::UserError(format!(
                "failed to write event to '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        file.sync_all().map_err(|e| {
            ForemanError::UserError(format!(
                "failed to sync run log '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }
}
