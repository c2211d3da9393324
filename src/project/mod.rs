//! Shared project state for an orchestration run.
//!
//! One [`ProjectState`] exists per run. It is owned by the coordinator and
//! read by every agent through prompt snapshots; mutation happens only
//! through the explicit update methods here (architecture update, plan
//! update, context update, task transitions), never through tool calls.
//! This is the single-writer critical section of the design: there are no
//! fine-grained locks, just ownership.

pub mod plan;
pub mod tree;

pub use plan::{Milestone, Plan, Task, TaskStatus};

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Mutable shared record for one run.
#[derive(Debug, Clone)]
pub struct ProjectState {
    workdir: PathBuf,
    project_name: String,
    objective: String,
    context: String,
    architecture: String,
    plan: Plan,
    tree_excludes: Vec<String>,
}

impl ProjectState {
    /// Create fresh state for an objective in the given workdir.
    ///
    /// The project name is derived from the workdir's file name.
    pub fn new(workdir: impl Into<PathBuf>, objective: impl Into<String>) -> Self {
        let workdir = workdir.into();
        let project_name = workdir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "project".to_string());
        Self {
            workdir,
            project_name,
            objective: objective.into(),
            context: String::new(),
            architecture: String::new(),
            plan: Plan::default(),
            tree_excludes: Vec::new(),
        }
    }

    /// Set the exclude globs used by the file-tree summary.
    pub fn with_tree_excludes(mut self, excludes: Vec<String>) -> Self {
        self.tree_excludes = excludes;
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// The immutable natural-language goal for the whole run.
    pub fn objective(&self) -> &str {
        &self.objective
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn architecture(&self) -> &str {
        &self.architecture
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Recompute the file-tree summary from disk.
    ///
    /// Lazy by design: the tree is walked on each call rather than cached,
    /// because executor tasks change the disk between snapshots.
    pub fn file_tree_summary(&self) -> Result<String> {
        tree::summarize(&self.workdir, &self.tree_excludes)
    }

    /// Replace the architecture artifact (explicit update step).
    pub fn update_architecture(&mut self, architecture: impl Into<String>) {
        self.architecture = architecture.into();
    }

    /// Replace the plan (explicit update step).
    pub fn update_plan(&mut self, plan: Plan) {
        self.plan = plan;
    }

    /// Replace the free-form context (explicit update step).
    pub fn update_context(&mut self, context: impl Into<String>) {
        self.context = context.into();
    }

    /// Mark the plan task matching `description` as delegated.
    pub fn mark_task_delegated(&mut self, description: &str) -> bool {
        self.plan.mark_delegated(description)
    }

    /// Record a completed task and its report.
    pub fn mark_task_completed(&mut self, description: &str, report: &str) -> bool {
        self.plan.mark_completed(description, report)
    }

    /// Record a failed task and the failure text.
    pub fn mark_task_failed(&mut self, description: &str, reason: &str) -> bool {
        self.plan.mark_failed(description, reason)
    }
}
