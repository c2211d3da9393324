//! Delegation and evaluation engine.
//!
//! The team is a small hierarchy of roles sharing one [`ProjectState`]:
//! the Coordinator runs the top-level transcript loop and delegates tasks
//! with `Subagent @Name` actions; the Architect and Planner produce the
//! architecture and plan artifacts through a review gate; Executors carry
//! out single tasks with the file tools. Only final results cross role
//! boundaries; no transcript ever leaks into another agent's prompt.

pub mod artifact;
pub mod coordinator;
pub mod delegate;
pub mod review;

#[cfg(test)]
mod tests;

pub use coordinator::Coordinator;
pub use delegate::{Delegator, Report, SUBAGENT_PREFIX};
pub use review::{Gated, Rejection, Verdict, gate, parse_verdict};

use crate::error::Result;
use crate::project::ProjectState;
use crate::prompt::vars;
use std::collections::HashMap;

/// The variable map every role prompt starts from: a snapshot of the
/// project state plus the on-disk file tree.
pub(crate) fn base_vars(state: &ProjectState) -> Result<HashMap<String, String>> {
    let summary = state.file_tree_summary()?;
    let plan = state.plan().render();
    Ok(vars([
        ("project_name", state.project_name()),
        ("objective", state.objective()),
        ("project_summary", summary.as_str()),
        ("state", state.context()),
        ("architecture", state.architecture()),
        ("plan", plan.as_str()),
    ]))
}
