//! Task delegation to executor sub-agents.
//!
//! The coordinator addresses an executor with an action named
//! `Subagent @Name`; the action input is the task description. The
//! executor runs its own loop over the file tools and only its final
//! result crosses back as a [`Report`]. An executor that runs out of
//! turns produces a failed report, never an error.

use crate::agent::{AgentLoop, Generator};
use crate::config::{Config, ExecutorProfile};
use crate::error::{ForemanError, Result};
use crate::events::{Event, EventAction, RunLog};
use crate::project::ProjectState;
use crate::prompt::{library, render_template};
use crate::tools::{ToolRegistry, file_tools};
use serde_json::json;

/// Delegation actions are `Subagent @<executor name>`.
pub const SUBAGENT_PREFIX: &str = "Subagent @";

/// What a sub-agent run produced, as seen by the coordinator.
#[derive(Debug, Clone)]
pub struct Report {
    pub subagent: String,
    pub task: String,
    pub success: bool,
    pub text: String,
}

impl Report {
    /// The observation fed back into the coordinator's scratchpad.
    pub fn observation(&self) -> String {
        if self.success {
            self.text.clone()
        } else {
            format!("The task failed. {}", self.text)
        }
    }
}

/// The roster rendered into coordinator and planner prompts.
pub fn roster(executors: &[ExecutorProfile]) -> String {
    executors
        .iter()
        .map(|e| format!("{}{}: {}", SUBAGENT_PREFIX, e.name, e.specialty))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The delegation action names, one per executor.
pub fn action_names(executors: &[ExecutorProfile]) -> Vec<String> {
    executors
        .iter()
        .map(|e| format!("{}{}", SUBAGENT_PREFIX, e.name))
        .collect()
}

/// Runs executor sub-agents against the shared project state.
pub struct Delegator<'a> {
    generator: &'a dyn Generator,
    config: &'a Config,
    log: &'a RunLog,
}

impl<'a> Delegator<'a> {
    pub fn new(generator: &'a dyn Generator, config: &'a Config, log: &'a RunLog) -> Self {
        Self {
            generator,
            config,
            log,
        }
    }

    /// Run one task on one executor.
    ///
    /// The executor sees a state snapshot and its single task; nothing of
    /// the coordinator's transcript. `LoopExhausted` becomes a failed
    /// report; only generator and template failures propagate as errors.
    pub fn delegate(
        &self,
        state: &ProjectState,
        profile: &ExecutorProfile,
        task: &str,
    ) -> Result<Report> {
        let milestone = state
            .plan()
            .milestone_of(task)
            .unwrap_or("the current objective")
            .to_string();

        let mut registry = ToolRegistry::new();
        for tool in file_tools(state.workdir()) {
            registry.register(tool);
        }

        let mut variables = super::base_vars(state)?;
        variables.insert("task".to_string(), task.to_string());
        variables.insert("milestone".to_string(), milestone);
        variables.insert("specialty".to_string(), profile.specialty.clone());
        variables.insert("tools".to_string(), registry.catalog());
        variables.insert("tool_names".to_string(), registry.names().join(", "));
        variables.insert("scratchpad".to_string(), String::new());
        let prompt = render_template(&library::executor(), &variables)?;

        self.log.append(
            &Event::new(EventAction::Delegate)
                .with_task(task)
                .with_details(json!({"subagent": profile.name})),
        )?;

        let agent = AgentLoop::new(self.generator, &registry, self.config.max_turns);
        let report = match agent.run(&prompt) {
            Ok(text) => Report {
                subagent: profile.name.clone(),
                task: task.to_string(),
                success: true,
                text,
            },
            Err(ForemanError::LoopExhausted { turns }) => Report {
                subagent: profile.name.clone(),
                task: task.to_string(),
                success: false,
                text: format!(
                    "The sub-agent used all {} turns without reaching a final result.",
                    turns
                ),
            },
            Err(other) => return Err(other),
        };

        self.log.append(
            &Event::new(EventAction::Report)
                .with_task(report.task.as_str())
                .with_details(json!({"subagent": report.subagent, "success": report.success})),
        )?;

        Ok(report)
    }
}
