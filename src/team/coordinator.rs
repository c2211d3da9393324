//! The top-level coordinator loop.
//!
//! Runs the whole orchestration: gated architecture and plan drafting,
//! then a transcript loop whose allowed actions are the file tools plus
//! the `Subagent @Name` delegations. After every successful delegation the
//! architecture and plan are refreshed so later tasks see reality.

use crate::agent::Generator;
use crate::agent::runner::{ACTION_RESULT_STOP, final_payload, pending_action};
use crate::config::Config;
use crate::error::{ForemanError, Result};
use crate::events::{Event, EventAction, RunLog};
use crate::project::ProjectState;
use crate::prompt::{library, render_template};
use crate::team::delegate::{self, Delegator, SUBAGENT_PREFIX};
use crate::team::artifact;
use crate::tools::{ToolRegistry, file_tools};
use crate::transcript;
use serde_json::json;

pub struct Coordinator<'a> {
    generator: &'a dyn Generator,
    config: &'a Config,
    log: RunLog,
}

impl<'a> Coordinator<'a> {
    pub fn new(generator: &'a dyn Generator, config: &'a Config, log: RunLog) -> Self {
        Self {
            generator,
            config,
            log,
        }
    }

    /// Drive the project to its objective. Returns the coordinator's final
    /// result text.
    ///
    /// Exhausting the coordinator's own turn budget is a run failure, unlike
    /// a sub-agent's exhaustion, which is recorded and worked around.
    pub fn run(&self, state: &mut ProjectState) -> Result<String> {
        self.log.append(
            &Event::new(EventAction::RunStart)
                .with_details(json!({"objective": state.objective()})),
        )?;

        let outcome = self.run_inner(state);

        self.log.append(
            &Event::new(EventAction::RunComplete)
                .with_details(json!({"success": outcome.is_ok()})),
        )?;

        outcome
    }

    fn run_inner(&self, state: &mut ProjectState) -> Result<String> {
        self.ensure_artifacts(state)?;

        let roster = delegate::roster(&self.config.executors);
        let delegator = Delegator::new(self.generator, self.config, &self.log);
        let mut scratchpad = String::new();

        for _ in 0..self.config.max_turns {
            let mut registry = ToolRegistry::new();
            for tool in file_tools(state.workdir()) {
                registry.register(tool);
            }
            let mut allowed = registry.names();
            allowed.extend(delegate::action_names(&self.config.executors));

            let mut variables = super::base_vars(state)?;
            variables.insert("tools".to_string(), registry.catalog());
            variables.insert("tool_names".to_string(), allowed.join(", "));
            variables.insert("subagents".to_string(), roster.clone());
            variables.insert("scratchpad".to_string(), scratchpad.clone());
            let prompt = render_template(&library::coordinator(), &variables)?;

            let raw = self.generator.generate(&prompt, &[ACTION_RESULT_STOP])?;

            let observation = match transcript::parse(&raw, &allowed) {
                Ok(events) => {
                    if let Some(payload) = final_payload(&events) {
                        return Ok(payload);
                    }
                    match pending_action(&events) {
                        Some((name, input)) => {
                            if let Some(subagent) = name.strip_prefix(SUBAGENT_PREFIX) {
                                self.delegate_task(state, &delegator, subagent, input)?
                            } else {
                                registry.dispatch(name, input).unwrap_or_else(|| {
                                    format!("Error: no action named '{}' is available.", name)
                                })
                            }
                        }
                        None => "Error: respond with an Action and Action Input, \
                                 or a Final Result."
                            .to_string(),
                    }
                }
                Err(err) => err.correction_note(),
            };

            scratchpad.push_str(raw.trim());
            scratchpad.push('\n');
            scratchpad.push_str("AResult: ");
            scratchpad.push_str(observation.trim_end());
            scratchpad.push('\n');
        }

        Err(ForemanError::LoopExhausted {
            turns: self.config.max_turns,
        })
    }

    /// Draft missing artifacts through the review gate before the first
    /// coordinator turn.
    fn ensure_artifacts(&self, state: &mut ProjectState) -> Result<()> {
        if state.architecture().trim().is_empty() {
            let architecture = artifact::draft_architecture(
                self.generator,
                state,
                self.config.review_retries,
                &self.log,
            )?;
            state.update_architecture(architecture);
            self.state_update(state, "architecture")?;
        }

        if state.plan().is_empty() {
            let roster = delegate::roster(&self.config.executors);
            let (plan, context) = artifact::draft_plan(
                self.generator,
                state,
                &roster,
                self.config.review_retries,
                &self.log,
            )?;
            state.update_plan(plan);
            state.update_context(context);
            self.state_update(state, "plan")?;
        }

        Ok(())
    }

    /// Run one delegation end to end: plan bookkeeping, the sub-agent run,
    /// and the post-task artifact refresh.
    fn delegate_task(
        &self,
        state: &mut ProjectState,
        delegator: &Delegator<'_>,
        subagent: &str,
        task: &str,
    ) -> Result<String> {
        let Some(profile) = self
            .config
            .executors
            .iter()
            .find(|e| e.name == subagent)
        else {
            // Parsing validates against the roster, so this only happens
            // with an out-of-date allowed list.
            return Ok(format!("Error: no sub-agent named '{}'.", subagent));
        };

        state.mark_task_delegated(task);
        let report = delegator.delegate(state, profile, task)?;

        if report.success {
            state.mark_task_completed(task, &report.text);
            self.log.append(&Event::new(EventAction::TaskComplete).with_task(task))?;

            let architecture =
                artifact::refresh_architecture(self.generator, state, &report.text, &self.log)?;
            state.update_architecture(architecture);
            self.state_update(state, "architecture")?;

            let (plan, context) =
                artifact::refresh_plan(self.generator, state, &report.text, &self.log)?;
            state.update_plan(plan);
            state.update_context(context);
            self.state_update(state, "plan")?;
        } else {
            state.mark_task_failed(task, &report.text);
            self.log.append(&Event::new(EventAction::TaskFailed).with_task(task))?;
        }

        Ok(report.observation())
    }

    fn state_update(&self, state: &ProjectState, artifact: &str) -> Result<()> {
        let pending = state.plan().count(crate::project::TaskStatus::Pending);
        self.log.append(
            &Event::new(EventAction::StateUpdate)
                .with_details(json!({"artifact": artifact, "pending_tasks": pending})),
        )
    }
}
