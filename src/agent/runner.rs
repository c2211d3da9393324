//! The agent turn loop.
//!
//! Drives a generator through the Thought/Action/AResult protocol: each
//! turn the accumulated transcript is appended to the base prompt, the
//! generator produces a continuation, and the loop either dispatches the
//! requested tool or returns the final result. Malformed continuations are
//! answered in-band with a correction note so the agent can recover.

use crate::agent::generator::Generator;
use crate::error::{ForemanError, Result};
use crate::tools::ToolRegistry;
use crate::transcript::{self, ProtocolEvent};

/// Stop sequence for every generation: the dispatcher writes `AResult:`
/// lines, the model must never fabricate them.
pub const ACTION_RESULT_STOP: &str = "AResult:";

pub struct AgentLoop<'a> {
    generator: &'a dyn Generator,
    tools: &'a ToolRegistry,
    max_turns: u32,
}

impl<'a> AgentLoop<'a> {
    pub fn new(generator: &'a dyn Generator, tools: &'a ToolRegistry, max_turns: u32) -> Self {
        Self {
            generator,
            tools,
            max_turns,
        }
    }

    /// Run the loop until the agent emits `Final Result:` or the turn
    /// budget is exhausted.
    ///
    /// Tool failures and protocol violations never abort the loop; they are
    /// fed back as `AResult:` observations. Only generator failures and an
    /// exhausted budget surface as errors.
    pub fn run(&self, base_prompt: &str) -> Result<String> {
        let allowed = self.tools.names();
        let mut scratchpad = String::new();

        for _ in 0..self.max_turns {
            let prompt = if scratchpad.is_empty() {
                base_prompt.to_string()
            } else {
                format!("{}\n{}", base_prompt, scratchpad)
            };

            let raw = self.generator.generate(&prompt, &[ACTION_RESULT_STOP])?;

            let observation = match transcript::parse(&raw, &allowed) {
                Ok(events) => {
                    if let Some(payload) = final_payload(&events) {
                        return Ok(payload);
                    }
                    match pending_action(&events) {
                        Some((name, input)) => self.tools.dispatch(name, input).unwrap_or_else(
                            || format!("Error: no action named '{}' is available.", name),
                        ),
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
            turns: self.max_turns,
        })
    }
}

/// The final result, if the continuation contains one. Checked before any
/// action so a turn that emits both ends the loop.
pub fn final_payload(events: &[ProtocolEvent]) -> Option<String> {
    events.iter().find_map(|e| match e {
        ProtocolEvent::FinalResult(payload) => Some(payload.clone()),
        _ => None,
    })
}

/// The last action awaiting a result. Stop sequences keep fabricated
/// `AResult:` lines out of continuations, so at most one action is pending.
pub fn pending_action(events: &[ProtocolEvent]) -> Option<(&str, &str)> {
    events.iter().rev().find_map(|e| match e {
        ProtocolEvent::Action { name, input } => Some((name.as_str(), input.as_str())),
        _ => None,
    })
}
