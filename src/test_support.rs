//! Shared helpers for unit tests.

use crate::agent::Generator;
use crate::error::{ForemanError, Result};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// A generator that replays canned outputs in order and records every
/// prompt it was asked for.
///
/// Outputs are truncated at stop sequences the same way the command
/// generator truncates, so scripts may include fabricated `AResult:` text
/// to exercise the dispatcher's stop handling.
pub(crate) struct ScriptedGenerator {
    outputs: RefCell<VecDeque<String>>,
    pub(crate) prompts: RefCell<Vec<String>>,
}

impl ScriptedGenerator {
    pub(crate) fn new(outputs: &[&str]) -> Self {
        Self {
            outputs: RefCell::new(outputs.iter().map(|s| s.to_string()).collect()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.outputs.borrow().len()
    }
}

impl Generator for ScriptedGenerator {
    fn generate(&self, prompt: &str, stop: &[&str]) -> Result<String> {
        self.prompts.borrow_mut().push(prompt.to_string());
        let next = self
            .outputs
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ForemanError::Generator("scripted generator exhausted".to_string()))?;
        Ok(crate::agent::generator::truncate_at_stop(next, stop))
    }
}

/// A tool that echoes its input back and records every invocation in a
/// shared log the test keeps a handle to.
pub(crate) struct EchoTool {
    calls: Rc<RefCell<Vec<String>>>,
}

impl EchoTool {
    pub(crate) fn new() -> (Self, Rc<RefCell<Vec<String>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                calls: Rc::clone(&calls),
            },
            calls,
        )
    }
}

impl crate::tools::Tool for EchoTool {
    fn name(&self) -> &str {
        "Echo"
    }

    fn description(&self) -> &str {
        "Echoes the input back."
    }

    fn invoke(&self, input: &str) -> String {
        self.calls.borrow_mut().push(input.to_string());
        format!("echo: {}", input)
    }
}
