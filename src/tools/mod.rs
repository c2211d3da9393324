//! Tool capabilities and dispatch for foreman.
//!
//! A tool is a named capability an agent can request through an `Action:` /
//! `Action Input:` pair. Tools never raise: every failure is returned as
//! result text (a `PathError`/`IOError`/conflict message) so the calling
//! agent can read it in its scratchpad and react in-band.
//!
//! Unknown action names are not handled here; the agent loop rejects them
//! during transcript parsing, before dispatch.

mod file_ops;


pub use file_ops::{PatchFile, ReadFile, WriteFile, file_tools};

/// One capability an agent can invoke by name.
pub trait Tool {
    /// Exact name the model must write after `Action:`.
    fn name(&self) -> &str;

    /// One-paragraph usage description interpolated into prompts.
    fn description(&self) -> &str;

    /// Invoke the tool. Errors come back as result text, never as Err.
    fn invoke(&self, input: &str) -> String;
}

/// A registry of tools, dispatched by exact name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. Later registrations with a duplicate name are ignored;
    /// the first registration wins.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        if !self.tools.iter().any(|t| t.name() == tool.name()) {
            self.tools.push(tool);
        }
    }

    /// Exact-name lookup and invocation.
    ///
    /// Returns `None` for names this registry does not know, which the
    /// caller (the agent loop or coordinator) treats as its own concern.
    pub fn dispatch(&self, name: &str, input: &str) -> Option<String> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.invoke(input))
    }

    /// The registered tool names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    /// Render the tool catalog for prompt interpolation.
    pub fn catalog(&self) -> String {
        self.tools
            .iter()
            .map(|t| format!("{}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
