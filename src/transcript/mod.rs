//! Transcript protocol model for foreman.
//!
//! A generation call returns free-form text. Agents are prompted to shape
//! that text as a line-prefixed protocol:
//!
//! ```text
//! Thought: <reasoning>
//! Action: <capability name>
//! Action Input: <payload>
//! AResult: <filled in by the dispatcher, never by the model>
//! ...
//! Final Result: <terminal payload>
//! ```
//!
//! This module converts one raw generation into an ordered sequence of
//! [`ProtocolEvent`]s, or a [`ParseError`] naming the violated invariant.
//! Parse errors are correctable conditions: the agent loop re-prompts with
//! a corrective note instead of failing the run.

mod parser;


pub use parser::parse;

use thiserror::Error;

/// One typed event extracted from a raw transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolEvent {
    /// Free-form reasoning. Leading text before any marker is folded in here.
    Thought(String),
    /// A request to invoke a capability (tool or sub-agent) with a payload.
    Action { name: String, input: String },
    /// A result the dispatcher folded back into the scratchpad.
    ///
    /// Models are stopped at the `AResult:` marker, so this normally only
    /// appears when re-parsing dispatcher-amended text; a model-fabricated
    /// result after a completed action is tolerated and ignored by the loop.
    ActionResult(String),
    /// The terminal payload; nothing after it is parsed.
    FinalResult(String),
}

/// A transcript protocol violation.
///
/// Every variant is correctable: the agent loop appends
/// [`ParseError::correction_note`] to the scratchpad and re-prompts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `AResult:` appeared after a bare `Thought:` with no intervening
    /// action. The model hallucinated a tool result.
    #[error("malformed transcript: 'AResult:' after a bare 'Thought:' (no action was taken)")]
    ResultWithoutAction,

    /// `Action Input:` appeared with no open `Action:` before it.
    #[error("malformed transcript: 'Action Input:' without a preceding 'Action:'")]
    InputWithoutAction,

    /// An `Action:` was not followed by its `Action Input:`.
    #[error("malformed transcript: 'Action: {name}' is missing its 'Action Input:'")]
    MissingActionInput { name: String },

    /// The generation contained neither an action nor a final result.
    #[error("malformed transcript: neither an 'Action:' nor a 'Final Result:' was produced")]
    MissingAction,

    /// The action name is not a currently allowed capability.
    #[error("unknown action '{name}', expected one of: {allowed}")]
    UnknownAction { name: String, allowed: String },
}

impl ParseError {
    /// A corrective note the loop injects into the scratchpad before the
    /// next generation. Phrased as an observation the model can react to.
    pub fn correction_note(&self) -> String {
        match self {
            ParseError::ResultWithoutAction => {
                "Your output was invalid: 'AResult:' may only follow 'Action Input:'. \
                 Never write 'AResult:' yourself; take an action and wait for its result."
                    .to_string()
            }
            ParseError::InputWithoutAction => {
                "Your output was invalid: 'Action Input:' must be preceded by 'Action:'.".to_string()
            }
            ParseError::MissingActionInput { name } => format!(
                "Your output was invalid: 'Action: {}' must be followed by exactly one 'Action Input:'.",
                name
            ),
            ParseError::MissingAction => {
                "Your output was invalid: produce either an 'Action:' with its 'Action Input:' \
                 or a 'Final Result:'. Never stop at a bare 'Thought:'."
                    .to_string()
            }
            ParseError::UnknownAction { name, allowed } => format!(
                "Unknown action '{}'. The only available actions are: {}.",
                name, allowed
            ),
        }
    }
}
