//! Error types for foreman.
//!
//! Uses thiserror for derive macros. The taxonomy distinguishes errors that
//! are correctable inside an agent loop (malformed transcripts, unknown
//! actions) from errors that end a run. Tool-level failures are never
//! represented here: tools return their errors in-band as result text so the
//! delegating agent can read and react to them.

use crate::exit_codes;
use crate::prompt::TemplateError;
use thiserror::Error;

/// Main error type for foreman operations.
///
/// Each variant maps to an exit code for the CLI. Parse and patch errors
/// never appear here: the agent loop turns protocol violations into
/// corrective re-prompts, and the file tools report patch failures as
/// in-band result text.
#[derive(Error, Debug)]
pub enum ForemanError {
    /// User provided invalid arguments, config, or workspace state.
    #[error("{0}")]
    UserError(String),

    /// A prompt template referenced an undefined variable or had bad syntax.
    #[error("prompt template error: {0}")]
    Template(#[from] TemplateError),

    /// The external generation capability failed (spawn, timeout, I/O).
    #[error("generation failed: {0}")]
    Generator(String),

    /// An agent loop ran out of turns without producing a Final Result.
    ///
    /// Callers treat this as task failure, not a crash: the delegation
    /// engine converts it into a failed Report.
    #[error("agent loop exhausted after {turns} turns without a Final Result")]
    LoopExhausted { turns: u32 },
}

impl ForemanError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ForemanError::UserError(_) => exit_codes::USER_ERROR,
            ForemanError::Template(_) => exit_codes::USER_ERROR,
            ForemanError::Generator(_)
            | ForemanError::LoopExhausted { .. } => exit_codes::RUN_FAILURE,
        }
    }
}

/// Result type alias for foreman operations.
pub type Result<T> = std::result::Result<T, ForemanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_has_user_exit_code() {
        let err = ForemanError::UserError("bad argument".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn loop_exhausted_has_run_failure_exit_code() {
        let err = ForemanError::LoopExhausted { turns: 25 };
        assert_eq!(err.exit_code(), exit_codes::RUN_FAILURE);
    }

    #[test]
    fn generator_error_has_run_failure_exit_code() {
        let err = ForemanError::Generator("spawn failed".to_string());
        assert_eq!(err.exit_code(), exit_codes::RUN_FAILURE);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = ForemanError::LoopExhausted { turns: 3 };
        assert_eq!(
            err.to_string(),
            "agent loop exhausted after 3 turns without a Final Result"
        );

        let err = ForemanError::Generator("timed out".to_string());
        assert_eq!(err.to_string(), "generation failed: timed out");
    }
}
