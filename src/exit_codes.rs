//! Exit code constants for the foreman CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid config)
//! - 2: Run failure (generation failed, coordinator loop exhausted)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid config, or missing workspace.
pub const USER_ERROR: i32 = 1;

/// Run failure: the orchestration run could not be completed.
pub const RUN_FAILURE: i32 = 2;
