//! Text generation and the agent turn loop.
//!
//! A [`Generator`] produces the next chunk of transcript text for a prompt;
//! [`AgentLoop`] drives a generator and a tool registry through the
//! Thought/Action/AResult protocol until the agent emits a final result or
//! runs out of turns.

pub mod generator;
pub mod runner;

pub use generator::{CommandGenerator, Generator};
pub use runner::AgentLoop;
