//! Prompt rendering for foreman.
//!
//! Role prompts are plain-text templates with `{variable}` placeholders,
//! rendered against variable maps assembled from the shared project state.
//! The template engine is fail-safe: an undefined variable is an error, not
//! a silent empty substitution, so a typo in a template cannot quietly send
//! a half-rendered prompt to the model.

pub mod library;
mod template;

pub use template::{TemplateError, render_template, vars};
