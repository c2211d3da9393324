//! Template engine for `{variable}` substitution in role prompts.
//!
//! # Syntax
//!
//! - `{name}` - substitutes the value of variable `name`
//! - `{{` - renders as literal `{`
//! - `}}` - renders as literal `}`

use std::collections::HashMap;
use thiserror::Error;

/// Error type for template rendering failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A variable was referenced but not provided.
    #[error("undefined variable '{name}' at position {position} in template")]
    UndefinedVariable { name: String, position: usize },

    /// A `{` was found without a matching `}`.
    #[error("unmatched '{{' at position {position} in template")]
    UnmatchedBrace { position: usize },

    /// An empty variable name was found (e.g., `{}`).
    #[error("empty variable name at position {position} in template")]
    EmptyVariableName { position: usize },
}

/// Render a template string by substituting variables.
///
/// Undefined variables cause an error rather than silent substitution with
/// empty strings. Variable names are trimmed, so `{ name }` works too.
pub fn render_template(
    template: &str,
    variables: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' => {
                if let Some((_, '{')) = chars.peek() {
                    chars.next();
                    result.push('{');
                } else {
                    let start_pos = pos;
                    let mut var_name = String::new();

                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, c)) => var_name.push(c),
                            None => {
                                return Err(TemplateError::UnmatchedBrace {
                                    position: start_pos,
                                });
                            }
                        }
                    }

                    if var_name.is_empty() {
                        return Err(TemplateError::EmptyVariableName {
                            position: start_pos,
                        });
                    }

                    let var_name = var_name.trim();

                    match variables.get(var_name) {
                        Some(value) => result.push_str(value),
                        None => {
                            return Err(TemplateError::UndefinedVariable {
                                name: var_name.to_string(),
                                position: start_pos,
                            });
                        }
                    }
                }
            }
            '}' => {
                if let Some((_, '}')) = chars.peek() {
                    chars.next();
                    result.push('}');
                } else {
                    // Lone } is just a regular character
                    result.push('}');
                }
            }
            _ => result.push(ch),
        }
    }

    Ok(result)
}

/// Helper to create a variables map from a list of key-value pairs.
pub fn vars<I, K, V>(pairs: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_substitution() {
        let vars = vars([("objective", "build a CLI"), ("task", "write main.rs")]);
        let result = render_template("Objective: {objective}. Task: {task}.", &vars).unwrap();
        assert_eq!(result, "Objective: build a CLI. Task: write main.rs.");
    }

    #[test]
    fn test_no_variables() {
        let vars = HashMap::new();
        let result = render_template("Just plain text", &vars).unwrap();
        assert_eq!(result, "Just plain text");
    }

    #[test]
    fn test_escape_braces() {
        let vars = HashMap::new();
        let result = render_template("Use {{var}} for variables", &vars).unwrap();
        assert_eq!(result, "Use {var} for variables");
    }

    #[test]
    fn test_undefined_variable_error() {
        let vars = HashMap::new();
        let err = render_template("Objective: {objective}", &vars).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UndefinedVariable {
                name: "objective".to_string(),
                position: 11,
            }
        );
    }

    #[test]
    fn test_unmatched_brace_error() {
        let vars = HashMap::new();
        let err = render_template("Objective: {objective", &vars).unwrap_err();
        assert_eq!(err, TemplateError::UnmatchedBrace { position: 11 });
    }

    #[test]
    fn test_empty_variable_name_error() {
        let vars = HashMap::new();
        let err = render_template("oops {}", &vars).unwrap_err();
        assert_eq!(err, TemplateError::EmptyVariableName { position: 5 });
    }

    #[test]
    fn test_whitespace_in_variable_name() {
        let vars = vars([("task", "patch the parser")]);
        let result = render_template("Task: { task }", &vars).unwrap();
        assert_eq!(result, "Task: patch the parser");
    }

    #[test]
    fn test_multiline_values_and_lone_closing_brace() {
        let vars = vars([("scratchpad", "Thought: a\nAction: ReadFile")]);
        let result = render_template("{scratchpad}\n}", &vars).unwrap();
        assert_eq!(result, "Thought: a\nAction: ReadFile\n}");
    }

    #[test]
    fn test_empty_value_substitution() {
        let vars = vars([("feedback", "")]);
        let result = render_template("before{feedback}after", &vars).unwrap();
        assert_eq!(result, "beforeafter");
    }
}
