//! Architecture and plan artifacts.
//!
//! Both artifacts are produced by single-shot generations and extracted by
//! marker: everything after `FINAL ARCHITECTURE:` / `FINAL PLAN:` is the
//! artifact (code fences stripped), and the planner additionally emits a
//! one-paragraph `CONTEXT:` before the plan. Initial drafts pass through
//! the review gate; post-task refreshes are single-shot.

use crate::agent::Generator;
use crate::error::Result;
use crate::events::{Event, EventAction, RunLog};
use crate::project::{Plan, ProjectState};
use crate::prompt::{library, render_template, vars};
use crate::team::review::{Rejection, Verdict, gate, parse_verdict};
use serde_json::json;

pub const ARCHITECTURE_MARKER: &str = "FINAL ARCHITECTURE:";
pub const PLAN_MARKER: &str = "FINAL PLAN:";
pub const CONTEXT_MARKER: &str = "CONTEXT:";

/// Text after the first occurrence of `marker`, with code fences stripped.
/// `None` when the marker never appears.
pub fn extract_marked(raw: &str, marker: &str) -> Option<String> {
    let (_, after) = raw.split_once(marker)?;
    Some(strip_code_fences(after).trim().to_string())
}

/// The planner's context paragraph: text between `CONTEXT:` and the plan
/// marker (or the end of the output).
pub fn extract_context(raw: &str) -> Option<String> {
    let (_, after) = raw.split_once(CONTEXT_MARKER)?;
    let context = after.split(PLAN_MARKER).next().unwrap_or("");
    Some(context.trim().to_string())
}

/// Drop Markdown fence lines; models wrap listings in them despite the
/// prompt examples.
fn strip_code_fences(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Marker extraction with a whole-output fallback: a draft that forgot the
/// marker is still a draft, not a failure.
fn extract_or_whole(raw: &str, marker: &str) -> String {
    extract_marked(raw, marker).unwrap_or_else(|| strip_code_fences(raw).trim().to_string())
}

/// Render the rejection note for a redraft prompt's `{feedback}` slot.
fn feedback_var(rejection: Option<&Rejection>) -> Result<String> {
    match rejection {
        None => Ok(String::new()),
        Some(rejection) => Ok(render_template(
            &library::feedback_note(),
            &vars([
                ("previous_result", rejection.previous.as_str()),
                ("feedback", rejection.feedback.as_str()),
            ]),
        )?),
    }
}

/// Draft the architecture through the review gate.
pub fn draft_architecture(
    generator: &dyn Generator,
    state: &ProjectState,
    retries: u32,
    log: &RunLog,
) -> Result<String> {
    let gated = gate(
        retries,
        |rejection| {
            let mut variables = super::base_vars(state)?;
            variables.insert("feedback".to_string(), feedback_var(rejection)?);
            let prompt = render_template(&library::architect(), &variables)?;
            let raw = generator.generate(&prompt, &[])?;
            let text = extract_or_whole(&raw, ARCHITECTURE_MARKER);
            log.append(
                &Event::new(EventAction::Draft).with_details(json!({"artifact": "architecture"})),
            )?;
            Ok(text)
        },
        |text| review_artifact(generator, state, log, "architecture", text),
    )?;
    Ok(gated.text)
}

/// Refresh the architecture after a completed task (single-shot).
pub fn refresh_architecture(
    generator: &dyn Generator,
    state: &ProjectState,
    report: &str,
    log: &RunLog,
) -> Result<String> {
    let mut variables = super::base_vars(state)?;
    variables.insert("report".to_string(), report.to_string());
    variables.insert("feedback".to_string(), String::new());
    let prompt = render_template(&library::architect_update(), &variables)?;
    let raw = generator.generate(&prompt, &[])?;
    log.append(
        &Event::new(EventAction::Draft)
            .with_details(json!({"artifact": "architecture", "refresh": true})),
    )?;
    Ok(extract_or_whole(&raw, ARCHITECTURE_MARKER))
}

/// Draft the plan and its context paragraph through the review gate.
///
/// The gate evaluates the plan text; the context rides along with whichever
/// draft the gate settles on.
pub fn draft_plan(
    generator: &dyn Generator,
    state: &ProjectState,
    subagents: &str,
    retries: u32,
    log: &RunLog,
) -> Result<(Plan, String)> {
    let mut context = String::new();
    let gated = gate(
        retries,
        |rejection| {
            let mut variables = super::base_vars(state)?;
            variables.insert("subagents".to_string(), subagents.to_string());
            variables.insert("feedback".to_string(), feedback_var(rejection)?);
            let prompt = render_template(&library::planner(), &variables)?;
            let raw = generator.generate(&prompt, &[])?;
            context = extract_context(&raw).unwrap_or_default();
            let text = extract_or_whole(&raw, PLAN_MARKER);
            log.append(&Event::new(EventAction::Draft).with_details(json!({"artifact": "plan"})))?;
            Ok(text)
        },
        |text| review_artifact(generator, state, log, "plan", text),
    )?;
    Ok((Plan::parse(&gated.text), context))
}

/// Refresh the plan and context after a completed task (single-shot).
pub fn refresh_plan(
    generator: &dyn Generator,
    state: &ProjectState,
    report: &str,
    log: &RunLog,
) -> Result<(Plan, String)> {
    let mut variables = super::base_vars(state)?;
    variables.insert("report".to_string(), report.to_string());
    variables.insert("feedback".to_string(), String::new());
    let prompt = render_template(&library::planner_update(), &variables)?;
    let raw = generator.generate(&prompt, &[])?;
    log.append(
        &Event::new(EventAction::Draft).with_details(json!({"artifact": "plan", "refresh": true})),
    )?;
    let context = extract_context(&raw).unwrap_or_else(|| state.context().to_string());
    Ok((Plan::parse(&extract_or_whole(&raw, PLAN_MARKER)), context))
}

/// One evaluation round: render the matching review prompt, parse the
/// verdict, log it.
fn review_artifact(
    generator: &dyn Generator,
    state: &ProjectState,
    log: &RunLog,
    artifact: &str,
    text: &str,
) -> Result<Verdict> {
    let mut variables = super::base_vars(state)?;
    variables.insert("result".to_string(), text.to_string());
    let template = if artifact == "architecture" {
        library::architecture_review()
    } else {
        library::plan_review()
    };
    let prompt = render_template(&template, &variables)?;
    let raw = generator.generate(&prompt, &[])?;
    let verdict = parse_verdict(&raw);
    let (action, details) = match &verdict {
        Verdict::Accepted => (EventAction::EvaluateAccept, json!({"artifact": artifact})),
        Verdict::Rejected(feedback) => (
            EventAction::EvaluateReject,
            json!({"artifact": artifact, "feedback": feedback}),
        ),
    };
    log.append(&Event::new(action).with_details(details))?;
    Ok(verdict)
}
