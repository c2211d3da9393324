use super::artifact::{
    ARCHITECTURE_MARKER, PLAN_MARKER, extract_context, extract_marked,
};
use super::coordinator::Coordinator;
use super::delegate::{Delegator, action_names, roster};
use super::review::{Rejection, Verdict, gate, parse_verdict};
use crate::config::{Config, ExecutorProfile};
use crate::events::RunLog;
use crate::project::{ProjectState, TaskStatus};
use crate::test_support::ScriptedGenerator;
use std::cell::Cell;
use tempfile::TempDir;

// Verdict parsing

#[test]
fn verdict_accepted_token_anywhere_accepts() {
    assert_eq!(
        parse_verdict("Thought: looks good\nFeedback: ACCEPTED"),
        Verdict::Accepted
    );
    assert_eq!(parse_verdict("ACCEPTED"), Verdict::Accepted);
}

#[test]
fn verdict_feedback_marker_yields_the_feedback() {
    let verdict = parse_verdict("Thought: hmm\nFeedback: the plan is too big");
    assert_eq!(
        verdict,
        Verdict::Rejected("the plan is too big".to_string())
    );
}

#[test]
fn verdict_without_marker_uses_the_whole_output() {
    let verdict = parse_verdict("this will not work at all");
    assert_eq!(
        verdict,
        Verdict::Rejected("this will not work at all".to_string())
    );
}

#[test]
fn verdict_empty_output_still_rejects() {
    assert!(matches!(parse_verdict("   "), Verdict::Rejected(_)));
}

// The review gate

#[test]
fn gate_accepts_on_first_round() {
    let drafts = Cell::new(0);
    let reviews = Cell::new(0);
    let gated = gate(
        2,
        |_| {
            drafts.set(drafts.get() + 1);
            Ok("draft".to_string())
        },
        |_| {
            reviews.set(reviews.get() + 1);
            Ok(Verdict::Accepted)
        },
    )
    .unwrap();

    assert!(gated.accepted);
    assert_eq!(gated.text, "draft");
    assert_eq!(gated.rounds, 1);
    assert_eq!((drafts.get(), reviews.get()), (1, 1));
}

#[test]
fn gate_stops_at_the_retry_budget_and_keeps_the_last_draft() {
    // A reviewer that would reject forever: under budget 2 it is asked
    // exactly twice, and the second draft survives.
    let drafts = Cell::new(0);
    let reviews = Cell::new(0);
    let gated = gate(
        2,
        |rejection: Option<&Rejection>| {
            drafts.set(drafts.get() + 1);
            if let Some(rejection) = rejection {
                assert_eq!(rejection.feedback, "not good enough");
                Ok(format!("{} v2", rejection.previous))
            } else {
                Ok("draft".to_string())
            }
        },
        |_| {
            reviews.set(reviews.get() + 1);
            Ok(Verdict::Rejected("not good enough".to_string()))
        },
    )
    .unwrap();

    assert!(!gated.accepted);
    assert_eq!(gated.text, "draft v2");
    assert_eq!((drafts.get(), reviews.get()), (2, 2));
}

#[test]
fn gate_with_zero_retries_skips_review() {
    let reviews = Cell::new(0);
    let gated = gate(
        0,
        |_| Ok("unreviewed".to_string()),
        |_| {
            reviews.set(reviews.get() + 1);
            Ok(Verdict::Accepted)
        },
    )
    .unwrap();

    assert_eq!(gated.text, "unreviewed");
    assert!(!gated.accepted);
    assert_eq!(reviews.get(), 0);
}

// Marker extraction

#[test]
fn extract_marked_strips_code_fences() {
    let raw = "Thought: here goes\nFINAL ARCHITECTURE:\n```\nsrc/main.rs: entry\n```\n";
    assert_eq!(
        extract_marked(raw, ARCHITECTURE_MARKER),
        Some("src/main.rs: entry".to_string())
    );
}

#[test]
fn extract_marked_missing_marker_is_none() {
    assert_eq!(extract_marked("no marker here", PLAN_MARKER), None);
}

#[test]
fn extract_context_stops_at_the_plan_marker() {
    let raw = "Thought: ok\nCONTEXT: A tiny CLI project.\nFINAL PLAN:\n1. Ship\n- do it";
    assert_eq!(
        extract_context(raw),
        Some("A tiny CLI project.".to_string())
    );
}

// Roster rendering

#[test]
fn roster_and_action_names_follow_the_subagent_syntax() {
    let config = Config::default();
    assert_eq!(
        action_names(&config.executors),
        vec!["Subagent @Executor".to_string()]
    );
    assert!(roster(&config.executors).starts_with("Subagent @Executor: "));
}

// Delegation

fn project_in(temp: &TempDir, objective: &str) -> ProjectState {
    ProjectState::new(temp.path(), objective)
}

#[test]
fn delegate_runs_the_executor_and_returns_its_final_result() {
    let temp = TempDir::new().unwrap();
    let state = project_in(&temp, "create a greeting");
    let config = Config::default();
    let log = RunLog::for_workdir(temp.path());
    let generator = ScriptedGenerator::new(&[
        "Thought: write it.\nAction: WriteFile\nAction Input: [hello.txt]\nhello",
        "Final Result: wrote hello.txt with the greeting",
    ]);

    let delegator = Delegator::new(&generator, &config, &log);
    let report = delegator
        .delegate(&state, &config.executors[0], "write hello.txt")
        .unwrap();

    assert!(report.success);
    assert_eq!(report.subagent, "Executor");
    assert_eq!(report.task, "write hello.txt");
    assert_eq!(report.text, "wrote hello.txt with the greeting");
    assert_eq!(
        std::fs::read_to_string(temp.path().join("hello.txt")).unwrap(),
        "hello"
    );

    let events = std::fs::read_to_string(log.path()).unwrap();
    assert!(events.contains("\"delegate\""));
    assert!(events.contains("\"report\""));
    assert!(events.contains("\"subagent\":\"Executor\""));
    assert!(events.contains("\"task\":\"write hello.txt\""));
}

#[test]
fn delegate_prompt_contains_only_the_task_not_any_transcript() {
    let temp = TempDir::new().unwrap();
    let state = project_in(&temp, "create a greeting");
    let config = Config::default();
    let log = RunLog::for_workdir(temp.path());
    let generator = ScriptedGenerator::new(&["Final Result: trivially done"]);

    let delegator = Delegator::new(&generator, &config, &log);
    delegator
        .delegate(&state, &config.executors[0], "the one task")
        .unwrap();

    let prompts = generator.prompts.borrow();
    assert!(prompts[0].contains("**the one task**"));
    assert!(!prompts[0].contains("Subagent @"));
}

#[test]
fn delegate_injects_the_executor_specialty_into_its_prompt() {
    let temp = TempDir::new().unwrap();
    let state = project_in(&temp, "build the app");
    let config = Config::default();
    let log = RunLog::for_workdir(temp.path());
    let generator = ScriptedGenerator::new(&["Final Result: done", "Final Result: done"]);

    let backend = ExecutorProfile {
        name: "Backend".to_string(),
        specialty: "server code and database schemas".to_string(),
    };
    let frontend = ExecutorProfile {
        name: "Frontend".to_string(),
        specialty: "UI components".to_string(),
    };

    let delegator = Delegator::new(&generator, &config, &log);
    delegator.delegate(&state, &backend, "add the schema").unwrap();
    delegator.delegate(&state, &frontend, "add the schema").unwrap();

    let prompts = generator.prompts.borrow();
    assert!(prompts[0].contains("server code and database schemas"));
    assert!(prompts[1].contains("UI components"));
    assert_ne!(prompts[0], prompts[1]);
}

// Coordinator runs

fn accepted_architecture() -> &'static str {
    "Thought: simple project.\nFINAL ARCHITECTURE:\n```\nhello.txt: the greeting\n```"
}

fn accepted_plan(task: &str) -> String {
    format!(
        "Thought: one step.\nCONTEXT: A tiny project.\nFINAL PLAN:\n1. Write the greeting\n- {}",
        task
    )
}

#[test]
fn coordinator_runs_a_full_objective_end_to_end() {
    let task = "Write hello.txt with the word hello";
    let plan = accepted_plan(task);
    let delegate_turn = format!(
        "Thought: time to delegate.\nAction: Subagent @Executor\nAction Input: {}",
        task
    );
    let generator = ScriptedGenerator::new(&[
        // Architecture draft and review.
        accepted_architecture(),
        "Thought: fine.\nACCEPTED",
        // Plan draft and review.
        &plan,
        "ACCEPTED",
        // Coordinator delegates.
        &delegate_turn,
        // Executor writes the file and reports.
        "Thought: writing.\nAction: WriteFile\nAction Input: [hello.txt]\nhello",
        "Final Result: wrote hello.txt",
        // Post-task artifact refreshes.
        "FINAL ARCHITECTURE:\nhello.txt: the greeting file",
        "CONTEXT: Greeting written.\nFINAL PLAN:\n1. Write the greeting",
        // Coordinator wraps up.
        "Thought: done.\nFinal Result: The objective is achieved.",
    ]);

    let temp = TempDir::new().unwrap();
    let mut state = project_in(&temp, "create a greeting file");
    let config = Config::default();
    let log = RunLog::for_workdir(temp.path());

    let coordinator = Coordinator::new(&generator, &config, log.clone());
    let result = coordinator.run(&mut state).unwrap();

    assert_eq!(result, "The objective is achieved.");
    assert_eq!(generator.remaining(), 0);
    assert_eq!(
        std::fs::read_to_string(temp.path().join("hello.txt")).unwrap(),
        "hello"
    );
    assert_eq!(state.context(), "Greeting written.");
    assert!(state.architecture().contains("hello.txt"));

    let events = std::fs::read_to_string(log.path()).unwrap();
    for action in [
        "run_start",
        "draft",
        "evaluate_accept",
        "delegate",
        "report",
        "task_complete",
        "state_update",
        "run_complete",
    ] {
        assert!(events.contains(action), "missing {} in run log", action);
    }
}

#[test]
fn exhausted_subagent_becomes_a_failed_report_and_the_run_continues() {
    let task = "Write hello.txt with the word hello";
    let plan = accepted_plan(task);
    let delegate_turn = format!(
        "Action: Subagent @Executor\nAction Input: {}",
        task
    );
    let generator = ScriptedGenerator::new(&[
        accepted_architecture(),
        "ACCEPTED",
        &plan,
        "ACCEPTED",
        &delegate_turn,
        // The executor burns both of its turns without a final result.
        "Thought: I am stuck.",
        "Thought: still stuck.",
        // The coordinator sees the failure and wraps up anyway.
        "Thought: giving up on that task.\nFinal Result: stopping here",
    ]);

    let temp = TempDir::new().unwrap();
    let mut state = project_in(&temp, "create a greeting file");
    let mut config = Config::default();
    config.max_turns = 2;
    let log = RunLog::for_workdir(temp.path());

    let coordinator = Coordinator::new(&generator, &config, log.clone());
    let result = coordinator.run(&mut state).unwrap();

    assert_eq!(result, "stopping here");
    assert_eq!(state.plan().count(TaskStatus::Failed), 1);

    let events = std::fs::read_to_string(log.path()).unwrap();
    assert!(events.contains("task_failed"));
    assert!(!events.contains("task_complete"));

    // The failure observation reached the coordinator's next prompt.
    let prompts = generator.prompts.borrow();
    assert!(prompts.last().unwrap().contains("The task failed."));
}

#[test]
fn rejected_drafts_are_redone_with_feedback() {
    let generator = ScriptedGenerator::new(&[
        // First architecture draft is rejected.
        "FINAL ARCHITECTURE:\neverything.txt: all of it",
        "Thought: no.\nFeedback: split this into real files",
        // Second draft is accepted.
        accepted_architecture(),
        "ACCEPTED",
        accepted_plan("Write hello.txt").as_str(),
        "ACCEPTED",
        "Final Result: done without doing anything",
    ]);

    let temp = TempDir::new().unwrap();
    let mut state = project_in(&temp, "create a greeting file");
    let config = Config::default();
    let log = RunLog::for_workdir(temp.path());

    let coordinator = Coordinator::new(&generator, &config, log.clone());
    coordinator.run(&mut state).unwrap();

    // The redraft prompt carried the rejected draft and the feedback.
    let prompts = generator.prompts.borrow();
    assert!(prompts[2].contains("split this into real files"));
    assert!(prompts[2].contains("everything.txt"));

    let events = std::fs::read_to_string(log.path()).unwrap();
    assert!(events.contains("evaluate_reject"));
}

#[test]
fn coordinator_tool_actions_dispatch_directly() {
    let generator = ScriptedGenerator::new(&[
        accepted_architecture(),
        "ACCEPTED",
        accepted_plan("Write hello.txt").as_str(),
        "ACCEPTED",
        "Thought: I will do this one myself.\nAction: WriteFile\nAction Input: [notes.txt]\nremember",
        "Final Result: done",
    ]);

    let temp = TempDir::new().unwrap();
    let mut state = project_in(&temp, "create a greeting file");
    let config = Config::default();
    let log = RunLog::for_workdir(temp.path());

    let coordinator = Coordinator::new(&generator, &config, log);
    coordinator.run(&mut state).unwrap();

    assert_eq!(
        std::fs::read_to_string(temp.path().join("notes.txt")).unwrap(),
        "remember"
    );
}
