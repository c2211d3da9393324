//! Plan model: ordered milestones of tasks with a lifecycle.
//!
//! Plans travel as free text between agents (a numbered-milestone,
//! dashed-task list) and are parsed loosely: unrecognized lines are
//! ignored rather than rejected, because the downstream consumers are
//! prompts, not a strict grammar.

/// Lifecycle of one plan task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatus {
    #[default]
    Pending,
    /// Handed to a sub-agent; awaiting its report.
    Delegated,
    Completed,
    Failed,
}

/// One concrete unit of work assigned to an agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub description: String,
    pub status: TaskStatus,
    /// The report produced on completion or failure.
    pub report: Option<String>,
}

impl Task {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            status: TaskStatus::Pending,
            report: None,
        }
    }
}

/// A complete, shippable increment composed of tasks.
///
/// Tasks within one milestone are intended to be independently executable;
/// milestones are sequential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Milestone {
    pub name: String,
    pub tasks: Vec<Task>,
}

/// An ordered list of milestones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Plan {
    pub milestones: Vec<Milestone>,
}

impl Plan {
    /// Parse plan text: `N. milestone` lines start milestones, `- task`
    /// lines add tasks to the most recent milestone. Anything else is
    /// ignored. Tasks before any milestone get an implicit first one.
    pub fn parse(text: &str) -> Self {
        let mut milestones: Vec<Milestone> = Vec::new();

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(name) = parse_milestone_heading(trimmed) {
                milestones.push(Milestone {
                    name: name.to_string(),
                    tasks: Vec::new(),
                });
            } else if let Some(task) = trimmed.strip_prefix("- ").or_else(|| {
                trimmed.strip_prefix("* ")
            }) {
                let task = task.trim();
                if task.is_empty() {
                    continue;
                }
                if milestones.is_empty() {
                    milestones.push(Milestone {
                        name: "Milestone 1".to_string(),
                        tasks: Vec::new(),
                    });
                }
                if let Some(last) = milestones.last_mut() {
                    last.tasks.push(Task::new(task));
                }
            }
        }

        Self { milestones }
    }

    /// Render back to the numbered/dashed text format for prompts,
    /// annotating non-pending tasks.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (index, milestone) in self.milestones.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", index + 1, milestone.name));
            for task in &milestone.tasks {
                let suffix = match task.status {
                    TaskStatus::Pending => "",
                    TaskStatus::Delegated => " (in progress)",
                    TaskStatus::Completed => " (completed)",
                    TaskStatus::Failed => " (failed)",
                };
                out.push_str(&format!("    - {}{}\n", task.description, suffix));
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.milestones.iter().all(|m| m.tasks.is_empty())
    }

    /// The next pending task: milestones are sequential, so this is the
    /// first pending task of the first milestone that still has one.
    pub fn next_pending(&self) -> Option<(&str, &str)> {
        for milestone in &self.milestones {
            if let Some(task) = milestone
                .tasks
                .iter()
                .find(|t| t.status == TaskStatus::Pending)
            {
                return Some((milestone.name.as_str(), task.description.as_str()));
            }
        }
        None
    }

    /// The milestone containing a task matching `description`.
    pub fn milestone_of(&self, description: &str) -> Option<&str> {
        let needle = normalize(description);
        self.milestones
            .iter()
            .find(|m| m.tasks.iter().any(|t| normalize(&t.description) == needle))
            .map(|m| m.name.as_str())
    }

    /// Count of tasks in a given status.
    pub fn count(&self, status: TaskStatus) -> usize {
        self.milestones
            .iter()
            .flat_map(|m| &m.tasks)
            .filter(|t| t.status == status)
            .count()
    }

    pub fn mark_delegated(&mut self, description: &str) -> bool {
        self.transition(description, TaskStatus::Delegated, None)
    }

    pub fn mark_completed(&mut self, description: &str, report: &str) -> bool {
        self.transition(description, TaskStatus::Completed, Some(report))
    }

    pub fn mark_failed(&mut self, description: &str, reason: &str) -> bool {
        self.transition(description, TaskStatus::Failed, Some(reason))
    }

    /// Find the task whose description matches (case-insensitive, trimmed)
    /// and move it to `status`. The plan is advisory free text, so a
    /// delegation that matches nothing is not an error; it returns false.
    fn transition(&mut self, description: &str, status: TaskStatus, report: Option<&str>) -> bool {
        let needle = normalize(description);
        for milestone in &mut self.milestones {
            if let Some(task) = milestone
                .tasks
                .iter_mut()
                .find(|t| normalize(&t.description) == needle)
            {
                task.status = status;
                if let Some(report) = report {
                    task.report = Some(report.to_string());
                }
                return true;
            }
        }
        false
    }
}

fn parse_milestone_heading(line: &str) -> Option<&str> {
    let (number, rest) = line.split_once(". ")?;
    if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) {
        Some(rest.trim())
    } else {
        None
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
