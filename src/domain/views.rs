//! Read-only projections of the task list. Everything here is recomputed from
//! the live tasks on each call; the only state kept is the focus-mode cursor.

use super::enums::TaskStatus;
use super::task::Task;
use chrono::NaiveDate;

/// Tasks shown under a tab of the default view
pub fn tab_tasks(tasks: &[Task], tab: TaskStatus) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| {
            if tab == TaskStatus::Completed {
                task.completed
            } else {
                !task.completed && task.status == tab
            }
        })
        .collect()
}

/// Tasks still open, in insertion order (both focus modes walk this list)
pub fn incomplete_tasks(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|task| !task.completed).collect()
}

/// Today's progress summary for the default view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyProgress {
    /// Tasks completed with a timestamp on the given day, from any bucket
    pub completed_today: usize,
    /// Tasks whose status is Today
    pub todays_tasks: usize,
    /// Tasks whose status is Today and are not completed
    pub remaining_today: usize,
}

impl DailyProgress {
    /// Completed-today over today's tasks, as a percentage. No tasks reports 0.
    pub fn percent(&self) -> f64 {
        if self.todays_tasks == 0 {
            return 0.0;
        }
        self.completed_today as f64 / self.todays_tasks as f64 * 100.0
    }

    pub fn rounded_percent(&self) -> u32 {
        self.percent().round() as u32
    }

    /// e.g., "2 of 4 tasks completed today (50%)"
    pub fn summary_line(&self) -> String {
        format!(
            "{} of {} tasks completed today ({}%)",
            self.completed_today,
            self.todays_tasks,
            self.rounded_percent()
        )
    }
}

/// Compute today's progress. `today` is the local calendar day.
pub fn daily_progress(tasks: &[Task], today: NaiveDate) -> DailyProgress {
    let todays = tasks.iter().filter(|t| t.status == TaskStatus::Today);
    DailyProgress {
        completed_today: tasks.iter().filter(|t| t.completed_on(today)).count(),
        todays_tasks: todays.clone().count(),
        remaining_today: todays.filter(|t| !t.completed).count(),
    }
}

/// What the isolation view shows for the current cursor
#[derive(Debug, PartialEq)]
pub enum IsolationFrame<'a> {
    Task {
        task: &'a Task,
        /// One-based position
        position: usize,
        total: usize,
        /// Whether "skip to next" is offered
        can_skip: bool,
    },
    AllComplete,
}

/// Cursor over the incomplete tasks, one at a time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsolationCursor {
    index: usize,
}

impl IsolationCursor {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Resolve the cursor against the live task list. The cursor is never
    /// adjusted when the list shrinks, so it can land past the end.
    pub fn frame<'a>(&self, tasks: &'a [Task]) -> IsolationFrame<'a> {
        let incomplete = incomplete_tasks(tasks);
        match incomplete.get(self.index) {
            Some(task) => IsolationFrame::Task {
                task,
                position: self.index + 1,
                total: incomplete.len(),
                can_skip: self.index + 1 < incomplete.len(),
            },
            None => IsolationFrame::AllComplete,
        }
    }

    pub fn current<'a>(&self, tasks: &'a [Task]) -> Option<&'a Task> {
        incomplete_tasks(tasks).get(self.index).copied()
    }

    /// Move to the next incomplete task; stays put on the last one
    pub fn advance(&mut self, tasks: &[Task]) {
        let total = incomplete_tasks(tasks).len();
        if self.index + 1 < total {
            self.index += 1;
        }
    }
}

/// One row of the sequential view
#[derive(Debug, PartialEq)]
pub struct SequentialRow<'a> {
    /// One-based step number
    pub number: usize,
    pub task: &'a Task,
    pub expanded: bool,
}

/// Tracks which single task (if any) is expanded in the sequential view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequentialCursor {
    expanded: Option<String>,
}

impl SequentialCursor {
    pub fn expanded_id(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    /// Selecting the expanded task collapses it; selecting another expands that one
    pub fn select(&mut self, task_id: &str) {
        if self.expanded.as_deref() == Some(task_id) {
            self.expanded = None;
        } else {
            self.expanded = Some(task_id.to_string());
        }
    }

    pub fn rows<'a>(&self, tasks: &'a [Task]) -> Vec<SequentialRow<'a>> {
        incomplete_tasks(tasks)
            .into_iter()
            .enumerate()
            .map(|(i, task)| SequentialRow {
                number: i + 1,
                task,
                expanded: self.expanded.as_deref() == Some(task.id.as_str()),
            })
            .collect()
    }

    /// The expanded task, if it is still in the incomplete list
    pub fn expanded_task<'a>(&self, tasks: &'a [Task]) -> Option<&'a Task> {
        let id = self.expanded.as_deref()?;
        tasks.iter().find(|t| t.id == id && !t.completed)
    }
}

/// Window title without the badge
pub const APP_TITLE: &str = "InnerMonk - ADHD Task Manager";

/// Window title with the incomplete-count badge
pub fn window_title(incomplete: usize) -> String {
    if incomplete > 0 {
        format!("({}) {}", incomplete, APP_TITLE)
    } else {
        APP_TITLE.to_string()
    }
}
