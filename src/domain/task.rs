use super::enums::{Energy, ExecutiveFunction, Priority, TaskStatus};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Generate a fresh opaque ID for a task or subtask
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// One step of a task's breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

impl Subtask {
    pub fn new(title: String) -> Self {
        Self {
            id: new_id(),
            title,
            completed: false,
        }
    }
}

/// A task as stored under the `tasks` key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub completed: bool,
    /// Set by the completion toggle only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// The browser form writes `""` when the date is cleared
    #[serde(
        default,
        deserialize_with = "empty_date_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<NaiveDate>,
    /// Insertion order
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<Energy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executive_function: Option<ExecutiveFunction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_estimate: Option<u32>,
    /// Minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_time: Option<u32>,
}

fn empty_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl Task {
    /// Whether this task was completed on the given local calendar day
    pub fn completed_on(&self, day: NaiveDate) -> bool {
        self.completed
            && self
                .completed_at
                .is_some_and(|at| at.with_timezone(&Local).date_naive() == day)
    }

    /// Number of completed subtasks
    pub fn completed_subtasks(&self) -> usize {
        self.subtasks.iter().filter(|st| st.completed).count()
    }
}

/// Everything the new-task form collects; turned into a `Task` by the store
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub color: Option<String>,
    pub energy: Option<Energy>,
    pub executive_function: Option<ExecutiveFunction>,
    pub category: Option<String>,
    pub time_estimate: Option<u32>,
    /// Titles of steps listed before the task exists
    pub subtasks: Vec<String>,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            status: TaskStatus::Today,
            priority: Priority::Medium,
            due_date: None,
            color: None,
            energy: Some(Energy::Medium),
            executive_function: None,
            category: None,
            time_estimate: Some(30),
            subtasks: Vec::new(),
        }
    }
}

impl TaskDraft {
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    /// A draft with a blank title must not be submitted
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Build the task with a fresh ID; blank subtask entries are dropped
    pub fn into_task(self) -> Task {
        let subtasks = self
            .subtasks
            .iter()
            .map(|title| title.trim())
            .filter(|title| !title.is_empty())
            .map(|title| Subtask::new(title.to_string()))
            .collect();

        Task {
            id: new_id(),
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            completed: false,
            completed_at: None,
            due_date: self.due_date,
            subtasks,
            color: self.color,
            energy: self.energy,
            executive_function: self.executive_function,
            category: self.category,
            time_estimate: self.time_estimate,
            actual_time: None,
        }
    }
}
