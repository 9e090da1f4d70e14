use super::enums::TaskStatus;
use super::task::{Subtask, Task, TaskDraft};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Owns the full task list. Every operation that names an absent ID is a no-op.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// All tasks in insertion order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Count of tasks not yet completed (window title badge)
    pub fn incomplete_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    /// Append a task built from the draft. Returns the new ID, or `None` when
    /// the title is blank and nothing was created.
    pub fn create(&mut self, draft: TaskDraft) -> Option<String> {
        if !draft.is_valid() {
            debug!("rejected task draft with blank title");
            return None;
        }
        let task = draft.into_task();
        let id = task.id.clone();
        debug!(id = %id, title = %task.title, "task created");
        self.tasks.push(task);
        Some(id)
    }

    /// Replace the task with the same ID. Completion fields are taken as given,
    /// so `status` and `completed` may disagree after an edit.
    pub fn update(&mut self, task: Task) -> bool {
        match self.get_mut(&task.id) {
            Some(slot) => {
                debug!(id = %task.id, "task updated");
                *slot = task;
                true
            }
            None => false,
        }
    }

    /// Flip completion at the current time. See `toggle_complete_at`.
    pub fn toggle_complete(&mut self, id: &str) -> Option<bool> {
        self.toggle_complete_at(id, Utc::now())
    }

    /// Flip completion. Completing moves the task to the Completed bucket and
    /// stamps `completed_at`; un-completing always returns it to Today. All
    /// subtasks are forced to the new value. Returns the new completion state.
    pub fn toggle_complete_at(&mut self, id: &str, now: DateTime<Utc>) -> Option<bool> {
        let task = self.get_mut(id)?;
        let completed = !task.completed;

        task.completed = completed;
        if completed {
            task.status = TaskStatus::Completed;
            task.completed_at = Some(now);
        } else {
            task.status = TaskStatus::Today;
            task.completed_at = None;
        }
        for subtask in &mut task.subtasks {
            subtask.completed = completed;
        }

        debug!(id = %id, completed, "task completion toggled");
        Some(completed)
    }

    /// Remove a task. Confirmation happens before this is called.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;
        if removed {
            debug!(id = %id, "task deleted");
        }
        removed
    }

    /// Flip one subtask. The parent's own completion is left alone.
    pub fn toggle_subtask(&mut self, task_id: &str, subtask_id: &str) -> Option<bool> {
        let subtask = self
            .get_mut(task_id)?
            .subtasks
            .iter_mut()
            .find(|st| st.id == subtask_id)?;
        subtask.completed = !subtask.completed;
        debug!(
            task_id = %task_id,
            subtask_id = %subtask_id,
            completed = subtask.completed,
            "subtask toggled"
        );
        Some(subtask.completed)
    }

    /// Append a step to a task. Blank titles are skipped; the title is trimmed.
    pub fn add_subtask(&mut self, task_id: &str, title: &str) -> Option<String> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let task = self.get_mut(task_id)?;
        let subtask = Subtask::new(title.to_string());
        let id = subtask.id.clone();
        task.subtasks.push(subtask);
        debug!(task_id = %task_id, subtask_id = %id, "subtask added");
        Some(id)
    }

    /// Remove a step from a task, keeping the order of the rest
    pub fn remove_subtask(&mut self, task_id: &str, subtask_id: &str) -> bool {
        let Some(task) = self.get_mut(task_id) else {
            return false;
        };
        let before = task.subtasks.len();
        task.subtasks.retain(|st| st.id != subtask_id);
        task.subtasks.len() != before
    }
}
