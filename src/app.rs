use crate::domain::{
    daily_progress, incomplete_tasks, tab_tasks, window_title, DailyProgress, Energy,
    ExecutiveFunction, FocusMode, IsolationCursor, Phase, Priority, SequentialCursor, Task,
    TaskDraft, TaskStatus, TaskStore, TimerEngine, TimerSettings, UiMode,
};
use crate::persistence::{
    save_record, KeyValueStore, PersistedState, DARK_MODE_KEY, TASKS_KEY, TIMER_KEY,
};
use crate::ticker::Ticker;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

/// Smallest phase length the keyboard adjusters allow, in seconds
pub const MIN_PHASE_SECS: u32 = 60;
/// Step used by the keyboard duration adjusters, in seconds
pub const DURATION_STEP_SECS: u32 = 60;

/// What the input form will do on submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    NewTask,
    EditTask(String),
    NewSubtask(String),
}

/// Field focused in the input form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Priority,
    Status,
    Energy,
    ExecutiveFunction,
    Estimate,
    DueDate,
    Category,
    Steps,
}

impl FormField {
    /// Whether the field takes typed text (the rest cycle with Left/Right)
    pub fn is_text(&self) -> bool {
        !matches!(
            self,
            Self::Priority | Self::Status | Self::Energy | Self::ExecutiveFunction
        )
    }
}

/// Input form state for adding and editing tasks and subtasks
#[derive(Debug, Clone)]
pub struct InputFormState {
    pub kind: FormKind,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub energy: Option<Energy>,
    pub executive_function: Option<ExecutiveFunction>,
    /// Minutes, as typed
    pub estimate: String,
    /// YYYY-MM-DD, as typed
    pub due_date: String,
    pub category: String,
    /// New-task only: steps separated by `;`
    pub steps: String,
    pub field: FormField,
    pub error: Option<String>,
}

impl InputFormState {
    fn for_new_task() -> Self {
        let draft = TaskDraft::default();
        Self {
            kind: FormKind::NewTask,
            title: String::new(),
            description: String::new(),
            priority: draft.priority,
            status: draft.status,
            energy: draft.energy,
            executive_function: draft.executive_function,
            estimate: draft.time_estimate.map(|m| m.to_string()).unwrap_or_default(),
            due_date: String::new(),
            category: String::new(),
            steps: String::new(),
            field: FormField::Title,
            error: None,
        }
    }

    fn for_task(task: &Task) -> Self {
        Self {
            kind: FormKind::EditTask(task.id.clone()),
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            priority: task.priority,
            status: task.status,
            energy: task.energy,
            executive_function: task.executive_function,
            estimate: task.time_estimate.map(|m| m.to_string()).unwrap_or_default(),
            due_date: task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            category: task.category.clone().unwrap_or_default(),
            steps: String::new(),
            field: FormField::Title,
            error: None,
        }
    }

    fn for_subtask(task_id: &str) -> Self {
        Self {
            kind: FormKind::NewSubtask(task_id.to_string()),
            ..Self::for_new_task()
        }
    }

    /// Fields shown for this kind of form, in Tab order
    pub fn fields(&self) -> &'static [FormField] {
        match self.kind {
            FormKind::NewTask => &[
                FormField::Title,
                FormField::Description,
                FormField::Priority,
                FormField::Status,
                FormField::Energy,
                FormField::ExecutiveFunction,
                FormField::Estimate,
                FormField::DueDate,
                FormField::Category,
                FormField::Steps,
            ],
            FormKind::EditTask(_) => &[
                FormField::Title,
                FormField::Description,
                FormField::Priority,
                FormField::Status,
                FormField::Energy,
                FormField::ExecutiveFunction,
                FormField::Estimate,
                FormField::DueDate,
                FormField::Category,
            ],
            FormKind::NewSubtask(_) => &[FormField::Title],
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.field {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Estimate => Some(&mut self.estimate),
            FormField::DueDate => Some(&mut self.due_date),
            FormField::Category => Some(&mut self.category),
            FormField::Steps => Some(&mut self.steps),
            _ => None,
        }
    }

    /// Parse the typed values into a draft, or explain what is wrong
    fn to_draft(&self) -> std::result::Result<TaskDraft, String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }

        let time_estimate = match self.estimate.trim() {
            "" => None,
            raw => Some(
                raw.parse::<u32>()
                    .map_err(|_| format!("Time estimate must be whole minutes, got '{}'", raw))?,
            ),
        };

        let due_date = match self.due_date.trim() {
            "" => None,
            raw => Some(
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| format!("Due date must be YYYY-MM-DD, got '{}'", raw))?,
            ),
        };

        Ok(TaskDraft {
            title: self.title.clone(),
            description: non_empty(&self.description),
            status: self.status,
            priority: self.priority,
            due_date,
            color: None,
            energy: self.energy,
            executive_function: self.executive_function,
            category: non_empty(&self.category),
            time_estimate,
            subtasks: self.steps.split(';').map(|s| s.to_string()).collect(),
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Task awaiting delete confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub task_id: String,
    pub title: String,
}

/// What a digit key does to a subtask of the selected task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtaskPick {
    Toggle,
    Remove,
}

/// Session controller: owns the task store, the timer engine and the
/// key-value store they hydrate from and write back to.
pub struct AppState {
    pub store: TaskStore,
    pub timer: TimerEngine,
    pub dark_mode: bool,
    kv: Box<dyn KeyValueStore>,
    ticker: Ticker,

    pub focus_mode: FocusMode,
    pub active_tab: TaskStatus,
    pub selected_index: usize,
    pub isolation: IsolationCursor,
    pub sequential: SequentialCursor,
    pub sequential_selected: usize,

    pub ui_mode: UiMode,
    pub input_form: Option<InputFormState>,
    pub pending_delete: Option<PendingDelete>,
    pub subtask_pick: Option<SubtaskPick>,

    /// Most recent write-back failure; the in-memory state stays authoritative
    pub last_write_error: Option<String>,
}

impl AppState {
    pub fn new(kv: Box<dyn KeyValueStore>, state: PersistedState) -> Self {
        let mut app = Self {
            store: TaskStore::new(state.tasks),
            timer: TimerEngine::new(state.timer),
            dark_mode: state.dark_mode,
            kv,
            ticker: Ticker::default(),
            focus_mode: FocusMode::Default,
            active_tab: TaskStatus::Today,
            selected_index: 0,
            isolation: IsolationCursor::default(),
            sequential: SequentialCursor::default(),
            sequential_selected: 0,
            ui_mode: UiMode::Normal,
            input_form: None,
            pending_delete: None,
            subtask_pick: None,
            last_write_error: None,
        };

        // A countdown persisted at zero expires on load
        if app.timer.check_expiry().is_some() {
            app.persist_timer();
        }
        app.ticker
            .rearm(app.timer.settings().is_counting(), Instant::now());
        app
    }

    /// Hydrate a session from the store
    pub fn load(mut kv: Box<dyn KeyValueStore>) -> Result<Self> {
        let state = PersistedState::load(kv.as_mut()).context("Failed to load saved state")?;
        info!(
            tasks = state.tasks.len(),
            dark_mode = state.dark_mode,
            "session loaded"
        );
        Ok(Self::new(kv, state))
    }

    /// Write every record back (session end)
    pub fn save(&mut self) -> Result<()> {
        save_record(self.kv.as_mut(), TASKS_KEY, &self.store.tasks())
            .context("Failed to save tasks")?;
        save_record(self.kv.as_mut(), TIMER_KEY, self.timer.settings())
            .context("Failed to save timer settings")?;
        save_record(self.kv.as_mut(), DARK_MODE_KEY, &self.dark_mode)
            .context("Failed to save dark mode")?;
        info!("session saved");
        Ok(())
    }

    fn write_back<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        match save_record(self.kv.as_mut(), key, &value) {
            Ok(()) => self.last_write_error = None,
            Err(err) => {
                warn!(key, error = %err, "write-back failed, keeping in-memory state");
                self.last_write_error = Some(err.to_string());
            }
        }
    }

    fn persist_tasks(&mut self) {
        let tasks = self.store.tasks().to_vec();
        self.write_back(TASKS_KEY, &tasks);
    }

    fn persist_timer(&mut self) {
        let settings = *self.timer.settings();
        self.write_back(TIMER_KEY, &settings);
    }

    fn persist_dark_mode(&mut self) {
        let dark_mode = self.dark_mode;
        self.write_back(DARK_MODE_KEY, &dark_mode);
    }

    // ---- Task store operations ----

    pub fn create_task(&mut self, draft: TaskDraft) -> Option<String> {
        let id = self.store.create(draft)?;
        self.persist_tasks();
        Some(id)
    }

    pub fn update_task(&mut self, task: Task) {
        if self.store.update(task) {
            self.persist_tasks();
        }
    }

    pub fn toggle_complete(&mut self, task_id: &str) {
        if self.store.toggle_complete(task_id).is_some() {
            self.persist_tasks();
            self.clamp_selection();
        }
    }

    pub fn delete_task(&mut self, task_id: &str) {
        if self.store.delete(task_id) {
            self.persist_tasks();
            self.clamp_selection();
        }
    }

    pub fn toggle_subtask(&mut self, task_id: &str, subtask_id: &str) {
        if self.store.toggle_subtask(task_id, subtask_id).is_some() {
            self.persist_tasks();
        }
    }

    pub fn add_subtask(&mut self, task_id: &str, title: &str) {
        if self.store.add_subtask(task_id, title).is_some() {
            self.persist_tasks();
        }
    }

    pub fn remove_subtask(&mut self, task_id: &str, subtask_id: &str) {
        if self.store.remove_subtask(task_id, subtask_id) {
            self.persist_tasks();
        }
    }

    /// Toggle the n-th (one-based) subtask of a task
    fn toggle_subtask_number(&mut self, task_id: &str, number: usize) {
        let subtask_id = self
            .store
            .get(task_id)
            .and_then(|t| t.subtasks.get(number.wrapping_sub(1)))
            .map(|st| st.id.clone());
        if let Some(subtask_id) = subtask_id {
            self.toggle_subtask(task_id, &subtask_id);
        }
    }

    // ---- Default view ----

    /// Tasks under the active tab
    pub fn visible_tasks(&self) -> Vec<&Task> {
        tab_tasks(self.store.tasks(), self.active_tab)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.visible_tasks().get(self.selected_index).copied()
    }

    fn selected_task_id(&self) -> Option<String> {
        self.selected_task().map(|t| t.id.clone())
    }

    pub fn set_tab(&mut self, tab: TaskStatus) {
        self.active_tab = tab;
        self.selected_index = 0;
    }

    pub fn next_tab(&mut self) {
        self.set_tab(self.active_tab.next());
    }

    pub fn move_selection_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.visible_tasks().len() {
            self.selected_index += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let visible = self.visible_tasks().len();
        if self.selected_index >= visible {
            self.selected_index = visible.saturating_sub(1);
        }
        let rows = incomplete_tasks(self.store.tasks()).len();
        if self.sequential_selected >= rows {
            self.sequential_selected = rows.saturating_sub(1);
        }
    }

    pub fn toggle_selected_complete(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.toggle_complete(&id);
        }
    }

    /// Ask for confirmation before deleting the selected task
    pub fn request_delete_selected(&mut self) {
        if let Some(task) = self.selected_task() {
            self.pending_delete = Some(PendingDelete {
                task_id: task.id.clone(),
                title: task.title.clone(),
            });
            self.ui_mode = UiMode::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Some(pending) = self.pending_delete.take() {
            self.delete_task(&pending.task_id);
        }
        self.ui_mode = UiMode::Normal;
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Wait for a digit naming a subtask of the selected task
    pub fn start_subtask_pick(&mut self, pick: SubtaskPick) {
        if self.selected_task().is_some_and(|t| !t.subtasks.is_empty()) {
            self.subtask_pick = Some(pick);
        }
    }

    pub fn finish_subtask_pick(&mut self, number: usize) {
        let Some(pick) = self.subtask_pick.take() else {
            return;
        };
        let Some(task_id) = self.selected_task_id() else {
            return;
        };
        match pick {
            SubtaskPick::Toggle => self.toggle_subtask_number(&task_id, number),
            SubtaskPick::Remove => {
                let subtask_id = self
                    .store
                    .get(&task_id)
                    .and_then(|t| t.subtasks.get(number.wrapping_sub(1)))
                    .map(|st| st.id.clone());
                if let Some(subtask_id) = subtask_id {
                    self.remove_subtask(&task_id, &subtask_id);
                }
            }
        }
    }

    pub fn cancel_subtask_pick(&mut self) {
        self.subtask_pick = None;
    }

    pub fn daily_progress(&self) -> DailyProgress {
        daily_progress(self.store.tasks(), Local::now().date_naive())
    }

    pub fn window_title(&self) -> String {
        window_title(self.store.incomplete_count())
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
        self.persist_dark_mode();
    }

    // ---- Focus modes ----

    /// Switch navigation flow; cursors start fresh each time
    pub fn enter_focus_mode(&mut self, mode: FocusMode) {
        self.focus_mode = mode;
        self.isolation = IsolationCursor::default();
        self.sequential = SequentialCursor::default();
        self.sequential_selected = 0;
        info!(mode = ?mode, "focus mode entered");
    }

    pub fn exit_focus_mode(&mut self) {
        self.enter_focus_mode(FocusMode::Default);
    }

    /// Complete the current task and move the cursor in one action
    pub fn isolation_complete_current(&mut self) {
        let Some(id) = self.isolation.current(self.store.tasks()).map(|t| t.id.clone()) else {
            return;
        };
        self.toggle_complete(&id);
        self.isolation.advance(self.store.tasks());
    }

    pub fn isolation_skip(&mut self) {
        self.isolation.advance(self.store.tasks());
    }

    pub fn isolation_toggle_subtask(&mut self, number: usize) {
        if let Some(id) = self.isolation.current(self.store.tasks()).map(|t| t.id.clone()) {
            self.toggle_subtask_number(&id, number);
        }
    }

    pub fn sequential_move_up(&mut self) {
        self.sequential_selected = self.sequential_selected.saturating_sub(1);
    }

    pub fn sequential_move_down(&mut self) {
        if self.sequential_selected + 1 < incomplete_tasks(self.store.tasks()).len() {
            self.sequential_selected += 1;
        }
    }

    /// Expand or collapse the highlighted row
    pub fn sequential_select_highlighted(&mut self) {
        let id = incomplete_tasks(self.store.tasks())
            .get(self.sequential_selected)
            .map(|t| t.id.clone());
        if let Some(id) = id {
            self.sequential.select(&id);
        }
    }

    /// Mark the expanded task complete; the list shrinks and nothing advances
    pub fn sequential_complete_expanded(&mut self) {
        if let Some(id) = self.sequential.expanded_task(self.store.tasks()).map(|t| t.id.clone()) {
            self.toggle_complete(&id);
        }
    }

    pub fn sequential_toggle_subtask(&mut self, number: usize) {
        if let Some(id) = self.sequential.expanded_task(self.store.tasks()).map(|t| t.id.clone()) {
            self.toggle_subtask_number(&id, number);
        }
    }

    // ---- Timer ----

    pub fn timer_settings(&self) -> &TimerSettings {
        self.timer.settings()
    }

    /// Persist and restart the tick source after any timer mutation
    fn after_timer_change(&mut self, now: Instant) {
        self.timer.check_expiry();
        self.persist_timer();
        self.ticker.rearm(self.timer.settings().is_counting(), now);
    }

    pub fn toggle_timer(&mut self, now: Instant) {
        self.timer.toggle_start_pause();
        self.after_timer_change(now);
    }

    pub fn switch_phase(&mut self, now: Instant) -> Phase {
        let phase = self.timer.switch_phase();
        self.after_timer_change(now);
        phase
    }

    pub fn set_durations(&mut self, work_secs: u32, break_secs: u32, now: Instant) {
        self.timer.set_durations(work_secs, break_secs);
        self.after_timer_change(now);
    }

    /// Nudge the work length by `delta` seconds, not below one minute
    pub fn adjust_work_duration(&mut self, delta: i64, now: Instant) {
        let settings = *self.timer.settings();
        let work = adjust_secs(settings.work_duration, delta);
        self.set_durations(work, settings.break_duration, now);
    }

    /// Nudge the break length by `delta` seconds, not below one minute
    pub fn adjust_break_duration(&mut self, delta: i64, now: Instant) {
        let settings = *self.timer.settings();
        let brk = adjust_secs(settings.break_duration, delta);
        self.set_durations(settings.work_duration, brk, now);
    }

    /// Service the tick source. Returns whether the timer changed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        if !self.ticker.fire(now) {
            return false;
        }
        let moved = self.timer.tick();
        self.after_timer_change(now);
        moved
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_armed()
    }

    // ---- Input form ----

    pub fn start_add_task(&mut self) {
        self.input_form = Some(InputFormState::for_new_task());
        self.ui_mode = UiMode::AddingTask;
    }

    /// Open the edit form for the task the current view points at
    pub fn start_edit_task(&mut self) {
        let task = match self.focus_mode {
            FocusMode::Default => self.selected_task(),
            FocusMode::Isolation => self.isolation.current(self.store.tasks()),
            FocusMode::Sequential => self.sequential.expanded_task(self.store.tasks()),
        };
        if let Some(task) = task {
            self.input_form = Some(InputFormState::for_task(task));
            self.ui_mode = UiMode::EditingTask;
        }
    }

    pub fn start_add_subtask(&mut self) {
        let task_id = match self.focus_mode {
            FocusMode::Default => self.selected_task_id(),
            FocusMode::Isolation => self
                .isolation
                .current(self.store.tasks())
                .map(|t| t.id.clone()),
            FocusMode::Sequential => self
                .sequential
                .expanded_task(self.store.tasks())
                .map(|t| t.id.clone()),
        };
        if let Some(task_id) = task_id {
            self.input_form = Some(InputFormState::for_subtask(&task_id));
            self.ui_mode = UiMode::AddingSubtask;
        }
    }

    /// Move focus to the next (or previous) field
    pub fn input_form_next_field(&mut self, backwards: bool) {
        if let Some(form) = &mut self.input_form {
            let fields = form.fields();
            let pos = fields.iter().position(|f| *f == form.field).unwrap_or(0);
            let next = if backwards {
                (pos + fields.len() - 1) % fields.len()
            } else {
                (pos + 1) % fields.len()
            };
            form.field = fields[next];
        }
    }

    /// Cycle the value of a choice field
    pub fn input_form_cycle(&mut self) {
        if let Some(form) = &mut self.input_form {
            match form.field {
                FormField::Priority => form.priority = form.priority.next(),
                FormField::Status => form.status = form.status.next_editable(),
                FormField::Energy => {
                    form.energy = match form.energy {
                        None => Some(Energy::Low),
                        Some(Energy::High) => None,
                        Some(energy) => Some(energy.next()),
                    }
                }
                FormField::ExecutiveFunction => {
                    form.executive_function = ExecutiveFunction::cycle(form.executive_function)
                }
                _ => {}
            }
        }
    }

    pub fn input_form_add_char(&mut self, c: char) {
        if let Some(text) = self.input_form.as_mut().and_then(|f| f.text_mut()) {
            text.push(c);
        }
    }

    pub fn input_form_backspace(&mut self) {
        if let Some(text) = self.input_form.as_mut().and_then(|f| f.text_mut()) {
            text.pop();
        }
    }

    /// Submit the form. Invalid input keeps the form open with a message.
    pub fn submit_input_form(&mut self) {
        let Some(form) = self.input_form.take() else {
            return;
        };

        if let FormKind::NewSubtask(task_id) = form.kind.clone() {
            self.add_subtask(&task_id, &form.title);
        } else {
            let draft = match form.to_draft() {
                Ok(draft) => draft,
                Err(message) => {
                    self.input_form = Some(InputFormState {
                        error: Some(message),
                        ..form
                    });
                    return;
                }
            };
            match form.kind {
                FormKind::EditTask(task_id) => {
                    if let Some(existing) = self.store.get(&task_id).cloned() {
                        self.update_task(Task {
                            title: draft.title.trim().to_string(),
                            description: draft.description,
                            status: draft.status,
                            priority: draft.priority,
                            due_date: draft.due_date,
                            energy: draft.energy,
                            executive_function: draft.executive_function,
                            category: draft.category,
                            time_estimate: draft.time_estimate,
                            ..existing
                        });
                    }
                }
                _ => {
                    self.create_task(draft);
                }
            }
        }
        self.ui_mode = UiMode::Normal;
        self.clamp_selection();
    }

    pub fn cancel_input_form(&mut self) {
        self.input_form = None;
        self.ui_mode = UiMode::Normal;
    }
}

fn adjust_secs(current: u32, delta: i64) -> u32 {
    let adjusted = (current as i64 + delta).max(MIN_PHASE_SECS as i64);
    u32::try_from(adjusted).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimerState;
    use crate::persistence::records::corrupt_key;
    use crate::persistence::{load_record, MemoryStore};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn create_test_app() -> AppState {
        AppState::new(Box::new(MemoryStore::new()), PersistedState::default())
    }

    fn app_with(titles: &[&str]) -> (AppState, Vec<String>) {
        let mut app = create_test_app();
        let ids = titles
            .iter()
            .map(|t| app.create_task(TaskDraft::titled(t)).unwrap())
            .collect();
        (app, ids)
    }

    fn stored_tasks(app: &AppState) -> Vec<Task> {
        load_record(app.kv.as_ref(), TASKS_KEY, Vec::new()).unwrap()
    }

    #[test]
    fn test_app_state_new() {
        let app = create_test_app();
        assert!(app.store.is_empty());
        assert_eq!(app.focus_mode, FocusMode::Default);
        assert_eq!(app.active_tab, TaskStatus::Today);
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(!app.is_ticking());
    }

    #[test]
    fn test_mutations_write_back_immediately() {
        let (mut app, ids) = app_with(&["A", "B"]);
        assert_eq!(stored_tasks(&app).len(), 2);

        app.toggle_complete(&ids[0]);
        assert!(stored_tasks(&app)[0].completed);

        app.add_subtask(&ids[1], "step");
        assert_eq!(stored_tasks(&app)[1].subtasks.len(), 1);

        app.delete_task(&ids[0]);
        assert_eq!(stored_tasks(&app).len(), 1);
    }

    #[test]
    fn test_failed_write_keeps_session_going() {
        let mut kv = MemoryStore::new();
        kv.set_fail_writes(true);
        let mut app = AppState::new(Box::new(kv), PersistedState::default());

        let id = app.create_task(TaskDraft::titled("A")).unwrap();
        assert!(app.last_write_error.is_some());
        assert_eq!(app.store.len(), 1);

        app.toggle_complete(&id);
        assert!(app.store.get(&id).unwrap().completed);
    }

    #[test]
    fn test_load_hydrates_from_store() {
        let mut kv = MemoryStore::new();
        let tasks = vec![TaskDraft::titled("Saved").into_task()];
        save_record(&mut kv, TASKS_KEY, &tasks).unwrap();
        save_record(&mut kv, DARK_MODE_KEY, &true).unwrap();

        let app = AppState::load(Box::new(kv)).unwrap();
        assert_eq!(app.store.tasks(), tasks.as_slice());
        assert!(app.dark_mode);
        assert_eq!(app.timer_settings(), &TimerSettings::default());
    }

    #[test]
    fn test_undecodable_task_survives_next_write() {
        let mut kv = MemoryStore::new();
        let raw = r#"[
            {"id":"a","title":"Laundry","status":"today","priority":"low",
             "completed":false,"subtasks":[],"dueDate":""},
            {"id":"b","title":"Odd","status":"someday","priority":"low",
             "completed":false,"subtasks":[]}
        ]"#;
        kv.set(TASKS_KEY, raw).unwrap();

        let mut app = AppState::load(Box::new(kv)).unwrap();
        assert_eq!(app.store.len(), 1);

        app.create_task(TaskDraft::titled("New"));
        let titles: Vec<String> = stored_tasks(&app).into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["Laundry".to_string(), "New".to_string()]);

        let kept = app.kv.get(&corrupt_key(TASKS_KEY)).unwrap();
        assert_eq!(kept.as_deref(), Some(raw));
    }

    #[test]
    fn test_persisted_zero_expires_on_load() {
        let state = PersistedState {
            timer: TimerSettings {
                time_remaining: 0,
                is_running: true,
                ..TimerSettings::default()
            },
            ..PersistedState::default()
        };
        let app = AppState::new(Box::new(MemoryStore::new()), state);
        assert!(app.timer_settings().is_break);
        assert_eq!(app.timer_settings().time_remaining, 300);
        assert_eq!(app.timer_settings().state(), TimerState::Idle);
    }

    #[test]
    fn test_tab_selection() {
        let (mut app, ids) = app_with(&["A", "B", "C"]);
        app.move_selection_down();
        app.move_selection_down();
        app.move_selection_down();
        assert_eq!(app.selected_index, 2);

        app.toggle_complete(&ids[2]);
        assert_eq!(app.selected_index, 1);

        app.set_tab(TaskStatus::Completed);
        assert_eq!(app.selected_task().map(|t| t.title.as_str()), Some("C"));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let (mut app, _) = app_with(&["A"]);
        app.request_delete_selected();
        assert_eq!(app.ui_mode, UiMode::ConfirmDelete);
        assert_eq!(app.store.len(), 1);

        app.cancel_delete();
        assert_eq!(app.store.len(), 1);

        app.request_delete_selected();
        app.confirm_delete();
        assert!(app.store.is_empty());
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_subtask_pick() {
        let (mut app, ids) = app_with(&["A"]);
        app.add_subtask(&ids[0], "one");
        app.add_subtask(&ids[0], "two");

        app.start_subtask_pick(SubtaskPick::Toggle);
        app.finish_subtask_pick(2);
        let task = app.store.get(&ids[0]).unwrap();
        assert!(!task.subtasks[0].completed);
        assert!(task.subtasks[1].completed);

        app.start_subtask_pick(SubtaskPick::Remove);
        app.finish_subtask_pick(1);
        let titles: Vec<String> = app
            .store
            .get(&ids[0])
            .unwrap()
            .subtasks
            .iter()
            .map(|s| s.title.clone())
            .collect();
        assert_eq!(titles, vec!["two".to_string()]);

        // Out of range numbers do nothing
        app.start_subtask_pick(SubtaskPick::Remove);
        app.finish_subtask_pick(0);
        app.start_subtask_pick(SubtaskPick::Remove);
        app.finish_subtask_pick(9);
        assert_eq!(app.store.get(&ids[0]).unwrap().subtasks.len(), 1);
    }

    #[test]
    fn test_isolation_combined_complete_and_advance() {
        let (mut app, _) = app_with(&["A", "B", "C"]);
        app.enter_focus_mode(FocusMode::Isolation);

        app.isolation_complete_current();
        assert_eq!(app.isolation.index(), 1);
        let current = app.isolation.current(app.store.tasks()).map(|t| t.title.clone());
        assert_eq!(current.as_deref(), Some("C"));

        app.isolation_complete_current();
        assert_eq!(app.isolation.current(app.store.tasks()), None);
    }

    #[test]
    fn test_focus_cursor_discarded_on_exit() {
        let (mut app, _) = app_with(&["A", "B"]);
        app.enter_focus_mode(FocusMode::Isolation);
        app.isolation_skip();
        assert_eq!(app.isolation.index(), 1);

        app.exit_focus_mode();
        app.enter_focus_mode(FocusMode::Isolation);
        assert_eq!(app.isolation.index(), 0);
    }

    #[test]
    fn test_sequential_flow() {
        let (mut app, ids) = app_with(&["A", "B"]);
        app.add_subtask(&ids[1], "step");
        app.enter_focus_mode(FocusMode::Sequential);

        app.sequential_move_down();
        app.sequential_select_highlighted();
        assert_eq!(app.sequential.expanded_id(), Some(ids[1].as_str()));

        app.sequential_toggle_subtask(1);
        assert!(app.store.get(&ids[1]).unwrap().subtasks[0].completed);

        app.sequential_complete_expanded();
        assert!(app.store.get(&ids[1]).unwrap().completed);
        assert!(app.sequential.expanded_task(app.store.tasks()).is_none());
        assert_eq!(app.sequential_selected, 0);
    }

    #[test]
    fn test_timer_ticks_through_tick_source() {
        let mut app = create_test_app();
        let start = Instant::now();
        app.set_durations(2, 300, start);
        app.switch_phase(start);
        app.switch_phase(start);
        assert_eq!(app.timer_settings().time_remaining, 2);

        app.toggle_timer(start);
        assert!(app.is_ticking());
        assert!(!app.on_tick(start + Duration::from_millis(500)));

        let t1 = start + Duration::from_secs(1);
        assert!(app.on_tick(t1));
        assert_eq!(app.timer_settings().time_remaining, 1);

        let t2 = t1 + Duration::from_secs(1);
        assert!(app.on_tick(t2));
        assert!(app.timer_settings().is_break);
        assert_eq!(app.timer_settings().time_remaining, 300);
        assert!(!app.is_ticking());

        let stored: TimerSettings =
            load_record(app.kv.as_ref(), TIMER_KEY, TimerSettings::default()).unwrap();
        assert_eq!(&stored, app.timer_settings());
    }

    #[test]
    fn test_pause_cancels_tick_source() {
        let mut app = create_test_app();
        let start = Instant::now();
        app.toggle_timer(start);
        assert!(app.is_ticking());
        app.toggle_timer(start);
        assert!(!app.is_ticking());
        assert!(!app.on_tick(start + Duration::from_secs(3)));
        assert_eq!(app.timer_settings().time_remaining, 1500);
    }

    #[test]
    fn test_adjust_durations_clamps() {
        let mut app = create_test_app();
        let now = Instant::now();
        app.adjust_work_duration(60, now);
        assert_eq!(app.timer_settings().work_duration, 1560);
        assert_eq!(app.timer_settings().time_remaining, 1500);

        for _ in 0..10 {
            app.adjust_break_duration(-(DURATION_STEP_SECS as i64), now);
        }
        assert_eq!(app.timer_settings().break_duration, MIN_PHASE_SECS);
    }

    #[test]
    fn test_new_task_form() {
        let mut app = create_test_app();
        app.start_add_task();
        for c in "Pay rent".chars() {
            app.input_form_add_char(c);
        }
        app.input_form_next_field(false); // description
        app.input_form_next_field(false); // priority
        app.input_form_cycle();
        for _ in 0..7 {
            app.input_form_next_field(false);
        }
        assert_eq!(app.input_form.as_ref().unwrap().field, FormField::Steps);
        for c in "find login; pay".chars() {
            app.input_form_add_char(c);
        }
        app.submit_input_form();

        assert!(app.input_form.is_none());
        assert_eq!(app.ui_mode, UiMode::Normal);
        let task = &app.store.tasks()[0];
        assert_eq!(task.title, "Pay rent");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.time_estimate, Some(30));
        assert_eq!(task.subtasks.len(), 2);
        assert_eq!(task.subtasks[1].title, "pay");
    }

    #[test]
    fn test_blank_title_keeps_form_open() {
        let mut app = create_test_app();
        app.start_add_task();
        app.submit_input_form();
        assert!(app.store.is_empty());
        let form = app.input_form.as_ref().unwrap();
        assert_eq!(form.error.as_deref(), Some("Title is required"));
    }

    #[test]
    fn test_bad_due_date_keeps_form_open() {
        let mut app = create_test_app();
        app.start_add_task();
        app.input_form_add_char('X');
        if let Some(form) = app.input_form.as_mut() {
            form.due_date = "next week".to_string();
        }
        app.submit_input_form();
        assert!(app.store.is_empty());
        assert!(app.input_form.as_ref().unwrap().error.is_some());
    }

    #[test]
    fn test_edit_form_leaves_completion_alone() {
        let (mut app, ids) = app_with(&["A"]);
        app.toggle_complete(&ids[0]);
        let completed_at = app.store.get(&ids[0]).unwrap().completed_at;

        app.set_tab(TaskStatus::Completed);
        app.start_edit_task();
        assert_eq!(app.ui_mode, UiMode::EditingTask);
        app.input_form_backspace();
        app.input_form_add_char('Z');
        app.input_form_next_field(false);
        app.input_form_next_field(false);
        app.input_form_next_field(false); // status
        app.input_form_cycle();
        app.submit_input_form();

        let task = app.store.get(&ids[0]).unwrap();
        assert_eq!(task.title, "Z");
        assert_eq!(task.status, TaskStatus::Today);
        assert!(task.completed);
        assert_eq!(task.completed_at, completed_at);
    }

    #[test]
    fn test_add_subtask_form_skips_blank() {
        let (mut app, ids) = app_with(&["A"]);
        app.start_add_subtask();
        app.input_form_add_char(' ');
        app.submit_input_form();
        assert!(app.store.get(&ids[0]).unwrap().subtasks.is_empty());
        assert!(app.input_form.is_none());
    }

    #[test]
    fn test_dark_mode_written_back() {
        let mut app = create_test_app();
        app.toggle_dark_mode();
        let stored: bool = load_record(app.kv.as_ref(), DARK_MODE_KEY, false).unwrap();
        assert!(stored);
    }

    #[test]
    fn test_window_title_tracks_incomplete() {
        let (mut app, ids) = app_with(&["A", "B"]);
        assert_eq!(app.window_title(), "(2) InnerMonk - ADHD Task Manager");
        app.toggle_complete(&ids[0]);
        app.toggle_complete(&ids[1]);
        assert_eq!(app.window_title(), "InnerMonk - ADHD Task Manager");
    }
}
