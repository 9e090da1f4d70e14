use crate::app::{AppState, SubtaskPick, DURATION_STEP_SECS};
use crate::domain::{FocusMode, TaskStatus, UiMode};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

/// Handle keyboard input events. Returns true when the session should end.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> bool {
    handle_key_at(app, key, Instant::now())
}

/// Same as `handle_key` with an explicit clock for the timer controls
pub fn handle_key_at(app: &mut AppState, key: KeyEvent, now: Instant) -> bool {
    match app.ui_mode {
        UiMode::Normal => {
            if app.subtask_pick.is_some() {
                handle_subtask_pick(app, key);
                return false;
            }
            if handle_timer_key(app, key, now) {
                return false;
            }
            match app.focus_mode {
                FocusMode::Default => handle_default_view(app, key),
                FocusMode::Isolation => handle_isolation_view(app, key),
                FocusMode::Sequential => handle_sequential_view(app, key),
            }
        }
        UiMode::AddingTask | UiMode::EditingTask | UiMode::AddingSubtask => {
            handle_input_form_mode(app, key);
            false
        }
        UiMode::ConfirmDelete => {
            handle_confirm_delete(app, key);
            false
        }
    }
}

/// Timer controls work the same in every view. Returns whether the key was used.
fn handle_timer_key(app: &mut AppState, key: KeyEvent, now: Instant) -> bool {
    let step = DURATION_STEP_SECS as i64;
    match key.code {
        // Start / pause / resume
        KeyCode::Char('s') | KeyCode::Char('S') => app.toggle_timer(now),
        // Switch to break / focus
        KeyCode::Char('b') | KeyCode::Char('B') => {
            app.switch_phase(now);
        }
        // Work length
        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_work_duration(step, now),
        KeyCode::Char('-') | KeyCode::Char('_') => app.adjust_work_duration(-step, now),
        // Break length
        KeyCode::Char('>') | KeyCode::Char('.') => app.adjust_break_duration(step, now),
        KeyCode::Char('<') | KeyCode::Char(',') => app.adjust_break_duration(-step, now),
        _ => return false,
    }
    true
}

/// Keys shared by the three views. Returns `Some(quit)` when handled.
fn handle_common_key(app: &mut AppState, key: KeyEvent) -> Option<bool> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(true),
        KeyCode::Char('i') | KeyCode::Char('I') => {
            app.enter_focus_mode(FocusMode::Isolation);
            Some(false)
        }
        KeyCode::Char('f') | KeyCode::Char('F') => {
            app.enter_focus_mode(FocusMode::Sequential);
            Some(false)
        }
        KeyCode::Esc => {
            app.exit_focus_mode();
            Some(false)
        }
        KeyCode::Char('d') | KeyCode::Char('D') => {
            app.toggle_dark_mode();
            Some(false)
        }
        KeyCode::Char('n') | KeyCode::Char('N') if app.focus_mode == FocusMode::Default => {
            app.start_add_task();
            Some(false)
        }
        KeyCode::Char('e') | KeyCode::Char('E') => {
            app.start_edit_task();
            Some(false)
        }
        KeyCode::Char('a') | KeyCode::Char('A') => {
            app.start_add_subtask();
            Some(false)
        }
        _ => None,
    }
}

fn digit(key: KeyEvent) -> Option<usize> {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            c.to_digit(10).map(|d| d as usize)
        }
        _ => None,
    }
}

fn handle_default_view(app: &mut AppState, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),
        KeyCode::Tab => app.next_tab(),
        // Tabs
        KeyCode::Char('1') => app.set_tab(TaskStatus::Today),
        KeyCode::Char('2') => app.set_tab(TaskStatus::Upcoming),
        KeyCode::Char('3') => app.set_tab(TaskStatus::Completed),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('c') | KeyCode::Char('C') => {
            app.toggle_selected_complete()
        }
        KeyCode::Char('t') | KeyCode::Char('T') => app.start_subtask_pick(SubtaskPick::Toggle),
        KeyCode::Char('r') | KeyCode::Char('R') => app.start_subtask_pick(SubtaskPick::Remove),
        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Delete => app.request_delete_selected(),
        _ => return handle_common_key(app, key).unwrap_or(false),
    }
    false
}

fn handle_isolation_view(app: &mut AppState, key: KeyEvent) -> bool {
    if let Some(number) = digit(key) {
        app.isolation_toggle_subtask(number);
        return false;
    }
    match key.code {
        // Mark complete and move on
        KeyCode::Enter | KeyCode::Char('c') | KeyCode::Char('C') => {
            app.isolation_complete_current()
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Right => app.isolation_skip(),
        _ => return handle_common_key(app, key).unwrap_or(false),
    }
    false
}

fn handle_sequential_view(app: &mut AppState, key: KeyEvent) -> bool {
    if let Some(number) = digit(key) {
        app.sequential_toggle_subtask(number);
        return false;
    }
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.sequential_move_up(),
        KeyCode::Down | KeyCode::Char('j') => app.sequential_move_down(),
        // Expand / collapse
        KeyCode::Enter | KeyCode::Char(' ') => app.sequential_select_highlighted(),
        KeyCode::Char('c') | KeyCode::Char('C') => app.sequential_complete_expanded(),
        _ => return handle_common_key(app, key).unwrap_or(false),
    }
    false
}

fn handle_subtask_pick(app: &mut AppState, key: KeyEvent) {
    match digit(key) {
        Some(number) => app.finish_subtask_pick(number),
        None => app.cancel_subtask_pick(),
    }
}

/// Handle keys in input form mode (adding or editing a task, adding a subtask)
fn handle_input_form_mode(app: &mut AppState, key: KeyEvent) {
    let on_text = app
        .input_form
        .as_ref()
        .map(|f| f.field.is_text())
        .unwrap_or(true);

    match key.code {
        KeyCode::Enter => app.submit_input_form(),
        KeyCode::Esc => app.cancel_input_form(),
        KeyCode::Tab | KeyCode::Down => app.input_form_next_field(false),
        KeyCode::BackTab | KeyCode::Up => app.input_form_next_field(true),
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if !on_text => app.input_form_cycle(),
        KeyCode::Backspace => app.input_form_backspace(),
        KeyCode::Char(c) => app.input_form_add_char(c),
        _ => {}
    }
}

/// y confirms, anything else cancels
fn handle_confirm_delete(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(),
        _ => app.cancel_delete(),
    }
}
