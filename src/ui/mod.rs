pub mod focus_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod styles;
pub mod timer_pane;

use crate::app::AppState;
use crate::domain::FocusMode;
use focus_pane::{render_isolation_pane, render_sequential_pane};
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use modal::render_confirm_delete_modal;
use ratatui::{widgets::Paragraph, Frame};
use styles::{error_style, Palette};
use timer_pane::{render_progress_pane, render_timer_pane};

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);
    let palette = Palette::for_mode(app.dark_mode);

    // Render keybindings bar
    render_keybindings(f, app, &palette, layout.keybindings_area);

    // Main pane follows the focus mode
    match app.focus_mode {
        FocusMode::Default => render_list_pane(f, app, &palette, layout.main_area),
        FocusMode::Isolation => render_isolation_pane(f, app, &palette, layout.main_area),
        FocusMode::Sequential => render_sequential_pane(f, app, &palette, layout.main_area),
    }

    render_timer_pane(f, app, &palette, layout.timer_area);
    render_progress_pane(f, app, &palette, layout.progress_area);

    // Status bar: write-back failures stay visible until the next good write
    let status = match &app.last_write_error {
        Some(err) => Paragraph::new(format!(" Not saved: {}", err)).style(error_style()),
        None => Paragraph::new(format!(" {}", app.window_title())).style(palette.hint_style()),
    };
    f.render_widget(status, layout.status_area);

    // Render confirm modal if active
    if app.pending_delete.is_some() {
        render_confirm_delete_modal(f, app, size);
    }

    // Render input form if active
    if app.input_form.is_some() {
        render_input_form(f, app, size);
    }
}
