use crate::app::AppState;
use crate::domain::{FocusMode, UiMode};
use crate::ui::styles::Palette;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Hints for the current view
pub fn hints_for(app: &AppState) -> &'static [&'static str] {
    if app.subtask_pick.is_some() {
        return &["1-9 pick step", "any other key cancels"];
    }
    match app.ui_mode {
        UiMode::AddingTask | UiMode::EditingTask | UiMode::AddingSubtask => {
            &["Tab/↑↓ field", "←/→ choose", "Enter save", "Esc cancel"]
        }
        UiMode::ConfirmDelete => &["y delete", "any other key cancels"],
        UiMode::Normal => match app.focus_mode {
            FocusMode::Default => &[
                "↑/↓ select",
                "1-3/Tab tab",
                "Enter done",
                "n new",
                "e edit",
                "a step",
                "t/r tick/remove step",
                "x delete",
                "s timer",
                "b switch",
                "+/- work",
                ">/< break",
                "i isolate",
                "f sequence",
                "d dark",
                "q quit",
            ],
            FocusMode::Isolation => &[
                "Enter done+next",
                "n skip",
                "1-9 step",
                "e edit",
                "a step",
                "s timer",
                "b switch",
                "Esc exit",
                "q quit",
            ],
            FocusMode::Sequential => &[
                "↑/↓ move",
                "Enter expand",
                "c done",
                "1-9 step",
                "e edit",
                "a step",
                "s timer",
                "b switch",
                "Esc exit",
                "q quit",
            ],
        },
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect) {
    let spans: Vec<Span> = hints_for(app)
        .iter()
        .map(|hint| Span::raw(format!(" {}  ", hint)))
        .collect();

    let paragraph = Paragraph::new(Line::from(spans)).style(palette.hint_style());
    f.render_widget(paragraph, area);
}
