use crate::app::AppState;
use crate::domain::{tab_tasks, Task, TaskStatus};
use crate::ui::styles::{done_style, priority_style, tag_style, Palette};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Tabs},
    Frame,
};

/// Tab labels with task counts, e.g. "Today (3)"
fn tab_titles(tasks: &[Task]) -> Vec<String> {
    TaskStatus::all()
        .iter()
        .map(|tab| format!("{} ({})", tab.label(), tab_tasks(tasks, *tab).len()))
        .collect()
}

/// Render the default view: status tabs above the task list
pub fn render_list_pane(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let tabs = Tabs::new(tab_titles(app.store.tasks()))
        .select(app.active_tab.index())
        .style(palette.default_style())
        .highlight_style(palette.selected_style())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border_style())
                .title(Span::styled(" InnerMonk ", palette.title_style())),
        );
    f.render_widget(tabs, chunks[0]);

    let visible = app.visible_tasks();
    let mut items: Vec<ListItem> = Vec::new();
    for (idx, task) in visible.iter().enumerate() {
        let selected = idx == app.selected_index;
        let style = if selected {
            palette.selected_style()
        } else {
            palette.default_style()
        };
        items.push(ListItem::new(create_task_line(task)).style(style));

        // Steps of the selected task, numbered for the pick keys
        if selected {
            for line in subtask_lines(task) {
                items.push(ListItem::new(line).style(palette.default_style()));
            }
        }
    }

    if items.is_empty() {
        items.push(
            ListItem::new(Line::raw("  No tasks here yet. Press n to add one."))
                .style(palette.hint_style()),
        );
    }

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border_style())
            .style(palette.default_style()),
    );
    f.render_widget(list, chunks[1]);
}

fn checkbox(completed: bool) -> &'static str {
    if completed {
        "[x] "
    } else {
        "[ ] "
    }
}

/// Single row for a task
/// Format: [ ] Pay rent  high  ~30m  due 2026-10-20  [home]  (1/3)
pub fn create_task_line(task: &Task) -> Line<'static> {
    let mut spans = vec![Span::raw(checkbox(task.completed))];

    if task.completed {
        spans.push(Span::styled(task.title.clone(), done_style()));
    } else {
        spans.push(Span::raw(task.title.clone()));
    }

    spans.push(Span::raw("  "));
    spans.push(Span::styled(task.priority.label(), priority_style(task.priority)));

    if let Some(minutes) = task.time_estimate {
        spans.push(Span::raw(format!("  ~{}m", minutes)));
    }
    if let Some(due) = task.due_date {
        spans.push(Span::raw(format!("  due {}", due.format("%Y-%m-%d"))));
    }
    if let Some(category) = task.category.as_deref().filter(|c| !c.is_empty()) {
        spans.push(Span::styled(format!("  [{}]", category), tag_style()));
    }
    if !task.subtasks.is_empty() {
        spans.push(Span::raw(format!(
            "  ({}/{})",
            task.completed_subtasks(),
            task.subtasks.len()
        )));
    }

    Line::from(spans)
}

/// Numbered step rows, indented under their task
pub fn subtask_lines(task: &Task) -> Vec<Line<'static>> {
    task.subtasks
        .iter()
        .enumerate()
        .map(|(i, subtask)| {
            let title = if subtask.completed {
                Span::styled(subtask.title.clone(), done_style())
            } else {
                Span::raw(subtask.title.clone())
            };
            Line::from(vec![
                Span::raw(format!("      {}. ", i + 1)),
                Span::raw(checkbox(subtask.completed)),
                title,
            ])
        })
        .collect()
}
