use crate::app::AppState;
use crate::domain::{IsolationFrame, SequentialRow, Task};
use crate::ui::list_pane::subtask_lines;
use crate::ui::styles::{priority_style, tag_style, Palette};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Heading for the isolation card, e.g. "Task 2 of 5"
pub fn position_label(position: usize, total: usize) -> String {
    format!("Task {} of {}", position, total)
}

/// Detail lines for a single task card
fn task_detail_lines(task: &Task) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let mut meta = vec![Span::styled(
        format!("{} priority", task.priority.label()),
        priority_style(task.priority),
    )];
    if let Some(energy) = task.energy {
        meta.push(Span::raw(format!("  {} energy", energy.label())));
    }
    if let Some(minutes) = task.time_estimate {
        meta.push(Span::raw(format!("  ~{}m", minutes)));
    }
    if let Some(ef) = task.executive_function {
        meta.push(Span::styled(format!("  [{}]", ef.label()), tag_style()));
    }
    lines.push(Line::from(meta));

    if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(Line::raw(""));
        lines.push(Line::raw(description.to_string()));
    }

    if !task.subtasks.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::raw(format!(
            "Steps ({}/{})",
            task.completed_subtasks(),
            task.subtasks.len()
        )));
        lines.extend(subtask_lines(task));
    }

    lines
}

/// Render isolation mode: one task at a time
pub fn render_isolation_pane(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style())
        .style(palette.default_style());

    let (title, lines) = match app.isolation.frame(app.store.tasks()) {
        IsolationFrame::Task {
            task,
            position,
            total,
            can_skip,
        } => {
            let mut lines = vec![
                Line::raw(""),
                Line::from(Span::styled(task.title.clone(), palette.title_style())),
                Line::raw(""),
            ];
            lines.extend(task_detail_lines(task));
            lines.push(Line::raw(""));

            let mut actions = vec![Span::styled("[Enter] Mark Complete", palette.hint_style())];
            if can_skip {
                actions.push(Span::styled("   [n] Skip to Next", palette.hint_style()));
            }
            lines.push(Line::from(actions));

            (format!(" {} ", position_label(position, total)), lines)
        }
        IsolationFrame::AllComplete => (
            " Isolation ".to_string(),
            vec![
                Line::raw(""),
                Line::from(Span::styled("All tasks completed!", palette.title_style())),
                Line::raw(""),
                Line::raw("Press Esc to return to your task list."),
            ],
        ),
    };

    let paragraph = Paragraph::new(lines)
        .block(block.title(Span::styled(title, palette.title_style())))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

/// Row text for the sequential list, e.g. "2. Draft email"
pub fn sequential_row_line(row: &SequentialRow) -> Line<'static> {
    let marker = if row.expanded { "v" } else { ">" };
    Line::from(vec![
        Span::raw(format!("{} {}. ", marker, row.number)),
        Span::raw(row.task.title.clone()),
    ])
}

/// Render sequential mode: numbered steps, one expanded at a time
pub fn render_sequential_pane(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect) {
    let rows = app.sequential.rows(app.store.tasks());

    let mut items: Vec<ListItem> = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        let style = if idx == app.sequential_selected {
            palette.selected_style()
        } else {
            palette.default_style()
        };
        items.push(ListItem::new(sequential_row_line(row)).style(style));

        if row.expanded {
            for line in task_detail_lines(row.task) {
                let mut spans = vec![Span::raw("     ")];
                spans.extend(line.spans);
                items.push(ListItem::new(Line::from(spans)).style(palette.default_style()));
            }
            items.push(
                ListItem::new(Line::raw("     [c] Mark Complete")).style(palette.hint_style()),
            );
        }
    }

    if items.is_empty() {
        items.push(ListItem::new(Line::raw("  All tasks completed!")).style(palette.title_style()));
    }

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border_style())
            .style(palette.default_style())
            .title(Span::styled(" Sequential ", palette.title_style())),
    );
    f.render_widget(list, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskDraft;

    #[test]
    fn test_position_label() {
        assert_eq!(position_label(2, 5), "Task 2 of 5");
    }

    #[test]
    fn test_sequential_row_line() {
        let task = TaskDraft::titled("Draft email").into_task();
        let row = SequentialRow {
            number: 2,
            task: &task,
            expanded: true,
        };
        let text: String = sequential_row_line(&row)
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(text, "v 2. Draft email");
    }

    #[test]
    fn test_task_detail_lines_include_steps() {
        let mut task = TaskDraft::titled("A").into_task();
        task.description = Some("notes".to_string());
        task.subtasks.push(crate::domain::Subtask::new("one".to_string()));

        let lines = task_detail_lines(&task);
        let texts: Vec<String> = lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert!(texts.contains(&"notes".to_string()));
        assert!(texts.contains(&"Steps (0/1)".to_string()));
        assert!(texts.iter().any(|t| t.contains("1. [ ] one")));
    }
}
