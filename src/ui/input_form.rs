use crate::app::{AppState, FormField, FormKind, InputFormState};
use crate::ui::{
    layout::create_modal_area,
    styles::{error_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn field_label(field: FormField) -> &'static str {
    match field {
        FormField::Title => "Title",
        FormField::Description => "Description",
        FormField::Priority => "Priority",
        FormField::Status => "Status",
        FormField::Energy => "Energy",
        FormField::ExecutiveFunction => "Executive function",
        FormField::Estimate => "Estimate (minutes)",
        FormField::DueDate => "Due date (YYYY-MM-DD)",
        FormField::Category => "Category",
        FormField::Steps => "Steps (separate with ;)",
    }
}

/// Current value of a field as displayed
pub fn field_value(form: &InputFormState, field: FormField) -> String {
    match field {
        FormField::Title => form.title.clone(),
        FormField::Description => form.description.clone(),
        FormField::Priority => form.priority.label().to_string(),
        FormField::Status => form.status.label().to_string(),
        FormField::Energy => form.energy.map(|e| e.label()).unwrap_or("none").to_string(),
        FormField::ExecutiveFunction => form
            .executive_function
            .map(|ef| ef.label())
            .unwrap_or("none")
            .to_string(),
        FormField::Estimate => form.estimate.clone(),
        FormField::DueDate => form.due_date.clone(),
        FormField::Category => form.category.clone(),
        FormField::Steps => form.steps.clone(),
    }
}

/// Render the input form for adding/editing tasks and adding subtasks
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(form) = &app.input_form {
        let fields = form.fields();
        let modal_area = create_modal_area(area, fields.len() as u16 + 7);

        // Clear the area behind the form
        f.render_widget(Clear, modal_area);

        let title_text = match form.kind {
            FormKind::NewTask => " Add Task ",
            FormKind::EditTask(_) => " Edit Task ",
            FormKind::NewSubtask(_) => " Add Step ",
        };

        let mut lines = vec![Line::raw("")];
        for field in fields {
            let focused = *field == form.field;
            let mut spans = vec![
                Span::raw(if focused { "> " } else { "  " }),
                Span::raw(format!("{}: ", field_label(*field))),
            ];
            let value = field_value(form, *field);
            if field.is_text() {
                spans.push(Span::styled(value, modal_title_style()));
                if focused {
                    spans.push(Span::styled("█", modal_title_style())); // Cursor
                }
            } else if focused {
                spans.push(Span::styled(format!("< {} >", value), modal_title_style()));
            } else {
                spans.push(Span::styled(value, modal_title_style()));
            }
            lines.push(Line::from(spans));
        }
        lines.push(Line::raw(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(error.clone(), error_style())));
        }
        lines.push(Line::raw("Tab to switch fields  ·  Enter to save  ·  Esc to cancel"));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(title_text, modal_title_style()))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}
