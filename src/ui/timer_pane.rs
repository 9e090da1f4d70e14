use crate::app::AppState;
use crate::domain::{format_time, TimerSettings, TimerState};
use crate::ui::styles::{gauge_style, phase_gauge_style, Palette};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

fn state_label(settings: &TimerSettings) -> &'static str {
    match settings.state() {
        TimerState::Idle => "Ready",
        TimerState::Running => "Running",
        TimerState::Paused => "Paused",
    }
}

/// Control hint line, e.g. "[s] Start   [b] Switch to Break"
pub fn controls_line(settings: &TimerSettings) -> String {
    format!(
        "[s] {}   [b] Switch to {}",
        settings.toggle_label(),
        settings.phase().opposite().short_name()
    )
}

/// Render the interval timer: phase, countdown, session progress and controls
pub fn render_timer_pane(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect) {
    let settings = app.timer_settings();
    let phase = settings.phase();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style())
        .style(palette.default_style())
        .title(Span::styled(format!(" {} ", phase.title()), palette.title_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Countdown
            Constraint::Length(1), // State
            Constraint::Length(1), // Gauge
            Constraint::Length(1), // Controls
            Constraint::Length(1), // Durations
            Constraint::Min(0),
        ])
        .split(inner);

    let countdown = Paragraph::new(Line::from(Span::styled(
        format_time(settings.time_remaining),
        palette.title_style().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(countdown, rows[0]);

    let state = Paragraph::new(state_label(settings))
        .style(palette.hint_style())
        .alignment(Alignment::Center);
    f.render_widget(state, rows[1]);

    let progress = settings.progress();
    let gauge = Gauge::default()
        .gauge_style(phase_gauge_style(phase))
        .ratio((progress / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.0}%", progress));
    f.render_widget(gauge, rows[2]);

    let controls = Paragraph::new(controls_line(settings)).alignment(Alignment::Center);
    f.render_widget(controls, rows[3]);

    let durations = Paragraph::new(format!(
        "Work {}m  Break {}m",
        settings.work_duration / 60,
        settings.break_duration / 60
    ))
    .style(palette.hint_style())
    .alignment(Alignment::Center);
    f.render_widget(durations, rows[4]);
}

/// Render today's progress summary
pub fn render_progress_pane(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect) {
    let progress = app.daily_progress();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style())
        .style(palette.default_style())
        .title(Span::styled(" Today's Progress ", palette.title_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let gauge = Gauge::default()
        .gauge_style(gauge_style())
        .ratio((progress.percent() / 100.0).clamp(0.0, 1.0))
        .label(format!("{}%", progress.rounded_percent()));
    f.render_widget(gauge, rows[0]);

    f.render_widget(Paragraph::new(progress.summary_line()), rows[1]);
    f.render_widget(
        Paragraph::new(format!("{} remaining for today", progress.remaining_today))
            .style(palette.hint_style()),
        rows[2],
    );
}
