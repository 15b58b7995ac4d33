//! Common UI components: header bar, status bar and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

/// Render the header bar: application id, cluster size and elapsed time.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref telemetry) = app.telemetry else {
        let line = Line::from(vec![
            Span::styled(" FLOCKWATCH ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| Waiting for the first poll..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let totals = telemetry.totals();
    let mut spans = vec![
        Span::styled(" FLOCKWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(telemetry.app_id.clone(), Style::default().fg(app.theme.highlight)),
        Span::raw(" │ "),
        Span::styled(
            totals.executors.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" executors │ "),
        Span::raw(format!("{} tasks", totals.total_tasks)),
        Span::raw(format!(" │ {:.2}MB in", totals.input_megabytes)),
    ];
    if let Some(elapsed) = telemetry.elapsed_secs() {
        spans.push(Span::raw(format!(" │ up {:.0}s", elapsed)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the status bar at the bottom.
///
/// Shows: source, time since last update, available controls.
/// Also displays temporary status messages and the last poll error.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(ref err) = app.last_error {
        let paragraph = Paragraph::new(format!(" Error: {} | r:retry q:quit", err))
            .style(Style::default().fg(app.theme.error));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = match app.last_updated {
        Some(at) => format!(
            " {} | Updated {:.1}s ago | r:refresh e:export ?:help q:quit",
            app.source_description(),
            at.elapsed().as_secs_f64(),
        ),
        None => format!(" {} | Loading... | q:quit", app.source_description()),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the dashboard.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from("  r         Refresh now"),
        Line::from("  e         Export to JSON"),
        Line::from("  ?         Toggle this help"),
        Line::from("  q / Esc   Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 36u16.min(area.width.saturating_sub(4));
    let help_height = 10u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
