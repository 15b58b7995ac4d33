//! Executor panels: one task-occupancy chart per executor.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use flockwatch_types::ExecutorSnapshot;

use crate::app::{App, ExecutorPanel};

/// One-line summary printed above a chart.
pub fn summary_line(executor: &ExecutorSnapshot) -> String {
    format!(
        "Executor {} at {}  Tasks completed: {}  Duration: {:.2}s  Input: {:.2}MB",
        executor.id,
        executor.host_port,
        executor.total_tasks,
        executor.duration_per_core_secs(),
        executor.input_megabytes()
    )
}

/// Render every panel, stacked vertically and sharing `area` evenly.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let constraints = vec![Constraint::Ratio(1, app.panels.len() as u32); app.panels.len()];
    let areas = Layout::vertical(constraints).split(area);

    for (index, (panel, area)) in app.panels.iter().zip(areas.iter()).enumerate() {
        render_panel(frame, app, panel, index, *area);
    }
}

fn render_panel(frame: &mut Frame, app: &App, panel: &ExecutorPanel, index: usize, area: Rect) {
    let [summary_area, chart_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).areas(area);

    let summary = match &panel.executor {
        Some(executor) => Paragraph::new(summary_line(executor)),
        None => Paragraph::new(format!("Executor #{} not reported yet", index + 1))
            .style(Style::default().add_modifier(Modifier::DIM)),
    };
    frame.render_widget(summary, summary_area);

    let points = panel.series.points();
    let color = app.theme.series_color(index);
    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&points);

    let y_max = panel.series.max().max(1) as f64;
    let x_max = panel.series.capacity().saturating_sub(1) as f64;
    let title = match panel.series.latest() {
        Some(tasks) => format!(" {} active ", tasks),
        None => " - ".to_string(),
    };

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .x_axis(Axis::default().bounds([0.0, x_max]))
        .y_axis(
            Axis::default()
                .bounds([0.0, y_max])
                .labels(vec![Span::raw("0"), Span::raw(format!("{}", y_max as u64))]),
        );

    frame.render_widget(chart, chart_area);
}
