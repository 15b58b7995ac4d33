//! Active stage: title, task progress and the longest-running tasks.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table},
    Frame,
};

use flockwatch_types::StageSnapshot;

use crate::app::App;

/// `[id] name` title of a stage.
pub fn stage_title(stage: &StageSnapshot) -> String {
    format!("[{}] {}", stage.stage_id, stage.name)
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [title_area, gauge_area, table_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(3),
    ])
    .areas(area);

    let Some(ref active) = app.stage else {
        let paragraph = Paragraph::new("No active stage yet")
            .style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(paragraph, title_area);
        return;
    };

    let title = Paragraph::new(stage_title(&active.stage))
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(title, title_area);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(app.theme.progress))
        .ratio(active.stage.progress())
        .label(format!("Tasks {}", active.stage.progress_label()));
    frame.render_widget(gauge, gauge_area);

    let header = Row::new(vec!["Id", "Status", "Locality", "Executor", "Duration", "Input"])
        .style(app.theme.header)
        .height(1);

    let rows: Vec<Row> = app
        .top_tasks()
        .into_iter()
        .map(|t| {
            Row::new(vec![
                Cell::from(t.task_id.clone()),
                Cell::from(t.status.clone()).style(app.theme.task_style(&t.status)),
                Cell::from(t.locality.clone()),
                Cell::from(t.executor_id.clone()),
                Cell::from(t.duration.clone()),
                Cell::from(t.input.clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Length(14),
        Constraint::Length(9),
        Constraint::Length(10),
        Constraint::Min(12),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(" Longest running tasks ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );

    frame.render_widget(table, table_area);
}
