//! Terminal UI rendering using ratatui.
//!
//! ## Submodules
//!
//! - [`executors`]: one task-occupancy chart per executor panel
//! - [`stage`]: active stage title, progress gauge and task table
//! - [`common`]: header, status bar and help overlay
//! - [`theme`]: light/dark theme support with terminal auto-detection
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Executor charts (executors::render)  │
//! ├──────────────────────────────────────┤
//! │ Active stage (stage::render)         │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//! ```
//!
//! The whole screen is redrawn every frame from `App`.

pub mod common;
pub mod executors;
pub mod stage;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

/// Minimum terminal size for usable display.
pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 20;

/// Rows of the stage section around its task table: title, gauge, table
/// borders and header.
const STAGE_CHROME: u16 = 5;

/// Draw the whole dashboard.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let centered = Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5.min(area.height));
        frame.render_widget(paragraph, centered);
        return;
    }

    let stage_height = (app.task_rows() as u16).saturating_add(STAGE_CHROME);
    let [header, charts, stage_area, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(8),
        Constraint::Length(stage_height),
        Constraint::Length(1),
    ])
    .areas(area);

    common::render_header(frame, app, header);
    executors::render(frame, app, charts);
    stage::render(frame, app, stage_area);
    common::render_status_bar(frame, app, status);

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::DashboardOptions;
    use crate::poller::{Poller, PollerOptions};
    use crate::source::mock::{busy_cluster, FixedAppId};
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    #[tokio::test]
    async fn renders_executors_and_stage() {
        let api = busy_cluster();
        let poller = Poller::new(
            Box::new(api.clone()),
            Box::new(FixedAppId::new("app-1", None)),
            PollerOptions::default(),
        );
        let mut app = App::with_theme(poller, DashboardOptions::default(), Theme::dark());
        app.refresh().await;

        let mut terminal = Terminal::new(TestBackend::new(120, 50)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let screen = screen(&terminal);
        assert!(screen.contains("Executor 1 at node1:40001"));
        assert!(screen.contains("Executor 3 at node3:40003"));
        assert!(screen.contains("[4] collect at FlockFinder.scala:210"));
        assert!(screen.contains("Tasks 6/10"));
        assert!(screen.contains("1.2 min"));
    }

    #[test]
    fn small_terminal_shows_notice() {
        let poller = Poller::new(
            Box::new(busy_cluster()),
            Box::new(FixedAppId::new("app-1", None)),
            PollerOptions::default(),
        );
        let app = App::with_theme(poller, DashboardOptions::default(), Theme::dark());

        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
        assert!(screen(&terminal).contains("Terminal too small"));
    }
}
