pub mod grain_list;
pub mod help_overlay;
pub mod status_row;
pub mod top_input;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::App;

/// Draw one frame: input box, grain list, status row and any overlay
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: top input (3 rows) | grain list | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // bordered input
            Constraint::Min(1),    // grain list
            Constraint::Length(1), // status row
        ])
        .split(area);

    top_input::render_top_input(frame, app, chunks[0]);
    grain_list::render_grain_list(frame, app, chunks[1]);
    status_row::render_status_row(frame, app, chunks[2]);
    app.awaiting_draw = false;

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }
}
