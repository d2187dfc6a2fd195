use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{App, FocusContext};
use crate::util::unicode::byte_offset_to_display_col;

const PLACEHOLDER: &str = "What needs doing?";

/// Render the bordered "new grain" input
pub fn render_top_input(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let focused = app.focus_context() == FocusContext::TopInput;
    let border_color = if focused {
        app.theme.highlight
    } else {
        app.theme.border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color).bg(bg))
        .title(Span::styled(" New grain ", Style::default().fg(app.theme.dim).bg(bg)));
    let inner = block.inner(area);

    let value = &app.state.input_value;
    let line = if value.is_empty() {
        Line::from(Span::styled(PLACEHOLDER, Style::default().fg(app.theme.dim).bg(bg)))
    } else {
        Line::from(Span::styled(
            value.as_str(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ))
    };

    // Keep the cursor inside the box by scrolling the text left
    let cursor_col = byte_offset_to_display_col(value, app.input_cursor);
    let inner_w = inner.width as usize;
    let offset = if inner_w == 0 {
        0
    } else {
        cursor_col.saturating_sub(inner_w - 1)
    };

    let paragraph = Paragraph::new(line)
        .block(block)
        .style(Style::default().bg(bg))
        .scroll((0, offset as u16));
    frame.render_widget(paragraph, area);

    if focused && inner.width > 0 && inner.height > 0 {
        let col = (cursor_col - offset) as u16;
        frame.set_cursor_position((inner.x + col, inner.y));
    }
}
