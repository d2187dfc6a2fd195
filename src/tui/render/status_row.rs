use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, FocusContext};
use crate::util::unicode::display_width;

/// Render the status row (bottom of screen): grain counts on the left, key
/// hints for the focused widget on the right
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let total = app.state.lookup.len();
    let done = app.state.lookup.values().filter(|g| g.done).count();
    let summary = match total {
        0 => " no grains".to_string(),
        1 => format!(" 1 grain, {} done", done),
        n => format!(" {} grains, {} done", n, done),
    };
    let mut spans = vec![Span::styled(
        summary,
        Style::default().fg(app.theme.dim).bg(bg),
    )];

    if app.show_key_hints {
        let hint = hint_for(app.focus_context());
        let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        let hint_width = display_width(hint);
        if content_width + hint_width < width {
            let padding = width - content_width - hint_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}

fn hint_for(context: FocusContext<'_>) -> &'static str {
    match context {
        FocusContext::TopInput => "Enter add  \u{2191}\u{2193} list  Tab next  ^Q quit ",
        FocusContext::ListItem(_) => "Enter edit  Space done  Del delete  ? help ",
        FocusContext::EditInput(_) => "Enter save  Esc cancel ",
        FocusContext::Body => "Tab focus  \u{2191}\u{2193} list  ^Q quit ",
    }
}
