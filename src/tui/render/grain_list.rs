use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::transitions::grain_rows;
use crate::tui::app::{App, Focus, FocusContext};
use crate::util::unicode::{byte_offset_to_display_col, display_width, truncate_to_width};

/// Width of the focus marker column plus the checkbox
const GUTTER: usize = 6;

/// Render the grain list, newest first.
///
/// Records the element id of every row in `app.rendered_ids` (the focus
/// targets for the next frame) and scrolls so the selected row is visible.
pub fn render_grain_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let rows = grain_rows(&app.state);
    app.rendered_ids = rows.iter().map(|r| r.grain.element_id()).collect();

    if rows.is_empty() {
        let empty = Paragraph::new(" Nothing here yet. Type above and press Enter.")
            .style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    let visible_height = area.height as usize;
    let selected = rows.iter().position(|r| r.is_selected).unwrap_or(0);
    app.list_scroll = adjust_scroll(app.list_scroll, selected, visible_height, rows.len());
    let scroll = app.list_scroll;

    let focused_id = match &app.focus {
        Focus::Element(id) => Some(id.as_str()),
        _ => None,
    };
    let edit_focused = matches!(app.focus_context(), FocusContext::EditInput(_));
    let width = area.width as usize;
    let mut cursor = None;

    let mut lines: Vec<Line> = Vec::new();
    for (i, row) in rows.iter().enumerate().skip(scroll).take(visible_height) {
        let element_id = &app.rendered_ids[i];
        let is_focused = focused_id == Some(element_id.as_str());
        let row_bg = if row.is_selected {
            app.theme.selection_bg
        } else {
            bg
        };

        let mut spans: Vec<Span> = Vec::new();
        let marker = if is_focused { " \u{25B8} " } else { "   " };
        spans.push(Span::styled(
            marker,
            Style::default().fg(app.theme.selection_border).bg(row_bg),
        ));
        let (check, check_color) = if row.grain.done {
            ("[x]", app.theme.done)
        } else {
            ("[ ]", app.theme.dim)
        };
        spans.push(Span::styled(check, Style::default().fg(check_color).bg(row_bg)));

        let title_width = width.saturating_sub(GUTTER + 1);
        if let Some(edit) = row.editing() {
            spans.push(Span::styled(" ", Style::default().bg(row_bg)));
            let shown = truncate_to_width(&edit.title, title_width);
            let pad = title_width.saturating_sub(display_width(&shown));
            spans.push(Span::styled(
                format!("{}{}", shown, " ".repeat(pad)),
                Style::default().fg(app.theme.text_bright).bg(app.theme.edit_bg),
            ));
            if is_focused && edit_focused {
                let col = byte_offset_to_display_col(&edit.title, app.edit_cursor).min(title_width);
                cursor = Some((
                    area.x + (GUTTER + 1 + col) as u16,
                    area.y + (i - scroll) as u16,
                ));
            }
        } else {
            let mut title_style = Style::default().fg(app.theme.text_bright).bg(row_bg);
            if row.grain.done {
                title_style = title_style
                    .fg(app.theme.dim)
                    .add_modifier(Modifier::CROSSED_OUT);
            }
            if row.is_selected {
                title_style = title_style.add_modifier(Modifier::BOLD);
            }
            spans.push(Span::styled(" ", Style::default().bg(row_bg)));
            spans.push(Span::styled(
                truncate_to_width(&row.grain.title, title_width),
                title_style,
            ));
        }

        // Fill the rest of the selected row
        if row.is_selected {
            let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
            if used < width {
                spans.push(Span::styled(
                    " ".repeat(width - used),
                    Style::default().bg(row_bg),
                ));
            }
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
    if let Some(position) = cursor {
        frame.set_cursor_position(position);
    }
}

/// First visible row such that `selected` is on screen
fn adjust_scroll(scroll: usize, selected: usize, visible: usize, len: usize) -> usize {
    if visible == 0 {
        return 0;
    }
    let mut scroll = scroll.min(len.saturating_sub(visible));
    if selected < scroll {
        scroll = selected;
    } else if selected >= scroll + visible {
        scroll = selected + 1 - visible;
    }
    scroll
}
