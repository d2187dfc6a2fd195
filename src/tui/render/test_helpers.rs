use chrono::{Duration, TimeZone, Utc};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::store::MemoryStore;
use crate::model::{AppState, Config, Grain};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// State holding one grain per title, listed in the given order (the first
/// title is the newest), with the first row selected.
pub fn state_with_titles(titles: &[&str]) -> AppState {
    let base = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let mut state = AppState::default();
    for (i, title) in titles.iter().enumerate() {
        state
            .lookup
            .insert(Grain::with_title(*title, base - Duration::seconds(i as i64)));
    }
    if !titles.is_empty() {
        state.selected_index = 0;
    }
    state
}

/// An app over [`state_with_titles`] backed by a memory store, focus on the
/// top input, drawn once so its rows are focus targets.
pub fn app_with_titles(titles: &[&str]) -> App {
    let mut app = App::new(
        state_with_titles(titles),
        Box::new(MemoryStore::new()),
        &Config::default(),
    );
    rerender(&mut app);
    app
}

/// Draw the whole app into a test terminal and return the text
pub fn render_app(app: &mut App) -> String {
    render_to_string(TERM_W, TERM_H, |frame, _| crate::tui::render::render(frame, app))
}

/// Draw the whole app, discarding the output
pub fn rerender(app: &mut App) {
    render_app(app);
}
