use std::time::Instant;

use crossterm::event::KeyEvent;
use log::debug;

use crate::ops::transitions::{Effect, move_selection_by};
use crate::tui::app::{App, Focus, FocusContext};

use super::KeyOutcome;
use super::hotkeys::{bindings, dispatch};

/// Window-level arrow handling, run for every key before the focused widget.
///
/// Up/Down first bring focus back to the selected grain's row if it is
/// elsewhere; once the row has focus they move the selection with
/// wraparound.
pub(super) fn handle_window_key(app: &mut App, key: &KeyEvent, now: Instant) -> KeyOutcome {
    let table = bindings(&[("ArrowUp", -1i64), ("ArrowDown", 1i64)]);
    let offset = match dispatch(&table, key) {
        Some(offset) => *offset,
        None => return KeyOutcome::PassThrough,
    };

    match app.focus_context() {
        // The edit input keeps its row; arrows do nothing while editing
        FocusContext::EditInput(_) => return KeyOutcome::Suppressed,
        FocusContext::TopInput | FocusContext::Body => {
            if offset < 0 {
                debug!("arrow up suppressed in {:?}", app.focus);
            }
        }
        FocusContext::ListItem(_) => {}
    }

    match app.selected_element_id() {
        Some(selected) if app.focus != Focus::Element(selected.clone()) => {
            app.schedule(Some(Effect::FocusElement(selected)), now);
        }
        _ => {
            let effect = app.apply(|s| move_selection_by(s, offset));
            app.schedule(effect, now);
        }
    }
    KeyOutcome::Handled
}
