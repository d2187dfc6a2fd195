use std::time::Instant;

use crossterm::event::KeyEvent;

use crate::ops::transitions::{cancel_edit_mode, end_edit_mode_trigger};
use crate::tui::app::App;

use super::KeyOutcome;
use super::hotkeys::{bindings, dispatch};

#[derive(Clone, Copy)]
enum EditAction {
    Commit,
    Cancel,
}

/// Keys in the inline edit input. Text editing is the default action.
pub(super) fn handle_edit_key(app: &mut App, key: &KeyEvent, now: Instant) -> KeyOutcome {
    let table = bindings(&[("Enter", EditAction::Commit), ("Escape", EditAction::Cancel)]);
    match dispatch(&table, key) {
        Some(EditAction::Commit) => {
            let effect = app.apply(end_edit_mode_trigger);
            app.schedule(Some(effect), now);
            KeyOutcome::Handled
        }
        Some(EditAction::Cancel) => {
            // Focus stays on the row, which goes back to showing its title
            app.apply(cancel_edit_mode);
            KeyOutcome::Handled
        }
        None => KeyOutcome::PassThrough,
    }
}
