use std::time::Instant;

use crossterm::event::KeyEvent;
use log::warn;

use crate::model::grain_id_from_element;
use crate::ops::transitions::{delete_grain, set_done, start_editing_selected_trigger};
use crate::tui::app::{App, Focus};

use super::KeyOutcome;
use super::hotkeys::{bindings, dispatch};

#[derive(Clone, Copy)]
enum ListItemAction {
    StartEdit,
    ToggleDone,
    Remove,
    ToggleHelp,
    LeaveList,
}

/// Keys on a focused grain row. `element_id` is the row's element id.
pub(super) fn handle_list_item_key(
    app: &mut App,
    element_id: &str,
    key: &KeyEvent,
    now: Instant,
) -> KeyOutcome {
    let table = bindings(&[
        ("Enter", ListItemAction::StartEdit),
        ("Space", ListItemAction::ToggleDone),
        ("Delete", ListItemAction::Remove),
        ("?", ListItemAction::ToggleHelp),
        ("Escape", ListItemAction::LeaveList),
    ]);
    let action = match dispatch(&table, key) {
        Some(action) => *action,
        None => return KeyOutcome::PassThrough,
    };
    let grain_id = match grain_id_from_element(element_id) {
        Some(id) => id.to_string(),
        None => return KeyOutcome::PassThrough,
    };

    match action {
        ListItemAction::StartEdit => {
            // Only the selected row enters edit mode
            if app.selected_element_id().as_deref() == Some(element_id) {
                let effect = app.apply(start_editing_selected_trigger);
                app.edit_cursor = app.state.edit.as_ref().map_or(0, |e| e.title.len());
                app.schedule(Some(effect), now);
            }
        }
        ListItemAction::ToggleDone => {
            let done = app.state.lookup.get(&grain_id).is_some_and(|g| g.done);
            if let Err(e) = app.apply(|s| set_done(s, &grain_id, !done)) {
                warn!("toggle done failed: {}", e);
            }
        }
        ListItemAction::Remove => {
            app.apply(|s| delete_grain(s, &grain_id));
            app.focus = Focus::Body;
            if app.focus_scheduler.pending().map(String::as_str) == Some(element_id) {
                app.focus_scheduler.cancel();
            }
        }
        ListItemAction::ToggleHelp => app.show_help = !app.show_help,
        ListItemAction::LeaveList => app.focus = Focus::TopInput,
    }
    KeyOutcome::Handled
}
