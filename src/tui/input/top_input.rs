use std::time::Instant;

use chrono::Utc;
use crossterm::event::KeyEvent;

use crate::ops::transitions::submit_new_grain;
use crate::tui::app::App;

use super::KeyOutcome;
use super::hotkeys::{bindings, dispatch};

#[derive(Clone, Copy)]
enum TopInputAction {
    Submit,
}

pub(super) fn handle_top_input_key(app: &mut App, key: &KeyEvent, now: Instant) -> KeyOutcome {
    let table = bindings(&[("Enter", TopInputAction::Submit)]);
    match dispatch(&table, key) {
        Some(TopInputAction::Submit) => {
            let effect = app.apply(|s| submit_new_grain(s, Utc::now()));
            if effect.is_some() {
                app.input_cursor = 0;
            }
            app.schedule(effect, now);
            KeyOutcome::Handled
        }
        None => KeyOutcome::PassThrough,
    }
}
