mod edit;
pub mod hotkeys;
mod list_item;
mod text;
mod top_input;
mod window;

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::transitions::{change_edit_title, set_input_value};

use super::app::{App, Focus, FocusContext, TOP_INPUT_ID};
use edit::handle_edit_key;
use hotkeys::{bindings, dispatch, normalize_key};
use list_item::handle_list_item_key;
use text::edit_text;
use top_input::handle_top_input_key;
use window::handle_window_key;

/// What a handler did with a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyOutcome {
    /// An action ran; the default action is skipped
    Handled,
    /// Nothing ran, but the default action is skipped
    Suppressed,
    /// Not bound here
    PassThrough,
}

#[derive(Clone, Copy)]
enum GlobalAction {
    Quit,
}

#[derive(Clone, Copy)]
enum HelpAction {
    Close,
}

/// Handle a key event: window handler, then the focused widget, then the
/// widget's default action if neither took the key.
pub fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    let key = normalize_key(key);

    let global = bindings(&[("ctrl+q", GlobalAction::Quit), ("ctrl+c", GlobalAction::Quit)]);
    if let Some(GlobalAction::Quit) = dispatch(&global, &key) {
        app.should_quit = true;
        return;
    }

    // Help overlay swallows everything until closed
    if app.show_help {
        let help = bindings(&[("Escape", HelpAction::Close), ("?", HelpAction::Close)]);
        if let Some(HelpAction::Close) = dispatch(&help, &key) {
            app.show_help = false;
        }
        return;
    }

    if handle_window_key(app, &key, now) != KeyOutcome::PassThrough {
        return;
    }

    let outcome = match app.focus_context() {
        FocusContext::Body => KeyOutcome::PassThrough,
        FocusContext::TopInput => handle_top_input_key(app, &key, now),
        FocusContext::ListItem(id) => {
            let id = id.to_string();
            handle_list_item_key(app, &id, &key, now)
        }
        FocusContext::EditInput(_) => handle_edit_key(app, &key, now),
    };
    if outcome == KeyOutcome::PassThrough {
        default_action(app, &key);
    }
}

/// What an unhandled key does on its own: text editing inside inputs, and
/// Tab/Shift+Tab focus cycling everywhere.
fn default_action(app: &mut App, key: &KeyEvent) {
    if matches!(key.code, KeyCode::Tab | KeyCode::BackTab) {
        let backward = key.code == KeyCode::BackTab || key.modifiers.contains(KeyModifiers::SHIFT);
        cycle_focus(app, backward);
        return;
    }

    match app.focus_context() {
        FocusContext::TopInput => {
            if let Some(edit) = edit_text(&app.state.input_value, app.input_cursor, key) {
                app.apply(|s| set_input_value(s, edit.text));
                app.input_cursor = edit.cursor;
            }
        }
        FocusContext::EditInput(_) => {
            let title = app.state.edit.as_ref().map_or("", |e| e.title.as_str());
            if let Some(edit) = edit_text(title, app.edit_cursor, key) {
                app.apply(|s| change_edit_title(s, edit.text));
                app.edit_cursor = edit.cursor;
            }
        }
        FocusContext::Body | FocusContext::ListItem(_) => {}
    }
}

/// Move focus along the tab order: the top input, then each rendered row
fn cycle_focus(app: &mut App, backward: bool) {
    let order: Vec<String> = std::iter::once(TOP_INPUT_ID.to_string())
        .chain(app.rendered_ids.iter().cloned())
        .collect();
    let current = match &app.focus {
        Focus::Body => None,
        Focus::TopInput => Some(0),
        Focus::Element(id) => order.iter().position(|o| o == id),
    };
    let n = order.len();
    let next = match (current, backward) {
        (None, false) => 0,
        (None, true) => n - 1,
        (Some(i), false) => (i + 1) % n,
        (Some(i), true) => (i + n - 1) % n,
    };
    app.focus_element(&order[next]);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::tui::render::test_helpers::{app_with_titles, rerender};
    use pretty_assertions::assert_eq;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App, s: &str, now: Instant) {
        for c in s.chars() {
            handle_key(app, press(KeyCode::Char(c)), now);
        }
    }

    /// Redraw, let the focus debounce fire, and redraw again
    fn settle(app: &mut App, now: Instant) -> Instant {
        rerender(app);
        let later = now + app.focus_scheduler.delay() + Duration::from_millis(1);
        app.tick(later);
        rerender(app);
        later
    }

    fn titles(app: &App) -> Vec<String> {
        app.state
            .lookup
            .current_ordering()
            .iter()
            .map(|g| g.title.clone())
            .collect()
    }

    #[test]
    fn typing_and_enter_creates_grain() {
        let mut app = app_with_titles(&[]);
        let now = Instant::now();
        type_str(&mut app, "  Buy milk ", now);
        assert_eq!(app.state.input_value, "  Buy milk ");
        handle_key(&mut app, press(KeyCode::Enter), now);

        assert_eq!(titles(&app), vec!["Buy milk"]);
        assert_eq!(app.state.input_value, "");
        assert_eq!(app.input_cursor, 0);
        assert_eq!(app.state.selected_index, 0);

        settle(&mut app, now);
        let id = app.state.lookup.current_ordering()[0].element_id();
        assert_eq!(app.focus, Focus::Element(id));
    }

    #[test]
    fn zero_debounce_focuses_new_row_after_next_frame() {
        let mut config = crate::model::Config::default();
        config.ui.focus_debounce_ms = 0;
        let mut app = App::new(
            crate::model::AppState::default(),
            Box::new(crate::io::store::MemoryStore::new()),
            &config,
        );
        rerender(&mut app);
        let now = Instant::now();
        type_str(&mut app, "milk", now);
        handle_key(&mut app, press(KeyCode::Enter), now);

        // Same order as the event loop: nothing is drawn between key and tick
        app.tick(now);
        assert_eq!(app.focus, Focus::TopInput);

        rerender(&mut app);
        app.tick(now);
        let id = app.state.lookup.current_ordering()[0].element_id();
        assert_eq!(app.focus, Focus::Element(id));
    }

    #[test]
    fn blank_submit_is_ignored() {
        let mut app = app_with_titles(&[]);
        let now = Instant::now();
        type_str(&mut app, "   ", now);
        handle_key(&mut app, press(KeyCode::Enter), now);
        assert!(app.state.lookup.is_empty());
        assert_eq!(app.state.input_value, "   ");
        assert_eq!(app.focus_scheduler.pending(), None);
    }

    #[test]
    fn arrow_in_top_input_focuses_selected_grain() {
        let mut app = app_with_titles(&["a", "b", "c"]);
        let now = Instant::now();
        let before = app.state.selected_index;
        handle_key(&mut app, press(KeyCode::Up), now);
        assert_eq!(app.state.selected_index, before);
        settle(&mut app, now);
        assert_eq!(app.focus, Focus::Element(app.selected_element_id().unwrap()));
    }

    #[test]
    fn arrows_on_selected_row_roll_with_wraparound() {
        let mut app = app_with_titles(&["a", "b", "c"]);
        let now = Instant::now();
        let first = app.selected_element_id().unwrap();
        app.focus_element(&first);
        assert_eq!(app.state.selected_index, 0);

        handle_key(&mut app, press(KeyCode::Up), now);
        assert_eq!(app.state.selected_index, 2);
        let now = settle(&mut app, now);

        handle_key(&mut app, press(KeyCode::Down), now);
        assert_eq!(app.state.selected_index, 0);
        settle(&mut app, now);
        assert_eq!(app.focus, Focus::Element(first));
    }

    #[test]
    fn burst_of_arrows_focuses_last_target_only() {
        let mut app = app_with_titles(&["a", "b", "c", "d"]);
        let now = Instant::now();
        let first = app.selected_element_id().unwrap();
        app.focus_element(&first);

        // Focus has not moved yet, so only the first press rolls; the rest
        // re-request focus on the new selection
        handle_key(&mut app, press(KeyCode::Down), now);
        handle_key(&mut app, press(KeyCode::Down), now + Duration::from_millis(5));
        assert_eq!(app.state.selected_index, 1);
        settle(&mut app, now + Duration::from_millis(5));
        assert_eq!(app.focus, Focus::Element(app.rendered_ids[1].clone()));
    }

    #[test]
    fn single_grain_does_not_roll() {
        let mut app = app_with_titles(&["only"]);
        let now = Instant::now();
        let id = app.selected_element_id().unwrap();
        app.focus_element(&id);
        handle_key(&mut app, press(KeyCode::Down), now);
        assert_eq!(app.state.selected_index, 0);
        assert_eq!(app.focus_scheduler.pending(), None);
    }

    #[test]
    fn enter_on_selected_row_edits_and_commits() {
        let mut app = app_with_titles(&["milk"]);
        let now = Instant::now();
        let id = app.selected_element_id().unwrap();
        app.focus_element(&id);

        handle_key(&mut app, press(KeyCode::Enter), now);
        assert_eq!(app.focus_context(), FocusContext::EditInput(&id));
        assert_eq!(app.edit_cursor, 4);

        handle_key(&mut app, press(KeyCode::Home), now);
        type_str(&mut app, "oat ", now);
        assert_eq!(app.state.edit.as_ref().unwrap().title, "oat milk");

        handle_key(&mut app, press(KeyCode::Enter), now);
        assert_eq!(app.state.edit, None);
        assert_eq!(titles(&app), vec!["oat milk"]);
        settle(&mut app, now);
        assert_eq!(app.focus, Focus::Element(id));
    }

    #[test]
    fn enter_on_unselected_row_does_nothing() {
        let mut app = app_with_titles(&["a", "b"]);
        let now = Instant::now();
        let other = app.rendered_ids[1].clone();
        app.focus_element(&other);
        handle_key(&mut app, press(KeyCode::Enter), now);
        assert_eq!(app.state.edit, None);
    }

    #[test]
    fn escape_cancels_edit() {
        let mut app = app_with_titles(&["milk"]);
        let now = Instant::now();
        let id = app.selected_element_id().unwrap();
        app.focus_element(&id);
        handle_key(&mut app, press(KeyCode::Enter), now);
        type_str(&mut app, "xyz", now);
        handle_key(&mut app, press(KeyCode::Esc), now);

        assert_eq!(app.state.edit, None);
        assert_eq!(titles(&app), vec!["milk"]);
        assert_eq!(app.focus_context(), FocusContext::ListItem(&id));
    }

    #[test]
    fn arrows_are_inert_while_editing() {
        let mut app = app_with_titles(&["a", "b"]);
        let now = Instant::now();
        let id = app.selected_element_id().unwrap();
        app.focus_element(&id);
        handle_key(&mut app, press(KeyCode::Enter), now);
        handle_key(&mut app, press(KeyCode::Down), now);
        assert_eq!(app.state.selected_index, 0);
        assert!(app.state.edit.is_some());
    }

    #[test]
    fn space_toggles_and_delete_removes() {
        let mut app = app_with_titles(&["a", "b"]);
        let now = Instant::now();
        let id = app.selected_element_id().unwrap();
        let grain_id = crate::model::grain_id_from_element(&id).unwrap().to_string();
        app.focus_element(&id);

        handle_key(&mut app, press(KeyCode::Char(' ')), now);
        assert!(app.state.lookup.get(&grain_id).unwrap().done);
        handle_key(&mut app, press(KeyCode::Char(' ')), now);
        assert!(!app.state.lookup.get(&grain_id).unwrap().done);

        handle_key(&mut app, press(KeyCode::Delete), now);
        assert!(!app.state.lookup.contains(&grain_id));
        assert_eq!(app.focus, Focus::Body);
    }

    #[test]
    fn commit_after_tabbing_back_focuses_edited_row() {
        let mut app = app_with_titles(&["a", "b"]);
        let now = Instant::now();
        let rows = app.rendered_ids.clone();
        app.focus_element(&rows[0]);
        handle_key(&mut app, press(KeyCode::Enter), now);
        let now = settle(&mut app, now);
        app.focus = Focus::TopInput;
        app.apply(|s| s.selected_index = 1);

        handle_key(&mut app, press(KeyCode::Tab), now);
        assert_eq!(app.focus_context(), FocusContext::EditInput(&rows[0]));
        assert_eq!(app.state.selected_index, 0);

        handle_key(&mut app, press(KeyCode::Enter), now);
        assert_eq!(app.focus_scheduler.pending(), Some(&rows[0]));
    }

    #[test]
    fn deleting_row_drops_focus_request_for_it() {
        let mut app = app_with_titles(&["a", "b"]);
        let now = Instant::now();
        let id = app.selected_element_id().unwrap();
        app.focus_element(&id);
        app.schedule(Some(crate::ops::transitions::Effect::FocusElement(id.clone())), now);
        handle_key(&mut app, press(KeyCode::Delete), now);
        assert_eq!(app.focus_scheduler.pending(), None);
    }

    #[test]
    fn tab_cycles_through_input_and_rows() {
        let mut app = app_with_titles(&["a", "b"]);
        let now = Instant::now();
        let rows = app.rendered_ids.clone();
        handle_key(&mut app, press(KeyCode::Tab), now);
        assert_eq!(app.focus, Focus::Element(rows[0].clone()));
        handle_key(&mut app, press(KeyCode::Tab), now);
        assert_eq!(app.focus, Focus::Element(rows[1].clone()));
        handle_key(&mut app, press(KeyCode::Tab), now);
        assert_eq!(app.focus, Focus::TopInput);
        handle_key(&mut app, KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT), now);
        assert_eq!(app.focus, Focus::Element(rows[1].clone()));
    }

    #[test]
    fn help_overlay_swallows_keys() {
        let mut app = app_with_titles(&["a"]);
        let now = Instant::now();
        let id = app.selected_element_id().unwrap();
        app.focus_element(&id);
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT), now);
        assert!(app.show_help);
        handle_key(&mut app, press(KeyCode::Delete), now);
        assert_eq!(app.state.lookup.len(), 1);
        handle_key(&mut app, press(KeyCode::Esc), now);
        assert!(!app.show_help);
    }

    #[test]
    fn ctrl_q_quits_from_anywhere() {
        let mut app = app_with_titles(&[]);
        type_str(&mut app, "q", Instant::now());
        assert!(!app.should_quit);
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
            Instant::now(),
        );
        assert!(app.should_quit);
    }
}
