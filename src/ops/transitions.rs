use chrono::{DateTime, Utc};
use log::{error, warn};

use crate::model::{AppState, EditBuffer, Grain, GrainField, LookupError, element_id};

/// A side effect requested by a transition, applied by the host afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Move focus to the element with this id (debounced by the host)
    FocusElement(String),
}

/// One rendered row of the grain list
#[derive(Debug, Clone, Copy)]
pub struct GrainRow<'a> {
    pub grain: &'a Grain,
    pub is_selected: bool,
    pub edit: Option<&'a EditBuffer>,
}

impl GrainRow<'_> {
    /// The edit buffer, when this row is the grain being edited
    pub fn editing(&self) -> Option<&EditBuffer> {
        self.edit.filter(|e| e.grain_id == self.grain.id)
    }
}

/// Snapshot-and-patch wrapper: run `f` on a draft of `state` and return the
/// resulting snapshot alongside `f`'s output.
pub fn update<R>(state: &AppState, f: impl FnOnce(&mut AppState) -> R) -> (AppState, R) {
    state.produce(f)
}

pub fn create_grain_with_title(title: &str, now: DateTime<Utc>) -> Grain {
    Grain::with_title(title, now)
}

pub fn set_input_value(state: &mut AppState, text: impl Into<String>) {
    state.input_value = text.into();
}

/// Create a grain from the input box.
///
/// Whitespace-only input leaves the state untouched. On success the input is
/// cleared, the new grain is selected, and focus is requested on its row.
pub fn submit_new_grain(state: &mut AppState, now: DateTime<Utc>) -> Option<Effect> {
    let title = state.input_value.trim();
    if title.is_empty() {
        return None;
    }
    let grain = create_grain_with_title(title, now);
    let id = grain.id.clone();

    state.input_value.clear();
    state.lookup.insert(grain);
    set_selection_to_grain(state, &id);
    Some(Effect::FocusElement(element_id(&id)))
}

/// Point the selection at a grain's position in the current ordering
pub fn set_selection_to_grain(state: &mut AppState, grain_id: &str) {
    if let Some(idx) = state.lookup.position_of(grain_id) {
        state.selected_index = idx as i64;
    }
}

/// The grain at the (clamped) selection
pub fn selected_grain(state: &AppState) -> Option<&Grain> {
    let idx = state.clamped_selection()?;
    state.lookup.current_ordering().get(idx).copied()
}

/// Open an edit buffer on the selected grain. Returns whether one was opened.
pub fn start_editing_selected(state: &mut AppState) -> bool {
    if state.edit.is_some() {
        warn!("start editing requested while already in edit mode");
        return false;
    }
    let edit = match selected_grain(state) {
        Some(grain) => EditBuffer {
            grain_id: grain.id.clone(),
            title: grain.title.clone(),
        },
        None => return false,
    };
    state.edit = Some(edit);
    true
}

/// [`start_editing_selected`] followed by a focus request on the selection.
///
/// # Panics
///
/// Panics when there is no grain to focus.
pub fn start_editing_selected_trigger(state: &mut AppState) -> Effect {
    start_editing_selected(state);
    focus_grain_at_selection(state)
}

pub fn change_edit_title(state: &mut AppState, text: impl Into<String>) {
    match &mut state.edit {
        Some(edit) => edit.title = text.into(),
        None => error!("trying to update edit title while not editing"),
    }
}

/// Commit the trimmed buffer title (if non-empty) and close edit mode
pub fn end_edit_mode(state: &mut AppState) {
    let edit = match state.edit.take() {
        Some(edit) => edit,
        None => {
            error!("trying to end edit mode while not editing");
            return;
        }
    };
    let title = edit.title.trim();
    if title.is_empty() {
        return;
    }
    if let Err(e) = state
        .lookup
        .set_field(&edit.grain_id, GrainField::Title(title.to_string()))
    {
        warn!("edit commit dropped: {}", e);
    }
}

/// [`end_edit_mode`] followed by a focus request on the selection.
///
/// # Panics
///
/// Panics when there is no grain to focus.
pub fn end_edit_mode_trigger(state: &mut AppState) -> Effect {
    end_edit_mode(state);
    focus_grain_at_selection(state)
}

/// Close edit mode without touching the grain
pub fn cancel_edit_mode(state: &mut AppState) {
    if state.edit.take().is_none() {
        error!("trying to cancel edit mode while not editing");
    }
}

pub fn set_done(state: &mut AppState, grain_id: &str, done: bool) -> Result<(), LookupError> {
    state.lookup.set_field(grain_id, GrainField::Done(done))
}

/// Remove a grain. The selection index is left as is and clamps on read.
pub fn delete_grain(state: &mut AppState, grain_id: &str) -> Option<Grain> {
    let removed = state.lookup.delete(grain_id);
    if removed.is_some() && state.edit.as_ref().is_some_and(|e| e.grain_id == grain_id) {
        state.edit = None;
    }
    removed
}

/// Move the selection by `offset` with wraparound in both directions.
/// A list of fewer than two grains is left alone.
pub fn move_selection_by(state: &mut AppState, offset: i64) -> Option<Effect> {
    let n = state.lookup.len() as i64;
    if n <= 1 {
        return None;
    }
    let current = state.selected_index.clamp(0, n - 1);
    let next = (current + offset).rem_euclid(n);
    state.selected_index = next;
    let grains = state.lookup.current_ordering();
    Some(Effect::FocusElement(grains[next as usize].element_id()))
}

/// Focus request for the grain at the selection.
///
/// # Panics
///
/// Panics when there is no grain to focus.
pub fn focus_grain_at_selection(state: &AppState) -> Effect {
    let grain = selected_grain(state).expect("cannot focus a grain when none is selected");
    Effect::FocusElement(grain.element_id())
}

/// The current ordering projected for rendering. Empty when there are no grains.
pub fn grain_rows(state: &AppState) -> Vec<GrainRow<'_>> {
    let selected = match state.clamped_selection() {
        Some(idx) => idx,
        None => return Vec::new(),
    };
    state
        .lookup
        .current_ordering()
        .into_iter()
        .enumerate()
        .map(|(idx, grain)| GrainRow {
            grain,
            is_selected: idx == selected,
            edit: state.edit.as_ref(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NO_SELECTION;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    /// Submit grains `titles` in order, one second apart
    fn state_with(titles: &[&str]) -> AppState {
        let mut state = AppState::default();
        for (i, title) in titles.iter().enumerate() {
            set_input_value(&mut state, *title);
            submit_new_grain(&mut state, t(i as i64)).unwrap();
        }
        state
    }

    fn ordered_titles(state: &AppState) -> Vec<String> {
        state
            .lookup
            .current_ordering()
            .iter()
            .map(|g| g.title.clone())
            .collect()
    }

    #[test]
    fn submit_creates_trimmed_grain() {
        let mut state = AppState::default();
        set_input_value(&mut state, "  Buy milk  ");
        let effect = submit_new_grain(&mut state, t(0)).unwrap();

        assert_eq!(state.input_value, "");
        assert_eq!(state.lookup.len(), 1);
        let grain = selected_grain(&state).unwrap();
        assert_eq!(grain.title, "Buy milk");
        assert!(!grain.done);
        assert_eq!(effect, Effect::FocusElement(grain.element_id()));
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn submit_whitespace_only_is_noop() {
        let mut state = state_with(&["existing"]);
        set_input_value(&mut state, "   \t ");
        let before = state.clone();
        assert!(submit_new_grain(&mut state, t(10)).is_none());
        assert_eq!(state, before);
        assert_eq!(state.input_value, "   \t ");
    }

    #[test]
    fn submit_selects_new_grain_at_top() {
        let mut state = state_with(&["g1", "g2"]);
        state.selected_index = 1;
        set_input_value(&mut state, "g3");
        submit_new_grain(&mut state, t(5)).unwrap();
        assert_eq!(state.selected_index, 0);
        assert_eq!(selected_grain(&state).unwrap().title, "g3");
    }

    #[test]
    fn creation_ordering_is_newest_first() {
        let state = state_with(&["g1", "g2", "g3"]);
        assert_eq!(ordered_titles(&state), vec!["g3", "g2", "g1"]);
    }

    #[test]
    fn selection_wraps_around_backwards() {
        let n = 4;
        let mut state = state_with(&["a", "b", "c", "d"]);
        for i in 0..n {
            state.selected_index = i;
            for k in 1..=n {
                move_selection_by(&mut state, -1).unwrap();
                assert_eq!(state.selected_index, (i - k).rem_euclid(n));
            }
            assert_eq!(state.selected_index, i);
        }
    }

    #[test]
    fn selection_wraps_forward_from_last() {
        let mut state = state_with(&["a", "b", "c"]);
        state.selected_index = 2;
        let effect = move_selection_by(&mut state, 1).unwrap();
        assert_eq!(state.selected_index, 0);
        let top = state.lookup.current_ordering()[0].element_id();
        assert_eq!(effect, Effect::FocusElement(top));
    }

    #[test]
    fn selection_from_none_clamps_first() {
        let mut state = state_with(&["a", "b", "c"]);
        state.selected_index = NO_SELECTION;
        move_selection_by(&mut state, 1).unwrap();
        assert_eq!(state.selected_index, 1);
    }

    #[test]
    fn selection_needs_two_grains() {
        let mut state = state_with(&["only"]);
        state.selected_index = 0;
        assert!(move_selection_by(&mut state, 1).is_none());
        assert_eq!(state.selected_index, 0);

        let mut empty = AppState::default();
        assert!(move_selection_by(&mut empty, -1).is_none());
        assert_eq!(empty.selected_index, NO_SELECTION);
    }

    #[test]
    fn start_editing_seeds_buffer() {
        let mut state = state_with(&["Buy milk"]);
        assert!(start_editing_selected(&mut state));
        let edit = state.edit.as_ref().unwrap();
        let grain = selected_grain(&state).unwrap();
        assert_eq!(edit.grain_id, grain.id);
        assert_eq!(edit.title, "Buy milk");
    }

    #[test]
    fn second_start_editing_is_noop() {
        let mut state = state_with(&["first", "second"]);
        start_editing_selected(&mut state);
        change_edit_title(&mut state, "draft");
        let before = state.edit.clone();

        move_selection_by(&mut state, 1);
        assert!(!start_editing_selected(&mut state));
        assert_eq!(state.edit, before);
    }

    #[test]
    fn start_editing_without_grains_is_noop() {
        let mut state = AppState::default();
        assert!(!start_editing_selected(&mut state));
        assert!(state.edit.is_none());
    }

    #[test]
    fn edit_commit_trims_title() {
        let mut state = state_with(&["Buy milk"]);
        let id = selected_grain(&state).unwrap().id.clone();
        start_editing_selected(&mut state);
        change_edit_title(&mut state, "  Buy oat milk  ");
        end_edit_mode(&mut state);

        assert_eq!(state.lookup.get(&id).unwrap().title, "Buy oat milk");
        assert!(state.edit.is_none());
    }

    #[test]
    fn edit_commit_of_blank_title_discards() {
        let mut state = state_with(&["Buy milk"]);
        let id = selected_grain(&state).unwrap().id.clone();
        start_editing_selected(&mut state);
        change_edit_title(&mut state, "   ");
        end_edit_mode(&mut state);

        assert_eq!(state.lookup.get(&id).unwrap().title, "Buy milk");
        assert!(state.edit.is_none());
    }

    #[test]
    fn end_edit_without_edit_is_noop() {
        let mut state = state_with(&["a"]);
        let before = state.clone();
        end_edit_mode(&mut state);
        cancel_edit_mode(&mut state);
        change_edit_title(&mut state, "ignored");
        assert_eq!(state, before);
    }

    #[test]
    fn cancel_edit_keeps_title() {
        let mut state = state_with(&["keep me"]);
        start_editing_selected(&mut state);
        change_edit_title(&mut state, "changed");
        cancel_edit_mode(&mut state);
        assert!(state.edit.is_none());
        assert_eq!(selected_grain(&state).unwrap().title, "keep me");
    }

    #[test]
    fn triggers_request_focus_on_selection() {
        let mut state = state_with(&["a", "b"]);
        state.selected_index = 1;
        let expected = Effect::FocusElement(selected_grain(&state).unwrap().element_id());

        assert_eq!(start_editing_selected_trigger(&mut state), expected);
        assert!(state.edit.is_some());
        assert_eq!(end_edit_mode_trigger(&mut state), expected);
        assert!(state.edit.is_none());
    }

    #[test]
    #[should_panic(expected = "cannot focus a grain")]
    fn start_trigger_without_grains_panics() {
        let mut state = AppState::default();
        start_editing_selected_trigger(&mut state);
    }

    #[test]
    fn set_done_toggles_flag() {
        let mut state = state_with(&["a"]);
        let id = selected_grain(&state).unwrap().id.clone();
        set_done(&mut state, &id, true).unwrap();
        assert!(state.lookup.get(&id).unwrap().done);
        set_done(&mut state, &id, false).unwrap();
        assert!(!state.lookup.get(&id).unwrap().done);
    }

    #[test]
    fn set_done_on_missing_grain_is_not_found() {
        let mut state = state_with(&["a"]);
        let before = state.clone();
        let err = set_done(&mut state, "grain--gone", true).unwrap_err();
        assert_eq!(err, LookupError::NotFound("grain--gone".into()));
        assert_eq!(state, before);
    }

    #[test]
    fn delete_missing_is_noop() {
        let mut state = state_with(&["a", "b"]);
        let before = state.clone();
        assert!(delete_grain(&mut state, "grain--missing").is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn delete_selected_leaves_stale_index_that_clamps() {
        let mut state = state_with(&["a", "b", "c"]);
        state.selected_index = 2;
        let last = state.lookup.current_ordering()[2].id.clone();
        delete_grain(&mut state, &last).unwrap();

        assert_eq!(state.selected_index, 2);
        assert_eq!(state.clamped_selection(), Some(1));
        assert_eq!(selected_grain(&state).unwrap().title, "b");
    }

    #[test]
    fn delete_grain_under_edit_closes_edit() {
        let mut state = state_with(&["a"]);
        start_editing_selected(&mut state);
        let id = selected_grain(&state).unwrap().id.clone();
        delete_grain(&mut state, &id);
        assert!(state.edit.is_none());
        assert!(state.lookup.is_empty());
    }

    #[test]
    fn grain_rows_mark_clamped_selection() {
        let mut state = state_with(&["a", "b", "c"]);
        state.selected_index = 99;
        let rows = grain_rows(&state);
        let selected: Vec<bool> = rows.iter().map(|r| r.is_selected).collect();
        assert_eq!(selected, vec![false, false, true]);
        assert!(rows.iter().all(|r| r.editing().is_none()));
    }

    #[test]
    fn grain_rows_expose_edit_only_on_edited_row() {
        let mut state = state_with(&["a", "b"]);
        start_editing_selected(&mut state);
        let rows = grain_rows(&state);
        assert!(rows[0].editing().is_some());
        assert!(rows[1].editing().is_none());
    }

    #[test]
    fn grain_rows_empty_without_grains() {
        assert!(grain_rows(&AppState::default()).is_empty());
    }

    #[test]
    fn update_returns_new_snapshot() {
        let state = state_with(&["a"]);
        let (next, effect) = update(&state, |draft| {
            set_input_value(draft, "b");
            submit_new_grain(draft, t(0) + Duration::seconds(30))
        });
        assert!(effect.is_some());
        assert_eq!(state.lookup.len(), 1);
        assert_eq!(next.lookup.len(), 2);
        assert_eq!(ordered_titles(&next), vec!["b", "a"]);
    }
}
