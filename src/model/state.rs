use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::grain::EditBuffer;
use super::lookup::GrainLookup;

/// Sentinel for "nothing selected"
pub const NO_SELECTION: i64 = -1;

/// Root snapshot of the editor.
///
/// This is exactly the document persisted under the `app-state` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Text of the "new grain" input
    #[serde(default)]
    pub input_value: String,
    #[serde(default)]
    pub lookup: GrainLookup,
    /// Index into the current ordering, or [`NO_SELECTION`]. Clamped on read.
    #[serde(default = "no_selection")]
    pub selected_index: i64,
    #[serde(default)]
    pub edit: Option<EditBuffer>,
    /// Top-level fields this version does not know about
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn no_selection() -> i64 {
    NO_SELECTION
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            input_value: String::new(),
            lookup: GrainLookup::new(),
            selected_index: NO_SELECTION,
            edit: None,
            extra: Map::new(),
        }
    }
}

impl AppState {
    /// Apply `f` to a draft copy of this snapshot and return the new snapshot.
    ///
    /// The draft is only reachable inside `f`, so no reader ever sees a
    /// half-applied transition.
    pub fn produce<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> (AppState, R) {
        let mut draft = self.clone();
        let out = f(&mut draft);
        (draft, out)
    }

    /// Selection clamped into `[0, n)`, or `None` when there are no grains
    pub fn clamped_selection(&self) -> Option<usize> {
        let n = self.lookup.len();
        if n == 0 {
            return None;
        }
        Some(self.selected_index.clamp(0, n as i64 - 1) as usize)
    }
}
