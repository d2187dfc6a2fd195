use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::io::store::{KeyValueStore, StoreError, storage_get_or, storage_set};
use crate::model::{AppState, EditBuffer, Grain};

/// Store key holding the whole serialized [`AppState`]
pub const APP_STATE_KEY: &str = "app-state";

/// The hardcoded defaults every stored document is merged over
pub fn default_state_value() -> Value {
    json!({
        "inputValue": "",
        "lookup": {},
        "selectedIndex": -1,
        "edit": null,
    })
}

/// Persist the full state. Failures are logged and otherwise ignored; the
/// previously stored snapshot stays in place.
pub fn cache_app_state<S: KeyValueStore + ?Sized>(store: &mut S, state: &AppState) {
    match storage_set(store, APP_STATE_KEY, state) {
        Ok(()) => debug!("cached app state ({} grains)", state.lookup.len()),
        Err(e @ StoreError::InvalidArgs(_)) => warn!("storage set rejected: {}", e),
        Err(e) => error!("could not cache app state: {}", e),
    }
}

/// Load the stored state merged over the defaults
pub fn restore_app_state<S: KeyValueStore + ?Sized>(store: &S) -> AppState {
    let stored: Value = storage_get_or(store, Value::Object(Map::new()), APP_STATE_KEY);
    state_from_stored(stored)
}

/// Build a state from a stored document.
///
/// Missing fields take their defaults, unknown fields are kept, and a known
/// field with the wrong shape is reset to its default.
pub fn state_from_stored(stored: Value) -> AppState {
    let stored = match stored {
        Value::Object(map) => Value::Object(map),
        other => {
            debug!("stored app state is not an object ({}), ignoring it", kind(&other));
            Value::Object(Map::new())
        }
    };
    let merged = merge_deep_right(default_state_value(), stored);
    match serde_json::from_value::<AppState>(merged.clone()) {
        Ok(state) => state,
        Err(e) => {
            warn!("stored app state has an incompatible shape, repairing: {}", e);
            repair(merged)
        }
    }
}

/// Recursively merge `right` over `left`. Objects merge key by key; any other
/// value in `right` replaces the one in `left`.
pub fn merge_deep_right(left: Value, right: Value) -> Value {
    match (left, right) {
        (Value::Object(mut base), Value::Object(over)) => {
            for (key, value) in over {
                let merged = match base.remove(&key) {
                    Some(existing) => merge_deep_right(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        }
        (_, right) => right,
    }
}

fn repair(merged: Value) -> AppState {
    let Value::Object(mut fields) = merged else {
        return AppState::default();
    };
    let defaults = default_state_value();

    reset_if_invalid::<String>(&mut fields, "inputValue", &defaults);
    reset_if_invalid::<i64>(&mut fields, "selectedIndex", &defaults);
    reset_if_invalid::<Option<EditBuffer>>(&mut fields, "edit", &defaults);

    match fields.get_mut("lookup") {
        Some(Value::Object(grains)) => grains.retain(|id, grain| {
            let ok = serde_json::from_value::<Grain>(grain.clone()).is_ok();
            if !ok {
                warn!("dropping unreadable stored grain {}", id);
            }
            ok
        }),
        _ => {
            warn!("stored lookup is not an object, resetting it");
            fields.insert("lookup".into(), defaults["lookup"].clone());
        }
    }

    serde_json::from_value(Value::Object(fields)).unwrap_or_else(|e| {
        error!("could not repair stored app state, starting fresh: {}", e);
        AppState::default()
    })
}

fn reset_if_invalid<T: DeserializeOwned>(fields: &mut Map<String, Value>, key: &str, defaults: &Value) {
    let valid = fields
        .get(key)
        .is_some_and(|v| serde_json::from_value::<T>(v.clone()).is_ok());
    if !valid {
        warn!("stored field {} has the wrong shape, using default", key);
        fields.insert(key.to_string(), defaults[key].clone());
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
