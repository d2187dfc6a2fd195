use std::io::Write;
use std::path::Path;

use chrono::Utc;
use log::info;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::state::{APP_STATE_KEY, restore_app_state};
use crate::io::store::{FileStore, KeyValueStore, storage_set};
use crate::model::AppState;
use crate::ops::transitions::{
    grain_rows, selected_grain, set_input_value, submit_new_grain, update,
};

pub type HandlerResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run a subcommand against the store in `data_dir`
pub fn dispatch(command: Commands, json: bool, data_dir: &Path) -> HandlerResult {
    let mut store = FileStore::new(data_dir);
    let mut stdout = std::io::stdout().lock();
    match command {
        Commands::List(args) => cmd_list(&store, args, json, &mut stdout),
        Commands::Add(args) => cmd_add(&mut store, args, json, &mut stdout),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

pub fn cmd_list<S: KeyValueStore + ?Sized>(
    store: &S,
    args: ListArgs,
    json: bool,
    out: &mut dyn Write,
) -> HandlerResult {
    let state = restore_app_state(store);
    let rows: Vec<_> = grain_rows(&state)
        .into_iter()
        .filter(|r| !(args.pending && r.grain.done))
        .collect();

    if json {
        let list = GrainListJson {
            grains: rows
                .iter()
                .map(|r| grain_to_json(r.grain, r.is_selected))
                .collect(),
            total: state.lookup.len(),
            done: state.lookup.values().filter(|g| g.done).count(),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&list)?)?;
    } else if rows.is_empty() {
        writeln!(out, "no grains")?;
    } else {
        for row in &rows {
            writeln!(out, "{}", format_grain_line(row.grain, row.is_selected))?;
        }
    }
    Ok(())
}

/// Add a grain the way the input box does: set the input, then submit
pub fn cmd_add<S: KeyValueStore + ?Sized>(
    store: &mut S,
    args: AddArgs,
    json: bool,
    out: &mut dyn Write,
) -> HandlerResult {
    let title = args.title.join(" ");
    let state = restore_app_state(store);
    // Whatever is half-typed in the TUI input survives the command
    let draft = state.input_value.clone();
    let (next, effect) = update(&state, |s| {
        set_input_value(s, title.as_str());
        let effect = submit_new_grain(s, Utc::now());
        set_input_value(s, draft);
        effect
    });
    if effect.is_none() {
        return Err("title is empty".into());
    }
    let grain = selected_grain(&next).ok_or("new grain is not selected")?;
    persist(store, &next)?;
    info!("added grain {}", grain.id);

    if json {
        let added = AddedJson {
            id: grain.id.clone(),
            title: grain.title.clone(),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&added)?)?;
    } else {
        writeln!(out, "{} {}", grain.id, grain.title)?;
    }
    Ok(())
}

/// Write the state, surfacing failures (the TUI logs and swallows them)
fn persist<S: KeyValueStore + ?Sized>(store: &mut S, state: &AppState) -> HandlerResult {
    storage_set(store, APP_STATE_KEY, state)?;
    Ok(())
}
