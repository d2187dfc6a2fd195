use serde::Serialize;

use crate::model::Grain;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct GrainJson {
    pub id: String,
    pub title: String,
    pub done: bool,
    pub created_at: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub selected: bool,
}

#[derive(Serialize)]
pub struct GrainListJson {
    pub grains: Vec<GrainJson>,
    pub total: usize,
    pub done: usize,
}

#[derive(Serialize)]
pub struct AddedJson {
    pub id: String,
    pub title: String,
}

pub fn grain_to_json(grain: &Grain, selected: bool) -> GrainJson {
    GrainJson {
        id: grain.id.clone(),
        title: grain.title.clone(),
        done: grain.done,
        created_at: grain.created_at.to_rfc3339(),
        description: grain.description.clone(),
        selected,
    }
}

/// One line of plain-text list output
pub fn format_grain_line(grain: &Grain, selected: bool) -> String {
    format!(
        "{} [{}] {}",
        if selected { ">" } else { " " },
        if grain.done { "x" } else { " " },
        grain.title
    )
}
