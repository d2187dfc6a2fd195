use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Prefix of every generated grain id
pub const GRAIN_ID_PREFIX: &str = "grain--";

/// Prefix of the element id a grain's list row is rendered under
pub const GRAIN_ELEMENT_PREFIX: &str = "grain-li--";

/// A single task record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grain {
    /// Opaque unique id, fixed at creation
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Informational only; bumped at creation
    pub modified_at: DateTime<Utc>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub done: bool,
    /// Fields written by other versions, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Grain {
    /// Create a new grain with a freshly generated id.
    ///
    /// The title is taken as given: trimming and rejecting empty titles
    /// happens at the transition boundary.
    pub fn with_title(title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Grain {
            id: generate_grain_id(),
            created_at: now,
            modified_at: now,
            title: title.into(),
            description: String::new(),
            done: false,
            extra: Map::new(),
        }
    }

    /// Id of the rendered row for this grain
    pub fn element_id(&self) -> String {
        element_id(&self.id)
    }
}

pub fn generate_grain_id() -> String {
    format!("{}{}", GRAIN_ID_PREFIX, uuid::Uuid::new_v4().simple())
}

/// Element id for a grain id (`grain-li--<id>`)
pub fn element_id(grain_id: &str) -> String {
    format!("{}{}", GRAIN_ELEMENT_PREFIX, grain_id)
}

/// Inverse of [`element_id`]
pub fn grain_id_from_element(element_id: &str) -> Option<&str> {
    element_id.strip_prefix(GRAIN_ELEMENT_PREFIX)
}

/// The working copy of a title while a grain is in edit mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditBuffer {
    pub grain_id: String,
    pub title: String,
}

/// A single mutable field of a grain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrainField {
    Title(String),
    Description(String),
    Done(bool),
}

impl GrainField {
    pub fn name(&self) -> &'static str {
        match self {
            GrainField::Title(_) => "title",
            GrainField::Description(_) => "description",
            GrainField::Done(_) => "done",
        }
    }
}
