use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::grain::{Grain, GrainField};

/// Error type for repository mutations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("grain not found: {0}")]
    NotFound(String),
}

/// Id-keyed repository of grains.
///
/// Keys keep insertion order so the serialized document reads like the
/// order grains were added in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrainLookup(IndexMap<String, Grain>);

impl GrainLookup {
    pub fn new() -> Self {
        GrainLookup(IndexMap::new())
    }

    /// Insert a grain keyed by its id. A colliding id is overwritten in place
    /// and the previous record returned.
    pub fn insert(&mut self, grain: Grain) -> Option<Grain> {
        self.0.insert(grain.id.clone(), grain)
    }

    pub fn get(&self, id: &str) -> Option<&Grain> {
        self.0.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// Set a single field of an existing grain
    pub fn set_field(&mut self, id: &str, field: GrainField) -> Result<(), LookupError> {
        let grain = self
            .0
            .get_mut(id)
            .ok_or_else(|| LookupError::NotFound(id.to_string()))?;
        log::debug!("set {} on {}", field.name(), id);
        match field {
            GrainField::Title(title) => grain.title = title,
            GrainField::Description(description) => grain.description = description,
            GrainField::Done(done) => grain.done = done,
        }
        Ok(())
    }

    /// Remove a grain. Absent ids are a no-op.
    pub fn delete(&mut self, id: &str) -> Option<Grain> {
        self.0.shift_remove(id)
    }

    /// All grains in insertion order. Re-derived on every call.
    pub fn values(&self) -> impl Iterator<Item = &Grain> + '_ {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Grains sorted newest first by `created_at`.
    ///
    /// Equal timestamps put the later insertion first, so a grain created in
    /// the same instant as another still lands above it.
    pub fn current_ordering(&self) -> Vec<&Grain> {
        let mut grains: Vec<(usize, &Grain)> = self.0.values().enumerate().collect();
        grains.sort_by(|(ia, a), (ib, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| ib.cmp(ia))
        });
        grains.into_iter().map(|(_, g)| g).collect()
    }

    /// Position of a grain in [`Self::current_ordering`]
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.current_ordering().iter().position(|g| g.id == id)
    }
}
