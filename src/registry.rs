//! Component registry.
//!
//! This module holds the ordered slot-to-entry mapping for one coupled
//! configuration. Insertion order is significant: it drives processor
//! allocation, the EARTH component list, and the default run order.

use log::warn;

use crate::error::{CouplingError, Result};
use crate::model::{ModelEntry, ModelFamily};

/// Ordered mapping from model slots to registered component entries
///
/// A slot keeps its original position when its entry is replaced; removing a
/// slot frees the position, so a later re-insertion appends at the end.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    slots: Vec<(ModelFamily, ModelEntry)>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry under a slot, replacing any existing entry in place
    ///
    /// The slot must match the entry's own family tag.
    pub fn set(&mut self, slot: ModelFamily, entry: ModelEntry) -> Result<()> {
        if entry.family() != slot {
            return Err(CouplingError::InvalidSlot(format!(
                "{} entry cannot occupy the {} slot",
                entry.family(),
                slot
            )));
        }
        match self.slots.iter_mut().find(|(family, _)| *family == slot) {
            Some((_, existing)) => {
                warn!("overwriting existing {} entry \"{}\"", slot, existing.name());
                *existing = entry;
            }
            None => self.slots.push((slot, entry)),
        }
        Ok(())
    }

    /// Clear a slot, returning the removed entry if one was registered
    pub fn remove(&mut self, slot: ModelFamily) -> Option<ModelEntry> {
        let index = self.slots.iter().position(|(family, _)| *family == slot)?;
        Some(self.slots.remove(index).1)
    }

    pub fn get(&self, slot: ModelFamily) -> Option<&ModelEntry> {
        self.slots
            .iter()
            .find(|(family, _)| *family == slot)
            .map(|(_, entry)| entry)
    }

    pub fn contains(&self, slot: ModelFamily) -> bool {
        self.get(slot).is_some()
    }

    /// Registered `(slot, entry)` pairs in insertion order
    pub fn entries(&self) -> impl Iterator<Item = (ModelFamily, &ModelEntry)> {
        self.slots.iter().map(|(family, entry)| (*family, entry))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
