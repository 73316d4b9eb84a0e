//! Processor range allocation.
//!
//! This module assigns contiguous, non-overlapping processor-index ranges
//! (petlist bounds) to registered components, in registry insertion order,
//! starting at index 0.

use crate::error::{CouplingError, Result};
use crate::model::ModelFamily;
use crate::registry::ComponentRegistry;

/// Inclusive processor-index range assigned to one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessorRange {
    pub first: u32,
    pub last: u32,
}

impl ProcessorRange {
    pub fn len(&self) -> u32 {
        self.last - self.first + 1
    }
}

/// Placement policy for a mediator created by the connection graph rather
/// than registered as an explicit component
///
/// An implicit mediator shares the first processor index of the anchor slot
/// (the lowest-registry-order mediated component) and consumes no additional
/// indices. A dedicated mediator receives its own contiguous range appended
/// after all registry slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediatorPlacement {
    Absent,
    Implicit { anchor: ModelFamily },
    Dedicated(u32),
}

/// Petlist bounds for every allocated slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorAllocation {
    bounds: Vec<(ModelFamily, ProcessorRange)>,
}

impl ProcessorAllocation {
    /// Allocated `(slot, range)` pairs in allocation order
    pub fn iter(&self) -> impl Iterator<Item = (ModelFamily, ProcessorRange)> + '_ {
        self.bounds.iter().copied()
    }

    pub fn bounds(&self, slot: ModelFamily) -> Option<ProcessorRange> {
        self.bounds
            .iter()
            .find(|(family, _)| *family == slot)
            .map(|(_, range)| *range)
    }

    /// Total processor count across non-mediator slots
    pub fn total_processors(&self) -> u32 {
        self.bounds
            .iter()
            .filter(|(family, _)| *family != ModelFamily::Mediator)
            .map(|(_, range)| range.len())
            .sum()
    }
}

/// Compute petlist bounds from an ordered `(slot, processors)` sequence
///
/// A running cursor starts at 0; each entry takes `[cursor, cursor + n - 1]`
/// and advances the cursor by `n`. A graph-supplied mediator placement only
/// applies when the MED slot is not itself among the entries.
pub fn allocate(
    counts: &[(ModelFamily, u32)],
    mediator: MediatorPlacement,
) -> Result<ProcessorAllocation> {
    let mut bounds = Vec::with_capacity(counts.len() + 1);
    let mut cursor: u32 = 0;
    for (slot, processors) in counts {
        if *processors == 0 {
            return Err(CouplingError::InvalidProcessorCount {
                slot: slot.tag().to_string(),
                count: 0,
            });
        }
        bounds.push((
            *slot,
            ProcessorRange {
                first: cursor,
                last: cursor + processors - 1,
            },
        ));
        cursor += processors;
    }

    let mediator_registered = counts
        .iter()
        .any(|(slot, _)| *slot == ModelFamily::Mediator);
    if !mediator_registered {
        match mediator {
            MediatorPlacement::Absent => {}
            MediatorPlacement::Implicit { anchor } => {
                let anchor_range = bounds
                    .iter()
                    .find(|(slot, _)| *slot == anchor)
                    .map(|(_, range)| *range)
                    .ok_or_else(|| CouplingError::UnknownSlot(anchor.tag().to_string()))?;
                bounds.push((
                    ModelFamily::Mediator,
                    ProcessorRange {
                        first: anchor_range.first,
                        last: anchor_range.first,
                    },
                ));
            }
            MediatorPlacement::Dedicated(processors) => {
                if processors == 0 {
                    return Err(CouplingError::InvalidProcessorCount {
                        slot: ModelFamily::Mediator.tag().to_string(),
                        count: 0,
                    });
                }
                bounds.push((
                    ModelFamily::Mediator,
                    ProcessorRange {
                        first: cursor,
                        last: cursor + processors - 1,
                    },
                ));
            }
        }
    }

    Ok(ProcessorAllocation { bounds })
}

/// Allocate directly from a registry, in insertion order
pub fn allocate_registry(
    registry: &ComponentRegistry,
    mediator: MediatorPlacement,
) -> Result<ProcessorAllocation> {
    let counts: Vec<_> = registry
        .entries()
        .map(|(slot, entry)| (slot, entry.processors()))
        .collect();
    allocate(&counts, mediator)
}
