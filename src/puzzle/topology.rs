//! Rotation topology: which slots a mirror permutes
//!
//! Every mirror owns an ordered triple of slot indices. In the reference ring
//! mirror `i` owns `(i, i+1 mod n, center)`, so adjacent mirrors overlap on one
//! outer slot and every mirror shares the center slot.

use serde::{Deserialize, Serialize};

use super::registry::SlotIndex;
use crate::error::{PuzzleError, Result};

/// Mirror identity (index into the topology table)
pub type MirrorIndex = usize;

/// Static mapping from mirror index to the slot triple it rotates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationTopology {
    cycles: Vec<[SlotIndex; 3]>,
}

impl RotationTopology {
    /// Build a table from explicit triples (mirror `i` owns `cycles[i]`)
    pub fn from_cycles(cycles: Vec<[SlotIndex; 3]>) -> Self {
        Self { cycles }
    }

    /// Reference ring: `outer_slots` outer slots plus one center slot whose
    /// index is `outer_slots`
    pub fn ring(outer_slots: usize) -> Self {
        let center = outer_slots;
        let cycles = (0..outer_slots)
            .map(|i| [i, (i + 1) % outer_slots, center])
            .collect();
        Self { cycles }
    }

    /// The ordered triple a mirror permutes
    pub fn neighbors_of(&self, mirror: MirrorIndex) -> Result<[SlotIndex; 3]> {
        self.cycles
            .get(mirror)
            .copied()
            .ok_or(PuzzleError::UnknownMirror {
                mirror,
                mirror_count: self.cycles.len(),
            })
    }

    /// Mirrors whose triple contains `slot`, in mirror order
    pub fn mirrors_touching(&self, slot: SlotIndex) -> impl Iterator<Item = MirrorIndex> + '_ {
        self.cycles
            .iter()
            .enumerate()
            .filter(move |(_, cycle)| cycle.contains(&slot))
            .map(|(mirror, _)| mirror)
    }

    /// Iterate `(mirror, triple)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (MirrorIndex, [SlotIndex; 3])> + '_ {
        self.cycles.iter().copied().enumerate()
    }

    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    /// Check every triple against a registry of `slot_count` slots.
    ///
    /// A triple must name three distinct, in-range slots, otherwise the cycle
    /// would drop or duplicate a disc.
    pub fn validate(&self, slot_count: usize) -> Result<()> {
        for (mirror, cycle) in self.iter() {
            if let Some(&slot) = cycle.iter().find(|&&s| s >= slot_count) {
                return Err(PuzzleError::InvalidSlotIndex { slot, slot_count });
            }
            let [a, b, c] = cycle;
            if a == b || b == c || a == c {
                return Err(PuzzleError::InvalidLevel(format!(
                    "mirror {mirror} cycle {cycle:?} repeats a slot"
                )));
            }
        }
        Ok(())
    }
}
