//! Disc slots and the discs that occupy them
//!
//! Slots are fixed positions; discs are stored once in an arena and slots hold
//! `DiscId` handles into it. Rotating a triple only moves handles, so a disc's
//! triangles (and their beam modes) travel with the disc.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::triangle::Triangle;
use crate::error::{PuzzleError, Result};

/// Slot identity (index into the registry)
pub type SlotIndex = usize;

/// Handle to a disc in the registry arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DiscId(pub usize);

impl fmt::Display for DiscId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "disc#{}", self.0)
    }
}

/// A disc and the beam emitters mounted on it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disc {
    pub id: DiscId,
    pub triangles: Vec<Triangle>,
}

impl Disc {
    pub fn new(id: DiscId, triangles: Vec<Triangle>) -> Self {
        Self { id, triangles }
    }

    /// True if every triangle on this disc is sharp
    pub fn all_sharp(&self) -> bool {
        self.triangles.iter().all(Triangle::is_sharp)
    }
}

/// A fixed position on the board
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DiscSlot {
    pub index: SlotIndex,
    pub position: Vec2,
    pub occupant: DiscId,
}

/// Ordered slots plus the disc arena
///
/// Deserializing goes through `DiscSlotRegistry::new`, so a saved board with
/// a broken occupancy is rejected instead of loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RegistryData", into = "RegistryData")]
pub struct DiscSlotRegistry {
    slots: Vec<DiscSlot>,
    /// Arena, indexed by `DiscId`
    discs: Vec<Disc>,
    /// Inverse of slot occupancy, indexed by `DiscId`
    disc_slots: Vec<SlotIndex>,
}

/// Serialized form: the inverse index is rebuilt on load
#[derive(Serialize, Deserialize)]
struct RegistryData {
    slots: Vec<DiscSlot>,
    discs: Vec<Disc>,
}

impl TryFrom<RegistryData> for DiscSlotRegistry {
    type Error = PuzzleError;

    fn try_from(data: RegistryData) -> Result<Self> {
        if let Some((i, slot)) = data.slots.iter().enumerate().find(|(i, s)| s.index != *i) {
            return Err(PuzzleError::InvalidLevel(format!(
                "slot at position {i} has index {}",
                slot.index
            )));
        }
        let occupancy: Vec<DiscId> = data.slots.iter().map(|s| s.occupant).collect();
        let positions = data.slots.into_iter().map(|s| s.position).collect();
        Self::new(positions, data.discs, &occupancy)
    }
}

impl From<DiscSlotRegistry> for RegistryData {
    fn from(registry: DiscSlotRegistry) -> Self {
        Self {
            slots: registry.slots,
            discs: registry.discs,
        }
    }
}

impl DiscSlotRegistry {
    /// Build a registry from slot positions, discs and the initial
    /// occupancy (`occupancy[slot]` is the disc placed there).
    ///
    /// Discs must be numbered `0..n` in order and occupancy must place every
    /// disc exactly once.
    pub fn new(positions: Vec<Vec2>, discs: Vec<Disc>, occupancy: &[DiscId]) -> Result<Self> {
        let slot_count = positions.len();
        if slot_count == 0 {
            return Err(PuzzleError::InvalidLevel("no slots".into()));
        }
        if discs.len() != slot_count {
            return Err(PuzzleError::InvalidLevel(format!(
                "{} discs for {} slots",
                discs.len(),
                slot_count
            )));
        }
        if occupancy.len() != slot_count {
            return Err(PuzzleError::InvalidLevel(format!(
                "occupancy lists {} discs for {} slots",
                occupancy.len(),
                slot_count
            )));
        }
        if let Some((i, disc)) = discs.iter().enumerate().find(|(i, d)| d.id.0 != *i) {
            return Err(PuzzleError::InvalidLevel(format!(
                "disc at position {i} has id {}",
                disc.id
            )));
        }

        let mut disc_slots = vec![usize::MAX; slot_count];
        for (slot, &disc) in occupancy.iter().enumerate() {
            let entry = disc_slots
                .get_mut(disc.0)
                .ok_or(PuzzleError::UnknownDisc {
                    disc,
                    disc_count: slot_count,
                })?;
            if *entry != usize::MAX {
                return Err(PuzzleError::InvalidLevel(format!(
                    "{disc} placed in both slot {} and slot {slot}",
                    *entry
                )));
            }
            *entry = slot;
        }

        let slots = positions
            .into_iter()
            .zip(occupancy)
            .enumerate()
            .map(|(index, (position, &occupant))| DiscSlot {
                index,
                position,
                occupant,
            })
            .collect();

        Ok(Self {
            slots,
            discs,
            disc_slots,
        })
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn disc_count(&self) -> usize {
        self.discs.len()
    }

    pub fn slot(&self, slot: SlotIndex) -> Result<&DiscSlot> {
        self.slots.get(slot).ok_or(PuzzleError::InvalidSlotIndex {
            slot,
            slot_count: self.slots.len(),
        })
    }

    pub fn slots(&self) -> &[DiscSlot] {
        &self.slots
    }

    /// Disc currently sitting in `slot`
    pub fn occupant_of(&self, slot: SlotIndex) -> Result<DiscId> {
        self.slot(slot).map(|s| s.occupant)
    }

    /// Slot currently holding `disc`
    pub fn slot_of(&self, disc: DiscId) -> Result<SlotIndex> {
        self.disc_slots
            .get(disc.0)
            .copied()
            .ok_or(PuzzleError::UnknownDisc {
                disc,
                disc_count: self.discs.len(),
            })
    }

    /// World position of the slot `disc` currently occupies
    pub fn position_of(&self, disc: DiscId) -> Result<Vec2> {
        let slot = self.slot_of(disc)?;
        Ok(self.slots[slot].position)
    }

    pub fn disc(&self, disc: DiscId) -> Result<&Disc> {
        let disc_count = self.discs.len();
        self.discs
            .get(disc.0)
            .ok_or(PuzzleError::UnknownDisc { disc, disc_count })
    }

    pub fn disc_mut(&mut self, disc: DiscId) -> Result<&mut Disc> {
        let disc_count = self.discs.len();
        self.discs
            .get_mut(disc.0)
            .ok_or(PuzzleError::UnknownDisc { disc, disc_count })
    }

    pub fn discs(&self) -> &[Disc] {
        &self.discs
    }

    /// Every triangle in the registry, by disc id
    pub fn triangles(&self) -> impl Iterator<Item = &Triangle> {
        self.discs.iter().flat_map(|d| d.triangles.iter())
    }

    /// Current occupancy, `occupancy()[slot]` is the disc in that slot
    pub fn occupancy(&self) -> Vec<DiscId> {
        self.slots.iter().map(|s| s.occupant).collect()
    }

    /// Put `disc` into `slot`.
    ///
    /// The previous occupant of `slot` moves into the slot `disc` left, so
    /// every disc still has exactly one slot. Returns the displaced disc.
    pub fn set_occupant(&mut self, slot: SlotIndex, disc: DiscId) -> Result<DiscId> {
        let displaced = self.occupant_of(slot)?;
        let from = self.slot_of(disc)?;

        self.slots[from].occupant = displaced;
        self.disc_slots[displaced.0] = from;
        self.slots[slot].occupant = disc;
        self.disc_slots[disc.0] = slot;

        Ok(displaced)
    }

    /// Rotate the occupants of a triple one step anticlockwise:
    /// `a` receives the disc from `c`, `b` the disc from `a`, `c` the disc
    /// from `b`.
    ///
    /// All indices are checked before anything is written; a bad triple
    /// leaves the registry untouched.
    pub fn apply_cycle(&mut self, cycle: [SlotIndex; 3]) -> Result<()> {
        let slot_count = self.slots.len();
        if let Some(&slot) = cycle.iter().find(|&&s| s >= slot_count) {
            return Err(PuzzleError::InvalidSlotIndex { slot, slot_count });
        }
        let [a, b, c] = cycle;
        if a == b || b == c || a == c {
            return Err(PuzzleError::InvalidLevel(format!(
                "cycle {cycle:?} repeats a slot"
            )));
        }

        let (disc_a, disc_b, disc_c) = (
            self.slots[a].occupant,
            self.slots[b].occupant,
            self.slots[c].occupant,
        );
        for (slot, disc) in [(a, disc_c), (b, disc_a), (c, disc_b)] {
            self.slots[slot].occupant = disc;
            self.disc_slots[disc.0] = slot;
        }

        Ok(())
    }
}
