//! Notifications sent to the presentation layer
//!
//! The engine never animates anything itself. It reports what changed through
//! a `PuzzleListener`, and the presentation layer decides how to show it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::registry::{DiscId, SlotIndex};
use super::topology::MirrorIndex;
use super::triangle::{BeamMode, TriangleId};

/// Receiver for engine notifications. Every method defaults to a no-op.
pub trait PuzzleListener {
    /// A slot received a new disc during a commit
    fn on_occupancy_changed(&mut self, _slot: SlotIndex, _disc: DiscId, _position: Vec2) {}

    /// A triangle's beam mode actually changed
    fn on_beam_mode_changed(&mut self, _triangle: TriangleId, _old: BeamMode, _new: BeamMode) {}

    /// The puzzle became solved for the first time
    fn on_solved(&mut self) {}

    /// Advisory highlight for the sector a pending swap belongs to
    fn on_highlight_sector(&mut self, _mirror: MirrorIndex, _active: bool) {}

    /// A mirror's visual rotation advanced
    fn on_mirror_rotated(&mut self, _mirror: MirrorIndex, _angle: f32) {}
}

/// Ignores every notification
impl PuzzleListener for () {}

/// Recorded notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PuzzleEvent {
    OccupancyChanged {
        slot: SlotIndex,
        disc: DiscId,
        position: Vec2,
    },
    BeamModeChanged {
        triangle: TriangleId,
        old: BeamMode,
        new: BeamMode,
    },
    Solved,
    HighlightSector {
        mirror: MirrorIndex,
        active: bool,
    },
    MirrorRotated {
        mirror: MirrorIndex,
        angle: f32,
    },
}

/// Records every notification in order
impl PuzzleListener for Vec<PuzzleEvent> {
    fn on_occupancy_changed(&mut self, slot: SlotIndex, disc: DiscId, position: Vec2) {
        self.push(PuzzleEvent::OccupancyChanged {
            slot,
            disc,
            position,
        });
    }

    fn on_beam_mode_changed(&mut self, triangle: TriangleId, old: BeamMode, new: BeamMode) {
        self.push(PuzzleEvent::BeamModeChanged { triangle, old, new });
    }

    fn on_solved(&mut self) {
        self.push(PuzzleEvent::Solved);
    }

    fn on_highlight_sector(&mut self, mirror: MirrorIndex, active: bool) {
        self.push(PuzzleEvent::HighlightSector { mirror, active });
    }

    fn on_mirror_rotated(&mut self, mirror: MirrorIndex, angle: f32) {
        self.push(PuzzleEvent::MirrorRotated { mirror, angle });
    }
}

/// Writes every notification to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogListener;

impl PuzzleListener for LogListener {
    fn on_occupancy_changed(&mut self, slot: SlotIndex, disc: DiscId, position: Vec2) {
        log::info!("slot {slot} <- {disc} at ({:.2}, {:.2})", position.x, position.y);
    }

    fn on_beam_mode_changed(&mut self, triangle: TriangleId, old: BeamMode, new: BeamMode) {
        log::info!("beam {triangle}: {old:?} -> {new:?}");
    }

    fn on_solved(&mut self) {
        log::info!("Puzzle solved!");
    }

    fn on_highlight_sector(&mut self, mirror: MirrorIndex, active: bool) {
        log::debug!("sector {mirror} highlight {}", if active { "on" } else { "off" });
    }

    fn on_mirror_rotated(&mut self, mirror: MirrorIndex, angle: f32) {
        log::debug!("mirror {mirror} rotated to {:.0}°", angle.to_degrees());
    }
}
