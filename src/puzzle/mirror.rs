//! Rotatable mirror nodes

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::registry::SlotIndex;
use super::topology::MirrorIndex;
use crate::consts::MIRROR_ROTATION_STEP;
use crate::normalize_angle;

/// A mirror: a fixed circular collider that beams can hit, and the control
/// that rotates its slot triple
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorNode {
    pub index: MirrorIndex,
    pub position: Vec2,
    pub collider_radius: f32,
    /// Visual rotation (radians, normalized to [-π, π)); does not affect the collider
    pub angle: f32,
    /// The slot triple this mirror rotates (copied from the topology)
    pub cycle: [SlotIndex; 3],
}

impl MirrorNode {
    pub fn new(index: MirrorIndex, position: Vec2, collider_radius: f32, cycle: [SlotIndex; 3]) -> Self {
        Self {
            index,
            position,
            collider_radius,
            angle: 0.0,
            cycle,
        }
    }

    /// Advance the visual rotation by one step, returning the new angle
    pub fn rotate_step(&mut self) -> f32 {
        self.angle = normalize_angle(self.angle + MIRROR_ROTATION_STEP);
        self.angle
    }

    /// Signed distance from `p` to the collider footprint
    #[inline]
    pub fn distance(&self, p: Vec2) -> f32 {
        super::raycast::sd_circle(p, self.position, self.collider_radius)
    }
}
