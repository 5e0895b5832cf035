//! Beam emitters mounted on discs

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::registry::DiscId;
use crate::consts::BEAM_RANGE;

/// Visual state of a triangle's beam
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BeamMode {
    /// Beam does not reach a mirror
    #[default]
    Glow,
    /// Beam hits a mirror
    Sharp,
}

impl BeamMode {
    pub fn from_hit(hit: bool) -> Self {
        if hit { BeamMode::Sharp } else { BeamMode::Glow }
    }

    pub fn is_sharp(self) -> bool {
        self == BeamMode::Sharp
    }
}

/// Stable identity of a triangle: its disc plus its position on that disc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriangleId {
    pub disc: DiscId,
    pub index: usize,
}

impl fmt::Display for TriangleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.disc, self.index)
    }
}

/// A beam emitter.
///
/// Offsets are in the parent disc's local frame. The beam direction comes from
/// those offsets alone, so relocating the disc moves the ray origin but never
/// turns the beam.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Triangle {
    pub id: TriangleId,
    /// Triangle position relative to the disc center
    pub anchor: Vec2,
    /// Glow-beam position relative to the disc center
    pub glow_anchor: Vec2,
    /// Search radius for the mirror test
    pub range: f32,
    /// Mode from the last evaluation
    pub mode: BeamMode,
}

impl Triangle {
    pub fn new(id: TriangleId, anchor: Vec2, glow_anchor: Vec2) -> Self {
        Self {
            id,
            anchor,
            glow_anchor,
            range: BEAM_RANGE,
            mode: BeamMode::Glow,
        }
    }

    pub fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }

    /// Unit beam direction (zero if the anchors coincide)
    #[inline]
    pub fn direction(&self) -> Vec2 {
        (self.glow_anchor - self.anchor).normalize_or_zero()
    }

    /// World-space ray origin when the parent disc sits at `disc_center`
    #[inline]
    pub fn origin(&self, disc_center: Vec2) -> Vec2 {
        disc_center + self.anchor
    }

    pub fn is_sharp(&self) -> bool {
        self.mode.is_sharp()
    }
}
