//! Beam evaluation: does a triangle's beam reach a mirror?

use glam::Vec2;

use super::events::PuzzleListener;
use super::mirror::MirrorNode;
use super::raycast::{RayHit, raymarch_ray};
use super::registry::{DiscId, DiscSlotRegistry};
use super::topology::MirrorIndex;
use super::triangle::{BeamMode, Triangle};
use crate::error::{PuzzleError, Result};

/// Decides beam modes against a fixed set of mirror colliders
#[derive(Debug, Clone)]
pub struct BeamEvaluator {
    mirrors: Vec<MirrorNode>,
}

impl BeamEvaluator {
    pub fn new(mirrors: Vec<MirrorNode>) -> Self {
        Self { mirrors }
    }

    pub fn mirrors(&self) -> &[MirrorNode] {
        &self.mirrors
    }

    pub fn mirror_mut(&mut self, mirror: MirrorIndex) -> Result<&mut MirrorNode> {
        let mirror_count = self.mirrors.len();
        self.mirrors
            .get_mut(mirror)
            .ok_or(PuzzleError::UnknownMirror {
                mirror,
                mirror_count,
            })
    }

    /// Cast a beam and report the first mirror it touches
    pub fn cast(&self, origin: Vec2, direction: Vec2, range: f32) -> Option<RayHit> {
        raymarch_ray(origin, direction, range, &self.mirrors)
    }

    /// Mode a triangle should have when its disc sits at `disc_center`
    pub fn evaluate(&self, disc_center: Vec2, triangle: &Triangle) -> BeamMode {
        let hit = self.cast(
            triangle.origin(disc_center),
            triangle.direction(),
            triangle.range,
        );
        BeamMode::from_hit(hit.is_some())
    }

    /// Re-evaluate every triangle on one disc.
    ///
    /// Listeners only hear about actual transitions, so calling this again
    /// without moving anything is silent. Returns the number of transitions.
    pub fn evaluate_all<L>(
        &self,
        registry: &mut DiscSlotRegistry,
        disc: DiscId,
        listener: &mut L,
    ) -> Result<usize>
    where
        L: PuzzleListener + ?Sized,
    {
        let center = registry.position_of(disc)?;
        let disc = registry.disc_mut(disc)?;

        let mut changes = 0;
        for triangle in &mut disc.triangles {
            let mode = self.evaluate(center, triangle);
            if mode != triangle.mode {
                let old = triangle.mode;
                triangle.mode = mode;
                listener.on_beam_mode_changed(triangle.id, old, mode);
                changes += 1;
            }
        }
        Ok(changes)
    }

    /// Re-evaluate every disc in the registry, in disc order
    pub fn evaluate_registry<L>(&self, registry: &mut DiscSlotRegistry, listener: &mut L) -> Result<usize>
    where
        L: PuzzleListener + ?Sized,
    {
        let mut changes = 0;
        for disc in 0..registry.disc_count() {
            changes += self.evaluate_all(registry, DiscId(disc), listener)?;
        }
        Ok(changes)
    }
}
