//! Level descriptions
//!
//! A level is plain data: slot positions, mirrors with the triple each one
//! rotates, discs with their triangles, and the starting occupancy. It is
//! loaded from JSON or built in code (`LevelConfig::reference`).

use std::f32::consts::TAU;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{PuzzleError, Result};
use crate::polar_to_cartesian;
use crate::puzzle::{
    BeamEvaluator, Disc, DiscId, DiscSlotRegistry, MirrorNode, RotationTopology, SlotIndex,
    Triangle, TriangleId,
};

fn default_collider_radius() -> f32 {
    MIRROR_COLLIDER_RADIUS
}

fn default_range() -> f32 {
    BEAM_RANGE
}

/// A mirror: where it sits and which slots it rotates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorConfig {
    pub position: Vec2,
    #[serde(default = "default_collider_radius")]
    pub collider_radius: f32,
    pub cycle: [SlotIndex; 3],
}

/// A triangle, in its disc's local frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleConfig {
    pub anchor: Vec2,
    pub glow_anchor: Vec2,
    #[serde(default = "default_range")]
    pub range: f32,
}

impl TriangleConfig {
    /// Triangle on the rim of its disc pointing along `dir`
    pub fn aimed(dir: Vec2) -> Self {
        let dir = dir.normalize_or_zero();
        Self {
            anchor: dir * TRIANGLE_ANCHOR_OFFSET,
            glow_anchor: dir * GLOW_ANCHOR_OFFSET,
            range: BEAM_RANGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiscConfig {
    pub triangles: Vec<TriangleConfig>,
}

/// Complete static description of a puzzle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub slots: Vec<Vec2>,
    pub mirrors: Vec<MirrorConfig>,
    pub discs: Vec<DiscConfig>,
    /// `occupancy[slot]` is the disc starting there; identity when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupancy: Option<Vec<usize>>,
}

impl LevelConfig {
    /// Mirror activations applied to the solved layout of the reference level
    pub const REFERENCE_SCRAMBLE: [usize; 2] = [3, 3];

    /// The built-in level: eight outer slots around a shared center, one
    /// mirror between each adjacent pair.
    ///
    /// In the solved layout every outer disc aims one triangle at each of its
    /// two neighbouring mirrors and the center disc aims at mirrors 0 and 4.
    /// The level starts from that layout with `REFERENCE_SCRAMBLE` applied,
    /// so a single activation of mirror 3 solves it.
    pub fn reference() -> Self {
        let outer = RING_SLOTS;
        let step = TAU / outer as f32;

        let mut slots: Vec<Vec2> = (0..outer)
            .map(|k| polar_to_cartesian(RING_RADIUS, k as f32 * step))
            .collect();
        slots.push(Vec2::ZERO);
        let center = outer;

        let mirrors: Vec<MirrorConfig> = RotationTopology::ring(outer)
            .iter()
            .map(|(i, cycle)| MirrorConfig {
                position: polar_to_cartesian(MIRROR_RING_RADIUS, (i as f32 + 0.5) * step),
                collider_radius: MIRROR_COLLIDER_RADIUS,
                cycle,
            })
            .collect();

        let aim = |slot: usize, mirror: usize| {
            TriangleConfig::aimed(mirrors[mirror].position - slots[slot])
        };
        let mut discs: Vec<DiscConfig> = (0..outer)
            .map(|k| DiscConfig {
                triangles: vec![aim(k, (k + outer - 1) % outer), aim(k, k)],
            })
            .collect();
        discs.push(DiscConfig {
            triangles: vec![aim(center, 0), aim(center, outer / 2)],
        });

        let mut occupancy: Vec<usize> = (0..slots.len()).collect();
        for mirror in Self::REFERENCE_SCRAMBLE {
            let [a, b, c] = mirrors[mirror].cycle;
            let (da, db, dc) = (occupancy[a], occupancy[b], occupancy[c]);
            occupancy[a] = dc;
            occupancy[b] = da;
            occupancy[c] = db;
        }

        Self {
            slots,
            mirrors,
            discs,
            occupancy: Some(occupancy),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let level: Self = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let level = Self::from_json(&json)?;
        log::info!(
            "Loaded level {} ({} slots, {} mirrors)",
            path.display(),
            level.slots.len(),
            level.mirrors.len()
        );
        Ok(level)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Starting occupancy (identity when none is given)
    pub fn initial_occupancy(&self) -> Vec<DiscId> {
        match &self.occupancy {
            Some(occupancy) => occupancy.iter().copied().map(DiscId).collect(),
            None => (0..self.discs.len()).map(DiscId).collect(),
        }
    }

    /// Check the level for mistakes that would make the puzzle unplayable
    pub fn validate(&self) -> Result<()> {
        self.build().map(|_| ())
    }

    /// Turn the description into engine parts
    pub fn build(&self) -> Result<(RotationTopology, DiscSlotRegistry, BeamEvaluator)> {
        if self.mirrors.is_empty() {
            return Err(PuzzleError::InvalidLevel("no mirrors".into()));
        }

        let topology = RotationTopology::from_cycles(self.mirrors.iter().map(|m| m.cycle).collect());
        topology.validate(self.slots.len())?;

        let mut mirrors = Vec::with_capacity(self.mirrors.len());
        for (index, mirror) in self.mirrors.iter().enumerate() {
            if mirror.collider_radius.is_nan() || mirror.collider_radius <= 0.0 {
                return Err(PuzzleError::InvalidLevel(format!(
                    "mirror {index} has collider radius {}",
                    mirror.collider_radius
                )));
            }
            mirrors.push(MirrorNode::new(
                index,
                mirror.position,
                mirror.collider_radius,
                mirror.cycle,
            ));
        }

        let mut discs = Vec::with_capacity(self.discs.len());
        for (d, disc) in self.discs.iter().enumerate() {
            let disc_id = DiscId(d);
            let mut triangles = Vec::with_capacity(disc.triangles.len());
            for (index, t) in disc.triangles.iter().enumerate() {
                let id = TriangleId {
                    disc: disc_id,
                    index,
                };
                let triangle = Triangle::new(id, t.anchor, t.glow_anchor).with_range(t.range);
                if triangle.direction() == Vec2::ZERO {
                    return Err(PuzzleError::InvalidLevel(format!(
                        "triangle {id} has no beam direction"
                    )));
                }
                if !t.range.is_finite() || t.range <= 0.0 {
                    return Err(PuzzleError::InvalidLevel(format!(
                        "triangle {id} has range {}",
                        t.range
                    )));
                }
                triangles.push(triangle);
            }
            discs.push(Disc::new(disc_id, triangles));
        }

        let registry = DiscSlotRegistry::new(self.slots.clone(), discs, &self.initial_occupancy())?;
        Ok((topology, registry, BeamEvaluator::new(mirrors)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_shape() {
        let level = LevelConfig::reference();
        assert_eq!(level.slots.len(), 9);
        assert_eq!(level.mirrors.len(), 8);
        assert_eq!(level.discs.len(), 9);
        assert_eq!(level.slots[8], Vec2::ZERO);
        assert_eq!(level.mirrors[3].cycle, [3, 4, 8]);
        assert_eq!(level.mirrors[7].cycle, [7, 0, 8]);
        assert_eq!(level.occupancy, Some(vec![0, 1, 2, 4, 8, 5, 6, 7, 3]));
        assert!(level.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_keeps_level() {
        let level = LevelConfig::reference();
        let json = level.to_json_pretty().unwrap();
        let parsed = LevelConfig::from_json(&json).unwrap();
        assert_eq!(parsed.mirrors, level.mirrors);
        assert_eq!(parsed.occupancy, level.occupancy);
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{
            "slots": [[0.0, 0.0], [2.0, 0.0], [0.0, 2.0]],
            "mirrors": [{ "position": [1.0, 1.0], "cycle": [0, 1, 2] }],
            "discs": [
                { "triangles": [{ "anchor": [0.0, 0.0], "glow_anchor": [1.0, 1.0] }] },
                { "triangles": [] },
                { "triangles": [] }
            ]
        }"#;
        let level = LevelConfig::from_json(json).unwrap();
        assert_eq!(level.mirrors[0].collider_radius, MIRROR_COLLIDER_RADIUS);
        assert_eq!(level.discs[0].triangles[0].range, BEAM_RANGE);
        assert_eq!(
            level.initial_occupancy(),
            vec![DiscId(0), DiscId(1), DiscId(2)]
        );
    }

    #[test]
    fn test_rejects_cycle_outside_board() {
        let mut level = LevelConfig::reference();
        level.mirrors[2].cycle = [2, 3, 9];
        assert!(matches!(
            level.validate(),
            Err(PuzzleError::InvalidSlotIndex { slot: 9, .. })
        ));
    }

    #[test]
    fn test_rejects_disc_count_mismatch() {
        let mut level = LevelConfig::reference();
        level.discs.pop();
        assert!(matches!(level.validate(), Err(PuzzleError::InvalidLevel(_))));
    }

    #[test]
    fn test_rejects_degenerate_triangle() {
        let mut level = LevelConfig::reference();
        let t = &mut level.discs[0].triangles[0];
        t.glow_anchor = t.anchor;
        assert!(matches!(level.validate(), Err(PuzzleError::InvalidLevel(_))));
    }

    #[test]
    fn test_rejects_bad_occupancy() {
        let mut level = LevelConfig::reference();
        level.occupancy = Some(vec![0, 0, 2, 3, 4, 5, 6, 7, 8]);
        assert!(level.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            LevelConfig::from_json("{ \"slots\": 3 }"),
            Err(PuzzleError::Json(_))
        ));
    }
}
