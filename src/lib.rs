//! Light Discs - A rotation-based light-routing puzzle engine
//!
//! Core modules:
//! - `puzzle`: Puzzle state engine (topology, slots, beams, swaps, completion)
//! - `level`: Data-driven level descriptions and the built-in reference level
//! - `error`: Error types shared by the engine and level loading

pub mod error;
pub mod level;
pub mod puzzle;

pub use error::{PuzzleError, Result};
pub use level::LevelConfig;
pub use puzzle::{BeamMode, PuzzleListener, SwapCoordinator, SwapPhase};

use glam::Vec2;

/// Puzzle configuration constants
pub mod consts {
    /// Number of outer slots in the reference ring
    pub const RING_SLOTS: usize = 8;
    /// Distance of the outer slots from the center slot
    pub const RING_RADIUS: f32 = 3.0;

    /// Mirrors sit between each pair of adjacent outer slots and the center
    pub const MIRROR_RING_RADIUS: f32 = 1.8;
    /// Radius of a mirror's circular collider footprint
    pub const MIRROR_COLLIDER_RADIUS: f32 = 0.45;
    /// Visual rotation applied to a mirror on each accepted activation (60°)
    pub const MIRROR_ROTATION_STEP: f32 = std::f32::consts::FRAC_PI_3;

    /// Default beam search radius (world units)
    pub const BEAM_RANGE: f32 = 5.0;
    /// Triangle anchor distance from its disc center
    pub const TRIANGLE_ANCHOR_OFFSET: f32 = 0.35;
    /// Glow-beam anchor distance from its disc center
    pub const GLOW_ANCHOR_OFFSET: f32 = 0.85;

    /// Sphere tracing: surface distance that counts as a hit
    pub const RAY_HIT_EPSILON: f32 = 1e-3;
    /// Sphere tracing: maximum steps before giving up
    pub const RAY_MAX_STEPS: usize = 128;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0) - (-PI / 2.0)).abs() < 1e-6);
        assert!((normalize_angle(2.0 * PI + 0.25) - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(2.0, PI / 2.0);
        assert!(p.x.abs() < 1e-6);
        assert!((p.y - 2.0).abs() < 1e-6);
    }
}
