//! SDF-based beam casting
//!
//! Mirrors are circles, so the scene is the union of their signed distance
//! fields. A beam is sphere-traced from its origin: every step advances by the
//! distance to the nearest collider, which can never overshoot one.

use glam::Vec2;

use super::mirror::MirrorNode;
use super::topology::MirrorIndex;
use crate::consts::{RAY_HIT_EPSILON, RAY_MAX_STEPS};

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Where a beam first touched a mirror
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub mirror: MirrorIndex,
    /// Distance travelled along the beam
    pub distance: f32,
    pub point: Vec2,
}

/// Nearest mirror to `p` and the signed distance to it
fn nearest_mirror(p: Vec2, mirrors: &[MirrorNode]) -> Option<(MirrorIndex, f32)> {
    mirrors
        .iter()
        .map(|m| (m.index, m.distance(p)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
}

/// Sphere-trace a ray against the mirror colliders.
///
/// `dir` must be non-zero; it is normalized here. Returns the first hit within
/// `range`, or `None`. An origin already inside a collider hits at distance 0.
pub fn raymarch_ray(origin: Vec2, dir: Vec2, range: f32, mirrors: &[MirrorNode]) -> Option<RayHit> {
    let dir = dir.try_normalize()?;
    if range <= 0.0 {
        return None;
    }

    let mut t = 0.0;
    for _ in 0..RAY_MAX_STEPS {
        let p = origin + dir * t;
        let (mirror, d) = nearest_mirror(p, mirrors)?;

        if d < RAY_HIT_EPSILON {
            return Some(RayHit {
                mirror,
                distance: t,
                point: p,
            });
        }

        t += d;
        if t > range {
            break;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mirror_at(index: MirrorIndex, x: f32, y: f32) -> MirrorNode {
        MirrorNode::new(index, Vec2::new(x, y), 0.5, [0, 1, 2])
    }

    #[test]
    fn test_hit_straight_ahead() {
        let mirrors = [mirror_at(0, 3.0, 0.0)];
        let hit = raymarch_ray(Vec2::ZERO, Vec2::X, 5.0, &mirrors).unwrap();
        assert_eq!(hit.mirror, 0);
        assert!((hit.distance - 2.5).abs() < 1e-3);
    }

    #[test]
    fn test_miss_pointing_away() {
        let mirrors = [mirror_at(0, 3.0, 0.0)];
        assert!(raymarch_ray(Vec2::ZERO, -Vec2::X, 5.0, &mirrors).is_none());
    }

    #[test]
    fn test_out_of_range() {
        let mirrors = [mirror_at(0, 6.0, 0.0)];
        // Surface at 5.5, range 5
        assert!(raymarch_ray(Vec2::ZERO, Vec2::X, 5.0, &mirrors).is_none());
        assert!(raymarch_ray(Vec2::ZERO, Vec2::X, 6.0, &mirrors).is_some());
    }

    #[test]
    fn test_nearest_of_two_in_line() {
        let mirrors = [mirror_at(0, 4.0, 0.0), mirror_at(1, 2.0, 0.0)];
        let hit = raymarch_ray(Vec2::ZERO, Vec2::X, 5.0, &mirrors).unwrap();
        assert_eq!(hit.mirror, 1);
    }

    #[test]
    fn test_passes_beside_collider() {
        // Beam runs 0.8 above a 0.5-radius mirror
        let mirrors = [mirror_at(0, 2.0, -0.8)];
        assert!(raymarch_ray(Vec2::ZERO, Vec2::X, 5.0, &mirrors).is_none());
    }

    #[test]
    fn test_origin_inside_collider() {
        let mirrors = [mirror_at(0, 0.2, 0.0)];
        let hit = raymarch_ray(Vec2::ZERO, Vec2::Y, 5.0, &mirrors).unwrap();
        assert_eq!(hit.distance, 0.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        let mirrors = [mirror_at(0, 3.0, 0.0)];
        assert!(raymarch_ray(Vec2::ZERO, Vec2::ZERO, 5.0, &mirrors).is_none());
        assert!(raymarch_ray(Vec2::ZERO, Vec2::X, 5.0, &[]).is_none());
    }

    #[test]
    fn test_sd_circle() {
        assert!((sd_circle(Vec2::new(3.0, 4.0), Vec2::ZERO, 1.0) - 4.0).abs() < 1e-6);
    }
}
