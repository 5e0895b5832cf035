//! Puzzle completion: every beam sharp

use super::registry::{Disc, DiscSlotRegistry};

/// Completion predicate plus the one-shot "solved" latch
#[derive(Debug, Clone, Default)]
pub struct CompletionDetector {
    fired: bool,
}

impl CompletionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff every triangle of every disc is sharp.
    /// A registry without triangles has nothing to light and is never solved.
    pub fn is_solved(registry: &DiscSlotRegistry) -> bool {
        registry.triangles().next().is_some() && registry.discs().iter().all(Disc::all_sharp)
    }

    /// Check the registry; returns true only the first time it is solved
    pub fn observe(&mut self, registry: &DiscSlotRegistry) -> bool {
        if self.fired || !Self::is_solved(registry) {
            return false;
        }
        self.fired = true;
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Re-arm the latch (puzzle reinitialized)
    pub fn reset(&mut self) {
        self.fired = false;
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::puzzle::registry::DiscId;
    use crate::puzzle::triangle::{BeamMode, Triangle, TriangleId};

    fn registry(modes: &[BeamMode]) -> DiscSlotRegistry {
        let triangles = modes
            .iter()
            .enumerate()
            .map(|(index, &mode)| {
                let mut t = Triangle::new(
                    TriangleId {
                        disc: DiscId(0),
                        index,
                    },
                    Vec2::ZERO,
                    Vec2::X,
                );
                t.mode = mode;
                t
            })
            .collect();
        DiscSlotRegistry::new(vec![Vec2::ZERO], vec![Disc::new(DiscId(0), triangles)], &[DiscId(0)])
            .unwrap()
    }

    #[test]
    fn test_all_sharp_is_solved() {
        assert!(CompletionDetector::is_solved(&registry(&[BeamMode::Sharp, BeamMode::Sharp])));
        assert!(!CompletionDetector::is_solved(&registry(&[BeamMode::Sharp, BeamMode::Glow])));
        assert!(!CompletionDetector::is_solved(&registry(&[])));
    }

    #[test]
    fn test_observe_fires_once_until_reset() {
        let solved = registry(&[BeamMode::Sharp]);
        let unsolved = registry(&[BeamMode::Glow]);
        let mut detector = CompletionDetector::new();

        assert!(!detector.observe(&unsolved));
        assert!(detector.observe(&solved));
        assert!(!detector.observe(&solved));
        // Disturbed then solved again: still latched
        assert!(!detector.observe(&unsolved));
        assert!(!detector.observe(&solved));
        assert!(detector.has_fired());

        detector.reset();
        assert!(detector.observe(&solved));
    }
}
