//! Swap coordinator: one rotation at a time
//!
//! A rotation is a two-phase transaction. `activate` claims the board for a
//! mirror and tells the presentation layer to start animating; `commit` is
//! called once that animation is done and applies the permutation, re-lights
//! every beam and checks for completion. While a rotation is pending every
//! other activation is rejected.

use std::fmt;

use super::beam::BeamEvaluator;
use super::completion::CompletionDetector;
use super::events::PuzzleListener;
use super::mirror::MirrorNode;
use super::registry::{DiscId, DiscSlotRegistry, SlotIndex};
use super::topology::{MirrorIndex, RotationTopology};
use crate::error::{PuzzleError, Result};
use crate::level::LevelConfig;

/// Coordinator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwapPhase {
    /// Ready for an activation
    #[default]
    Idle,
    /// A rotation is pending; waiting for `commit`
    Swapping { mirror: MirrorIndex },
}

impl fmt::Display for SwapPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapPhase::Idle => write!(f, "idle"),
            SwapPhase::Swapping { mirror } => write!(f, "swapping mirror {mirror}"),
        }
    }
}

/// Outcome of a committed rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitReport {
    pub mirror: MirrorIndex,
    pub cycle: [SlotIndex; 3],
    /// Number of triangles whose beam mode changed
    pub beam_changes: usize,
    /// Every beam is sharp after this commit
    pub solved: bool,
    /// This commit raised the one-shot solved notification
    pub newly_solved: bool,
}

/// The puzzle engine: owns the board and serializes rotations
#[derive(Debug)]
pub struct SwapCoordinator<L: PuzzleListener = ()> {
    topology: RotationTopology,
    registry: DiscSlotRegistry,
    evaluator: BeamEvaluator,
    completion: CompletionDetector,
    phase: SwapPhase,
    listener: L,
    initial_occupancy: Vec<DiscId>,
    initial_angles: Vec<f32>,
}

impl<L: PuzzleListener> SwapCoordinator<L> {
    /// Assemble an engine from its parts.
    ///
    /// Fails if the topology does not fit the registry or the mirror set.
    /// Every beam is evaluated once (the listener hears the initial modes);
    /// completion is only checked after commits.
    pub fn new(
        topology: RotationTopology,
        registry: DiscSlotRegistry,
        evaluator: BeamEvaluator,
        completion: CompletionDetector,
        listener: L,
    ) -> Result<Self> {
        topology.validate(registry.slot_count())?;
        if evaluator.mirrors().len() != topology.len() {
            return Err(PuzzleError::InvalidLevel(format!(
                "{} mirrors for {} topology entries",
                evaluator.mirrors().len(),
                topology.len()
            )));
        }
        for (index, mirror) in evaluator.mirrors().iter().enumerate() {
            let cycle = topology.neighbors_of(index)?;
            if mirror.index != index || mirror.cycle != cycle {
                return Err(PuzzleError::InvalidLevel(format!(
                    "mirror {index} does not match topology entry {cycle:?}"
                )));
            }
        }

        let initial_occupancy = registry.occupancy();
        let initial_angles = evaluator.mirrors().iter().map(|m| m.angle).collect();
        let mut coordinator = Self {
            topology,
            registry,
            evaluator,
            completion,
            phase: SwapPhase::Idle,
            listener,
            initial_occupancy,
            initial_angles,
        };
        coordinator.reevaluate()?;

        log::debug!(
            "Puzzle ready: {} slots, {} mirrors",
            coordinator.registry.slot_count(),
            coordinator.topology.len()
        );
        Ok(coordinator)
    }

    /// Build an engine from a level description
    pub fn from_level(level: &LevelConfig, listener: L) -> Result<Self> {
        let (topology, registry, evaluator) = level.build()?;
        Self::new(topology, registry, evaluator, CompletionDetector::new(), listener)
    }

    pub fn phase(&self) -> SwapPhase {
        self.phase
    }

    pub fn is_swapping(&self) -> bool {
        matches!(self.phase, SwapPhase::Swapping { .. })
    }

    /// Every beam is currently sharp
    pub fn is_solved(&self) -> bool {
        CompletionDetector::is_solved(&self.registry)
    }

    pub fn registry(&self) -> &DiscSlotRegistry {
        &self.registry
    }

    pub fn topology(&self) -> &RotationTopology {
        &self.topology
    }

    pub fn mirrors(&self) -> &[MirrorNode] {
        self.evaluator.mirrors()
    }

    pub fn evaluator(&self) -> &BeamEvaluator {
        &self.evaluator
    }

    pub fn completion(&self) -> &CompletionDetector {
        &self.completion
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn into_listener(self) -> L {
        self.listener
    }

    /// Start rotating a mirror's triple.
    ///
    /// Returns the triple that `commit` will permute. Rejected (and logged)
    /// while another rotation is pending or if the mirror does not exist;
    /// a rejected activation changes nothing.
    pub fn activate(&mut self, mirror: MirrorIndex) -> Result<[SlotIndex; 3]> {
        if let SwapPhase::Swapping { mirror: pending } = self.phase {
            log::warn!("Ignoring mirror {mirror}: mirror {pending} is still swapping");
            return Err(PuzzleError::IllegalStateTransition {
                action: "activate",
                phase: self.phase.to_string(),
            });
        }

        let cycle = self
            .topology
            .neighbors_of(mirror)
            .inspect_err(|e| log::warn!("Ignoring activation: {e}"))?;
        let angle = self.evaluator.mirror_mut(mirror)?.rotate_step();

        self.phase = SwapPhase::Swapping { mirror };
        log::debug!("Mirror {mirror} activated, rotating slots {cycle:?}");

        self.listener.on_mirror_rotated(mirror, angle);
        self.listener.on_highlight_sector(mirror, true);
        Ok(cycle)
    }

    /// Finish the pending rotation.
    ///
    /// Applies the 3-cycle, reports the moved discs, re-evaluates every disc,
    /// clears the highlight and checks for completion. Rejected (and logged)
    /// when nothing is pending. The coordinator is idle afterwards, even if
    /// the rotation failed; a failed rotation puts the board back the way it
    /// was before the commit.
    pub fn commit(&mut self) -> Result<CommitReport> {
        let SwapPhase::Swapping { mirror } = self.phase else {
            log::warn!("Ignoring commit: no rotation pending");
            return Err(PuzzleError::IllegalStateTransition {
                action: "commit",
                phase: self.phase.to_string(),
            });
        };

        let snapshot = self.registry.clone();
        let result = self.finish_rotation(mirror);
        self.phase = SwapPhase::Idle;
        if let Err(e) = &result {
            log::error!("Rotation of mirror {mirror} failed: {e}");
            self.registry = snapshot;
            self.listener.on_highlight_sector(mirror, false);
        }
        result
    }

    fn finish_rotation(&mut self, mirror: MirrorIndex) -> Result<CommitReport> {
        let cycle = self.topology.neighbors_of(mirror)?;
        self.registry.apply_cycle(cycle)?;

        for slot in cycle {
            let slot = self.registry.slot(slot)?;
            self.listener
                .on_occupancy_changed(slot.index, slot.occupant, slot.position);
        }

        // The center slot is shared by every triple, so relight the whole board
        let beam_changes = self
            .evaluator
            .evaluate_registry(&mut self.registry, &mut self.listener)?;
        self.listener.on_highlight_sector(mirror, false);

        let solved = CompletionDetector::is_solved(&self.registry);
        let newly_solved = self.completion.observe(&self.registry);
        if newly_solved {
            log::info!("Puzzle solved!");
            self.listener.on_solved();
        }

        log::debug!(
            "Mirror {mirror} committed: {beam_changes} beam changes, solved={solved}"
        );
        Ok(CommitReport {
            mirror,
            cycle,
            beam_changes,
            solved,
            newly_solved,
        })
    }

    /// Re-evaluate every beam without moving anything; returns the number of
    /// mode changes
    pub fn reevaluate(&mut self) -> Result<usize> {
        self.evaluator
            .evaluate_registry(&mut self.registry, &mut self.listener)
    }

    /// Put the puzzle back in its initial configuration.
    ///
    /// Drops any pending rotation, restores the initial occupancy and mirror
    /// angles, re-arms the solved notification and re-lights the beams.
    /// The listener hears every slot and mirror that changes.
    pub fn reset(&mut self) -> Result<()> {
        if let SwapPhase::Swapping { mirror } = self.phase {
            self.phase = SwapPhase::Idle;
            self.listener.on_highlight_sector(mirror, false);
        }

        let before = self.registry.occupancy();
        for (slot, &disc) in self.initial_occupancy.iter().enumerate() {
            self.registry.set_occupant(slot, disc)?;
        }
        for (slot, previous) in before.into_iter().enumerate() {
            let slot = self.registry.slot(slot)?;
            if slot.occupant != previous {
                self.listener
                    .on_occupancy_changed(slot.index, slot.occupant, slot.position);
            }
        }

        for (mirror, &angle) in self.initial_angles.iter().enumerate() {
            let node = self.evaluator.mirror_mut(mirror)?;
            if node.angle != angle {
                node.angle = angle;
                self.listener.on_mirror_rotated(mirror, angle);
            }
        }

        self.completion.reset();
        let changes = self.reevaluate()?;
        log::info!("Puzzle reset ({changes} beam changes)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::events::PuzzleEvent;

    fn reference() -> SwapCoordinator<Vec<PuzzleEvent>> {
        let mut coordinator =
            SwapCoordinator::from_level(&LevelConfig::reference(), Vec::new()).unwrap();
        coordinator.listener_mut().clear();
        coordinator
    }

    #[test]
    fn test_activate_then_commit() {
        let mut coordinator = reference();
        assert_eq!(coordinator.phase(), SwapPhase::Idle);

        let cycle = coordinator.activate(3).unwrap();
        assert_eq!(cycle, [3, 4, 8]);
        assert_eq!(coordinator.phase(), SwapPhase::Swapping { mirror: 3 });
        assert!(coordinator.is_swapping());

        let report = coordinator.commit().unwrap();
        assert_eq!(report.mirror, 3);
        assert_eq!(report.cycle, [3, 4, 8]);
        assert_eq!(coordinator.phase(), SwapPhase::Idle);
    }

    #[test]
    fn test_commit_while_idle_is_rejected() {
        let mut coordinator = reference();
        let before = coordinator.registry().occupancy();
        let err = coordinator.commit().unwrap_err();
        assert!(matches!(
            err,
            PuzzleError::IllegalStateTransition {
                action: "commit",
                ..
            }
        ));
        assert_eq!(coordinator.registry().occupancy(), before);
        assert!(coordinator.listener().is_empty());
    }

    #[test]
    fn test_unknown_mirror_stays_idle() {
        let mut coordinator = reference();
        let err = coordinator.activate(42).unwrap_err();
        assert!(matches!(err, PuzzleError::UnknownMirror { mirror: 42, .. }));
        assert!(!err.is_fatal());
        assert_eq!(coordinator.phase(), SwapPhase::Idle);
        assert!(coordinator.listener().is_empty());
    }

    #[test]
    fn test_activate_rotates_and_highlights() {
        let mut coordinator = reference();
        coordinator.activate(5).unwrap();
        let angle = coordinator.mirrors()[5].angle;
        assert!((angle - crate::consts::MIRROR_ROTATION_STEP).abs() < 1e-6);
        assert_eq!(
            coordinator.listener().as_slice(),
            &[
                PuzzleEvent::MirrorRotated { mirror: 5, angle },
                PuzzleEvent::HighlightSector {
                    mirror: 5,
                    active: true
                },
            ]
        );
    }

    #[test]
    fn test_commit_reports_moved_discs_in_cycle_order() {
        let mut coordinator = reference();
        let before = coordinator.registry().occupancy();
        coordinator.activate(0).unwrap();
        coordinator.listener_mut().clear();
        coordinator.commit().unwrap();

        let moves: Vec<_> = coordinator
            .listener()
            .iter()
            .filter_map(|e| match e {
                PuzzleEvent::OccupancyChanged { slot, disc, .. } => Some((*slot, *disc)),
                _ => None,
            })
            .collect();
        assert_eq!(moves, vec![(0, before[8]), (1, before[0]), (8, before[1])]);
        assert_eq!(
            coordinator.listener().last(),
            Some(&PuzzleEvent::HighlightSector {
                mirror: 0,
                active: false
            })
        );
    }

    #[test]
    fn test_failed_commit_restores_board() {
        let mut coordinator = reference();
        let before = coordinator.registry().occupancy();
        let modes: Vec<_> = coordinator.registry().triangles().map(|t| t.mode).collect();

        coordinator.activate(3).unwrap();
        let mut cycles: Vec<_> = coordinator.topology.iter().map(|(_, c)| c).collect();
        cycles[3] = [3, 4, 9];
        coordinator.topology = RotationTopology::from_cycles(cycles);

        assert!(coordinator.commit().is_err());
        assert_eq!(coordinator.phase(), SwapPhase::Idle);
        assert_eq!(coordinator.registry().occupancy(), before);
        assert_eq!(
            coordinator.registry().triangles().map(|t| t.mode).collect::<Vec<_>>(),
            modes
        );
        assert_eq!(
            coordinator.listener().last(),
            Some(&PuzzleEvent::HighlightSector {
                mirror: 3,
                active: false
            })
        );
    }

    #[test]
    fn test_reset_is_quiet_when_nothing_moved() {
        let mut coordinator = reference();
        coordinator.reset().unwrap();
        assert!(coordinator.listener().is_empty());
    }

    #[test]
    fn test_reset_restores_initial_board() {
        let mut coordinator = reference();
        let initial = coordinator.registry().occupancy();
        let modes: Vec<_> = coordinator.registry().triangles().map(|t| t.mode).collect();

        coordinator.activate(3).unwrap();
        coordinator.commit().unwrap();
        assert!(coordinator.completion().has_fired());
        coordinator.activate(6).unwrap();

        coordinator.reset().unwrap();
        assert_eq!(coordinator.phase(), SwapPhase::Idle);
        assert_eq!(coordinator.registry().occupancy(), initial);
        assert!(coordinator.mirrors().iter().all(|m| m.angle == 0.0));
        assert!(!coordinator.completion().has_fired());
        assert_eq!(
            coordinator.registry().triangles().map(|t| t.mode).collect::<Vec<_>>(),
            modes
        );
    }
}
