//! Puzzle state engine
//!
//! All puzzle logic lives here. This module must stay free of presentation:
//! - No timers or tweens (the caller drives `activate`/`commit`)
//! - Stable iteration order (by slot index, then disc id)
//! - Notifications go out through `PuzzleListener` only

pub mod beam;
pub mod completion;
pub mod coordinator;
pub mod events;
pub mod mirror;
pub mod raycast;
pub mod registry;
pub mod topology;
pub mod triangle;

pub use beam::BeamEvaluator;
pub use completion::CompletionDetector;
pub use coordinator::{CommitReport, SwapCoordinator, SwapPhase};
pub use events::{LogListener, PuzzleEvent, PuzzleListener};
pub use mirror::MirrorNode;
pub use raycast::{RayHit, raymarch_ray, sd_circle};
pub use registry::{Disc, DiscId, DiscSlot, DiscSlotRegistry, SlotIndex};
pub use topology::{MirrorIndex, RotationTopology};
pub use triangle::{BeamMode, Triangle, TriangleId};
