//! Error types for the puzzle engine.

use thiserror::Error;

use crate::puzzle::{DiscId, MirrorIndex, SlotIndex};

/// Result type for puzzle operations.
pub type Result<T> = std::result::Result<T, PuzzleError>;

/// Errors that can occur while building or playing a puzzle.
#[derive(Debug, Error)]
pub enum PuzzleError {
    /// An activation named a mirror that is not in the topology table.
    #[error("unknown mirror {mirror} (puzzle has {mirror_count} mirrors)")]
    UnknownMirror {
        mirror: MirrorIndex,
        mirror_count: usize,
    },

    /// A slot index is out of range for the registry.
    #[error("invalid slot index {slot} (registry has {slot_count} slots)")]
    InvalidSlotIndex { slot: SlotIndex, slot_count: usize },

    /// A disc handle does not belong to the registry.
    #[error("unknown disc {disc} (registry has {disc_count} discs)")]
    UnknownDisc { disc: DiscId, disc_count: usize },

    /// `activate` while swapping, or `commit` while idle.
    #[error("cannot {action} while {phase}")]
    IllegalStateTransition {
        action: &'static str,
        phase: String,
    },

    /// The level description is inconsistent.
    #[error("invalid level: {0}")]
    InvalidLevel(String),

    /// The level description could not be parsed.
    #[error("level parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The level file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PuzzleError {
    /// Configuration errors abort construction; everything else is a
    /// rejected runtime event that leaves the puzzle untouched.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            PuzzleError::UnknownMirror { .. } | PuzzleError::IllegalStateTransition { .. }
        )
    }
}
