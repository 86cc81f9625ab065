//! Invariant violations raised by the game core.
//!
//! Generation, pursuit and movement are total over valid input. Everything
//! here means a caller handed the core something it can never make sense of,
//! so none of these are retried.

use thiserror::Error;

use crate::coords::Pos;

pub type Result<T, E = GameError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Levels are 1-indexed.
    #[error("level must be at least 1, got {level}")]
    InvalidLevel { level: u32 },

    #[error("grid side must be at least 2 tiles, got {size}")]
    GridTooSmall { size: usize },

    #[error("position {pos} is outside a {size}x{size} grid")]
    OutOfBounds { pos: Pos, size: usize },

    #[error("({dx}, {dy}) is not a unit step")]
    NotUnitStep { dx: isize, dy: isize },
}
