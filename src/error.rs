//! Error types for invariant violations at the simulation boundary.
//!
//! These are precondition failures that a correct orchestrator never
//! triggers: placing on an occupied cell, removing an absent piece,
//! feeding the engine a malformed board. Empty action sets (full board,
//! exhausted pool) are *not* errors; they signal terminal evaluation and
//! are reported as `None` by the agent facade.

use crate::board::Piece;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Attempted to place a piece on an occupied cell.
    #[error("cell ({row}, {col}) is already occupied")]
    OccupiedCell { row: usize, col: usize },

    /// Attempted to remove a piece that is not in the pool.
    #[error("piece {0} is not in the available pool")]
    PieceUnavailable(Piece),

    /// A cell value outside 0..=16 was supplied.
    #[error("invalid piece index {0} (must be 1..=16)")]
    BadPieceIndex(u8),

    /// A supplied board violates the one-placement-per-piece invariant.
    #[error("malformed board: {0}")]
    BadGrid(String),
}
