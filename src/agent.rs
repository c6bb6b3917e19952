//! The two-method agent contract consumed by the match orchestrator.
//!
//! A [`QuartoAgent`] is constructed from the orchestrator's plain data
//! (a 4x4 integer matrix and the set of available attribute tuples) and
//! answers `select_piece` / `place_piece`. It holds no state between
//! calls beyond its constructor inputs; every decision rebuilds its
//! search tree from scratch.
//!
//! Full-board and empty-pool positions are terminal, so both methods
//! return `None` there instead of erroring.

use crate::board::{ATTRS, Board, Cell, Piece, SIZE};
use crate::config::{EngineBackend, SearchConfig};
use crate::error::EngineError;
use crate::mcts::{self, Action};
use crate::minimax;
use crate::oracle::winning_cell;

/// Decision agent for one side of a Quarto game.
pub struct QuartoAgent {
    board: Board,
    pool: Vec<Piece>,
    cfg: SearchConfig,
}

impl QuartoAgent {
    /// Build an agent from the orchestrator's board matrix and available
    /// piece tuples.
    ///
    /// # Errors
    /// Propagates [`EngineError`] for malformed grids or attribute tuples
    /// outside {0, 1}.
    pub fn new(
        grid: &[[u8; SIZE]; SIZE],
        available_pieces: &[[u8; ATTRS]],
    ) -> Result<Self, EngineError> {
        let board = Board::from_grid(grid)?;
        let mut pool = Vec::with_capacity(available_pieces.len());
        for &attrs in available_pieces {
            if attrs.iter().any(|&a| a > 1) {
                return Err(EngineError::BadGrid(format!(
                    "attribute tuple {attrs:?} contains a value outside 0..=1"
                )));
            }
            pool.push(Piece(attrs));
        }
        Ok(Self {
            board,
            pool,
            cfg: SearchConfig::default(),
        })
    }

    /// Build an agent from already-typed state and a custom configuration.
    pub fn with_config(board: Board, pool: Vec<Piece>, cfg: SearchConfig) -> Self {
        Self { board, pool, cfg }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn available_pieces(&self) -> &[Piece] {
        &self.pool
    }

    /// Pick the piece to hand to the opponent.
    ///
    /// Returns a member of the available pool, or `None` when the pool is
    /// empty (terminal position).
    pub fn select_piece(&self) -> Option<Piece> {
        if self.pool.is_empty() {
            return None;
        }
        match self.cfg.backend {
            EngineBackend::Minimax => minimax::best_selection(&self.board, &self.pool, &self.cfg),
            EngineBackend::Mcts => {
                match mcts::search(&self.board, &self.pool, None, &self.cfg) {
                    Some(Action::Give(piece)) => Some(piece),
                    _ => self.pool.first().copied(),
                }
            }
        }
    }

    /// Pick an empty cell for the piece the opponent handed us.
    ///
    /// Returns `None` when the board is full (terminal position). An
    /// immediately winning cell is taken without invoking search.
    pub fn place_piece(&self, piece: Piece) -> Option<Cell> {
        if self.board.is_full() {
            return None;
        }

        // Explicit win-detection fast path.
        if let Some(cell) = winning_cell(&self.board, piece) {
            return Some(cell);
        }

        // The pool the opponent will draw from afterwards excludes the
        // piece we are holding, however the orchestrator tracks it.
        let pool: Vec<Piece> = self.pool.iter().copied().filter(|&p| p != piece).collect();

        match self.cfg.backend {
            EngineBackend::Minimax => minimax::best_placement(&self.board, &pool, piece, &self.cfg),
            EngineBackend::Mcts => {
                match mcts::search(&self.board, &pool, Some(piece), &self.cfg) {
                    Some(Action::Place(cell)) => Some(cell),
                    _ => self.board.empty_cells().first().copied(),
                }
            }
        }
    }
}
