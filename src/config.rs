//! Engine configuration.
//!
//! Score weights, depth policy and time budgets are passed explicitly to
//! the search code instead of living as process-wide constants, so tests
//! and callers can tune them per decision.

use std::time::Duration;

/// How opponent decisions are modeled at inner search plies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum OpponentModel {
    /// The opponent picks the reply worst for us (true minimax). This is
    /// the intended design and the default.
    #[default]
    Adversarial,
    /// The opponent's reply is sampled uniformly at random. A weak mode
    /// kept for strength comparisons; never the default.
    Random,
}

/// Which search backend the agent dispatches to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum EngineBackend {
    /// Alpha-beta minimax with iterative deepening (canonical).
    #[default]
    Minimax,
    /// UCT Monte-Carlo tree search.
    Mcts,
}

/// Tunable parameters for both search backends.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Leaf score for a won position.
    pub win_score: i32,
    /// Leaf penalty per exposed threat (3 matching pieces, 1 empty cell).
    pub threat_penalty: i32,
    /// Bonus for a center cell, applied only to the first placement on an
    /// otherwise empty board.
    pub center_bonus: i32,
    /// With at least this many pieces still available, decisions fall back
    /// to a uniform-random choice: the branching factor makes deep search
    /// unproductive that early.
    pub random_move_threshold: usize,
    /// With at most this many empty cells left, search runs to the end of
    /// the game without pruning; the exact value is affordable.
    pub exhaustive_threshold: usize,
    /// Depth cap for iterative deepening (in SELECT plies).
    pub max_depth: u32,
    /// Soft wall-clock budget per deepening iteration. An iteration that
    /// overruns is discarded and deepening stops.
    pub time_budget: Duration,
    pub opponent_model: OpponentModel,
    pub backend: EngineBackend,
    /// Number of MCTS iterations per decision.
    pub mcts_simulations: usize,
    /// UCT exploration constant.
    pub uct_exploration: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            win_score: 10_000,
            threat_penalty: 10,
            center_bonus: 3,
            random_move_threshold: 13,
            exhaustive_threshold: 6,
            max_depth: 4,
            time_budget: Duration::from_millis(500),
            opponent_model: OpponentModel::default(),
            backend: EngineBackend::default(),
            mcts_simulations: 1_000,
            uct_exploration: 1.4,
        }
    }
}

impl SearchConfig {
    /// Target search depth (in SELECT plies) for the given pool size.
    ///
    /// Shallow while the branching factor is huge, deeper as the game
    /// narrows. Endgames below [`SearchConfig::exhaustive_threshold`] are
    /// handled separately by an unpruned exhaustive search.
    pub fn depth_for(&self, remaining_pieces: usize) -> u32 {
        let depth = match remaining_pieces {
            0..=6 => self.max_depth.max(3),
            7..=8 => 3,
            9..=12 => 2,
            _ => 1,
        };
        depth.min(self.max_depth.max(1))
    }
}
