//! Quarto-Engine: a decision engine for the board game Quarto.
//!
//! Given a 4x4 board and a shared pool of 16 uniquely-attributed pieces,
//! the engine decides which piece to hand the opponent and where to place
//! a piece it receives. Wins are shared-attribute lines: rows, columns,
//! diagonals, and every 2x2 subgrid (Gobblet-style variant rule).
//!
//! ## Modules
//!
//! - [`board`] - Piece and board representation, pure simulation
//! - [`oracle`] - Win and threat detection
//! - [`config`] - Search parameters and backend selection
//! - [`minimax`] - Alpha-beta search with iterative deepening (canonical)
//! - [`mcts`] - UCT Monte-Carlo tree search (alternative backend)
//! - [`agent`] - The two-method contract for match orchestrators
//! - [`error`] - Invariant-violation errors
//!
//! ## Example
//!
//! ```
//! use quarto_engine::{QuartoAgent, Piece};
//!
//! // An empty game: blank board, all 16 pieces available.
//! let grid = [[0u8; 4]; 4];
//! let pieces: Vec<[u8; 4]> = Piece::all().iter().map(|p| p.0).collect();
//! let agent = QuartoAgent::new(&grid, &pieces).unwrap();
//!
//! // Hand a piece to the opponent, then place one we were handed.
//! let give = agent.select_piece().unwrap();
//! let (row, col) = agent.place_piece(give).unwrap();
//! assert!(row < 4 && col < 4);
//! ```

pub mod agent;
pub mod board;
pub mod config;
pub mod error;
pub mod mcts;
pub mod minimax;
pub mod oracle;

pub use agent::QuartoAgent;
pub use board::{Board, Cell, Piece};
pub use config::{EngineBackend, OpponentModel, SearchConfig};
pub use error::EngineError;
