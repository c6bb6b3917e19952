//! Quarto-Engine command line entry point.
//!
//! ## Usage
//!
//! - `quarto-engine demo` - Decide one selection and one placement on a
//!   sample position and print them.
//! - `quarto-engine selfplay` - Play a full engine-vs-engine game,
//!   printing the board after every placement.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use quarto_engine::oracle::has_win;
use quarto_engine::{Board, EngineBackend, Piece, QuartoAgent, SearchConfig};

/// Quarto-Engine: adversarial search for Quarto
#[derive(Parser)]
#[command(name = "quarto-engine")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Copy, Clone, ValueEnum)]
enum Backend {
    Minimax,
    Mcts,
}

impl From<Backend> for EngineBackend {
    fn from(b: Backend) -> Self {
        match b {
            Backend::Minimax => EngineBackend::Minimax,
            Backend::Mcts => EngineBackend::Mcts,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Decide one selection and one placement on a sample position
    Demo,
    /// Play a full engine-vs-engine game
    Selfplay {
        /// Search backend for both sides
        #[arg(long, value_enum, default_value = "minimax")]
        backend: Backend,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Selfplay { backend }) => run_selfplay(backend.into()),
        Some(Commands::Demo) | None => run_demo(),
    }
}

fn run_demo() -> Result<()> {
    println!("Quarto-Engine: adversarial search demo\n");

    let grid = [[0u8; 4]; 4];
    let pieces: Vec<[u8; 4]> = Piece::all().iter().map(|p| p.0).collect();
    let agent = QuartoAgent::new(&grid, &pieces)?;

    let give = agent
        .select_piece()
        .ok_or_else(|| anyhow::anyhow!("no piece available"))?;
    println!("Piece handed to the opponent: {give}");

    let received = Piece([1, 0, 1, 0]);
    let (row, col) = agent
        .place_piece(received)
        .ok_or_else(|| anyhow::anyhow!("no cell available"))?;
    println!("Received {received}, placing at ({row}, {col})");
    Ok(())
}

fn run_selfplay(backend: EngineBackend) -> Result<()> {
    let cfg = SearchConfig {
        backend,
        ..SearchConfig::default()
    };

    let mut board = Board::new();
    let mut pool = Piece::all().to_vec();
    let mut selector = 1u8;

    loop {
        let agent = QuartoAgent::with_config(board.clone(), pool.clone(), cfg.clone());
        let Some(piece) = agent.select_piece() else {
            println!("No pieces left: draw.");
            break;
        };
        pool.retain(|&p| p != piece);

        let placer = 3 - selector;
        println!("Player {selector} hands {piece} to player {placer}");

        let agent = QuartoAgent::with_config(board.clone(), pool.clone(), cfg.clone());
        let Some((row, col)) = agent.place_piece(piece) else {
            println!("Board full: draw.");
            break;
        };
        board = board.with_piece(row, col, piece)?;
        println!("Player {placer} places at ({row}, {col}):\n{board}");

        if has_win(&board) {
            println!("Player {placer} wins.");
            break;
        }
        if board.is_full() {
            println!("Board full with no winning line: draw.");
            break;
        }
        selector = placer;
    }
    Ok(())
}
