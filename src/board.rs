//! Quarto board and piece representation.
//!
//! A piece is a 4-tuple of binary attributes; exactly 16 distinct pieces
//! exist, one per point of the 4-bit cross product. The board is a 4x4
//! grid of cell values where 0 means empty and 1..=16 is the 1-based
//! index of a placed piece in the canonical enumeration.
//!
//! All simulation is copy-on-write: [`Board::with_piece`] and
//! [`remove_piece`] return fresh values and never alias caller-owned
//! state. Occupied-cell and absent-piece violations fail loudly with an
//! [`EngineError`].

use std::fmt;

use crate::error::EngineError;

/// Board side length.
pub const SIZE: usize = 4;

/// Number of binary attributes per piece.
pub const ATTRS: usize = 4;

/// Number of distinct pieces (4-bit cross product).
pub const PIECE_COUNT: usize = 16;

/// A cell coordinate as (row, col), each in 0..4.
pub type Cell = (usize, usize);

/// A Quarto piece: four binary attributes, each 0 or 1.
///
/// The canonical enumeration orders pieces lexicographically by their
/// attribute tuple, so `[0,0,0,0]` has index 1 and `[1,1,1,1]` index 16.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Piece(pub [u8; ATTRS]);

impl Piece {
    /// The 1-based index of this piece in the canonical enumeration.
    pub fn index(&self) -> u8 {
        let [a, b, c, d] = self.0;
        a * 8 + b * 4 + c * 2 + d + 1
    }

    /// Look up a piece by its 1-based canonical index.
    ///
    /// # Errors
    /// Returns [`EngineError::BadPieceIndex`] for indices outside 1..=16.
    pub fn from_index(idx: u8) -> Result<Piece, EngineError> {
        if !(1..=PIECE_COUNT as u8).contains(&idx) {
            return Err(EngineError::BadPieceIndex(idx));
        }
        let bits = idx - 1;
        Ok(Piece([
            (bits >> 3) & 1,
            (bits >> 2) & 1,
            (bits >> 1) & 1,
            bits & 1,
        ]))
    }

    /// The value (0 or 1) of the attribute at position `i`.
    #[inline]
    pub fn attr(&self, i: usize) -> u8 {
        self.0[i]
    }

    /// All 16 pieces in canonical enumeration order.
    pub fn all() -> [Piece; PIECE_COUNT] {
        std::array::from_fn(|i| {
            let bits = i as u8;
            Piece([
                (bits >> 3) & 1,
                (bits >> 2) & 1,
                (bits >> 1) & 1,
                bits & 1,
            ])
        })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "({a},{b},{c},{d})")
    }
}

/// A 4x4 Quarto board.
///
/// Cells hold 0 (empty) or the 1-based index of the occupying piece.
/// A non-zero index appears at most once: a placed piece is committed
/// for the rest of the game.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Board {
    cells: [[u8; SIZE]; SIZE],
}

impl Board {
    /// An empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from a raw 4x4 integer matrix.
    ///
    /// # Errors
    /// - [`EngineError::BadPieceIndex`] if any cell value exceeds 16.
    /// - [`EngineError::BadGrid`] if a non-zero index appears twice.
    pub fn from_grid(grid: &[[u8; SIZE]; SIZE]) -> Result<Self, EngineError> {
        let mut seen = [false; PIECE_COUNT + 1];
        for row in grid {
            for &v in row {
                if v as usize > PIECE_COUNT {
                    return Err(EngineError::BadPieceIndex(v));
                }
                if v != 0 {
                    if seen[v as usize] {
                        return Err(EngineError::BadGrid(format!(
                            "piece index {v} appears more than once"
                        )));
                    }
                    seen[v as usize] = true;
                }
            }
        }
        Ok(Self { cells: *grid })
    }

    /// The raw 4x4 integer matrix (round-trips with [`Board::from_grid`]).
    pub fn grid(&self) -> [[u8; SIZE]; SIZE] {
        self.cells
    }

    /// Raw cell value: 0 for empty, 1..=16 for a piece index.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> u8 {
        self.cells[row][col]
    }

    /// The piece occupying a cell, if any.
    pub fn piece_at(&self, row: usize, col: usize) -> Option<Piece> {
        Piece::from_index(self.cells[row][col]).ok()
    }

    #[inline]
    pub fn is_empty_cell(&self, row: usize, col: usize) -> bool {
        self.cells[row][col] == 0
    }

    /// All empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Cell> {
        let mut out = Vec::with_capacity(SIZE * SIZE);
        for row in 0..SIZE {
            for col in 0..SIZE {
                if self.cells[row][col] == 0 {
                    out.push((row, col));
                }
            }
        }
        out
    }

    /// Number of occupied cells.
    pub fn placed_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&v| v != 0).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|&v| v != 0)
    }

    /// A copy of this board with `piece` written at `(row, col)`.
    ///
    /// The receiver is never mutated.
    ///
    /// # Errors
    /// Returns [`EngineError::OccupiedCell`] if the target is occupied.
    pub fn with_piece(&self, row: usize, col: usize, piece: Piece) -> Result<Board, EngineError> {
        if self.cells[row][col] != 0 {
            return Err(EngineError::OccupiedCell { row, col });
        }
        let mut next = self.clone();
        next.cells[row][col] = piece.index();
        Ok(next)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for &v in row {
                if v == 0 {
                    write!(f, "  . ")?;
                } else {
                    write!(f, "{v:>3} ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A copy of `pool` without `piece`.
///
/// # Errors
/// Returns [`EngineError::PieceUnavailable`] if `piece` is not in `pool`.
pub fn remove_piece(pool: &[Piece], piece: Piece) -> Result<Vec<Piece>, EngineError> {
    let idx = pool
        .iter()
        .position(|&p| p == piece)
        .ok_or(EngineError::PieceUnavailable(piece))?;
    let mut next = pool.to_vec();
    next.remove(idx);
    Ok(next)
}
