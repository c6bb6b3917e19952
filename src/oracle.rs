//! Win and threat detection over board state.
//!
//! Quarto is won by completing a line of 4 pieces that share at least one
//! attribute. The engine plays the subgrid variant: in addition to the 10
//! classic lines (4 rows, 4 columns, 2 diagonals) every 2x2 block of
//! adjacent cells counts, giving 19 win lines in total.
//!
//! A *threat* is a line with exactly 3 occupied cells whose occupants
//! already share an attribute: whoever is handed a matching piece wins on
//! the spot. Lines with fewer than 3 or with 4 occupied cells never count
//! as threats.
//!
//! Everything here is a pure function over an immutable board; calling an
//! oracle twice on the same board yields identical results.

use crate::board::{ATTRS, Board, Cell, Piece, SIZE};

/// Total number of win lines: 4 rows + 4 columns + 2 diagonals + 9 subgrids.
pub const LINE_COUNT: usize = 19;

/// Every win line as 4 cell coordinates.
///
/// Order: rows, columns, main diagonal, anti-diagonal, then the nine 2x2
/// subgrids in row-major order of their top-left corner.
pub const LINES: [[Cell; 4]; LINE_COUNT] = build_lines();

const fn build_lines() -> [[Cell; 4]; LINE_COUNT] {
    let mut lines = [[(0usize, 0usize); 4]; LINE_COUNT];
    let mut k = 0;

    let mut r = 0;
    while r < SIZE {
        let mut c = 0;
        while c < SIZE {
            lines[k][c] = (r, c);
            c += 1;
        }
        k += 1;
        r += 1;
    }

    let mut c = 0;
    while c < SIZE {
        let mut r = 0;
        while r < SIZE {
            lines[k][r] = (r, c);
            r += 1;
        }
        k += 1;
        c += 1;
    }

    let mut i = 0;
    while i < SIZE {
        lines[k][i] = (i, i);
        lines[k + 1][i] = (i, SIZE - 1 - i);
        i += 1;
    }
    k += 2;

    let mut r = 0;
    while r < SIZE - 1 {
        let mut c = 0;
        while c < SIZE - 1 {
            lines[k] = [(r, c), (r, c + 1), (r + 1, c), (r + 1, c + 1)];
            k += 1;
            c += 1;
        }
        r += 1;
    }

    lines
}

/// The index of an attribute shared by every piece in `pieces`, if any.
pub fn shared_attribute(pieces: &[Piece]) -> Option<usize> {
    if pieces.is_empty() {
        return None;
    }
    (0..ATTRS).find(|&i| {
        let v = pieces[0].attr(i);
        pieces.iter().all(|p| p.attr(i) == v)
    })
}

/// Whether a line is a completed win: all 4 cells occupied and the
/// occupants share at least one attribute.
pub fn is_winning_line(board: &Board, line: &[Cell; 4]) -> bool {
    let mut pieces = [Piece([0; ATTRS]); 4];
    for (slot, &(r, c)) in pieces.iter_mut().zip(line) {
        match board.piece_at(r, c) {
            Some(p) => *slot = p,
            None => return false,
        }
    }
    shared_attribute(&pieces).is_some()
}

/// Whether any of the 19 lines is a completed win.
pub fn has_win(board: &Board) -> bool {
    LINES.iter().any(|line| is_winning_line(board, line))
}

/// Number of threats on the board.
///
/// Counts every line with exactly 3 occupied, attribute-sharing cells.
/// Several lines can be threatened at once; each counts separately.
pub fn count_threats(board: &Board) -> u32 {
    let mut threats = 0;
    let mut pieces = Vec::with_capacity(4);
    for line in &LINES {
        pieces.clear();
        let mut empties = 0;
        for &(r, c) in line {
            match board.piece_at(r, c) {
                Some(p) => pieces.push(p),
                None => empties += 1,
            }
        }
        if empties == 1 && shared_attribute(&pieces).is_some() {
            threats += 1;
        }
    }
    threats
}

/// The first empty cell where placing `piece` completes a win, if any.
///
/// Scans each line for a lone empty cell whose 3 occupants together with
/// `piece` share an attribute. Backs the immediate-win fast path, so no
/// board copies are made.
pub fn winning_cell(board: &Board, piece: Piece) -> Option<Cell> {
    let mut pieces = Vec::with_capacity(4);
    for line in &LINES {
        pieces.clear();
        let mut empty = None;
        for &(r, c) in line {
            match board.piece_at(r, c) {
                Some(p) => pieces.push(p),
                None => empty = Some((r, c)),
            }
        }
        if pieces.len() == 3 {
            pieces.push(piece);
            if shared_attribute(&pieces).is_some() {
                return empty;
            }
        }
    }
    None
}
