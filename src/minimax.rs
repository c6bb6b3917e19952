//! Minimax search with alpha-beta pruning over the Quarto turn structure.
//!
//! Quarto interleaves two decision types: PLACE (put the piece you were
//! handed on an empty cell) and SELECT (hand one of the remaining pieces
//! to the opponent). The search alternates them in true turn order:
//! place, select, opponent places, opponent selects, and so on. Depth is
//! counted in SELECT plies.
//!
//! Policy knobs live in [`SearchConfig`]:
//! - very early game (>= `random_move_threshold` pieces left) short-cuts
//!   to a one-ply greedy choice, since the branching factor makes deeper
//!   search unproductive;
//! - endgames (<= `exhaustive_threshold` empty cells) are searched to the
//!   end of the game without pruning, giving an exact value;
//! - everything in between runs iterative deepening under a soft
//!   wall-clock budget per iteration.
//!
//! Root ties are broken uniformly at random so the engine is not
//! exploitable by a deterministic opponent. All state is passed by value
//! or shared reference; nothing caller-visible is mutated.

use std::time::Instant;

use crate::board::{Board, Cell, Piece, remove_piece};
use crate::config::{OpponentModel, SearchConfig};
use crate::oracle::{count_threats, has_win, winning_cell};

const INFINITY: i32 = i32::MAX / 2;

/// The four center cells, worth a small bonus for the opening placement.
pub(crate) const CENTER_CELLS: [Cell; 4] = [(1, 1), (1, 2), (2, 1), (2, 2)];

/// Choose a cell for `piece` on `board`, with `pool` the pieces still
/// available afterwards. Returns `None` only for a full board.
pub fn best_placement(
    board: &Board,
    pool: &[Piece],
    piece: Piece,
    cfg: &SearchConfig,
) -> Option<Cell> {
    let empties = board.empty_cells();
    if empties.is_empty() {
        return None;
    }

    // Immediate win: explicit fast path, no search.
    if let Some(cell) = winning_cell(board, piece) {
        tracing::debug!(?cell, "immediate winning placement");
        return Some(cell);
    }

    // Opening: branching is too wide for search to pay off. Greedy
    // one-ply evaluation, ties broken uniformly at random.
    if pool.len() + 1 >= cfg.random_move_threshold {
        let scored = score_placements(board, pool, piece, 0, true, cfg);
        return Some(pick_best(scored));
    }

    // Endgame: exact unpruned search to the end of the game.
    if empties.len() <= cfg.exhaustive_threshold {
        let depth = empties.len() as u32 + 1;
        let scored = score_placements(board, pool, piece, depth, false, cfg);
        return Some(pick_best(scored));
    }

    // Midgame: iterative deepening under a soft time budget.
    let target = cfg.depth_for(pool.len());
    let mut best = pick_best(score_placements(board, pool, piece, 1, true, cfg));
    for depth in 2..=target {
        let started = Instant::now();
        let scored = score_placements(board, pool, piece, depth, true, cfg);
        if started.elapsed() > cfg.time_budget {
            tracing::debug!(depth, "placement iteration over budget, result discarded");
            break;
        }
        best = pick_best(scored);
        tracing::debug!(depth, ?best, "placement deepening iteration done");
    }
    Some(best)
}

/// Choose a piece to hand the opponent. Returns `None` only for an empty
/// pool.
pub fn best_selection(board: &Board, pool: &[Piece], cfg: &SearchConfig) -> Option<Piece> {
    if pool.is_empty() {
        return None;
    }

    // Opening: uniform-random pick, avoiding gift wins when possible.
    if pool.len() >= cfg.random_move_threshold {
        let safe: Vec<Piece> = pool
            .iter()
            .copied()
            .filter(|&p| winning_cell(board, p).is_none())
            .collect();
        let candidates = if safe.is_empty() { pool } else { &safe[..] };
        return Some(candidates[fastrand::usize(..candidates.len())]);
    }

    // Endgame: exact unpruned search.
    if board.empty_cells().len() <= cfg.exhaustive_threshold {
        let depth = pool.len() as u32 + 1;
        let scored = score_selections(board, pool, depth, false, cfg);
        return Some(pick_best(scored));
    }

    // Midgame: iterative deepening; an over-budget iteration is discarded
    // and deepening stops with the best completed result.
    let target = cfg.depth_for(pool.len());
    let mut best = pick_best(score_selections(board, pool, 1, true, cfg));
    for depth in 2..=target {
        let started = Instant::now();
        let scored = score_selections(board, pool, depth, true, cfg);
        if started.elapsed() > cfg.time_budget {
            tracing::debug!(depth, "selection iteration over budget, result discarded");
            break;
        }
        best = pick_best(scored);
        tracing::debug!(depth, "selection deepening iteration done");
    }
    Some(best)
}

/// Score every legal placement of `piece` from the engine's perspective.
///
/// Each root move gets a full `(-INFINITY, INFINITY)` window; `prune`
/// toggles alpha-beta cutoffs below the root. Narrowing the window
/// across root siblings would clip fail-low moves to the running best
/// and let strictly worse moves into the random tie-break set.
pub(crate) fn score_placements(
    board: &Board,
    pool: &[Piece],
    piece: Piece,
    depth: u32,
    prune: bool,
    cfg: &SearchConfig,
) -> Vec<(Cell, i32)> {
    let first_move = board.placed_count() == 0;
    let mut scored = Vec::new();

    for (row, col) in board.empty_cells() {
        let Ok(next) = board.with_piece(row, col, piece) else {
            continue;
        };
        let mut value = if has_win(&next) {
            cfg.win_score
        } else if depth == 0 || pool.is_empty() {
            evaluate(&next, true, cfg)
        } else {
            value_of_selection(&next, pool, depth, -INFINITY, INFINITY, true, prune, cfg)
        };
        if first_move && CENTER_CELLS.contains(&(row, col)) {
            value += cfg.center_bonus;
        }
        scored.push(((row, col), value));
    }
    scored
}

/// Score every candidate piece the engine could hand over.
///
/// Full window per root candidate, as in [`score_placements`]: every
/// score is the true value, so root ties stay honest.
pub(crate) fn score_selections(
    board: &Board,
    pool: &[Piece],
    depth: u32,
    prune: bool,
    cfg: &SearchConfig,
) -> Vec<(Piece, i32)> {
    let mut scored = Vec::new();

    for &piece in pool {
        let Ok(rest) = remove_piece(pool, piece) else {
            continue;
        };
        let value = value_of_placement(
            board,
            &rest,
            piece,
            depth.saturating_sub(1),
            -INFINITY,
            INFINITY,
            false,
            prune,
            cfg,
        );
        scored.push((piece, value));
    }
    scored
}

/// Value (engine perspective) of `piece` being placed by the side given
/// by `engine_turn`, with `depth` SELECT plies left below.
#[allow(clippy::too_many_arguments)]
fn value_of_placement(
    board: &Board,
    pool: &[Piece],
    piece: Piece,
    depth: u32,
    mut alpha: i32,
    mut beta: i32,
    engine_turn: bool,
    prune: bool,
    cfg: &SearchConfig,
) -> i32 {
    // Whoever holds a winning piece takes the win.
    if winning_cell(board, piece).is_some() {
        return if engine_turn {
            cfg.win_score
        } else {
            -cfg.win_score
        };
    }

    let empties = board.empty_cells();
    if empties.is_empty() {
        return 0;
    }

    // Weak mode: a random opponent places anywhere, not adversarially.
    if !engine_turn && cfg.opponent_model == OpponentModel::Random {
        let (row, col) = empties[fastrand::usize(..empties.len())];
        return match board.with_piece(row, col, piece) {
            Ok(next) => placement_continuation(&next, pool, depth, alpha, beta, false, prune, cfg),
            Err(_) => 0,
        };
    }

    let mut best = if engine_turn { -INFINITY } else { INFINITY };
    for (row, col) in empties {
        let Ok(next) = board.with_piece(row, col, piece) else {
            continue;
        };
        let value = placement_continuation(&next, pool, depth, alpha, beta, engine_turn, prune, cfg);
        if engine_turn {
            best = best.max(value);
            alpha = alpha.max(value);
        } else {
            best = best.min(value);
            beta = beta.min(value);
        }
        if prune && beta <= alpha {
            break;
        }
    }
    best
}

/// Value of the position after a placement: either a static leaf or the
/// placer's subsequent SELECT ply.
#[allow(clippy::too_many_arguments)]
fn placement_continuation(
    board: &Board,
    pool: &[Piece],
    depth: u32,
    alpha: i32,
    beta: i32,
    engine_turn: bool,
    prune: bool,
    cfg: &SearchConfig,
) -> i32 {
    if depth == 0 || pool.is_empty() {
        evaluate(board, engine_turn, cfg)
    } else {
        value_of_selection(board, pool, depth, alpha, beta, engine_turn, prune, cfg)
    }
}

/// Value (engine perspective) of the SELECT ply where the side given by
/// `engine_turn` hands a piece to the other side.
#[allow(clippy::too_many_arguments)]
fn value_of_selection(
    board: &Board,
    pool: &[Piece],
    depth: u32,
    mut alpha: i32,
    mut beta: i32,
    engine_turn: bool,
    prune: bool,
    cfg: &SearchConfig,
) -> i32 {
    if pool.is_empty() {
        // No pieces left to hand over: the game ends here as a draw.
        return 0;
    }

    if !engine_turn && cfg.opponent_model == OpponentModel::Random {
        let piece = pool[fastrand::usize(..pool.len())];
        return match remove_piece(pool, piece) {
            Ok(rest) => value_of_placement(
                board,
                &rest,
                piece,
                depth - 1,
                alpha,
                beta,
                true,
                prune,
                cfg,
            ),
            Err(_) => 0,
        };
    }

    // The selector keeps the piece that serves them best; the receiving
    // side is the one placing at the next ply.
    let mut best = if engine_turn { -INFINITY } else { INFINITY };
    for &piece in pool {
        let Ok(rest) = remove_piece(pool, piece) else {
            continue;
        };
        let value = value_of_placement(
            board,
            &rest,
            piece,
            depth - 1,
            alpha,
            beta,
            !engine_turn,
            prune,
            cfg,
        );
        if engine_turn {
            best = best.max(value);
            alpha = alpha.max(value);
        } else {
            best = best.min(value);
            beta = beta.min(value);
        }
        if prune && beta <= alpha {
            break;
        }
    }
    best
}

/// Static leaf evaluation from the engine's perspective.
///
/// Threats on the board count against the side that just placed
/// (`placed_by_engine`): that side must now hand over a piece, and every
/// threatened line narrows its safe choices.
fn evaluate(board: &Board, placed_by_engine: bool, cfg: &SearchConfig) -> i32 {
    let exposure = count_threats(board) as i32 * cfg.threat_penalty;
    if placed_by_engine { -exposure } else { exposure }
}

/// Pick the best-scoring entry, breaking ties uniformly at random.
fn pick_best<T: Copy>(scored: Vec<(T, i32)>) -> T {
    debug_assert!(!scored.is_empty());
    let top = scored.iter().map(|&(_, v)| v).max().unwrap_or(0);
    let tied: Vec<T> = scored
        .iter()
        .filter(|&&(_, v)| v == top)
        .map(|&(x, _)| x)
        .collect();
    tied[fastrand::usize(..tied.len())]
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn midgame_board() -> (Board, Vec<Piece>) {
        // Six pieces on the board, no win, no piece in hand.
        let mut board = Board::new();
        let placed = [
            ((0, 0), Piece([0, 0, 0, 0])),
            ((0, 3), Piece([1, 1, 1, 1])),
            ((1, 1), Piece([0, 1, 1, 0])),
            ((2, 2), Piece([1, 0, 0, 1])),
            ((3, 0), Piece([1, 1, 0, 0])),
            ((3, 3), Piece([0, 0, 1, 1])),
        ];
        for ((r, c), p) in placed {
            board = board.with_piece(r, c, p).unwrap();
        }
        let used: Vec<Piece> = placed.iter().map(|&(_, p)| p).collect();
        let pool: Vec<Piece> = Piece::all()
            .into_iter()
            .filter(|p| !used.contains(p))
            .collect();
        (board, pool)
    }

    #[test]
    fn test_immediate_win_short_circuits() {
        let mut board = Board::new();
        board = board.with_piece(2, 0, Piece([0, 0, 1, 0])).unwrap();
        board = board.with_piece(2, 1, Piece([0, 1, 1, 1])).unwrap();
        board = board.with_piece(2, 3, Piece([1, 0, 1, 0])).unwrap();

        let piece = Piece([1, 1, 1, 1]); // shares attribute 2 with the row
        let pool: Vec<Piece> = Piece::all()
            .into_iter()
            .filter(|p| board.grid().iter().flatten().all(|&v| v != p.index()) && *p != piece)
            .collect();

        let cell = best_placement(&board, &pool, piece, &SearchConfig::default());
        assert_eq!(cell, Some((2, 2)));
    }

    #[test]
    fn test_selection_avoids_gifting_a_win() {
        let mut board = Board::new();
        // Row 0 has three pieces sharing attribute 0 = 1.
        board = board.with_piece(0, 0, Piece([1, 0, 0, 0])).unwrap();
        board = board.with_piece(0, 1, Piece([1, 1, 0, 1])).unwrap();
        board = board.with_piece(0, 2, Piece([1, 0, 1, 0])).unwrap();
        board = board.with_piece(3, 3, Piece([0, 0, 0, 1])).unwrap();

        // Small pool: one piece completes the row, the others are safe.
        let pool = vec![
            Piece([1, 1, 1, 1]), // attribute 0 = 1: instant loss if handed over
            Piece([0, 1, 1, 0]),
            Piece([0, 0, 1, 1]),
        ];
        // Depth 1 already sees the gift; pinning the depth keeps the
        // expected pick independent of deeper tactics.
        let cfg = SearchConfig {
            max_depth: 1,
            ..SearchConfig::default()
        };
        for _ in 0..5 {
            let picked = best_selection(&board, &pool, &cfg).unwrap();
            assert_ne!(picked, Piece([1, 1, 1, 1]), "must not hand over a winning piece");
        }
    }

    #[test]
    fn test_pruned_and_unpruned_agree_on_every_root_score() {
        // Root moves get a full window, so pruning must not change any
        // root score. Per-move equality also keeps the random tie-break
        // set identical: a fail-low move clipped up to the running best
        // would otherwise sneak into the tied set and get played.
        let (board, pool) = midgame_board();
        let cfg = SearchConfig::default();
        let piece = pool[0];
        let rest: Vec<Piece> = pool[1..].to_vec();

        for depth in [1, 2] {
            let pruned = score_placements(&board, &rest, piece, depth, true, &cfg);
            let plain = score_placements(&board, &rest, piece, depth, false, &cfg);
            assert_eq!(pruned, plain, "placement scores differ at depth {depth}");

            let pruned = score_selections(&board, &rest, depth, true, &cfg);
            let plain = score_selections(&board, &rest, depth, false, &cfg);
            assert_eq!(pruned, plain, "selection scores differ at depth {depth}");
        }
    }

    #[test]
    fn test_losing_move_never_ties_with_the_optimum() {
        // A move whose subtree fails low must keep its true losing score
        // under pruning instead of being clipped up to the running best;
        // otherwise random tie-breaking could play it.
        let (board, pool) = midgame_board();
        let cfg = SearchConfig::default();
        let piece = pool[0];
        let rest: Vec<Piece> = pool[1..].to_vec();

        let pruned = score_placements(&board, &rest, piece, 2, true, &cfg);
        let exact = score_placements(&board, &rest, piece, 2, false, &cfg);
        let top = pruned.iter().map(|&(_, v)| v).max().unwrap();

        for (&(cell, value), &(_, truth)) in pruned.iter().zip(&exact) {
            if value == top {
                assert_eq!(
                    value, truth,
                    "tie set admitted a clipped score at {cell:?}"
                );
            }
        }
    }

    #[test]
    fn test_zero_time_budget_still_returns_a_decision() {
        // Every deepening iteration overruns a zero budget and is
        // discarded; the depth-1 result computed up front must survive.
        let (board, pool) = midgame_board();
        let cfg = SearchConfig {
            time_budget: Duration::ZERO,
            ..SearchConfig::default()
        };

        let piece = pool[0];
        let rest: Vec<Piece> = pool[1..].to_vec();
        let (row, col) = best_placement(&board, &rest, piece, &cfg).unwrap();
        assert!(board.is_empty_cell(row, col));

        let picked = best_selection(&board, &pool, &cfg).unwrap();
        assert!(pool.contains(&picked));
    }

    #[test]
    fn test_random_opponent_model_yields_legal_decisions() {
        // The weak mode samples the opponent's replies instead of
        // minimizing; decisions must still be legal at depths that reach
        // both the sampled placement and the sampled selection plies.
        let (board, pool) = midgame_board();
        let cfg = SearchConfig {
            opponent_model: OpponentModel::Random,
            ..SearchConfig::default()
        };

        let piece = pool[0];
        let rest: Vec<Piece> = pool[1..].to_vec();
        for _ in 0..5 {
            let (row, col) = best_placement(&board, &rest, piece, &cfg).unwrap();
            assert!(board.is_empty_cell(row, col));

            let picked = best_selection(&board, &pool, &cfg).unwrap();
            assert!(pool.contains(&picked));
        }
    }

    #[test]
    fn test_full_board_is_terminal_not_error() {
        let full = full_draw_board();
        let cfg = SearchConfig::default();
        assert_eq!(best_placement(&full, &[], Piece([0, 0, 0, 0]), &cfg), None);
        assert_eq!(best_selection(&full, &[], &cfg), None);
    }

    #[test]
    fn test_first_placement_prefers_center() {
        let board = Board::new();
        let piece = Piece([0, 1, 0, 1]);
        let pool: Vec<Piece> = Piece::all().into_iter().filter(|&p| p != piece).collect();
        // Depth-0 scoring: only the center bonus differentiates cells.
        let scored = score_placements(&board, &pool, piece, 0, false, &SearchConfig::default());
        let top = scored.iter().max_by_key(|&&(_, v)| v).unwrap();
        assert!(CENTER_CELLS.contains(&top.0));
    }

    #[test]
    fn test_evaluate_penalizes_own_threat_exposure() {
        let mut board = Board::new();
        board = board.with_piece(1, 0, Piece([0, 0, 1, 0])).unwrap();
        board = board.with_piece(1, 1, Piece([0, 1, 1, 1])).unwrap();
        board = board.with_piece(1, 2, Piece([1, 0, 1, 0])).unwrap();
        let cfg = SearchConfig::default();

        assert!(evaluate(&board, true, &cfg) < 0);
        assert!(evaluate(&board, false, &cfg) > 0);
        assert_eq!(evaluate(&Board::new(), true, &cfg), 0);
    }

    /// A full 16-piece board with no winning line or subgrid.
    fn full_draw_board() -> Board {
        let grid = [
            [2, 3, 6, 12],
            [8, 13, 5, 1],
            [15, 11, 4, 9],
            [7, 10, 14, 16],
        ];
        Board::from_grid(&grid).unwrap()
    }

    #[test]
    fn test_draw_board_helper_is_sound() {
        let board = full_draw_board();
        assert!(board.is_full());
        assert!(!crate::oracle::has_win(&board));
    }
}
