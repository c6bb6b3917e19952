//! Monte Carlo Tree Search over the Quarto decision types.
//!
//! Each decision (`place` or `select`) builds a fresh tree that lives only
//! for that call. The four phases per iteration:
//! - Selection: descend by UCT score while a node is fully expanded,
//!   `winrate + c * sqrt(ln(parent_visits) / visits)`, unvisited children
//!   having infinite priority.
//! - Expansion: materialize one untried action as a new child.
//! - Simulation: uniform-random playout to a true terminal state.
//! - Backpropagation: add visits and the terminal reward up the path.
//!
//! The reward is the real game outcome (+1 win, 0 draw, -1 loss), credited
//! to each node from the perspective of the player who took the action
//! into it. A full turn contains two consecutive decisions by the same
//! player (place, then select), so rewards are credited per acting player
//! rather than negated blindly per ply.
//!
//! The final decision is the most-visited root child, not the highest
//! value: visit counts are the more robust statistic.

use crate::board::{Board, Cell, Piece, remove_piece};
use crate::config::SearchConfig;
use crate::oracle::has_win;

/// One of the two Quarto decision types.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Put the piece in hand at this cell.
    Place(Cell),
    /// Hand this piece to the opponent.
    Give(Piece),
}

/// The two sides of the game, from the engine's point of view.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Player {
    Engine,
    Opponent,
}

impl Player {
    fn other(self) -> Player {
        match self {
            Player::Engine => Player::Opponent,
            Player::Opponent => Player::Engine,
        }
    }
}

/// A snapshot of the game between decisions.
///
/// `in_hand` is the piece the player to act must place; `None` means the
/// player to act must select a piece instead. Pure value type: `apply`
/// returns a new state.
#[derive(Clone)]
pub(crate) struct GameState {
    board: Board,
    pool: Vec<Piece>,
    in_hand: Option<Piece>,
    to_act: Player,
    winner: Option<Player>,
}

impl GameState {
    pub(crate) fn new(
        board: Board,
        pool: Vec<Piece>,
        in_hand: Option<Piece>,
        to_act: Player,
    ) -> Self {
        Self {
            board,
            pool,
            in_hand,
            to_act,
            winner: None,
        }
    }

    fn is_terminal(&self) -> bool {
        if self.winner.is_some() {
            return true;
        }
        match self.in_hand {
            Some(_) => self.board.is_full(),
            None => self.pool.is_empty(),
        }
    }

    fn legal_actions(&self) -> Vec<Action> {
        if self.winner.is_some() {
            return Vec::new();
        }
        match self.in_hand {
            Some(_) => self
                .board
                .empty_cells()
                .into_iter()
                .map(Action::Place)
                .collect(),
            None => self.pool.iter().copied().map(Action::Give).collect(),
        }
    }

    /// The state after `to_act` performs `action`. Illegal actions leave
    /// the state unchanged; the tree only feeds legal ones.
    fn apply(&self, action: Action) -> GameState {
        let mut next = self.clone();
        match action {
            Action::Place((row, col)) => {
                if let Some(piece) = next.in_hand.take() {
                    if let Ok(board) = next.board.with_piece(row, col, piece) {
                        next.board = board;
                        if has_win(&next.board) {
                            next.winner = Some(next.to_act);
                        }
                    }
                }
                // Same player selects next; to_act unchanged.
            }
            Action::Give(piece) => {
                if let Ok(pool) = remove_piece(&next.pool, piece) {
                    next.pool = pool;
                    next.in_hand = Some(piece);
                    next.to_act = next.to_act.other();
                }
            }
        }
        next
    }
}

/// A search tree node, owning its children for the duration of one
/// decision call.
struct TreeNode {
    state: GameState,
    /// Player who took the action leading into this node.
    acted_by: Player,
    visits: u32,
    /// Accumulated reward from `acted_by`'s perspective.
    reward: f64,
    untried: Vec<Action>,
    children: Vec<(Action, TreeNode)>,
}

impl TreeNode {
    fn new(state: GameState, acted_by: Player) -> Self {
        let untried = state.legal_actions();
        Self {
            state,
            acted_by,
            visits: 0,
            reward: 0.0,
            untried,
            children: Vec::new(),
        }
    }

    fn mean_reward(&self) -> f64 {
        if self.visits > 0 {
            self.reward / self.visits as f64
        } else {
            0.0
        }
    }
}

/// Terminal reward for `player`: +1 win, -1 loss, 0 draw.
fn reward_for(player: Player, winner: Option<Player>) -> f64 {
    match winner {
        Some(w) if w == player => 1.0,
        Some(_) => -1.0,
        None => 0.0,
    }
}

/// UCT score of a child from the selecting parent's perspective.
fn uct_score(child: &TreeNode, parent_visits: u32, c: f64) -> f64 {
    if child.visits == 0 {
        return f64::INFINITY;
    }
    let exploitation = child.mean_reward();
    let exploration = c * ((parent_visits.max(1) as f64).ln() / child.visits as f64).sqrt();
    exploitation + exploration
}

/// Uniform-random playout from `state` to a terminal position.
fn playout(mut state: GameState) -> Option<Player> {
    loop {
        if state.is_terminal() {
            return state.winner;
        }
        let actions = state.legal_actions();
        if actions.is_empty() {
            return state.winner;
        }
        let action = actions[fastrand::usize(..actions.len())];
        state = state.apply(action);
    }
}

/// One MCTS iteration: descend, expand, simulate, backpropagate.
///
/// Returns the playout winner so callers up the recursion can credit
/// their own statistics.
fn iterate(node: &mut TreeNode, c: f64) -> Option<Player> {
    let winner = if node.state.is_terminal() {
        node.state.winner
    } else if !node.untried.is_empty() {
        // Expansion: one untried action becomes a child, evaluated by a
        // random playout.
        let action = node.untried.swap_remove(fastrand::usize(..node.untried.len()));
        let child_state = node.state.apply(action);
        let mut child = TreeNode::new(child_state, node.state.to_act);
        let winner = playout(child.state.clone());
        child.visits = 1;
        child.reward = reward_for(child.acted_by, winner);
        node.children.push((action, child));
        winner
    } else {
        // Selection: recurse into the most urgent child.
        let parent_visits = node.visits;
        let idx = node
            .children
            .iter()
            .enumerate()
            .max_by(|(_, (_, a)), (_, (_, b))| {
                uct_score(a, parent_visits, c)
                    .partial_cmp(&uct_score(b, parent_visits, c))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)
            .unwrap_or(0);
        iterate(&mut node.children[idx].1, c)
    };

    node.visits += 1;
    node.reward += reward_for(node.acted_by, winner);
    winner
}

/// Run MCTS from the given decision point and return the best action.
///
/// `in_hand` selects the decision type: `Some(piece)` searches a PLACE
/// decision, `None` a SELECT decision. Returns `None` when the root has
/// no legal actions (terminal position).
pub fn search(
    board: &Board,
    pool: &[Piece],
    in_hand: Option<Piece>,
    cfg: &SearchConfig,
) -> Option<Action> {
    let state = GameState::new(board.clone(), pool.to_vec(), in_hand, Player::Engine);
    if state.legal_actions().is_empty() {
        return None;
    }

    let mut root = TreeNode::new(state, Player::Opponent);
    for _ in 0..cfg.mcts_simulations {
        iterate(&mut root, cfg.uct_exploration);
    }

    let best = root
        .children
        .iter()
        .max_by_key(|(_, child)| child.visits)
        .map(|&(action, _)| action);
    if let Some(action) = best {
        tracing::debug!(?action, visits = root.visits, "mcts decision");
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg_with_sims(sims: usize) -> SearchConfig {
        SearchConfig {
            mcts_simulations: sims,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_search_returns_legal_placement() {
        let board = Board::new()
            .with_piece(0, 0, Piece([0, 0, 0, 0]))
            .unwrap();
        let in_hand = Piece([1, 1, 1, 1]);
        let pool: Vec<Piece> = Piece::all()
            .into_iter()
            .filter(|&p| p != Piece([0, 0, 0, 0]) && p != in_hand)
            .collect();

        match search(&board, &pool, Some(in_hand), &cfg_with_sims(200)) {
            Some(Action::Place((row, col))) => {
                assert!(board.is_empty_cell(row, col));
            }
            other => panic!("expected a placement, got {other:?}"),
        }
    }

    #[test]
    fn test_search_returns_pool_member_for_selection() {
        let board = Board::new();
        let pool = Piece::all().to_vec();

        match search(&board, &pool, None, &cfg_with_sims(200)) {
            Some(Action::Give(piece)) => assert!(pool.contains(&piece)),
            other => panic!("expected a selection, got {other:?}"),
        }
    }

    #[test]
    fn test_search_prefers_immediate_win() {
        let mut board = Board::new();
        board = board.with_piece(1, 0, Piece([0, 0, 1, 0])).unwrap();
        board = board.with_piece(1, 1, Piece([0, 1, 1, 1])).unwrap();
        board = board.with_piece(1, 3, Piece([1, 0, 1, 0])).unwrap();
        let in_hand = Piece([1, 1, 1, 1]); // completes row 1 on attribute 2

        let used = [
            Piece([0, 0, 1, 0]),
            Piece([0, 1, 1, 1]),
            Piece([1, 0, 1, 0]),
            in_hand,
        ];
        let pool: Vec<Piece> = Piece::all()
            .into_iter()
            .filter(|p| !used.contains(p))
            .collect();

        // The winning placement terminates every playout through it with
        // reward +1, so it dominates the visit counts.
        match search(&board, &pool, Some(in_hand), &cfg_with_sims(400)) {
            Some(Action::Place(cell)) => assert_eq!(cell, (1, 2)),
            other => panic!("expected a placement, got {other:?}"),
        }
    }

    #[test]
    fn test_terminal_root_yields_none() {
        let board = Board::new();
        assert!(search(&board, &[], None, &cfg_with_sims(10)).is_none());
    }

    #[test]
    fn test_playout_reaches_terminal() {
        let state = GameState::new(Board::new(), Piece::all().to_vec(), None, Player::Engine);
        // A playout must end: either someone wins or the board fills up.
        for _ in 0..10 {
            let _ = playout(state.clone());
        }
    }

    #[test]
    fn test_reward_signs() {
        assert_eq!(reward_for(Player::Engine, Some(Player::Engine)), 1.0);
        assert_eq!(reward_for(Player::Engine, Some(Player::Opponent)), -1.0);
        assert_eq!(reward_for(Player::Engine, None), 0.0);
    }

    #[test]
    fn test_apply_give_flips_actor_and_place_does_not() {
        let state = GameState::new(Board::new(), Piece::all().to_vec(), None, Player::Engine);
        let given = state.apply(Action::Give(Piece([0, 0, 0, 0])));
        assert_eq!(given.to_act, Player::Opponent);
        assert_eq!(given.in_hand, Some(Piece([0, 0, 0, 0])));
        assert_eq!(given.pool.len(), 15);

        let placed = given.apply(Action::Place((2, 2)));
        assert_eq!(placed.to_act, Player::Opponent, "placer selects next");
        assert!(placed.in_hand.is_none());
        assert_eq!(placed.board.cell(2, 2), Piece([0, 0, 0, 0]).index());
    }
}
