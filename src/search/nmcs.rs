//! Nested Monte Carlo search engine

use rand::{SeedableRng, random, rngs::StdRng};

use super::{absolute_score, rollout::rollout};
use crate::tictactoe::{BoardState, Player};

/// How leaf values (terminal outcomes and rollout results) enter the search.
///
/// The recursive combination step negates a child's value when propagating it
/// to the parent, which treats every value as if it were expressed from the
/// perspective of the player to move. The two variants differ in whether leaf
/// values actually follow that convention:
///
/// - [`Absolute`](LeafScoring::Absolute) scores every leaf on the fixed
///   X-positive scale, no matter whose turn it is at the leaf. Values that
///   bottom out at a terminal state stay consistent under negation, but
///   rollout leaves reached at odd plies feed the parent an unadjusted sign.
///   This is the engine's default convention.
/// - [`SideToMove`](LeafScoring::SideToMove) orients every leaf to the player
///   to move at that leaf, making the per-ply negation sound throughout. With
///   it, a move that completes a winning line is always selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeafScoring {
    #[default]
    Absolute,
    SideToMove,
}

impl LeafScoring {
    /// Orient an X-positive score to this convention at the given leaf state.
    fn leaf(self, state: &BoardState, x_positive: f64) -> f64 {
        match self {
            LeafScoring::Absolute => x_positive,
            LeafScoring::SideToMove => match state.to_move {
                Player::X => x_positive,
                Player::O => -x_positive,
            },
        }
    }
}

/// Depth-bounded nested Monte Carlo search.
///
/// At depth zero a position is evaluated with a single random playout; at
/// depth `n > 0` every legal move is evaluated at depth `n - 1` and the best
/// negated child value wins. Each recursive step works on its own copy of the
/// board, so no state is ever shared between branches of the search tree.
///
/// # Example
///
/// ```
/// use nmcs::{BoardState, NestedSearch};
///
/// let mut search = NestedSearch::new(3).with_seed(42);
/// let position = BoardState::new();
/// let choice = search.select_move(&position).unwrap();
/// assert!(position.is_empty(choice));
/// ```
#[derive(Debug)]
pub struct NestedSearch {
    depth: usize,
    scoring: LeafScoring,
    rng: StdRng,
}

impl NestedSearch {
    /// Create a search with the given depth budget, a randomly seeded
    /// generator, and the default [`LeafScoring::Absolute`] convention.
    ///
    /// Move selection requires `depth >= 1`; [`Self::select_move`] rejects a
    /// zero-depth engine.
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            scoring: LeafScoring::default(),
            rng: StdRng::seed_from_u64(random()),
        }
    }

    /// Replace the generator with one seeded deterministically.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Set the leaf scoring convention.
    pub fn with_scoring(mut self, scoring: LeafScoring) -> Self {
        self.scoring = scoring;
        self
    }

    /// Set or reset the engine's RNG seed
    pub fn reseed(&mut self, seed: Option<u64>) {
        self.rng = match seed {
            Some(value) => StdRng::seed_from_u64(value),
            None => StdRng::seed_from_u64(random()),
        };
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn scoring(&self) -> LeafScoring {
        self.scoring
    }

    /// Score a position with the remaining depth budget.
    ///
    /// A terminal state maps straight to its outcome score for every budget,
    /// taking priority over the depth check; an ongoing state at depth zero is
    /// worth one random playout; otherwise the value is the maximum over all
    /// legal moves, in ascending index order, of the negated child evaluation
    /// one level down.
    ///
    /// # Errors
    ///
    /// Returns [`IllegalGeneratedMove`](crate::Error::IllegalGeneratedMove) if
    /// applying a generated move fails, which indicates an internal invariant
    /// violation; the search call is aborted rather than retried.
    pub fn evaluate(&mut self, state: &BoardState, depth: usize) -> Result<f64, crate::Error> {
        if let Some(outcome) = state.outcome() {
            return Ok(self.scoring.leaf(state, absolute_score(outcome)));
        }

        if depth == 0 {
            let playout = rollout(state, &mut self.rng)?;
            return Ok(self.scoring.leaf(state, playout));
        }

        let mut best = f64::NEG_INFINITY;
        for position in state.legal_moves() {
            let child = state
                .make_move_with_context(position, "nested search expanded an occupied cell")?;
            let candidate = -self.evaluate(&child, depth - 1)?;
            if candidate > best {
                best = candidate;
            }
        }
        Ok(best)
    }

    /// Pick a move for the player to move in `state`.
    ///
    /// Every legal move is scored as the negated evaluation of its successor
    /// at `depth - 1`; the first move to reach the greatest score wins, since
    /// a later move must strictly exceed the current best to replace it.
    ///
    /// # Errors
    ///
    /// - [`InvalidSearchDepth`](crate::Error::InvalidSearchDepth) when the
    ///   engine was configured with a zero depth budget.
    /// - [`NoValidMoves`](crate::Error::NoValidMoves) when the state has no
    ///   legal moves (the game is already over); callers are expected to
    ///   check [`BoardState::outcome`] first.
    pub fn select_move(&mut self, state: &BoardState) -> Result<usize, crate::Error> {
        if self.depth == 0 {
            return Err(crate::Error::InvalidSearchDepth { depth: self.depth });
        }

        let moves = state.legal_moves();
        if moves.is_empty() {
            return Err(crate::Error::NoValidMoves);
        }

        let mut best_move = None;
        let mut best_score = f64::NEG_INFINITY;
        for position in moves {
            let child = state
                .make_move_with_context(position, "move selection expanded an occupied cell")?;
            let score = -self.evaluate(&child, self.depth - 1)?;
            if score > best_score {
                best_score = score;
                best_move = Some(position);
            }
        }

        best_move.ok_or(crate::Error::NoValidMoves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::Cell;

    fn board(cells: [Cell; 9], to_move: Player) -> BoardState {
        BoardState { cells, to_move }
    }

    fn winning_row_for_x() -> BoardState {
        // XX. with X to move; completing the row at 2 wins immediately.
        let mut cells = [Cell::Empty; 9];
        cells[0] = Cell::X;
        cells[1] = Cell::X;
        board(cells, Player::X)
    }

    #[test]
    fn test_terminal_evaluation_ignores_depth() {
        let x_won = BoardState::from_string("XXXOO....").unwrap();
        let drawn = BoardState::from_string("XOXXOOOXX").unwrap();

        let mut search = NestedSearch::new(3).with_seed(11);
        for depth in 0..=4 {
            assert_eq!(search.evaluate(&x_won, depth).unwrap(), 1.0);
            assert_eq!(search.evaluate(&drawn, depth).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_terminal_evaluation_for_o_win() {
        let mut cells = [Cell::Empty; 9];
        cells[0] = Cell::O;
        cells[3] = Cell::O;
        cells[6] = Cell::O;
        cells[1] = Cell::X;
        cells[2] = Cell::X;
        let o_won = board(cells, Player::X);

        let mut search = NestedSearch::new(2).with_seed(5);
        for depth in 0..=3 {
            assert_eq!(search.evaluate(&o_won, depth).unwrap(), -1.0);
        }
    }

    #[test]
    fn test_side_to_move_orients_terminal_leaves() {
        let x_won = BoardState::from_string("XXXOO....").unwrap();
        assert_eq!(x_won.to_move, Player::O);

        let mut search = NestedSearch::new(2)
            .with_seed(5)
            .with_scoring(LeafScoring::SideToMove);
        for depth in 0..=3 {
            assert_eq!(search.evaluate(&x_won, depth).unwrap(), -1.0);
        }
    }

    #[test]
    fn test_winning_child_short_circuits_before_rollout() {
        // The completed row is terminal, so its evaluation is exact at every
        // depth; no rollout randomness is involved.
        let state = winning_row_for_x();
        let child = state.make_move(2).unwrap();

        let mut search = NestedSearch::new(3).with_seed(99);
        for depth in 0..=4 {
            assert_eq!(search.evaluate(&child, depth).unwrap(), 1.0);
        }
    }

    #[test]
    fn test_depth_zero_evaluation_is_a_playout_score() {
        let mut search = NestedSearch::new(1).with_seed(21);
        let score = search.evaluate(&BoardState::new(), 0).unwrap();
        assert!(score == 1.0 || score == 0.0 || score == -1.0);
    }

    #[test]
    fn test_select_move_returns_a_legal_move() {
        let state = BoardState::new();
        let mut search = NestedSearch::new(1).with_seed(42);
        let choice = search.select_move(&state).unwrap();
        assert!(choice < 9);
        assert!(state.is_empty(choice));
    }

    #[test]
    fn test_select_move_on_drawn_board_fails() {
        let drawn = BoardState::from_string("XOXXOOOXX").unwrap();
        let mut search = NestedSearch::new(3).with_seed(42);
        let err = search.select_move(&drawn).unwrap_err();
        assert!(matches!(err, crate::Error::NoValidMoves));
    }

    #[test]
    fn test_select_move_on_won_board_fails() {
        let x_won = BoardState::from_string("XXXOO....").unwrap();
        let mut search = NestedSearch::new(3).with_seed(42);
        let err = search.select_move(&x_won).unwrap_err();
        assert!(matches!(err, crate::Error::NoValidMoves));
    }

    #[test]
    fn test_select_move_rejects_zero_depth() {
        let mut search = NestedSearch::new(0).with_seed(42);
        let err = search.select_move(&BoardState::new()).unwrap_err();
        assert!(matches!(err, crate::Error::InvalidSearchDepth { depth: 0 }));
    }

    #[test]
    fn test_select_move_with_single_open_cell() {
        let near_draw = BoardState::from_string("XOXXOOOX.").unwrap();
        for scoring in [LeafScoring::Absolute, LeafScoring::SideToMove] {
            let mut search = NestedSearch::new(3).with_seed(17).with_scoring(scoring);
            assert_eq!(search.select_move(&near_draw).unwrap(), 8);
        }
    }

    #[test]
    fn test_side_to_move_selects_immediate_win() {
        // The winning completion is both the first legal index and the only
        // move reaching the maximal score, so it wins at every depth.
        let state = winning_row_for_x();
        for depth in 1..=3 {
            let mut search = NestedSearch::new(depth)
                .with_seed(1234)
                .with_scoring(LeafScoring::SideToMove);
            assert_eq!(search.select_move(&state).unwrap(), 2);
        }
    }

    #[test]
    fn test_side_to_move_selects_immediate_win_for_o() {
        // .OO / XX. / ... with O to move; 0 completes the top row for O.
        let mut cells = [Cell::Empty; 9];
        cells[1] = Cell::O;
        cells[2] = Cell::O;
        cells[3] = Cell::X;
        cells[4] = Cell::X;
        let state = board(cells, Player::O);

        for depth in 1..=3 {
            let mut search = NestedSearch::new(depth)
                .with_seed(77)
                .with_scoring(LeafScoring::SideToMove);
            assert_eq!(search.select_move(&state).unwrap(), 0);
        }
    }

    #[test]
    fn test_select_move_is_deterministic_under_a_seed() {
        let state = BoardState::new().make_move(4).unwrap();
        let first = NestedSearch::new(2)
            .with_seed(314)
            .select_move(&state)
            .unwrap();
        let second = NestedSearch::new(2)
            .with_seed(314)
            .select_move(&state)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_evaluate_stays_within_score_bounds() {
        let mut search = NestedSearch::new(2).with_seed(8);
        let state = BoardState::new();
        for depth in 0..=3 {
            let score = search.evaluate(&state, depth).unwrap();
            assert!((-1.0..=1.0).contains(&score));
        }
    }
}
