//! Nested Monte Carlo search over Tic-Tac-Toe positions
//!
//! The engine evaluates a position by recursion over its legal moves: at
//! depth zero a position is worth the outcome of a single uniformly random
//! playout, and at higher depths it is worth the best negated child value.
//! There is no heuristic evaluation, no transposition table, and no pruning.

pub mod nmcs;
pub mod rollout;

pub use nmcs::{LeafScoring, NestedSearch};
pub use rollout::{play_out, rollout};

use crate::tictactoe::{GameOutcome, Player};

/// Score of a terminal outcome on the fixed X-positive scale:
/// +1 for an X win, -1 for an O win, 0 for a draw.
pub fn absolute_score(outcome: GameOutcome) -> f64 {
    match outcome {
        GameOutcome::Win(Player::X) => 1.0,
        GameOutcome::Win(Player::O) => -1.0,
        GameOutcome::Draw => 0.0,
    }
}
