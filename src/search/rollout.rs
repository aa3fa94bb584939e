//! Random playouts to a terminal state

use rand::Rng;

use super::absolute_score;
use crate::tictactoe::{BoardState, GameOutcome};

/// Drive an independent copy of `state` to a terminal state by repeatedly
/// applying a uniformly random legal move, returning the final board and its
/// outcome.
///
/// The caller's state is never mutated. Termination is guaranteed because
/// every step fills exactly one of the finitely many empty cells. A state
/// that is already terminal is returned unchanged.
pub fn play_out<R: Rng>(state: &BoardState, rng: &mut R) -> Result<(BoardState, GameOutcome), crate::Error> {
    let mut current = *state;
    loop {
        if let Some(outcome) = current.outcome() {
            return Ok((current, outcome));
        }
        // Ongoing implies at least one empty cell.
        let open = current.empty_positions();
        let position = open[rng.random_range(0..open.len())];
        current =
            current.make_move_with_context(position, "random playout picked an occupied cell")?;
    }
}

/// Estimate the value of `state` with a single random playout, scored on the
/// fixed X-positive scale regardless of whose turn it is anywhere along the
/// playout.
pub fn rollout<R: Rng>(state: &BoardState, rng: &mut R) -> Result<f64, crate::Error> {
    let (_, outcome) = play_out(state, rng)?;
    Ok(absolute_score(outcome))
}
