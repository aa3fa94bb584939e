//! High-level game management

use serde::{Deserialize, Serialize};

use super::board::{BoardState, Player};

/// A move in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub position: usize,
    pub player: Player,
}

/// Outcome of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

/// A complete game with history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub initial: BoardState,
    pub moves: Vec<Move>,
    pub outcome: Option<GameOutcome>,
}

impl Game {
    /// Create a new game from the standard initial position
    pub fn new() -> Self {
        Game {
            initial: BoardState::new(),
            moves: Vec::new(),
            outcome: None,
        }
    }

    /// Play a move
    pub fn play(&mut self, position: usize) -> Result<(), crate::Error> {
        if self.outcome.is_some() {
            return Err(crate::Error::GameOver);
        }

        let current = self.current_state()?;
        let new_state = current.make_move(position)?;

        self.moves.push(Move {
            position,
            player: current.to_move,
        });

        self.outcome = new_state.outcome();

        Ok(())
    }

    /// Replay moves up to a given index (exclusive)
    ///
    /// # Errors
    ///
    /// Returns error if any move in the history is invalid for the current state.
    /// This indicates corrupted game data.
    fn replay_moves_until(&self, end_index: usize) -> Result<BoardState, crate::Error> {
        let mut state = self.initial;
        for (i, m) in self.moves.iter().take(end_index).enumerate() {
            state = state.make_move_with_context(
                m.position,
                &format!("Invalid move in game history at position {i}"),
            )?;
        }
        Ok(state)
    }

    /// Get current board state
    ///
    /// # Errors
    ///
    /// Returns error if any move in the history is invalid for the current state.
    /// This indicates corrupted game data.
    pub fn current_state(&self) -> Result<BoardState, crate::Error> {
        self.replay_moves_until(self.moves.len())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_records_history_and_outcome() {
        let mut game = Game::new();
        for position in [0, 3, 1, 4, 2] {
            game.play(position).unwrap();
        }

        assert_eq!(game.moves.len(), 5);
        assert_eq!(game.outcome, Some(GameOutcome::Win(Player::X)));
        assert_eq!(game.moves[0].player, Player::X);
        assert_eq!(game.moves[1].player, Player::O);
    }

    #[test]
    fn test_play_after_game_over_fails() {
        let mut game = Game::new();
        for position in [0, 3, 1, 4, 2] {
            game.play(position).unwrap();
        }

        let err = game.play(5).unwrap_err();
        assert!(matches!(err, crate::Error::GameOver));
    }

    #[test]
    fn test_current_state_tracks_moves() {
        let mut game = Game::new();
        game.play(4).unwrap();
        game.play(0).unwrap();

        let state = game.current_state().unwrap();
        assert_eq!(state.get(4), super::super::Cell::X);
        assert_eq!(state.get(0), super::super::Cell::O);
        assert_eq!(state.to_move, Player::X);
    }

    #[test]
    fn test_draw_outcome() {
        let mut game = Game::new();
        for position in [0, 1, 2, 4, 3, 6, 5, 8, 7] {
            game.play(position).unwrap();
        }
        assert_eq!(game.outcome, Some(GameOutcome::Draw));
    }
}
