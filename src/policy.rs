//! Move-selection policies
//!
//! The [`Policy`] trait is the boundary between the match pipeline and the
//! engines that pick moves: the nested search itself plus the baselines it is
//! measured against.

use rand::{Rng, SeedableRng, random, rngs::StdRng};

use crate::{
    Result,
    search::NestedSearch,
    tictactoe::{BoardState, LineAnalyzer},
};

/// Unified interface for anything that can pick a move.
///
/// # Errors
///
/// `select_move` returns an error when the state has no legal moves; callers
/// are expected to check for a terminal state first.
pub trait Policy: Send {
    /// Select a move (0-8) for the player to move in `state`.
    fn select_move(&mut self, state: &BoardState) -> Result<usize>;

    /// Get the policy's name.
    fn name(&self) -> &str;

    /// Reseed the policy's randomness, if it has any.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }
}

/// Nested Monte Carlo search wrapped as a policy
pub struct NmcsPolicy {
    name: String,
    search: NestedSearch,
}

impl NmcsPolicy {
    /// Create from a configured search engine
    pub fn new(name: String, search: NestedSearch) -> Self {
        Self { name, search }
    }

    /// Get reference to the underlying engine
    pub fn search(&self) -> &NestedSearch {
        &self.search
    }
}

impl Policy for NmcsPolicy {
    fn select_move(&mut self, state: &BoardState) -> Result<usize> {
        self.search.select_move(state)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.search.reseed(Some(seed));
        Ok(())
    }
}

/// Uniformly random baseline policy
pub struct RandomPolicy {
    name: String,
    rng: StdRng,
}

impl RandomPolicy {
    /// Create a new random policy
    pub fn new(name: String) -> Self {
        Self {
            name,
            rng: StdRng::seed_from_u64(random()),
        }
    }

    /// Create a new random policy with a deterministic seed
    pub fn with_seed(name: String, seed: u64) -> Self {
        Self {
            name,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn select_move(&mut self, state: &BoardState) -> Result<usize> {
        let moves = state.legal_moves();
        if moves.is_empty() {
            return Err(crate::Error::NoValidMoves);
        }
        let index = self.rng.random_range(0..moves.len());
        Ok(moves[index])
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}

/// Defensive baseline policy (blocks winning moves)
///
/// This policy will:
/// 1. Check if the opponent can win on their next move
/// 2. Block that winning move if found (lowest index when there are several)
/// 3. Otherwise, play randomly
///
/// Note: This does NOT try to win itself, only to block opponent wins.
pub struct DefensivePolicy {
    name: String,
    rng: StdRng,
}

impl DefensivePolicy {
    /// Create a new defensive policy
    pub fn new(name: String) -> Self {
        Self {
            name,
            rng: StdRng::seed_from_u64(random()),
        }
    }

    /// Create a defensive policy with a deterministic seed
    pub fn with_seed(name: String, seed: u64) -> Self {
        Self {
            name,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Find the opponent's most urgent winning move (if any)
    fn find_blocking_move(state: &BoardState) -> Option<usize> {
        let threats = LineAnalyzer::winning_moves(&state.cells, state.to_move.opponent());
        threats.into_iter().min()
    }
}

impl Policy for DefensivePolicy {
    fn select_move(&mut self, state: &BoardState) -> Result<usize> {
        let moves = state.legal_moves();
        if moves.is_empty() {
            return Err(crate::Error::NoValidMoves);
        }

        if let Some(blocking_move) = Self::find_blocking_move(state) {
            return Ok(blocking_move);
        }

        let index = self.rng.random_range(0..moves.len());
        Ok(moves[index])
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}
