//! Head-to-head match pipeline
//!
//! Plays complete games between two policies and aggregates the outcomes from
//! the agent's perspective. Used by the `evaluate` command to measure the
//! search engine against the baselines.

use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    policy::Policy,
    tictactoe::{BoardState, GameOutcome, Player},
};

/// Match configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Number of games to play
    pub games: usize,

    /// Random seed; the opponent is seeded with `seed + 1` so the two
    /// policies never share a random stream
    pub seed: Option<u64>,

    /// Whether the agent plays as X or O
    pub agent_player: Player,

    /// Which player opens each game
    pub first_player: Player,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            games: 100,
            seed: None,
            agent_player: Player::X,
            first_player: Player::X,
        }
    }
}

/// Result of a match, counted from the agent's perspective
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// Total games played
    pub total_games: usize,

    /// Number of wins
    pub wins: usize,

    /// Number of draws
    pub draws: usize,

    /// Number of losses
    pub losses: usize,

    /// Win rate
    pub win_rate: f64,

    /// Draw rate
    pub draw_rate: f64,

    /// Loss rate
    pub loss_rate: f64,
}

impl MatchResult {
    /// Create a new match result
    pub fn new(total_games: usize, wins: usize, draws: usize, losses: usize) -> Self {
        let rate = |count: usize| {
            if total_games > 0 {
                count as f64 / total_games as f64
            } else {
                0.0
            }
        };

        Self {
            total_games,
            wins,
            draws,
            losses,
            win_rate: rate(wins),
            draw_rate: rate(draws),
            loss_rate: rate(losses),
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Match pipeline for one agent against one opponent
pub struct MatchPipeline {
    config: MatchConfig,
    progress: Option<ProgressBar>,
}

impl MatchPipeline {
    /// Create a new match pipeline
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    /// Attach a progress bar updated after every game
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Play the configured number of games
    pub fn run(&mut self, agent: &mut dyn Policy, opponent: &mut dyn Policy) -> Result<MatchResult> {
        self.seed_pair(agent, opponent)?;

        let mut wins = 0;
        let mut draws = 0;
        let mut losses = 0;

        for _ in 0..self.config.games {
            let outcome = self.play_game(agent, opponent)?;

            match outcome {
                GameOutcome::Win(winner) if winner == self.config.agent_player => wins += 1,
                GameOutcome::Win(_) => losses += 1,
                GameOutcome::Draw => draws += 1,
            }

            if let Some(progress) = &self.progress {
                progress.inc(1);
                progress.set_message(format!("W:{wins} D:{draws} L:{losses}"));
            }
        }

        if let Some(progress) = &self.progress {
            progress.finish_with_message(format!("W:{wins} D:{draws} L:{losses}"));
        }

        Ok(MatchResult::new(self.config.games, wins, draws, losses))
    }

    fn seed_pair(&self, agent: &mut dyn Policy, opponent: &mut dyn Policy) -> Result<()> {
        if let Some(seed) = self.config.seed {
            agent.set_rng_seed(seed)?;
            opponent.set_rng_seed(seed.wrapping_add(1))?;
        }
        Ok(())
    }

    fn play_game(&mut self, agent: &mut dyn Policy, opponent: &mut dyn Policy) -> Result<GameOutcome> {
        let mut state = BoardState::new_with_player(self.config.first_player);

        loop {
            if let Some(outcome) = state.outcome() {
                return Ok(outcome);
            }

            let policy: &mut dyn Policy = if state.to_move == self.config.agent_player {
                agent
            } else {
                opponent
            };

            let position = policy.select_move(&state)?;
            state = state.make_move(position)?;
        }
    }
}
