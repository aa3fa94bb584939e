//! CLI subcommands

pub mod analyze;
pub mod evaluate;
pub mod play;

use anyhow::{Result, anyhow};

use crate::{search::LeafScoring, tictactoe::Player};

pub(crate) fn parse_player_token(value: &str, flag: &str) -> Result<Player> {
    match value.trim().to_ascii_lowercase().as_str() {
        "x" | "first" | "player1" | "p1" => Ok(Player::X),
        "o" | "second" | "player2" | "p2" => Ok(Player::O),
        other => Err(anyhow!(
            "Invalid value '{other}' for {flag} (expected 'x' or 'o')"
        )),
    }
}

pub(crate) fn parse_scoring_token(value: &str, flag: &str) -> Result<LeafScoring> {
    match value.trim().to_ascii_lowercase().as_str() {
        "absolute" | "abs" => Ok(LeafScoring::Absolute),
        "side-to-move" | "side_to_move" | "relative" => Ok(LeafScoring::SideToMove),
        other => Err(anyhow!(
            "Invalid value '{other}' for {flag} (expected 'absolute' or 'side-to-move')"
        )),
    }
}
