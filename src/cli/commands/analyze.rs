//! Analyze command - score every legal move of a position

use anyhow::{Result, ensure};
use clap::Parser;

use crate::{
    cli::{
        commands::parse_scoring_token,
        output,
    },
    search::NestedSearch,
    tictactoe::{BoardState, GameOutcome},
};

#[derive(Parser, Debug)]
#[command(about = "Score every legal move of a position")]
pub struct AnalyzeArgs {
    /// Board position, e.g. 'XO.......' or 'X.O.X...._O'
    pub board: String,

    /// Search depth for the engine
    #[arg(long, short = 'd', default_value_t = 3)]
    pub depth: usize,

    /// Random seed for the engine's rollouts
    #[arg(long)]
    pub seed: Option<u64>,

    /// Leaf scoring convention (`absolute` or `side-to-move`)
    #[arg(long, default_value = "absolute")]
    pub scoring: String,
}

pub fn execute(args: AnalyzeArgs) -> Result<()> {
    ensure!(args.depth >= 1, "--depth must be at least 1");
    let state = BoardState::from_string(&args.board)?;
    let scoring = parse_scoring_token(&args.scoring, "--scoring")?;

    let mut search = NestedSearch::new(args.depth).with_scoring(scoring);
    if let Some(seed) = args.seed {
        search.reseed(Some(seed));
    }

    output::print_section("Position");
    println!("{state}");
    output::print_kv("To move", &format!("{:?}", state.to_move));

    if let Some(outcome) = state.outcome() {
        match outcome {
            GameOutcome::Win(player) => output::print_kv("Outcome", &format!("{player:?} wins")),
            GameOutcome::Draw => output::print_kv("Outcome", "draw"),
        }
        return Ok(());
    }

    output::print_section(&format!("Move scores at depth {}", args.depth));
    let mut best: Option<(usize, f64)> = None;
    for position in state.legal_moves() {
        let child = state.make_move(position)?;
        let score = -search.evaluate(&child, args.depth - 1)?;
        output::print_kv(&format!("Move {position}"), &format!("{score:+.1}"));
        // First strictly greatest score wins, mirroring move selection.
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((position, score)),
        }
    }

    if let Some((position, score)) = best {
        println!();
        output::print_kv("Selected move", &format!("{position} (score {score:+.1})"));
    }

    Ok(())
}
