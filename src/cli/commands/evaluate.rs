//! Evaluate command - measure the search engine against a baseline

use std::path::PathBuf;

use anyhow::{Result, ensure};
use clap::Parser;

use crate::{
    cli::{
        commands::{parse_player_token, parse_scoring_token},
        output,
    },
    pipeline::{MatchConfig, MatchPipeline},
    policy::{DefensivePolicy, NmcsPolicy, Policy, RandomPolicy},
    search::NestedSearch,
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate the search engine against a baseline")]
pub struct EvaluateArgs {
    /// Opponent to evaluate against (`random`, `defensive`, or `nmcs`)
    #[arg(long, short = 'o', default_value = "random")]
    pub opponent: String,

    /// Number of evaluation games
    #[arg(long, short = 'g', default_value_t = 100)]
    pub games: usize,

    /// Search depth for the engine
    #[arg(long, short = 'd', default_value_t = 3)]
    pub depth: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Which token the engine controls (`x` or `o`)
    #[arg(long, default_value = "x")]
    pub agent_player: String,

    /// Which token makes the first move (`x` or `o`)
    #[arg(long, default_value = "x")]
    pub first_player: String,

    /// Leaf scoring convention (`absolute` or `side-to-move`)
    #[arg(long, default_value = "absolute")]
    pub scoring: String,

    /// Export results to file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    ensure!(args.depth >= 1, "--depth must be at least 1");
    let agent_player = parse_player_token(&args.agent_player, "--agent-player")?;
    let first_player = parse_player_token(&args.first_player, "--first-player")?;
    let scoring = parse_scoring_token(&args.scoring, "--scoring")?;

    let mut agent = NmcsPolicy::new(
        "NMCS".to_string(),
        NestedSearch::new(args.depth).with_scoring(scoring),
    );

    let mut opponent: Box<dyn Policy> = match args.opponent.to_lowercase().as_str() {
        "random" => Box::new(RandomPolicy::new("Random".to_string())),
        "defensive" => Box::new(DefensivePolicy::new("Defensive".to_string())),
        "nmcs" => Box::new(NmcsPolicy::new(
            "NMCS-Opponent".to_string(),
            NestedSearch::new(args.depth).with_scoring(scoring),
        )),
        other => {
            return Err(anyhow::anyhow!(
                "Unknown opponent type: '{other}'. Supported: random, defensive, nmcs"
            ));
        }
    };

    output::print_section("Evaluation Configuration");
    output::print_kv("Opponent", opponent.name());
    output::print_kv(
        "Agent plays as",
        &format!("{agent_player:?} (first player: {first_player:?})"),
    );
    output::print_kv("Games", &args.games.to_string());
    output::print_kv("Depth", &args.depth.to_string());
    output::print_kv("Scoring", args.scoring.trim());
    if let Some(seed) = args.seed {
        output::print_kv("Seed", &seed.to_string());
    }

    let config = MatchConfig {
        games: args.games,
        seed: args.seed,
        agent_player,
        first_player,
    };

    let mut pipeline = MatchPipeline::new(config)
        .with_progress(output::create_match_progress(args.games as u64));
    let result = pipeline.run(&mut agent, opponent.as_mut())?;

    output::print_section("Results");
    output::print_kv("Games", &result.total_games.to_string());
    output::print_kv(
        "Wins",
        &format!("{} ({:.1}%)", result.wins, result.win_rate * 100.0),
    );
    output::print_kv(
        "Draws",
        &format!("{} ({:.1}%)", result.draws, result.draw_rate * 100.0),
    );
    output::print_kv(
        "Losses",
        &format!("{} ({:.1}%)", result.losses, result.loss_rate * 100.0),
    );

    if let Some(path) = args.export {
        result.save(&path)?;
        println!("\nResults exported to: {}", path.display());
    }

    Ok(())
}
