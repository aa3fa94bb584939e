//! NMCS CLI - Nested Monte Carlo Search player for Tic-Tac-Toe
//!
//! This CLI provides a unified interface for:
//! - Playing interactive games against the search engine
//! - Evaluating the engine against baseline policies
//! - Analyzing individual positions move by move

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "nmcs")]
#[command(version, about = "Nested Monte Carlo Search player for Tic-Tac-Toe", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an interactive game against the search engine
    Play(nmcs::cli::commands::play::PlayArgs),

    /// Evaluate the search engine against a baseline over many games
    Evaluate(nmcs::cli::commands::evaluate::EvaluateArgs),

    /// Score every legal move of a position
    Analyze(nmcs::cli::commands::analyze::AnalyzeArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => nmcs::cli::commands::play::execute(args),
        Commands::Evaluate(args) => nmcs::cli::commands::evaluate::execute(args),
        Commands::Analyze(args) => nmcs::cli::commands::analyze::execute(args),
    }
}
