//! Play command - interactive game against the search engine

use std::io::{self, BufRead, Write};

use anyhow::{Result, bail, ensure};
use clap::Parser;

use crate::{
    cli::commands::{parse_player_token, parse_scoring_token},
    search::NestedSearch,
    tictactoe::{BoardState, Cell, Game, GameOutcome, Player},
};

#[derive(Parser, Debug)]
#[command(about = "Play an interactive game against the search engine")]
pub struct PlayArgs {
    /// Search depth for the engine
    #[arg(long, short = 'd', default_value_t = 3)]
    pub depth: usize,

    /// Random seed for the engine's rollouts
    #[arg(long)]
    pub seed: Option<u64>,

    /// Which token the human controls (`x` or `o`)
    #[arg(long, default_value = "x")]
    pub human: String,

    /// Leaf scoring convention (`absolute` or `side-to-move`)
    #[arg(long, default_value = "absolute")]
    pub scoring: String,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    ensure!(args.depth >= 1, "--depth must be at least 1");
    let human = parse_player_token(&args.human, "--human")?;
    let scoring = parse_scoring_token(&args.scoring, "--scoring")?;

    let mut search = NestedSearch::new(args.depth).with_scoring(scoring);
    if let Some(seed) = args.seed {
        search.reseed(Some(seed));
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    run_game(&mut input, human, &mut search)
}

fn run_game(input: &mut impl BufRead, human: Player, search: &mut NestedSearch) -> Result<()> {
    let mut game = Game::new();

    loop {
        let state = game.current_state()?;
        println!("{}", render_board(&state));

        if let Some(outcome) = state.outcome() {
            match outcome {
                GameOutcome::Win(player) => println!("Player {player:?} wins!"),
                GameOutcome::Draw => println!("It's a draw!"),
            }
            return Ok(());
        }

        if state.to_move == human {
            let position = prompt_move(input, &state)?;
            game.play(position)?;
        } else {
            println!("AI is thinking...");
            let position = search.select_move(&state)?;
            game.play(position)?;
            println!("AI selects move {position}");
        }
    }
}

/// Render the board as three rows of cell glyphs with `-+-+-` separators,
/// using a blank glyph for empty cells.
fn render_board(state: &BoardState) -> String {
    let glyph = |cell: Cell| match cell {
        Cell::Empty => ' ',
        Cell::X => 'X',
        Cell::O => 'O',
    };

    let mut lines = Vec::with_capacity(5);
    for row in 0..3 {
        let base = row * 3;
        lines.push(format!(
            "{}|{}|{}",
            glyph(state.get(base)),
            glyph(state.get(base + 1)),
            glyph(state.get(base + 2))
        ));
        if row < 2 {
            lines.push("-+-+-".to_string());
        }
    }
    lines.join("\n")
}

/// Read a move index from the human, re-prompting on out-of-range, occupied,
/// or unparseable input.
fn prompt_move(input: &mut impl BufRead, state: &BoardState) -> Result<usize> {
    loop {
        print!("Enter your move (0-8): ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("input ended before the game finished");
        }

        match line.trim().parse::<usize>() {
            Ok(position) if position < 9 && state.is_empty(position) => return Ok(position),
            _ => println!("Invalid move. Try again."),
        }
    }
}
