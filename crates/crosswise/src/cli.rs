//! Command-line interface for crosswise.

use clap::{Parser, Subcommand};
use crosswise_tictactoe::Difficulty;
use std::path::PathBuf;

/// Crosswise - tic-tac-toe against the computer or over a live connection
#[derive(Parser, Debug)]
#[command(name = "crosswise")]
#[command(about = "Tic-tac-toe in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (falls back to $CROSSWISE_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit snapshots as JSON lines instead of drawing the board
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play against the computer
    Play {
        /// Computer strength
        #[arg(short, long, default_value_t = Difficulty::Medium)]
        difficulty: Difficulty,

        /// Seed for reproducible computer moves and delays
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Play a live match against a bot seated at a local matchmaking hub
    Duel {
        /// Seed for the bot and the delays
        #[arg(long)]
        seed: Option<u64>,
    },
}
