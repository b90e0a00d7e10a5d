//! Crosswise - terminal tic-tac-toe
//!
//! Play the computer, or duel a bot through a local matchmaking hub.

#![warn(missing_docs)]

mod cli;
mod terminal;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use crosswise::{ArenaConfig, BotPlayer, MatchDriver, Matchmaker};
use crosswise_tictactoe::{Difficulty, RandomSource, SeededRandom};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the board
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ArenaConfig::load(cli.config)?;
    info!(player = %config.player_name(), "Config ready");

    match cli.command {
        Command::Play { difficulty, seed } => run_play(config, difficulty, seed, cli.json).await,
        Command::Duel { seed } => run_duel(config, seed, cli.json).await,
    }
}

fn random_source(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(SeededRandom::from_entropy()),
    }
}

/// Play against the computer
async fn run_play(
    config: ArenaConfig,
    difficulty: Difficulty,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    info!(%difficulty, "Starting match against the computer");
    let (events_tx, events) = mpsc::unbounded_channel();
    let handle = MatchDriver::vs_ai(config, difficulty, random_source(seed), events_tx).spawn();
    terminal::run(handle, events, json).await
}

/// Play a live match against a bot through the in-process hub
async fn run_duel(config: ArenaConfig, seed: Option<u64>, json: bool) -> Result<()> {
    info!("Starting duel through local matchmaker");
    let hub = Matchmaker::spawn();

    let think_for = Duration::from_millis(*config.ai().min_delay_ms());
    let bot = BotPlayer::new("Bot", random_source(seed))
        .with_think_for(think_for)
        .with_rematch(true);

    // Bot seat: same arena settings under its own name
    let bot_config = config.clone().with_player_name(bot.name());
    let (bot_tx, bot_events) = mpsc::unbounded_channel();
    let bot_handle = MatchDriver::live(
        bot_config,
        Box::new(hub.connector()),
        random_source(seed.map(|s| s.wrapping_add(1))),
        bot_tx,
    )
    .spawn();
    let bot_task = tokio::spawn(bot.play(bot_handle, bot_events));

    let (events_tx, events) = mpsc::unbounded_channel();
    let handle = MatchDriver::live(
        config,
        Box::new(hub.connector()),
        random_source(seed.map(|s| s.wrapping_add(2))),
        events_tx,
    )
    .spawn();
    let result = terminal::run(handle, events, json).await;

    bot_task.abort();
    result
}
