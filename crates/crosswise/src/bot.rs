//! Automated seat for live matches.
//!
//! A bot is an ordinary UI client: it reads snapshots from its own
//! [`MatchDriver`](crate::MatchDriver) and answers with [`Command`]s, so its
//! moves travel through the connection like a human's would.

use crate::{Command, GameEvent, MatchHandle, MatchView, Phase};
use crosswise_tictactoe::{Cell, RandomSource, hard_move};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

/// Picks the bot's reply for `view`, if it is the bot's move.
///
/// The view is from the bot's seat, so its own marks are `Player`. The board
/// is flipped before asking the hard strategy, which plays `Opponent`.
pub fn bot_move<R: RandomSource + ?Sized>(view: &MatchView, rng: &mut R) -> Option<Cell> {
    if view.phase != Phase::Active || !view.is_player_turn {
        return None;
    }
    hard_move(&view.board.flipped(), rng)
}

/// Plays a live seat with the hard strategy.
pub struct BotPlayer {
    name: String,
    rng: Box<dyn RandomSource>,
    think_for: Duration,
    rematch: bool,
}

impl std::fmt::Debug for BotPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotPlayer")
            .field("name", &self.name)
            .field("think_for", &self.think_for)
            .field("rematch", &self.rematch)
            .finish_non_exhaustive()
    }
}

impl BotPlayer {
    /// Creates a bot that answers immediately and plays a single match.
    pub fn new(name: impl Into<String>, rng: Box<dyn RandomSource>) -> Self {
        Self {
            name: name.into(),
            rng,
            think_for: Duration::ZERO,
            rematch: false,
        }
    }

    /// Pauses before every move.
    pub fn with_think_for(mut self, think_for: Duration) -> Self {
        self.think_for = think_for;
        self
    }

    /// Restarts (and so re-queues at the hub) whenever a match ends.
    pub fn with_rematch(mut self, rematch: bool) -> Self {
        self.rematch = rematch;
        self
    }

    /// Bot's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Plays until the driver stops or, without rematch, the match ends.
    #[instrument(skip_all, fields(bot = %self.name))]
    pub async fn play(mut self, handle: MatchHandle, mut events: mpsc::UnboundedReceiver<GameEvent>) {
        info!("Bot joined");
        let mut last_phase = None;

        while let Some(GameEvent::Snapshot(view)) = events.recv().await {
            let entered_end = view.phase == Phase::Ended && last_phase != Some(Phase::Ended);
            last_phase = Some(view.phase);

            if entered_end {
                info!(status = %view.status, "Bot match over");
                if !self.rematch {
                    break;
                }
                if !handle.send(Command::Restart) {
                    break;
                }
                continue;
            }

            if let Some(cell) = bot_move(&view, self.rng.as_mut()) {
                if !self.think_for.is_zero() {
                    tokio::time::sleep(self.think_for).await;
                }
                debug!(%cell, "Bot plays");
                if !handle.send(Command::Play(cell)) {
                    break;
                }
            }
        }

        handle.shutdown().await;
        info!("Bot left");
    }
}
