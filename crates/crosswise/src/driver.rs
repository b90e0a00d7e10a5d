//! Async match driver.
//!
//! One task owns the [`MatchSession`] and handles UI commands, connection
//! events, the computer's reply timer and the hint auto-hide one at a time.
//! After every step it publishes a [`MatchView`] snapshot to the UI.
//!
//! Timers are futures owned by the driver. Dropping the driver (task end,
//! abort, or the UI hanging up) cancels them and releases the live link.

use crate::{
    ArenaConfig, Connector, ConnectionEvent, HintDisplay, Link, MatchSession, Mode, MoveIntent,
    Phase,
};
use crosswise_tictactoe::{
    Board, Cell, Difficulty, Hint, Mark, RandomSource, Triple, get_hint, select_move,
};
use serde::Serialize;
use std::pin::Pin;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Sleep;
use tracing::{debug, info, instrument, warn};

/// Requests from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// The local player clicked a cell.
    Play(Cell),
    /// Show advice for the next move.
    Hint,
    /// Hide the visible hint.
    DismissHint,
    /// Clear the board and start over (reconnecting in live mode).
    Restart,
    /// Abandon the match.
    End,
}

/// Messages sent from the driver to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// State after a step.
    Snapshot(MatchView),
}

/// Plain-data view of a match for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchView {
    /// Current board.
    pub board: Board,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Match mode.
    pub mode: Mode,
    /// Status line ("Play", "You win", ...).
    pub status: String,
    /// "Your turn" / "Opponent turn" while active.
    pub turn_label: Option<String>,
    /// True when the local player owns the turn.
    pub is_player_turn: bool,
    /// True while the computer's reply is pending.
    pub computer_thinking: bool,
    /// Completed line, once the match is won.
    pub winning_line: Option<Triple>,
    /// Visible hint.
    pub hint: Option<Hint>,
    /// Visible hint as text.
    pub hint_message: Option<String>,
    /// Hints requested this match.
    pub hints_used: u32,
    /// Moves played, oldest first.
    pub history: Vec<(Mark, Cell)>,
}

/// Drives one match on behalf of one local player.
pub struct MatchDriver {
    session: MatchSession,
    config: ArenaConfig,
    rng: Box<dyn RandomSource>,
    connector: Option<Box<dyn Connector>>,
    link: Option<Link>,
    ai_timer: Option<Pin<Box<Sleep>>>,
    hints: HintDisplay,
    events: mpsc::UnboundedSender<GameEvent>,
}

impl std::fmt::Debug for MatchDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchDriver")
            .field("session", &self.session)
            .field("linked", &self.link.is_some())
            .field("ai_pending", &self.ai_timer.is_some())
            .field("hints", &self.hints)
            .finish_non_exhaustive()
    }
}

impl MatchDriver {
    /// Creates a driver for a match against the computer.
    pub fn vs_ai(
        config: ArenaConfig,
        difficulty: Difficulty,
        rng: Box<dyn RandomSource>,
        events: mpsc::UnboundedSender<GameEvent>,
    ) -> Self {
        Self::with_session(MatchSession::vs_ai(difficulty), config, None, rng, events)
    }

    /// Creates a driver for a live match over connections from `connector`.
    pub fn live(
        config: ArenaConfig,
        connector: Box<dyn Connector>,
        rng: Box<dyn RandomSource>,
        events: mpsc::UnboundedSender<GameEvent>,
    ) -> Self {
        Self::with_session(MatchSession::live(), config, Some(connector), rng, events)
    }

    fn with_session(
        session: MatchSession,
        config: ArenaConfig,
        connector: Option<Box<dyn Connector>>,
        rng: Box<dyn RandomSource>,
        events: mpsc::UnboundedSender<GameEvent>,
    ) -> Self {
        let hints = HintDisplay::new(config.hints().display_for());
        Self {
            session,
            config,
            rng,
            connector,
            link: None,
            ai_timer: None,
            hints,
            events,
        }
    }

    /// The session as it stands.
    pub fn session(&self) -> &MatchSession {
        &self.session
    }

    /// Snapshot for the UI.
    pub fn view(&self) -> MatchView {
        let hint = self.hints.current();
        MatchView {
            board: *self.session.board(),
            phase: self.session.phase(),
            mode: self.session.mode().clone(),
            status: self.session.status().to_string(),
            turn_label: self.session.turn_label().map(str::to_string),
            is_player_turn: self.session.is_player_turn(),
            computer_thinking: self.ai_timer.is_some(),
            winning_line: self.session.winning_line(),
            hint,
            hint_message: hint.map(|h| h.to_string()),
            hints_used: self.hints.hints_used(),
            history: self.session.history().to_vec(),
        }
    }

    /// Runs the driver on its own task.
    pub fn spawn(self) -> MatchHandle {
        let (commands, inbox) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(inbox));
        MatchHandle { commands, task }
    }

    /// Runs until the command channel closes or the UI stops listening.
    #[instrument(skip_all)]
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        info!("Starting match driver");
        self.begin().await;

        while self.publish() {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => {
                        debug!("Command channel closed");
                        break;
                    }
                },
                event = next_event(&mut self.link) => self.handle_link_event(event),
                _ = elapsed(&mut self.ai_timer) => {
                    self.ai_timer = None;
                    self.play_computer();
                }
                _ = self.hints.expired() => {}
            }
        }

        info!("Match driver stopped");
    }

    /// Enters the mode's opening phase: starts a vs-AI match or opens the link.
    async fn begin(&mut self) {
        if self.session.difficulty().is_some() {
            self.session.start();
        } else {
            self.open_link().await;
        }
    }

    async fn open_link(&mut self) {
        let Some(connector) = self.connector.as_mut() else {
            warn!("Live match without a connector");
            return;
        };
        match connector.open().await {
            Ok(link) => {
                info!("Connection opened");
                self.link = Some(link);
            }
            // No automatic retry; the status stays "Connecting" until restart.
            Err(e) => warn!(error = %e, "Failed to open connection"),
        }
    }

    fn release_link(&mut self) {
        if let Some(mut link) = self.link.take() {
            link.connection.disconnect();
            info!("Connection released");
        }
    }

    fn publish(&self) -> bool {
        let sent = self.events.send(GameEvent::Snapshot(self.view())).is_ok();
        if !sent {
            debug!("UI stopped listening");
        }
        sent
    }

    #[instrument(skip(self))]
    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Play(cell) => {
                self.apply(MoveIntent::Local(cell));
            }
            Command::Hint => {
                let hint = get_hint(
                    self.session.board(),
                    self.session.is_player_turn(),
                    self.session.is_active(),
                    self.session.mode().game_type(),
                    self.rng.as_mut(),
                );
                debug!(%hint, "Hint requested");
                self.hints.show(hint);
            }
            Command::DismissHint => self.hints.hide(),
            Command::Restart => self.restart().await,
            Command::End => {
                self.ai_timer = None;
                self.session.end();
                self.release_link();
            }
        }
    }

    fn handle_link_event(&mut self, event: Option<ConnectionEvent>) {
        debug!(?event, "Connection event");
        match event {
            Some(ConnectionEvent::Connected) => {
                if self.session.connected() {
                    if let Some(link) = self.link.as_mut() {
                        link.connection.announce_presence(self.config.player_name());
                    }
                }
            }
            Some(ConnectionEvent::Paired { opponent, turn }) => {
                self.session.paired(&opponent, turn);
            }
            Some(ConnectionEvent::RemoteMove { cell }) => {
                self.apply(MoveIntent::Remote(cell));
            }
            Some(ConnectionEvent::Disconnected) | None => {
                self.release_link();
                self.session.connection_lost();
            }
        }
    }

    fn apply(&mut self, intent: MoveIntent) {
        let applied = self.session.apply(intent);
        if !applied.placed() {
            return;
        }

        if let (MoveIntent::Local(cell), Some(link)) = (intent, self.link.as_mut()) {
            link.connection.send_move(cell);
        }

        if self.session.phase() == Phase::Ended {
            self.release_link();
        } else if self.session.awaits_computer() {
            self.schedule_computer();
        }
    }

    fn schedule_computer(&mut self) {
        let ai = self.config.ai();
        let delay = self.rng.between(*ai.min_delay_ms(), *ai.max_delay_ms());
        debug!(delay_ms = delay, "Computer thinking");
        self.ai_timer = Some(Box::pin(tokio::time::sleep(Duration::from_millis(delay))));
    }

    fn play_computer(&mut self) {
        let Some(difficulty) = self.session.difficulty() else {
            return;
        };
        if !self.session.awaits_computer() {
            return;
        }
        let odds = *self.config.ai().medium();
        match select_move(self.session.board(), difficulty, odds, self.rng.as_mut()) {
            Some(cell) => self.apply(MoveIntent::Ai(cell)),
            None => warn!("Computer has no cell to play"),
        }
    }

    #[instrument(skip(self))]
    async fn restart(&mut self) {
        self.ai_timer = None;
        self.hints.reset();
        self.release_link();
        self.session.restart();
        self.begin().await;
    }
}

impl Drop for MatchDriver {
    fn drop(&mut self) {
        self.release_link();
    }
}

async fn next_event(link: &mut Option<Link>) -> Option<ConnectionEvent> {
    match link {
        Some(link) => link.events.recv().await,
        None => std::future::pending().await,
    }
}

async fn elapsed(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}

/// Handle to a spawned [`MatchDriver`].
#[derive(Debug)]
pub struct MatchHandle {
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl MatchHandle {
    /// Queues a command. Returns false once the driver has stopped.
    pub fn send(&self, command: Command) -> bool {
        self.commands.send(command).is_ok()
    }

    /// Tears the driver down and waits for it to finish.
    pub async fn shutdown(self) {
        drop(self.commands);
        if let Err(e) = self.task.await {
            warn!(error = %e, "Match driver task failed");
        }
    }

    /// Stops the driver without waiting.
    pub fn abort(&self) {
        self.task.abort();
    }
}
