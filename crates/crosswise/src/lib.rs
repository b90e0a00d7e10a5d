//! Crosswise - tic-tac-toe matches against the computer or a remote player
//!
//! The rules, AI and hint advisor live in `crosswise_tictactoe`; this crate
//! runs matches on top of them.
//!
//! # Architecture
//!
//! - **Session**: [`MatchSession`], the single owner of the board and the
//!   only place moves are applied
//! - **Driver**: [`MatchDriver`], one tokio task per match serializing UI
//!   commands, connection events and timers
//! - **Connection**: the [`Connector`]/[`Connection`] boundary for live
//!   matches, with an in-process [`Matchmaker`] hub
//! - **Config**: [`ArenaConfig`] from TOML
//!
//! # Example
//!
//! ```no_run
//! use crosswise::{ArenaConfig, Command, GameEvent, MatchDriver};
//! use crosswise_tictactoe::{Cell, Difficulty, SeededRandom};
//! use tokio::sync::mpsc;
//!
//! # async fn example() {
//! let (events_tx, mut events) = mpsc::unbounded_channel();
//! let handle = MatchDriver::vs_ai(
//!     ArenaConfig::default(),
//!     Difficulty::Hard,
//!     Box::new(SeededRandom::new(7)),
//!     events_tx,
//! )
//! .spawn();
//!
//! handle.send(Command::Play(Cell::Center));
//! while let Some(GameEvent::Snapshot(view)) = events.recv().await {
//!     println!("{}", view.status);
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bot;
mod config;
mod connection;
mod driver;
mod error;
mod hint_display;
mod matchmaker;
mod session;

// Crate-level exports - Errors
pub use error::{ConfigError, ConnectionError};

// Crate-level exports - Configuration
pub use config::{AiConfig, ArenaConfig, CONFIG_ENV, HintConfig};

// Crate-level exports - Live connections
pub use connection::{Connection, ConnectionEvent, Connector, Link, TurnAssignment};
pub use matchmaker::{HubConnection, HubConnector, Matchmaker};

// Crate-level exports - Match state
pub use hint_display::HintDisplay;
pub use session::{Applied, MatchSession, Mode, MoveIntent, Outcome, Phase, Rejection, Status};

// Crate-level exports - Driver
pub use bot::{BotPlayer, bot_move};
pub use driver::{Command, GameEvent, MatchDriver, MatchHandle, MatchView};
