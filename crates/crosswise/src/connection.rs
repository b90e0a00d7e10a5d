//! Live-match connection boundary.
//!
//! The transport itself (framing, reconnection, encoding) lives behind these
//! traits. The match driver only announces itself, sends moves, disconnects,
//! and reacts to [`ConnectionEvent`]s.

use crate::ConnectionError;
use crosswise_tictactoe::{Cell, Mark};
use derive_new::new;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Turn order handed out by the matchmaker when two players are paired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnAssignment {
    /// This session moves first.
    First,
    /// The peer moves first.
    Second,
}

impl TurnAssignment {
    /// Who owns the opening turn from this session's point of view.
    pub fn opening_turn(self) -> Mark {
        match self {
            TurnAssignment::First => Mark::Player,
            TurnAssignment::Second => Mark::Opponent,
        }
    }
}

/// Events a connection delivers to its session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ConnectionEvent {
    /// The channel is up; the session should announce itself.
    Connected,
    /// Paired with an opponent.
    Paired {
        /// Opponent's announced name.
        opponent: String,
        /// Turn order for this session.
        turn: TurnAssignment,
    },
    /// The paired peer played a cell.
    RemoteMove {
        /// Cell the peer marked.
        cell: Cell,
    },
    /// The channel or the peer went away.
    Disconnected,
}

/// Outbound half of a live connection.
pub trait Connection: Send {
    /// Announces the local player to the matchmaker.
    fn announce_presence(&mut self, name: &str);

    /// Sends a local move to the peer. Fire-and-forget.
    fn send_move(&mut self, cell: Cell);

    /// Releases the channel. Safe to call more than once.
    fn disconnect(&mut self);
}

/// An open connection and the stream of events it produces.
#[derive(new)]
pub struct Link {
    /// Outbound calls.
    pub connection: Box<dyn Connection>,
    /// Inbound events.
    pub events: mpsc::UnboundedReceiver<ConnectionEvent>,
}

impl std::fmt::Debug for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Link").finish_non_exhaustive()
    }
}

/// Opens live connections. Called once per match start or restart.
#[async_trait::async_trait]
pub trait Connector: Send {
    /// Opens a fresh connection.
    async fn open(&mut self) -> Result<Link, ConnectionError>;
}
