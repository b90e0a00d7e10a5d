//! Tests for live matches driven through a recording connector.

use crosswise::{
    ArenaConfig, Command, Connection, ConnectionError, ConnectionEvent, Connector, GameEvent, Link,
    MatchDriver, MatchHandle, MatchView, Phase, TurnAssignment,
};
use crosswise_tictactoe::{Cell, Hint, Mark, ScriptedRandom};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// What the driver did to its connections.
#[derive(Debug, Default)]
struct Wire {
    opens: usize,
    disconnects: usize,
    announced: Vec<String>,
    sent: Vec<Cell>,
    feeds: Vec<mpsc::UnboundedSender<ConnectionEvent>>,
}

type SharedWire = Arc<Mutex<Wire>>;

struct RecordingConnection {
    wire: SharedWire,
    open: bool,
}

impl Connection for RecordingConnection {
    fn announce_presence(&mut self, name: &str) {
        self.wire.lock().expect("wire").announced.push(name.to_string());
    }

    fn send_move(&mut self, cell: Cell) {
        self.wire.lock().expect("wire").sent.push(cell);
    }

    fn disconnect(&mut self) {
        if self.open {
            self.open = false;
            self.wire.lock().expect("wire").disconnects += 1;
        }
    }
}

struct RecordingConnector {
    wire: SharedWire,
    refuse: bool,
}

#[async_trait::async_trait]
impl Connector for RecordingConnector {
    async fn open(&mut self) -> Result<Link, ConnectionError> {
        let mut wire = self.wire.lock().expect("wire");
        wire.opens += 1;
        if self.refuse {
            return Err(ConnectionError::new("refused"));
        }
        let (feed, events) = mpsc::unbounded_channel();
        wire.feeds.push(feed);
        let connection = RecordingConnection {
            wire: self.wire.clone(),
            open: true,
        };
        Ok(Link::new(Box::new(connection), events))
    }
}

struct Harness {
    wire: SharedWire,
    handle: MatchHandle,
    events: mpsc::UnboundedReceiver<GameEvent>,
}

impl Harness {
    fn spawn(refuse: bool) -> Self {
        let wire = SharedWire::default();
        let connector = RecordingConnector {
            wire: wire.clone(),
            refuse,
        };
        let (events_tx, events) = mpsc::unbounded_channel();
        let handle = MatchDriver::live(
            ArenaConfig::default().with_player_name("Ada"),
            Box::new(connector),
            Box::new(ScriptedRandom::new()),
            events_tx,
        )
        .spawn();
        Self {
            wire,
            handle,
            events,
        }
    }

    async fn next_view(&mut self) -> MatchView {
        match self.events.recv().await.expect("driver published a snapshot") {
            GameEvent::Snapshot(view) => view,
        }
    }

    /// Delivers `event` on the newest connection and returns the next snapshot.
    async fn deliver(&mut self, event: ConnectionEvent) -> MatchView {
        let feed = self
            .wire
            .lock()
            .expect("wire")
            .feeds
            .last()
            .cloned()
            .expect("a connection was opened");
        feed.send(event).expect("driver listening");
        self.next_view().await
    }

    async fn command(&mut self, command: Command) -> MatchView {
        assert!(self.handle.send(command));
        self.next_view().await
    }

    /// Connects and pairs; returns the first active snapshot.
    async fn pair(&mut self, turn: TurnAssignment) -> MatchView {
        self.next_view().await;
        self.deliver(ConnectionEvent::Connected).await;
        self.deliver(ConnectionEvent::Paired {
            opponent: "Bob".into(),
            turn,
        })
        .await
    }

    /// Tears the driver down, handing back the record of what it did.
    async fn shutdown(self) -> SharedWire {
        self.handle.shutdown().await;
        self.wire
    }

    fn wire(&self) -> std::sync::MutexGuard<'_, Wire> {
        self.wire.lock().expect("wire")
    }
}

#[tokio::test]
async fn test_connect_announce_and_pair() {
    let mut h = Harness::spawn(false);

    let view = h.next_view().await;
    assert_eq!(view.phase, Phase::Connecting);
    assert_eq!(view.status, "Connecting");
    assert_eq!(h.wire().opens, 1);

    let view = h.deliver(ConnectionEvent::Connected).await;
    assert_eq!(view.phase, Phase::Pairing);
    assert_eq!(view.status, "Waiting for opponent");
    assert_eq!(h.wire().announced, vec!["Ada".to_string()]);

    let view = h
        .deliver(ConnectionEvent::Paired {
            opponent: "Bob".into(),
            turn: TurnAssignment::Second,
        })
        .await;
    assert_eq!(view.phase, Phase::Active);
    assert_eq!(view.status, "Playing with Bob");
    assert!(!view.is_player_turn);
    assert_eq!(view.turn_label.as_deref(), Some("Opponent turn"));

    h.shutdown().await;
}

#[tokio::test]
async fn test_malformed_pairing_keeps_waiting() {
    let mut h = Harness::spawn(false);
    h.next_view().await;
    h.deliver(ConnectionEvent::Connected).await;

    let view = h
        .deliver(ConnectionEvent::Paired {
            opponent: String::new(),
            turn: TurnAssignment::First,
        })
        .await;
    assert_eq!(view.phase, Phase::Pairing);
    assert_eq!(view.status, "Waiting for opponent");

    h.shutdown().await;
}

#[tokio::test]
async fn test_local_moves_go_out_and_remote_moves_come_in() {
    let mut h = Harness::spawn(false);
    h.pair(TurnAssignment::First).await;

    let view = h.command(Command::Play(Cell::Center)).await;
    assert_eq!(view.board.get(Cell::Center), Some(Mark::Player));
    assert!(!view.is_player_turn);
    assert_eq!(h.wire().sent, vec![Cell::Center]);

    // Out of turn locally: ignored and not sent.
    let view = h.command(Command::Play(Cell::TopLeft)).await;
    assert!(view.board.is_empty(Cell::TopLeft));
    assert_eq!(h.wire().sent, vec![Cell::Center]);

    let view = h.deliver(ConnectionEvent::RemoteMove { cell: Cell::TopLeft }).await;
    assert_eq!(view.board.get(Cell::TopLeft), Some(Mark::Opponent));
    assert!(view.is_player_turn);

    // A duplicate remote move on a filled cell changes nothing.
    let view = h.deliver(ConnectionEvent::RemoteMove { cell: Cell::Center }).await;
    assert_eq!(view.board.get(Cell::Center), Some(Mark::Player));
    assert_eq!(view.history.len(), 2);

    h.shutdown().await;
}

#[tokio::test]
async fn test_hints_unavailable_in_live_play() {
    let mut h = Harness::spawn(false);
    h.pair(TurnAssignment::First).await;

    let view = h.command(Command::Hint).await;
    assert_eq!(view.hint, Some(Hint::Unavailable));
    assert_eq!(view.hints_used, 1);

    h.shutdown().await;
}

#[tokio::test]
async fn test_win_releases_connection() {
    let mut h = Harness::spawn(false);
    h.pair(TurnAssignment::First).await;

    h.command(Command::Play(Cell::TopLeft)).await;
    h.deliver(ConnectionEvent::RemoteMove { cell: Cell::MiddleLeft }).await;
    h.command(Command::Play(Cell::TopCenter)).await;
    h.deliver(ConnectionEvent::RemoteMove { cell: Cell::Center }).await;
    let view = h.command(Command::Play(Cell::TopRight)).await;

    assert_eq!(view.phase, Phase::Ended);
    assert_eq!(view.status, "You win");
    assert_eq!(
        view.winning_line.map(|line| line.cells()),
        Some([Cell::TopLeft, Cell::TopCenter, Cell::TopRight])
    );
    // The winning move still reached the peer before the release.
    assert_eq!(
        h.wire().sent,
        vec![Cell::TopLeft, Cell::TopCenter, Cell::TopRight]
    );
    assert_eq!(h.wire().disconnects, 1);

    let wire = h.shutdown().await;
    assert_eq!(wire.lock().expect("wire").disconnects, 1);
}

#[tokio::test]
async fn test_connection_loss_keeps_board() {
    let mut h = Harness::spawn(false);
    h.pair(TurnAssignment::First).await;
    h.command(Command::Play(Cell::Center)).await;

    let view = h.deliver(ConnectionEvent::Disconnected).await;
    assert_eq!(view.phase, Phase::Ended);
    assert_eq!(view.status, "Connection lost");
    assert_eq!(view.board.get(Cell::Center), Some(Mark::Player));
    assert_eq!(view.winning_line, None);
    assert_eq!(h.wire().disconnects, 1);

    h.shutdown().await;
}

#[tokio::test]
async fn test_restart_reconnects_exactly_once() {
    let mut h = Harness::spawn(false);
    h.pair(TurnAssignment::Second).await;
    h.deliver(ConnectionEvent::RemoteMove { cell: Cell::Center }).await;

    let view = h.command(Command::Restart).await;
    assert_eq!(view.phase, Phase::Connecting);
    assert_eq!(view.status, "Connecting");
    assert!(view.history.is_empty());
    assert_eq!(view.board, crosswise_tictactoe::Board::new());
    {
        let wire = h.wire();
        assert_eq!(wire.disconnects, 1);
        assert_eq!(wire.opens, 2);
    }

    // The fresh connection pairs again from scratch.
    h.deliver(ConnectionEvent::Connected).await;
    assert_eq!(h.wire().announced, vec!["Ada".to_string(), "Ada".to_string()]);

    let wire = h.shutdown().await;
    assert_eq!(wire.lock().expect("wire").disconnects, 2);
}

#[tokio::test]
async fn test_end_releases_connection() {
    let mut h = Harness::spawn(false);
    h.pair(TurnAssignment::First).await;

    let view = h.command(Command::End).await;
    assert_eq!(view.phase, Phase::Ended);
    assert_eq!(h.wire().disconnects, 1);

    let view = h.command(Command::Play(Cell::Center)).await;
    assert!(view.board.is_empty(Cell::Center));
    assert!(h.wire().sent.is_empty());

    let wire = h.shutdown().await;
    assert_eq!(wire.lock().expect("wire").disconnects, 1);
}

#[tokio::test]
async fn test_refused_connection_stays_connecting() {
    let mut h = Harness::spawn(true);

    let view = h.next_view().await;
    assert_eq!(view.phase, Phase::Connecting);
    assert_eq!(view.status, "Connecting");

    let view = h.command(Command::Restart).await;
    assert_eq!(view.status, "Connecting");
    assert_eq!(h.wire().opens, 2);
    assert_eq!(h.wire().disconnects, 0);

    h.shutdown().await;
}
