//! In-process matchmaking hub.
//!
//! Pairs waiting players first come, first served. The player who has waited
//! longest moves first. Once paired, moves are relayed verbatim to the
//! partner; nothing is validated here.

use crate::{Connection, ConnectionError, ConnectionEvent, Connector, Link, TurnAssignment};
use crosswise_tictactoe::Cell;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

type SeatId = u64;

#[derive(Debug)]
enum HubRequest {
    Join {
        seat: SeatId,
        events: mpsc::UnboundedSender<ConnectionEvent>,
    },
    Announce {
        seat: SeatId,
        name: String,
    },
    Move {
        seat: SeatId,
        cell: Cell,
    },
    Leave {
        seat: SeatId,
    },
}

#[derive(Debug)]
struct Seat {
    name: Option<String>,
    events: mpsc::UnboundedSender<ConnectionEvent>,
    partner: Option<SeatId>,
}

/// Hub state, owned by the hub task.
#[derive(Debug, Default)]
struct Hub {
    seats: HashMap<SeatId, Seat>,
    waiting: VecDeque<SeatId>,
}

impl Hub {
    fn handle(&mut self, request: HubRequest) {
        match request {
            HubRequest::Join { seat, events } => {
                debug!(seat, "Seat joined");
                if events.send(ConnectionEvent::Connected).is_err() {
                    debug!(seat, "Seat receiver gone");
                }
                self.seats.insert(
                    seat,
                    Seat {
                        name: None,
                        events,
                        partner: None,
                    },
                );
            }
            HubRequest::Announce { seat, name } => {
                let Some(entry) = self.seats.get_mut(&seat) else {
                    warn!(seat, "Announce from unknown seat");
                    return;
                };
                if entry.partner.is_some() || entry.name.is_some() {
                    debug!(seat, "Seat already announced");
                    return;
                }
                info!(seat, %name, "Player waiting for opponent");
                entry.name = Some(name);
                self.waiting.push_back(seat);
                self.pair_waiting();
            }
            HubRequest::Move { seat, cell } => {
                let partner = self.seats.get(&seat).and_then(|s| s.partner);
                match partner.and_then(|p| self.seats.get(&p).map(|s| (p, s))) {
                    Some((partner, entry)) => {
                        if entry.events.send(ConnectionEvent::RemoteMove { cell }).is_err() {
                            debug!(seat = partner, "Seat receiver gone");
                        }
                    }
                    None => warn!(seat, ?cell, "Move from unpaired seat dropped"),
                }
            }
            HubRequest::Leave { seat } => {
                self.waiting.retain(|s| *s != seat);
                let Some(left) = self.seats.remove(&seat) else {
                    return;
                };
                info!(seat, "Seat left");
                let Some(partner) = left.partner else {
                    return;
                };
                if let Some(entry) = self.seats.get_mut(&partner) {
                    entry.partner = None;
                    if entry.events.send(ConnectionEvent::Disconnected).is_err() {
                        debug!(seat = partner, "Seat receiver gone");
                    }
                }
            }
        }
    }

    fn pair_waiting(&mut self) {
        while self.waiting.len() >= 2 {
            let (Some(first), Some(second)) = (self.waiting.pop_front(), self.waiting.pop_front())
            else {
                return;
            };
            let first_name = self.name_of(first);
            let second_name = self.name_of(second);

            for (seat, partner, opponent, turn) in [
                (first, second, second_name.clone(), TurnAssignment::First),
                (second, first, first_name.clone(), TurnAssignment::Second),
            ] {
                if let Some(entry) = self.seats.get_mut(&seat) {
                    entry.partner = Some(partner);
                    if entry
                        .events
                        .send(ConnectionEvent::Paired { opponent, turn })
                        .is_err()
                    {
                        debug!(seat, "Seat receiver gone");
                    }
                }
            }
            info!(%first_name, %second_name, "Paired players");
        }
    }

    fn name_of(&self, seat: SeatId) -> String {
        self.seats
            .get(&seat)
            .and_then(|s| s.name.clone())
            .unwrap_or_default()
    }
}

/// Handle to a running hub task.
///
/// Cloning shares the same hub. The task exits once every handle,
/// connector and connection is gone.
#[derive(Debug, Clone)]
pub struct Matchmaker {
    requests: mpsc::UnboundedSender<HubRequest>,
    next_seat: Arc<AtomicU64>,
}

impl Matchmaker {
    /// Spawns the hub on the current tokio runtime.
    #[instrument]
    pub fn spawn() -> Self {
        let (requests, mut inbox) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            let mut hub = Hub::default();
            while let Some(request) = inbox.recv().await {
                hub.handle(request);
            }
            debug!("Matchmaker hub stopped");
        });
        info!("Matchmaker hub started");
        Self {
            requests,
            next_seat: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Returns a connector that opens seats on this hub.
    pub fn connector(&self) -> HubConnector {
        HubConnector { hub: self.clone() }
    }
}

/// [`Connector`] for the in-process hub.
#[derive(Debug, Clone)]
pub struct HubConnector {
    hub: Matchmaker,
}

#[async_trait::async_trait]
impl Connector for HubConnector {
    #[instrument(skip(self))]
    async fn open(&mut self) -> Result<Link, ConnectionError> {
        let seat = self.hub.next_seat.fetch_add(1, Ordering::Relaxed);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        self.hub
            .requests
            .send(HubRequest::Join {
                seat,
                events: events_tx,
            })
            .map_err(|_| ConnectionError::new("Matchmaker hub is not running"))?;
        debug!(seat, "Opened hub seat");

        let connection = HubConnection {
            seat,
            requests: self.hub.requests.clone(),
            open: true,
        };
        Ok(Link::new(Box::new(connection), events_rx))
    }
}

/// One seat at the hub.
#[derive(Debug)]
pub struct HubConnection {
    seat: SeatId,
    requests: mpsc::UnboundedSender<HubRequest>,
    open: bool,
}

impl HubConnection {
    fn send(&self, request: HubRequest) {
        if !self.open {
            debug!(seat = self.seat, "Ignoring request on closed seat");
            return;
        }
        if self.requests.send(request).is_err() {
            warn!(seat = self.seat, "Matchmaker hub is gone");
        }
    }
}

impl Connection for HubConnection {
    fn announce_presence(&mut self, name: &str) {
        self.send(HubRequest::Announce {
            seat: self.seat,
            name: name.to_string(),
        });
    }

    fn send_move(&mut self, cell: Cell) {
        self.send(HubRequest::Move {
            seat: self.seat,
            cell,
        });
    }

    fn disconnect(&mut self) {
        if self.open {
            self.send(HubRequest::Leave { seat: self.seat });
            self.open = false;
            debug!(seat = self.seat, "Seat disconnected");
        }
    }
}

impl Drop for HubConnection {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn next(link: &mut Link) -> ConnectionEvent {
        link.events.recv().await.expect("event")
    }

    #[tokio::test]
    async fn test_pairs_two_waiting_players() {
        let hub = Matchmaker::spawn();
        let mut connector = hub.connector();
        let mut alice = connector.open().await.expect("open");
        let mut bob = connector.open().await.expect("open");

        assert_eq!(next(&mut alice).await, ConnectionEvent::Connected);
        assert_eq!(next(&mut bob).await, ConnectionEvent::Connected);

        alice.connection.announce_presence("Alice");
        bob.connection.announce_presence("Bob");

        assert_eq!(
            next(&mut alice).await,
            ConnectionEvent::Paired {
                opponent: "Bob".into(),
                turn: TurnAssignment::First
            }
        );
        assert_eq!(
            next(&mut bob).await,
            ConnectionEvent::Paired {
                opponent: "Alice".into(),
                turn: TurnAssignment::Second
            }
        );

        alice.connection.send_move(Cell::Center);
        assert_eq!(
            next(&mut bob).await,
            ConnectionEvent::RemoteMove { cell: Cell::Center }
        );
    }

    #[tokio::test]
    async fn test_leaving_notifies_partner_once() {
        let hub = Matchmaker::spawn();
        let mut connector = hub.connector();
        let mut alice = connector.open().await.expect("open");
        let mut bob = connector.open().await.expect("open");
        alice.connection.announce_presence("Alice");
        bob.connection.announce_presence("Bob");
        next(&mut bob).await; // Connected
        next(&mut bob).await; // Paired

        alice.connection.disconnect();
        alice.connection.disconnect();
        assert_eq!(next(&mut bob).await, ConnectionEvent::Disconnected);

        // A third player is not paired with the orphaned seat.
        let mut carol = connector.open().await.expect("open");
        carol.connection.announce_presence("Carol");
        assert_eq!(next(&mut carol).await, ConnectionEvent::Connected);
        assert!(carol.events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_hub_survives_a_seat_that_stopped_listening() {
        let hub = Matchmaker::spawn();
        let mut connector = hub.connector();
        let Link {
            connection: mut alice,
            events: alice_events,
        } = connector.open().await.expect("open");
        drop(alice_events);
        let mut bob = connector.open().await.expect("open");

        alice.announce_presence("Alice");
        bob.connection.announce_presence("Bob");
        assert_eq!(next(&mut bob).await, ConnectionEvent::Connected);
        assert!(matches!(
            next(&mut bob).await,
            ConnectionEvent::Paired { .. }
        ));

        // Relaying to the deaf seat and leaving it behind are both quiet.
        bob.connection.send_move(Cell::Center);
        bob.connection.disconnect();

        let mut carol = connector.open().await.expect("open");
        let mut dave = connector.open().await.expect("open");
        carol.connection.announce_presence("Carol");
        dave.connection.announce_presence("Dave");
        assert_eq!(next(&mut dave).await, ConnectionEvent::Connected);
        assert_eq!(
            next(&mut dave).await,
            ConnectionEvent::Paired {
                opponent: "Carol".into(),
                turn: TurnAssignment::Second
            }
        );
        drop(alice);
    }
}
