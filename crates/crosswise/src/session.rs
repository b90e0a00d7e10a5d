//! Match session: the single owner of the authoritative board.
//!
//! Every move, whatever its origin, goes through [`MatchSession::apply`].
//! Illegal moves are expected races between the UI and the session (a late
//! click, a duplicate event) and are rejected as no-ops rather than errors.

use crate::TurnAssignment;
use crosswise_tictactoe::{Board, Cell, Difficulty, GameType, Mark, Win, find_winner, is_full};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Lifecycle phase of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// vs-AI match created, not yet started.
    AwaitingStart,
    /// Live match waiting for the connection to come up.
    Connecting,
    /// Live match announced, waiting to be paired.
    Pairing,
    /// Moves are accepted.
    Active,
    /// Finished, abandoned or disconnected. Only a restart leaves this phase.
    Ended,
}

/// Result of the match so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    /// Nobody has won yet.
    Undecided,
    /// A line was completed.
    Win(Win),
    /// The board filled with no line.
    Draw,
}

/// Who the player faces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Mode {
    /// Against the computer.
    VsAi {
        /// Strength of the computer for the whole match.
        difficulty: Difficulty,
    },
    /// Against a remote human.
    Live {
        /// Opponent name once paired.
        opponent: Option<String>,
    },
}

impl Mode {
    /// Kind of match, for the hint advisor.
    pub fn game_type(&self) -> GameType {
        match self {
            Mode::VsAi { .. } => GameType::VsAi,
            Mode::Live { .. } => GameType::Live,
        }
    }
}

/// Where a move came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveIntent {
    /// The local player clicked a cell.
    Local(Cell),
    /// The paired peer played a cell.
    Remote(Cell),
    /// The computer chose a cell.
    Ai(Cell),
}

impl MoveIntent {
    /// Target cell.
    pub fn cell(self) -> Cell {
        match self {
            MoveIntent::Local(cell) | MoveIntent::Remote(cell) | MoveIntent::Ai(cell) => cell,
        }
    }

    /// Mark placed by this move.
    pub fn mover(self) -> Mark {
        match self {
            MoveIntent::Local(_) => Mark::Player,
            MoveIntent::Remote(_) | MoveIntent::Ai(_) => Mark::Opponent,
        }
    }
}

/// Why a move was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Rejection {
    /// Moves are only accepted while active.
    #[display("Match is not active ({})", _0)]
    NotActive(Phase),
    /// The mover does not own the turn.
    #[display("It's not {:?}'s turn", _0)]
    NotYourTurn(Mark),
    /// The cell already holds a mark.
    #[display("Cell {} is already occupied", _0)]
    Occupied(Cell),
    /// The move's origin does not exist in this mode.
    #[display("{:?} moves are not accepted in this mode", _0)]
    WrongOrigin(MoveIntent),
}

/// What a move application did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Ignored; nothing changed.
    Rejected(Rejection),
    /// Placed; play continues with `turn` to move.
    Continued {
        /// Turn owner after the move.
        turn: Mark,
    },
    /// Placed and completed a line.
    Won(Win),
    /// Placed and filled the board.
    Drawn,
}

impl Applied {
    /// True when the board changed.
    pub fn placed(&self) -> bool {
        !matches!(self, Applied::Rejected(_))
    }
}

/// Status line shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(tag = "status", content = "opponent", rename_all = "snake_case")]
pub enum Status {
    /// vs-AI match before the first move.
    #[display("Start game")]
    StartGame,
    /// vs-AI match in progress.
    #[display("Play")]
    Play,
    /// Live match opening its connection.
    #[display("Connecting")]
    Connecting,
    /// Live match waiting for a partner.
    #[display("Waiting for opponent")]
    WaitingForOpponent,
    /// Live match in progress.
    #[display("Playing with {}", _0)]
    PlayingWith(String),
    /// The player completed a line.
    #[display("You win")]
    YouWin,
    /// The opponent completed a line.
    #[display("Opponent wins")]
    OpponentWins,
    /// Board full, no line.
    #[display("Draw")]
    Draw,
    /// The live channel dropped.
    #[display("Connection lost")]
    ConnectionLost,
}

/// One complete match from start to outcome or restart.
#[derive(Debug, Clone)]
pub struct MatchSession {
    board: Board,
    turn: Mark,
    phase: Phase,
    outcome: Outcome,
    mode: Mode,
    status: Status,
    history: Vec<(Mark, Cell)>,
}

impl MatchSession {
    /// Creates a vs-AI match awaiting its start. The player moves first.
    #[instrument]
    pub fn vs_ai(difficulty: Difficulty) -> Self {
        info!(%difficulty, "Creating vs-AI match");
        Self {
            board: Board::new(),
            turn: Mark::Player,
            phase: Phase::AwaitingStart,
            outcome: Outcome::Undecided,
            mode: Mode::VsAi { difficulty },
            status: Status::StartGame,
            history: Vec::new(),
        }
    }

    /// Creates a live match waiting for its connection.
    ///
    /// The turn owner is provisional until pairing assigns the order.
    #[instrument]
    pub fn live() -> Self {
        info!("Creating live match");
        Self {
            board: Board::new(),
            turn: Mark::Player,
            phase: Phase::Connecting,
            outcome: Outcome::Undecided,
            mode: Mode::Live { opponent: None },
            status: Status::Connecting,
            history: Vec::new(),
        }
    }

    /// The authoritative board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Who moves next.
    pub fn turn(&self) -> Mark {
        self.turn
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Result so far.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Match mode.
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Status line for the UI.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Moves played, oldest first.
    pub fn history(&self) -> &[(Mark, Cell)] {
        &self.history
    }

    /// True while moves are accepted.
    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    /// True when the local player owns the turn.
    pub fn is_player_turn(&self) -> bool {
        self.turn == Mark::Player
    }

    /// Difficulty of a vs-AI match.
    pub fn difficulty(&self) -> Option<Difficulty> {
        match self.mode {
            Mode::VsAi { difficulty } => Some(difficulty),
            Mode::Live { .. } => None,
        }
    }

    /// True when the computer should be scheduled to move.
    pub fn awaits_computer(&self) -> bool {
        self.is_active() && self.difficulty().is_some() && self.turn == Mark::Opponent
    }

    /// Turn label shown while the match is active.
    pub fn turn_label(&self) -> Option<&'static str> {
        self.is_active().then(|| {
            if self.is_player_turn() {
                "Your turn"
            } else {
                "Opponent turn"
            }
        })
    }

    /// Winning line, once there is one.
    pub fn winning_line(&self) -> Option<crosswise_tictactoe::Triple> {
        match self.outcome {
            Outcome::Win(win) => Some(win.line),
            Outcome::Undecided | Outcome::Draw => None,
        }
    }

    /// Starts a vs-AI match. Returns false if there was nothing to start.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::AwaitingStart {
            debug!("Start ignored");
            return false;
        }
        self.phase = Phase::Active;
        info!("Match started");
        true
    }

    /// The live channel is up; the caller announces presence next.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn connected(&mut self) -> bool {
        if self.phase != Phase::Connecting {
            debug!("Connected event ignored");
            return false;
        }
        self.phase = Phase::Pairing;
        self.status = Status::WaitingForOpponent;
        info!("Connected, waiting for pairing");
        true
    }

    /// Pairing notification from the matchmaker.
    ///
    /// Malformed pairings (no opponent name) leave the session waiting.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn paired(&mut self, opponent: &str, assignment: TurnAssignment) -> bool {
        if !matches!(self.mode, Mode::Live { .. })
            || !matches!(self.phase, Phase::Connecting | Phase::Pairing)
        {
            warn!("Pairing ignored outside of live setup");
            return false;
        }
        let opponent = opponent.trim();
        if opponent.is_empty() {
            warn!("Pairing without opponent name ignored");
            return false;
        }

        self.mode = Mode::Live {
            opponent: Some(opponent.to_string()),
        };
        self.turn = assignment.opening_turn();
        self.phase = Phase::Active;
        self.status = Status::PlayingWith(opponent.to_string());
        info!(turn = ?self.turn, "Paired with opponent");
        true
    }

    /// Applies a move from any origin.
    ///
    /// Local moves need the player's turn, computer moves the opponent's.
    /// Remote moves are trusted for their own timing: only the empty-cell
    /// check applies, and the turn returns to the player afterwards.
    #[instrument(skip(self), fields(phase = %self.phase, turn = ?self.turn))]
    pub fn apply(&mut self, intent: MoveIntent) -> Applied {
        if let Err(rejection) = self.check(intent) {
            warn!(%rejection, "Move rejected");
            return Applied::Rejected(rejection);
        }

        let cell = intent.cell();
        let mover = intent.mover();
        if !self.board.place(cell, mover) {
            warn!(%cell, "Move rejected: cell occupied");
            return Applied::Rejected(Rejection::Occupied(cell));
        }
        self.history.push((mover, cell));
        debug!(?mover, %cell, "Move placed");

        if let Some(win) = find_winner(&self.board) {
            self.phase = Phase::Ended;
            self.outcome = Outcome::Win(win);
            self.status = match win.mark {
                Mark::Player => Status::YouWin,
                Mark::Opponent => Status::OpponentWins,
            };
            info!(winner = ?win.mark, line = %win.line, "Match won");
            return Applied::Won(win);
        }

        if is_full(&self.board) {
            self.phase = Phase::Ended;
            self.outcome = Outcome::Draw;
            self.status = Status::Draw;
            info!("Match drawn");
            return Applied::Drawn;
        }

        self.turn = match intent {
            MoveIntent::Remote(_) => Mark::Player,
            MoveIntent::Local(_) | MoveIntent::Ai(_) => mover.other(),
        };
        if matches!(self.mode, Mode::VsAi { .. }) {
            self.status = Status::Play;
        }
        Applied::Continued { turn: self.turn }
    }

    fn check(&self, intent: MoveIntent) -> Result<(), Rejection> {
        if self.phase != Phase::Active {
            return Err(Rejection::NotActive(self.phase));
        }
        match (intent, &self.mode) {
            (MoveIntent::Ai(_), Mode::Live { .. }) | (MoveIntent::Remote(_), Mode::VsAi { .. }) => {
                Err(Rejection::WrongOrigin(intent))
            }
            (MoveIntent::Remote(_), Mode::Live { .. }) => Ok(()),
            (MoveIntent::Local(_) | MoveIntent::Ai(_), _) if self.turn != intent.mover() => {
                Err(Rejection::NotYourTurn(intent.mover()))
            }
            _ => Ok(()),
        }
    }

    /// The live channel dropped. Ends an unfinished match; the board is kept.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn connection_lost(&mut self) -> bool {
        if !matches!(self.mode, Mode::Live { .. }) || self.phase == Phase::Ended {
            debug!("Connection loss ignored");
            return false;
        }
        self.phase = Phase::Ended;
        self.status = Status::ConnectionLost;
        warn!("Connection lost");
        true
    }

    /// Abandons the match. Board and outcome are kept for display.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn end(&mut self) {
        if self.phase != Phase::Ended {
            info!("Match ended by request");
            self.phase = Phase::Ended;
        }
    }

    /// Clears the board and returns to the mode's initial phase.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn restart(&mut self) {
        let fresh = match &self.mode {
            Mode::VsAi { difficulty } => Self::vs_ai(*difficulty),
            Mode::Live { .. } => Self::live(),
        };
        *self = fresh;
        info!("Match restarted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_vs_ai() -> MatchSession {
        let mut session = MatchSession::vs_ai(Difficulty::Hard);
        assert!(session.start());
        session
    }

    fn active_live(assignment: TurnAssignment) -> MatchSession {
        let mut session = MatchSession::live();
        assert!(session.connected());
        assert!(session.paired("Bob", assignment));
        session
    }

    #[test]
    fn test_moves_rejected_before_start() {
        let mut session = MatchSession::vs_ai(Difficulty::Easy);
        assert_eq!(
            session.apply(MoveIntent::Local(Cell::Center)),
            Applied::Rejected(Rejection::NotActive(Phase::AwaitingStart))
        );
        assert!(session.board().is_empty(Cell::Center));
    }

    #[test]
    fn test_local_move_hands_turn_to_computer() {
        let mut session = active_vs_ai();
        assert_eq!(
            session.apply(MoveIntent::Local(Cell::Center)),
            Applied::Continued {
                turn: Mark::Opponent
            }
        );
        assert!(session.awaits_computer());
        assert_eq!(session.status(), &Status::Play);
        assert_eq!(session.turn_label(), Some("Opponent turn"));
    }

    #[test]
    fn test_occupied_cell_is_a_no_op() {
        let mut session = active_vs_ai();
        session.apply(MoveIntent::Local(Cell::Center));
        session.apply(MoveIntent::Ai(Cell::TopLeft));
        let board = *session.board();
        let turn = session.turn();

        assert_eq!(
            session.apply(MoveIntent::Local(Cell::Center)),
            Applied::Rejected(Rejection::Occupied(Cell::Center))
        );
        assert_eq!(session.board(), &board);
        assert_eq!(session.turn(), turn);
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_out_of_turn_moves_rejected() {
        let mut session = active_vs_ai();
        assert_eq!(
            session.apply(MoveIntent::Ai(Cell::Center)),
            Applied::Rejected(Rejection::NotYourTurn(Mark::Opponent))
        );
        session.apply(MoveIntent::Local(Cell::Center));
        assert_eq!(
            session.apply(MoveIntent::Local(Cell::TopLeft)),
            Applied::Rejected(Rejection::NotYourTurn(Mark::Player))
        );
    }

    #[test]
    fn test_win_ends_match_with_line() {
        let mut session = active_vs_ai();
        for (player, computer) in [
            (Cell::TopLeft, Cell::MiddleLeft),
            (Cell::TopCenter, Cell::Center),
        ] {
            session.apply(MoveIntent::Local(player));
            session.apply(MoveIntent::Ai(computer));
        }
        let applied = session.apply(MoveIntent::Local(Cell::TopRight));
        assert!(matches!(applied, Applied::Won(win) if win.mark == Mark::Player));
        assert_eq!(session.phase(), Phase::Ended);
        assert_eq!(session.status(), &Status::YouWin);
        assert_eq!(
            session.winning_line().map(|line| line.cells()),
            Some([Cell::TopLeft, Cell::TopCenter, Cell::TopRight])
        );
        assert_eq!(session.turn_label(), None);
        assert!(!session.awaits_computer());
    }

    #[test]
    fn test_full_board_draws() {
        let mut session = active_vs_ai();
        // X O X / X O O / O X X
        let moves = [
            MoveIntent::Local(Cell::TopLeft),
            MoveIntent::Ai(Cell::TopCenter),
            MoveIntent::Local(Cell::TopRight),
            MoveIntent::Ai(Cell::Center),
            MoveIntent::Local(Cell::MiddleLeft),
            MoveIntent::Ai(Cell::MiddleRight),
            MoveIntent::Local(Cell::BottomCenter),
            MoveIntent::Ai(Cell::BottomLeft),
        ];
        for intent in moves {
            assert!(matches!(session.apply(intent), Applied::Continued { .. }));
        }
        assert_eq!(session.apply(MoveIntent::Local(Cell::BottomRight)), Applied::Drawn);
        assert_eq!(session.outcome(), Outcome::Draw);
        assert_eq!(session.status(), &Status::Draw);
    }

    #[test]
    fn test_pairing_assigns_turn() {
        let session = active_live(TurnAssignment::Second);
        assert!(session.is_active());
        assert_eq!(session.turn(), Mark::Opponent);
        assert_eq!(session.status().to_string(), "Playing with Bob");
    }

    #[test]
    fn test_malformed_pairing_keeps_waiting() {
        let mut session = MatchSession::live();
        session.connected();
        assert!(!session.paired("  ", TurnAssignment::First));
        assert_eq!(session.phase(), Phase::Pairing);
        assert_eq!(session.status(), &Status::WaitingForOpponent);
    }

    #[test]
    fn test_remote_move_trusted_and_returns_turn() {
        let mut session = active_live(TurnAssignment::First);
        // Player's turn locally, but the peer's move still lands.
        assert_eq!(
            session.apply(MoveIntent::Remote(Cell::Center)),
            Applied::Continued { turn: Mark::Player }
        );
        assert_eq!(session.board().get(Cell::Center), Some(Mark::Opponent));

        // Occupied cells still reject remote moves.
        assert_eq!(
            session.apply(MoveIntent::Remote(Cell::Center)),
            Applied::Rejected(Rejection::Occupied(Cell::Center))
        );
    }

    #[test]
    fn test_origins_limited_by_mode() {
        let mut live = active_live(TurnAssignment::Second);
        assert!(matches!(
            live.apply(MoveIntent::Ai(Cell::Center)),
            Applied::Rejected(Rejection::WrongOrigin(_))
        ));
        let mut vs_ai = active_vs_ai();
        assert!(matches!(
            vs_ai.apply(MoveIntent::Remote(Cell::Center)),
            Applied::Rejected(Rejection::WrongOrigin(_))
        ));
    }

    #[test]
    fn test_connection_loss_ends_without_touching_board() {
        let mut session = active_live(TurnAssignment::First);
        session.apply(MoveIntent::Local(Cell::Center));
        let board = *session.board();
        assert!(session.connection_lost());
        assert_eq!(session.phase(), Phase::Ended);
        assert_eq!(session.status(), &Status::ConnectionLost);
        assert_eq!(session.board(), &board);
        assert_eq!(session.outcome(), Outcome::Undecided);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut session = active_live(TurnAssignment::Second);
        session.apply(MoveIntent::Remote(Cell::Center));
        session.restart();
        assert_eq!(session.board(), &Board::new());
        assert_eq!(session.turn(), Mark::Player);
        assert_eq!(session.outcome(), Outcome::Undecided);
        assert_eq!(session.phase(), Phase::Connecting);
        assert_eq!(session.mode(), &Mode::Live { opponent: None });
        assert!(session.history().is_empty());

        let mut session = active_vs_ai();
        session.apply(MoveIntent::Local(Cell::Center));
        session.restart();
        assert_eq!(session.phase(), Phase::AwaitingStart);
        assert_eq!(session.difficulty(), Some(Difficulty::Hard));
    }
}
