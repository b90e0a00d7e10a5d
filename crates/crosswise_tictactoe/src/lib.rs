//! Pure tic-tac-toe logic for Crosswise.
//!
//! # Architecture
//!
//! - **Board**: [`Cell`] identifiers, [`Mark`]s and the [`Board`] itself
//! - **Rules**: win/draw detection over the shared [`WINNING_LINES`]
//! - **AI**: per-[`Difficulty`] move selection ([`select_move`])
//! - **Hints**: read-only advice for the human player ([`get_hint`])
//!
//! Nothing here owns a match. The session layer holds the authoritative
//! board and hands these functions shared references.
//!
//! # Example
//!
//! ```
//! use crosswise_tictactoe::{Board, Cell, Difficulty, MediumOdds, Mark, ScriptedRandom, select_move};
//!
//! let mut board = Board::new();
//! board.place(Cell::TopLeft, Mark::Player);
//! board.place(Cell::TopCenter, Mark::Player);
//!
//! let mut rng = ScriptedRandom::new();
//! let reply = select_move(&board, Difficulty::Hard, MediumOdds::default(), &mut rng);
//! assert_eq!(reply, Some(Cell::TopRight));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod ai;
mod board;
mod cell;
mod difficulty;
mod hint;
mod lines;
mod random;
pub mod rules;

pub use ai::{MediumOdds, easy_move, hard_move, medium_move, select_move};
pub use board::{Board, BoardParseError, Mark};
pub use cell::Cell;
pub use difficulty::{Difficulty, GameType};
pub use hint::{Hint, get_hint};
pub use lines::{Triple, WINNING_LINES};
pub use random::{RandomSource, ScriptedRandom, SeededRandom, choose};
pub use rules::{Win, empty_cells, find_winner, is_full, winning_cell, would_win};
