//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](crate::Board). They accept any board,
//! legal or not, and never mutate their input. Turn legality is the match
//! session's business, not the rules'.

pub mod draw;
pub mod win;

pub use draw::{empty_cells, is_full};
pub use win::{Win, find_winner, winning_cell, would_win};
