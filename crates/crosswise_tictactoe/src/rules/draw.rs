//! Board fill tracking and draw detection.

use crate::{Board, Cell};
use tracing::instrument;

/// Empty cells in stable row-major order.
///
/// Every heuristic enumerates candidates through this, so "first match"
/// tie-breaks are reproducible.
#[instrument(skip(board))]
pub fn empty_cells(board: &Board) -> Vec<Cell> {
    Cell::ALL
        .iter()
        .copied()
        .filter(|cell| board.is_empty(*cell))
        .collect()
}

/// Checks if the board is full (all cells marked).
///
/// A full board with no winner is a draw.
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.cells().iter().all(Option::is_some)
}
