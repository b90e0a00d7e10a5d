//! Win detection logic for tic-tac-toe.

use super::draw::empty_cells;
use crate::{Board, Cell, Mark, Triple, WINNING_LINES};
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A completed line and the mark that completed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Win {
    /// The winning mark.
    pub mark: Mark,
    /// The completed line.
    pub line: Triple,
}

/// Returns the first completed line in row, column, diagonal order.
#[instrument(skip(board))]
pub fn find_winner(board: &Board) -> Option<Win> {
    WINNING_LINES.iter().find_map(|line| {
        let [a, b, c] = line.cells();
        match board.get(a) {
            Some(mark) if board.get(b) == Some(mark) && board.get(c) == Some(mark) => {
                Some(Win::new(mark, *line))
            }
            _ => None,
        }
    })
}

/// Checks whether `mark` would complete a line by playing `cell`.
///
/// Evaluated on a copy; `board` is not touched.
#[instrument(skip(board))]
pub fn would_win(board: &Board, cell: Cell, mark: Mark) -> bool {
    let hypothetical = board.with_mark(cell, mark);
    WINNING_LINES
        .iter()
        .any(|line| line.cells().iter().all(|c| hypothetical.get(*c) == Some(mark)))
}

/// First empty cell, in stable order, where `mark` would win immediately.
#[instrument(skip(board))]
pub fn winning_cell(board: &Board, mark: Mark) -> Option<Cell> {
    empty_cells(board)
        .into_iter()
        .find(|cell| would_win(board, *cell, mark))
}
