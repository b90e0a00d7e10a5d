//! The eight winning lines of the 3x3 board.

use crate::Cell;
use serde::{Deserialize, Serialize};

/// Three cells forming a row, column or diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple(pub [Cell; 3]);

impl Triple {
    /// The three cells of this line, in declaration order.
    pub fn cells(&self) -> [Cell; 3] {
        self.0
    }

    /// Checks whether `cell` lies on this line.
    pub fn contains(&self, cell: Cell) -> bool {
        self.0.contains(&cell)
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "{a}, {b}, {c}")
    }
}

/// Winning lines: rows, then columns, then diagonals.
///
/// Scans that report "the first" line rely on this order.
pub static WINNING_LINES: [Triple; 8] = [
    // Rows
    Triple([Cell::TopLeft, Cell::TopCenter, Cell::TopRight]),
    Triple([Cell::MiddleLeft, Cell::Center, Cell::MiddleRight]),
    Triple([Cell::BottomLeft, Cell::BottomCenter, Cell::BottomRight]),
    // Columns
    Triple([Cell::TopLeft, Cell::MiddleLeft, Cell::BottomLeft]),
    Triple([Cell::TopCenter, Cell::Center, Cell::BottomCenter]),
    Triple([Cell::TopRight, Cell::MiddleRight, Cell::BottomRight]),
    // Diagonals
    Triple([Cell::TopLeft, Cell::Center, Cell::BottomRight]),
    Triple([Cell::TopRight, Cell::Center, Cell::BottomLeft]),
];
