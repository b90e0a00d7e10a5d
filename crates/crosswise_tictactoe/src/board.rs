//! Board model: nine cells, each empty or holding a mark.

use crate::Cell;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Whose mark occupies a cell.
///
/// `Player` is the local human (drawn as X). `Opponent` is the computer in
/// vs-AI matches or the remote peer in live matches (drawn as O).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    /// The local player.
    Player,
    /// The computer or remote peer.
    Opponent,
}

impl Mark {
    /// Returns the other mark.
    pub fn other(self) -> Self {
        match self {
            Mark::Player => Mark::Opponent,
            Mark::Opponent => Mark::Player,
        }
    }

    /// Symbol used when drawing the board.
    pub fn symbol(self) -> char {
        match self {
            Mark::Player => 'X',
            Mark::Opponent => 'O',
        }
    }
}

/// 3x3 tic-tac-toe board.
///
/// Placement only ever fills an empty cell; nothing unmarks a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    /// Cells in row-major order (c1-c9).
    cells: [Option<Mark>; 9],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a board from raw cell contents.
    ///
    /// Any distribution of marks is accepted, including ones unreachable in
    /// a legal game.
    pub fn from_cells(cells: [Option<Mark>; 9]) -> Self {
        Self { cells }
    }

    /// Returns the mark at `cell`, if any.
    pub fn get(&self, cell: Cell) -> Option<Mark> {
        self.cells[cell.index()]
    }

    /// Checks whether `cell` is empty.
    pub fn is_empty(&self, cell: Cell) -> bool {
        self.get(cell).is_none()
    }

    /// Places `mark` at `cell` if it is empty.
    ///
    /// Returns false and leaves the board untouched when the cell is taken.
    pub fn place(&mut self, cell: Cell, mark: Mark) -> bool {
        let slot = &mut self.cells[cell.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(mark);
        true
    }

    /// Returns a hypothetical copy with `mark` written at `cell`.
    pub fn with_mark(&self, cell: Cell, mark: Mark) -> Board {
        let mut copy = *self;
        copy.cells[cell.index()] = Some(mark);
        copy
    }

    /// Returns the board as seen from the other seat: every mark swapped.
    pub fn flipped(&self) -> Board {
        Board::from_cells(self.cells.map(|cell| cell.map(Mark::other)))
    }

    /// Raw cell contents in row-major order.
    pub fn cells(&self) -> &[Option<Mark>; 9] {
        &self.cells
    }

    /// Formats the board as text, showing free cells by their number.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let index = row * 3 + col;
                let symbol = match self.cells[index] {
                    Some(mark) => mark.symbol(),
                    None => char::from(b'1' + index as u8),
                };
                result.push(symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

/// Error parsing a board from its compact text form.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum BoardParseError {
    /// Wrong number of cell characters.
    #[display("expected 9 cells, found {}", _0)]
    WrongLength(#[error(not(source))] usize),
    /// A character that is not a mark or an empty marker.
    #[display("invalid cell character '{}'", _0)]
    InvalidCharacter(#[error(not(source))] char),
}

impl std::str::FromStr for Board {
    type Err = BoardParseError;

    /// Parses nine cell characters: `X` for the player, `O` for the opponent,
    /// `.` or `-` for empty. Whitespace and `|` separators are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols: Vec<char> = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '|')
            .collect();
        if symbols.len() != 9 {
            return Err(BoardParseError::WrongLength(symbols.len()));
        }

        let mut cells = [None; 9];
        for (slot, symbol) in cells.iter_mut().zip(symbols) {
            *slot = match symbol {
                'X' | 'x' => Some(Mark::Player),
                'O' | 'o' => Some(Mark::Opponent),
                '.' | '-' => None,
                other => return Err(BoardParseError::InvalidCharacter(other)),
            };
        }
        Ok(Self::from_cells(cells))
    }
}
