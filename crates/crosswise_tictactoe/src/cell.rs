//! Cell identifiers for the 3x3 board.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One of the nine board cells.
///
/// Cells are numbered 1-9 in row-major order (`c1` is top-left, `c9` is
/// bottom-right). The enum order is the stable enumeration order every
/// heuristic scans in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
pub enum Cell {
    /// Top-left (c1)
    TopLeft,
    /// Top-center (c2)
    TopCenter,
    /// Top-right (c3)
    TopRight,
    /// Middle-left (c4)
    MiddleLeft,
    /// Center (c5)
    Center,
    /// Middle-right (c6)
    MiddleRight,
    /// Bottom-left (c7)
    BottomLeft,
    /// Bottom-center (c8)
    BottomCenter,
    /// Bottom-right (c9)
    BottomRight,
}

impl Cell {
    /// All 9 cells in row-major order.
    pub const ALL: [Cell; 9] = [
        Cell::TopLeft,
        Cell::TopCenter,
        Cell::TopRight,
        Cell::MiddleLeft,
        Cell::Center,
        Cell::MiddleRight,
        Cell::BottomLeft,
        Cell::BottomCenter,
        Cell::BottomRight,
    ];

    /// The four corners, in row-major order.
    pub const CORNERS: [Cell; 4] = [
        Cell::TopLeft,
        Cell::TopRight,
        Cell::BottomLeft,
        Cell::BottomRight,
    ];

    /// The four edges, in row-major order.
    pub const EDGES: [Cell; 4] = [
        Cell::TopCenter,
        Cell::MiddleLeft,
        Cell::MiddleRight,
        Cell::BottomCenter,
    ];

    /// Human-readable positional label.
    pub fn label(self) -> &'static str {
        match self {
            Cell::TopLeft => "top-left",
            Cell::TopCenter => "top-center",
            Cell::TopRight => "top-right",
            Cell::MiddleLeft => "middle-left",
            Cell::Center => "center",
            Cell::MiddleRight => "middle-right",
            Cell::BottomLeft => "bottom-left",
            Cell::BottomCenter => "bottom-center",
            Cell::BottomRight => "bottom-right",
        }
    }

    /// Zero-based board index (0-8).
    pub fn index(self) -> usize {
        self as usize
    }

    /// One-based cell number (1-9).
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Stable identifier (`c1`..`c9`).
    pub fn id(self) -> String {
        format!("c{}", self.number())
    }

    /// Creates a cell from a zero-based index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Creates a cell from a one-based number.
    pub fn from_number(number: u8) -> Option<Self> {
        number
            .checked_sub(1)
            .and_then(|index| Self::from_index(index as usize))
    }

    /// Returns true for the four corner cells.
    pub fn is_corner(self) -> bool {
        Self::CORNERS.contains(&self)
    }

    /// Returns true for the four edge cells.
    pub fn is_edge(self) -> bool {
        Self::EDGES.contains(&self)
    }

    /// Parses a cell from a number (1-9), an id (`c5`) or a label.
    ///
    /// Labels match case-insensitively and accept spaces in place of the dash.
    #[instrument]
    pub fn parse(s: &str) -> Option<Cell> {
        let s = s.trim().to_lowercase();

        let digits = s.strip_prefix('c').unwrap_or(&s);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return digits.parse::<u8>().ok().and_then(Self::from_number);
        }

        let normalized = s.replace(' ', "-");
        <Cell as strum::IntoEnumIterator>::iter().find(|cell| cell.label() == normalized)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
