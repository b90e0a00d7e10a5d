//! Hint advisor: strategic advice for the human player.
//!
//! Advice is phrased around positional labels, never raw cell ids, and is
//! withheld entirely in live matches or outside the player's turn.

use crate::random::{RandomSource, choose};
use crate::rules::{empty_cells, winning_cell};
use crate::{Board, Cell, GameType, Mark};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// A classified piece of advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "cell", rename_all = "kebab-case")]
pub enum Hint {
    /// Hints are not offered right now.
    Unavailable,
    /// Nothing left to play.
    NoMoves,
    /// The player can win immediately.
    Win(Cell),
    /// The opponent threatens to win here.
    Block(Cell),
    /// The center is free.
    Center,
    /// A free corner worth taking.
    Corner(Cell),
    /// A free edge worth taking.
    Edge(Cell),
    /// Nothing stands out.
    AnyCell,
}

impl std::fmt::Display for Hint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Hint::Unavailable => write!(
                f,
                "Hints are only available when it's your turn in single-player mode."
            ),
            Hint::NoMoves => write!(f, "No moves available!"),
            Hint::Win(cell) => write!(f, "You can win by playing {}!", cell.label()),
            Hint::Block(cell) => write!(
                f,
                "Block the computer from winning by playing {}!",
                cell.label()
            ),
            Hint::Center => write!(f, "The center square is a strong strategic position!"),
            Hint::Corner(cell) => write!(
                f,
                "Corner squares like {} are good strategic choices!",
                cell.label()
            ),
            Hint::Edge(cell) => write!(f, "Consider playing {} as a solid move.", cell.label()),
            Hint::AnyCell => write!(f, "Any of the remaining squares would work!"),
        }
    }
}

/// Produces advice for the player's next move.
///
/// Read-only: `board` is only ever examined through hypothetical copies.
#[instrument(skip(board, rng))]
pub fn get_hint<R: RandomSource + ?Sized>(
    board: &Board,
    is_player_turn: bool,
    is_active: bool,
    game_type: GameType,
    rng: &mut R,
) -> Hint {
    if !is_player_turn || !is_active || game_type == GameType::Live {
        return Hint::Unavailable;
    }

    let empty = empty_cells(board);
    if empty.is_empty() {
        return Hint::NoMoves;
    }

    let hint = if let Some(cell) = winning_cell(board, Mark::Player) {
        Hint::Win(cell)
    } else if let Some(cell) = winning_cell(board, Mark::Opponent) {
        Hint::Block(cell)
    } else if board.is_empty(Cell::Center) {
        Hint::Center
    } else {
        let corners: Vec<Cell> = empty.iter().copied().filter(|c| c.is_corner()).collect();
        let edges: Vec<Cell> = empty.iter().copied().filter(|c| c.is_edge()).collect();
        choose(rng, &corners)
            .map(Hint::Corner)
            .or_else(|| choose(rng, &edges).map(Hint::Edge))
            .unwrap_or(Hint::AnyCell)
    };

    debug!(?hint, "Hint computed");
    hint
}
