//! Computer move selection for each difficulty tier.
//!
//! The computer always plays [`Mark::Opponent`]. Every strategy enumerates
//! candidates through [`empty_cells`], so with a pinned [`RandomSource`] the
//! chosen cell is fully reproducible.

use crate::random::{RandomSource, choose};
use crate::rules::{empty_cells, winning_cell};
use crate::{Board, Cell, Difficulty, Mark};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Probabilities steering the medium strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MediumOdds {
    /// Chance of reasoning about the board at all.
    #[serde(default = "default_smart")]
    pub smart: f64,
    /// Chance of blocking when the player threatens a win.
    #[serde(default = "default_block")]
    pub block: f64,
    /// Chance of taking a free center.
    #[serde(default = "default_center")]
    pub center: f64,
}

fn default_smart() -> f64 {
    0.6
}

fn default_block() -> f64 {
    0.7
}

fn default_center() -> f64 {
    0.5
}

impl Default for MediumOdds {
    fn default() -> Self {
        Self {
            smart: default_smart(),
            block: default_block(),
            center: default_center(),
        }
    }
}

/// Chooses the computer's next cell.
///
/// Returns `None` only for a full board; callers check for empty cells
/// before asking.
#[instrument(skip(board, rng))]
pub fn select_move<R: RandomSource + ?Sized>(
    board: &Board,
    difficulty: Difficulty,
    odds: MediumOdds,
    rng: &mut R,
) -> Option<Cell> {
    let choice = match difficulty {
        Difficulty::Easy => easy_move(board, rng),
        Difficulty::Medium => medium_move(board, odds, rng),
        Difficulty::Hard => hard_move(board, rng),
    };
    debug!(?difficulty, ?choice, "Computer chose cell");
    choice
}

/// Uniformly random empty cell.
pub fn easy_move<R: RandomSource + ?Sized>(board: &Board, rng: &mut R) -> Option<Cell> {
    choose(rng, &empty_cells(board))
}

/// Sometimes tactical, sometimes random.
///
/// Each probability is drawn at most once per call, and only when the
/// branch it guards is reachable.
pub fn medium_move<R: RandomSource + ?Sized>(
    board: &Board,
    odds: MediumOdds,
    rng: &mut R,
) -> Option<Cell> {
    let empty = empty_cells(board);
    if empty.is_empty() {
        return None;
    }

    if !rng.chance(odds.smart) {
        debug!("Medium strategy playing at random");
        return choose(rng, &empty);
    }

    if let Some(cell) = winning_cell(board, Mark::Opponent) {
        return Some(cell);
    }

    if let Some(cell) = winning_cell(board, Mark::Player) {
        if rng.chance(odds.block) {
            return Some(cell);
        }
    }

    if board.is_empty(Cell::Center) && rng.chance(odds.center) {
        return Some(Cell::Center);
    }

    choose(rng, &empty)
}

/// Fixed priority: win, block, center, corner, edge, anything.
///
/// Win and block take the first qualifying cell in stable order; only the
/// corner, edge and fallback tiers consult `rng`.
pub fn hard_move<R: RandomSource + ?Sized>(board: &Board, rng: &mut R) -> Option<Cell> {
    let empty = empty_cells(board);
    if empty.is_empty() {
        return None;
    }

    if let Some(cell) = winning_cell(board, Mark::Opponent) {
        return Some(cell);
    }

    if let Some(cell) = winning_cell(board, Mark::Player) {
        return Some(cell);
    }

    if board.is_empty(Cell::Center) {
        return Some(Cell::Center);
    }

    let corners: Vec<Cell> = Cell::CORNERS
        .into_iter()
        .filter(|c| board.is_empty(*c))
        .collect();
    if let Some(cell) = choose(rng, &corners) {
        return Some(cell);
    }

    let edges: Vec<Cell> = Cell::EDGES
        .into_iter()
        .filter(|c| board.is_empty(*c))
        .collect();
    if let Some(cell) = choose(rng, &edges) {
        return Some(cell);
    }

    choose(rng, &empty)
}
