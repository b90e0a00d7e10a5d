//! Match configuration values fixed before play begins.

use serde::{Deserialize, Serialize};

/// Computer opponent strength.
///
/// Chosen before a vs-AI match and never changed while it runs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Uniformly random moves.
    Easy,
    /// Mix of tactical and random moves.
    #[default]
    Medium,
    /// Fixed priority heuristic.
    Hard,
}

/// Kind of match, as seen by the hint advisor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GameType {
    /// Single player against the computer.
    VsAi,
    /// Two humans over a live connection.
    Live,
}
