use crate::types::Side;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    Checkmate,
    /// The loser kept checking through a fourfold repetition.
    PerpetualCheck,
    /// Only reachable from imported positions that leave a king en prise.
    KingCaptured,
    /// The loser had no legal move while not in check, under
    /// [`StalemateRule::LossForStalemated`](crate::config::StalemateRule).
    Stalemate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    Repetition,
    Stalemate,
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum GameOutcome {
    Win { winner: Side, reason: WinReason },
    Draw { reason: DrawReason },
}

impl GameOutcome {
    pub fn winner(self) -> Option<Side> {
        match self {
            GameOutcome::Win { winner, .. } => Some(winner),
            GameOutcome::Draw { .. } => None,
        }
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOutcome::Win { winner, reason } => write!(f, "{winner} wins ({reason:?})"),
            GameOutcome::Draw { reason } => write!(f, "draw ({reason:?})"),
        }
    }
}
