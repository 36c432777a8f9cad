//! Static evaluation.
//!
//! Scores are from the CPU's point of view: positive favours the CPU. The
//! function is zero-sum, so swapping owners and rotating the board negates
//! the score.

pub mod material;
pub mod pst;

use crate::board::Board;
use crate::rules::attack::king_in_check;
use crate::types::{Side, Square};
use serde::{Deserialize, Serialize};

pub use material::{hand_value, kind_value, piece_value};

/// Bonus for having the opponent's king in check.
pub const CHECK_BONUS: i32 = 300;
/// Bonus per friendly piece adjacent to a king.
pub const KING_GUARD_BONUS: i32 = 20;

#[inline]
fn signed(side: Side, value: i32) -> i32 {
    match side {
        Side::Cpu => value,
        Side::Player => -value,
    }
}

/// CPU-positive evaluation of `board`.
pub fn evaluate(board: &Board) -> i32 {
    let mut score = 0;

    for (sq, piece) in board.occupied() {
        let value = piece_value(piece) + pst::positional_value(piece, sq);
        score += signed(piece.owner, value);
    }

    for side in Side::ALL {
        for (kind, n) in board.hand(side).iter() {
            score += signed(side, hand_value(kind) * i32::from(n));
        }
    }

    if king_in_check(board, Side::Player) {
        score += CHECK_BONUS;
    }
    if king_in_check(board, Side::Cpu) {
        score -= CHECK_BONUS;
    }

    for side in Side::ALL {
        if let Some(king) = board.king_square(side) {
            score += signed(side, KING_GUARD_BONUS * guards(board, king, side));
        }
    }

    score
}

/// Evaluation from `side`'s point of view.
#[inline]
pub fn evaluate_for(board: &Board, side: Side) -> i32 {
    signed(side, evaluate(board))
}

fn guards(board: &Board, king: Square, side: Side) -> i32 {
    let mut count = 0;
    for dr in -1..=1 {
        for dc in -1..=1 {
            if (dr, dc) == (0, 0) {
                continue;
            }
            if let Some(sq) = king.offset(dc, dr)
                && board.piece_at(sq).is_some_and(|p| p.owner == side)
            {
                count += 1;
            }
        }
    }
    count
}

/// Which side the evaluation leans toward, from the human's seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Advantage {
    Player,
    Even,
    Cpu,
}

/// Evaluation bar data for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    /// Human-positive score.
    pub score: i32,
    /// Human winning chance estimate, 0..=100.
    pub percentage: u8,
    pub advantage: Advantage,
}

/// Scores above this margin count as an advantage.
const ADVANTAGE_MARGIN: i32 = 100;
/// Scale of the logistic squash behind `percentage`.
const PERCENT_SCALE: f64 = 2000.0;

impl EvaluationSummary {
    pub fn from_player_score(score: i32) -> Self {
        let squashed = ((f64::from(score) / PERCENT_SCALE).tanh() + 1.0) * 50.0;
        let percentage = squashed.round().clamp(0.0, 100.0) as u8;
        let advantage = if score > ADVANTAGE_MARGIN {
            Advantage::Player
        } else if score < -ADVANTAGE_MARGIN {
            Advantage::Cpu
        } else {
            Advantage::Even
        };
        EvaluationSummary { score, percentage, advantage }
    }

    pub fn of(board: &Board) -> Self {
        Self::from_player_score(evaluate_for(board, Side::Player))
    }
}
