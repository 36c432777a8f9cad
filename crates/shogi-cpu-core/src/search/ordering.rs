//! Move ordering heuristics.

use crate::board::Board;
use crate::eval::{kind_value, piece_value};
use crate::types::{Move, MoveList, Side};

const CAPTURE_BASE: i32 = 10_000;
const PROMOTION_BONUS: i32 = 500;

/// Heuristic priority of `mv` for `side`; higher is searched first.
///
/// Captures come first, ordered by victim value then by cheaper attacker.
/// Promotions, centralisation and forward progress break the rest.
pub fn score_move(board: &Board, mv: Move, side: Side) -> i32 {
    let to = mv.to();
    let center = 8 - i32::from(to.center_distance());
    match mv {
        Move::Board { from, promote, .. } => {
            let mut score = 0;
            if let Some(victim) = board.piece_at(to) {
                let attacker = board.piece_at(from).map_or(0, piece_value);
                score += CAPTURE_BASE + piece_value(victim) * 10 - attacker;
            }
            if promote {
                score += PROMOTION_BONUS;
            }
            score += center * 10;
            score += 5 * match side {
                Side::Cpu => i32::from(to.row()),
                Side::Player => 8 - i32::from(to.row()),
            };
            score
        }
        Move::Drop { kind, .. } => kind_value(kind) / 10 + center * 5,
    }
}

/// Sorts `moves` best-first. Equal scores keep generation order.
pub fn order_moves(board: &Board, moves: &mut MoveList, side: Side) {
    moves.sort_by_cached_key(|&mv| std::cmp::Reverse(score_move(board, mv, side)));
}
