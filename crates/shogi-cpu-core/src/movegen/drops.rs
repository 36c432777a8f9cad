//! Drop legality.

use super::generate::has_any_legal_move;
use super::promotion::is_dead_square;
use crate::board::Board;
use crate::rules::attack::king_in_check;
use crate::types::{Move, PieceKind, Side, Square};

/// How much of the drop-legality sequence to run.
///
/// Drop-mate analysis asks whether the opponent has any legal reply, and
/// that reply may itself be a pawn drop. The inner query uses
/// [`DropCheck::SkipDropMate`] so the analysis stops after one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropCheck {
    Full,
    SkipDropMate,
}

/// Whether `side` may drop `kind` on `to`.
///
/// Checks run in order: occupied target, two unpromoted pawns on a file,
/// a piece with no further move, pawn-drop mate (only for a pawn dropped
/// directly in front of the enemy king), and finally self-check. The board
/// is restored before returning.
pub fn can_drop(board: &mut Board, kind: PieceKind, to: Square, side: Side, check: DropCheck) -> bool {
    if !board.hand(side).contains(kind) || !board.is_empty_at(to) {
        return false;
    }
    if kind == PieceKind::Pawn && board.has_pawn_on_col(side, to.col()) {
        return false;
    }
    if is_dead_square(kind, side, to) {
        return false;
    }

    let mv = Move::drop(kind, to);
    let Some(token) = board.apply_virtual(mv, side) else {
        return false;
    };

    let legal = if check == DropCheck::Full
        && kind == PieceKind::Pawn
        && faces_enemy_king(board, to, side)
        && is_drop_pawn_mate(board, side)
    {
        false
    } else {
        !king_in_check(board, side)
    };

    board.undo_virtual(token);
    legal
}

fn faces_enemy_king(board: &Board, to: Square, side: Side) -> bool {
    to.offset(0, side.forward())
        .is_some_and(|front| board.king_square(side.opponent()) == Some(front))
}

/// With the pawn already on the board: the enemy is in check and has no reply.
fn is_drop_pawn_mate(board: &mut Board, side: Side) -> bool {
    let enemy = side.opponent();
    king_in_check(board, enemy) && !has_any_legal_move(board, enemy, DropCheck::SkipDropMate)
}

/// Every square `side` may legally drop `kind` on.
pub fn legal_drops(board: &mut Board, kind: PieceKind, side: Side) -> Vec<Square> {
    Square::all()
        .filter(|&to| can_drop(board, kind, to, side, DropCheck::Full))
        .collect()
}
