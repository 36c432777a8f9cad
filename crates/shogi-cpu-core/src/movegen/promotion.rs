//! Promotion zone and forced-promotion rules.

use crate::types::{Piece, PieceKind, Side, Square};

/// The three ranks farthest from `side`'s starting edge.
#[inline]
pub fn in_promotion_zone(side: Side, sq: Square) -> bool {
    side.rows_to_last(sq.row()) <= 2
}

/// Whether an unpromoted `kind` standing on `sq` would have no move left:
/// pawns and lances on the last rank, knights on the last two.
#[inline]
pub fn is_dead_square(kind: PieceKind, side: Side, sq: Square) -> bool {
    let rows_left = side.rows_to_last(sq.row());
    match kind {
        PieceKind::Pawn | PieceKind::Lance => rows_left == 0,
        PieceKind::Knight => rows_left <= 1,
        _ => false,
    }
}

/// Promotion is offered when the piece can still promote and either end of
/// the move lies in the owner's zone.
#[inline]
pub fn can_promote(piece: Piece, from: Square, to: Square) -> bool {
    piece.is_promotable()
        && (in_promotion_zone(piece.owner, from) || in_promotion_zone(piece.owner, to))
}

/// Promotion is forced when staying unpromoted would strand the piece.
#[inline]
pub fn must_promote(piece: Piece, to: Square) -> bool {
    !piece.promoted && is_dead_square(piece.kind, piece.owner, to)
}
