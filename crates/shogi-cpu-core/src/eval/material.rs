//! Material values.

use crate::types::{Piece, PieceKind};

pub const KING_VALUE: i32 = 100_000;

/// Base value of an unpromoted kind, used for pools and capture ordering.
pub const fn kind_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Lance => 300,
        PieceKind::Knight => 400,
        PieceKind::Silver => 500,
        PieceKind::Gold => 600,
        PieceKind::Bishop => 800,
        PieceKind::Rook => 1000,
        PieceKind::King => KING_VALUE,
    }
}

/// Value of a piece in its current form.
pub const fn piece_value(piece: Piece) -> i32 {
    if !piece.promoted {
        return kind_value(piece.kind);
    }
    match piece.kind {
        PieceKind::Pawn | PieceKind::Lance | PieceKind::Knight | PieceKind::Silver => 700,
        PieceKind::Bishop => 1000,
        PieceKind::Rook => 1200,
        PieceKind::Gold | PieceKind::King => kind_value(piece.kind),
    }
}

/// Pooled pieces are worth 15% more than on the board.
pub const fn hand_value(kind: PieceKind) -> i32 {
    kind_value(kind) * 115 / 100
}
