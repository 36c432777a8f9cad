//! Movement patterns as `(dcol, drow)` offsets from the human's point of
//! view. CPU pieces use the same tables with both components negated.

use crate::types::{Piece, PieceKind, Side};

/// Single-step offsets plus ray directions.
#[derive(Debug)]
pub struct Pattern {
    pub steps: &'static [(i8, i8)],
    pub slides: &'static [(i8, i8)],
}

const ORTHOGONAL: [(i8, i8); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
const DIAGONAL: [(i8, i8); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

static PAWN: Pattern = Pattern { steps: &[(0, -1)], slides: &[] };
static LANCE: Pattern = Pattern { steps: &[], slides: &[(0, -1)] };
static KNIGHT: Pattern = Pattern { steps: &[(-1, -2), (1, -2)], slides: &[] };
static SILVER: Pattern = Pattern {
    steps: &[(-1, -1), (0, -1), (1, -1), (-1, 1), (1, 1)],
    slides: &[],
};
static GOLD: Pattern = Pattern {
    steps: &[(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (0, 1)],
    slides: &[],
};
static KING: Pattern = Pattern {
    steps: &[(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)],
    slides: &[],
};
static BISHOP: Pattern = Pattern { steps: &[], slides: &DIAGONAL };
static ROOK: Pattern = Pattern { steps: &[], slides: &ORTHOGONAL };
static HORSE: Pattern = Pattern { steps: &ORTHOGONAL, slides: &DIAGONAL };
static DRAGON: Pattern = Pattern { steps: &DIAGONAL, slides: &ORTHOGONAL };

/// Pattern for a piece in its current (possibly promoted) form.
pub fn pattern(piece: Piece) -> &'static Pattern {
    match (piece.kind, piece.promoted) {
        (PieceKind::Pawn, false) => &PAWN,
        (PieceKind::Lance, false) => &LANCE,
        (PieceKind::Knight, false) => &KNIGHT,
        (PieceKind::Silver, false) => &SILVER,
        (PieceKind::Gold, _)
        | (PieceKind::Pawn | PieceKind::Lance | PieceKind::Knight | PieceKind::Silver, true) => {
            &GOLD
        }
        (PieceKind::Bishop, false) => &BISHOP,
        (PieceKind::Bishop, true) => &HORSE,
        (PieceKind::Rook, false) => &ROOK,
        (PieceKind::Rook, true) => &DRAGON,
        (PieceKind::King, _) => &KING,
    }
}

/// Orients an offset for the owning side.
#[inline]
pub const fn orient(side: Side, (dcol, drow): (i8, i8)) -> (i8, i8) {
    match side {
        Side::Player => (dcol, drow),
        Side::Cpu => (-dcol, -drow),
    }
}
