//! Piece-square tables, written from the CPU's side: row 0 is the CPU's
//! home rank. Player pieces read the table rotated 180 degrees.

use crate::types::{Piece, PieceKind, Side, Square};

type Table = [[i32; 9]; 9];

const PAWN: Table = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [90, 95, 100, 105, 110, 105, 100, 95, 90],
    [70, 80, 90, 95, 100, 95, 90, 80, 70],
    [50, 60, 70, 75, 80, 75, 70, 60, 50],
    [30, 40, 50, 55, 60, 55, 50, 40, 30],
    [15, 20, 25, 30, 35, 30, 25, 20, 15],
    [5, 10, 10, 15, 20, 15, 10, 10, 5],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
];

const LANCE: Table = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [50, 50, 50, 50, 50, 50, 50, 50, 50],
    [40, 40, 40, 45, 50, 45, 40, 40, 40],
    [30, 30, 35, 40, 45, 40, 35, 30, 30],
    [20, 25, 30, 35, 40, 35, 30, 25, 20],
    [10, 15, 20, 25, 30, 25, 20, 15, 10],
    [5, 10, 10, 15, 20, 15, 10, 10, 5],
    [0, 5, 5, 10, 10, 10, 5, 5, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
];

const KNIGHT: Table = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [30, 40, 50, 55, 60, 55, 50, 40, 30],
    [25, 35, 45, 50, 55, 50, 45, 35, 25],
    [20, 30, 40, 45, 50, 45, 40, 30, 20],
    [15, 25, 35, 40, 45, 40, 35, 25, 15],
    [10, 15, 20, 25, 30, 25, 20, 15, 10],
    [5, 10, 10, 15, 20, 15, 10, 10, 5],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
];

const SILVER: Table = [
    [0, 5, 10, 15, 20, 15, 10, 5, 0],
    [20, 30, 40, 45, 50, 45, 40, 30, 20],
    [30, 40, 50, 55, 60, 55, 50, 40, 30],
    [35, 45, 55, 60, 65, 60, 55, 45, 35],
    [30, 40, 50, 55, 60, 55, 50, 40, 30],
    [25, 35, 45, 50, 55, 50, 45, 35, 25],
    [15, 25, 35, 40, 45, 40, 35, 25, 15],
    [10, 15, 20, 25, 30, 25, 20, 15, 10],
    [0, 5, 10, 15, 20, 15, 10, 5, 0],
];

const GOLD: Table = [
    [5, 10, 15, 20, 25, 20, 15, 10, 5],
    [25, 35, 45, 50, 55, 50, 45, 35, 25],
    [35, 45, 55, 60, 65, 60, 55, 45, 35],
    [40, 50, 60, 65, 70, 65, 60, 50, 40],
    [35, 45, 55, 60, 65, 60, 55, 45, 35],
    [25, 35, 45, 50, 55, 50, 45, 35, 25],
    [15, 25, 35, 40, 45, 40, 35, 25, 15],
    [10, 15, 20, 30, 35, 30, 20, 15, 10],
    [5, 10, 15, 25, 30, 25, 15, 10, 5],
];

const BISHOP: Table = [
    [10, 15, 20, 25, 30, 25, 20, 15, 10],
    [30, 40, 50, 55, 60, 55, 50, 40, 30],
    [40, 55, 65, 70, 75, 70, 65, 55, 40],
    [45, 60, 70, 80, 85, 80, 70, 60, 45],
    [40, 55, 65, 75, 80, 75, 65, 55, 40],
    [35, 50, 60, 65, 70, 65, 60, 50, 35],
    [25, 40, 50, 55, 60, 55, 50, 40, 25],
    [15, 25, 35, 40, 45, 40, 35, 25, 15],
    [10, 15, 20, 25, 30, 25, 20, 15, 10],
];

const ROOK: Table = [
    [20, 25, 30, 35, 40, 35, 30, 25, 20],
    [35, 45, 55, 60, 65, 60, 55, 45, 35],
    [40, 55, 65, 70, 75, 70, 65, 55, 40],
    [45, 60, 70, 80, 85, 80, 70, 60, 45],
    [45, 60, 70, 80, 85, 80, 70, 60, 45],
    [40, 55, 65, 70, 75, 70, 65, 55, 40],
    [30, 45, 55, 60, 65, 60, 55, 45, 30],
    [20, 30, 40, 45, 50, 45, 40, 30, 20],
    [15, 20, 25, 30, 35, 30, 25, 20, 15],
];

const KING: Table = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 5, 10, 10, 10, 10, 10, 5, 0],
    [5, 10, 15, 15, 15, 15, 15, 10, 5],
    [10, 15, 20, 25, 25, 25, 20, 15, 10],
    [15, 20, 25, 30, 30, 30, 25, 20, 15],
    [20, 25, 30, 35, 35, 35, 30, 25, 20],
    [30, 35, 40, 45, 45, 45, 40, 35, 30],
    [40, 50, 55, 60, 60, 60, 55, 50, 40],
    [50, 60, 65, 70, 70, 70, 65, 60, 50],
];

/// Horse and dragon score their base table plus this bonus.
const BIG_PROMOTED_BONUS: i32 = 20;

/// Positional bonus for `piece` on `sq`, from the owner's point of view.
pub fn positional_value(piece: Piece, sq: Square) -> i32 {
    let oriented = match piece.owner {
        Side::Cpu => sq,
        Side::Player => sq.rotate(),
    };
    let (r, c) = (oriented.row() as usize, oriented.col() as usize);
    if piece.moves_like_gold() {
        return GOLD[r][c];
    }
    match (piece.kind, piece.promoted) {
        (PieceKind::Pawn, _) => PAWN[r][c],
        (PieceKind::Lance, _) => LANCE[r][c],
        (PieceKind::Knight, _) => KNIGHT[r][c],
        (PieceKind::Silver, _) => SILVER[r][c],
        (PieceKind::Gold, _) => GOLD[r][c],
        (PieceKind::Bishop, false) => BISHOP[r][c],
        (PieceKind::Bishop, true) => BISHOP[r][c] + BIG_PROMOTED_BONUS,
        (PieceKind::Rook, false) => ROOK[r][c],
        (PieceKind::Rook, true) => ROOK[r][c] + BIG_PROMOTED_BONUS,
        (PieceKind::King, _) => KING[r][c],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_reads_rotated_table() {
        let cpu_pawn = Piece::new(PieceKind::Pawn, Side::Cpu);
        let player_pawn = Piece::new(PieceKind::Pawn, Side::Player);
        assert_eq!(positional_value(cpu_pawn, Square::new(7, 4)), 0);
        assert_eq!(positional_value(cpu_pawn, Square::new(1, 4)), 110);
        assert_eq!(positional_value(player_pawn, Square::new(7, 4)), 110);
    }

    #[test]
    fn test_promoted_tables() {
        let tokin = Piece::promoted(PieceKind::Pawn, Side::Cpu);
        assert_eq!(positional_value(tokin, Square::new(3, 4)), GOLD[3][4]);
        let horse = Piece::promoted(PieceKind::Bishop, Side::Cpu);
        assert_eq!(positional_value(horse, Square::new(3, 4)), BISHOP[3][4] + 20);
    }
}
