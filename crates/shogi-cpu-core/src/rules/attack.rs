//! Raw attack detection.
//!
//! Attacks ignore whether the attacker is pinned: a pinned piece still gives
//! check. Nothing here consults legal-move generation, so check detection
//! never recurses into drop-mate analysis.

use crate::board::Board;
use crate::movegen::patterns::{orient, pattern};
use crate::types::{Piece, Side, Square};

/// Whether `piece` standing on `from` attacks `target` on `board`.
pub fn piece_attacks(board: &Board, from: Square, piece: Piece, target: Square) -> bool {
    if from == target {
        return false;
    }
    let dcol = target.col() as i8 - from.col() as i8;
    let drow = target.row() as i8 - from.row() as i8;
    let pat = pattern(piece);

    if pat.steps.iter().any(|&off| orient(piece.owner, off) == (dcol, drow)) {
        return true;
    }

    for &dir in pat.slides {
        let (sc, sr) = orient(piece.owner, dir);
        let distance = if sc != 0 { dcol / sc } else { drow / sr };
        if distance < 1 || dcol != sc * distance || drow != sr * distance {
            continue;
        }
        let clear = (1..distance).all(|k| {
            from.offset(sc * k, sr * k).is_some_and(|sq| board.is_empty_at(sq))
        });
        if clear {
            return true;
        }
    }
    false
}

/// Whether any piece of `by` attacks `target`.
pub fn is_attacked(board: &Board, target: Square, by: Side) -> bool {
    board.pieces(by).any(|(from, piece)| piece_attacks(board, from, piece, target))
}

/// Whether `side`'s king is attacked. A side without a king is never in check.
pub fn king_in_check(board: &Board, side: Side) -> bool {
    board
        .king_square(side)
        .is_some_and(|king| is_attacked(board, king, side.opponent()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    #[test]
    fn test_startpos_no_check() {
        let board = Board::startpos();
        assert!(!king_in_check(&board, Side::Player));
        assert!(!king_in_check(&board, Side::Cpu));
    }

    #[test]
    fn test_rook_blocked_by_piece() {
        let mut board = Board::empty();
        board.put(Square::new(0, 4), Piece::new(PieceKind::King, Side::Cpu));
        board.put(Square::new(8, 4), Piece::new(PieceKind::Rook, Side::Player));
        assert!(king_in_check(&board, Side::Cpu));
        board.put(Square::new(4, 4), Piece::new(PieceKind::Pawn, Side::Cpu));
        assert!(!king_in_check(&board, Side::Cpu));
    }

    #[test]
    fn test_knight_direction_depends_on_owner() {
        let mut board = Board::empty();
        let knight_sq = Square::new(4, 4);
        board.put(knight_sq, Piece::new(PieceKind::Knight, Side::Cpu));
        let cpu_knight = Piece::new(PieceKind::Knight, Side::Cpu);
        assert!(piece_attacks(&board, knight_sq, cpu_knight, Square::new(6, 3)));
        assert!(piece_attacks(&board, knight_sq, cpu_knight, Square::new(6, 5)));
        assert!(!piece_attacks(&board, knight_sq, cpu_knight, Square::new(2, 3)));
        let player_knight = Piece::new(PieceKind::Knight, Side::Player);
        assert!(piece_attacks(&board, knight_sq, player_knight, Square::new(2, 3)));
    }

    #[test]
    fn test_lance_only_forward() {
        let mut board = Board::empty();
        let lance = Piece::new(PieceKind::Lance, Side::Player);
        board.put(Square::new(8, 0), lance);
        assert!(piece_attacks(&board, Square::new(8, 0), lance, Square::new(0, 0)));
        let cpu_lance = Piece::new(PieceKind::Lance, Side::Cpu);
        assert!(!piece_attacks(&board, Square::new(8, 0), cpu_lance, Square::new(0, 0)));
    }

    #[test]
    fn test_dragon_diagonal_step() {
        let board = Board::empty();
        let dragon = Piece::promoted(PieceKind::Rook, Side::Player);
        let from = Square::new(4, 4);
        assert!(piece_attacks(&board, from, dragon, Square::new(3, 3)));
        assert!(!piece_attacks(&board, from, dragon, Square::new(2, 2)));
        assert!(piece_attacks(&board, from, dragon, Square::new(4, 0)));
    }
}
