//! Checkmate and stalemate.

use super::attack::king_in_check;
use crate::board::Board;
use crate::movegen::{DropCheck, has_any_legal_move};
use crate::types::Side;

/// `side` is in check and has no legal move.
pub fn is_checkmate(board: &mut Board, side: Side) -> bool {
    king_in_check(board, side) && !has_any_legal_move(board, side, DropCheck::Full)
}

/// `side` is not in check but has no legal move.
pub fn is_stalemate(board: &mut Board, side: Side) -> bool {
    !king_in_check(board, side) && !has_any_legal_move(board, side, DropCheck::Full)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Piece, PieceKind, Square};

    #[test]
    fn test_corner_mate() {
        // CPU king cornered at (0,0), player gold on (1,0) defended by a
        // player silver on (2,1).
        let mut board = Board::empty();
        board.put(Square::new(0, 0), Piece::new(PieceKind::King, Side::Cpu));
        board.put(Square::new(1, 0), Piece::new(PieceKind::Gold, Side::Player));
        board.put(Square::new(2, 1), Piece::new(PieceKind::Silver, Side::Player));
        board.put(Square::new(8, 8), Piece::new(PieceKind::King, Side::Player));
        assert!(is_checkmate(&mut board, Side::Cpu));
        assert!(!is_stalemate(&mut board, Side::Cpu));
    }

    #[test]
    fn test_check_with_escape_is_not_mate() {
        let mut board = Board::empty();
        board.put(Square::new(0, 4), Piece::new(PieceKind::King, Side::Cpu));
        board.put(Square::new(1, 4), Piece::new(PieceKind::Gold, Side::Player));
        board.put(Square::new(8, 8), Piece::new(PieceKind::King, Side::Player));
        // The king simply captures the undefended gold.
        assert!(!is_checkmate(&mut board, Side::Cpu));
    }

    #[test]
    fn test_stalemate_lone_king() {
        // CPU king on (0,0) not in check; every escape square is covered.
        let mut board = Board::empty();
        board.put(Square::new(0, 0), Piece::new(PieceKind::King, Side::Cpu));
        board.put(Square::new(2, 1), Piece::promoted(PieceKind::Rook, Side::Player));
        board.put(Square::new(8, 8), Piece::new(PieceKind::King, Side::Player));
        assert!(is_stalemate(&mut board, Side::Cpu));
        assert!(!is_checkmate(&mut board, Side::Cpu));
    }
}
