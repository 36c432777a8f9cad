//! Reversible move application used by legality checks and search.

use super::Board;
use crate::types::{Move, Piece, PieceKind, Side};

/// Everything needed to take a move back exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoToken {
    pub mv: Move,
    pub side: Side,
    /// The piece as it stood on the origin square, before any promotion.
    pub moved: Option<Piece>,
    pub captured: Option<Piece>,
}

impl UndoToken {
    /// The piece that ended up on the destination square.
    pub fn placed(&self) -> Option<Piece> {
        match self.mv {
            Move::Board { promote, .. } => {
                self.moved.map(|p| if promote { p.promote() } else { p })
            }
            Move::Drop { kind, .. } => Some(Piece::new(kind, self.side)),
        }
    }
}

impl Board {
    /// Applies `mv` for `side` and returns the undo token.
    ///
    /// Returns `None` without touching the board when the move does not fit
    /// it: an empty or foreign origin, a destination holding own material,
    /// or a drop of a kind not in the pool or onto an occupied square.
    /// Captured pieces go to the mover's pool as their base kind; a captured
    /// king is removed from the board but never pooled.
    pub fn apply_virtual(&mut self, mv: Move, side: Side) -> Option<UndoToken> {
        match mv {
            Move::Board { from, to, promote } => {
                let piece = self.piece_at(from).filter(|p| p.owner == side)?;
                if self.piece_at(to).is_some_and(|p| p.owner == side) {
                    return None;
                }
                self.remove(from);
                let captured = self.remove(to);
                if let Some(victim) = captured {
                    self.add_to_hand(side, victim.kind);
                }
                let placed = if promote { piece.promote() } else { piece };
                self.put(to, placed);
                Some(UndoToken { mv, side, moved: Some(piece), captured })
            }
            Move::Drop { kind, to } => {
                if kind == PieceKind::King || !self.is_empty_at(to) {
                    return None;
                }
                if !self.take_from_hand(side, kind) {
                    return None;
                }
                self.put(to, Piece::new(kind, side));
                Some(UndoToken { mv, side, moved: None, captured: None })
            }
        }
    }

    /// Reverts a move applied by [`Board::apply_virtual`]. Tokens must be
    /// undone in LIFO order.
    pub fn undo_virtual(&mut self, token: UndoToken) {
        match token.mv {
            Move::Board { from, to, .. } => {
                self.remove(to);
                if let Some(piece) = token.moved {
                    self.put(from, piece);
                }
                if let Some(victim) = token.captured {
                    self.put(to, victim);
                    self.take_from_hand(token.side, victim.kind);
                }
            }
            Move::Drop { kind, to } => {
                self.remove(to);
                self.add_to_hand(token.side, kind);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Square;

    #[test]
    fn test_apply_undo_restores_board_and_key() {
        let mut board = Board::startpos();
        let before = board.clone();
        let mv = Move::normal(Square::new(6, 2), Square::new(5, 2), false);
        let token = board.apply_virtual(mv, Side::Player).unwrap();
        assert_ne!(board, before);
        board.undo_virtual(token);
        assert_eq!(board, before);
    }

    #[test]
    fn test_capture_goes_to_hand_as_base_kind() {
        let mut board = Board::empty();
        board.put(Square::new(4, 4), Piece::new(PieceKind::Rook, Side::Player));
        board.put(Square::new(2, 4), Piece::promoted(PieceKind::Silver, Side::Cpu));
        let before = board.clone();
        let mv = Move::normal(Square::new(4, 4), Square::new(2, 4), true);
        let token = board.apply_virtual(mv, Side::Player).unwrap();
        assert_eq!(board.hand(Side::Player).count(PieceKind::Silver), 1);
        assert_eq!(
            board.piece_at(Square::new(2, 4)),
            Some(Piece::promoted(PieceKind::Rook, Side::Player))
        );
        assert_eq!(token.placed(), Some(Piece::promoted(PieceKind::Rook, Side::Player)));
        board.undo_virtual(token);
        assert_eq!(board, before);
    }

    #[test]
    fn test_drop_apply_undo() {
        let mut board = Board::startpos();
        board.add_to_hand(Side::Cpu, PieceKind::Gold);
        let before = board.clone();
        let token = board
            .apply_virtual(Move::drop(PieceKind::Gold, Square::new(4, 4)), Side::Cpu)
            .unwrap();
        assert!(board.hand(Side::Cpu).is_empty());
        board.undo_virtual(token);
        assert_eq!(board, before);
    }

    #[test]
    fn test_apply_rejects_mismatched_moves() {
        let mut board = Board::startpos();
        let before = board.clone();
        // Empty origin.
        assert!(board.apply_virtual(Move::normal(Square::new(4, 4), Square::new(3, 4), false), Side::Player).is_none());
        // Foreign piece.
        assert!(board.apply_virtual(Move::normal(Square::new(2, 4), Square::new(3, 4), false), Side::Player).is_none());
        // Own-piece capture.
        assert!(board.apply_virtual(Move::normal(Square::new(8, 4), Square::new(7, 4), false), Side::Player).is_none());
        // Empty pool.
        assert!(board.apply_virtual(Move::drop(PieceKind::Pawn, Square::new(4, 4)), Side::Player).is_none());
        assert_eq!(board, before);
    }
}
