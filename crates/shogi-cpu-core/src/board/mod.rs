//! Board model: 81 squares plus one captured pool per side.

mod apply;
mod hand;
mod state;
pub mod zobrist;

pub use apply::UndoToken;
pub use hand::Hand;

use crate::types::{Piece, PieceKind, Side, Square};
use serde::{Deserialize, Serialize};
use state::BoardState;
use zobrist::{zobrist_hand, zobrist_psq, zobrist_side};

/// Back-rank order from col 0 to col 8, identical for both sides.
const BACK_RANK: [PieceKind; 9] = [
    PieceKind::Lance,
    PieceKind::Knight,
    PieceKind::Silver,
    PieceKind::Gold,
    PieceKind::King,
    PieceKind::Gold,
    PieceKind::Silver,
    PieceKind::Knight,
    PieceKind::Lance,
];

/// Piece placement and captured pools. The side to move lives with the
/// caller; [`Board::position_key`] folds it into the hash.
///
/// Zobrist keys and king squares are maintained incrementally by every
/// mutation, so clones stay cheap and lookups are O(1).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardState", into = "BoardState")]
pub struct Board {
    squares: [Option<Piece>; Square::NUM],
    hands: [Hand; Side::NUM],
    kings: [Option<Square>; Side::NUM],
    board_key: u64,
    hand_key: u64,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub const fn empty() -> Self {
        Board {
            squares: [None; Square::NUM],
            hands: [Hand::new(); Side::NUM],
            kings: [None; Side::NUM],
            board_key: 0,
            hand_key: 0,
        }
    }

    /// Standard opening layout with empty pools.
    pub fn startpos() -> Self {
        let mut board = Board::empty();
        for (col, kind) in BACK_RANK.into_iter().enumerate() {
            let col = col as u8;
            board.put(Square::new(0, col), Piece::new(kind, Side::Cpu));
            board.put(Square::new(8, col), Piece::new(kind, Side::Player));
            board.put(Square::new(2, col), Piece::new(PieceKind::Pawn, Side::Cpu));
            board.put(Square::new(6, col), Piece::new(PieceKind::Pawn, Side::Player));
        }
        board.put(Square::new(1, 1), Piece::new(PieceKind::Rook, Side::Cpu));
        board.put(Square::new(1, 7), Piece::new(PieceKind::Bishop, Side::Cpu));
        board.put(Square::new(7, 1), Piece::new(PieceKind::Bishop, Side::Player));
        board.put(Square::new(7, 7), Piece::new(PieceKind::Rook, Side::Player));
        board
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    #[inline]
    pub fn is_empty_at(&self, sq: Square) -> bool {
        self.squares[sq.index()].is_none()
    }

    #[inline]
    pub fn hand(&self, side: Side) -> &Hand {
        &self.hands[side.index()]
    }

    #[inline]
    pub fn king_square(&self, side: Side) -> Option<Square> {
        self.kings[side.index()]
    }

    /// Squares holding a piece of `side`, in board order.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| match self.squares[sq.index()] {
            Some(p) if p.owner == side => Some((sq, p)),
            _ => None,
        })
    }

    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.squares[sq.index()].map(|p| (sq, p)))
    }

    /// Places `piece` on an empty square.
    pub fn put(&mut self, sq: Square, piece: Piece) {
        debug_assert!(self.squares[sq.index()].is_none(), "put on occupied {sq}");
        self.squares[sq.index()] = Some(piece);
        self.board_key ^= zobrist_psq(piece, sq);
        if piece.kind == PieceKind::King {
            self.kings[piece.owner.index()] = Some(sq);
        }
    }

    /// Clears a square and returns what stood there.
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.squares[sq.index()].take()?;
        self.board_key ^= zobrist_psq(piece, sq);
        if piece.kind == PieceKind::King && self.kings[piece.owner.index()] == Some(sq) {
            self.kings[piece.owner.index()] = None;
        }
        Some(piece)
    }

    /// Adds one piece of `kind` to `side`'s pool. Kings are ignored.
    pub fn add_to_hand(&mut self, side: Side, kind: PieceKind) {
        if self.hands[side.index()].add(kind) {
            self.hand_key = self.hand_key.wrapping_add(zobrist_hand(side, kind));
        }
    }

    /// Takes one piece of `kind` from `side`'s pool, `false` if none is held.
    pub fn take_from_hand(&mut self, side: Side, kind: PieceKind) -> bool {
        let taken = self.hands[side.index()].remove(kind);
        if taken {
            self.hand_key = self.hand_key.wrapping_sub(zobrist_hand(side, kind));
        }
        taken
    }

    /// Position identity for repetition and transposition lookup.
    #[inline]
    pub fn position_key(&self, side_to_move: Side) -> u64 {
        let key = self.board_key ^ self.hand_key;
        match side_to_move {
            Side::Player => key,
            Side::Cpu => key ^ zobrist_side(),
        }
    }

    /// Recomputes the key from scratch; must equal [`Board::position_key`].
    pub fn compute_key(&self, side_to_move: Side) -> u64 {
        let mut board_key = 0u64;
        for (sq, piece) in self.occupied() {
            board_key ^= zobrist_psq(piece, sq);
        }
        let mut hand_key = 0u64;
        for side in Side::ALL {
            for (kind, n) in self.hand(side).iter() {
                hand_key = hand_key.wrapping_add(zobrist_hand(side, kind).wrapping_mul(u64::from(n)));
            }
        }
        let key = board_key ^ hand_key;
        match side_to_move {
            Side::Player => key,
            Side::Cpu => key ^ zobrist_side(),
        }
    }

    /// Whether `side` has an unpromoted pawn on column `col`.
    pub fn has_pawn_on_col(&self, side: Side, col: u8) -> bool {
        (0..9).any(|row| {
            matches!(
                self.squares[Square::new(row, col).index()],
                Some(Piece { kind: PieceKind::Pawn, owner, promoted: false }) if owner == side
            )
        })
    }

    /// Board with owners swapped and squares rotated 180 degrees.
    pub fn flipped(&self) -> Board {
        let mut out = Board::empty();
        for (sq, piece) in self.occupied() {
            out.put(sq.rotate(), Piece { owner: piece.owner.opponent(), ..piece });
        }
        for side in Side::ALL {
            for (kind, n) in self.hand(side).iter() {
                for _ in 0..n {
                    out.add_to_hand(side.opponent(), kind);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startpos_layout() {
        let board = Board::startpos();
        assert_eq!(board.occupied().count(), 40);
        assert_eq!(board.king_square(Side::Cpu), Some(Square::new(0, 4)));
        assert_eq!(board.king_square(Side::Player), Some(Square::new(8, 4)));
        assert_eq!(
            board.piece_at(Square::new(1, 1)),
            Some(Piece::new(PieceKind::Rook, Side::Cpu))
        );
        assert_eq!(
            board.piece_at(Square::new(7, 7)),
            Some(Piece::new(PieceKind::Rook, Side::Player))
        );
        assert_eq!(
            board.piece_at(Square::new(7, 1)),
            Some(Piece::new(PieceKind::Bishop, Side::Player))
        );
        assert!(board.hand(Side::Player).is_empty());
    }

    #[test]
    fn test_incremental_key_matches_full() {
        let mut board = Board::startpos();
        assert_eq!(board.position_key(Side::Player), board.compute_key(Side::Player));
        let pawn = board.remove(Square::new(6, 2)).unwrap();
        board.put(Square::new(5, 2), pawn);
        board.add_to_hand(Side::Cpu, PieceKind::Silver);
        assert_eq!(board.position_key(Side::Cpu), board.compute_key(Side::Cpu));
    }

    #[test]
    fn test_key_depends_on_side_to_move() {
        let board = Board::startpos();
        assert_ne!(board.position_key(Side::Player), board.position_key(Side::Cpu));
    }

    #[test]
    fn test_key_depends_on_hand_counts() {
        let mut a = Board::startpos();
        let mut b = Board::startpos();
        a.add_to_hand(Side::Player, PieceKind::Pawn);
        b.add_to_hand(Side::Player, PieceKind::Pawn);
        assert_eq!(a.position_key(Side::Player), b.position_key(Side::Player));
        b.add_to_hand(Side::Player, PieceKind::Pawn);
        assert_ne!(a.position_key(Side::Player), b.position_key(Side::Player));
        a.add_to_hand(Side::Cpu, PieceKind::Pawn);
        assert_ne!(a.position_key(Side::Player), b.position_key(Side::Player));
    }

    #[test]
    fn test_key_depends_on_promotion_and_owner() {
        let sq = Square::new(4, 4);
        let mut a = Board::empty();
        let mut b = Board::empty();
        let mut c = Board::empty();
        a.put(sq, Piece::new(PieceKind::Silver, Side::Player));
        b.put(sq, Piece::promoted(PieceKind::Silver, Side::Player));
        c.put(sq, Piece::new(PieceKind::Silver, Side::Cpu));
        let keys = [
            a.position_key(Side::Player),
            b.position_key(Side::Player),
            c.position_key(Side::Player),
        ];
        assert_ne!(keys[0], keys[1]);
        assert_ne!(keys[0], keys[2]);
        assert_ne!(keys[1], keys[2]);
    }

    #[test]
    fn test_startpos_is_symmetric() {
        let board = Board::startpos();
        assert_eq!(board.flipped(), board);
    }

    #[test]
    fn test_serde_rebuilds_keys() {
        let mut board = Board::startpos();
        board.remove(Square::new(6, 6));
        board.add_to_hand(Side::Cpu, PieceKind::Pawn);
        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
        assert_eq!(back.position_key(Side::Cpu), board.position_key(Side::Cpu));
    }

    #[test]
    fn test_serde_rejects_short_rows() {
        let json = r#"{"rows":[[null]],"player_hand":{"counts":[0,0,0,0,0,0,0]},"cpu_hand":{"counts":[0,0,0,0,0,0,0]}}"#;
        assert!(serde_json::from_str::<Board>(json).is_err());
    }

    #[test]
    fn test_nifu_column_scan() {
        let board = Board::startpos();
        assert!(board.has_pawn_on_col(Side::Player, 0));
        let mut board = board;
        board.remove(Square::new(6, 3));
        assert!(!board.has_pawn_on_col(Side::Player, 3));
        board.put(Square::new(5, 3), Piece::promoted(PieceKind::Pawn, Side::Player));
        assert!(!board.has_pawn_on_col(Side::Player, 3));
    }
}
