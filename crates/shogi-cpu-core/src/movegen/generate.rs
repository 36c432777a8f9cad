//! Board-move generation and self-check filtering.

use super::drops::{DropCheck, can_drop};
use super::patterns::{orient, pattern};
use super::promotion::{can_promote, must_promote};
use crate::board::Board;
use crate::rules::attack::king_in_check;
use crate::types::{Move, MoveList, Piece, Side, Square};

/// Pushes the promotion variants of a `from -> to` step.
fn push_with_promotion(moves: &mut MoveList, piece: Piece, from: Square, to: Square) {
    if can_promote(piece, from, to) {
        moves.push(Move::normal(from, to, true));
        if !must_promote(piece, to) {
            moves.push(Move::normal(from, to, false));
        }
    } else {
        moves.push(Move::normal(from, to, false));
    }
}

/// Destinations reachable by the piece on `from` by its pattern alone,
/// without checking whether the mover's own king is left attacked.
pub fn pseudo_legal_moves(board: &Board, from: Square, moves: &mut MoveList) {
    let Some(piece) = board.piece_at(from) else {
        return;
    };
    let pat = pattern(piece);

    for &off in pat.steps {
        let (dc, dr) = orient(piece.owner, off);
        if let Some(to) = from.offset(dc, dr)
            && board.piece_at(to).is_none_or(|p| p.owner != piece.owner)
        {
            push_with_promotion(moves, piece, from, to);
        }
    }

    for &dir in pat.slides {
        let (dc, dr) = orient(piece.owner, dir);
        let mut cur = from;
        while let Some(to) = cur.offset(dc, dr) {
            match board.piece_at(to) {
                None => push_with_promotion(moves, piece, from, to),
                Some(p) if p.owner != piece.owner => {
                    push_with_promotion(moves, piece, from, to);
                    break;
                }
                Some(_) => break,
            }
            cur = to;
        }
    }
}

/// Whether playing `mv` for `side` would leave `side`'s king attacked.
/// The board is restored before returning.
pub fn leaves_king_in_check(board: &mut Board, mv: Move, side: Side) -> bool {
    match board.apply_virtual(mv, side) {
        Some(token) => {
            let in_check = king_in_check(board, side);
            board.undo_virtual(token);
            in_check
        }
        None => true,
    }
}

/// Legal moves of the piece on `from`, empty if the square is empty.
pub fn legal_moves_from(board: &mut Board, from: Square) -> MoveList {
    let mut moves = MoveList::new();
    let Some(piece) = board.piece_at(from) else {
        return moves;
    };
    pseudo_legal_moves(board, from, &mut moves);
    moves.retain(|mv| !leaves_king_in_check(board, *mv, piece.owner));
    moves
}

/// Every legal board move and drop for `side`.
pub fn all_legal_moves(board: &mut Board, side: Side) -> MoveList {
    let mut moves = MoveList::new();
    let origins: Vec<Square> = board.pieces(side).map(|(sq, _)| sq).collect();
    for from in origins {
        moves.extend(legal_moves_from(board, from));
    }
    let kinds: Vec<_> = board.hand(side).kinds().collect();
    for kind in kinds {
        for to in Square::all() {
            if can_drop(board, kind, to, side, DropCheck::Full) {
                moves.push(Move::drop(kind, to));
            }
        }
    }
    moves
}

/// Short-circuiting existence check used by mate and stalemate detection.
pub fn has_any_legal_move(board: &mut Board, side: Side, check: DropCheck) -> bool {
    let origins: Vec<Square> = board.pieces(side).map(|(sq, _)| sq).collect();
    let mut pseudo = MoveList::new();
    for from in origins {
        pseudo.clear();
        pseudo_legal_moves(board, from, &mut pseudo);
        if pseudo.iter().any(|mv| !leaves_king_in_check(board, *mv, side)) {
            return true;
        }
    }
    let kinds: Vec<_> = board.hand(side).kinds().collect();
    for kind in kinds {
        if Square::all().any(|to| can_drop(board, kind, to, side, check)) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    #[test]
    fn test_startpos_has_thirty_moves() {
        let mut board = Board::startpos();
        let moves = all_legal_moves(&mut board, Side::Player);
        assert_eq!(moves.len(), 30);
        assert!(moves.iter().all(|m| !m.is_drop()));
        let cpu_moves = all_legal_moves(&mut board, Side::Cpu);
        assert_eq!(cpu_moves.len(), 30);
    }

    #[test]
    fn test_slider_stops_at_first_piece() {
        let mut board = Board::startpos();
        // Player rook on (7,7) is boxed in by its own pawn and pieces.
        let rook_moves = legal_moves_from(&mut board, Square::new(7, 7));
        let targets: Vec<_> = rook_moves.iter().map(|m| m.to()).collect();
        assert!(targets.contains(&Square::new(7, 2)));
        assert!(!targets.contains(&Square::new(7, 1)));
        assert!(!targets.contains(&Square::new(6, 7)));
    }

    #[test]
    fn test_pinned_piece_cannot_move_off_line() {
        let mut board = Board::empty();
        board.put(Square::new(8, 4), Piece::new(PieceKind::King, Side::Player));
        board.put(Square::new(6, 4), Piece::new(PieceKind::Gold, Side::Player));
        board.put(Square::new(0, 4), Piece::new(PieceKind::Rook, Side::Cpu));
        board.put(Square::new(0, 0), Piece::new(PieceKind::King, Side::Cpu));
        let moves = legal_moves_from(&mut board, Square::new(6, 4));
        let targets: Vec<_> = moves.iter().map(|m| m.to()).collect();
        // Forward and backward along the file keep the line closed.
        assert_eq!(targets, vec![Square::new(5, 4), Square::new(7, 4)]);
    }

    #[test]
    fn test_optional_promotion_offers_both() {
        let mut board = Board::empty();
        board.put(Square::new(3, 4), Piece::new(PieceKind::Silver, Side::Player));
        let moves = legal_moves_from(&mut board, Square::new(3, 4));
        let into_zone: Vec<_> = moves.iter().filter(|m| m.to() == Square::new(2, 4)).collect();
        assert_eq!(into_zone.len(), 2);
    }

    #[test]
    fn test_forced_promotion_only() {
        let mut board = Board::empty();
        board.put(Square::new(1, 4), Piece::new(PieceKind::Pawn, Side::Player));
        let moves = legal_moves_from(&mut board, Square::new(1, 4));
        assert_eq!(moves.len(), 1);
        assert!(moves[0].is_promote());
    }

    #[test]
    fn test_generation_leaves_board_untouched() {
        let mut board = Board::startpos();
        board.add_to_hand(Side::Player, PieceKind::Pawn);
        board.remove(Square::new(6, 4));
        let before = board.clone();
        let _ = all_legal_moves(&mut board, Side::Player);
        assert_eq!(board, before);
    }
}
