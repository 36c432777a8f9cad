//! SFEN position strings.

use super::error::{NotationError, NotationResult};
use crate::board::Board;
use crate::types::{Piece, PieceKind, Side, Square};

pub const STARTPOS_SFEN: &str = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";

/// A parsed SFEN: placement, pools, side to move and move number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfenPosition {
    pub board: Board,
    pub side_to_move: Side,
    pub move_number: u32,
}

/// Writes `board` as SFEN. Player pieces are uppercase; pools list the
/// player's pieces first, each side in R, B, G, S, N, L, P order.
pub fn board_to_sfen(board: &Board, side_to_move: Side, move_number: u32) -> String {
    let mut out = String::with_capacity(96);
    for row in 0..9u8 {
        if row > 0 {
            out.push('/');
        }
        let mut empty = 0;
        for col in 0..9u8 {
            match board.piece_at(Square::new(row, col)) {
                Some(piece) => {
                    if empty > 0 {
                        out.push_str(&empty.to_string());
                        empty = 0;
                    }
                    out.push_str(&piece.sfen_token());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push_str(&empty.to_string());
        }
    }

    out.push(' ');
    out.push(match side_to_move {
        Side::Player => 'b',
        Side::Cpu => 'w',
    });

    out.push(' ');
    let hands = hands_to_sfen(board);
    out.push_str(&hands);

    out.push(' ');
    out.push_str(&move_number.max(1).to_string());
    out
}

fn hands_to_sfen(board: &Board) -> String {
    let mut out = String::new();
    for side in Side::ALL {
        for (kind, n) in board.hand(side).iter() {
            if n > 1 {
                out.push_str(&n.to_string());
            }
            let c = kind.sfen_char();
            out.push(match side {
                Side::Player => c,
                Side::Cpu => c.to_ascii_lowercase(),
            });
        }
    }
    if out.is_empty() { "-".to_string() } else { out }
}

/// Parses an SFEN string. The move number is optional and defaults to 1;
/// a leading `sfen ` keyword and the word `startpos` are accepted.
pub fn parse_sfen(sfen: &str) -> NotationResult<SfenPosition> {
    let sfen = sfen.trim();
    let sfen = sfen.strip_prefix("sfen ").unwrap_or(sfen);
    if sfen == "startpos" {
        return parse_sfen(STARTPOS_SFEN);
    }

    let parts: Vec<&str> = sfen.split_whitespace().collect();
    if parts.len() < 3 || parts.len() > 4 {
        return Err(NotationError::InvalidSfen(format!(
            "expected 3 or 4 fields, got {}",
            parts.len()
        )));
    }

    let mut board = parse_placement(parts[0])?;

    let side_to_move = match parts[1] {
        "b" => Side::Player,
        "w" => Side::Cpu,
        other => return Err(NotationError::InvalidSideToMove(other.to_string())),
    };

    parse_hands(parts[2], &mut board)?;

    let move_number = match parts.get(3) {
        Some(n) => n
            .parse::<u32>()
            .ok()
            .filter(|&n| n >= 1)
            .ok_or_else(|| NotationError::InvalidMoveNumber(n.to_string()))?,
        None => 1,
    };

    Ok(SfenPosition { board, side_to_move, move_number })
}

fn parse_placement(placement: &str) -> NotationResult<Board> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 9 {
        return Err(NotationError::InvalidRankCount(ranks.len()));
    }

    let mut board = Board::empty();
    for (row, rank) in ranks.iter().enumerate() {
        let mut col = 0usize;
        let mut promoted = false;
        for c in rank.chars() {
            if c == '+' {
                if promoted {
                    return Err(NotationError::InvalidSfen(format!("double '+' in rank {}", row + 1)));
                }
                promoted = true;
                continue;
            }
            if let Some(skip) = c.to_digit(10) {
                if promoted || skip == 0 {
                    return Err(NotationError::InvalidPiece(c));
                }
                col += skip as usize;
                continue;
            }
            let kind = PieceKind::from_sfen_char(c).ok_or(NotationError::InvalidPiece(c))?;
            if col >= 9 {
                return Err(NotationError::InvalidRankWidth { rank: row + 1, width: col + 1 });
            }
            let owner = if c.is_ascii_uppercase() { Side::Player } else { Side::Cpu };
            if promoted && !kind.can_promote() {
                return Err(NotationError::InvalidPiece(c));
            }
            let piece = Piece { kind, owner, promoted };
            board.put(Square::new(row as u8, col as u8), piece);
            col += 1;
            promoted = false;
        }
        if promoted {
            return Err(NotationError::InvalidSfen(format!("dangling '+' in rank {}", row + 1)));
        }
        if col != 9 {
            return Err(NotationError::InvalidRankWidth { rank: row + 1, width: col });
        }
    }
    Ok(board)
}

fn parse_hands(hands: &str, board: &mut Board) -> NotationResult<()> {
    if hands == "-" {
        return Ok(());
    }
    let mut count: u32 = 0;
    let mut saw_digit = false;
    for c in hands.chars() {
        if let Some(d) = c.to_digit(10) {
            count = count * 10 + d;
            saw_digit = true;
            if count > 18 {
                return Err(NotationError::InvalidHand(hands.to_string()));
            }
            continue;
        }
        let kind = PieceKind::from_sfen_char(c)
            .filter(|&k| k != PieceKind::King)
            .ok_or_else(|| NotationError::InvalidHand(hands.to_string()))?;
        let n = if saw_digit { count } else { 1 };
        if n == 0 {
            return Err(NotationError::InvalidHand(hands.to_string()));
        }
        let side = if c.is_ascii_uppercase() { Side::Player } else { Side::Cpu };
        for _ in 0..n {
            board.add_to_hand(side, kind);
        }
        count = 0;
        saw_digit = false;
    }
    if saw_digit {
        return Err(NotationError::InvalidHand(hands.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startpos_sfen() {
        assert_eq!(board_to_sfen(&Board::startpos(), Side::Player, 1), STARTPOS_SFEN);
        let parsed = parse_sfen(STARTPOS_SFEN).unwrap();
        assert_eq!(parsed.board, Board::startpos());
        assert_eq!(parsed.side_to_move, Side::Player);
        assert_eq!(parsed.move_number, 1);
        assert_eq!(parse_sfen("startpos").unwrap(), parsed);
    }

    #[test]
    fn test_hands_and_promoted_pieces() {
        let sfen = "4k4/9/4+P4/9/9/9/9/9/4K4 w RB2Pgs3p 24";
        let pos = parse_sfen(sfen).unwrap();
        assert_eq!(pos.side_to_move, Side::Cpu);
        assert_eq!(pos.move_number, 24);
        assert_eq!(pos.board.hand(Side::Player).count(PieceKind::Pawn), 2);
        assert_eq!(pos.board.hand(Side::Cpu).count(PieceKind::Pawn), 3);
        assert_eq!(pos.board.hand(Side::Cpu).count(PieceKind::Gold), 1);
        assert_eq!(
            pos.board.piece_at(Square::new(2, 4)),
            Some(Piece::promoted(PieceKind::Pawn, Side::Player))
        );
        assert_eq!(board_to_sfen(&pos.board, pos.side_to_move, pos.move_number), sfen);
    }

    #[test]
    fn test_move_number_optional() {
        let pos = parse_sfen("4k4/9/9/9/9/9/9/9/4K4 b -").unwrap();
        assert_eq!(pos.move_number, 1);
    }

    #[test]
    fn test_malformed_sfen() {
        assert_eq!(
            parse_sfen("4k4/9/9/9/9/9/9/4K4 b - 1"),
            Err(NotationError::InvalidRankCount(8))
        );
        assert!(matches!(
            parse_sfen("4k5/9/9/9/9/9/9/9/4K4 b - 1"),
            Err(NotationError::InvalidRankWidth { rank: 1, .. })
        ));
        assert_eq!(parse_sfen("4k4/9/9/9/9/9/9/9/4X4 b - 1"), Err(NotationError::InvalidPiece('X')));
        assert!(matches!(parse_sfen("4k4/9/9/9/9/9/9/9/4K4 x - 1"), Err(NotationError::InvalidSideToMove(_))));
        assert!(matches!(parse_sfen("4k4/9/9/9/9/9/9/9/4K4 b K 1"), Err(NotationError::InvalidHand(_))));
        assert!(matches!(parse_sfen("4k4/9/9/9/9/9/9/9/4K4 b - 0"), Err(NotationError::InvalidMoveNumber(_))));
        assert!(matches!(parse_sfen("4+k4/9/9/9/9/9/9/9/4K4 b - 1"), Err(NotationError::InvalidPiece('k'))));
        assert!(parse_sfen("").is_err());
    }
}
