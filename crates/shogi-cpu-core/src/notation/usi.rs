//! USI move and square notation.
//!
//! Files count from the human's right: column 0 is file 9. Ranks are
//! letters from the CPU's edge: row 0 is rank `a`.

use super::error::{NotationError, NotationResult};
use crate::types::{Move, PieceKind, Square};

pub fn parse_usi_square(s: &str) -> NotationResult<Square> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return Err(NotationError::InvalidSquare(s.to_string()));
    }
    let file = bytes[0];
    let rank = bytes[1];
    if !(b'1'..=b'9').contains(&file) || !(b'a'..=b'i').contains(&rank) {
        return Err(NotationError::InvalidSquare(s.to_string()));
    }
    Ok(Square::new(rank - b'a', 9 - (file - b'0')))
}

/// Parses `7g7f`, `8h2b+` or `P*5e`.
pub fn parse_usi_move(s: &str) -> NotationResult<Move> {
    let s = s.trim();
    if !s.is_ascii() {
        return Err(NotationError::InvalidMoveFormat(s.to_string()));
    }
    if let Some((piece, to)) = s.split_once('*') {
        let mut chars = piece.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return Err(NotationError::InvalidMoveFormat(s.to_string()));
        };
        if !c.is_ascii_uppercase() {
            return Err(NotationError::InvalidPiece(c));
        }
        let kind = PieceKind::from_sfen_char(c).ok_or(NotationError::InvalidPiece(c))?;
        if kind == PieceKind::King {
            return Err(NotationError::InvalidPiece(c));
        }
        return Ok(Move::drop(kind, parse_usi_square(to)?));
    }

    let (body, promote) = match s.strip_suffix('+') {
        Some(body) => (body, true),
        None => (s, false),
    };
    if body.len() != 4 {
        return Err(NotationError::InvalidMoveFormat(s.to_string()));
    }
    let from = parse_usi_square(&body[0..2])?;
    let to = parse_usi_square(&body[2..4])?;
    if from == to {
        return Err(NotationError::InvalidMoveFormat(s.to_string()));
    }
    Ok(Move::normal(from, to, promote))
}

pub fn move_to_usi(mv: Move) -> String {
    match mv {
        Move::Board { from, to, promote } => {
            if promote { format!("{from}{to}+") } else { format!("{from}{to}") }
        }
        Move::Drop { kind, to } => format!("{}*{to}", kind.sfen_char()),
    }
}
