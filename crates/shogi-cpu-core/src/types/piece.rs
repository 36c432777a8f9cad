//! Piece kinds and board pieces

use super::Side;
use serde::{Deserialize, Serialize};

/// Base piece kinds. Promotion is carried separately on [`Piece`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Lance = 1,
    Knight = 2,
    Silver = 3,
    Gold = 4,
    Bishop = 5,
    Rook = 6,
    King = 7,
}

impl PieceKind {
    pub const NUM: usize = 8;

    pub const ALL: [PieceKind; 8] = [
        PieceKind::Pawn,
        PieceKind::Lance,
        PieceKind::Knight,
        PieceKind::Silver,
        PieceKind::Gold,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::King,
    ];

    /// Kinds that can sit in a captured pool, in the order SFEN writes them.
    pub const HAND_ORDER: [PieceKind; 7] = [
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Gold,
        PieceKind::Silver,
        PieceKind::Knight,
        PieceKind::Lance,
        PieceKind::Pawn,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn can_promote(self) -> bool {
        !matches!(self, PieceKind::Gold | PieceKind::King)
    }

    /// Index into a captured pool, `None` for the king.
    #[inline]
    pub const fn hand_index(self) -> Option<usize> {
        match self {
            PieceKind::King => None,
            _ => Some(self as usize),
        }
    }

    #[inline]
    pub const fn from_hand_index(index: usize) -> Option<PieceKind> {
        match index {
            0 => Some(PieceKind::Pawn),
            1 => Some(PieceKind::Lance),
            2 => Some(PieceKind::Knight),
            3 => Some(PieceKind::Silver),
            4 => Some(PieceKind::Gold),
            5 => Some(PieceKind::Bishop),
            6 => Some(PieceKind::Rook),
            _ => None,
        }
    }

    /// Uppercase SFEN letter.
    pub const fn sfen_char(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Lance => 'L',
            PieceKind::Knight => 'N',
            PieceKind::Silver => 'S',
            PieceKind::Gold => 'G',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::King => 'K',
        }
    }

    /// Parses an SFEN letter of either case.
    pub fn from_sfen_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'L' => Some(PieceKind::Lance),
            'N' => Some(PieceKind::Knight),
            'S' => Some(PieceKind::Silver),
            'G' => Some(PieceKind::Gold),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// A piece standing on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub owner: Side,
    #[serde(default)]
    pub promoted: bool,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, owner: Side) -> Self {
        Piece { kind, owner, promoted: false }
    }

    #[inline]
    pub const fn promoted(kind: PieceKind, owner: Side) -> Self {
        Piece { kind, owner, promoted: true }
    }

    /// Returns the promoted form, or `self` if the kind cannot promote.
    #[inline]
    pub const fn promote(self) -> Self {
        if self.kind.can_promote() {
            Piece { promoted: true, ..self }
        } else {
            self
        }
    }

    /// Whether this piece may still promote.
    #[inline]
    pub const fn is_promotable(self) -> bool {
        !self.promoted && self.kind.can_promote()
    }

    /// Moves like a gold general (gold, or a promoted pawn/lance/knight/silver).
    #[inline]
    pub const fn moves_like_gold(self) -> bool {
        matches!(self.kind, PieceKind::Gold)
            || (self.promoted
                && matches!(
                    self.kind,
                    PieceKind::Pawn | PieceKind::Lance | PieceKind::Knight | PieceKind::Silver
                ))
    }

    /// Dense index over (owner, kind, promoted) for hashing tables.
    #[inline]
    pub const fn code(self) -> usize {
        self.owner.index() * 16 + self.kind.index() * 2 + self.promoted as usize
    }

    /// SFEN token: optional `+`, letter cased by owner.
    pub fn sfen_token(self) -> String {
        let c = self.kind.sfen_char();
        let c = match self.owner {
            Side::Player => c,
            Side::Cpu => c.to_ascii_lowercase(),
        };
        if self.promoted { format!("+{c}") } else { c.to_string() }
    }
}
