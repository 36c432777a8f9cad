//! Move representation

use super::{PieceKind, Square};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A board move or a drop from the captured pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Move {
    Board {
        from: Square,
        to: Square,
        #[serde(default)]
        promote: bool,
    },
    Drop {
        kind: PieceKind,
        to: Square,
    },
}

impl Move {
    #[inline]
    pub const fn normal(from: Square, to: Square, promote: bool) -> Move {
        Move::Board { from, to, promote }
    }

    #[inline]
    pub const fn drop(kind: PieceKind, to: Square) -> Move {
        Move::Drop { kind, to }
    }

    #[inline]
    pub const fn to(self) -> Square {
        match self {
            Move::Board { to, .. } | Move::Drop { to, .. } => to,
        }
    }

    #[inline]
    pub const fn from(self) -> Option<Square> {
        match self {
            Move::Board { from, .. } => Some(from),
            Move::Drop { .. } => None,
        }
    }

    #[inline]
    pub const fn is_drop(self) -> bool {
        matches!(self, Move::Drop { .. })
    }

    #[inline]
    pub const fn is_promote(self) -> bool {
        matches!(self, Move::Board { promote: true, .. })
    }
}

pub type MoveList = SmallVec<[Move; 128]>;
