//! Side to move

use serde::{Deserialize, Serialize};

/// The two participants. `Player` is the human (sente, SFEN `b`, uppercase
/// letters) and advances toward row 0; `Cpu` (gote, SFEN `w`, lowercase)
/// advances toward row 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Side {
    Player = 0,
    Cpu = 1,
}

impl Side {
    pub const NUM: usize = 2;
    pub const ALL: [Side; 2] = [Side::Player, Side::Cpu];

    #[inline]
    pub const fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Cpu,
            Side::Cpu => Side::Player,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Row delta of a single step forward.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Side::Player => -1,
            Side::Cpu => 1,
        }
    }

    /// Row index of the rank farthest from this side's starting edge.
    #[inline]
    pub const fn last_row(self) -> u8 {
        match self {
            Side::Player => 0,
            Side::Cpu => 8,
        }
    }

    /// How many rows `row` is away from the far edge (0 on the last rank).
    #[inline]
    pub const fn rows_to_last(self, row: u8) -> u8 {
        match self {
            Side::Player => row,
            Side::Cpu => 8 - row,
        }
    }
}

impl std::ops::Not for Side {
    type Output = Side;

    #[inline]
    fn not(self) -> Side {
        self.opponent()
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Cpu => write!(f, "cpu"),
        }
    }
}
