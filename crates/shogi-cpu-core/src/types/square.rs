//! Board coordinates
//!
//! Squares are addressed by `(row, col)` with row 0 at the CPU's edge and
//! col 0 on the left as the human sees the board. In USI notation column
//! `c` is file `9 - c` and row `r` is rank `'a' + r`, so `(6, 2)` is `7g`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Coords", into = "Coords")]
pub struct Square(u8);

impl Square {
    pub const NUM: usize = 81;

    /// Creates a square from in-range coordinates.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Square {
        debug_assert!(row < 9 && col < 9);
        Square(row * 9 + col)
    }

    /// Creates a square from possibly out-of-range signed coordinates.
    #[inline]
    pub fn checked(row: i8, col: i8) -> Option<Square> {
        if (0..9).contains(&row) && (0..9).contains(&col) {
            Some(Square::new(row as u8, col as u8))
        } else {
            None
        }
    }

    #[inline]
    pub const fn from_index(index: usize) -> Square {
        debug_assert!(index < Self::NUM);
        Square(index as u8)
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.0 / 9
    }

    #[inline]
    pub const fn col(self) -> u8 {
        self.0 % 9
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Steps by `(dcol, drow)` if the target stays on the board.
    #[inline]
    pub fn offset(self, dcol: i8, drow: i8) -> Option<Square> {
        Square::checked(self.row() as i8 + drow, self.col() as i8 + dcol)
    }

    /// Point reflection through the centre square.
    #[inline]
    pub const fn rotate(self) -> Square {
        Square(80 - self.0)
    }

    /// Manhattan distance to the centre square (4, 4).
    #[inline]
    pub const fn center_distance(self) -> u8 {
        self.row().abs_diff(4) + self.col().abs_diff(4)
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..Self::NUM as u8).map(Square)
    }

    /// USI file digit (1..=9).
    #[inline]
    pub const fn file(self) -> u8 {
        9 - self.col()
    }

    /// USI rank letter (`a`..=`i`).
    #[inline]
    pub const fn rank_char(self) -> char {
        (b'a' + self.row()) as char
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank_char())
    }
}

#[derive(Serialize, Deserialize)]
struct Coords {
    row: u8,
    col: u8,
}

impl From<Square> for Coords {
    fn from(sq: Square) -> Self {
        Coords { row: sq.row(), col: sq.col() }
    }
}

impl TryFrom<Coords> for Square {
    type Error = String;

    fn try_from(c: Coords) -> Result<Self, Self::Error> {
        if c.row < 9 && c.col < 9 {
            Ok(Square::new(c.row, c.col))
        } else {
            Err(format!("square out of range: ({}, {})", c.row, c.col))
        }
    }
}
