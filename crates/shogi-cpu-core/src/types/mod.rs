//! Core value types shared by every module.

mod moves;
mod piece;
mod side;
mod square;

pub use moves::{Move, MoveList};
pub use piece::{Piece, PieceKind};
pub use side::Side;
pub use square::Square;
