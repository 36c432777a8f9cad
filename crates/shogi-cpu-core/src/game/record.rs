use crate::types::{Move, Piece, Side};
use serde::{Deserialize, Serialize};

/// One completed move as shown in the move list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub side: Side,
    pub mv: Move,
    pub usi: String,
    /// The piece as it stands after the move.
    pub piece: Piece,
    pub captured: Option<Piece>,
    /// Whether the move left the opponent in check.
    pub check: bool,
}
