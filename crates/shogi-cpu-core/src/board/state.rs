//! Serialized form of [`Board`].

use super::{Board, Hand};
use crate::types::{Piece, PieceKind, Side, Square};
use serde::{Deserialize, Serialize};

/// Rows of nine optional pieces plus both pools, as counts per kind.
#[derive(Serialize, Deserialize)]
pub(super) struct BoardState {
    rows: Vec<Vec<Option<Piece>>>,
    player_hand: Hand,
    cpu_hand: Hand,
}

impl From<Board> for BoardState {
    fn from(board: Board) -> Self {
        let rows = (0..9u8)
            .map(|row| (0..9u8).map(|col| board.piece_at(Square::new(row, col))).collect())
            .collect();
        BoardState {
            rows,
            player_hand: *board.hand(Side::Player),
            cpu_hand: *board.hand(Side::Cpu),
        }
    }
}

impl TryFrom<BoardState> for Board {
    type Error = String;

    fn try_from(state: BoardState) -> Result<Self, Self::Error> {
        if state.rows.len() != 9 {
            return Err(format!("board must have 9 rows, got {}", state.rows.len()));
        }
        let mut board = Board::empty();
        for (row, cells) in state.rows.into_iter().enumerate() {
            if cells.len() != 9 {
                return Err(format!("row {row} must have 9 squares, got {}", cells.len()));
            }
            for (col, cell) in cells.into_iter().enumerate() {
                if let Some(piece) = cell {
                    if piece.promoted && !piece.kind.can_promote() {
                        return Err(format!("{:?} cannot be promoted", piece.kind));
                    }
                    board.put(Square::new(row as u8, col as u8), piece);
                }
            }
        }
        for (side, hand) in [(Side::Player, state.player_hand), (Side::Cpu, state.cpu_hand)] {
            for kind in PieceKind::HAND_ORDER {
                for _ in 0..hand.count(kind) {
                    board.add_to_hand(side, kind);
                }
            }
        }
        Ok(board)
    }
}
