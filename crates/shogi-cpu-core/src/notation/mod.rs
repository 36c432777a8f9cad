//! SFEN positions, USI moves, and engine output lines.

mod error;
pub mod info;
pub mod sfen;
pub mod usi;

pub use error::{NotationError, NotationResult};
pub use info::{BestMove, EngineScore, InfoSnapshot, parse_bestmove_line};
pub use sfen::{STARTPOS_SFEN, SfenPosition, board_to_sfen, parse_sfen};
pub use usi::{move_to_usi, parse_usi_move, parse_usi_square};
