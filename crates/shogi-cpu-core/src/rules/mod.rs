//! Check, terminal-state and repetition detection.

pub mod attack;
pub mod repetition;
pub mod status;

pub use attack::{is_attacked, king_in_check, piece_attacks};
pub use repetition::{HistoryEntry, PositionHistory, REPETITION_THRESHOLD, Repetition};
pub use status::{is_checkmate, is_stalemate};
