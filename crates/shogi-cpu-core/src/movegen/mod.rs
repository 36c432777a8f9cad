//! Move generation: pattern tables, promotion rules, board moves and drops.

pub mod drops;
pub mod generate;
pub mod patterns;
pub mod promotion;

pub use drops::{DropCheck, can_drop, legal_drops};
pub use generate::{
    all_legal_moves, has_any_legal_move, leaves_king_in_check, legal_moves_from,
    pseudo_legal_moves,
};
