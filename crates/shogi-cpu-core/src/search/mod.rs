//! CPU move selection: ordering, transposition table, minimax and the
//! difficulty policies built on top of them.

pub mod minimax;
pub mod ordering;
pub mod policy;
pub mod tt;

pub use minimax::{MATE_SCORE, SearchLimits, SearchResult, SearchStats, Searcher};
pub use ordering::{order_moves, score_move};
pub use policy::BuiltinEngine;
pub use tt::{Bound, TranspositionTable, TtEntry};
