//! # shogi-cpu-core
//!
//! Rules and CPU opponent for a browser shogi game.
//!
//! ## Modules
//!
//! - `types`: squares, pieces, sides and moves
//! - `board`: 9x9 board, captured pools, Zobrist keys, reversible moves
//! - `movegen`: per-piece patterns, promotion and drop legality
//! - `rules`: attacks, check, checkmate, stalemate, repetition
//! - `eval`: material, piece-square tables and king safety
//! - `search`: move ordering, transposition table, minimax and difficulty policies
//! - `notation`: SFEN positions, USI moves, engine output lines
//! - `game`: the game controller, take-back and snapshots
//! - `engine`: external engine contract and fallback manager
//!
//! Coordinates are `(row, col)` with row 0 on the CPU's back rank. The human
//! plays sente (`b` in SFEN), the CPU gote (`w`).

pub mod board;
pub mod config;
pub mod engine;
pub mod eval;
pub mod game;
pub mod movegen;
pub mod notation;
pub mod rules;
pub mod search;
pub mod time;
pub mod types;

pub use board::Board;
pub use config::{Difficulty, GameConfig, RuleConfig, SearchConfig, StalemateRule};
pub use engine::{EngineManager, ExternalEngine, StrengthLevel};
pub use eval::{Advantage, EvaluationSummary};
pub use game::{Game, GameOutcome, GameSnapshot, Rejected, TurnReport};
pub use search::BuiltinEngine;
pub use types::{Move, Piece, PieceKind, Side, Square};
