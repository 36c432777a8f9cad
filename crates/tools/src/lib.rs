//! Developer tools around `shogi-cpu-core`: a USI child-process adapter,
//! CPU self-play and perft.

pub mod perft;
pub mod selfplay;
pub mod usi_engine;
