//! Difficulty policies for the built-in CPU.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use super::minimax::{SearchLimits, SearchResult, Searcher};
use crate::board::Board;
use crate::config::{Difficulty, GameConfig, SearchConfig};
use crate::eval::piece_value;
use crate::movegen::all_legal_moves;
use crate::types::{Move, MoveList, Side};

/// Built-in move chooser: random, capture-happy, or alpha-beta search.
pub struct BuiltinEngine {
    difficulty: Difficulty,
    search: SearchConfig,
    searcher: Searcher,
    rng: Xoshiro256PlusPlus,
    stop_flag: Arc<AtomicBool>,
    last_result: Option<SearchResult>,
}

impl BuiltinEngine {
    pub fn new(config: &GameConfig) -> Self {
        let rng = match config.search.seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_rng(&mut rand::rng()),
        };
        BuiltinEngine {
            difficulty: config.difficulty,
            search: config.search.clone(),
            searcher: Searcher::new(&config.search, &config.rules),
            rng,
            stop_flag: Arc::new(AtomicBool::new(false)),
            last_result: None,
        }
    }

    pub fn with_seed(config: &GameConfig, seed: u64) -> Self {
        let mut engine = Self::new(config);
        engine.set_seed(seed);
        engine
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Flag that interrupts a hard search at its next root candidate. A stop
    /// raised while idle applies to the next decision; the flag is cleared
    /// once that decision returns.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop_flag)
    }

    /// Result of the most recent hard search.
    pub fn last_result(&self) -> Option<&SearchResult> {
        self.last_result.as_ref()
    }

    /// Picks a move for `side`, `None` only when there is no legal move.
    pub fn choose_move(&mut self, board: &mut Board, side: Side) -> Option<Move> {
        let picked = self.pick(board, side);
        self.stop_flag.store(false, Ordering::Relaxed);
        picked
    }

    fn pick(&mut self, board: &mut Board, side: Side) -> Option<Move> {
        let moves = all_legal_moves(board, side);
        if moves.is_empty() {
            return None;
        }
        let picked = match self.difficulty {
            Difficulty::Easy => moves.choose(&mut self.rng).copied(),
            Difficulty::Medium => self.pick_capture_biased(board, &moves),
            Difficulty::Hard => self.pick_by_search(board, side),
        };
        let picked = picked.or_else(|| moves.choose(&mut self.rng).copied())?;
        Some(match self.difficulty {
            Difficulty::Hard => picked,
            _ => prefer_promotion(picked, &moves),
        })
    }

    fn pick_capture_biased(&mut self, board: &Board, moves: &MoveList) -> Option<Move> {
        let captures: Vec<(Move, i32)> = moves
            .iter()
            .filter_map(|&mv| match mv {
                Move::Board { to, .. } => board.piece_at(to).map(|victim| (mv, piece_value(victim))),
                Move::Drop { .. } => None,
            })
            .collect();
        // Heavier victims are proportionally more likely.
        if !captures.is_empty()
            && self.rng.random_bool(self.search.capture_bias.clamp(0.0, 1.0))
            && let Ok(&(mv, _)) = captures.choose_weighted(&mut self.rng, |&(_, value)| value)
        {
            return Some(mv);
        }
        moves.choose(&mut self.rng).copied()
    }

    fn pick_by_search(&mut self, board: &mut Board, side: Side) -> Option<Move> {
        let mut limits = SearchLimits::from_config(&self.search);
        limits.stop_flag = Some(Arc::clone(&self.stop_flag));
        let result = self.searcher.search(board, side, &limits, &mut self.rng);
        let best = result.best_move;
        self.last_result = Some(result);
        best
    }
}

/// The promoting twin of `mv` if the move list offers one.
fn prefer_promotion(mv: Move, moves: &MoveList) -> Move {
    match mv {
        Move::Board { from, to, promote: false } => {
            let promoted = Move::normal(from, to, true);
            if moves.contains(&promoted) { promoted } else { mv }
        }
        _ => mv,
    }
}
