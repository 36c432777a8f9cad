//! Fixed-depth alpha-beta minimax.
//!
//! Scores are from the root side's point of view: the root side maximizes,
//! the opponent minimizes. The transposition table is wiped at the start of
//! every top-level search.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rand::Rng;
use rand::seq::IndexedRandom;

use super::ordering::order_moves;
use super::tt::{Bound, TranspositionTable, TtEntry};
use crate::board::Board;
use crate::config::{RuleConfig, SearchConfig, StalemateRule};
use crate::eval::evaluate_for;
use crate::movegen::all_legal_moves;
use crate::rules::attack::king_in_check;
use crate::time::Instant;
use crate::types::{Move, Side};

/// Magnitude of a forced win or loss, before depth shading.
pub const MATE_SCORE: i32 = 1_000_000;
const INFINITY: i32 = MATE_SCORE * 2;
/// Anything at least this far out is a mate score.
const MATE_BOUND: i32 = MATE_SCORE - u8::MAX as i32;

/// Mate scores carry their distance from the root. The table keeps them
/// relative to the node that stored them so a hit at another depth of the
/// same search reads the right distance.
fn score_to_tt(score: i32, depth: u8) -> i32 {
    if score >= MATE_BOUND {
        score - i32::from(depth)
    } else if score <= -MATE_BOUND {
        score + i32::from(depth)
    } else {
        score
    }
}

fn score_from_tt(score: i32, depth: u8) -> i32 {
    if score >= MATE_BOUND {
        score + i32::from(depth)
    } else if score <= -MATE_BOUND {
        score - i32::from(depth)
    } else {
        score
    }
}

/// Search limits
#[derive(Clone, Debug)]
pub struct SearchLimits {
    /// Plies to search from the root
    pub depth: u8,
    /// Soft time limit, checked between root candidates
    pub time: Option<Duration>,
    /// Stop flag, checked between root candidates
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits { depth: 4, time: None, stop_flag: None }
    }
}

impl SearchLimits {
    pub fn from_config(config: &SearchConfig) -> Self {
        SearchLimits {
            depth: config.depth.max(1),
            time: config.time_limit_ms.map(Duration::from_millis),
            stop_flag: None,
        }
    }
}

/// Search statistics
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub tt_probes: u64,
    pub tt_hits: u64,
    pub tt_cutoffs: u64,
    pub elapsed: Duration,
    /// Root candidates fully searched.
    pub root_moves_searched: usize,
}

/// Search result
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// Best move found, `None` if the root side has no legal move
    pub best_move: Option<Move>,
    /// Score of `best_move` from the root side's point of view
    pub score: i32,
    /// Whether every root candidate was searched
    pub completed: bool,
    pub stats: SearchStats,
}

pub struct Searcher {
    tt: TranspositionTable,
    stalemate: StalemateRule,
    root: Side,
    stats: SearchStats,
}

impl Searcher {
    pub fn new(search: &SearchConfig, rules: &RuleConfig) -> Self {
        Searcher {
            tt: TranspositionTable::new(search.tt_capacity),
            stalemate: rules.stalemate,
            root: Side::Cpu,
            stats: SearchStats::default(),
        }
    }

    pub fn tt_len(&self) -> usize {
        self.tt.len()
    }

    /// Searches `board` for `side` and picks uniformly among equally best
    /// root moves. The board is restored before returning.
    pub fn search<R: Rng + ?Sized>(
        &mut self,
        board: &mut Board,
        side: Side,
        limits: &SearchLimits,
        rng: &mut R,
    ) -> SearchResult {
        let start = Instant::now();
        self.tt.clear();
        self.stats = SearchStats::default();
        self.root = side;
        let depth = limits.depth.max(1);

        let mut moves = all_legal_moves(board, side);
        if moves.is_empty() {
            let score = self.terminal_score(board, side, depth);
            return self.finish(start, None, score, true);
        }
        order_moves(board, &mut moves, side);

        let mut best_score = -INFINITY;
        let mut best_moves: Vec<Move> = Vec::new();
        let mut completed = true;

        for (i, &mv) in moves.iter().enumerate() {
            if i > 0 && Self::should_stop(limits, start) {
                completed = false;
                break;
            }
            let Some(token) = board.apply_virtual(mv, side) else {
                continue;
            };
            // One below the best so far, so moves matching it come back exact.
            let alpha = best_score.saturating_sub(1).max(-INFINITY);
            let score = self.minimax(board, depth - 1, alpha, INFINITY, side.opponent());
            board.undo_virtual(token);
            self.stats.root_moves_searched += 1;

            if score > best_score {
                best_score = score;
                best_moves.clear();
                best_moves.push(mv);
            } else if score == best_score {
                best_moves.push(mv);
            }
        }

        let best_move = best_moves.choose(rng).copied();
        self.finish(start, best_move, best_score, completed)
    }

    fn finish(&mut self, start: Instant, best_move: Option<Move>, score: i32, completed: bool) -> SearchResult {
        self.stats.elapsed = start.elapsed();
        log::debug!(
            "search done: best={:?} score={} nodes={} tt_probes={} tt_hits={} tt_cutoffs={} elapsed_ms={}",
            best_move,
            score,
            self.stats.nodes,
            self.stats.tt_probes,
            self.stats.tt_hits,
            self.stats.tt_cutoffs,
            self.stats.elapsed.as_millis()
        );
        SearchResult { best_move, score, completed, stats: self.stats.clone() }
    }

    fn should_stop(limits: &SearchLimits, start: Instant) -> bool {
        if limits.stop_flag.as_ref().is_some_and(|f| f.load(Ordering::Relaxed)) {
            return true;
        }
        limits.time.is_some_and(|t| start.elapsed() >= t)
    }

    /// Score of a node where `to_move` has no legal move.
    fn terminal_score(&self, board: &Board, to_move: Side, depth: u8) -> i32 {
        if !king_in_check(board, to_move) && self.stalemate == StalemateRule::Draw {
            return 0;
        }
        // Faster mates keep more remaining depth and score further out.
        let magnitude = MATE_SCORE + i32::from(depth);
        if to_move == self.root { -magnitude } else { magnitude }
    }

    fn minimax(&mut self, board: &mut Board, depth: u8, mut alpha: i32, mut beta: i32, to_move: Side) -> i32 {
        self.stats.nodes += 1;
        let (alpha_orig, beta_orig) = (alpha, beta);
        let key = board.position_key(to_move);

        self.stats.tt_probes += 1;
        if let Some(entry) = self.tt.probe(key, depth) {
            self.stats.tt_hits += 1;
            let score = score_from_tt(entry.score, depth);
            match entry.bound {
                Bound::Exact => {
                    self.stats.tt_cutoffs += 1;
                    return score;
                }
                Bound::Lower => alpha = alpha.max(score),
                Bound::Upper => beta = beta.min(score),
            }
            if alpha >= beta {
                self.stats.tt_cutoffs += 1;
                return score;
            }
        }

        if depth == 0 {
            return evaluate_for(board, self.root);
        }

        let mut moves = all_legal_moves(board, to_move);
        if moves.is_empty() {
            return self.terminal_score(board, to_move, depth);
        }
        order_moves(board, &mut moves, to_move);

        let maximizing = to_move == self.root;
        let mut best = if maximizing { -INFINITY } else { INFINITY };

        for &mv in moves.iter() {
            let Some(token) = board.apply_virtual(mv, to_move) else {
                continue;
            };
            let score = self.minimax(board, depth - 1, alpha, beta, to_move.opponent());
            board.undo_virtual(token);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }
            if alpha >= beta {
                break;
            }
        }

        let bound = if best <= alpha_orig {
            Bound::Upper
        } else if best >= beta_orig {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.tt.store(key, TtEntry { depth, score: score_to_tt(best, depth), bound });
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Piece, PieceKind, Square};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn searcher() -> Searcher {
        Searcher::new(&SearchConfig::default(), &RuleConfig::default())
    }

    fn limits(depth: u8) -> SearchLimits {
        SearchLimits { depth, ..SearchLimits::default() }
    }

    #[test]
    fn test_depth_one_takes_free_rook() {
        let mut board = Board::startpos();
        // Drop a player rook where a CPU pawn can take it for free.
        board.put(Square::new(3, 0), Piece::new(PieceKind::Rook, Side::Player));
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let result = searcher().search(&mut board, Side::Cpu, &limits(1), &mut rng);
        let mv = result.best_move.unwrap();
        assert_eq!(mv.to(), Square::new(3, 0));
        assert_eq!(mv.from(), Some(Square::new(2, 0)));
    }

    #[test]
    fn test_finds_mate_in_one() {
        // CPU to move: a gold drop on (7,4), backed by the silver, mates the
        // player king boxed in by its own knights and pawns.
        let mut board = Board::empty();
        board.put(Square::new(8, 4), Piece::new(PieceKind::King, Side::Player));
        board.put(Square::new(8, 3), Piece::new(PieceKind::Knight, Side::Player));
        board.put(Square::new(8, 5), Piece::new(PieceKind::Knight, Side::Player));
        board.put(Square::new(7, 3), Piece::new(PieceKind::Pawn, Side::Player));
        board.put(Square::new(7, 5), Piece::new(PieceKind::Pawn, Side::Player));
        board.put(Square::new(6, 4), Piece::new(PieceKind::Silver, Side::Cpu));
        board.put(Square::new(0, 0), Piece::new(PieceKind::King, Side::Cpu));
        board.add_to_hand(Side::Cpu, PieceKind::Gold);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        let result = searcher().search(&mut board, Side::Cpu, &limits(2), &mut rng);
        assert_eq!(result.best_move, Some(Move::drop(PieceKind::Gold, Square::new(7, 4))));
        assert!(result.score >= MATE_SCORE);
    }

    #[test]
    fn test_mate_scores_are_stored_node_relative() {
        // Mate found two plies below a node searched with 3 plies left.
        let root_relative = MATE_SCORE + 1;
        let stored = score_to_tt(root_relative, 3);
        assert_eq!(stored, MATE_SCORE - 2);
        // The same node met with 5 plies left mates at remaining depth 3.
        assert_eq!(score_from_tt(stored, 5), MATE_SCORE + 3);
        assert_eq!(score_from_tt(score_to_tt(-root_relative, 3), 5), -(MATE_SCORE + 3));
        assert_eq!(score_to_tt(1234, 3), 1234);
        assert_eq!(score_from_tt(-1234, 5), -1234);
    }

    #[test]
    fn test_deeper_search_keeps_fastest_mate_score() {
        let mut board = Board::empty();
        board.put(Square::new(8, 4), Piece::new(PieceKind::King, Side::Player));
        board.put(Square::new(8, 3), Piece::new(PieceKind::Knight, Side::Player));
        board.put(Square::new(8, 5), Piece::new(PieceKind::Knight, Side::Player));
        board.put(Square::new(7, 3), Piece::new(PieceKind::Pawn, Side::Player));
        board.put(Square::new(7, 5), Piece::new(PieceKind::Pawn, Side::Player));
        board.put(Square::new(6, 4), Piece::new(PieceKind::Silver, Side::Cpu));
        board.put(Square::new(0, 0), Piece::new(PieceKind::King, Side::Cpu));
        board.add_to_hand(Side::Cpu, PieceKind::Gold);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        let result = searcher().search(&mut board, Side::Cpu, &limits(3), &mut rng);
        assert_eq!(result.best_move, Some(Move::drop(PieceKind::Gold, Square::new(7, 4))));
        // Mated with two plies still to go.
        assert_eq!(result.score, MATE_SCORE + 2);
    }

    #[test]
    fn test_search_restores_board() {
        let mut board = Board::startpos();
        let before = board.clone();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let result = searcher().search(&mut board, Side::Player, &limits(2), &mut rng);
        assert!(result.best_move.is_some());
        assert!(result.completed);
        assert_eq!(board, before);
    }

    #[test]
    fn test_no_moves_reports_terminal() {
        let mut board = Board::empty();
        board.put(Square::new(0, 0), Piece::new(PieceKind::King, Side::Cpu));
        board.put(Square::new(1, 0), Piece::new(PieceKind::Gold, Side::Player));
        board.put(Square::new(2, 1), Piece::new(PieceKind::Silver, Side::Player));
        board.put(Square::new(8, 8), Piece::new(PieceKind::King, Side::Player));
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let result = searcher().search(&mut board, Side::Cpu, &limits(3), &mut rng);
        assert_eq!(result.best_move, None);
        assert!(result.score <= -MATE_SCORE);
    }

    #[test]
    fn test_stop_flag_still_returns_a_move() {
        let mut board = Board::startpos();
        let flag = Arc::new(AtomicBool::new(true));
        let limits = SearchLimits { depth: 3, time: None, stop_flag: Some(flag) };
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        let result = searcher().search(&mut board, Side::Cpu, &limits, &mut rng);
        assert!(result.best_move.is_some());
        assert!(!result.completed);
        assert_eq!(result.stats.root_moves_searched, 1);
    }
}
