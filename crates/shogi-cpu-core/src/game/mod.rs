//! Game controller: move validation, the end-of-turn sequence, take-back
//! and snapshots.

mod outcome;
mod record;
mod snapshot;

pub use outcome::{DrawReason, GameOutcome, WinReason};
pub use record::MoveRecord;
pub use snapshot::{Checkpoint, GameSnapshot, SNAPSHOT_VERSION, SnapshotError};

use crate::board::Board;
use crate::config::{RuleConfig, StalemateRule};
use crate::eval::EvaluationSummary;
use crate::movegen::{self, DropCheck};
use crate::notation::{NotationResult, board_to_sfen, move_to_usi, parse_sfen};
use crate::rules::{self, PositionHistory, Repetition};
use crate::types::{Move, MoveList, PieceKind, Side, Square};
use serde::{Deserialize, Serialize};

/// Take-back checkpoints kept in memory.
pub const MAX_CHECKPOINTS: usize = 100;

/// Why [`Game::play`] refused a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejected {
    GameOver,
    Illegal,
}

/// What happened after an accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    pub record: MoveRecord,
    /// Side now to move.
    pub side_to_move: Side,
    /// Whether the side now to move is in check.
    pub in_check: bool,
    pub outcome: Option<GameOutcome>,
}

#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    side_to_move: Side,
    move_number: u32,
    moves: Vec<MoveRecord>,
    positions: PositionHistory,
    outcome: Option<GameOutcome>,
    rules: RuleConfig,
    checkpoints: Vec<Checkpoint>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(RuleConfig::default())
    }
}

impl Game {
    /// New game from the standard opening, human to move.
    pub fn new(rules: RuleConfig) -> Self {
        Self::from_board(Board::startpos(), Side::Player, 1, rules)
    }

    /// Starts from an arbitrary position. The position is recorded as the
    /// first history entry, and a side to move that is already mated or
    /// stalemated finishes the game on the spot.
    pub fn from_board(board: Board, side_to_move: Side, move_number: u32, rules: RuleConfig) -> Self {
        let mut game = Game {
            board,
            side_to_move,
            move_number: move_number.max(1),
            moves: Vec::new(),
            positions: PositionHistory::new(),
            outcome: None,
            rules,
            checkpoints: Vec::new(),
        };
        game.record_position();
        game.outcome = game.judge_no_moves();
        if let Some(result) = game.outcome {
            log::info!("imported position is already decided: {result}");
        }
        game
    }

    pub fn from_sfen(sfen: &str, rules: RuleConfig) -> NotationResult<Self> {
        let pos = parse_sfen(sfen)?;
        Ok(Self::from_board(pos.board, pos.side_to_move, pos.move_number, rules))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.moves.last()
    }

    pub fn position_history(&self) -> &PositionHistory {
        &self.positions
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    pub fn sfen(&self) -> String {
        board_to_sfen(&self.board, self.side_to_move, self.move_number)
    }

    pub fn in_check(&self) -> bool {
        rules::king_in_check(&self.board, self.side_to_move)
    }

    pub fn evaluation(&self) -> EvaluationSummary {
        EvaluationSummary::of(&self.board)
    }

    /// Legal moves of the side-to-move piece on `from`; empty for empty
    /// squares, opponent pieces, or a finished game.
    pub fn legal_moves_from(&mut self, from: Square) -> MoveList {
        if self.is_over() || self.board.piece_at(from).is_none_or(|p| p.owner != self.side_to_move) {
            return MoveList::new();
        }
        movegen::legal_moves_from(&mut self.board, from)
    }

    /// Squares where the side to move may drop `kind`.
    pub fn legal_drops(&mut self, kind: PieceKind) -> Vec<Square> {
        if self.is_over() {
            return Vec::new();
        }
        movegen::legal_drops(&mut self.board, kind, self.side_to_move)
    }

    pub fn all_legal_moves(&mut self) -> MoveList {
        if self.is_over() {
            return MoveList::new();
        }
        movegen::all_legal_moves(&mut self.board, self.side_to_move)
    }

    pub fn is_legal(&mut self, mv: Move) -> bool {
        let side = self.side_to_move;
        match mv {
            Move::Board { from, .. } => {
                self.board.piece_at(from).is_some_and(|p| p.owner == side)
                    && movegen::legal_moves_from(&mut self.board, from).contains(&mv)
            }
            Move::Drop { kind, to } => movegen::can_drop(&mut self.board, kind, to, side, DropCheck::Full),
        }
    }

    /// Plays `mv` for the side to move and runs the end-of-turn sequence.
    pub fn play(&mut self, mv: Move) -> Result<TurnReport, Rejected> {
        if self.is_over() {
            return Err(Rejected::GameOver);
        }
        if !self.is_legal(mv) {
            log::debug!("rejected {} for {}", move_to_usi(mv), self.side_to_move);
            return Err(Rejected::Illegal);
        }

        let mover = self.side_to_move;
        let checkpoint = self.checkpoint();
        let token = self.board.apply_virtual(mv, mover).ok_or(Rejected::Illegal)?;
        let Some(piece) = token.placed() else {
            self.board.undo_virtual(token);
            return Err(Rejected::Illegal);
        };
        self.push_checkpoint(checkpoint);

        self.side_to_move = mover.opponent();
        self.move_number += 1;
        let check = rules::king_in_check(&self.board, self.side_to_move);
        self.record_position();

        let record = MoveRecord {
            side: mover,
            mv,
            usi: move_to_usi(mv),
            piece,
            captured: token.captured,
            check,
        };
        self.moves.push(record.clone());

        let outcome = if token.captured.is_some_and(|p| p.kind == PieceKind::King) {
            Some(GameOutcome::Win { winner: mover, reason: WinReason::KingCaptured })
        } else {
            self.judge_end_of_turn()
        };
        if let Some(result) = outcome {
            log::info!("game over after {} moves: {result}", self.moves.len());
            self.outcome = Some(result);
        }

        Ok(TurnReport {
            record,
            side_to_move: self.side_to_move,
            in_check: check,
            outcome,
        })
    }

    /// Repetition, then checkmate, then stalemate of the side now to move.
    fn judge_end_of_turn(&mut self) -> Option<GameOutcome> {
        match self.positions.check_with_threshold(self.rules.repetition_threshold) {
            Repetition::PerpetualCheck { checker } => {
                return Some(GameOutcome::Win {
                    winner: checker.opponent(),
                    reason: WinReason::PerpetualCheck,
                });
            }
            Repetition::Draw => return Some(GameOutcome::Draw { reason: DrawReason::Repetition }),
            Repetition::None => {}
        }
        self.judge_no_moves()
    }

    /// Checkmate, then stalemate, of the side to move.
    fn judge_no_moves(&mut self) -> Option<GameOutcome> {
        let to_move = self.side_to_move;
        let winner = to_move.opponent();
        if rules::is_checkmate(&mut self.board, to_move) {
            return Some(GameOutcome::Win { winner, reason: WinReason::Checkmate });
        }
        if rules::is_stalemate(&mut self.board, to_move) {
            return Some(match self.rules.stalemate {
                StalemateRule::Draw => GameOutcome::Draw { reason: DrawReason::Stalemate },
                StalemateRule::LossForStalemated => GameOutcome::Win { winner, reason: WinReason::Stalemate },
            });
        }
        None
    }

    /// Appends the current position; the checker is the side that just
    /// moved if the side to move is now in check.
    fn record_position(&mut self) {
        let key = self.board.position_key(self.side_to_move);
        let checker = rules::king_in_check(&self.board, self.side_to_move)
            .then_some(self.side_to_move.opponent());
        self.positions.push(key, self.side_to_move, checker);
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            board: self.board.clone(),
            side_to_move: self.side_to_move,
            move_number: self.move_number,
            moves_len: self.moves.len(),
            positions_len: self.positions.len(),
        }
    }

    fn push_checkpoint(&mut self, checkpoint: Checkpoint) {
        self.checkpoints.push(checkpoint);
        if self.checkpoints.len() > MAX_CHECKPOINTS {
            self.checkpoints.remove(0);
        }
    }

    pub fn can_take_back(&self) -> bool {
        !self.is_over() && self.side_to_move == Side::Player && self.checkpoints.len() >= 2
    }

    /// Undoes the human's last move and the CPU's reply.
    pub fn take_back(&mut self) -> bool {
        if !self.can_take_back() {
            return false;
        }
        self.checkpoints.pop();
        let Some(cp) = self.checkpoints.pop() else {
            return false;
        };
        self.restore_checkpoint(cp);
        true
    }

    fn restore_checkpoint(&mut self, cp: Checkpoint) {
        self.board = cp.board;
        self.side_to_move = cp.side_to_move;
        self.move_number = cp.move_number;
        self.moves.truncate(cp.moves_len);
        self.positions.truncate(cp.positions_len);
        self.outcome = None;
    }
}
