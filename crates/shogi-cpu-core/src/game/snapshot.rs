//! Save and restore of a whole game, take-back stack included.

use super::{Game, GameOutcome, MAX_CHECKPOINTS, MoveRecord};
use crate::board::Board;
use crate::config::RuleConfig;
use crate::rules::PositionHistory;
use crate::types::Side;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    #[error("inconsistent snapshot: {0}")]
    Inconsistent(&'static str),
}

/// Game state captured before a move, restored by take-back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub board: Board,
    pub side_to_move: Side,
    pub move_number: u32,
    pub moves_len: usize,
    pub positions_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub version: u32,
    pub board: Board,
    pub side_to_move: Side,
    pub move_number: u32,
    pub moves: Vec<MoveRecord>,
    pub positions: PositionHistory,
    pub outcome: Option<GameOutcome>,
    pub game_over: bool,
    #[serde(default)]
    pub rules: RuleConfig,
    #[serde(default)]
    pub takeback: Vec<Checkpoint>,
}

impl Game {
    pub fn to_snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            version: SNAPSHOT_VERSION,
            board: self.board.clone(),
            side_to_move: self.side_to_move,
            move_number: self.move_number,
            moves: self.moves.clone(),
            positions: self.positions.clone(),
            outcome: self.outcome,
            game_over: self.outcome.is_some(),
            rules: self.rules,
            takeback: self.checkpoints.clone(),
        }
    }

    pub fn from_snapshot(snapshot: GameSnapshot) -> Result<Self, SnapshotError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(snapshot.version));
        }
        if snapshot.game_over != snapshot.outcome.is_some() {
            return Err(SnapshotError::Inconsistent("game_over disagrees with outcome"));
        }
        let key = snapshot.board.position_key(snapshot.side_to_move);
        if snapshot.positions.entries().last().map(|e| e.key) != Some(key) {
            return Err(SnapshotError::Inconsistent("history does not end at the board"));
        }
        if snapshot.move_number == 0 {
            return Err(SnapshotError::Inconsistent("move number must be positive"));
        }
        let moves_len = snapshot.moves.len();
        let positions_len = snapshot.positions.len();
        if snapshot
            .takeback
            .iter()
            .any(|cp| cp.moves_len > moves_len || cp.positions_len > positions_len)
        {
            return Err(SnapshotError::Inconsistent("checkpoint beyond recorded history"));
        }

        let mut checkpoints = snapshot.takeback;
        if checkpoints.len() > MAX_CHECKPOINTS {
            checkpoints.drain(..checkpoints.len() - MAX_CHECKPOINTS);
        }
        Ok(Game {
            board: snapshot.board,
            side_to_move: snapshot.side_to_move,
            move_number: snapshot.move_number,
            moves: snapshot.moves,
            positions: snapshot.positions,
            outcome: snapshot.outcome,
            rules: snapshot.rules,
            checkpoints,
        })
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(&self.to_snapshot())?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: GameSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }
}
