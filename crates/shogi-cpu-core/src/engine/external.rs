use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::notation::{EngineScore, NotationError};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine is not ready")]
    NotReady,

    #[error("engine did not answer within {0} ms")]
    Timeout(u64),

    #[error("engine process failed: {0}")]
    Crashed(String),

    #[error("engine returned no move")]
    NoMove,

    #[error("engine move {0} is not legal here")]
    InvalidMove(String),

    #[error(transparent)]
    Notation(#[from] NotationError),
}

/// Limits for one external search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub time_limit_ms: u64,
    pub depth: u32,
}

/// Raw answer of an external engine, move still in USI text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineReply {
    pub mv: String,
    pub score: Option<EngineScore>,
    pub pv: Vec<String>,
}

/// A search engine living outside this crate, typically a USI process or a
/// worker. Calls are blocking; the manager validates every answer.
pub trait ExternalEngine {
    fn name(&self) -> &str;

    fn initialize(&mut self) -> Result<(), EngineError>;

    fn is_ready(&self) -> bool;

    /// Best move for the position given as SFEN, side to move included.
    fn best_move(&mut self, sfen: &str, options: &SearchOptions) -> Result<EngineReply, EngineError>;

    /// Asks a running search to finish early. Default: no-op.
    fn stop(&mut self) {}
}
