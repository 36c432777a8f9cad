use thiserror::Error;

/// Errors from parsing SFEN positions and USI moves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("invalid piece character: {0}")]
    InvalidPiece(char),

    #[error("invalid move format: {0}")]
    InvalidMoveFormat(String),

    #[error("invalid SFEN: {0}")]
    InvalidSfen(String),

    #[error("SFEN board must have 9 ranks, got {0}")]
    InvalidRankCount(usize),

    #[error("SFEN rank {rank} must span 9 squares, got {width}")]
    InvalidRankWidth { rank: usize, width: usize },

    #[error("invalid hand: {0}")]
    InvalidHand(String),

    #[error("invalid side to move: {0}")]
    InvalidSideToMove(String),

    #[error("invalid move number: {0}")]
    InvalidMoveNumber(String),
}

pub type NotationResult<T> = Result<T, NotationError>;
