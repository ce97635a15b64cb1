//! Error types for the rules engine and the engine adapter.

use thiserror::Error;

use crate::piece::{Color, PieceKind};
use crate::square::Square;

/// A rejected selection, move, or promotion. Rejections never mutate the game.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("the game is over")]
    GameOver,

    #[error("a promotion must be chosen first")]
    PromotionPending,

    #[error("no piece on {0}")]
    EmptySquare(Square),

    #[error("the piece on {0} belongs to the side not to move")]
    WrongSide(Square),

    #[error("no piece is selected")]
    NothingSelected,

    #[error("illegal move: {from} to {to}")]
    IllegalMove { from: Square, to: Square },

    #[error("no promotion is pending")]
    NoPromotionPending,

    #[error("cannot promote to {0:?}")]
    InvalidPromotion(PieceKind),
}

/// A position that cannot start a game.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("{color} must have exactly one king, found {count}")]
    KingCount { color: Color, count: usize },

    #[error("pawn on {0} stands on a back rank")]
    PawnOnBackRank(Square),

    #[error("invalid placement: {0}")]
    Placement(String),
}

/// Failure to obtain a move from an external engine. The board is untouched
/// whenever one of these surfaces.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to start engine '{path}': {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("engine I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("engine protocol error: {0}")]
    Protocol(String),

    #[error("engine returned no move")]
    NoMove,

    #[error("unparseable move code '{0}'")]
    BadMove(String),

    #[error("engine worker is gone")]
    Disconnected,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid engine config: {0}")]
    Json(#[from] serde_json::Error),
}
