//! Chess rules: legal move generation, check detection, special moves,
//! reversible history and draw detection, plus a thin boundary for external
//! move providers.

pub mod attacks;
pub mod board;
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod engine;
pub mod error;
pub mod fen;
pub mod game;
pub mod history;
pub mod legality;
pub mod moves;
pub mod piece;
pub mod signature;
pub mod square;

#[cfg(target_arch = "wasm32")]
mod wasm_api;

pub use board::Board;
pub use error::{ConfigError, EngineError, RulesError, SetupError};
pub use game::{EndReason, GameState, Outcome, Phase, Winner};
pub use moves::Move;
pub use piece::{Color, Piece, PieceKind};
pub use square::Square;
