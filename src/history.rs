//! Undo records. One entry is pushed per committed move and popped in LIFO
//! order by undo.

use serde::{Deserialize, Serialize};

use crate::piece::{Piece, PieceKind};
use crate::signature::Signature;
use crate::square::Square;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastlingRecord {
    pub rook: Piece,
    pub rook_from: Square,
    pub rook_to: Square,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnPassantRecord {
    /// The captured pawn as it stood before removal.
    pub pawn: Piece,
    pub square: Square,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The mover as it was before the move.
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    pub captured: Option<Piece>,
    pub prev_has_moved: bool,
    pub castling: Option<CastlingRecord>,
    pub en_passant: Option<EnPassantRecord>,
    pub promotion: Option<PieceKind>,
    /// Signature after the move. `None` while the turn is unfinished
    /// (promotion not yet chosen).
    pub signature: Option<Signature>,
}

impl HistoryEntry {
    pub fn is_double_step(&self) -> bool {
        self.piece.kind == PieceKind::Pawn && self.from.rank.abs_diff(self.to.rank) == 2
    }

    /// Long algebraic code of the move, e.g. `e7e8q`.
    pub fn code(&self) -> String {
        let promo = self.promotion.map(|k| k.letter().to_string()).unwrap_or_default();
        format!("{}{}{promo}", self.from, self.to)
    }
}
