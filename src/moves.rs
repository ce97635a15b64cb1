use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::piece::PieceKind;
use crate::square::Square;

/// A move as exchanged with an external engine.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
        }
    }

    /// Convert to UCI notation, e.g. "e2e4", "a7a8q"
    pub fn to_uci(&self) -> String {
        let promo = match self.promotion {
            Some(kind) if kind.is_promotion_target() => kind.letter().to_string(),
            _ => String::new(),
        };
        format!("{}{}{promo}", self.from, self.to)
    }

    /// Parse from UCI notation. A fifth character other than `q r b n`
    /// still marks a promotion and falls back to a queen.
    pub fn from_uci(s: &str) -> Result<Move, EngineError> {
        let bad = || EngineError::BadMove(s.to_string());
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(bad());
        }
        let from = Square::from_algebraic(&s[0..2]).ok_or_else(bad)?;
        let to = Square::from_algebraic(&s[2..4]).ok_or_else(bad)?;
        let promotion = s[4..].chars().next().map(|c| match c {
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            _ => PieceKind::Queen,
        });
        Ok(Move {
            from,
            to,
            promotion,
        })
    }
}

impl FromStr for Move {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::from_uci(s)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}
