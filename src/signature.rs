use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::piece::Color;
use crate::square::Square;

/// Canonical fingerprint of piece placement plus side to move, used for
/// repetition counting. Castling rights and en-passant availability are not
/// part of it, so positions differing only in those collide.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature(String);

impl Signature {
    pub fn of(board: &Board, side_to_move: Color) -> Self {
        let rows: Vec<String> = (0..8)
            .rev()
            .map(|rank| {
                (0..8)
                    .map(|file| match board.get(Square::new(file, rank)) {
                        Some(p) => format!("{}{}", p.color.letter(), p.kind.letter()),
                        None => ".".to_string(),
                    })
                    .collect()
            })
            .collect();
        Signature(format!("{}_{}", rows.join("|"), side_to_move.letter()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_rows_and_side() {
        let board = Board::from_placement("4k3/8/8/8/8/8/8/N3K3").unwrap();
        let sig = Signature::of(&board, Color::Black);
        let rows: Vec<&str> = sig.as_str().trim_end_matches("_b").split('|').collect();
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0], "....bk...");
        assert_eq!(rows[7], "wn...wk...");
        assert!(sig.as_str().ends_with("_b"));
    }

    #[test]
    fn side_to_move_distinguishes() {
        let board = Board::new();
        assert_ne!(Signature::of(&board, Color::White), Signature::of(&board, Color::Black));
        assert_eq!(Signature::of(&board, Color::White), Signature::of(&Board::new(), Color::White));
    }

    #[test]
    fn moved_flags_do_not_matter() {
        let mut board = Board::new();
        let before = Signature::of(&board, Color::White);
        let mut rook = board.get(Square::new(7, 0)).unwrap();
        rook.has_moved = true;
        board.set(rook);
        assert_eq!(Signature::of(&board, Color::White), before);
    }
}
