use std::fmt;

use serde::{Deserialize, Serialize};

/// A board coordinate. File 0 is the a-file, rank 0 is White's back rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub file: usize,
    pub rank: usize,
}

impl Square {
    pub const fn new(file: usize, rank: usize) -> Self {
        debug_assert!(file < 8 && rank < 8);
        Square { file, rank }
    }

    fn in_bounds(file: i32, rank: i32) -> bool {
        (0..8).contains(&file) && (0..8).contains(&rank)
    }

    /// Step by a (file, rank) delta. Returns `None` when the step leaves the
    /// board; there is no wrap-around between files.
    pub fn offset(self, df: i32, dr: i32) -> Option<Square> {
        let f = self.file as i32 + df;
        let r = self.rank as i32 + dr;
        if Self::in_bounds(f, r) {
            Some(Square::new(f as usize, r as usize))
        } else {
            None
        }
    }

    /// Parse "e4" style coordinates.
    pub fn from_algebraic(s: &str) -> Option<Square> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].wrapping_sub(b'a') as usize;
        let rank = bytes[1].wrapping_sub(b'1') as usize;
        if file < 8 && rank < 8 {
            Some(Square::new(file, rank))
        } else {
            None
        }
    }

    pub fn file_char(self) -> char {
        (b'a' + self.file as u8) as char
    }

    pub fn rank_char(self) -> char {
        (b'1' + self.rank as u8) as char
    }

    /// All 64 squares, a1 first.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8).flat_map(|rank| (0..8).map(move |file| Square::new(file, rank)))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algebraic_corners() {
        assert_eq!(Square::from_algebraic("a1"), Some(Square::new(0, 0)));
        assert_eq!(Square::from_algebraic("h8"), Some(Square::new(7, 7)));
        assert_eq!(Square::new(4, 3).to_string(), "e4");
        assert_eq!(Square::from_algebraic("i1"), None);
        assert_eq!(Square::from_algebraic("a9"), None);
        assert_eq!(Square::from_algebraic("a"), None);
    }

    #[test]
    fn offset_does_not_wrap() {
        let h4 = Square::new(7, 3);
        assert_eq!(h4.offset(1, 0), None);
        assert_eq!(h4.offset(-1, 1), Some(Square::new(6, 4)));
        assert_eq!(Square::new(0, 0).offset(0, -1), None);
    }
}
