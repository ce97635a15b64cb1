//! Position exchange strings for external engines.
//!
//! Export follows the usual six-field layout with two fixed simplifications:
//! castling is always reported as `KQkq`, and the move counters are `0 1`.

use crate::board::Board;
use crate::error::SetupError;
use crate::piece::{Color, Piece, PieceKind};
use crate::square::Square;

/// Run-length encoded piece placement, rank 8 first.
pub fn placement(board: &Board) -> String {
    let mut out = String::new();
    for rank in (0..8).rev() {
        let mut empty = 0;
        for file in 0..8 {
            match board.get(Square::new(file, rank)) {
                None => empty += 1,
                Some(p) => {
                    if empty > 0 {
                        out.push_str(&empty.to_string());
                        empty = 0;
                    }
                    out.push(p.fen_char());
                }
            }
        }
        if empty > 0 {
            out.push_str(&empty.to_string());
        }
        if rank > 0 {
            out.push('/');
        }
    }
    out
}

/// The en-passant target square implied by the double-step marker, if the
/// marked pawn belongs to the side not to move.
pub fn en_passant_square(side_to_move: Color, double_step: Option<Square>) -> Option<Square> {
    let marker = double_step?;
    let enemy_landing_rank = side_to_move.opposite().pawn_start_rank() as i32
        + 2 * side_to_move.opposite().pawn_direction();
    if marker.rank as i32 != enemy_landing_rank {
        return None;
    }
    marker.offset(0, side_to_move.pawn_direction())
}

/// Full position string for an external engine.
pub fn export(board: &Board, side_to_move: Color, double_step: Option<Square>) -> String {
    let ep = en_passant_square(side_to_move, double_step)
        .map(|sq| sq.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{} {} KQkq {} 0 1",
        placement(board),
        side_to_move.letter(),
        ep
    )
}

/// Parse a placement field into a board. Pieces standing on their starting
/// squares count as unmoved; everything else has already moved.
pub fn parse_placement(text: &str) -> Result<Board, SetupError> {
    let bad = |why: String| SetupError::Placement(why);
    let field = text.split_whitespace().next().unwrap_or("");
    let rows: Vec<&str> = field.split('/').collect();
    if rows.len() != 8 {
        return Err(bad(format!("expected 8 ranks, found {}", rows.len())));
    }

    let mut board = Board::empty();
    for (i, row) in rows.iter().enumerate() {
        let rank = 7 - i;
        let mut file = 0usize;
        for c in row.chars() {
            if let Some(n) = c.to_digit(10) {
                if !(1..=8).contains(&n) {
                    return Err(bad(format!("bad run length '{c}' on rank {}", rank + 1)));
                }
                file += n as usize;
            } else {
                let kind = PieceKind::from_letter(c)
                    .ok_or_else(|| bad(format!("unknown piece letter '{c}'")))?;
                if file >= 8 {
                    return Err(bad(format!("rank {} is too long", rank + 1)));
                }
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let square = Square::new(file, rank);
                let mut piece = Piece::new(kind, color, square);
                piece.has_moved = !Board::is_home_square(kind, color, square);
                board.set(piece);
                file += 1;
            }
            if file > 8 {
                return Err(bad(format!("rank {} is too long", rank + 1)));
            }
        }
        if file != 8 {
            return Err(bad(format!("rank {} has {file} files", rank + 1)));
        }
    }
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    #[test]
    fn start_position_export() {
        assert_eq!(
            export(&Board::new(), Color::White, None),
            format!("{START} w KQkq - 0 1")
        );
    }

    #[test]
    fn placement_parse_matches_start() {
        assert_eq!(parse_placement(START).unwrap(), Board::new());
        assert_eq!(placement(&parse_placement(START).unwrap()), START);
    }

    #[test]
    fn en_passant_field_from_marker() {
        // White pawn just reached e4: Black to move may capture on e3.
        let e4 = Square::from_algebraic("e4");
        assert_eq!(en_passant_square(Color::Black, e4).map(|s| s.to_string()), Some("e3".into()));
        // Black pawn just reached d5: White captures on d6.
        let d5 = Square::from_algebraic("d5");
        assert_eq!(en_passant_square(Color::White, d5).map(|s| s.to_string()), Some("d6".into()));
        // A marker on the wrong rank for the side to move is ignored.
        assert_eq!(en_passant_square(Color::White, e4), None);
    }

    #[test]
    fn export_keeps_full_castling_rights() {
        let board = parse_placement("4k3/8/8/8/8/8/8/4K3").unwrap();
        assert_eq!(export(&board, Color::Black, None), "4k3/8/8/8/8/8/8/4K3 b KQkq - 0 1");
    }

    #[test]
    fn malformed_placements_are_rejected() {
        for text in ["8/8/8", "9/8/8/8/8/8/8/8", "4k4/8/8/8/8/8/8/4K3", "4x3/8/8/8/8/8/8/4K3", "4k2/8/8/8/8/8/8/4K3"] {
            assert!(parse_placement(text).is_err(), "{text}");
        }
    }

    #[test]
    fn moved_status_follows_home_squares() {
        let board = parse_placement("4k3/8/8/8/8/8/P7/1P2K2R").unwrap();
        assert!(!board.get(Square::new(0, 1)).unwrap().has_moved);
        assert!(board.get(Square::new(1, 0)).unwrap().has_moved);
        assert!(!board.get(Square::new(4, 0)).unwrap().has_moved);
        assert!(!board.get(Square::new(7, 0)).unwrap().has_moved);
    }
}
