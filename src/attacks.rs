//! Square-threat and check detection.
//!
//! Nothing here consults move legality, so these queries can be used from
//! inside the legality filter without recursion. Kings are always handled by
//! adjacency and never through castling generation.

use crate::board::Board;
use crate::piece::{pawn_attacks, step_moves, Color, Piece, PieceKind};
use crate::piece::{BISHOP_DIRS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRS};
use crate::square::Square;

/// Whether `piece` attacks `target` on this board.
fn piece_attacks(board: &Board, piece: &Piece, target: Square) -> bool {
    match piece.kind {
        PieceKind::King => {
            piece.square != target
                && piece.square.file.abs_diff(target.file) <= 1
                && piece.square.rank.abs_diff(target.rank) <= 1
        }
        PieceKind::Pawn => pawn_attacks(piece).any(|sq| sq == target),
        _ => step_moves(board, piece, None).contains(&target),
    }
}

/// True if any piece opposing `defender` attacks `square`.
pub fn is_square_threatened(board: &Board, square: Square, defender: Color) -> bool {
    board
        .pieces_of(defender.opposite())
        .any(|p| piece_attacks(board, &p, square))
}

/// Full-scan check test: every opposing piece is asked whether it reaches
/// the king.
pub fn is_in_check(board: &Board, side: Color) -> bool {
    is_in_check_at(board, side, board.king_square(side))
}

/// [`is_in_check`] with an already known king square.
pub fn is_in_check_at(board: &Board, side: Color, king: Square) -> bool {
    is_square_threatened(board, king, side)
}

/// Direct geometric check test, scanning outward from the king: pawn
/// diagonals, knight jumps, the adjacent king, and the sliding rays. Agrees
/// with [`is_in_check`] on every position.
pub fn is_in_check_simple(board: &Board, side: Color) -> bool {
    let king = board.king_square(side);
    let enemy = side.opposite();
    let enemy_at = |sq: Square, kinds: &[PieceKind]| {
        board
            .get(sq)
            .is_some_and(|p| p.color == enemy && kinds.contains(&p.kind))
    };

    // An enemy pawn one rank ahead of the king (from the king's point of view)
    // on an adjacent file.
    let dir = side.pawn_direction();
    if [-1, 1]
        .into_iter()
        .filter_map(|df| king.offset(df, dir))
        .any(|sq| enemy_at(sq, &[PieceKind::Pawn]))
    {
        return true;
    }

    let jumps = |offsets: &[(i32, i32)], kind: PieceKind| {
        offsets
            .iter()
            .filter_map(|&(df, dr)| king.offset(df, dr))
            .any(|sq| enemy_at(sq, &[kind]))
    };
    if jumps(&KNIGHT_OFFSETS, PieceKind::Knight) || jumps(&KING_OFFSETS, PieceKind::King) {
        return true;
    }

    let ray_hits = |dirs: &[(i32, i32)], kinds: &[PieceKind]| {
        dirs.iter().any(|&(df, dr)| {
            let mut cursor = king.offset(df, dr);
            while let Some(sq) = cursor {
                if board.get(sq).is_some() {
                    return enemy_at(sq, kinds);
                }
                cursor = sq.offset(df, dr);
            }
            false
        })
    };
    ray_hits(&ROOK_DIRS, &[PieceKind::Rook, PieceKind::Queen])
        || ray_hits(&BISHOP_DIRS, &[PieceKind::Bishop, PieceKind::Queen])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn pawn_threatens_diagonals_not_forward() {
        let board = Board::from_placement("4k3/8/8/8/8/8/5p2/4K3").unwrap();
        assert!(is_square_threatened(&board, sq("e1"), Color::White));
        assert!(is_square_threatened(&board, sq("g1"), Color::White));
        assert!(!is_square_threatened(&board, sq("f1"), Color::White));
    }

    #[test]
    fn blocked_slider_does_not_check() {
        let board = Board::from_placement("4r1k1/8/8/8/8/8/4P3/4K3").unwrap();
        assert!(!is_in_check(&board, Color::White));
        assert!(!is_in_check_simple(&board, Color::White));

        let board = Board::from_placement("4r1k1/8/8/8/8/8/8/4K3").unwrap();
        assert!(is_in_check(&board, Color::White));
        assert!(is_in_check_simple(&board, Color::White));
    }

    #[test]
    fn both_check_tests_agree_on_each_attacker() {
        let cases = [
            ("4k3/8/8/8/8/8/3p4/4K3", true),  // pawn
            ("4k3/8/8/8/8/8/4p3/4K3", false), // pawn straight ahead
            ("4k3/8/8/8/8/5n2/8/4K3", true),  // knight
            ("4k3/8/8/8/8/8/8/q3K3", true),   // queen along the rank
            ("4k3/8/8/b7/8/8/8/4K3", true),   // bishop on the diagonal
            ("4k3/8/8/8/8/8/8/2r1K3", true),  // rook
            ("4k3/8/8/8/8/8/8/2rNK3", false), // rook behind a knight
        ];
        for (placement, expected) in cases {
            let board = Board::from_placement(placement).unwrap();
            assert_eq!(is_in_check(&board, Color::White), expected, "{placement}");
            assert_eq!(is_in_check_simple(&board, Color::White), expected, "{placement}");
        }
    }

    #[test]
    fn adjacent_king_counts_as_attack() {
        let board = Board::from_placement("8/8/8/8/8/8/3k4/4K3").unwrap();
        assert!(is_square_threatened(&board, sq("d1"), Color::White));
        assert!(is_in_check(&board, Color::White));
        assert!(is_in_check_simple(&board, Color::White));
    }
}
