//! Converts pseudo-legal moves into legal ones by simulating each candidate
//! on a scratch copy of the board.

use crate::attacks::is_in_check_at;
use crate::board::Board;
use crate::piece::{en_passant_target, possible_moves, Color, Piece, PieceKind};
use crate::square::Square;

/// Whether moving `piece` to `to` would leave its own king attacked. The live
/// board is never touched.
pub fn leaves_king_in_check(board: &Board, piece: &Piece, to: Square, double_step: Option<Square>) -> bool {
    let mut scratch = board.clone();

    let is_en_passant = piece.kind == PieceKind::Pawn
        && piece.square.file != to.file
        && board.is_empty(to)
        && en_passant_target(board, piece, double_step) == Some(to);
    if is_en_passant {
        if let Some(marker) = double_step {
            scratch.take(marker);
        }
    }

    scratch.relocate(piece.square, to, true);

    let king = if piece.kind == PieceKind::King {
        to
    } else {
        scratch.king_square(piece.color)
    };
    is_in_check_at(&scratch, piece.color, king)
}

/// Legal destinations for `piece`, en-passant captures included.
pub fn valid_moves(board: &Board, piece: &Piece, double_step: Option<Square>) -> Vec<Square> {
    possible_moves(board, piece, double_step)
        .into_iter()
        .filter(|&to| !leaves_king_in_check(board, piece, to, double_step))
        .collect()
}

/// Every legal `(from, to)` pair for `side`.
pub fn legal_moves(board: &Board, side: Color, double_step: Option<Square>) -> Vec<(Square, Square)> {
    board
        .pieces_of(side)
        .flat_map(|p| {
            valid_moves(board, &p, double_step)
                .into_iter()
                .map(move |to| (p.square, to))
        })
        .collect()
}

pub fn has_any_legal_move(board: &Board, side: Color, double_step: Option<Square>) -> bool {
    board
        .pieces_of(side)
        .any(|p| !valid_moves(board, &p, double_step).is_empty())
}
