use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attacks::{is_in_check_simple, is_square_threatened};
use crate::board::Board;
use crate::square::Square;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Single-letter code used by signatures and position export.
    pub fn letter(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    pub fn pawn_direction(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    pub fn back_rank(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    pub fn pawn_start_rank(self) -> usize {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// The farthest rank, where this side's pawns promote.
    pub fn promotion_rank(self) -> usize {
        self.opposite().back_rank()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Kinds a pawn may become, most valuable first.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// Material value in pawns. The king carries none.
    pub fn value(self) -> i32 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight => 3,
            PieceKind::Bishop => 3,
            PieceKind::Rook => 5,
            PieceKind::Queen => 9,
            PieceKind::King => 0,
        }
    }

    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    /// Case-insensitive inverse of [`PieceKind::letter`].
    pub fn from_letter(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    pub fn is_promotion_target(self) -> bool {
        Self::PROMOTIONS.contains(&self)
    }
}

/// A piece on the board. The grid cell holding it is its only owner; the
/// piece carries its own square so moves are a slot transfer plus a
/// coordinate update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub square: Square,
    pub has_moved: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color, square: Square) -> Self {
        Piece {
            kind,
            color,
            square,
            has_moved: false,
        }
    }

    /// Export letter: uppercase for White, lowercase for Black.
    pub fn fen_char(&self) -> char {
        match self.color {
            Color::White => self.kind.letter().to_ascii_uppercase(),
            Color::Black => self.kind.letter(),
        }
    }
}

pub(crate) const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (1, 2), (2, 1), (2, -1), (1, -2),
    (-1, -2), (-2, -1), (-2, 1), (-1, 2),
];

pub(crate) const KING_OFFSETS: [(i32, i32); 8] = [
    (0, 1), (1, 0), (0, -1), (-1, 0),
    (1, 1), (1, -1), (-1, -1), (-1, 1),
];

pub(crate) const ROOK_DIRS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

pub(crate) const BISHOP_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Every pseudo-legal destination for `piece`: movement shape only, the own
/// king may be left in check. `double_step` is the square of the pawn that
/// just advanced two squares, if any.
pub fn possible_moves(board: &Board, piece: &Piece, double_step: Option<Square>) -> Vec<Square> {
    let mut moves = step_moves(board, piece, double_step);
    if piece.kind == PieceKind::King {
        castling_moves(board, piece, &mut moves);
    }
    moves
}

/// Pseudo-legal destinations without castling. The attack oracle only ever
/// goes through here so threat queries cannot recurse into castling.
pub fn step_moves(board: &Board, piece: &Piece, double_step: Option<Square>) -> Vec<Square> {
    let mut moves = Vec::new();
    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, piece, double_step, &mut moves),
        PieceKind::Knight => leaper_moves(board, piece, &KNIGHT_OFFSETS, &mut moves),
        PieceKind::Bishop => slider_moves(board, piece, &BISHOP_DIRS, &mut moves),
        PieceKind::Rook => slider_moves(board, piece, &ROOK_DIRS, &mut moves),
        PieceKind::Queen => {
            slider_moves(board, piece, &ROOK_DIRS, &mut moves);
            slider_moves(board, piece, &BISHOP_DIRS, &mut moves);
        }
        PieceKind::King => leaper_moves(board, piece, &KING_OFFSETS, &mut moves),
    }
    moves
}

/// The two forward diagonals a pawn controls, occupied or not.
pub fn pawn_attacks(pawn: &Piece) -> impl Iterator<Item = Square> {
    let dir = pawn.color.pawn_direction();
    let from = pawn.square;
    [-1, 1].into_iter().filter_map(move |df| from.offset(df, dir))
}

/// The empty square behind an adjacent enemy pawn that just double-stepped,
/// if `pawn` may capture it en passant.
pub fn en_passant_target(board: &Board, pawn: &Piece, double_step: Option<Square>) -> Option<Square> {
    if pawn.kind != PieceKind::Pawn {
        return None;
    }
    let marker = double_step?;
    if marker.rank != pawn.square.rank || marker.file.abs_diff(pawn.square.file) != 1 {
        return None;
    }
    let victim = board.get(marker)?;
    if victim.kind != PieceKind::Pawn || victim.color == pawn.color {
        return None;
    }
    let target = marker.offset(0, pawn.color.pawn_direction())?;
    board.is_empty(target).then_some(target)
}

fn pawn_moves(board: &Board, pawn: &Piece, double_step: Option<Square>, moves: &mut Vec<Square>) {
    let dir = pawn.color.pawn_direction();

    if let Some(one) = pawn.square.offset(0, dir) {
        if board.is_empty(one) {
            moves.push(one);
            let on_start = !pawn.has_moved && pawn.square.rank == pawn.color.pawn_start_rank();
            if on_start {
                if let Some(two) = one.offset(0, dir) {
                    if board.is_empty(two) {
                        moves.push(two);
                    }
                }
            }
        }
    }

    for target in pawn_attacks(pawn) {
        if board.get(target).is_some_and(|p| p.color != pawn.color) {
            moves.push(target);
        }
    }

    if let Some(target) = en_passant_target(board, pawn, double_step) {
        moves.push(target);
    }
}

fn leaper_moves(board: &Board, piece: &Piece, offsets: &[(i32, i32)], moves: &mut Vec<Square>) {
    for &(df, dr) in offsets {
        let Some(target) = piece.square.offset(df, dr) else {
            continue;
        };
        if board.get(target).is_some_and(|p| p.color == piece.color) {
            continue;
        }
        moves.push(target);
    }
}

fn slider_moves(board: &Board, piece: &Piece, directions: &[(i32, i32)], moves: &mut Vec<Square>) {
    for &(df, dr) in directions {
        let mut cursor = piece.square.offset(df, dr);
        while let Some(target) = cursor {
            if let Some(p) = board.get(target) {
                if p.color != piece.color {
                    moves.push(target);
                }
                break;
            }
            moves.push(target);
            cursor = target.offset(df, dr);
        }
    }
}

fn castling_moves(board: &Board, king: &Piece, moves: &mut Vec<Square>) {
    let rank = king.color.back_rank();
    if king.has_moved || king.square != Square::new(4, rank) {
        return;
    }
    if is_in_check_simple(board, king.color) {
        return;
    }

    // (rook file, king step, files strictly between king and rook)
    let wings = [(7usize, 1i32, 5..7usize), (0, -1, 1..4)];
    for (rook_file, step, between) in wings {
        let rook_ok = board
            .get(Square::new(rook_file, rank))
            .is_some_and(|r| r.kind == PieceKind::Rook && r.color == king.color && !r.has_moved);
        if !rook_ok {
            continue;
        }
        if between.into_iter().any(|f| !board.is_empty(Square::new(f, rank))) {
            continue;
        }
        // The king's path: the square it crosses and the one it lands on.
        let crossed = Square::new((4 + step) as usize, rank);
        let landing = Square::new((4 + 2 * step) as usize, rank);
        if is_square_threatened(board, crossed, king.color)
            || is_square_threatened(board, landing, king.color)
        {
            continue;
        }
        moves.push(landing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn sorted(mut v: Vec<Square>) -> Vec<String> {
        v.sort_by_key(|s| (s.rank, s.file));
        v.into_iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn knight_in_corner_has_two_jumps() {
        let board = Board::from_placement("4k3/8/8/8/8/8/8/N3K3").unwrap();
        let knight = board.get(sq("a1")).unwrap();
        assert_eq!(sorted(possible_moves(&board, &knight, None)), vec!["c2", "b3"]);
    }

    #[test]
    fn rook_ray_stops_at_pieces() {
        // Own pawn on d5 blocks; enemy pawn on f4 is capturable.
        let board = Board::from_placement("4k3/8/8/3P4/1p1R1p2/8/8/4K3").unwrap();
        let rook = board.get(sq("d4")).unwrap();
        let moves = sorted(possible_moves(&board, &rook, None));
        assert_eq!(moves, vec!["d1", "d2", "d3", "b4", "c4", "e4", "f4"]);
    }

    #[test]
    fn pawn_double_step_needs_both_squares_empty() {
        let board = Board::from_placement("4k3/8/8/8/8/4n3/3PP3/4K3").unwrap();
        let d2 = board.get(sq("d2")).unwrap();
        let e2 = board.get(sq("e2")).unwrap();
        assert_eq!(sorted(possible_moves(&board, &d2, None)), vec!["d3", "e3", "d4"]);
        assert!(possible_moves(&board, &e2, None).is_empty());
    }

    #[test]
    fn en_passant_needs_adjacent_marker() {
        let board = Board::from_placement("4k3/8/8/3pP3/8/8/8/4K3").unwrap();
        let e5 = board.get(sq("e5")).unwrap();
        assert_eq!(en_passant_target(&board, &e5, Some(sq("d5"))), Some(sq("d6")));
        assert_eq!(en_passant_target(&board, &e5, None), None);
        assert_eq!(en_passant_target(&board, &e5, Some(sq("e8"))), None);
        assert!(possible_moves(&board, &e5, Some(sq("d5"))).contains(&sq("d6")));
    }

    #[test]
    fn pawn_attacks_ignore_the_square_ahead() {
        let pawn = Piece::new(PieceKind::Pawn, Color::Black, sq("a7"));
        let attacked: Vec<Square> = pawn_attacks(&pawn).collect();
        assert_eq!(attacked, vec![sq("b6")]);
    }

    #[test]
    fn castling_needs_unmoved_pieces() {
        let mut board = Board::from_placement("4k3/8/8/8/8/8/8/R3K2R").unwrap();
        let king = board.get(sq("e1")).unwrap();
        let moves = possible_moves(&board, &king, None);
        assert!(moves.contains(&sq("g1")));
        assert!(moves.contains(&sq("c1")));

        let mut rook = board.get(sq("h1")).unwrap();
        rook.has_moved = true;
        board.set(rook);
        let moves = possible_moves(&board, &king, None);
        assert!(!moves.contains(&sq("g1")));
        assert!(moves.contains(&sq("c1")));
    }

    #[test]
    fn queenside_castling_ignores_attack_on_b_file() {
        // The rook on b8 covers b1, which the king never crosses.
        let board = Board::from_placement("1r2k3/8/8/8/8/8/8/R3K3").unwrap();
        let king = board.get(sq("e1")).unwrap();
        assert!(possible_moves(&board, &king, None).contains(&sq("c1")));
    }
}
