use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::fen;
use crate::piece::{Color, Piece, PieceKind};
use crate::square::Square;

/// The 8×8 grid, indexed `squares[rank][file]`. Each occupied cell is the
/// sole owner of its piece.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Board {
    pub squares: [[Option<Piece>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

const BACK_ROW: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Board {
    /// Create an empty board with no pieces. Useful for setting up test positions.
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// The standard starting position.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for color in [Color::White, Color::Black] {
            for (file, &kind) in BACK_ROW.iter().enumerate() {
                board.set(Piece::new(kind, color, Square::new(file, color.back_rank())));
            }
            for file in 0..8 {
                board.set(Piece::new(PieceKind::Pawn, color, Square::new(file, color.pawn_start_rank())));
            }
        }
        board
    }

    /// Build a board from the placement field of a position string,
    /// e.g. `"4k3/8/8/8/8/8/8/4K2R"`.
    pub fn from_placement(placement: &str) -> Result<Self, SetupError> {
        fen::parse_placement(placement)
    }

    /// Whether `sq` is where a piece of this kind and color starts the game.
    pub fn is_home_square(kind: PieceKind, color: Color, sq: Square) -> bool {
        match kind {
            PieceKind::Pawn => sq.rank == color.pawn_start_rank(),
            _ => sq.rank == color.back_rank() && BACK_ROW[sq.file] == kind,
        }
    }

    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.rank][sq.file]
    }

    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// Put `piece` on its own square, replacing whatever was there.
    pub fn set(&mut self, piece: Piece) {
        self.squares[piece.square.rank][piece.square.file] = Some(piece);
    }

    /// Remove and return the piece on `sq`.
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.rank][sq.file].take()
    }

    /// Transfer the piece on `from` to `to`, updating its coordinates. Any
    /// piece on `to` is returned.
    pub fn relocate(&mut self, from: Square, to: Square, mark_moved: bool) -> Option<Piece> {
        let captured = self.take(to);
        if let Some(mut piece) = self.take(from) {
            piece.square = to;
            if mark_moved {
                piece.has_moved = true;
            }
            self.set(piece);
        }
        captured
    }

    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.squares.iter().flatten().flatten().copied()
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = Piece> + '_ {
        self.pieces().filter(move |p| p.color == color)
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|p| p.kind == PieceKind::King)
            .map(|p| p.square)
    }

    /// Square of `color`'s king.
    ///
    /// # Panics
    ///
    /// A position without that king is never reachable from a validated
    /// setup; hitting one means the rules code is broken.
    pub fn king_square(&self, color: Color) -> Square {
        match self.find_king(color) {
            Some(sq) => sq,
            None => panic!("no {color} king on the board"),
        }
    }

    /// Lone kings, or a single bishop or knight left beside them. Bishop
    /// pairs and other theoretical draws are not recognised.
    pub fn has_insufficient_material(&self) -> bool {
        let mut others = self.pieces().filter(|p| p.kind != PieceKind::King);
        match (others.next(), others.next()) {
            (None, _) => true,
            (Some(p), None) => matches!(p.kind, PieceKind::Bishop | PieceKind::Knight),
            _ => false,
        }
    }
}
