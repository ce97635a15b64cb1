//! Turn management, special-move execution, history and draw bookkeeping.
//!
//! `GameState` owns the board and a single [`Phase`] value:
//!
//! ```text
//! Idle ──select──▶ Selected ──move_to──▶ Idle
//!                      │                  │
//!                      │ pawn on last rank└──▶ Over
//!                      ▼
//!              AwaitingPromotion ──promote──▶ Idle / Over
//! ```
//!
//! `undo` returns to `Idle` from any phase.

use std::collections::HashMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::attacks::is_in_check;
use crate::board::Board;
use crate::error::{RulesError, SetupError};
use crate::fen;
use crate::history::{CastlingRecord, EnPassantRecord, HistoryEntry};
use crate::legality::{has_any_legal_move, legal_moves, valid_moves};
use crate::moves::Move;
use crate::piece::{en_passant_target, Color, Piece, PieceKind};
use crate::signature::Signature;
use crate::square::Square;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Side(Color),
    Draw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    Checkmate,
    Repetition,
    Stalemate,
    InsufficientMaterial,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub winner: Winner,
    pub reason: EndReason,
}

impl Outcome {
    fn draw(reason: EndReason) -> Self {
        Outcome {
            winner: Winner::Draw,
            reason,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Selected { square: Square, moves: Vec<Square> },
    AwaitingPromotion { square: Square },
    Over(Outcome),
}

#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    side_to_move: Color,
    phase: Phase,
    history: Vec<HistoryEntry>,
    repetitions: HashMap<Signature, u32>,
    double_step: Option<Square>,
    /// Captured material, positive when White is ahead.
    material: i32,
    captured_by_white: Vec<PieceKind>,
    captured_by_black: Vec<PieceKind>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::start(Board::new(), Color::White)
    }

    /// Start from an arbitrary position after checking it is playable: one
    /// king per side and no pawns on a back rank.
    pub fn from_board(board: Board, side_to_move: Color) -> Result<Self, SetupError> {
        for color in [Color::White, Color::Black] {
            let count = board
                .pieces_of(color)
                .filter(|p| p.kind == PieceKind::King)
                .count();
            if count != 1 {
                return Err(SetupError::KingCount { color, count });
            }
        }
        if let Some(pawn) = board
            .pieces()
            .find(|p| p.kind == PieceKind::Pawn && (p.square.rank == 0 || p.square.rank == 7))
        {
            return Err(SetupError::PawnOnBackRank(pawn.square));
        }
        Ok(Self::start(board, side_to_move))
    }

    pub fn from_placement(placement: &str, side_to_move: Color) -> Result<Self, SetupError> {
        Self::from_board(Board::from_placement(placement)?, side_to_move)
    }

    fn start(board: Board, side_to_move: Color) -> Self {
        let mut repetitions = HashMap::new();
        repetitions.insert(Signature::of(&board, side_to_move), 1);
        GameState {
            board,
            side_to_move,
            phase: Phase::Idle,
            history: Vec::new(),
            repetitions,
            double_step: None,
            material: 0,
            captured_by_white: Vec::new(),
            captured_by_black: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Over(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_some()
    }

    pub fn selected(&self) -> Option<Square> {
        match self.phase {
            Phase::Selected { square, .. } => Some(square),
            _ => None,
        }
    }

    /// Cached legal destinations of the selected piece.
    pub fn selected_moves(&self) -> &[Square] {
        match &self.phase {
            Phase::Selected { moves, .. } => moves,
            _ => &[],
        }
    }

    pub fn pending_promotion(&self) -> Option<Square> {
        match self.phase {
            Phase::AwaitingPromotion { square } => Some(square),
            _ => None,
        }
    }

    pub fn is_in_check(&self) -> bool {
        is_in_check(&self.board, self.side_to_move)
    }

    /// Legal destinations of the piece on `square`, without selecting it.
    /// Empty for pieces of the side not to move.
    pub fn legal_moves_from(&self, square: Square) -> Vec<Square> {
        match self.board.get(square) {
            Some(piece) if piece.color == self.side_to_move => {
                valid_moves(&self.board, &piece, self.double_step)
            }
            _ => Vec::new(),
        }
    }

    /// Every legal move for the side to move. Promotions are listed once,
    /// without a kind.
    pub fn legal_moves(&self) -> Vec<Move> {
        if matches!(self.phase, Phase::Over(_) | Phase::AwaitingPromotion { .. }) {
            return Vec::new();
        }
        legal_moves(&self.board, self.side_to_move, self.double_step)
            .into_iter()
            .map(|(from, to)| Move::new(from, to))
            .collect()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn repetitions(&self) -> &HashMap<Signature, u32> {
        &self.repetitions
    }

    pub fn repetition_count(&self, signature: &Signature) -> u32 {
        self.repetitions.get(signature).copied().unwrap_or(0)
    }

    /// Square of the pawn that advanced two squares on the previous move.
    pub fn double_step(&self) -> Option<Square> {
        self.double_step
    }

    pub fn material(&self) -> i32 {
        self.material
    }

    /// Kinds captured by `color`, in capture order.
    pub fn captured_by(&self, color: Color) -> &[PieceKind] {
        match color {
            Color::White => &self.captured_by_white,
            Color::Black => &self.captured_by_black,
        }
    }

    pub fn signature(&self) -> Signature {
        Signature::of(&self.board, self.side_to_move)
    }

    pub fn to_fen(&self) -> String {
        fen::export(&self.board, self.side_to_move, self.double_step)
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Select the piece on `square` and cache its legal moves. On error the
    /// current phase is left as it was.
    pub fn select(&mut self, square: Square) -> Result<(), RulesError> {
        self.ensure_playable()?;
        let piece = self.board.get(square).ok_or(RulesError::EmptySquare(square))?;
        if piece.color != self.side_to_move {
            return Err(RulesError::WrongSide(square));
        }
        let moves = valid_moves(&self.board, &piece, self.double_step);
        self.phase = Phase::Selected { square, moves };
        Ok(())
    }

    /// Move the selected piece to `to`.
    pub fn move_to(&mut self, to: Square) -> Result<(), RulesError> {
        self.ensure_playable()?;
        let from = match &self.phase {
            Phase::Selected { square, moves } => {
                if !moves.contains(&to) {
                    return Err(RulesError::IllegalMove { from: *square, to });
                }
                *square
            }
            _ => return Err(RulesError::NothingSelected),
        };
        let piece = self.board.get(from).ok_or(RulesError::EmptySquare(from))?;
        self.commit(piece, to);
        Ok(())
    }

    /// Finish a pending promotion. Only checkmate is tested afterwards.
    pub fn promote(&mut self, kind: PieceKind) -> Result<(), RulesError> {
        let Phase::AwaitingPromotion { square } = self.phase else {
            return Err(RulesError::NoPromotionPending);
        };
        if !kind.is_promotion_target() {
            return Err(RulesError::InvalidPromotion(kind));
        }

        let color = self.side_to_move;
        let mut promoted = Piece::new(kind, color, square);
        promoted.has_moved = true;
        self.board.set(promoted);
        self.adjust_material(color, kind.value() - PieceKind::Pawn.value());
        if let Some(entry) = self.history.last_mut() {
            entry.promotion = Some(kind);
        }
        debug!("{color} pawn on {square} promoted to {kind:?}");

        self.close_turn();
        let outcome = self.checkmate_outcome();
        self.phase = outcome.map_or(Phase::Idle, Phase::Over);
        if let Some(outcome) = outcome {
            info!("game over after promotion: {outcome:?}");
        }
        Ok(())
    }

    /// Take back the latest move. Returns `false` when there is nothing to
    /// undo.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.pop() else {
            return false;
        };
        let mover = entry.piece.color;

        self.board.take(entry.to);
        if let Some(kind) = entry.promotion {
            self.adjust_material(mover, PieceKind::Pawn.value() - kind.value());
        }
        let mut piece = entry.piece;
        piece.square = entry.from;
        piece.has_moved = entry.prev_has_moved;
        self.board.set(piece);

        if let Some(captured) = entry.captured {
            self.board.set(captured);
            self.uncredit_capture(mover, captured.kind);
        }
        if let Some(castling) = &entry.castling {
            self.board.take(castling.rook_to);
            let mut rook = castling.rook;
            rook.square = castling.rook_from;
            rook.has_moved = false;
            self.board.set(rook);
        }
        if let Some(ep) = &entry.en_passant {
            self.board.set(ep.pawn);
            self.uncredit_capture(mover, ep.pawn.kind);
        }

        self.side_to_move = mover;
        if let Some(signature) = &entry.signature {
            if let Some(count) = self.repetitions.get_mut(signature) {
                *count -= 1;
                if *count == 0 {
                    self.repetitions.remove(signature);
                }
            }
        }
        self.phase = Phase::Idle;
        self.double_step = self.marker_from_history();
        debug!("undid {}", entry.code());
        true
    }

    /// Apply a move proposed from outside (an engine, a network peer). A
    /// required promotion without a kind becomes a queen. On error the
    /// selection is dropped and nothing else changes.
    pub fn play(&mut self, mv: &Move) -> Result<(), RulesError> {
        let result = self.try_play(mv);
        if let Err(err) = &result {
            if matches!(self.phase, Phase::Selected { .. }) {
                self.phase = Phase::Idle;
            }
            warn!("rejected move {mv}: {err}");
        }
        result
    }

    fn try_play(&mut self, mv: &Move) -> Result<(), RulesError> {
        self.select(mv.from)?;
        self.move_to(mv.to)?;
        if self.pending_promotion().is_some() {
            self.promote(mv.promotion.unwrap_or(PieceKind::Queen))?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn ensure_playable(&self) -> Result<(), RulesError> {
        match self.phase {
            Phase::Over(_) => Err(RulesError::GameOver),
            Phase::AwaitingPromotion { .. } => Err(RulesError::PromotionPending),
            _ => Ok(()),
        }
    }

    fn commit(&mut self, piece: Piece, to: Square) {
        let from = piece.square;
        let mover = piece.color;

        let castling = if piece.kind == PieceKind::King && from.file.abs_diff(to.file) == 2 {
            let (rook_file, rook_to_file) = if to.file > from.file {
                (7, to.file - 1)
            } else {
                (0, to.file + 1)
            };
            let rook_from = Square::new(rook_file, from.rank);
            let rook_to = Square::new(rook_to_file, from.rank);
            self.board.get(rook_from).map(|rook| CastlingRecord {
                rook,
                rook_from,
                rook_to,
            })
        } else {
            None
        };

        let en_passant = match self.double_step {
            Some(marker) if en_passant_target(&self.board, &piece, self.double_step) == Some(to) => self
                .board
                .get(marker)
                .map(|pawn| EnPassantRecord {
                    pawn,
                    square: marker,
                }),
            _ => None,
        };

        let captured = self.board.get(to);
        let entry = HistoryEntry {
            piece,
            from,
            to,
            captured,
            prev_has_moved: piece.has_moved,
            castling,
            en_passant,
            promotion: None,
            signature: None,
        };

        if let Some(victim) = captured {
            self.credit_capture(mover, victim.kind);
        }
        self.board.relocate(from, to, true);
        if let Some(castling) = &entry.castling {
            self.board.relocate(castling.rook_from, castling.rook_to, true);
        }
        if let Some(ep) = &entry.en_passant {
            self.board.take(ep.square);
            self.credit_capture(mover, ep.pawn.kind);
        }
        debug!("{mover} plays {}", entry.code());
        self.history.push(entry);

        if piece.kind == PieceKind::Pawn && to.rank == mover.promotion_rank() {
            self.double_step = None;
            self.phase = Phase::AwaitingPromotion { square: to };
            return;
        }

        let count = self.close_turn();
        let outcome = self.checkmate_outcome().or_else(|| {
            let side = self.side_to_move;
            if count >= 3 {
                Some(Outcome::draw(EndReason::Repetition))
            } else if !is_in_check(&self.board, side)
                && !has_any_legal_move(&self.board, side, self.double_step)
            {
                Some(Outcome::draw(EndReason::Stalemate))
            } else if self.board.has_insufficient_material() {
                Some(Outcome::draw(EndReason::InsufficientMaterial))
            } else {
                None
            }
        });
        self.phase = outcome.map_or(Phase::Idle, Phase::Over);
        if let Some(outcome) = outcome {
            info!("game over: {outcome:?}");
        }
    }

    /// Hand the turn over: flip the side, refresh the double-step marker and
    /// record the new signature. Returns how often that signature has now
    /// occurred.
    fn close_turn(&mut self) -> u32 {
        self.side_to_move = self.side_to_move.opposite();
        self.double_step = self.marker_from_history();

        let signature = Signature::of(&self.board, self.side_to_move);
        let count = self.repetitions.entry(signature.clone()).or_insert(0);
        *count += 1;
        let count = *count;
        if let Some(entry) = self.history.last_mut() {
            entry.signature = Some(signature);
        }
        count
    }

    /// The marker only survives for the move right after a double step.
    fn marker_from_history(&self) -> Option<Square> {
        self.history
            .last()
            .filter(|e| e.is_double_step())
            .map(|e| e.to)
    }

    fn checkmate_outcome(&self) -> Option<Outcome> {
        let side = self.side_to_move;
        let mated = is_in_check(&self.board, side)
            && !has_any_legal_move(&self.board, side, self.double_step);
        mated.then_some(Outcome {
            winner: Winner::Side(side.opposite()),
            reason: EndReason::Checkmate,
        })
    }

    fn adjust_material(&mut self, color: Color, delta: i32) {
        match color {
            Color::White => self.material += delta,
            Color::Black => self.material -= delta,
        }
    }

    fn credit_capture(&mut self, capturer: Color, kind: PieceKind) {
        self.adjust_material(capturer, kind.value());
        match capturer {
            Color::White => self.captured_by_white.push(kind),
            Color::Black => self.captured_by_black.push(kind),
        }
    }

    fn uncredit_capture(&mut self, capturer: Color, kind: PieceKind) {
        self.adjust_material(capturer, -kind.value());
        let list = match capturer {
            Color::White => &mut self.captured_by_white,
            Color::Black => &mut self.captured_by_black,
        };
        if let Some(i) = list.iter().rposition(|&k| k == kind) {
            list.remove(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn play(game: &mut GameState, code: &str) {
        let mv = Move::from_uci(code).unwrap();
        game.play(&mv).unwrap_or_else(|e| panic!("{code}: {e}"));
    }

    #[test]
    fn select_rejections_leave_state_alone() {
        let mut game = GameState::new();
        assert_eq!(game.select(sq("e4")), Err(RulesError::EmptySquare(sq("e4"))));
        assert_eq!(game.select(sq("e7")), Err(RulesError::WrongSide(sq("e7"))));
        assert_eq!(game.phase(), &Phase::Idle);

        game.select(sq("g1")).unwrap();
        assert_eq!(game.selected(), Some(sq("g1")));
        assert_eq!(game.selected_moves().len(), 2);

        assert_eq!(game.select(sq("e7")), Err(RulesError::WrongSide(sq("e7"))));
        assert_eq!(game.selected(), Some(sq("g1")));
    }

    #[test]
    fn move_requires_selection_and_listed_target() {
        let mut game = GameState::new();
        assert_eq!(game.move_to(sq("e4")), Err(RulesError::NothingSelected));
        game.select(sq("e2")).unwrap();
        assert_eq!(
            game.move_to(sq("e5")),
            Err(RulesError::IllegalMove { from: sq("e2"), to: sq("e5") })
        );
        game.move_to(sq("e4")).unwrap();
        assert_eq!(game.side_to_move(), Color::Black);
        assert_eq!(game.double_step(), Some(sq("e4")));
        assert_eq!(game.phase(), &Phase::Idle);
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn fools_mate() {
        let mut game = GameState::new();
        for code in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            play(&mut game, code);
        }
        assert_eq!(
            game.outcome(),
            Some(Outcome {
                winner: Winner::Side(Color::Black),
                reason: EndReason::Checkmate,
            })
        );
        assert!(legal_moves(game.board(), Color::White, game.double_step()).is_empty());
        assert_eq!(game.select(sq("e2")), Err(RulesError::GameOver));
    }

    #[test]
    fn capture_updates_material_and_undo_reverts_it() {
        let mut game = GameState::new();
        for code in ["e2e4", "d7d5", "e4d5"] {
            play(&mut game, code);
        }
        assert_eq!(game.material(), 1);
        assert_eq!(game.captured_by(Color::White), &[PieceKind::Pawn]);

        play(&mut game, "d8d5");
        assert_eq!(game.material(), 0);
        assert_eq!(game.captured_by(Color::Black), &[PieceKind::Pawn]);

        assert!(game.undo());
        assert!(game.undo());
        assert_eq!(game.material(), 0);
        assert!(game.captured_by(Color::White).is_empty());
        assert_eq!(game.board().get(sq("d5")).unwrap().color, Color::Black);
        assert_eq!(game.board().get(sq("e4")).unwrap().kind, PieceKind::Pawn);
    }

    #[test]
    fn undo_on_fresh_game_is_noop() {
        let mut game = GameState::new();
        assert!(!game.undo());
        assert_eq!(game.board(), &Board::new());
        assert_eq!(game.repetition_count(&game.signature()), 1);
    }

    #[test]
    fn castling_moves_rook_and_undo_restores_it() {
        let mut game = GameState::from_placement("r3k3/8/8/8/8/8/8/4K2R", Color::White).unwrap();
        play(&mut game, "e1g1");
        let rook = game.board().get(sq("f1")).unwrap();
        assert_eq!(rook.kind, PieceKind::Rook);
        assert!(rook.has_moved);
        assert!(game.board().is_empty(sq("h1")));

        play(&mut game, "a8a7");
        assert!(game.undo());
        assert!(game.undo());
        let rook = game.board().get(sq("h1")).unwrap();
        assert!(!rook.has_moved);
        let king = game.board().get(sq("e1")).unwrap();
        assert_eq!(king.kind, PieceKind::King);
        assert!(!king.has_moved);
        assert!(game.legal_moves_from(sq("e1")).contains(&sq("g1")));
    }

    #[test]
    fn en_passant_capture_and_undo() {
        let mut game = GameState::new();
        for code in ["e2e4", "a7a6", "e4e5", "d7d5"] {
            play(&mut game, code);
        }
        assert!(game.legal_moves_from(sq("e5")).contains(&sq("d6")));
        let before = game.signature();

        play(&mut game, "e5d6");
        assert!(game.board().is_empty(sq("d5")));
        assert_eq!(game.material(), 1);
        let entry = game.history().last().unwrap();
        assert_eq!(entry.en_passant.as_ref().map(|e| e.square), Some(sq("d5")));

        assert!(game.undo());
        assert_eq!(game.signature(), before);
        assert_eq!(game.material(), 0);
        assert_eq!(game.double_step(), Some(sq("d5")));
        assert!(game.legal_moves_from(sq("e5")).contains(&sq("d6")));
    }

    #[test]
    fn promotion_waits_for_a_kind() {
        let mut game = GameState::from_placement("7k/P7/8/8/8/8/8/4K3", Color::White).unwrap();
        play_without_promotion(&mut game, "a7a8");
        assert_eq!(game.pending_promotion(), Some(sq("a8")));
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.select(sq("e1")), Err(RulesError::PromotionPending));
        assert_eq!(game.promote(PieceKind::King), Err(RulesError::InvalidPromotion(PieceKind::King)));
        assert_eq!(game.promote(PieceKind::Pawn), Err(RulesError::InvalidPromotion(PieceKind::Pawn)));
        assert_eq!(game.pending_promotion(), Some(sq("a8")));

        game.promote(PieceKind::Queen).unwrap();
        assert_eq!(game.board().get(sq("a8")).unwrap().kind, PieceKind::Queen);
        assert_eq!(game.material(), 8);
        assert_eq!(game.side_to_move(), Color::Black);
        assert_eq!(game.phase(), &Phase::Idle);
        assert_eq!(game.promote(PieceKind::Queen), Err(RulesError::NoPromotionPending));

        assert!(game.undo());
        let pawn = game.board().get(sq("a7")).unwrap();
        assert_eq!(pawn.kind, PieceKind::Pawn);
        assert!(game.board().is_empty(sq("a8")));
        assert_eq!(game.material(), 0);
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.repetitions().values().sum::<u32>(), 1);
    }

    fn play_without_promotion(game: &mut GameState, code: &str) {
        let mv = Move::from_uci(code).unwrap();
        game.select(mv.from).unwrap();
        game.move_to(mv.to).unwrap();
    }

    #[test]
    fn undo_while_promotion_pending_keeps_side() {
        let mut game = GameState::from_placement("7k/P7/8/8/8/8/8/4K3", Color::White).unwrap();
        play_without_promotion(&mut game, "a7a8");
        assert!(game.undo());
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.phase(), &Phase::Idle);
        assert_eq!(game.board().get(sq("a7")).unwrap().kind, PieceKind::Pawn);
        assert_eq!(game.repetitions().values().sum::<u32>(), 1);
    }

    #[test]
    fn promotion_can_checkmate() {
        let mut game = GameState::from_placement("7k/P5pp/8/8/8/8/8/4K3", Color::White).unwrap();
        play(&mut game, "a7a8q");
        assert_eq!(
            game.outcome(),
            Some(Outcome {
                winner: Winner::Side(Color::White),
                reason: EndReason::Checkmate,
            })
        );
        assert!(game.undo());
        assert!(!game.is_over());
    }

    #[test]
    fn stalemate_after_promotion_is_not_detected() {
        // Knight promotion leaves Black with no moves and no check, but only
        // checkmate is tested after a promotion.
        let mut game = GameState::from_placement("7k/P7/6K1/8/2B5/8/8/8", Color::White).unwrap();
        play(&mut game, "a7a8n");
        assert!(!game.is_in_check());
        assert!(game.legal_moves().is_empty());
        assert!(!game.is_over());
    }

    #[test]
    fn ordinary_move_into_stalemate_ends_the_game() {
        let mut game = GameState::from_placement("7k/8/6K1/8/8/8/8/N2B4", Color::White).unwrap();
        play(&mut game, "d1b3");
        assert_eq!(game.outcome(), Some(Outcome::draw(EndReason::Stalemate)));
    }

    #[test]
    fn insufficient_material_after_capture() {
        let mut game = GameState::from_placement("4k3/8/8/8/8/8/3n4/2B1K3", Color::White).unwrap();
        play(&mut game, "c1d2");
        assert_eq!(game.outcome(), Some(Outcome::draw(EndReason::InsufficientMaterial)));

        let mut game = GameState::from_placement("4k3/8/8/8/8/8/3n4/3RK3", Color::White).unwrap();
        play(&mut game, "d1d2");
        assert!(!game.is_over());
    }

    #[test]
    fn setup_validation() {
        assert_eq!(
            GameState::from_placement("8/8/8/8/8/8/8/4K3", Color::White).unwrap_err(),
            SetupError::KingCount { color: Color::Black, count: 0 }
        );
        assert_eq!(
            GameState::from_placement("4k3/8/8/8/8/8/8/P3K3", Color::White).unwrap_err(),
            SetupError::PawnOnBackRank(sq("a1"))
        );
    }

    #[test]
    fn rejected_external_move_clears_selection_only() {
        let mut game = GameState::new();
        let before = game.signature();
        let err = game.play(&Move::from_uci("e2e5").unwrap()).unwrap_err();
        assert_eq!(err, RulesError::IllegalMove { from: sq("e2"), to: sq("e5") });
        assert_eq!(game.phase(), &Phase::Idle);
        assert_eq!(game.signature(), before);
        assert!(game.history().is_empty());
    }
}
