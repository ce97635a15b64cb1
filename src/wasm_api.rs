use crate::game::{EndReason, GameState, Phase, Winner};
use crate::piece::{Color, PieceKind};
use crate::square::Square;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct SquarePiece {
    kind: PieceKind,
    color: Color,
}

#[derive(Serialize)]
struct OutcomeJson {
    winner: Option<Color>,
    reason: EndReason,
}

#[derive(Serialize)]
struct BoardState {
    /// Indexed `[rank][file]`, rank 0 is White's back rank.
    squares: Vec<Vec<Option<SquarePiece>>>,
    side_to_move: Color,
    phase: &'static str,
    selected: Option<[usize; 2]>,
    selected_moves: Vec<[usize; 2]>,
    pending_promotion: Option<[usize; 2]>,
    outcome: Option<OutcomeJson>,
    is_in_check: bool,
    material: i32,
    captured_white: Vec<PieceKind>,
    captured_black: Vec<PieceKind>,
    last_move: Option<[[usize; 2]; 2]>,
    fen: String,
}

#[derive(Serialize)]
struct MoveResult {
    #[serde(flatten)]
    board_state: Option<BoardState>,
    error: Option<String>,
}

fn coords(sq: Square) -> [usize; 2] {
    [sq.file, sq.rank]
}

fn square_at(file: usize, rank: usize) -> Result<Square, String> {
    if file < 8 && rank < 8 {
        Ok(Square::new(file, rank))
    } else {
        Err(format!("no square at file {file}, rank {rank}"))
    }
}

fn string_to_piece_kind(s: &str) -> Option<PieceKind> {
    match s {
        "Queen" => Some(PieceKind::Queen),
        "Rook" => Some(PieceKind::Rook),
        "Bishop" => Some(PieceKind::Bishop),
        "Knight" => Some(PieceKind::Knight),
        _ => None,
    }
}

fn build_board_state(game: &GameState) -> BoardState {
    let board = game.board();
    let squares = board
        .squares
        .iter()
        .map(|row| {
            row.iter()
                .map(|slot| slot.map(|p| SquarePiece { kind: p.kind, color: p.color }))
                .collect()
        })
        .collect();

    let phase = match game.phase() {
        Phase::Idle => "idle",
        Phase::Selected { .. } => "selected",
        Phase::AwaitingPromotion { .. } => "promotion",
        Phase::Over(_) => "over",
    };

    BoardState {
        squares,
        side_to_move: game.side_to_move(),
        phase,
        selected: game.selected().map(coords),
        selected_moves: game.selected_moves().iter().copied().map(coords).collect(),
        pending_promotion: game.pending_promotion().map(coords),
        outcome: game.outcome().map(|o| OutcomeJson {
            winner: match o.winner {
                Winner::Side(color) => Some(color),
                Winner::Draw => None,
            },
            reason: o.reason,
        }),
        is_in_check: game.is_in_check(),
        material: game.material(),
        captured_white: game.captured_by(Color::White).to_vec(),
        captured_black: game.captured_by(Color::Black).to_vec(),
        last_move: game.history().last().map(|e| [coords(e.from), coords(e.to)]),
        fen: game.to_fen(),
    }
}

fn respond(game: &GameState, result: Result<(), String>) -> JsValue {
    let reply = match result {
        Ok(()) => MoveResult {
            board_state: Some(build_board_state(game)),
            error: None,
        },
        Err(err) => MoveResult {
            board_state: None,
            error: Some(err),
        },
    };
    serde_wasm_bindgen::to_value(&reply).unwrap_or(JsValue::NULL)
}

#[wasm_bindgen]
pub struct Game {
    state: GameState,
}

#[wasm_bindgen]
impl Game {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Game {
        Game {
            state: GameState::new(),
        }
    }

    pub fn get_board_state(&self) -> JsValue {
        let state = build_board_state(&self.state);
        serde_wasm_bindgen::to_value(&state).unwrap_or(JsValue::NULL)
    }

    pub fn select(&mut self, file: usize, rank: usize) -> JsValue {
        let result = square_at(file, rank)
            .and_then(|sq| self.state.select(sq).map_err(|e| e.to_string()));
        respond(&self.state, result)
    }

    pub fn move_to(&mut self, file: usize, rank: usize) -> JsValue {
        let result = square_at(file, rank)
            .and_then(|to| self.state.move_to(to).map_err(|e| e.to_string()));
        respond(&self.state, result)
    }

    pub fn promote(&mut self, kind: &str) -> JsValue {
        let result = match string_to_piece_kind(kind) {
            Some(kind) => self.state.promote(kind).map_err(|e| e.to_string()),
            None => Err(format!("unknown promotion piece '{kind}'")),
        };
        respond(&self.state, result)
    }

    pub fn undo(&mut self) -> bool {
        self.state.undo()
    }

    pub fn get_legal_moves_for_square(&self, file: usize, rank: usize) -> JsValue {
        let moves: Vec<[usize; 2]> = square_at(file, rank)
            .map(|sq| self.state.legal_moves_from(sq))
            .ok()
            .unwrap_or_default()
            .into_iter()
            .map(coords)
            .collect();
        serde_wasm_bindgen::to_value(&moves).unwrap_or(JsValue::NULL)
    }

    pub fn fen(&self) -> String {
        self.state.to_fen()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
