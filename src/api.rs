//! Browser-facing bindings. Boards cross the boundary as flat
//! `Uint8Array`s (0=empty, 1=black, 2=white), players as 1 or 2.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::ai::search;
use crate::board::{Board, Coord, Side};
use crate::config::GameConfig;
use crate::error::BoardDecodeError;
use crate::game::GameSession;
use crate::rules;
use crate::types::{GameResult, GameState, Position};

#[wasm_bindgen(js_name = createInitialBoard)]
pub fn create_initial_board() -> Vec<u8> {
    Board::new().to_array().to_vec()
}

/// Legal moves as `[{row, col}, ...]` in row-major order.
#[wasm_bindgen(js_name = legalMoves)]
pub fn legal_moves(board: &[u8], player: u8) -> Result<JsValue, JsValue> {
    let board = decode_board(board)?;
    let side = decode_side(player)?;
    let moves: Vec<Position> = rules::legal_moves(&board, side)
        .into_iter()
        .map(Position::from)
        .collect();
    to_js(&moves)
}

#[wasm_bindgen(js_name = applyMove)]
pub fn apply_move(board: &[u8], player: u8, row: u8, col: u8) -> Result<Vec<u8>, JsValue> {
    let board = decode_board(board)?;
    let side = decode_side(player)?;
    let coord = Coord::new(row, col).map_err(to_js_error)?;
    let next = rules::apply_move(&board, side, coord).map_err(to_js_error)?;
    Ok(next.to_array().to_vec())
}

/// `{black, white}` disc counts.
#[wasm_bindgen]
pub fn score(board: &[u8]) -> Result<JsValue, JsValue> {
    let board = decode_board(board)?;
    to_js(&rules::score(&board))
}

#[wasm_bindgen(js_name = isTerminal)]
pub fn is_terminal(board: &[u8]) -> Result<bool, JsValue> {
    let board = decode_board(board)?;
    Ok(rules::is_terminal(&board))
}

/// `{row, col}` or `null` when the player must pass.
#[wasm_bindgen(js_name = bestMove)]
pub fn best_move(board: &[u8], player: u8) -> Result<JsValue, JsValue> {
    let board = decode_board(board)?;
    let side = decode_side(player)?;
    to_js(&search::best_move(&board, side).map(Position::from))
}

/// A game against the engine.
#[wasm_bindgen]
pub struct WasmGame {
    session: GameSession,
}

#[wasm_bindgen]
impl WasmGame {
    /// `config` may be `undefined` or a partial `GameConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmGame, JsValue> {
        let config: GameConfig = if config.is_undefined() || config.is_null() {
            GameConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let config = config.validate().map_err(to_js_error)?;
        Ok(Self {
            session: GameSession::new(config),
        })
    }

    pub fn play(&mut self, row: u8, col: u8) -> Result<JsValue, JsValue> {
        self.session.play_at(row, col).map_err(to_js_error)?;
        self.state()
    }

    /// Searches and applies one engine move (or pass).
    #[wasm_bindgen(js_name = computerReply)]
    pub fn computer_reply(&mut self) -> Result<JsValue, JsValue> {
        self.session.play_computer_reply().map_err(to_js_error)?;
        self.state()
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&GameState::from_session(&self.session))
    }

    /// `null` until the game is over.
    pub fn result(&self) -> Result<JsValue, JsValue> {
        to_js(&GameResult::from_session(&self.session))
    }
}

fn decode_board(cells: &[u8]) -> Result<Board, JsValue> {
    Board::from_cells(cells).map_err(to_js_error)
}

fn decode_side(player: u8) -> Result<Side, JsValue> {
    Side::from_u8(player).ok_or_else(|| to_js_error(BoardDecodeError::InvalidPlayer(player)))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
