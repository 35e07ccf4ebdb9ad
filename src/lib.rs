use wasm_bindgen::prelude::*;

pub mod ai;
pub mod api;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod rules;
pub mod types;

pub use ai::search::{MAX_DEPTH, best_move};
pub use board::{Board, Cell, Coord, Move, Score, Side};
pub use error::{BoardDecodeError, ConfigError, GameError, IllegalMoveError};
pub use game::{GameSession, TurnState, Winner};
pub use rules::{apply_move, is_legal, is_terminal, legal_moves, score};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
