use std::fmt;

use thiserror::Error;

use crate::board::{Coord, Side};

/// A row/col pair outside the 8x8 board.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("coordinate ({row}, {col}) is outside the 8x8 board")]
pub struct CoordError {
    pub row: u8,
    pub col: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalReason {
    /// The target square already holds a disc.
    Occupied,
    /// No ray traps an opponent run.
    NoFlips,
}

impl fmt::Display for IllegalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IllegalReason::Occupied => f.write_str("square is occupied"),
            IllegalReason::NoFlips => f.write_str("no discs would be flipped"),
        }
    }
}

/// Returned by `rules::apply_move`; the input board is left as it was.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("illegal move for {side} at {coord}: {reason}")]
pub struct IllegalMoveError {
    pub side: Side,
    pub coord: Coord,
    pub reason: IllegalReason,
}

/// Failure to decode a flat board coming from the JS side.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BoardDecodeError {
    #[error("board must have 64 cells, got {0}")]
    WrongLength(usize),

    #[error("cell #{index} has invalid value {value} (expected 0, 1 or 2)")]
    InvalidCell { index: usize, value: u8 },

    #[error("invalid player value {0} (expected 1=black or 2=white)")]
    InvalidPlayer(u8),

    #[error("squares {0:#018x} hold both a black and a white disc")]
    OverlappingDiscs(u64),
}

/// A configuration value outside what the engine supports.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("search depth must be between 1 and {max}, got {depth}")]
    DepthOutOfRange { depth: u8, max: u8 },
}

/// Rejections from `GameSession`. On every variant the session is unchanged.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("game is already over")]
    GameOver,

    #[error("it is not {0}'s turn")]
    NotYourTurn(Side),

    #[error("a computer reply is being computed")]
    ReplyPending,

    #[error("no computer reply is pending")]
    NoReplyPending,

    #[error("reply was computed for a different position")]
    StaleReply,

    #[error(transparent)]
    Illegal(#[from] IllegalMoveError),

    #[error(transparent)]
    Coord(#[from] CoordError),
}
