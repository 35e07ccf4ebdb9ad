use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BoardDecodeError, CoordError};

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Black,
    White,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    /// Wire code used by `to_array`: 1=black, 2=white.
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Black => 1,
            Side::White => 2,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Side::Black),
            2 => Some(Side::White),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Black => f.write_str("black"),
            Side::White => f.write_str("white"),
        }
    }
}

/// Content of a single square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Black,
    White,
}

impl Cell {
    pub fn side(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::Black => Some(Side::Black),
            Cell::White => Some(Side::White),
        }
    }

    pub fn to_u8(self) -> u8 {
        self.side().map_or(0, Side::to_u8)
    }
}

impl From<Side> for Cell {
    fn from(side: Side) -> Self {
        match side {
            Side::Black => Cell::Black,
            Side::White => Cell::White,
        }
    }
}

/// A checked board coordinate. Both components are always in `0..8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    row: u8,
    col: u8,
}

impl Coord {
    pub fn new(row: u8, col: u8) -> Result<Self, CoordError> {
        if (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE {
            Ok(Self { row, col })
        } else {
            Err(CoordError { row, col })
        }
    }

    /// Builds a coordinate from a row-major square index.
    pub fn from_index(index: usize) -> Result<Self, CoordError> {
        if index < NUM_SQUARES {
            Ok(Self {
                row: (index / BOARD_SIZE) as u8,
                col: (index % BOARD_SIZE) as u8,
            })
        } else {
            Err(CoordError {
                row: (index / BOARD_SIZE).min(u8::MAX as usize) as u8,
                col: (index % BOARD_SIZE) as u8,
            })
        }
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    pub fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    pub(crate) fn bit(self) -> u64 {
        1u64 << self.index()
    }

    /// Lowest set bit of a non-empty mask.
    pub(crate) fn from_lowest_bit(mask: u64) -> Self {
        debug_assert!(mask != 0, "from_lowest_bit() requires a non-empty mask");
        let index = mask.trailing_zeros() as usize;
        Self {
            row: (index / BOARD_SIZE) as u8,
            col: (index % BOARD_SIZE) as u8,
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A placement by one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub side: Side,
    pub coord: Coord,
}

/// Disc counts. Always derived from a board, never stored beside one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    pub black: u8,
    pub white: u8,
}

impl Score {
    pub fn of(self, side: Side) -> u8 {
        match side {
            Side::Black => self.black,
            Side::White => self.white,
        }
    }

    pub fn total(self) -> u8 {
        self.black + self.white
    }

    /// Side with more discs, `None` on equal counts.
    pub fn leader(self) -> Option<Side> {
        use std::cmp::Ordering;

        match self.black.cmp(&self.white) {
            Ordering::Greater => Some(Side::Black),
            Ordering::Less => Some(Side::White),
            Ordering::Equal => None,
        }
    }
}

/// Reversi board snapshot represented by two disjoint bitboards.
/// Bit `row * 8 + col` is set when that square holds a disc of the side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    black: u64,
    white: u64,
}

impl Board {
    /// Creates the initial board:
    /// (3,3)=white, (3,4)=black, (4,3)=black, (4,4)=white.
    pub fn new() -> Self {
        Self {
            black: bit(28) | bit(35),
            white: bit(27) | bit(36),
        }
    }

    pub fn empty() -> Self {
        Self { black: 0, white: 0 }
    }

    /// Builds a board from raw masks, rejecting squares claimed by both sides.
    pub fn try_from_bitboards(black: u64, white: u64) -> Result<Self, BoardDecodeError> {
        let overlap = black & white;
        if overlap != 0 {
            return Err(BoardDecodeError::OverlappingDiscs(overlap));
        }
        Ok(Self { black, white })
    }

    /// Unchecked variant for masks the crate built itself.
    pub(crate) fn from_bitboards(black: u64, white: u64) -> Self {
        debug_assert_eq!(black & white, 0, "bitboards must not overlap");
        Self { black, white }
    }

    /// Decodes a flat row-major board where 0=empty, 1=black, 2=white.
    pub fn from_cells(cells: &[u8]) -> Result<Self, BoardDecodeError> {
        if cells.len() != NUM_SQUARES {
            return Err(BoardDecodeError::WrongLength(cells.len()));
        }

        let mut board = Self::empty();
        for (index, &value) in cells.iter().enumerate() {
            match value {
                0 => {}
                1 => board.black |= bit(index),
                2 => board.white |= bit(index),
                _ => return Err(BoardDecodeError::InvalidCell { index, value }),
            }
        }
        Ok(board)
    }

    /// Test helper: eight rows of `B`, `W` or `.`.
    #[cfg(test)]
    pub(crate) fn from_rows(rows: [&str; BOARD_SIZE]) -> Self {
        let mut board = Self::empty();
        for (row, line) in rows.iter().enumerate() {
            assert_eq!(line.len(), BOARD_SIZE, "row {row} must have 8 cells");
            for (col, ch) in line.chars().enumerate() {
                let square = bit(row * BOARD_SIZE + col);
                match ch {
                    'B' => board.black |= square,
                    'W' => board.white |= square,
                    '.' => {}
                    other => panic!("unexpected cell {other:?} at ({row}, {col})"),
                }
            }
        }
        board
    }

    pub fn cell(&self, coord: Coord) -> Cell {
        let square = coord.bit();
        if (self.black & square) != 0 {
            Cell::Black
        } else if (self.white & square) != 0 {
            Cell::White
        } else {
            Cell::Empty
        }
    }

    /// Occupancy mask for one side.
    pub fn bits(&self, side: Side) -> u64 {
        match side {
            Side::Black => self.black,
            Side::White => self.white,
        }
    }

    pub fn occupied(&self) -> u64 {
        self.black | self.white
    }

    /// Returns `(black_count, white_count)`.
    pub fn count(&self) -> (u8, u8) {
        (self.black.count_ones() as u8, self.white.count_ones() as u8)
    }

    pub fn disc_count(&self) -> u8 {
        self.occupied().count_ones() as u8
    }

    /// Returns the number of empty squares.
    pub fn empty_count(&self) -> u8 {
        NUM_SQUARES as u8 - self.disc_count()
    }

    /// Converts board to `[u8; 64]` where 0=empty, 1=black, 2=white.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut board = [0u8; NUM_SQUARES];
        for (pos, cell) in board.iter_mut().enumerate() {
            let square = bit(pos);
            *cell = if (self.black & square) != 0 {
                1
            } else if (self.white & square) != 0 {
                2
            } else {
                0
            };
        }
        board
    }

    /// New snapshot with `placed | flips` owned by `side` and `flips`
    /// removed from the opponent. Legality is the caller's concern.
    pub(crate) fn with_placement(&self, side: Side, placed: u64, flips: u64) -> Self {
        let me = self.bits(side) | placed | flips;
        let opp = self.bits(side.opponent()) & !flips;
        match side {
            Side::Black => Self {
                black: me,
                white: opp,
            },
            Side::White => Self {
                black: opp,
                white: me,
            },
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, cell) in self.to_array().iter().enumerate() {
            let ch = match cell {
                1 => 'B',
                2 => 'W',
                _ => '.',
            };
            write!(f, "{ch}")?;
            if pos % BOARD_SIZE == BOARD_SIZE - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

fn bit(pos: usize) -> u64 {
    if pos < NUM_SQUARES { 1u64 << pos } else { 0 }
}
