//! Move legality, flipping and game-end detection.
//!
//! Every function takes a board snapshot by reference and never mutates it;
//! moves produce a fresh `Board`.

use crate::board::{BOARD_SIZE, Board, Coord, NUM_SQUARES, Score, Side};
use crate::error::{IllegalMoveError, IllegalReason};

/// N, S, E, W, NE, NW, SE, SW as `(d_row, d_col)`.
const DIRECTIONS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, -1),
    (1, 1),
    (1, -1),
];

pub fn is_legal(board: &Board, side: Side, coord: Coord) -> bool {
    collect_flips(board, side, coord) != 0
}

/// Bit mask of every legal target square for `side`.
pub fn legal_mask(board: &Board, side: Side) -> u64 {
    let empty = !board.occupied();
    let mut legal = 0u64;

    for pos in 0..NUM_SQUARES {
        let square = 1u64 << pos;
        if (empty & square) == 0 {
            continue;
        }
        let coord = Coord::from_lowest_bit(square);
        if collect_flips(board, side, coord) != 0 {
            legal |= square;
        }
    }

    legal
}

/// Legal moves in row-major order. Empty means `side` must pass.
pub fn legal_moves(board: &Board, side: Side) -> Vec<Coord> {
    mask_to_coords(legal_mask(board, side))
}

pub fn has_legal_move(board: &Board, side: Side) -> bool {
    legal_mask(board, side) != 0
}

/// Squares that playing `coord` would flip; empty when the move is illegal.
pub fn flips(board: &Board, side: Side, coord: Coord) -> Vec<Coord> {
    mask_to_coords(collect_flips(board, side, coord))
}

/// Places a disc for `side` and flips every trapped run.
pub fn apply_move(board: &Board, side: Side, coord: Coord) -> Result<Board, IllegalMoveError> {
    if (board.occupied() & coord.bit()) != 0 {
        return Err(IllegalMoveError {
            side,
            coord,
            reason: IllegalReason::Occupied,
        });
    }

    let flips = collect_flips(board, side, coord);
    if flips == 0 {
        return Err(IllegalMoveError {
            side,
            coord,
            reason: IllegalReason::NoFlips,
        });
    }

    Ok(board.with_placement(side, coord.bit(), flips))
}

/// Applies a move already known to be legal (taken from `legal_mask`).
pub(crate) fn apply_legal(board: &Board, side: Side, coord: Coord) -> Board {
    let flips = collect_flips(board, side, coord);
    debug_assert!(flips != 0, "apply_legal() called with an illegal move");
    board.with_placement(side, coord.bit(), flips)
}

pub fn score(board: &Board) -> Score {
    let (black, white) = board.count();
    Score { black, white }
}

/// True when neither side has a legal move.
pub fn is_terminal(board: &Board) -> bool {
    !has_legal_move(board, Side::Black) && !has_legal_move(board, Side::White)
}

/// Splits a mask into coordinates, lowest index (row-major) first.
pub fn mask_to_coords(mask: u64) -> Vec<Coord> {
    let mut bits = mask;
    let mut out = Vec::with_capacity(bits.count_ones() as usize);

    while bits != 0 {
        out.push(Coord::from_lowest_bit(bits));
        bits &= bits - 1;
    }

    out
}

/// Union of the trapped runs over all eight rays, each scanned on the
/// unmodified input board.
fn collect_flips(board: &Board, side: Side, coord: Coord) -> u64 {
    let me = board.bits(side);
    let opp = board.bits(side.opponent());

    if ((me | opp) & coord.bit()) != 0 {
        return 0;
    }

    let row = coord.row() as i32;
    let col = coord.col() as i32;
    let mut flips = 0u64;

    for (dr, dc) in DIRECTIONS {
        let mut r = row + dr;
        let mut c = col + dc;
        let mut line = 0u64;

        while in_bounds(r, c) {
            let square = 1u64 << ((r as usize) * BOARD_SIZE + c as usize);
            if (opp & square) != 0 {
                line |= square;
            } else {
                if (me & square) != 0 {
                    flips |= line;
                }
                break;
            }

            r += dr;
            c += dc;
        }
    }

    flips
}

fn in_bounds(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}
