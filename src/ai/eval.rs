use crate::board::{BOARD_SIZE, Board, Coord, Side};
use crate::rules;

/// Classic Othello square weights, indexed `[row][col]`.
pub const SQUARE_WEIGHTS: [[i32; BOARD_SIZE]; BOARD_SIZE] = [
    [100, -20, 10, 5, 5, 10, -20, 100],
    [-20, -50, -2, -2, -2, -2, -50, -20],
    [10, -2, -1, -1, -1, -1, -2, 10],
    [5, -2, -1, -1, -1, -1, -2, 5],
    [5, -2, -1, -1, -1, -1, -2, 5],
    [10, -2, -1, -1, -1, -1, -2, 10],
    [-20, -50, -2, -2, -2, -2, -50, -20],
    [100, -20, 10, 5, 5, 10, -20, 100],
];

/// Above this many discs the disc differential replaces mobility.
const LATE_GAME_DISCS: u8 = 50;
const DISC_WEIGHT: i32 = 10;
const MOBILITY_WEIGHT: i32 = 5;

/// Static score of `board` from `side`'s perspective.
pub fn evaluate(board: &Board, side: Side) -> i32 {
    positional(board, side) + phase_term(board, side)
}

/// Weighted sum of own squares minus weighted sum of opponent squares.
pub fn positional(board: &Board, side: Side) -> i32 {
    weight_sum(board.bits(side)) - weight_sum(board.bits(side.opponent()))
}

fn phase_term(board: &Board, side: Side) -> i32 {
    let opponent = side.opponent();

    if board.disc_count() > LATE_GAME_DISCS {
        let score = rules::score(board);
        DISC_WEIGHT * (score.of(side) as i32 - score.of(opponent) as i32)
    } else {
        let mine = rules::legal_mask(board, side).count_ones() as i32;
        let theirs = rules::legal_mask(board, opponent).count_ones() as i32;
        MOBILITY_WEIGHT * (mine - theirs)
    }
}

fn weight_sum(mask: u64) -> i32 {
    rules::mask_to_coords(mask)
        .into_iter()
        .map(square_weight)
        .sum()
}

fn square_weight(coord: Coord) -> i32 {
    SQUARE_WEIGHTS[coord.row() as usize][coord.col() as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_position_is_balanced() {
        let board = Board::new();

        assert_eq!(evaluate(&board, Side::Black), 0);
        assert_eq!(evaluate(&board, Side::White), 0);
    }

    #[test]
    fn weight_table_is_symmetric() {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let w = SQUARE_WEIGHTS[row][col];
                assert_eq!(w, SQUARE_WEIGHTS[col][row]);
                assert_eq!(w, SQUARE_WEIGHTS[BOARD_SIZE - 1 - row][col]);
                assert_eq!(w, SQUARE_WEIGHTS[row][BOARD_SIZE - 1 - col]);
            }
        }
    }

    #[test]
    fn corners_count_for_owner_and_against_opponent() {
        // Isolated corners: nobody can move, so only position matters.
        let board = Board::from_rows([
            "B......B",
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
            "W.......",
        ]);

        assert_eq!(positional(&board, Side::Black), 100);
        assert_eq!(evaluate(&board, Side::Black), 100);
        assert_eq!(evaluate(&board, Side::White), -100);
    }

    #[test]
    fn early_game_adds_mobility_differential() {
        let board = rules::apply_move(&Board::new(), Side::Black, Coord::new(2, 3).unwrap())
            .unwrap();
        let mine = rules::legal_moves(&board, Side::Black).len() as i32;
        let theirs = rules::legal_moves(&board, Side::White).len() as i32;

        assert_eq!(
            evaluate(&board, Side::Black),
            positional(&board, Side::Black) + 5 * (mine - theirs)
        );
        assert_eq!(
            evaluate(&board, Side::White),
            positional(&board, Side::White) + 5 * (theirs - mine)
        );
    }

    #[test]
    fn late_game_uses_disc_differential() {
        // 60 black discs, 1 white disc, nothing else.
        let white = Coord::new(3, 3).unwrap().bit();
        let empty = Coord::new(0, 0).unwrap().bit()
            | Coord::new(0, 7).unwrap().bit()
            | Coord::new(7, 0).unwrap().bit();
        let black = u64::MAX & !white & !empty;
        let board = Board::from_bitboards(black, white);
        assert!(board.disc_count() > 50);

        let expected = positional(&board, Side::Black) + 10 * (60 - 1);
        assert_eq!(evaluate(&board, Side::Black), expected);
        assert_eq!(
            evaluate(&board, Side::White),
            positional(&board, Side::White) - 10 * (60 - 1)
        );
    }
}
