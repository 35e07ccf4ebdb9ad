use std::time::Duration;

use web_time::Instant;

use crate::ai::eval;
use crate::board::{Board, Coord, Side};
use crate::config::SearchConfig;
use crate::rules;

/// Default search depth in plies.
pub const MAX_DEPTH: u8 = 4;
const MIN_SCORE: i32 = i32::MIN;
const MAX_SCORE: i32 = i32::MAX;

/// Counters collected during one `Searcher::search` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions visited by `minimax`, leaves included.
    pub nodes: u64,
    /// Calls to the static evaluator.
    pub evaluations: u64,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    /// `None` when the side to move has no legal move and must pass.
    pub best: Option<Coord>,
    /// Minimax value of `best` from the searching side's perspective.
    pub value: Option<i32>,
    pub stats: SearchStats,
}

/// Depth-bounded minimax with optional alpha-beta cutoffs.
#[derive(Debug, Clone)]
pub struct Searcher {
    config: SearchConfig,
    stats: SearchStats,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            stats: SearchStats::default(),
        }
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Picks the move for `side` with the greatest minimax value.
    /// Moves are tried in row-major order and ties keep the earlier move.
    pub fn search(&mut self, board: &Board, side: Side) -> SearchOutcome {
        let start_time = Instant::now();
        self.stats = SearchStats::default();

        let moves = rules::legal_moves(board, side);
        let Some(&first) = moves.first() else {
            return SearchOutcome {
                best: None,
                value: None,
                stats: self.finish(start_time),
            };
        };

        let child_depth = self.config.max_depth.saturating_sub(1);
        let mut best_move = first;
        let mut best_value = MIN_SCORE;

        for (i, mv) in moves.into_iter().enumerate() {
            let next = rules::apply_legal(board, side, mv);
            let value = self.minimax(&next, child_depth, MIN_SCORE, MAX_SCORE, false, side);
            if i == 0 || value > best_value {
                best_value = value;
                best_move = mv;
            }
        }

        SearchOutcome {
            best: Some(best_move),
            value: Some(best_value),
            stats: self.finish(start_time),
        }
    }

    /// Value of `board` for `root_side`. `maximizing` selects who moves:
    /// `root_side` when true, its opponent otherwise. A side without moves
    /// passes, which costs one ply but leaves the board unchanged.
    pub fn minimax(
        &mut self,
        board: &Board,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        root_side: Side,
    ) -> i32 {
        self.stats.nodes += 1;

        if depth == 0 || rules::is_terminal(board) {
            self.stats.evaluations += 1;
            return eval::evaluate(board, root_side);
        }

        let side = if maximizing {
            root_side
        } else {
            root_side.opponent()
        };

        let legal = rules::legal_mask(board, side);
        if legal == 0 {
            return self.minimax(board, depth - 1, alpha, beta, !maximizing, root_side);
        }

        let mut best = if maximizing { MIN_SCORE } else { MAX_SCORE };

        for mv in rules::mask_to_coords(legal) {
            let next = rules::apply_legal(board, side, mv);
            let value = self.minimax(&next, depth - 1, alpha, beta, !maximizing, root_side);

            if maximizing {
                best = best.max(value);
                alpha = alpha.max(value);
            } else {
                best = best.min(value);
                beta = beta.min(value);
            }

            if self.config.pruning && beta <= alpha {
                break;
            }
        }

        best
    }

    fn finish(&mut self, start_time: Instant) -> SearchStats {
        self.stats.elapsed = start_time.elapsed();
        self.stats
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

/// Best move for `side` at the default depth; `None` means pass.
pub fn best_move(board: &Board, side: Side) -> Option<Coord> {
    Searcher::default().search(board, side).best
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    const FULL_BOARD: u64 = u64::MAX;

    fn coord(row: u8, col: u8) -> Coord {
        Coord::new(row, col).unwrap()
    }

    fn searcher(max_depth: u8, pruning: bool) -> Searcher {
        Searcher::new(SearchConfig {
            max_depth,
            pruning,
        })
    }

    /// Plays `plies` random legal moves from the initial position, passing
    /// when needed. The returned side is the one to move, after any forced
    /// pass. Stops early at a terminal position.
    fn random_position(rng: &mut StdRng, plies: usize) -> (Board, Side) {
        let mut board = Board::new();
        let mut side = Side::Black;

        for _ in 0..plies {
            if rules::is_terminal(&board) {
                break;
            }
            let moves = rules::legal_moves(&board, side);
            if !moves.is_empty() {
                let mv = moves[rng.random_range(0..moves.len())];
                board = rules::apply_move(&board, side, mv).unwrap();
            }
            side = side.opponent();
        }

        if !rules::has_legal_move(&board, side) {
            side = side.opponent();
        }
        (board, side)
    }

    #[test]
    fn search_returns_none_when_side_must_pass() {
        let black = coord(0, 1).bit();
        let white = FULL_BOARD ^ coord(0, 0).bit() ^ black;
        let board = Board::from_bitboards(black, white);

        let outcome = searcher(4, true).search(&board, Side::Black);

        assert_eq!(outcome.best, None);
        assert_eq!(outcome.value, None);
        assert_eq!(best_move(&board, Side::Black), None);
    }

    #[test]
    fn search_returns_single_legal_move() {
        let black = coord(0, 1).bit();
        let white = FULL_BOARD ^ coord(0, 0).bit() ^ black;
        let board = Board::from_bitboards(black, white);

        assert_eq!(best_move(&board, Side::White), Some(coord(0, 0)));
    }

    #[test]
    fn opening_is_symmetric_so_first_move_wins_ties() {
        // The four opening moves are equivalent under the board's symmetry.
        let board = Board::new();

        assert_eq!(best_move(&board, Side::Black), Some(coord(2, 3)));
    }

    #[test]
    fn shallow_search_prefers_corner_over_centre() {
        // Black can flank (1,1) from the corner or (4,3) from (3,3).
        let board = Board::from_rows([
            "........",
            ".W......",
            "..B.....",
            "........",
            "...W....",
            "...B....",
            "........",
            "........",
        ]);
        assert_eq!(
            rules::legal_moves(&board, Side::Black),
            vec![coord(0, 0), coord(3, 3)]
        );

        let outcome = searcher(1, true).search(&board, Side::Black);

        // (0,0): black 100 - 50 - 1 - 1, white (4,3) -1, mobility 1 - 1 => 49.
        // (3,3): black -1 - 1 - 1 - 1, white (1,1) -50, mobility 1 - 1 => 46.
        assert_eq!(outcome.best, Some(coord(0, 0)));
        assert_eq!(outcome.value, Some(49));
    }

    #[test]
    fn depth_one_picks_best_static_evaluation() {
        let mut rng = StdRng::seed_from_u64(7);
        let (board, side) = std::iter::repeat_with(|| random_position(&mut rng, 12))
            .find(|(board, _)| !rules::is_terminal(board))
            .unwrap();
        let moves = rules::legal_moves(&board, side);

        let mut expected = moves[0];
        let mut expected_value = i32::MIN;
        for &mv in &moves {
            let value = eval::evaluate(&rules::apply_move(&board, side, mv).unwrap(), side);
            if value > expected_value {
                expected_value = value;
                expected = mv;
            }
        }

        let outcome = searcher(1, true).search(&board, side);
        assert_eq!(outcome.best, Some(expected));
        assert_eq!(outcome.value, Some(expected_value));
        assert_eq!(outcome.stats.evaluations, moves.len() as u64);
    }

    #[test]
    fn pass_consumes_a_ply_without_changing_the_board() {
        // White to move has nothing; at depth 1 the pass lands on a leaf
        // evaluated on the same board.
        let white = coord(0, 1).bit();
        let black = FULL_BOARD ^ coord(0, 0).bit() ^ white;
        let board = Board::from_bitboards(black, white);
        assert!(rules::legal_moves(&board, Side::White).is_empty());

        let mut s = searcher(4, true);
        let value = s.minimax(&board, 1, MIN_SCORE, MAX_SCORE, false, Side::Black);

        assert_eq!(value, eval::evaluate(&board, Side::Black));
        assert_eq!(s.stats().nodes, 2);
    }

    #[test]
    fn terminal_position_is_evaluated_immediately() {
        let board = Board::from_bitboards(FULL_BOARD, 0);
        let mut s = searcher(4, true);

        let value = s.minimax(&board, 3, MIN_SCORE, MAX_SCORE, true, Side::White);

        assert_eq!(value, eval::evaluate(&board, Side::White));
        assert_eq!(s.stats().nodes, 1);
    }

    #[test]
    fn pruning_matches_full_width_search_on_random_positions() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for sample in 0..48 {
            let plies = rng.random_range(0..60);
            let (board, side) = random_position(&mut rng, plies);

            for depth in 1..=MAX_DEPTH {
                let mut pruned = searcher(depth, true);
                let mut full = searcher(depth, false);

                let a = pruned.search(&board, side);
                let b = full.search(&board, side);

                assert_eq!(a.best, b.best, "sample {sample}, depth {depth}\n{board}");
                assert_eq!(a.value, b.value, "sample {sample}, depth {depth}\n{board}");
                assert!(a.stats.nodes <= b.stats.nodes);
            }

            // Same check on an inner node, reached with a full window.
            for maximizing in [true, false] {
                let pruned =
                    searcher(3, true).minimax(&board, 3, MIN_SCORE, MAX_SCORE, maximizing, side);
                let full =
                    searcher(3, false).minimax(&board, 3, MIN_SCORE, MAX_SCORE, maximizing, side);
                assert_eq!(pruned, full, "sample {sample}, maximizing {maximizing}");
            }
        }
    }

    #[test]
    fn pruning_visits_fewer_nodes_from_the_opening() {
        let board = rules::apply_move(&Board::new(), Side::Black, coord(2, 3)).unwrap();

        let pruned = searcher(MAX_DEPTH, true).search(&board, Side::White);
        let full = searcher(MAX_DEPTH, false).search(&board, Side::White);

        assert_eq!(pruned.best, full.best);
        assert!(pruned.stats.nodes < full.stats.nodes);
    }
}
