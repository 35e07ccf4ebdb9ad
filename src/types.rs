use serde::Serialize;

use crate::ai::search::SearchStats;
use crate::board::{Coord, Score};
use crate::game::{GameSession, TurnState, Winner};

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl From<Coord> for Position {
    fn from(coord: Coord) -> Self {
        Self {
            row: coord.row(),
            col: coord.col(),
        }
    }
}

/// Engine statistics for the last computer reply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchSummary {
    pub nodes: u64,
    pub evaluations: u64,
    pub elapsed_ms: f64,
}

impl From<SearchStats> for SearchSummary {
    fn from(stats: SearchStats) -> Self {
        Self {
            nodes: stats.nodes,
            evaluations: stats.evaluations,
            elapsed_ms: stats.elapsed.as_secs_f64() * 1000.0,
        }
    }
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameState {
    pub board: Vec<u8>,
    /// 1=black, 2=white, 0 once the game is over.
    pub current_player: u8,
    pub black_count: u8,
    pub white_count: u8,
    pub valid_moves: Vec<Position>,
    pub last_move: Option<Position>,
    pub is_game_over: bool,
    /// `true` while the computer side still has to reply.
    pub is_computing: bool,
    /// Contract:
    /// - `true` when the last transition skipped a side.
    /// - `passed_player` then holds that side (1 or 2), otherwise 0.
    pub is_pass: bool,
    pub passed_player: u8,
    /// Contract:
    /// - Normal move: list of flipped positions (0..=63).
    /// - Pass: must be an empty list.
    pub flipped: Vec<u8>,
    pub winner: Option<Winner>,
    pub search: Option<SearchSummary>,
}

impl GameState {
    pub fn from_session(session: &GameSession) -> Self {
        let state = session.state();
        let (black_count, white_count) = session.board().count();

        Self {
            board: session.board().to_array().to_vec(),
            current_player: state.side_to_move().map_or(0, |side| side.to_u8()),
            black_count,
            white_count,
            valid_moves: session.legal_moves().into_iter().map(Position::from).collect(),
            last_move: session.last_move().map(|mv| mv.coord.into()),
            is_game_over: state.is_finished(),
            is_computing: matches!(state, TurnState::ComputingReply(_)),
            is_pass: session.passed().is_some(),
            passed_player: session.passed().map_or(0, |side| side.to_u8()),
            flipped: session
                .flipped()
                .iter()
                .map(|coord| coord.index() as u8)
                .collect(),
            winner: session.winner(),
            search: session.last_search().map(SearchSummary::from),
        }
    }
}

/// Final result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub winner: Winner,
    pub black_count: u8,
    pub white_count: u8,
}

impl GameResult {
    pub fn new(winner: Winner, score: Score) -> Self {
        Self {
            winner,
            black_count: score.black,
            white_count: score.white,
        }
    }

    /// `None` while the game is still running.
    pub fn from_session(session: &GameSession) -> Option<Self> {
        session
            .winner()
            .map(|winner| Self::new(winner, session.score()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::config::GameConfig;

    #[test]
    fn initial_state_dto_matches_session() {
        let session = GameSession::new(GameConfig::default());

        let state = GameState::from_session(&session);

        assert_eq!(state.board.len(), 64);
        assert_eq!(state.current_player, 1);
        assert_eq!((state.black_count, state.white_count), (2, 2));
        assert_eq!(
            state.valid_moves,
            vec![
                Position { row: 2, col: 3 },
                Position { row: 3, col: 2 },
                Position { row: 4, col: 5 },
                Position { row: 5, col: 4 },
            ]
        );
        assert_eq!(state.last_move, None);
        assert!(!state.is_game_over);
        assert!(!state.is_computing);
        assert!(!state.is_pass);
        assert!(state.flipped.is_empty());
        assert_eq!(state.winner, None);
        assert!(GameResult::from_session(&session).is_none());
    }

    #[test]
    fn move_fills_last_move_and_flipped() {
        let mut session = GameSession::new(GameConfig::default());
        session.play(Coord::new(2, 3).unwrap()).unwrap();

        let state = GameState::from_session(&session);

        assert_eq!(state.current_player, 2);
        assert!(state.is_computing);
        assert_eq!(state.last_move, Some(Position { row: 2, col: 3 }));
        assert_eq!(state.flipped, vec![27]);
        assert_eq!(state.board[19], 1);
        assert_eq!(state.board[27], 1);
    }

    #[test]
    fn finished_game_reports_result() {
        let board = Board::from_bitboards(u64::MAX ^ 1, 0);
        let session =
            GameSession::from_position(board, crate::board::Side::White, GameConfig::default());

        let state = GameState::from_session(&session);
        let result = GameResult::from_session(&session).unwrap();

        assert!(state.is_game_over);
        assert_eq!(state.current_player, 0);
        assert!(state.valid_moves.is_empty());
        assert_eq!(state.winner, Some(Winner::Black));
        assert_eq!(result.black_count, 63);
        assert_eq!(result.white_count, 0);
    }
}
