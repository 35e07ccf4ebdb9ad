use std::sync::Arc;

use serde::Serialize;

use crate::ai::search::{SearchOutcome, SearchStats, Searcher};
use crate::board::{Board, Coord, Move, Score, Side};
use crate::config::{GameConfig, SearchConfig};
use crate::error::GameError;
use crate::rules;

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Black,
    White,
    Draw,
}

impl Winner {
    /// Higher disc count wins, equal counts draw.
    pub fn from_score(score: Score) -> Self {
        match score.leader() {
            Some(Side::Black) => Winner::Black,
            Some(Side::White) => Winner::White,
            None => Winner::Draw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Waiting for a move from a human-controlled side.
    AwaitingMove(Side),
    /// The engine owns this side and a reply must be searched.
    ComputingReply(Side),
    Finished(Winner),
}

impl TurnState {
    pub fn side_to_move(self) -> Option<Side> {
        match self {
            TurnState::AwaitingMove(side) | TurnState::ComputingReply(side) => Some(side),
            TurnState::Finished(_) => None,
        }
    }

    pub fn winner(self) -> Option<Winner> {
        match self {
            TurnState::Finished(winner) => Some(winner),
            _ => None,
        }
    }

    pub fn is_finished(self) -> bool {
        matches!(self, TurnState::Finished(_))
    }
}

/// Chooses the engine's move. `best == None` is a pass.
pub trait MoveSelector: Send + Sync {
    fn select_move(&self, board: &Board, side: Side) -> SearchOutcome;
}

/// Minimax with alpha-beta, the default selector.
#[derive(Debug, Default, Clone, Copy)]
pub struct MinimaxSelector {
    config: SearchConfig,
}

impl MinimaxSelector {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }
}

impl MoveSelector for MinimaxSelector {
    fn select_move(&self, board: &Board, side: Side) -> SearchOutcome {
        Searcher::new(self.config).search(board, side)
    }
}

/// Snapshot handed to a search worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRequest {
    pub board: Board,
    pub side: Side,
}

impl SearchRequest {
    pub fn run(&self, selector: &dyn MoveSelector) -> SearchReply {
        SearchReply {
            board: self.board,
            side: self.side,
            outcome: selector.select_move(&self.board, self.side),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReply {
    pub board: Board,
    pub side: Side,
    pub outcome: SearchOutcome,
}

/// One game between a human and the engine (or two humans).
///
/// Every method either applies a complete transition or returns an error
/// and leaves the session as it was.
pub struct GameSession {
    board: Board,
    state: TurnState,
    computer_side: Option<Side>,
    last_move: Option<Move>,
    flipped: Vec<Coord>,
    passed: Option<Side>,
    last_search: Option<SearchStats>,
    selector: Arc<dyn MoveSelector>,
}

impl GameSession {
    /// Initial board, Black to move.
    pub fn new(config: GameConfig) -> Self {
        Self::from_position(Board::new(), Side::Black, config)
    }

    /// Resumes from `board` with `to_move` expected to play. A forced pass
    /// or a finished position is resolved immediately.
    pub fn from_position(board: Board, to_move: Side, config: GameConfig) -> Self {
        let (state, passed) = resolve_turn(&board, to_move, config.computer_side);
        Self {
            board,
            state,
            computer_side: config.computer_side,
            last_move: None,
            flipped: Vec::new(),
            passed,
            last_search: None,
            selector: Arc::new(MinimaxSelector::new(config.search)),
        }
    }

    pub fn with_selector(mut self, selector: Arc<dyn MoveSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn score(&self) -> Score {
        rules::score(&self.board)
    }

    pub fn winner(&self) -> Option<Winner> {
        self.state.winner()
    }

    pub fn computer_side(&self) -> Option<Side> {
        self.computer_side
    }

    /// Legal moves for the side to move; empty once finished.
    pub fn legal_moves(&self) -> Vec<Coord> {
        self.state
            .side_to_move()
            .map(|side| rules::legal_moves(&self.board, side))
            .unwrap_or_default()
    }

    /// Last placed disc. Presentation only.
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Discs flipped by the last move; empty after a pass.
    pub fn flipped(&self) -> &[Coord] {
        &self.flipped
    }

    /// Side that was skipped by the last transition, if any.
    pub fn passed(&self) -> Option<Side> {
        self.passed
    }

    pub fn last_search(&self) -> Option<SearchStats> {
        self.last_search
    }

    pub fn selector(&self) -> Arc<dyn MoveSelector> {
        Arc::clone(&self.selector)
    }

    /// Plays `coord` for the human side to move.
    pub fn play(&mut self, coord: Coord) -> Result<TurnState, GameError> {
        match self.state {
            TurnState::Finished(_) => Err(GameError::GameOver),
            TurnState::ComputingReply(_) => Err(GameError::ReplyPending),
            TurnState::AwaitingMove(side) => self.apply_move(side, coord),
        }
    }

    /// Like `play`, but rejects a move submitted for the wrong side.
    pub fn play_as(&mut self, side: Side, coord: Coord) -> Result<TurnState, GameError> {
        match self.state {
            TurnState::AwaitingMove(expected) if expected != side => {
                Err(GameError::NotYourTurn(side))
            }
            _ => self.play(coord),
        }
    }

    pub fn play_at(&mut self, row: u8, col: u8) -> Result<TurnState, GameError> {
        let coord = Coord::new(row, col)?;
        self.play(coord)
    }

    /// Work for the engine, present only while a reply is pending.
    pub fn pending_search(&self) -> Option<SearchRequest> {
        match self.state {
            TurnState::ComputingReply(side) => Some(SearchRequest {
                board: self.board,
                side,
            }),
            _ => None,
        }
    }

    /// Applies a reply produced from `pending_search`.
    pub fn complete_reply(&mut self, reply: SearchReply) -> Result<TurnState, GameError> {
        let side = match self.state {
            TurnState::ComputingReply(side) => side,
            TurnState::Finished(_) => return Err(GameError::GameOver),
            TurnState::AwaitingMove(_) => return Err(GameError::NoReplyPending),
        };
        if reply.side != side || reply.board != self.board {
            return Err(GameError::StaleReply);
        }

        let state = match reply.outcome.best {
            Some(coord) => self.apply_move(side, coord)?,
            None => self.apply_pass(side),
        };
        self.last_search = Some(reply.outcome.stats);
        Ok(state)
    }

    /// Runs the pending search on the calling thread and applies it.
    pub fn play_computer_reply(&mut self) -> Result<TurnState, GameError> {
        let Some(request) = self.pending_search() else {
            return Err(if self.state.is_finished() {
                GameError::GameOver
            } else {
                GameError::NoReplyPending
            });
        };

        let reply = request.run(self.selector.as_ref());
        self.complete_reply(reply)
    }

    fn apply_move(&mut self, side: Side, coord: Coord) -> Result<TurnState, GameError> {
        let next = rules::apply_move(&self.board, side, coord)?;
        let flipped = self.board.bits(side.opponent()) & next.bits(side);

        self.board = next;
        self.last_move = Some(Move { side, coord });
        self.flipped = rules::mask_to_coords(flipped);

        let (state, passed) = resolve_turn(&self.board, side.opponent(), self.computer_side);
        self.state = state;
        self.passed = passed;
        Ok(state)
    }

    fn apply_pass(&mut self, side: Side) -> TurnState {
        let (state, passed) = resolve_turn(&self.board, side.opponent(), self.computer_side);
        self.flipped.clear();
        self.state = state;
        // A blocked opponent hands the turn straight back; report that skip.
        self.passed = if state.is_finished() {
            None
        } else {
            passed.or(Some(side))
        };
        state
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board, state: TurnState) {
        self.board = board;
        self.state = state;
        self.passed = None;
        self.flipped.clear();
    }
}

/// Whose turn it is once `expected` should move on `board`: `expected`
/// itself if it can, otherwise its opponent (a pass), otherwise nobody.
fn resolve_turn(
    board: &Board,
    expected: Side,
    computer_side: Option<Side>,
) -> (TurnState, Option<Side>) {
    let turn_for = |side: Side| {
        if computer_side == Some(side) {
            TurnState::ComputingReply(side)
        } else {
            TurnState::AwaitingMove(side)
        }
    };

    if rules::has_legal_move(board, expected) {
        (turn_for(expected), None)
    } else if rules::has_legal_move(board, expected.opponent()) {
        (turn_for(expected.opponent()), Some(expected))
    } else {
        let winner = Winner::from_score(rules::score(board));
        (TurnState::Finished(winner), None)
    }
}
