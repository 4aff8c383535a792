//! Searchable position: a board plus its make/restore journal and key history.

use std::str::FromStr;

use cozy_chess::{Board, Color, Piece};
use tracing::trace;

use crate::chess_move::Move;
use crate::error::PositionError;
use crate::move_list::MoveList;

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A chess position as seen by the search.
///
/// Every successful [`make_move`](Position::make_move) or
/// [`make_null_move`](Position::make_null_move) pushes a copy of the
/// previous board onto a journal; [`restore_state`](Position::restore_state)
/// pops it. Callers must keep the pushes and pops balanced (LIFO).
///
/// The Zobrist keys of all earlier positions (game moves and search moves
/// alike) are kept for repetition detection.
#[derive(Clone, Debug)]
pub struct Position {
    board: Board,
    stack: Vec<Board>,
    keys: Vec<u64>,
}

impl Position {
    /// The standard starting position.
    pub fn starting_position() -> Self {
        Self::from_board(Board::default())
    }

    /// Wrap an existing board with an empty history.
    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            stack: Vec::with_capacity(128),
            keys: Vec::with_capacity(256),
        }
    }

    /// Parse a position from FEN.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        Board::from_fen(fen, false)
            .map(Self::from_board)
            .map_err(|e| PositionError::InvalidFen {
                fen: fen.to_string(),
                reason: format!("{e:?}"),
            })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// Zobrist key of the current position.
    pub fn hash(&self) -> u64 {
        self.board.hash()
    }

    /// Halfmove clock for the fifty-move rule.
    pub fn halfmove_clock(&self) -> u32 {
        self.board.halfmove_clock() as u32
    }

    /// Whether the side to move is in check.
    pub fn in_check(&self) -> bool {
        !self.board.checkers().is_empty()
    }

    /// Whether the current position already occurred since the last
    /// irreversible move (same side to move).
    pub fn is_repetition(&self) -> bool {
        let key = self.board.hash();
        let window = self.board.halfmove_clock() as usize;
        self.keys
            .iter()
            .rev()
            .take(window)
            .skip(1)
            .step_by(2)
            .any(|&k| k == key)
    }

    /// Number of outstanding make operations awaiting a restore.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Fill `list` with every move of the side to move.
    ///
    /// The list is cleared first. Moves carry the moving piece and the
    /// captured piece so the search can order them without the board.
    pub fn generate_moves(&self, list: &mut MoveList) {
        list.clear();
        self.board.generate_moves(|piece_moves| {
            let piece = piece_moves.piece;
            for mv in piece_moves {
                list.push(self.encode(piece, mv));
            }
            false
        });
    }

    fn encode(&self, piece: Piece, mv: cozy_chess::Move) -> Move {
        let mut encoded = Move::quiet(mv.from, mv.to, piece);
        if let Some(promotion) = mv.promotion {
            encoded = encoded.with_promotion(promotion);
        }
        match (self.board.color_on(mv.to), self.board.piece_on(mv.to)) {
            (Some(color), _) if color == self.board.side_to_move() => encoded.with_castling(),
            (Some(_), Some(victim)) => encoded.with_capture(victim),
            (None, _) if piece == Piece::Pawn && mv.from.file() != mv.to.file() => {
                encoded.with_capture(Piece::Pawn)
            }
            _ => encoded,
        }
    }

    /// Play `mv` if it is legal in the current position.
    ///
    /// Returns `false` (leaving the position untouched) when the move would
    /// leave the mover's king in check or is not a move of this position.
    pub fn make_move(&mut self, mv: Move) -> bool {
        if mv.is_null() {
            return false;
        }
        let cozy = mv.to_cozy();
        if !self.board.is_legal(cozy) {
            return false;
        }
        self.push_state();
        self.board.play_unchecked(cozy);
        true
    }

    /// Pass the turn without moving.
    ///
    /// Returns `false` when the side to move is in check, where passing is
    /// not possible; nothing is pushed in that case.
    pub fn make_null_move(&mut self) -> bool {
        match self.board.null_move() {
            Some(next) => {
                self.push_state();
                self.board = next;
                true
            }
            None => false,
        }
    }

    /// Undo the most recent [`make_move`](Self::make_move) or
    /// [`make_null_move`](Self::make_null_move).
    pub fn restore_state(&mut self) {
        debug_assert!(!self.stack.is_empty(), "restore_state without make");
        if let Some(previous) = self.stack.pop() {
            self.board = previous;
            self.keys.pop();
        }
    }

    fn push_state(&mut self) {
        self.keys.push(self.board.hash());
        self.stack.push(self.board.clone());
    }

    /// Find the legal move written as `uci` (`e2e4`, `e7e8q`, `e1g1`).
    pub fn parse_uci_move(&self, uci: &str) -> Result<Move, PositionError> {
        let mut moves = MoveList::new();
        self.generate_moves(&mut moves);
        moves
            .iter()
            .copied()
            .find(|mv| mv.to_uci() == uci)
            .ok_or_else(|| PositionError::IllegalMove {
                uci_move: uci.to_string(),
            })
    }

    /// Play a game move given in UCI notation.
    ///
    /// Game moves extend the repetition history but are not journaled: they
    /// cannot be undone with [`restore_state`](Self::restore_state). Use this
    /// only while setting up a position, never inside a search.
    pub fn play_uci(&mut self, uci: &str) -> Result<(), PositionError> {
        debug_assert!(self.stack.is_empty(), "game move played during a search");
        let mv = self.parse_uci_move(uci)?;
        self.keys.push(self.board.hash());
        self.board.play_unchecked(mv.to_cozy());
        trace!(%mv, key = self.board.hash(), "game move played");
        Ok(())
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::starting_position()
    }
}

impl FromStr for Position {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}
