//! Search: iterative deepening over the negamax driver.

pub mod clock;
pub mod heuristics;
pub mod negamax;
pub mod ordering;
pub mod policy;
pub mod tt;

use kestrel_core::{Move, MoveList, Position};
use tracing::debug;

use clock::{SearchClock, TimeBudget};
use heuristics::Heuristics;
use negamax::LIMIT_SCORE;
use ordering::order_moves;
use tt::TranspositionTable;

/// Default transposition table size in megabytes.
pub const DEFAULT_HASH_MB: usize = 16;

/// Result of an iterative-deepening search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move of the deepest completed iteration. Before any iteration
    /// completes this is the first legal move in ordering order; `NULL` only
    /// when the side to move has no legal move.
    pub best_move: Move,
    /// Score of that iteration, from the side to move's point of view.
    pub score: i32,
    /// Nodes visited by the whole search.
    pub nodes: u64,
    /// Deepest completed iteration, 0 if none completed.
    pub depth: i32,
}

/// Owns everything the search keeps between nodes and between searches:
/// the transposition table, the ordering heuristics, the clock, the node
/// counter and the recursion height.
pub struct Searcher {
    tt: TranspositionTable,
    heuristics: Heuristics,
    clock: SearchClock,
    nodes: u64,
    height: usize,
}

impl Searcher {
    /// Create a searcher with a transposition table of `hash_mb` megabytes
    /// and no deadline.
    pub fn new(hash_mb: usize) -> Self {
        Self {
            tt: TranspositionTable::new(hash_mb),
            heuristics: Heuristics::default(),
            clock: SearchClock::default(),
            nodes: 0,
            height: 0,
        }
    }

    /// Set the time allotted to the next move in milliseconds; 0 disables
    /// the deadline.
    pub fn set_time_for_move(&mut self, ms: u64) {
        self.clock.budget().set(ms);
    }

    pub fn time_for_move(&self) -> u64 {
        self.clock.budget().get()
    }

    /// Shared handle on the time budget, for stopping a running search
    /// from another thread.
    pub fn time_budget(&self) -> TimeBudget {
        self.clock.budget().clone()
    }

    /// Restart the search clock.
    pub fn reset_clock(&mut self) {
        self.clock.reset();
    }

    /// Nodes visited since the last [`search`](Self::search) started.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Number of driver frames currently on the stack.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn heuristics(&self) -> &Heuristics {
        &self.heuristics
    }

    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    /// Forget everything learned: transposition table, killers and history.
    pub fn clear(&mut self) {
        self.tt.clear();
        self.heuristics.clear();
    }

    /// Replace the transposition table with an empty one of `mb` megabytes.
    pub fn resize_tt(&mut self, mb: usize) {
        self.tt = TranspositionTable::new(mb);
    }

    /// First legal move in ordering order, or `NULL` if there is none.
    fn first_legal_move(&mut self, pos: &mut Position) -> Move {
        let mut moves = MoveList::new();
        pos.generate_moves(&mut moves);
        let tt_move = self
            .tt
            .probe(pos.hash(), 0)
            .map_or(Move::NULL, |entry| entry.best_move);
        order_moves(&mut moves, 1, pos, &self.heuristics, tt_move);
        for &mv in moves.iter() {
            if pos.make_move(mv) {
                pos.restore_state();
                return mv;
            }
        }
        Move::NULL
    }

    /// Iterative deepening from depth 1 to `max_depth`.
    ///
    /// The clock restarts when the search begins. An iteration interrupted
    /// by the deadline is discarded and the previous one's result is kept.
    /// `on_iter(depth, score, nodes, best_move)` runs after every completed
    /// iteration.
    pub fn search<F>(&mut self, pos: &mut Position, max_depth: i32, mut on_iter: F) -> SearchResult
    where
        F: FnMut(i32, i32, u64, Move),
    {
        self.clock.reset();
        self.nodes = 0;
        self.height = 0;
        self.tt.new_generation();
        self.heuristics.killers.clear();
        self.heuristics.history.age();

        let mut result = SearchResult {
            best_move: self.first_legal_move(pos),
            score: 0,
            nodes: 0,
            depth: 0,
        };

        for depth in 1..=max_depth {
            if self.clock.expired() {
                break;
            }

            let (best_move, score) = self.negamax(pos, -LIMIT_SCORE, LIMIT_SCORE, depth);

            if self.clock.expired() {
                debug!(depth, nodes = self.nodes, "iteration interrupted, result discarded");
                break;
            }

            if !best_move.is_null() {
                result.best_move = best_move;
            }
            result.score = score;
            result.depth = depth;
            result.nodes = self.nodes;

            debug!(depth, score, nodes = self.nodes, best_move = %result.best_move, "iteration complete");
            on_iter(depth, score, self.nodes, result.best_move);
        }

        result.nodes = self.nodes;
        debug_assert_eq!(self.height, 0);
        debug_assert_eq!(pos.stack_depth(), 0);
        result
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_MB)
    }
}
