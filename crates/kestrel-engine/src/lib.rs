//! Search and evaluation for kestrel.

pub mod eval;
pub mod search;
pub mod time;

pub use eval::evaluate;
pub use search::clock::TimeBudget;
pub use search::negamax::{LIMIT_SCORE, MATE, MATE_THRESHOLD, MAX_PLY};
pub use search::{DEFAULT_HASH_MB, SearchResult, Searcher};
pub use time::time_for_move;
