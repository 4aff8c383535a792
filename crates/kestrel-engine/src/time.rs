//! Time allocation: turn UCI clock parameters into a per-move budget.

use std::time::Duration;

use cozy_chess::{Board, Color};

use crate::eval::phase::{MAX_PHASE, game_phase};

/// Time kept back for communication overhead.
const OVERHEAD_MS: f64 = 10.0;

/// Budget for one move given the remaining clock and increment.
///
/// Without `moves_to_go` the number of moves left is estimated from the game
/// phase (`phase` 0 = bare kings, [`MAX_PHASE`] = full board):
///
/// | Condition | Phase 24 | Phase 12 | Phase 0 |
/// |-----------|----------|----------|---------|
/// | increment | 35       | 25       | 15      |
/// | none      | 40       | 29       | 18      |
///
/// The share of the usable time is topped up with three quarters of the
/// increment and capped at 25 % (increment) or 12 % (no increment) of the
/// remaining time. Under 10 ms left gives 1 ms.
pub fn allocate(
    remaining: Duration,
    increment: Duration,
    moves_to_go: Option<u32>,
    phase: i32,
) -> Duration {
    let remaining_ms = remaining.as_millis() as f64;
    if remaining_ms < OVERHEAD_MS {
        return Duration::from_millis(1);
    }

    let usable = (remaining_ms - OVERHEAD_MS).max(1.0);
    let inc_ms = increment.as_millis() as f64;
    let has_increment = inc_ms > 0.0;

    let mtg = match moves_to_go {
        Some(n) => f64::from(n.max(1)),
        None => {
            let (base, scale) = if has_increment { (15, 20) } else { (18, 22) };
            f64::from(base + scale * phase.clamp(0, MAX_PHASE) / MAX_PHASE)
        }
    };

    let mut budget = usable / mtg;
    if has_increment {
        budget += inc_ms * 0.75;
    }
    let cap = usable * if has_increment { 0.25 } else { 0.12 };
    let budget = budget.min(cap).max(1.0);

    Duration::from_millis(budget as u64)
}

/// Time for the next move in milliseconds, from the parameters of a UCI
/// `go` command. 0 means search without a deadline.
///
/// `movetime` wins over the clock; `infinite` and depth-only searches get 0.
#[allow(clippy::too_many_arguments)]
pub fn time_for_move(
    wtime: Option<Duration>,
    btime: Option<Duration>,
    winc: Option<Duration>,
    binc: Option<Duration>,
    movestogo: Option<u32>,
    movetime: Option<Duration>,
    infinite: bool,
    board: &Board,
) -> u64 {
    if infinite {
        return 0;
    }
    if let Some(mt) = movetime {
        return (mt.as_millis() as u64).max(1);
    }

    let (remaining, increment) = match board.side_to_move() {
        Color::White => (wtime, winc),
        Color::Black => (btime, binc),
    };
    match remaining {
        Some(rem) => {
            let inc = increment.unwrap_or(Duration::ZERO);
            allocate(rem, inc, movestogo, game_phase(board)).as_millis() as u64
        }
        None => 0,
    }
}
