//! Search deadline: a start instant plus a shared millisecond budget.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Milliseconds allotted to the current move, shared between the search and
/// whoever drives it. Zero means no deadline.
///
/// Lowering the budget while a search runs makes the next deadline check fire
/// once the new budget has elapsed; [`TimeBudget::expire`] uses this to stop a
/// search from another thread.
#[derive(Clone, Debug, Default)]
pub struct TimeBudget(Arc<AtomicU64>);

impl TimeBudget {
    pub fn new(ms: u64) -> Self {
        Self(Arc::new(AtomicU64::new(ms)))
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set(&self, ms: u64) {
        self.0.store(ms, Ordering::Relaxed);
    }

    /// Cut the budget to a single millisecond.
    pub fn expire(&self) {
        self.set(1);
    }
}

/// Tracks when the current search began and how long it may run.
#[derive(Debug)]
pub struct SearchClock {
    start: Instant,
    budget: TimeBudget,
}

impl SearchClock {
    pub fn new(budget: TimeBudget) -> Self {
        Self {
            start: Instant::now(),
            budget,
        }
    }

    /// Restart the clock now.
    pub fn reset(&mut self) {
        self.start = Instant::now();
    }

    pub fn budget(&self) -> &TimeBudget {
        &self.budget
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Whether a non-zero budget has been used up.
    #[inline]
    pub fn expired(&self) -> bool {
        let budget = self.budget.get();
        budget > 0 && self.start.elapsed().as_millis() >= u128::from(budget)
    }
}

impl Default for SearchClock {
    fn default() -> Self {
        Self::new(TimeBudget::default())
    }
}
