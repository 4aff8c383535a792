//! Transposition table.
//!
//! A fixed number of slots, indexed by the low bits of the Zobrist key and
//! verified with the full key. One entry per slot, replaced by:
//!
//! - an empty slot,
//! - an entry written during an earlier search (older generation),
//! - a search at least as deep,
//! - an exact (PV) result.
//!
//! Mate scores are stored relative to the node rather than the root so that
//! they stay valid when the same position is reached at another ply.

use kestrel_core::Move;

use crate::search::negamax::MATE_THRESHOLD;

/// What the stored score says about the true value of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Exact: `original_alpha < score < beta`.
    Pv,
    /// Lower bound: the node failed high, `score >= beta`.
    Cut,
    /// Upper bound: no move raised alpha, `score <= original_alpha`.
    All,
}

impl NodeKind {
    /// Classify a finished node by its best score and the window it was
    /// searched with.
    pub fn classify(best_score: i32, original_alpha: i32, beta: i32) -> NodeKind {
        if best_score <= original_alpha {
            NodeKind::All
        } else if best_score >= beta {
            NodeKind::Cut
        } else {
            NodeKind::Pv
        }
    }
}

/// A successful probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    pub best_move: Move,
    /// Score relative to the root of the probing search.
    pub score: i32,
    pub depth: i32,
    pub kind: NodeKind,
}

#[derive(Clone, Copy)]
struct Slot {
    key: u64,
    best_move: Move,
    score: i32,
    depth: i32,
    kind: NodeKind,
    generation: u8,
}

/// Convert a root-relative score to the node-relative form stored in the table.
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score > MATE_THRESHOLD {
        score + ply
    } else if score < -MATE_THRESHOLD {
        score - ply
    } else {
        score
    }
}

/// Inverse of [`score_to_tt`].
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score > MATE_THRESHOLD {
        score - ply
    } else if score < -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}

pub struct TranspositionTable {
    slots: Vec<Option<Slot>>,
    mask: usize,
    generation: u8,
}

impl TranspositionTable {
    /// Allocate a table of roughly `mb` megabytes, rounded down to a power
    /// of two slots (at least one).
    pub fn new(mb: usize) -> Self {
        let bytes = mb.saturating_mul(1024 * 1024);
        let count = (bytes / std::mem::size_of::<Option<Slot>>()).max(1);
        let count = if count.is_power_of_two() {
            count
        } else {
            count.next_power_of_two() >> 1
        };
        Self {
            slots: vec![None; count],
            mask: count - 1,
            generation: 0,
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn clear(&mut self) {
        self.slots.fill(None);
        self.generation = 0;
    }

    /// Start a new search; entries from earlier searches become replaceable.
    pub fn new_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn generation(&self) -> u8 {
        self.generation
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        key as usize & self.mask
    }

    /// Look up `key`, translating mate scores to the probing `ply`.
    pub fn probe(&self, key: u64, ply: usize) -> Option<TtEntry> {
        let slot = self.slots[self.index(key)].filter(|slot| slot.key == key)?;
        Some(TtEntry {
            best_move: slot.best_move,
            score: score_from_tt(slot.score, ply),
            depth: slot.depth,
            kind: slot.kind,
        })
    }

    /// Store a search result for `key` found at `ply`.
    pub fn store(
        &mut self,
        key: u64,
        best_move: Move,
        score: i32,
        depth: i32,
        kind: NodeKind,
        ply: usize,
    ) {
        let generation = self.generation;
        let index = self.index(key);
        let replace = match &self.slots[index] {
            None => true,
            Some(old) => {
                old.generation != generation || depth >= old.depth || kind == NodeKind::Pv
            }
        };
        if replace {
            self.slots[index] = Some(Slot {
                key,
                best_move,
                score: score_to_tt(score, ply),
                depth,
                kind,
                generation,
            });
        }
    }

    /// Occupied slots per thousand, sampled over the first thousand slots.
    pub fn hashfull(&self) -> usize {
        let sample = self.slots.len().min(1000);
        let used = self.slots[..sample]
            .iter()
            .flatten()
            .filter(|slot| slot.generation == self.generation)
            .count();
        used * 1000 / sample
    }
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("slots", &self.slots.len())
            .field("generation", &self.generation)
            .finish()
    }
}
