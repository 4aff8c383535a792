//! Killer moves and history scores for quiet move ordering.

use cozy_chess::Color;
use kestrel_core::Move;

/// Number of depth rows in the killer table.
pub const KILLER_DEPTHS: usize = 128;

/// Two killer moves per (side to move, remaining depth).
///
/// Slot 0 holds the most recent quiet cutoff move, slot 1 the one before it.
/// Storing a move that already sits in slot 0 still shifts, so both slots can
/// hold the same move.
#[derive(Clone)]
pub struct KillerTable {
    slots: Box<[[[Move; 2]; KILLER_DEPTHS]; 2]>,
}

impl KillerTable {
    pub fn new() -> Self {
        Self {
            slots: Box::new([[[Move::NULL; 2]; KILLER_DEPTHS]; 2]),
        }
    }

    fn row(depth: i32) -> Option<usize> {
        usize::try_from(depth).ok().filter(|&d| d < KILLER_DEPTHS)
    }

    /// Record `mv` as the newest killer; depths outside the table are ignored.
    pub fn store(&mut self, side: Color, depth: i32, mv: Move) {
        if let Some(d) = Self::row(depth) {
            let slots = &mut self.slots[side as usize][d];
            slots[1] = slots[0];
            slots[0] = mv;
        }
    }

    /// Both killer slots at (side, depth); `NULL` outside the table.
    pub fn get(&self, side: Color, depth: i32) -> [Move; 2] {
        Self::row(depth).map_or([Move::NULL; 2], |d| self.slots[side as usize][d])
    }

    pub fn clear(&mut self) {
        for side in self.slots.iter_mut() {
            side.fill([Move::NULL; 2]);
        }
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

/// History scores indexed by `[side][moving piece][target square]`.
///
/// Only ever increased during a search; [`HistoryTable::age`] halves every
/// entry between searches.
#[derive(Clone)]
pub struct HistoryTable {
    table: Box<[[[i32; 64]; 6]; 2]>,
}

impl HistoryTable {
    pub fn new() -> Self {
        Self {
            table: Box::new([[[0; 64]; 6]; 2]),
        }
    }

    /// Reward a quiet move that caused a beta cutoff at `depth`.
    pub fn reward(&mut self, side: Color, mv: Move, depth: i32) {
        let bonus = depth.saturating_mul(depth);
        let entry = &mut self.table[side as usize][mv.piece() as usize][mv.to() as usize];
        *entry = entry.saturating_add(bonus);
    }

    pub fn score(&self, side: Color, mv: Move) -> i32 {
        self.table[side as usize][mv.piece() as usize][mv.to() as usize]
    }

    /// Halve every score.
    pub fn age(&mut self) {
        self.table
            .iter_mut()
            .flatten()
            .flatten()
            .for_each(|v| *v /= 2);
    }

    pub fn clear(&mut self) {
        self.table.iter_mut().flatten().for_each(|row| row.fill(0));
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

/// The ordering heuristics the search maintains across nodes.
#[derive(Clone, Default)]
pub struct Heuristics {
    pub killers: KillerTable,
    pub history: HistoryTable,
}

impl Heuristics {
    /// Update killers and history after `mv` produced a beta cutoff.
    /// Captures leave both tables untouched.
    pub fn record_cutoff(&mut self, side: Color, depth: i32, mv: Move) {
        if mv.is_capture() {
            return;
        }
        self.history.reward(side, mv, depth);
        self.killers.store(side, depth, mv);
    }

    pub fn clear(&mut self) {
        self.killers.clear();
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use cozy_chess::{Color, Piece, Square};
    use kestrel_core::Move;

    use super::*;

    fn e2e4() -> Move {
        Move::quiet(Square::E2, Square::E4, Piece::Pawn)
    }

    fn d2d4() -> Move {
        Move::quiet(Square::D2, Square::D4, Piece::Pawn)
    }

    #[test]
    fn killer_slots_shift() {
        let mut kt = KillerTable::new();
        kt.store(Color::White, 5, e2e4());
        assert_eq!(kt.get(Color::White, 5), [e2e4(), Move::NULL]);
        kt.store(Color::White, 5, d2d4());
        assert_eq!(kt.get(Color::White, 5), [d2d4(), e2e4()]);
    }

    #[test]
    fn killer_duplicates_are_kept() {
        let mut kt = KillerTable::new();
        kt.store(Color::Black, 2, e2e4());
        kt.store(Color::Black, 2, e2e4());
        assert_eq!(kt.get(Color::Black, 2), [e2e4(), e2e4()]);
    }

    #[test]
    fn killers_are_per_side_and_depth() {
        let mut kt = KillerTable::new();
        kt.store(Color::White, 3, e2e4());
        assert_eq!(kt.get(Color::Black, 3), [Move::NULL; 2]);
        assert_eq!(kt.get(Color::White, 4), [Move::NULL; 2]);
    }

    #[test]
    fn killer_depth_out_of_range_is_ignored() {
        let mut kt = KillerTable::new();
        kt.store(Color::White, KILLER_DEPTHS as i32, e2e4());
        kt.store(Color::White, -1, e2e4());
        assert_eq!(kt.get(Color::White, KILLER_DEPTHS as i32), [Move::NULL; 2]);
        assert_eq!(kt.get(Color::White, -1), [Move::NULL; 2]);
    }

    #[test]
    fn history_rewards_depth_squared() {
        let mut ht = HistoryTable::new();
        ht.reward(Color::White, e2e4(), 4);
        assert_eq!(ht.score(Color::White, e2e4()), 16);
        ht.reward(Color::White, e2e4(), 3);
        assert_eq!(ht.score(Color::White, e2e4()), 25);
        assert_eq!(ht.score(Color::Black, e2e4()), 0);
    }

    #[test]
    fn history_saturates() {
        let mut ht = HistoryTable::new();
        for _ in 0..10 {
            ht.reward(Color::White, e2e4(), 50_000);
        }
        assert_eq!(ht.score(Color::White, e2e4()), i32::MAX);
    }

    #[test]
    fn history_age_halves() {
        let mut ht = HistoryTable::new();
        ht.reward(Color::Black, d2d4(), 5);
        ht.age();
        assert_eq!(ht.score(Color::Black, d2d4()), 12);
        ht.clear();
        assert_eq!(ht.score(Color::Black, d2d4()), 0);
    }

    #[test]
    fn cutoff_by_capture_changes_nothing() {
        let mut h = Heuristics::default();
        let capture = Move::quiet(Square::E4, Square::D5, Piece::Pawn).with_capture(Piece::Pawn);
        h.record_cutoff(Color::White, 3, capture);
        assert_eq!(h.killers.get(Color::White, 3), [Move::NULL; 2]);
        assert_eq!(h.history.score(Color::White, capture), 0);
    }

    #[test]
    fn quiet_cutoff_updates_both_tables() {
        let mut h = Heuristics::default();
        h.record_cutoff(Color::White, 3, e2e4());
        assert_eq!(h.killers.get(Color::White, 3)[0], e2e4());
        assert_eq!(h.history.score(Color::White, e2e4()), 9);
    }
}
