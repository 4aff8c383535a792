//! Pruning and reduction rules of the main search, as pure functions.

/// Depth removed from a null-move search on top of the usual one ply.
pub const NULL_MOVE_REDUCTION: i32 = 2;

/// Deepest remaining depth at which futility, razoring and late move pruning apply.
pub const SHALLOW_DEPTH: i32 = 3;

/// First razoring margin, added to the static evaluation.
pub const RAZOR_MARGIN: i32 = 125;

/// Extra margin for the second razoring step at depth 2.
pub const RAZOR_MARGIN_DEEP: i32 = 175;

/// Futility margin at `depth`.
#[inline]
pub const fn futility_margin(depth: i32) -> i32 {
    120 * depth
}

/// Null move is tried at non-root nodes with enough depth, never in check.
#[inline]
pub fn null_move_allowed(depth: i32, ply: usize, in_check: bool) -> bool {
    depth >= 3 && ply != 0 && !in_check
}

/// Futility, reverse futility and razoring guard.
#[inline]
pub fn static_pruning_allowed(pv: bool, in_check: bool, depth: i32) -> bool {
    !pv && !in_check && depth <= SHALLOW_DEPTH
}

/// Late move pruning: skip a quiet move once enough legal moves were made.
///
/// `legal_moves` counts the moves already made at this node, so the first
/// legal move is never pruned.
#[inline]
pub fn late_move_prunable(legal_moves: u32, depth: i32, is_capture: bool) -> bool {
    let threshold = 6 + 2 * depth * depth;
    legal_moves != 0
        && depth <= SHALLOW_DEPTH
        && i64::from(legal_moves) > i64::from(threshold)
        && !is_capture
}

/// Whether a zero-window probe landed strictly inside `(alpha, beta)` and
/// must be searched again with the full window.
#[inline]
pub const fn needs_research(score: i32, alpha: i32, beta: i32) -> bool {
    score > alpha && score < beta
}

/// Late move reduction for the move at `index` in the ordered list.
///
/// `legal_moves` includes the move itself.
pub fn lmr_reduction(
    depth: i32,
    legal_moves: u32,
    index: usize,
    in_check: bool,
    tactical: bool,
) -> i32 {
    if depth < 3 || legal_moves <= 4 || in_check {
        return 0;
    }
    let d = f64::from(depth).ln_1p();
    let i = (index as f64).ln_1p();
    let r = if tactical {
        0.7 + 0.3 * d + 0.3 * i
    } else {
        1.0 + 0.5 * d + 0.7 * i
    };
    r as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_move_guard() {
        assert!(null_move_allowed(3, 1, false));
        assert!(!null_move_allowed(2, 1, false));
        assert!(!null_move_allowed(3, 0, false));
        assert!(!null_move_allowed(5, 4, true));
    }

    #[test]
    fn margins() {
        assert_eq!(futility_margin(1), 120);
        assert_eq!(futility_margin(3), 360);
        assert!(static_pruning_allowed(false, false, 3));
        assert!(!static_pruning_allowed(true, false, 1));
        assert!(!static_pruning_allowed(false, true, 1));
        assert!(!static_pruning_allowed(false, false, 4));
    }

    #[test]
    fn first_move_is_never_late_pruned() {
        for depth in -2..=3 {
            assert!(!late_move_prunable(0, depth, false));
        }
    }

    #[test]
    fn late_move_threshold() {
        // depth 1: 6 + 2 = 8 moves made before pruning starts
        assert!(!late_move_prunable(8, 1, false));
        assert!(late_move_prunable(9, 1, false));
        assert!(!late_move_prunable(9, 1, true));
        // depth 3: 6 + 18 = 24
        assert!(!late_move_prunable(24, 3, false));
        assert!(late_move_prunable(25, 3, false));
        assert!(!late_move_prunable(100, 4, false));
    }

    #[test]
    fn research_only_strictly_inside_the_window() {
        assert!(needs_research(11, 10, 20));
        assert!(needs_research(19, 10, 20));
        assert!(!needs_research(10, 10, 20));
        assert!(!needs_research(20, 10, 20));
        assert!(!needs_research(-5, 10, 20));
        // A null window never needs a re-search.
        assert!(!needs_research(10, 10, 11));
        assert!(!needs_research(11, 10, 11));
    }

    #[test]
    fn no_reduction_when_shallow_early_or_in_check() {
        assert_eq!(lmr_reduction(2, 10, 9, false, false), 0);
        assert_eq!(lmr_reduction(6, 4, 3, false, false), 0);
        assert_eq!(lmr_reduction(6, 10, 9, true, false), 0);
    }

    #[test]
    fn reduction_values() {
        // quiet: 1 + 0.5 ln 4 + 0.7 ln 5 = 1 + 0.693 + 1.127 = 2.82
        assert_eq!(lmr_reduction(3, 5, 4, false, false), 2);
        // tactical: 0.7 + 0.3 ln 4 + 0.3 ln 5 = 0.7 + 0.416 + 0.483 = 1.60
        assert_eq!(lmr_reduction(3, 5, 4, false, true), 1);
        // quiet, deep and late: 1 + 0.5 ln 11 + 0.7 ln 31 = 1 + 1.199 + 2.404 = 4.60
        assert_eq!(lmr_reduction(10, 30, 30, false, false), 4);
    }
}
