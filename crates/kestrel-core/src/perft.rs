//! Perft over the make/restore journal.
//!
//! Exercises the search-facing path (encode, `make_move`, `restore_state`)
//! rather than the generator alone, so a broken encoding or an unbalanced
//! journal shows up as a wrong node count.

use crate::move_list::MoveList;
use crate::position::Position;

/// Count the leaf nodes at `depth` plies below `pos`.
pub fn perft(pos: &mut Position, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut moves = MoveList::new();
    pos.generate_moves(&mut moves);

    let mut nodes = 0u64;
    for &mv in &moves {
        if !pos.make_move(mv) {
            continue;
        }
        nodes += perft(pos, depth - 1);
        pos.restore_state();
    }
    nodes
}

/// Per-move breakdown, sorted by UCI string.
pub fn divide(pos: &mut Position, depth: usize) -> Vec<(String, u64)> {
    let mut moves = MoveList::new();
    pos.generate_moves(&mut moves);

    let mut results = Vec::with_capacity(moves.len());
    for &mv in &moves {
        if !pos.make_move(mv) {
            continue;
        }
        let count = perft(pos, depth.saturating_sub(1));
        pos.restore_state();
        results.push((mv.to_uci(), count));
    }
    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
