//! Game phase from remaining non-pawn material.

use cozy_chess::{Board, Piece};

/// Phase of a full set of minor and major pieces:
/// 4 knights + 4 bishops (1 each), 4 rooks (2 each), 2 queens (4 each).
pub const MAX_PHASE: i32 = 24;

const PHASE_WEIGHT: [(Piece, i32); 4] = [
    (Piece::Knight, 1),
    (Piece::Bishop, 1),
    (Piece::Rook, 2),
    (Piece::Queen, 4),
];

/// Game phase in `0..=MAX_PHASE`; promotions cannot push it past the max.
pub fn game_phase(board: &Board) -> i32 {
    PHASE_WEIGHT
        .iter()
        .map(|&(piece, weight)| board.pieces(piece).len() as i32 * weight)
        .sum::<i32>()
        .min(MAX_PHASE)
}
