//! Static evaluation.
//!
//! Material plus piece-square tables, blended between middlegame and endgame
//! weights by the remaining non-pawn material.

pub mod material;
pub mod phase;
pub mod pst;
pub mod score;

use cozy_chess::{Board, Color};
use kestrel_core::Position;

use crate::eval::material::material;
use crate::eval::phase::game_phase;
use crate::eval::pst::pst_value;
use crate::eval::score::Score;

/// Sum of the piece-square bonuses, White minus Black.
fn placement(board: &Board) -> Score {
    let mut score = Score::ZERO;
    for sq in board.occupied() {
        let (Some(piece), Some(color)) = (board.piece_on(sq), board.color_on(sq)) else {
            continue;
        };
        let value = pst_value(piece, color, sq);
        match color {
            Color::White => score += value,
            Color::Black => score -= value,
        }
    }
    score
}

/// Evaluate `board` in centipawns from White's perspective.
pub fn evaluate_white(board: &Board) -> i32 {
    (material(board) + placement(board)).taper(game_phase(board))
}

/// Evaluate the position in centipawns from the side to move's perspective.
pub fn evaluate(pos: &Position) -> i32 {
    let white = evaluate_white(pos.board());
    match pos.side_to_move() {
        Color::White => white,
        Color::Black => -white,
    }
}

#[cfg(test)]
mod tests {
    use kestrel_core::Position;

    use super::*;

    #[test]
    fn starting_position_is_level() {
        assert_eq!(evaluate(&Position::starting_position()), 0);
    }

    #[test]
    fn perspective_flips_with_side_to_move() {
        let white: Position = "4k3/8/8/8/8/8/8/R3K3 w - - 0 1".parse().unwrap();
        let black: Position = "4k3/8/8/8/8/8/8/R3K3 b - - 0 1".parse().unwrap();
        assert!(evaluate(&white) > 400);
        assert_eq!(evaluate(&white), -evaluate(&black));
    }

    #[test]
    fn mirrored_position_scores_the_same() {
        let pos: Position = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4"
            .parse()
            .unwrap();
        let mirrored: Position =
            "rnbqk2r/pppp1ppp/5n2/2b1p3/4P3/2N2N2/PPPP1PPP/R1BQKB1R b KQkq - 4 4"
                .parse()
                .unwrap();
        assert_eq!(evaluate(&pos), evaluate(&mirrored));
    }
}
