//! Material balance with a bishop-pair bonus, from White's point of view.

use cozy_chess::{Board, Color, Piece};

use crate::eval::score::{S, Score};

/// Piece values indexed by `Piece as usize` (pawn, knight, bishop, rook,
/// queen, king).
pub const PIECE_VALUE: [Score; 6] = [
    S(100, 120),
    S(320, 310),
    S(330, 320),
    S(500, 520),
    S(900, 950),
    S(0, 0),
];

const BISHOP_PAIR: Score = S(45, 55);

fn side_material(board: &Board, color: Color) -> Score {
    let own = board.colors(color);
    let mut score = Score::ZERO;
    for piece in Piece::ALL {
        let count = (board.pieces(piece) & own).len() as i32;
        score += PIECE_VALUE[piece as usize] * count;
    }
    if (board.pieces(Piece::Bishop) & own).len() >= 2 {
        score += BISHOP_PAIR;
    }
    score
}

/// White material minus Black material.
pub fn material(board: &Board) -> Score {
    side_material(board, Color::White) - side_material(board, Color::Black)
}
