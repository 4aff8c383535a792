//! Move ordering: TT move, MVV-LVA captures, promotions, killers, checks, history.

use cozy_chess::{
    Board, Piece, get_bishop_moves, get_knight_moves, get_pawn_attacks, get_rook_moves,
};
use kestrel_core::{Move, MoveList, Position};

use crate::search::heuristics::Heuristics;

/// MVV-LVA scores indexed by `[victim][attacker]`.
///
/// `victim_weight * 10 - attacker_weight` with weights
/// pawn 1, knight 3, bishop 3, rook 5, queen 9, king 10.
#[rustfmt::skip]
pub const MVV_LVA: [[i32; 6]; 6] = [
    //  P    N    B    R    Q    K
    [   9,   7,   7,   5,   1,   0], // pawn
    [  29,  27,  27,  25,  21,  20], // knight
    [  29,  27,  27,  25,  21,  20], // bishop
    [  49,  47,  47,  45,  41,  40], // rook
    [  89,  87,  87,  85,  81,  80], // queen
    [  99,  97,  97,  95,  91,  90], // king
];

pub const TT_MOVE_SCORE: i32 = 20_000;
pub const CAPTURE_BASE: i32 = 10_000;
pub const CAPTURE_PROMOTION_BONUS: i32 = 1_000;
pub const QUEEN_PROMOTION_SCORE: i32 = 9_500;
pub const KILLER_SCORES: [i32; 2] = [9_000, 8_500];
pub const CHECK_SCORE: i32 = 8_000;
pub const HISTORY_CAP: i32 = 7_000;
pub const UNDERPROMOTION_SCORE: i32 = -1;

/// MVV-LVA value of a capture, 0 for anything else.
#[inline]
pub fn mvv_lva(mv: Move) -> i32 {
    mv.capture()
        .map_or(0, |victim| MVV_LVA[victim as usize][mv.piece() as usize])
}

/// Whether the quiet move `mv` attacks the enemy king from its target square.
///
/// Only direct checks are seen; discovered checks and castling are not.
pub fn gives_direct_check(board: &Board, mv: Move) -> bool {
    if mv.is_castling() {
        return false;
    }
    let us = board.side_to_move();
    let king = board.king(!us);
    let (from, to) = (mv.from(), mv.to());
    let blockers = board.occupied() ^ from.bitboard() | to.bitboard();
    let attacks = match mv.promotion().unwrap_or(mv.piece()) {
        Piece::Pawn => get_pawn_attacks(to, us),
        Piece::Knight => get_knight_moves(to),
        Piece::Bishop => get_bishop_moves(to, blockers),
        Piece::Rook => get_rook_moves(to, blockers),
        Piece::Queen => get_bishop_moves(to, blockers) | get_rook_moves(to, blockers),
        Piece::King => return false,
    };
    attacks.has(king)
}

/// Ordering score of `mv` at a node of the given depth; higher is searched first.
pub fn score_move(
    mv: Move,
    depth: i32,
    pos: &Position,
    heuristics: &Heuristics,
    tt_move: Move,
) -> i32 {
    if !tt_move.is_null() && mv == tt_move {
        return TT_MOVE_SCORE;
    }
    if mv.is_capture() {
        let bonus = if mv.promotion() == Some(Piece::Queen) {
            CAPTURE_PROMOTION_BONUS
        } else {
            0
        };
        return CAPTURE_BASE + mvv_lva(mv) + bonus;
    }
    match mv.promotion() {
        Some(Piece::Queen) => return QUEEN_PROMOTION_SCORE,
        Some(_) => return UNDERPROMOTION_SCORE,
        None => {}
    }

    let side = pos.side_to_move();
    let killers = heuristics.killers.get(side, depth);
    if let Some(slot) = killers.iter().position(|&k| k == mv) {
        return KILLER_SCORES[slot];
    }
    if gives_direct_check(pos.board(), mv) {
        return CHECK_SCORE;
    }
    heuristics.history.score(side, mv).min(HISTORY_CAP)
}

/// Stable descending insertion sort of `moves` by `scores`.
///
/// Equal scores keep their generation order.
pub fn sort_moves(moves: &mut [Move], scores: &mut [i32]) {
    debug_assert_eq!(moves.len(), scores.len());
    for i in 1..moves.len() {
        let (mv, score) = (moves[i], scores[i]);
        let mut j = i;
        while j > 0 && scores[j - 1] < score {
            moves[j] = moves[j - 1];
            scores[j] = scores[j - 1];
            j -= 1;
        }
        moves[j] = mv;
        scores[j] = score;
    }
}

/// Score and sort a full move list for the main search.
pub fn order_moves(
    list: &mut MoveList,
    depth: i32,
    pos: &Position,
    heuristics: &Heuristics,
    tt_move: Move,
) {
    let mut scores = [0i32; kestrel_core::MAX_MOVES];
    let len = list.len();
    for (score, &mv) in scores.iter_mut().zip(list.iter()) {
        *score = score_move(mv, depth, pos, heuristics, tt_move);
    }
    sort_moves(list.as_mut_slice(), &mut scores[..len]);
}

/// Keep only captures and queen promotions, ordered by MVV-LVA.
pub fn order_tactical(list: &mut MoveList) {
    let mut tactical = MoveList::new();
    let mut scores = [0i32; kestrel_core::MAX_MOVES];
    for &mv in list.iter() {
        let queen_promotion = mv.promotion() == Some(Piece::Queen);
        if mv.is_capture() || queen_promotion {
            scores[tactical.len()] = mvv_lva(mv) + if queen_promotion { 80 } else { 0 };
            tactical.push(mv);
        }
    }
    let len = tactical.len();
    sort_moves(tactical.as_mut_slice(), &mut scores[..len]);
    *list = tactical;
}
