//! Negamax alpha-beta driver with quiescence.

use kestrel_core::{Move, MoveList, Position};
use tracing::trace;

use crate::eval::evaluate;
use crate::search::Searcher;
use crate::search::ordering::{order_moves, order_tactical};
use crate::search::policy::{
    NULL_MOVE_REDUCTION, RAZOR_MARGIN, RAZOR_MARGIN_DEEP, futility_margin, late_move_prunable,
    lmr_reduction, needs_research, null_move_allowed, static_pruning_allowed,
};
use crate::search::tt::NodeKind;

/// Bound no real score reaches; the initial search window is
/// `(-LIMIT_SCORE, LIMIT_SCORE)`.
pub const LIMIT_SCORE: i32 = 30_000;

/// Score of delivering mate at the root. Mate in `n` plies scores `MATE - n`.
pub const MATE: i32 = 29_000;

/// Maximum node ply; deeper nodes return their static evaluation.
pub const MAX_PLY: usize = 128;

/// Scores beyond this magnitude are mate scores.
pub const MATE_THRESHOLD: i32 = MATE - MAX_PLY as i32;

impl Searcher {
    /// Search `pos` to `depth` within `(alpha, beta)`.
    ///
    /// Returns the best move and its score for the side to move. When the
    /// deadline has passed the call returns `(Move::NULL, 0)` without
    /// counting a node. The position and the searcher's height are the same
    /// on return as on entry.
    pub fn negamax(&mut self, pos: &mut Position, alpha: i32, beta: i32, depth: i32) -> (Move, i32) {
        if self.clock.expired() {
            return (Move::NULL, 0);
        }
        self.nodes += 1;
        self.height += 1;
        let result = self.node(pos, alpha, beta, depth);
        self.height -= 1;
        result
    }

    fn node(&mut self, pos: &mut Position, mut alpha: i32, beta: i32, mut depth: i32) -> (Move, i32) {
        let ply = self.height - 1;

        if ply != 0 && (pos.is_repetition() || pos.halfmove_clock() >= 100) {
            return (Move::NULL, 0);
        }
        if ply >= MAX_PLY {
            return (Move::NULL, evaluate(pos));
        }

        let pv = beta - alpha > 1;
        let key = pos.hash();

        let tt_hit = self.tt.probe(key, ply);
        if let Some(entry) = tt_hit
            && ply != 0
            && !pv
            && entry.depth >= depth
        {
            let cutoff = match entry.kind {
                NodeKind::Pv => true,
                NodeKind::Cut => entry.score >= beta,
                NodeKind::All => entry.score <= alpha,
            };
            if cutoff {
                trace!(ply, depth, score = entry.score, "tt cutoff");
                return (entry.best_move, entry.score);
            }
        }

        let in_check = pos.in_check();
        if in_check {
            depth += 1;
        }

        if depth <= 0 {
            return (Move::NULL, self.quiesce_at(pos, alpha, beta, ply));
        }

        if null_move_allowed(depth, ply, in_check) {
            // The null move counts as a ply of its own.
            self.height += 1;
            let mut null_score = None;
            if pos.make_null_move() {
                let (_, score) =
                    self.negamax(pos, -beta, -beta + 1, depth - 1 - NULL_MOVE_REDUCTION);
                pos.restore_state();
                null_score = Some(-score);
            }
            self.height -= 1;
            if let Some(score) = null_score
                && score >= beta
            {
                return (Move::NULL, beta);
            }
        }

        let static_eval = evaluate(pos);

        if static_pruning_allowed(pv, in_check, depth) {
            let margin = futility_margin(depth);
            if static_eval - margin >= beta {
                return (Move::NULL, static_eval - margin);
            }
            if static_eval + margin <= alpha {
                return (Move::NULL, static_eval + margin);
            }

            // Razoring
            let mut score = static_eval + RAZOR_MARGIN;
            if score < beta {
                if depth == 1 {
                    let q = self.quiesce_at(pos, alpha, beta, ply);
                    return (Move::NULL, score.max(q));
                }
                score += RAZOR_MARGIN_DEEP;
                if score < beta && depth <= 2 {
                    let q = self.quiesce_at(pos, alpha, beta, ply);
                    if q < beta {
                        return (Move::NULL, q.max(score));
                    }
                }
            }
        }

        let mut moves = MoveList::new();
        pos.generate_moves(&mut moves);
        let tt_move = tt_hit.map_or(Move::NULL, |entry| entry.best_move);
        order_moves(&mut moves, depth, pos, &self.heuristics, tt_move);

        let side = pos.side_to_move();
        let original_alpha = alpha;
        let mut best_score = -LIMIT_SCORE;
        let mut best_move = Move::NULL;
        let mut legal_moves: u32 = 0;

        for (index, &mv) in moves.iter().enumerate() {
            if late_move_prunable(legal_moves, depth, mv.is_capture()) {
                continue;
            }
            if !pos.make_move(mv) {
                continue;
            }
            legal_moves += 1;

            let score = if legal_moves == 1 {
                -self.negamax(pos, -beta, -alpha, depth - 1).1
            } else {
                let reduction = lmr_reduction(depth, legal_moves, index, in_check, mv.is_tactical());
                let mut score = -self.negamax(pos, -alpha - 1, -alpha, depth - 1 - reduction).1;
                if needs_research(score, alpha, beta) {
                    score = -self.negamax(pos, -beta, -alpha, depth - 1).1;
                }
                score
            };

            pos.restore_state();

            if score > best_score {
                best_score = score;
                best_move = mv;
            }
            if best_score > alpha {
                alpha = best_score;
            }
            if alpha >= beta {
                if !self.clock.expired() {
                    self.heuristics.record_cutoff(side, depth, mv);
                }
                break;
            }
        }

        if legal_moves == 0 {
            let score = if in_check { -MATE + ply as i32 } else { 0 };
            return (Move::NULL, score);
        }

        // Children searched past the deadline returned placeholders.
        if self.clock.expired() {
            return (best_move, best_score);
        }

        let kind = NodeKind::classify(best_score, original_alpha, beta);
        self.tt.store(key, best_move, best_score, depth, kind, ply);

        (best_move, best_score)
    }

    /// Quiescence search from the current node: captures and queen
    /// promotions only, fail-hard within `(alpha, beta)`.
    pub fn quiesce(&mut self, pos: &mut Position, alpha: i32, beta: i32) -> i32 {
        let ply = self.height.saturating_sub(1);
        self.quiesce_at(pos, alpha, beta, ply)
    }

    fn quiesce_at(&mut self, pos: &mut Position, mut alpha: i32, beta: i32, ply: usize) -> i32 {
        if self.clock.expired() {
            return 0;
        }
        self.nodes += 1;

        let stand_pat = evaluate(pos);
        if ply >= MAX_PLY {
            return stand_pat;
        }
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut moves = MoveList::new();
        pos.generate_moves(&mut moves);
        order_tactical(&mut moves);

        for &mv in moves.iter() {
            if !pos.make_move(mv) {
                continue;
            }
            let score = -self.quiesce_at(pos, -beta, -alpha, ply + 1);
            pos.restore_state();

            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }
}

#[cfg(test)]
mod tests {
    use cozy_chess::Color;
    use kestrel_core::{Move, Position};

    use super::*;
    use crate::search::Searcher;

    fn searcher() -> Searcher {
        Searcher::new(1)
    }

    #[test]
    fn height_and_stack_are_restored() {
        let mut s = searcher();
        let mut pos = Position::starting_position();
        for depth in 1..=4 {
            s.negamax(&mut pos, -LIMIT_SCORE, LIMIT_SCORE, depth);
            assert_eq!(s.height(), 0, "height after depth {depth}");
            assert_eq!(pos.stack_depth(), 0, "stack after depth {depth}");
        }
    }

    #[test]
    fn mate_in_one_at_depth_one() {
        let mut s = searcher();
        let mut pos: Position = "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1".parse().unwrap();
        let (mv, score) = s.negamax(&mut pos, -LIMIT_SCORE, LIMIT_SCORE, 1);
        assert_eq!(mv.to_uci(), "a1a8");
        assert_eq!(score, MATE - 1);
    }

    #[test]
    fn checkmated_root_scores_minus_mate() {
        let mut s = searcher();
        let mut pos: Position = "R5k1/5ppp/8/8/8/8/5PPP/6K1 b - - 0 1".parse().unwrap();
        assert_eq!(s.negamax(&mut pos, -LIMIT_SCORE, LIMIT_SCORE, 3), (Move::NULL, -MATE));
    }

    #[test]
    fn stalemate_is_a_draw() {
        let mut s = searcher();
        let mut pos: Position = "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1".parse().unwrap();
        assert!(!pos.in_check());
        assert_eq!(s.negamax(&mut pos, -LIMIT_SCORE, LIMIT_SCORE, 4), (Move::NULL, 0));
    }

    #[test]
    fn fifty_move_rule_applies_below_the_root_only() {
        let mut s = searcher();
        let mut pos: Position = "4k3/8/8/8/8/8/Q7/4K3 w - - 100 80".parse().unwrap();

        // Every reply reaches the draw, but the root still picks a move.
        let (mv, score) = s.negamax(&mut pos, -LIMIT_SCORE, LIMIT_SCORE, 2);
        assert!(!mv.is_null());
        assert_eq!(score, 0);

        s.height = 1;
        assert_eq!(s.negamax(&mut pos, -LIMIT_SCORE, LIMIT_SCORE, 2), (Move::NULL, 0));
        assert_eq!(s.height(), 1);
    }

    #[test]
    fn repetition_applies_below_the_root_only() {
        let mut s = searcher();
        let mut pos: Position = "4k3/8/8/8/8/8/Q7/4K3 w - - 0 1".parse().unwrap();
        for uci in ["e1d1", "e8d8", "d1e1", "d8e8"] {
            pos.play_uci(uci).unwrap();
        }
        assert!(pos.is_repetition());

        let (mv, _) = s.negamax(&mut pos, -LIMIT_SCORE, LIMIT_SCORE, 2);
        assert!(!mv.is_null());

        s.height = 3;
        assert_eq!(s.negamax(&mut pos, -LIMIT_SCORE, LIMIT_SCORE, 2), (Move::NULL, 0));
        assert_eq!(s.height(), 3);
    }

    #[test]
    fn expired_clock_returns_without_counting() {
        let mut s = searcher();
        s.set_time_for_move(1);
        s.reset_clock();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let mut pos = Position::starting_position();
        assert_eq!(s.negamax(&mut pos, -LIMIT_SCORE, LIMIT_SCORE, 5), (Move::NULL, 0));
        assert_eq!(s.nodes(), 0);
        assert_eq!(s.height(), 0);
        assert_eq!(pos.stack_depth(), 0);
    }

    #[test]
    fn zero_budget_disables_the_deadline() {
        let mut s = searcher();
        s.set_time_for_move(0);
        s.reset_clock();
        std::thread::sleep(std::time::Duration::from_millis(3));
        let mut pos = Position::starting_position();
        let (mv, _) = s.negamax(&mut pos, -LIMIT_SCORE, LIMIT_SCORE, 2);
        assert!(!mv.is_null());
        assert!(s.nodes() > 20);
    }

    #[test]
    fn quiet_cutoffs_feed_killers_and_history() {
        let mut s = searcher();
        let mut pos = Position::starting_position();
        s.negamax(&mut pos, -LIMIT_SCORE, LIMIT_SCORE, 4);
        let killers = &s.heuristics().killers;
        let found = [Color::White, Color::Black]
            .into_iter()
            .any(|side| (0..=6).any(|d| !killers.get(side, d)[0].is_null()));
        assert!(found, "a depth 4 search should produce quiet cutoffs");
    }

    #[test]
    fn tt_cutoff_is_skipped_at_the_root() {
        let mut s = searcher();
        let mut pos = Position::starting_position();
        let bogus = pos.parse_uci_move("a2a3").unwrap();
        s.tt.store(pos.hash(), bogus, 12_345, 50, NodeKind::Pv, 0);

        let (mv, score) = s.negamax(&mut pos, -1, 0, 2);
        assert!(!mv.is_null());
        assert!(score.abs() < 1_000, "root reused the stored score: {score}");

        // One ply down the same entry ends the node.
        s.height = 1;
        assert_eq!(s.negamax(&mut pos, -1, 0, 2), (bogus, 12_345));
        assert_eq!(s.height(), 1);
    }

    #[test]
    fn quiet_cutoff_updates_killers_and_history_exactly() {
        let mut s = searcher();
        let mut pos = Position::starting_position();

        // Any quiet first move clears beta = -100, so the node cuts after one move.
        let (mv, score) = s.negamax(&mut pos, -101, -100, 2);
        assert!(score >= -100);
        assert!(!mv.is_capture());
        let h = s.heuristics();
        assert_eq!(h.killers.get(Color::White, 2), [mv, Move::NULL]);
        assert_eq!(h.history.score(Color::White, mv), 4);
        assert_eq!(h.killers.get(Color::White, 1), [Move::NULL; 2]);
        assert_eq!(h.killers.get(Color::Black, 1), [Move::NULL; 2]);

        // The killer is tried first next time; slot 0 shifts into slot 1.
        let (again, _) = s.negamax(&mut pos, -101, -100, 2);
        assert_eq!(again, mv);
        let h = s.heuristics();
        assert_eq!(h.killers.get(Color::White, 2), [mv, mv]);
        assert_eq!(h.history.score(Color::White, mv), 8);
    }

    #[test]
    fn late_moves_are_pruned_after_the_threshold() {
        let mut s = searcher();
        let mut pos = Position::starting_position();

        // No move reaches alpha = 89, so nothing cuts off. At depth 1 the
        // node makes 9 of its 20 moves; each child is a driver node plus a
        // quiescence node.
        let (mv, score) = s.negamax(&mut pos, 89, 90, 1);
        assert!(score <= 89);
        assert!(!mv.is_null());
        assert_eq!(s.nodes(), 1 + 9 * 2);
    }

    #[test]
    fn quiescence_wins_hanging_material() {
        let mut s = searcher();
        // White to move can take a loose queen on d5.
        let mut pos: Position = "4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1".parse().unwrap();
        let stand_pat = evaluate(&pos);
        let q = s.quiesce(&mut pos, -LIMIT_SCORE, LIMIT_SCORE);
        assert!(q > stand_pat + 500, "q={q} stand_pat={stand_pat}");
        assert_eq!(pos.stack_depth(), 0);
    }

    #[test]
    fn quiescence_is_fail_hard() {
        let mut s = searcher();
        let mut pos = Position::starting_position();
        assert_eq!(s.quiesce(&mut pos, -500, -400), -400);
        assert_eq!(s.quiesce(&mut pos, 400, 500), 400);
    }
}
