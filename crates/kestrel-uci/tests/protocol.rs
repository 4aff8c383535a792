//! Command parsing feeding the search, the way the engine loop wires them.

use kestrel_engine::{Searcher, time_for_move};
use kestrel_uci::{Command, GoParams, parse_command};

fn position(line: &str) -> kestrel_core::Position {
    match parse_command(line).unwrap() {
        Command::Position(pos) => *pos,
        other => panic!("expected Position, got {other:?}"),
    }
}

fn go(line: &str) -> GoParams {
    match parse_command(line).unwrap() {
        Command::Go(params) => params,
        other => panic!("expected Go, got {other:?}"),
    }
}

fn budget_for(pos: &kestrel_core::Position, params: &GoParams) -> u64 {
    time_for_move(
        params.wtime,
        params.btime,
        params.winc,
        params.binc,
        params.movestogo,
        params.movetime,
        params.infinite,
        pos.board(),
    )
}

#[test]
fn depth_limited_go_answers_with_a_legal_move() {
    let mut pos = position("position startpos moves e2e4 c7c5 g1f3");
    let params = go("go depth 4");
    assert_eq!(budget_for(&pos, &params), 0);

    let mut searcher = Searcher::new(2);
    searcher.set_time_for_move(budget_for(&pos, &params));
    let result = searcher.search(&mut pos, params.depth.unwrap() as i32, |_, _, _, _| {});
    assert_eq!(result.depth, 4);
    assert!(pos.parse_uci_move(&result.best_move.to_uci()).is_ok());
}

#[test]
fn clock_go_uses_the_movers_clock() {
    let pos = position("position startpos moves e2e4");
    let params = go("go wtime 1000 btime 120000 winc 0 binc 0");
    let ms = budget_for(&pos, &params);
    assert!(ms > 1_000, "black has two minutes, got {ms} ms");
    assert!(ms <= 120_000 * 12 / 100);
}

#[test]
fn mate_is_reported_from_a_fen_position() {
    let mut pos = position("position fen 6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1");
    let params = go("go movetime 2000");
    let mut searcher = Searcher::new(2);
    searcher.set_time_for_move(budget_for(&pos, &params));
    let mut lines = Vec::new();
    let result = searcher.search(&mut pos, 4, |depth, score, _, mv| {
        lines.push(format!("depth {depth} {} {mv}", kestrel_uci::format_score(score)));
    });
    assert_eq!(result.best_move.to_uci(), "a1a8");
    assert_eq!(lines.last().map(String::as_str), Some("depth 4 mate 1 a1a8"));
}
