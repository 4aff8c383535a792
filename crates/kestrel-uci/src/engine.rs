//! Event-driven UCI engine: commands are read on one thread, searches run on
//! another, and the main loop dispatches between them.

use std::io::{self, BufRead};
use std::sync::mpsc;
use std::time::Instant;

use tracing::{debug, info, warn};

use kestrel_core::{Move, Position};
use kestrel_engine::{
    DEFAULT_HASH_MB, MATE, MATE_THRESHOLD, MAX_PLY, SearchResult, Searcher, TimeBudget,
    time_for_move,
};

use crate::command::{Command, GoParams, MAX_HASH_MB, UciOption, parse_command};
use crate::error::UciError;

/// Settings adjustable with `setoption`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Transposition table size in megabytes.
    pub hash_mb: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hash_mb: DEFAULT_HASH_MB,
        }
    }
}

/// Events processed by the main loop.
enum EngineEvent {
    UciCommand(Result<Command, UciError>),
    SearchDone(SearchDone),
    InputClosed,
}

/// Sent back by the search thread: the result and the searcher it borrowed.
struct SearchDone {
    result: SearchResult,
    searcher: Searcher,
}

/// Render a score for an `info` line: `cp <n>`, or `mate <moves>` (negative
/// when the side to move is getting mated).
pub fn format_score(score: i32) -> String {
    if score.abs() >= MATE_THRESHOLD {
        let plies = MATE - score.abs();
        let moves = (plies + 1) / 2;
        if score > 0 {
            format!("mate {moves}")
        } else {
            format!("mate -{moves}")
        }
    } else {
        format!("cp {score}")
    }
}

/// The UCI engine.
///
/// The searcher is handed to a worker thread for the duration of a search
/// and comes back with the result. Stopping lowers the shared time budget,
/// so the search winds down through its normal deadline check.
pub struct UciEngine {
    position: Position,
    /// `None` while a search is running.
    searcher: Option<Searcher>,
    budget: TimeBudget,
    config: EngineConfig,
    pending_clear: bool,
    /// TT size to apply once the searcher returns.
    pending_resize: Option<usize>,
}

impl UciEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let hash_mb = config.hash_mb.clamp(1, MAX_HASH_MB);
        let searcher = Searcher::new(hash_mb);
        Self {
            position: Position::starting_position(),
            budget: searcher.time_budget(),
            searcher: Some(searcher),
            config: EngineConfig { hash_mb },
            pending_clear: false,
            pending_resize: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether a search is in progress.
    pub fn is_searching(&self) -> bool {
        self.searcher.is_none()
    }

    /// Run the event loop, reading stdin until `quit` or end of input.
    pub fn run(mut self) -> Result<(), UciError> {
        let (tx, rx) = mpsc::channel::<EngineEvent>();

        let stdin_tx = tx.clone();
        std::thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        warn!(error = %err, "failed to read stdin");
                        break;
                    }
                };
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                debug!(cmd = %trimmed, "received UCI command");
                if stdin_tx
                    .send(EngineEvent::UciCommand(parse_command(trimmed)))
                    .is_err()
                {
                    return;
                }
            }
            let _ = stdin_tx.send(EngineEvent::InputClosed);
        });

        for event in &rx {
            match event {
                EngineEvent::UciCommand(Ok(Command::Quit)) | EngineEvent::InputClosed => {
                    self.stop_and_wait(&rx);
                    break;
                }
                EngineEvent::UciCommand(Ok(cmd)) => self.handle_command(cmd, &tx),
                EngineEvent::UciCommand(Err(err)) => {
                    warn!(error = %err, "UCI parse error");
                }
                EngineEvent::SearchDone(done) => self.finish_search(done),
            }
        }

        info!("kestrel shutting down");
        Ok(())
    }

    fn handle_command(&mut self, cmd: Command, tx: &mpsc::Sender<EngineEvent>) {
        match cmd {
            Command::Uci => self.handle_uci(),
            Command::IsReady => println!("readyok"),
            Command::UciNewGame => self.handle_ucinewgame(),
            Command::Position(pos) => self.position = *pos,
            Command::Go(params) => self.handle_go(params, tx),
            Command::SetOption(option) => self.handle_setoption(option),
            Command::Stop => self.handle_stop(),
            Command::Quit | Command::Unknown(_) => {}
        }
    }

    fn handle_uci(&self) {
        println!("id name kestrel");
        println!("id author the kestrel developers");
        println!(
            "option name Hash type spin default {DEFAULT_HASH_MB} min 1 max {MAX_HASH_MB}"
        );
        println!("option name Clear Hash type button");
        println!("uciok");
    }

    fn handle_ucinewgame(&mut self) {
        self.position = Position::starting_position();
        match self.searcher.as_mut() {
            Some(searcher) => searcher.clear(),
            None => self.pending_clear = true,
        }
    }

    fn handle_setoption(&mut self, option: UciOption) {
        match option {
            UciOption::Hash(mb) => {
                info!(mb, "resizing transposition table");
                self.config.hash_mb = mb;
                match self.searcher.as_mut() {
                    Some(searcher) => searcher.resize_tt(mb),
                    None => self.pending_resize = Some(mb),
                }
            }
            UciOption::ClearHash => match self.searcher.as_mut() {
                Some(searcher) => searcher.clear(),
                None => self.pending_clear = true,
            },
            UciOption::Unsupported(name) => debug!(%name, "ignoring unknown option"),
        }
    }

    fn handle_go(&mut self, params: GoParams, tx: &mpsc::Sender<EngineEvent>) {
        let Some(mut searcher) = self.searcher.take() else {
            warn!("go received while searching, ignoring");
            return;
        };

        let budget_ms = time_for_move(
            params.wtime,
            params.btime,
            params.winc,
            params.binc,
            params.movestogo,
            params.movetime,
            params.infinite,
            self.position.board(),
        );
        searcher.set_time_for_move(budget_ms);
        let max_depth = params
            .depth
            .map_or(MAX_PLY as i32, |d| d.clamp(1, MAX_PLY as u32) as i32);
        debug!(budget_ms, max_depth, "starting search");

        let mut pos = self.position.clone();
        let tx = tx.clone();
        std::thread::spawn(move || {
            let start = Instant::now();
            let result = searcher.search(&mut pos, max_depth, |depth, score, nodes, best| {
                println!("{}", info_line(depth, score, nodes, start, best));
            });
            let _ = tx.send(EngineEvent::SearchDone(SearchDone { result, searcher }));
        });
    }

    fn handle_stop(&mut self) {
        if self.is_searching() {
            self.budget.expire();
        }
    }

    /// Stop a running search and block until its `bestmove` is out.
    fn stop_and_wait(&mut self, rx: &mpsc::Receiver<EngineEvent>) {
        if !self.is_searching() {
            return;
        }
        self.handle_stop();
        for event in rx {
            if let EngineEvent::SearchDone(done) = event {
                self.finish_search(done);
                return;
            }
        }
        warn!("search thread vanished before reporting");
    }

    fn finish_search(&mut self, done: SearchDone) {
        let SearchDone {
            result,
            mut searcher,
        } = done;

        debug!(
            depth = result.depth,
            nodes = result.nodes,
            hashfull = searcher.tt().hashfull(),
            "search finished"
        );

        if let Some(mb) = self.pending_resize.take() {
            // A fresh table is already empty.
            searcher.resize_tt(mb);
            if self.pending_clear {
                searcher.clear();
            }
        } else if self.pending_clear {
            searcher.clear();
        }
        self.pending_clear = false;
        self.searcher = Some(searcher);

        println!("bestmove {}", result.best_move);
    }
}

impl Default for UciEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn info_line(depth: i32, score: i32, nodes: u64, start: Instant, best: Move) -> String {
    let elapsed_ms = start.elapsed().as_millis().max(1);
    let nps = u128::from(nodes) * 1000 / elapsed_ms;
    format!(
        "info depth {depth} score {} nodes {nodes} nps {nps} time {elapsed_ms} pv {best}",
        format_score(score)
    )
}
