//! Match Runner: plays consecutive games and folds them into statistics.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use derive_getters::Getters;
use tracing::{info, instrument, warn};

use crate::board::{Board, BoardError};
use crate::session::{SessionDriver, SessionReport};
use crate::solver::{Solver, SpawnError};
use crate::stats::MatchStatistics;

/// Cooperative cancellation flag, checked between sessions.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    /// A signal that has not been raised.
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the match to stop at the next session boundary.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// True once [`stop`](Self::stop) has been called on any clone.
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why a match ended.
#[derive(Debug, Clone, derive_more::Display)]
pub enum MatchEnd {
    /// Every requested game was played.
    #[display("completed")]
    Completed,
    /// The stop signal was raised.
    #[display("cancelled")]
    Cancelled,
    /// The site offers no new-game affordance, or it did not respond.
    #[display("new game unavailable")]
    NewGameUnavailable,
    /// The solver could not be restarted between games.
    #[display("solver restart failed: {}", _0)]
    SolverRestartFailed(SpawnError),
}

/// The match could not begin.
#[derive(Debug, Clone, derive_more::Display)]
pub enum MatchError {
    /// The game page did not load.
    #[display("{}", _0)]
    Navigate(BoardError),
    /// The solver did not start.
    #[display("{}", _0)]
    Spawn(SpawnError),
}

impl std::error::Error for MatchError {}

/// Everything a match produced.
#[derive(Debug, Clone, Getters)]
pub struct MatchReport {
    /// One report per finished session, in play order.
    sessions: Vec<SessionReport>,
    /// Why the match stopped.
    end: MatchEnd,
}

impl MatchReport {
    /// Sessions that ended in a win.
    pub fn wins(&self) -> usize {
        self.sessions.iter().filter(|s| s.outcome().is_won()).count()
    }
}

/// Runs games back to back on one board with one solver.
pub struct MatchRunner<B, S> {
    board: B,
    solver: S,
    url: String,
    stop: StopSignal,
}

impl<B: Board, S: Solver> MatchRunner<B, S> {
    /// Creates a runner that will open `url` on `board`.
    pub fn new(board: B, solver: S, url: impl Into<String>) -> Self {
        Self {
            board,
            solver,
            url: url.into(),
            stop: StopSignal::new(),
        }
    }

    /// Uses `stop` as the cancellation flag.
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    /// A handle that cancels this runner's match.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// The board being played.
    pub fn board(&self) -> &B {
        &self.board
    }

    /// The solver in use.
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Consumes the runner, returning its board and solver.
    pub fn into_parts(self) -> (B, S) {
        (self.board, self.solver)
    }

    /// Plays up to `games` sessions, recording each one in `stats` as it
    /// finishes.
    ///
    /// Aborted sessions are recorded and play continues. The solver is
    /// stopped before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] if the page does not load or the solver does
    /// not start. `stats` is untouched in that case.
    #[instrument(skip(self, stats), fields(url = %self.url))]
    pub async fn run(
        &mut self,
        games: usize,
        stats: &mut MatchStatistics,
    ) -> Result<MatchReport, MatchError> {
        info!(games, "Starting match");

        self.board
            .navigate(&self.url)
            .await
            .map_err(MatchError::Navigate)?;
        self.solver.start().await.map_err(MatchError::Spawn)?;

        let mut sessions = Vec::with_capacity(games);
        let mut end = MatchEnd::Completed;

        for game in 0..games {
            if self.stop.is_stopped() {
                info!(game, "Stop requested");
                end = MatchEnd::Cancelled;
                break;
            }

            let session = SessionDriver::new(&mut self.board, &mut self.solver)
                .run()
                .await;
            let report = SessionReport::new(game, session);
            stats.record(report.outcome(), *report.attempts());
            info!(
                game,
                outcome = %report.outcome(),
                attempts = report.attempts(),
                games_played = stats.games_played(),
                games_won = stats.games_won(),
                "Game finished"
            );
            sessions.push(report);

            if game + 1 == games || self.stop.is_stopped() {
                continue;
            }

            if !self.board.click_new_game().await {
                warn!(game, "Cannot start another game, ending match early");
                end = MatchEnd::NewGameUnavailable;
                break;
            }
            if let Err(e) = self.solver.reset().await {
                warn!(error = %e, "Solver restart failed, ending match early");
                end = MatchEnd::SolverRestartFailed(e);
                break;
            }
        }

        self.solver.stop().await;

        let report = MatchReport { sessions, end };
        info!(
            played = report.sessions.len(),
            wins = report.wins(),
            end = %report.end,
            "Match finished"
        );
        Ok(report)
    }
}
