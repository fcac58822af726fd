//! Session State Machine: drives one game from the opening word to a
//! terminal outcome.
//!
//! ```text
//! AwaitFirstWord → Submitting → ReadingResult ─┬─ Accepted → Submitting | Won | LostMaxAttempts
//!                      ▲                       └─ Rejected ─┘
//!                      └───────────────────────────────┘
//! ```
//!
//! Any board or solver failure outside a terminal state aborts the session.
//! The only retry is the rejected-word path, which sends `SKIP` and submits
//! the replacement without spending an attempt.

use derive_getters::Getters;
use derive_new::new;
use tracing::{debug, info, instrument, warn};
use wordle_board::{Feedback, MAX_ATTEMPTS, RowResult, WORD_LENGTH};

use crate::board::{Board, BoardError};
use crate::solver::{ChannelError, Solver, SolverMessage, SolverRequest};

/// Why a session was abandoned.
#[derive(Debug, Clone, derive_more::Display)]
pub enum AbortReason {
    /// The board could not be driven.
    #[display("board failure: {}", _0)]
    Board(BoardError),

    /// The solver exchange broke down.
    #[display("solver channel failure: {}", _0)]
    Channel(ChannelError),

    /// The solver answered `ERROR`.
    #[display("solver reported an error: {}", _0)]
    SolverError(String),

    /// The solver answered `FAILED`.
    #[display("solver ran out of candidates")]
    SolverFailed,

    /// A `SKIP` request got something other than a replacement word.
    #[display("no replacement word, solver replied {:?}", _0)]
    NoReplacement(String),

    /// The solver claimed a win the board never showed.
    #[display("solver reported solved for non-winning feedback")]
    UnexpectedSolved,
}

impl From<BoardError> for AbortReason {
    fn from(err: BoardError) -> Self {
        Self::Board(err)
    }
}

impl From<ChannelError> for AbortReason {
    fn from(err: ChannelError) -> Self {
        Self::Channel(err)
    }
}

impl AbortReason {
    /// Maps a reply that is neither a word nor an expected `SOLVED`.
    fn from_reply(reply: SolverMessage) -> Self {
        match reply {
            SolverMessage::Error(detail) => Self::SolverError(detail),
            SolverMessage::Failed => Self::SolverFailed,
            other => Self::NoReplacement(other.to_string()),
        }
    }
}

/// Where a session stands.
#[derive(Debug, Clone, derive_more::Display)]
pub enum SessionOutcome {
    /// Still being played.
    #[display("in progress")]
    InProgress,
    /// Reached an all-correct row.
    #[display("won")]
    Won,
    /// Used every attempt without a win.
    #[display("lost")]
    LostMaxAttempts,
    /// Abandoned on an error.
    #[display("aborted ({})", _0)]
    Aborted(AbortReason),
}

impl SessionOutcome {
    /// True for every outcome except [`SessionOutcome::InProgress`].
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    /// True for [`SessionOutcome::Won`].
    pub fn is_won(&self) -> bool {
        matches!(self, Self::Won)
    }
}

/// One submitted word and how the board answered.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct Guess {
    /// Word typed into the board.
    word: String,
    /// What the board showed for it.
    result: RowResult,
}

/// State of one game.
#[derive(Debug, Clone, Getters)]
pub struct GameSession {
    /// 0-based index of the row being played.
    attempt: usize,
    /// Word currently being submitted.
    current_word: Option<String>,
    /// Every submission in order, rejected ones included.
    history: Vec<Guess>,
    /// Current outcome.
    outcome: SessionOutcome,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// A session that has not yet received its first word.
    pub fn new() -> Self {
        Self {
            attempt: 0,
            current_word: None,
            history: Vec::new(),
            outcome: SessionOutcome::InProgress,
        }
    }

    /// Number of rows the board accepted.
    pub fn attempts_used(&self) -> usize {
        self.history.iter().filter(|g| g.result.is_accepted()).count()
    }
}

/// Step of the state machine about to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the solver's opening word.
    AwaitFirstWord,
    /// Typing the current word.
    Submitting,
    /// Reading the row for the current attempt.
    ReadingResult,
    /// The board refused the word (or the read was ambiguous).
    Rejected,
    /// The board scored the word; decide what comes next.
    Accepted(Feedback),
    /// The outcome is terminal.
    Finished,
}

/// Runs a [`GameSession`] against a board and a solver.
pub struct SessionDriver<'a, B: ?Sized, S: ?Sized> {
    board: &'a mut B,
    solver: &'a mut S,
    session: GameSession,
    phase: SessionPhase,
}

impl<'a, B, S> SessionDriver<'a, B, S>
where
    B: Board + ?Sized,
    S: Solver + ?Sized,
{
    /// Prepares a fresh session. The solver must already be started.
    pub fn new(board: &'a mut B, solver: &'a mut S) -> Self {
        Self {
            board,
            solver,
            session: GameSession::new(),
            phase: SessionPhase::AwaitFirstWord,
        }
    }

    /// The step that the next call to [`step`](Self::step) will run.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The session so far.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Runs until the outcome is terminal.
    #[instrument(skip(self))]
    pub async fn run(mut self) -> GameSession {
        while self.phase != SessionPhase::Finished {
            self.step().await;
        }
        info!(
            outcome = %self.session.outcome,
            attempts = self.session.attempts_used(),
            "Session finished"
        );
        self.session
    }

    /// Performs one transition and returns the new phase.
    ///
    /// Calling this once the session is finished does nothing.
    pub async fn step(&mut self) -> SessionPhase {
        let result = match self.phase {
            SessionPhase::AwaitFirstWord => self.await_first_word().await,
            SessionPhase::Submitting => self.submit().await,
            SessionPhase::ReadingResult => Ok(self.read_result().await),
            SessionPhase::Rejected => self.retry_rejected().await,
            SessionPhase::Accepted(feedback) => self.decide(feedback).await,
            SessionPhase::Finished => Ok(SessionPhase::Finished),
        };

        self.phase = match result {
            Ok(next) => next,
            Err(reason) => {
                warn!(attempt = self.session.attempt, %reason, "Session aborted");
                self.finish(SessionOutcome::Aborted(reason))
            }
        };
        self.phase
    }

    fn finish(&mut self, outcome: SessionOutcome) -> SessionPhase {
        self.session.outcome = outcome;
        SessionPhase::Finished
    }

    #[instrument(skip(self))]
    async fn await_first_word(&mut self) -> Result<SessionPhase, AbortReason> {
        let word = self.solver.read_first_word().await?;
        info!(%word, "Opening word");
        self.session.attempt = 0;
        self.session.current_word = Some(word);
        Ok(SessionPhase::Submitting)
    }

    #[instrument(skip(self), fields(attempt = self.session.attempt))]
    async fn submit(&mut self) -> Result<SessionPhase, AbortReason> {
        let word = self
            .session
            .current_word
            .as_deref()
            .ok_or_else(|| BoardError::new("no word to submit"))?;
        debug!(word, "Submitting word");
        self.board.submit_word(word).await?;
        Ok(SessionPhase::ReadingResult)
    }

    #[instrument(skip(self), fields(attempt = self.session.attempt))]
    async fn read_result(&mut self) -> SessionPhase {
        let result = self.board.read_row(self.session.attempt).await;
        let word = self.session.current_word.clone().unwrap_or_default();
        debug!(%word, %result, "Row read");
        self.session.history.push(Guess::new(word, result));

        match result {
            RowResult::Feedback(feedback) => SessionPhase::Accepted(feedback),
            RowResult::Rejected => SessionPhase::Rejected,
            RowResult::Indeterminate => {
                warn!("Row could not be read, treating word as rejected");
                SessionPhase::Rejected
            }
        }
    }

    #[instrument(skip(self), fields(attempt = self.session.attempt))]
    async fn retry_rejected(&mut self) -> Result<SessionPhase, AbortReason> {
        info!(word = ?self.session.current_word, "Word rejected, asking for a replacement");
        self.board.erase_current_word(WORD_LENGTH).await?;

        match self.solver.request_next(SolverRequest::Skip).await? {
            SolverMessage::Word(word) => {
                debug!(%word, "Replacement word");
                self.session.current_word = Some(word);
                Ok(SessionPhase::Submitting)
            }
            other => Err(AbortReason::from_reply(other)),
        }
    }

    #[instrument(skip(self, feedback), fields(attempt = self.session.attempt, %feedback))]
    async fn decide(&mut self, feedback: Feedback) -> Result<SessionPhase, AbortReason> {
        if feedback.is_solved() {
            match self.solver.request_next(SolverRequest::Solved).await {
                Ok(reply) => debug!(%reply, "Solver acknowledged the win"),
                Err(e) => warn!(error = %e, "Solver did not acknowledge the win"),
            }
            info!(attempts = self.session.attempt + 1, "Puzzle solved");
            return Ok(self.finish(SessionOutcome::Won));
        }

        if self.session.attempt + 1 >= MAX_ATTEMPTS {
            info!("Out of attempts");
            return Ok(self.finish(SessionOutcome::LostMaxAttempts));
        }

        match self
            .solver
            .request_next(SolverRequest::Feedback(feedback))
            .await?
        {
            SolverMessage::Word(word) => {
                self.session.attempt += 1;
                debug!(%word, attempt = self.session.attempt, "Next word");
                self.session.current_word = Some(word);
                Ok(SessionPhase::Submitting)
            }
            SolverMessage::Solved { .. } => Err(AbortReason::UnexpectedSolved),
            other => Err(AbortReason::from_reply(other)),
        }
    }
}

/// What a finished session contributed to a match.
#[derive(Debug, Clone, Getters)]
pub struct SessionReport {
    /// 0-based index of the game in its match.
    game: usize,
    /// Terminal outcome.
    outcome: SessionOutcome,
    /// Rows the board accepted.
    attempts: usize,
    /// Every submission in order.
    history: Vec<Guess>,
}

impl SessionReport {
    /// Summarizes `session` as game number `game`.
    pub fn new(game: usize, session: GameSession) -> Self {
        Self {
            game,
            attempts: session.attempts_used(),
            outcome: session.outcome,
            history: session.history,
        }
    }
}
