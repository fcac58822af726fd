//! Wordle Relay library - plays Wordle-style games with an external solver
//!
//! The relay reads the board through a site adapter, forwards feedback to a
//! solver process over a line protocol, and types whatever the solver
//! suggests next.
//!
//! # Architecture
//!
//! - **Board**: page actions driven by [`GameAdapterConfig`] data
//! - **Solver**: external process lifecycle and the line protocol
//! - **Session**: state machine for one game
//! - **Match**: consecutive games with accumulated statistics
//!
//! # Example
//!
//! ```no_run
//! use wordle_relay::{
//!     AdapterBoard, AdapterRegistry, MatchRunner, MatchStatistics, SettlePolicy,
//!     SimulatedPage, SolverChannel, SolverCommand,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let adapter = AdapterRegistry::builtin().lookup("wordly")?.clone();
//! let page = SimulatedPage::new(adapter.clone(), Vec::new(), vec!["crane".to_string()])?;
//! let board = AdapterBoard::new(page, adapter.clone(), SettlePolicy::default());
//! let solver = SolverChannel::new(SolverCommand::new("./solver"));
//!
//! let mut stats = MatchStatistics::new();
//! let report = MatchRunner::new(board, solver, adapter.url().clone())
//!     .run(1, &mut stats)
//!     .await?;
//! println!("{} of {} won", report.wins(), report.sessions().len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod board;
mod config;
mod match_runner;
mod session;
mod solver;
mod stats;

// Crate-level exports - Board interface
pub use board::{AdapterBoard, Board, BoardError, Key, PageDriver, SettlePolicy, SimulatedPage};

// Crate-level exports - Configuration
pub use config::{ConfigError, RelayConfig, SettleConfig};

// Crate-level exports - Match runner
pub use match_runner::{MatchEnd, MatchError, MatchReport, MatchRunner, StopSignal};

// Crate-level exports - Session state machine
pub use session::{
    AbortReason, GameSession, Guess, SessionDriver, SessionOutcome, SessionPhase, SessionReport,
};

// Crate-level exports - Solver channel
pub use solver::{
    ChannelError, Solver, SolverChannel, SolverCommand, SolverLink, SolverMessage, SolverRequest,
    SpawnError,
};

// Crate-level exports - Statistics
pub use stats::{MatchStatistics, StatsError, StatsStore};

// Crate-level exports - Board data
pub use wordle_board::{
    AdapterError, AdapterRegistry, Feedback, FeedbackParseError, GameAdapterConfig, MAX_ATTEMPTS,
    RowResult, TileState, UnknownGame, WORD_LENGTH, presets,
};
