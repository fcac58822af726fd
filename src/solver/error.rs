//! Solver channel error types.

use std::time::Duration;

use derive_more::{Display, Error};
use tracing::instrument;

/// The solver executable could not be launched.
#[derive(Debug, Clone, Display, Error)]
#[display("Failed to start solver `{}`: {} at {}:{}", program, message, file, line)]
pub struct SpawnError {
    /// Program that was launched.
    pub program: String,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SpawnError {
    /// Creates a new spawn error with caller location tracking.
    #[track_caller]
    #[instrument(skip(program, message))]
    pub fn new(program: impl Into<String>, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            program: program.into(),
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// A request/response exchange with the solver went wrong.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ChannelError {
    /// A line did not match any known reply tag.
    #[display("unparseable solver line {:?}", line)]
    Protocol {
        /// The raw line.
        line: String,
    },

    /// A well-formed reply arrived where a different one was required.
    #[display("expected {} from solver, got {:?}", expected, line)]
    Desync {
        /// What the protocol required at this point.
        expected: &'static str,
        /// What was actually read (empty if nothing arrived).
        line: String,
    },

    /// The solver closed its output.
    #[display("solver closed its output")]
    Closed,

    /// No reply arrived in time.
    #[display("no reply from solver within {:?}", waited)]
    Timeout {
        /// How long the channel waited.
        waited: Duration,
    },

    /// Reading or writing the pipes failed.
    #[display("solver I/O failed: {}", message)]
    Io {
        /// Underlying I/O error text.
        message: String,
    },

    /// No solver process is running.
    #[display("solver is not running")]
    NotRunning,
}

impl std::error::Error for ChannelError {}

impl From<std::io::Error> for ChannelError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}
