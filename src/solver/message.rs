//! Solver line protocol messages.
//!
//! | Direction | Line | Meaning |
//! |---|---|---|
//! | solver → relay | `WORD:<word>` | next suggestion |
//! | solver → relay | `SOLVED:<word>:<attempts>` | puzzle finished |
//! | solver → relay | `UPDATED:<count>` | candidates narrowed, another line follows |
//! | solver → relay | `ERROR:<detail>` | request could not be handled |
//! | solver → relay | `FAILED` | no candidates left |
//! | relay → solver | `bygby` | feedback for the last word |
//! | relay → solver | `SKIP` | last word was refused, send another |
//! | relay → solver | `ggggg` | puzzle solved |

use std::fmt;

use wordle_board::Feedback;

use super::ChannelError;

/// One reply line from the solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverMessage {
    /// A word to play next.
    Word(String),
    /// The solver considers the puzzle finished.
    Solved {
        /// Winning word.
        word: String,
        /// Number of guesses the solver counted.
        attempts: u32,
    },
    /// The candidate pool now holds this many words.
    Updated(usize),
    /// The solver could not handle the request.
    Error(String),
    /// The solver ran out of candidates.
    Failed,
}

impl SolverMessage {
    /// Parses one reply line.
    ///
    /// The tag is everything before the first `:`; the remainder is the
    /// payload, split again on `:` for `SOLVED`.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Protocol`] for unknown tags or malformed
    /// payloads.
    pub fn parse(line: &str) -> Result<Self, ChannelError> {
        let line = line.trim();
        let protocol_error = || ChannelError::Protocol {
            line: line.to_string(),
        };

        let (tag, payload) = match line.split_once(':') {
            Some((tag, payload)) => (tag, Some(payload)),
            None => (line, None),
        };

        match (tag, payload) {
            ("WORD", Some(word)) if !word.trim().is_empty() => Ok(Self::Word(word.trim().to_string())),
            ("SOLVED", Some(payload)) => {
                let mut fields = payload.split(':');
                let word = fields.next().map(str::trim).filter(|w| !w.is_empty());
                let attempts = fields.next().and_then(|a| a.trim().parse().ok());
                match (word, attempts, fields.next()) {
                    (Some(word), Some(attempts), None) => Ok(Self::Solved {
                        word: word.to_string(),
                        attempts,
                    }),
                    _ => Err(protocol_error()),
                }
            }
            ("UPDATED", Some(count)) => count
                .trim()
                .parse()
                .map(Self::Updated)
                .map_err(|_| protocol_error()),
            ("ERROR", detail) => Ok(Self::Error(detail.unwrap_or_default().trim().to_string())),
            ("FAILED", _) => Ok(Self::Failed),
            _ => Err(protocol_error()),
        }
    }
}

impl fmt::Display for SolverMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(word) => write!(f, "WORD:{word}"),
            Self::Solved { word, attempts } => write!(f, "SOLVED:{word}:{attempts}"),
            Self::Updated(count) => write!(f, "UPDATED:{count}"),
            Self::Error(detail) => write!(f, "ERROR:{detail}"),
            Self::Failed => f.write_str("FAILED"),
        }
    }
}

/// One request line sent to the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverRequest {
    /// Feedback for the last submitted word.
    Feedback(Feedback),
    /// The game refused the last word; ask for a replacement.
    Skip,
    /// Acknowledge a solved puzzle.
    Solved,
}

impl fmt::Display for SolverRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feedback(feedback) => write!(f, "{feedback}"),
            Self::Skip => f.write_str("SKIP"),
            Self::Solved => write!(f, "{}", Feedback::SOLVED),
        }
    }
}
