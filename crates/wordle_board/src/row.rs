//! Outcome of reading one submitted row.

use std::fmt;

use crate::Feedback;

/// What the board showed after a word was submitted.
///
/// `Rejected` and `Indeterminate` are kept apart so a tile read that could
/// not be interpreted is never mistaken for the game refusing the word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowResult {
    /// The word was accepted and scored.
    Feedback(Feedback),
    /// The game refused the word (not in its dictionary).
    Rejected,
    /// The row could not be read: wrong tile count, unknown labels, or a
    /// failed lookup.
    Indeterminate,
}

impl RowResult {
    /// Returns the feedback if the word was accepted.
    pub fn feedback(&self) -> Option<&Feedback> {
        match self {
            Self::Feedback(feedback) => Some(feedback),
            Self::Rejected | Self::Indeterminate => None,
        }
    }

    /// True when the game scored the word.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Feedback(_))
    }
}

impl fmt::Display for RowResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feedback(feedback) => write!(f, "{feedback}"),
            Self::Rejected => f.write_str("rejected"),
            Self::Indeterminate => f.write_str("indeterminate"),
        }
    }
}
