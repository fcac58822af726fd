//! Per-tile feedback encoding.
//!
//! On the wire a row of feedback is five symbols: `g` (correct), `y`
//! (present elsewhere) and `b` (absent), e.g. `bygby`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::WORD_LENGTH;

/// Correctness of a single tile.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TileState {
    /// Right letter, right position.
    Correct,
    /// Letter is in the word at another position.
    Present,
    /// Letter is not in the word (or all of its copies are used up).
    Absent,
}

impl TileState {
    /// Returns the protocol symbol for this state.
    pub fn symbol(self) -> char {
        match self {
            Self::Correct => 'g',
            Self::Present => 'y',
            Self::Absent => 'b',
        }
    }

    /// Parses a protocol symbol, ignoring case.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_lowercase() {
            'g' => Some(Self::Correct),
            'y' => Some(Self::Present),
            'b' => Some(Self::Absent),
            _ => None,
        }
    }
}

/// Feedback for one accepted word: exactly [`WORD_LENGTH`] tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Feedback([TileState; WORD_LENGTH]);

impl Feedback {
    /// Feedback for a solved row.
    pub const SOLVED: Self = Self([TileState::Correct; WORD_LENGTH]);

    /// Creates feedback from tile states.
    pub fn new(tiles: [TileState; WORD_LENGTH]) -> Self {
        Self(tiles)
    }

    /// Returns the tile states in board order.
    pub fn tiles(&self) -> &[TileState; WORD_LENGTH] {
        &self.0
    }

    /// True when every tile is correct.
    pub fn is_solved(&self) -> bool {
        self.0.iter().all(|t| *t == TileState::Correct)
    }

    /// Scores `guess` against `answer` the way the game does.
    ///
    /// Greens are assigned first; yellows are then handed out from whatever
    /// copies of each letter the greens did not consume, so a repeated letter
    /// is only marked present as many times as it occurs in the answer.
    ///
    /// Returns `None` unless both words are [`WORD_LENGTH`] ASCII letters.
    #[instrument]
    pub fn score(guess: &str, answer: &str) -> Option<Self> {
        let guess = normalize_word(guess)?;
        let answer = normalize_word(answer)?;

        let mut tiles = [TileState::Absent; WORD_LENGTH];
        let mut unmatched = [0u8; 26];

        for i in 0..WORD_LENGTH {
            if guess[i] == answer[i] {
                tiles[i] = TileState::Correct;
            } else {
                unmatched[usize::from(answer[i] - b'a')] += 1;
            }
        }

        for i in 0..WORD_LENGTH {
            if tiles[i] == TileState::Correct {
                continue;
            }
            let remaining = &mut unmatched[usize::from(guess[i] - b'a')];
            if *remaining > 0 {
                *remaining -= 1;
                tiles[i] = TileState::Present;
            }
        }

        Some(Self(tiles))
    }
}

fn normalize_word(word: &str) -> Option<[u8; WORD_LENGTH]> {
    let bytes = word.as_bytes();
    if bytes.len() != WORD_LENGTH || !bytes.iter().all(u8::is_ascii_alphabetic) {
        return None;
    }
    let mut out = [0u8; WORD_LENGTH];
    for (slot, b) in out.iter_mut().zip(bytes) {
        *slot = b.to_ascii_lowercase();
    }
    Some(out)
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tile in &self.0 {
            write!(f, "{}", tile.symbol())?;
        }
        Ok(())
    }
}

impl FromStr for Feedback {
    type Err = FeedbackParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let found = s.chars().count();
        if found != WORD_LENGTH {
            return Err(FeedbackParseError::Length { found });
        }

        let mut tiles = [TileState::Absent; WORD_LENGTH];
        for (slot, symbol) in tiles.iter_mut().zip(s.chars()) {
            *slot = TileState::from_symbol(symbol).ok_or(FeedbackParseError::Symbol { symbol })?;
        }
        Ok(Self(tiles))
    }
}

/// Error parsing a feedback string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum FeedbackParseError {
    /// Wrong number of symbols.
    #[display("feedback must have {} symbols, found {}", WORD_LENGTH, found)]
    Length {
        /// Number of symbols actually present.
        found: usize,
    },

    /// A symbol other than `g`, `y` or `b`.
    #[display("invalid feedback symbol {:?}", symbol)]
    Symbol {
        /// The offending symbol.
        symbol: char,
    },
}

impl std::error::Error for FeedbackParseError {}
