//! Match statistics and their on-disk record.

mod error;
mod store;

pub use error::StatsError;
pub use store::StatsStore;

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use tracing::{debug, instrument, warn};
use wordle_board::MAX_ATTEMPTS;

use crate::SessionOutcome;

/// Running totals across matches.
///
/// Only [`record`](Self::record) mutates the totals, so `games_won` always
/// equals the sum of the per-attempt buckets and never exceeds
/// `games_played`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct MatchStatistics {
    /// Sessions folded in, whatever their outcome.
    games_played: u32,
    /// Sessions that ended in a win.
    games_won: u32,
    /// Wins indexed by attempt count minus one.
    wins_by_attempts: [u32; MAX_ATTEMPTS],
    /// When the last session was recorded.
    last_played: Option<DateTime<Utc>>,
}

impl MatchStatistics {
    /// Empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds statistics from stored totals.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] if the bucket sum differs from `games_won` or
    /// more games were won than played.
    #[instrument(skip(wins_by_attempts))]
    pub fn from_parts(
        games_played: u32,
        games_won: u32,
        wins_by_attempts: [u32; MAX_ATTEMPTS],
        last_played: Option<DateTime<Utc>>,
    ) -> Result<Self, StatsError> {
        let bucket_sum: u64 = wins_by_attempts.iter().map(|&n| u64::from(n)).sum();
        if bucket_sum != u64::from(games_won) {
            return Err(StatsError::new(format!(
                "games_won is {games_won} but per-attempt wins sum to {bucket_sum}"
            )));
        }
        if games_won > games_played {
            return Err(StatsError::new(format!(
                "games_won ({games_won}) exceeds games_played ({games_played})"
            )));
        }

        Ok(Self {
            games_played,
            games_won,
            wins_by_attempts,
            last_played,
        })
    }

    /// Folds one finished session into the totals.
    ///
    /// `attempts` is the number of rows the board accepted. A win outside
    /// `1..=MAX_ATTEMPTS` is counted as played but not won.
    #[instrument(skip(self))]
    pub fn record(&mut self, outcome: &SessionOutcome, attempts: usize) {
        if !outcome.is_terminal() {
            warn!("Recording a session that has not finished");
        }

        self.games_played += 1;
        self.last_played = Some(Utc::now());

        if outcome.is_won() {
            match attempts.checked_sub(1).and_then(|i| self.wins_by_attempts.get_mut(i)) {
                Some(bucket) => {
                    *bucket += 1;
                    self.games_won += 1;
                }
                None => warn!(attempts, "Win with out-of-range attempt count not counted"),
            }
        }

        debug!(
            games_played = self.games_played,
            games_won = self.games_won,
            "Statistics updated"
        );
    }

    /// Wins that took exactly `attempts` guesses.
    pub fn wins_in(&self, attempts: usize) -> u32 {
        attempts
            .checked_sub(1)
            .and_then(|i| self.wins_by_attempts.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// Win rate as a percentage (0.0–100.0).
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            (f64::from(self.games_won) / f64::from(self.games_played)) * 100.0
        }
    }

    /// Mean guesses per win, if any game was won.
    pub fn average_winning_attempts(&self) -> Option<f64> {
        if self.games_won == 0 {
            return None;
        }
        let total: u64 = self
            .wins_by_attempts
            .iter()
            .enumerate()
            .map(|(i, &n)| (i as u64 + 1) * u64::from(n))
            .sum();
        Some(total as f64 / f64::from(self.games_won))
    }
}
