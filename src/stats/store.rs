//! JSON persistence for [`MatchStatistics`].

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::{MatchStatistics, StatsError};

/// On-disk layout, one field per attempt bucket.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StatsRecord {
    #[serde(default)]
    games_played: u32,
    #[serde(default, alias = "wins")]
    games_won: u32,
    #[serde(rename = "1_guess", default)]
    one_guess: u32,
    #[serde(rename = "2_guess", default)]
    two_guess: u32,
    #[serde(rename = "3_guess", default)]
    three_guess: u32,
    #[serde(rename = "4_guess", default)]
    four_guess: u32,
    #[serde(rename = "5_guess", default)]
    five_guess: u32,
    #[serde(rename = "6_guess", default)]
    six_guess: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_played: Option<DateTime<Utc>>,
}

impl From<&MatchStatistics> for StatsRecord {
    fn from(stats: &MatchStatistics) -> Self {
        let [one, two, three, four, five, six] = *stats.wins_by_attempts();
        Self {
            games_played: *stats.games_played(),
            games_won: *stats.games_won(),
            one_guess: one,
            two_guess: two,
            three_guess: three,
            four_guess: four,
            five_guess: five,
            six_guess: six,
            last_played: *stats.last_played(),
        }
    }
}

impl TryFrom<StatsRecord> for MatchStatistics {
    type Error = StatsError;

    fn try_from(record: StatsRecord) -> Result<Self, Self::Error> {
        MatchStatistics::from_parts(
            record.games_played,
            record.games_won,
            [
                record.one_guess,
                record.two_guess,
                record.three_guess,
                record.four_guess,
                record.five_guess,
                record.six_guess,
            ],
            record.last_played,
        )
    }
}

/// Reads and writes statistics at a fixed path.
#[derive(Debug, Clone)]
pub struct StatsStore {
    path: PathBuf,
}

impl StatsStore {
    /// Creates a store backed by `path`. Nothing is read until
    /// [`load`](Self::load).
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads statistics. A missing file yields empty statistics.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] if the file cannot be read, is not valid JSON,
    /// or breaks the statistics invariants.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<MatchStatistics, StatsError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No statistics file yet, starting empty");
                return Ok(MatchStatistics::new());
            }
            Err(e) => {
                return Err(StatsError::new(format!(
                    "Failed to read '{}': {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let record: StatsRecord = serde_json::from_str(&content).map_err(|e| {
            StatsError::new(format!("Failed to parse '{}': {}", self.path.display(), e))
        })?;
        let stats = MatchStatistics::try_from(record)?;

        debug!(
            games_played = stats.games_played(),
            games_won = stats.games_won(),
            "Statistics loaded"
        );
        Ok(stats)
    }

    /// Writes `stats`, replacing the file atomically.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] if serialization or any filesystem step fails.
    #[instrument(skip(self, stats), fields(path = %self.path.display()))]
    pub fn save(&self, stats: &MatchStatistics) -> Result<(), StatsError> {
        let json = serde_json::to_string_pretty(&StatsRecord::from(stats))
            .map_err(|e| StatsError::new(format!("Failed to serialize statistics: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StatsError::new(format!("Failed to create '{}': {}", parent.display(), e))
            })?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, json)
            .map_err(|e| StatsError::new(format!("Failed to write '{}': {}", tmp.display(), e)))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            StatsError::new(format!(
                "Failed to move '{}' into place: {}",
                tmp.display(),
                e
            ))
        })?;

        info!(
            games_played = stats.games_played(),
            games_won = stats.games_won(),
            "Statistics saved"
        );
        Ok(())
    }
}
