//! Relay configuration loaded from TOML.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use wordle_board::{AdapterRegistry, GameAdapterConfig, presets};

use crate::board::SettlePolicy;
use crate::solver::SolverCommand;

/// Top-level configuration for a relay run.
///
/// ```toml
/// game = "wordly"
/// games = 10
/// stats_path = "data/wordly_results.json"
///
/// [solver]
/// program = "./solver"
///
/// [settle]
/// attempts = 10
/// interval_ms = 500
/// ```
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Registered adapter id to play.
    #[serde(default = "default_game")]
    game: String,

    /// Overrides the adapter's page URL.
    #[serde(default)]
    url: Option<String>,

    /// How to launch the solver.
    solver: SolverCommand,

    /// Number of games per match.
    #[serde(default = "default_games")]
    games: usize,

    /// Where match statistics are persisted.
    #[serde(default = "default_stats_path")]
    stats_path: PathBuf,

    /// Polling bounds for page reads.
    #[serde(default)]
    settle: SettleConfig,

    /// Pause between typed letters, in milliseconds.
    #[serde(default)]
    key_delay_ms: u64,

    /// Extra adapters, registered on top of the built-in ones.
    #[serde(default)]
    adapters: BTreeMap<String, GameAdapterConfig>,
}

/// Serialized form of [`SettlePolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SettleConfig {
    /// Maximum number of reads.
    #[serde(default = "default_settle_attempts")]
    attempts: u32,

    /// Pause between reads, in milliseconds.
    #[serde(default = "default_settle_interval_ms")]
    interval_ms: u64,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            attempts: default_settle_attempts(),
            interval_ms: default_settle_interval_ms(),
        }
    }
}

#[instrument]
fn default_game() -> String {
    presets::NYT.to_string()
}

#[instrument]
fn default_games() -> usize {
    1
}

#[instrument]
fn default_stats_path() -> PathBuf {
    PathBuf::from("data/results.json")
}

fn default_settle_attempts() -> u32 {
    10
}

fn default_settle_interval_ms() -> u64 {
    500
}

impl RelayConfig {
    /// Creates a configuration for `game` played with `solver`, other fields
    /// at their defaults.
    #[instrument(skip(game, solver), fields(game = %game))]
    pub fn new(game: String, solver: SolverCommand) -> Self {
        Self {
            game,
            url: None,
            solver,
            games: default_games(),
            stats_path: default_stats_path(),
            settle: SettleConfig::default(),
            key_delay_ms: 0,
            adapters: BTreeMap::new(),
        }
    }

    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        if config.games == 0 {
            return Err(ConfigError::new("games must be at least 1".to_string()));
        }

        info!(game = %config.game, games = config.games, "Config loaded successfully");
        Ok(config)
    }

    /// Sets the adapter id to play.
    pub fn with_game(mut self, game: impl Into<String>) -> Self {
        self.game = game.into();
        self
    }

    /// Sets the number of games per match.
    pub fn with_games(mut self, games: usize) -> Self {
        self.games = games;
        self
    }

    /// Sets the statistics file path.
    pub fn with_stats_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.stats_path = path.into();
        self
    }

    /// Built-in adapters plus the ones defined in this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an extra adapter is invalid.
    #[instrument(skip(self))]
    pub fn registry(&self) -> Result<AdapterRegistry, ConfigError> {
        let mut registry = AdapterRegistry::builtin();
        for (id, adapter) in &self.adapters {
            registry
                .register(id.clone(), adapter.clone())
                .map_err(|e| ConfigError::new(format!("Invalid adapter `{}`: {}", id, e)))?;
        }
        debug!(count = registry.len(), "Adapter registry built");
        Ok(registry)
    }

    /// The adapter for [`game`](Self::game), with the URL override applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the game id is unknown or an adapter is
    /// invalid.
    #[instrument(skip(self), fields(game = %self.game))]
    pub fn adapter(&self) -> Result<GameAdapterConfig, ConfigError> {
        let registry = self.registry()?;
        let adapter = registry
            .lookup(&self.game)
            .map_err(|e| ConfigError::new(e.to_string()))?
            .clone();

        Ok(match &self.url {
            Some(url) => {
                debug!(%url, "Overriding adapter url");
                adapter.with_url(url.clone())
            }
            None => adapter,
        })
    }

    /// Polling bounds for page reads.
    pub fn settle_policy(&self) -> SettlePolicy {
        SettlePolicy::new(
            self.settle.attempts,
            Duration::from_millis(self.settle.interval_ms),
        )
    }

    /// Pause between typed letters.
    pub fn key_delay(&self) -> Duration {
        Duration::from_millis(self.key_delay_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
