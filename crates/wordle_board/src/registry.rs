//! Game adapter registry.

use std::collections::BTreeMap;

use derive_more::{Display, Error};
use tracing::{debug, info, instrument, warn};

use crate::{AdapterError, GameAdapterConfig, presets};

/// Lookup of adapter configurations by game id.
#[derive(Debug, Clone, Default)]
pub struct AdapterRegistry {
    adapters: BTreeMap<String, GameAdapterConfig>,
}

impl AdapterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in adapters.
    #[instrument]
    pub fn builtin() -> Self {
        let mut adapters = BTreeMap::new();
        adapters.insert(presets::NYT.to_string(), presets::nyt());
        adapters.insert(presets::WORDLY.to_string(), presets::wordly());
        info!(count = adapters.len(), "Built-in adapters registered");
        Self { adapters }
    }

    /// Validates `config` and registers it under `game_id`, replacing any
    /// existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] if the configuration is invalid.
    #[instrument(skip(self, config), fields(name = %config.name()))]
    pub fn register(
        &mut self,
        game_id: impl Into<String> + std::fmt::Debug,
        config: GameAdapterConfig,
    ) -> Result<(), AdapterError> {
        config.validate()?;
        let game_id = game_id.into();
        if self.adapters.insert(game_id.clone(), config).is_some() {
            warn!(%game_id, "Replaced existing adapter");
        } else {
            debug!(%game_id, "Registered adapter");
        }
        Ok(())
    }

    /// Looks up the configuration for `game_id`.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownGame`] if nothing is registered under that id.
    #[instrument(skip(self))]
    pub fn lookup(&self, game_id: &str) -> Result<&GameAdapterConfig, UnknownGame> {
        self.adapters.get(game_id).ok_or_else(|| {
            warn!(game_id, "No adapter registered");
            UnknownGame {
                game_id: game_id.to_string(),
            }
        })
    }

    /// Registered ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.adapters.keys().map(String::as_str)
    }

    /// Iterates over `(id, config)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GameAdapterConfig)> {
        self.adapters.iter().map(|(id, config)| (id.as_str(), config))
    }

    /// Number of registered adapters.
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// True if no adapters are registered.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

/// No adapter is registered under the requested id.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("unknown game `{}`", game_id)]
pub struct UnknownGame {
    /// The id that was looked up.
    pub game_id: String,
}
