//! Site adapter configuration.
//!
//! An adapter is pure data: the selectors that locate the board, its rows and
//! tiles, the attribute that carries each tile's state, and the labels a site
//! uses for those states. Everything site-specific lives here so the session
//! logic never has to know which game it is playing.

use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{Feedback, RowResult, TileState, WORD_LENGTH};

/// Placeholder replaced by the 1-based row number in
/// [`GameAdapterConfig::row_selector_template`].
pub const ROW_PLACEHOLDER: &str = "{row}";

/// Site-specific markup description for one Wordle implementation.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_", into)]
pub struct GameAdapterConfig {
    /// Human-readable site name.
    name: String,

    /// Page that hosts the game.
    url: String,

    /// Selector that matches once the board has rendered.
    board_selector: String,

    /// Selector for one row; contains [`ROW_PLACEHOLDER`] exactly once.
    row_selector_template: String,

    /// Selector for the tiles inside a row.
    tile_selector: String,

    /// Attribute (or property) holding the tile state label.
    state_attribute: String,

    /// Label for a correct tile.
    correct_label: String,

    /// Label for a present tile.
    present_label: String,

    /// Label for an absent tile.
    absent_label: String,

    /// Label for a tile that has been typed but not scored.
    unresolved_label: String,

    /// Text of the "new game" button, if the site offers one.
    #[serde(default)]
    #[setters(strip_option)]
    new_game_button: Option<String>,

    /// Selector of a button that must be clicked before the board is
    /// playable, such as a splash screen's "Play".
    #[serde(default)]
    #[setters(strip_option)]
    start_selector: Option<String>,

    /// Selectors of popups to close once the game has started, in order.
    /// Missing popups are skipped.
    #[serde(default)]
    dismiss_selectors: Vec<String>,
}

impl GameAdapterConfig {
    /// Starts a configuration for `name` hosted at `url`.
    ///
    /// The selector and label fields start empty; fill them in with the
    /// `with_*` setters and [`validate`](Self::validate) the result.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            board_selector: String::new(),
            row_selector_template: String::new(),
            tile_selector: String::new(),
            state_attribute: String::new(),
            correct_label: String::new(),
            present_label: String::new(),
            absent_label: String::new(),
            unresolved_label: String::new(),
            new_game_button: None,
            start_selector: None,
            dismiss_selectors: Vec::new(),
        }
    }

    /// Checks the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] if a field is empty, the row template does not
    /// contain exactly one [`ROW_PLACEHOLDER`], or two state labels collide.
    #[instrument(skip(self), fields(name = %self.name))]
    pub fn validate(&self) -> Result<(), AdapterError> {
        let required = [
            ("name", &self.name),
            ("url", &self.url),
            ("board_selector", &self.board_selector),
            ("row_selector_template", &self.row_selector_template),
            ("tile_selector", &self.tile_selector),
            ("state_attribute", &self.state_attribute),
            ("correct_label", &self.correct_label),
            ("present_label", &self.present_label),
            ("absent_label", &self.absent_label),
            ("unresolved_label", &self.unresolved_label),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(AdapterError::EmptyField { field });
            }
        }

        if matches!(&self.new_game_button, Some(label) if label.trim().is_empty()) {
            return Err(AdapterError::EmptyField {
                field: "new_game_button",
            });
        }

        if matches!(&self.start_selector, Some(selector) if selector.trim().is_empty()) {
            return Err(AdapterError::EmptyField {
                field: "start_selector",
            });
        }

        if self.dismiss_selectors.iter().any(|s| s.trim().is_empty()) {
            return Err(AdapterError::EmptyField {
                field: "dismiss_selectors",
            });
        }

        let found = self.row_selector_template.matches(ROW_PLACEHOLDER).count();
        if found != 1 {
            return Err(AdapterError::RowPlaceholder { found });
        }

        let labels = [
            normalize_label(&self.correct_label),
            normalize_label(&self.present_label),
            normalize_label(&self.absent_label),
            normalize_label(&self.unresolved_label),
        ];
        for (i, label) in labels.iter().enumerate() {
            if labels[i + 1..].contains(label) {
                return Err(AdapterError::DuplicateLabel {
                    label: label.clone(),
                });
            }
        }

        debug!("Adapter configuration valid");
        Ok(())
    }

    /// Selector for the row with the given 1-based number.
    pub fn row_selector(&self, row_number: usize) -> String {
        self.row_selector_template
            .replace(ROW_PLACEHOLDER, &row_number.to_string())
    }

    /// Maps a raw state label onto a tile state.
    ///
    /// Whitespace is normalized first, so class lists compare equal regardless
    /// of spacing.
    pub fn tile_state(&self, label: &str) -> Option<TileState> {
        let label = normalize_label(label);
        if label == normalize_label(&self.correct_label) {
            Some(TileState::Correct)
        } else if label == normalize_label(&self.present_label) {
            Some(TileState::Present)
        } else if label == normalize_label(&self.absent_label) {
            Some(TileState::Absent)
        } else {
            None
        }
    }

    /// The label this site uses for `state`.
    pub fn label_for(&self, state: TileState) -> &str {
        match state {
            TileState::Correct => &self.correct_label,
            TileState::Present => &self.present_label,
            TileState::Absent => &self.absent_label,
        }
    }

    /// True if `label` is the unresolved (typed, not scored) marker.
    pub fn is_unresolved(&self, label: &str) -> bool {
        normalize_label(label) == normalize_label(&self.unresolved_label)
    }

    /// Classifies the state labels read from one row's tiles.
    ///
    /// - tile count other than [`WORD_LENGTH`] is `Indeterminate`
    /// - the unresolved marker on tile 0 means the game refused the word
    /// - any tile without a final label is `Indeterminate`
    #[instrument(skip(self, states), fields(name = %self.name, tiles = states.len()))]
    pub fn classify(&self, states: &[Option<String>]) -> RowResult {
        if states.len() != WORD_LENGTH {
            debug!(expected = WORD_LENGTH, "Unexpected tile count");
            return RowResult::Indeterminate;
        }

        if states[0].as_deref().is_some_and(|s| self.is_unresolved(s)) {
            return RowResult::Rejected;
        }

        let mut tiles = [TileState::Absent; WORD_LENGTH];
        for (index, (slot, state)) in tiles.iter_mut().zip(states).enumerate() {
            match state.as_deref().and_then(|s| self.tile_state(s)) {
                Some(tile) => *slot = tile,
                None => {
                    debug!(index, state = ?state, "Tile has no final state");
                    return RowResult::Indeterminate;
                }
            }
        }

        RowResult::Feedback(Feedback::new(tiles))
    }

    /// Number of tiles carrying a final correct/present/absent label.
    pub fn settled_tiles(&self, states: &[Option<String>]) -> usize {
        states
            .iter()
            .filter(|s| s.as_deref().and_then(|s| self.tile_state(s)).is_some())
            .count()
    }
}

fn normalize_label(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// An adapter configuration that breaks an invariant.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum AdapterError {
    /// A required field is empty.
    #[display("adapter field `{}` must not be empty", field)]
    EmptyField {
        /// Field name.
        field: &'static str,
    },

    /// The row template has the wrong number of placeholders.
    #[display(
        "row selector template must contain `{}` exactly once, found {}",
        ROW_PLACEHOLDER,
        found
    )]
    RowPlaceholder {
        /// Number of placeholders found.
        found: usize,
    },

    /// Two tile states share the same label.
    #[display("state label {:?} is used for more than one state", label)]
    DuplicateLabel {
        /// The repeated label.
        label: String,
    },
}

impl std::error::Error for AdapterError {}
