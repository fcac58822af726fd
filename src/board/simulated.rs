//! In-process game page for offline play and tests.

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};
use wordle_board::{Feedback, GameAdapterConfig, MAX_ATTEMPTS, WORD_LENGTH};

use super::{BoardError, Key, PageDriver};

/// A scored row on the simulated board.
#[derive(Debug, Clone)]
struct ScoredRow {
    word: String,
    feedback: Feedback,
}

/// Simulates a Wordle page that renders tiles with an adapter's own labels.
///
/// Words outside the dictionary are refused the way a real site refuses
/// them: the letters stay in the row with the unresolved label until they are
/// erased. Clicking the adapter's new-game button moves to the next answer.
///
/// When the adapter names a start button, every load shows a splash screen
/// that hides the board until it is clicked, followed by the adapter's
/// popups. Keys are ignored while either is showing.
#[derive(Debug, Clone)]
pub struct SimulatedPage {
    adapter: GameAdapterConfig,
    dictionary: HashSet<String>,
    answers: Vec<String>,
    game: usize,
    loaded: bool,
    splash: bool,
    popups: Vec<String>,
    rows: Vec<ScoredRow>,
    typed: String,
}

impl SimulatedPage {
    /// Creates a page that accepts `dictionary` words and cycles through
    /// `answers`. Answers are always accepted as guesses.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] if `answers` is empty or contains a word that is
    /// not [`WORD_LENGTH`] ASCII letters.
    #[instrument(skip(adapter, dictionary, answers), fields(adapter = %adapter.name()))]
    pub fn new(
        adapter: GameAdapterConfig,
        dictionary: impl IntoIterator<Item = String>,
        answers: Vec<String>,
    ) -> Result<Self, BoardError> {
        if answers.is_empty() {
            return Err(BoardError::new("simulated page needs at least one answer"));
        }

        let answers: Vec<String> = answers.iter().map(|a| a.trim().to_lowercase()).collect();
        if let Some(bad) = answers.iter().find(|a| Feedback::score(a, a).is_none()) {
            return Err(BoardError::new(format!("invalid answer word `{bad}`")));
        }

        let mut dictionary: HashSet<String> = dictionary
            .into_iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        dictionary.extend(answers.iter().cloned());

        info!(
            dictionary = dictionary.len(),
            answers = answers.len(),
            "Simulated page ready"
        );

        Ok(Self {
            adapter,
            dictionary,
            answers,
            game: 0,
            loaded: false,
            splash: false,
            popups: Vec::new(),
            rows: Vec::new(),
            typed: String::new(),
        })
    }

    /// The answer for the game in progress.
    pub fn answer(&self) -> &str {
        &self.answers[self.game % self.answers.len()]
    }

    /// Words scored so far in the current game.
    pub fn scored_words(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.word.as_str()).collect()
    }

    /// Letters typed into the current row but not yet scored.
    pub fn typed(&self) -> &str {
        &self.typed
    }

    /// True while a splash screen or popup covers the board.
    pub fn is_blocked(&self) -> bool {
        self.splash || !self.popups.is_empty()
    }

    fn is_over(&self) -> bool {
        self.rows.len() >= MAX_ATTEMPTS || self.rows.last().is_some_and(|r| r.feedback.is_solved())
    }

    fn require_loaded(&self) -> Result<(), BoardError> {
        if self.loaded {
            Ok(())
        } else {
            Err(BoardError::new("page not loaded"))
        }
    }

    fn reset_game(&mut self) {
        self.rows.clear();
        self.typed.clear();
    }

    fn submit(&mut self) {
        if self.typed.len() != WORD_LENGTH || !self.dictionary.contains(&self.typed) {
            debug!(word = %self.typed, "Word refused");
            return;
        }

        match Feedback::score(&self.typed, self.answer()) {
            Some(feedback) => {
                debug!(word = %self.typed, %feedback, "Word scored");
                let word = std::mem::take(&mut self.typed);
                self.rows.push(ScoredRow { word, feedback });
            }
            None => debug!(word = %self.typed, "Word could not be scored"),
        }
    }

    fn row_labels(&self, index: usize) -> Vec<Option<String>> {
        if let Some(row) = self.rows.get(index) {
            return row
                .feedback
                .tiles()
                .iter()
                .map(|tile| Some(self.adapter.label_for(*tile).to_string()))
                .collect();
        }

        let typed = if index == self.rows.len() {
            self.typed.len()
        } else {
            0
        };
        (0..WORD_LENGTH)
            .map(|i| {
                if i < typed {
                    Some(self.adapter.unresolved_label().clone())
                } else {
                    Some(String::new())
                }
            })
            .collect()
    }
}

#[async_trait]
impl PageDriver for SimulatedPage {
    #[instrument(skip(self))]
    async fn goto(&mut self, url: &str) -> Result<(), BoardError> {
        if url.trim().is_empty() {
            return Err(BoardError::new("empty url"));
        }
        if url != self.adapter.url() {
            warn!(expected = %self.adapter.url(), "Simulated page loaded from unexpected url");
        }
        self.loaded = true;
        self.splash = self.adapter.start_selector().is_some();
        self.popups.clear();
        self.reset_game();
        Ok(())
    }

    #[instrument(skip(self))]
    async fn exists(&mut self, selector: &str) -> Result<bool, BoardError> {
        Ok(self.loaded && !self.splash && selector == self.adapter.board_selector())
    }

    #[instrument(skip(self))]
    async fn press(&mut self, key: Key) -> Result<(), BoardError> {
        self.require_loaded()?;
        if self.is_blocked() {
            debug!(?key, "Board covered, key ignored");
            return Ok(());
        }
        if self.is_over() {
            debug!(?key, "Game over, key ignored");
            return Ok(());
        }

        match key {
            Key::Char(c) if c.is_ascii_alphabetic() => {
                if self.typed.len() < WORD_LENGTH {
                    self.typed.push(c.to_ascii_lowercase());
                }
            }
            Key::Char(c) => debug!(%c, "Non-letter key ignored"),
            Key::Enter => self.submit(),
            Key::Backspace => {
                self.typed.pop();
            }
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn tile_attributes(
        &mut self,
        row_selector: &str,
        tile_selector: &str,
        attribute: &str,
    ) -> Result<Vec<Option<String>>, BoardError> {
        self.require_loaded()?;

        let index = (1..=MAX_ATTEMPTS)
            .find(|n| self.adapter.row_selector(*n) == row_selector)
            .map(|n| n - 1)
            .ok_or_else(|| BoardError::new(format!("no element matches `{row_selector}`")))?;

        if tile_selector != self.adapter.tile_selector() {
            return Ok(Vec::new());
        }
        if attribute != self.adapter.state_attribute() {
            return Ok(vec![None; WORD_LENGTH]);
        }

        Ok(self.row_labels(index))
    }

    #[instrument(skip(self))]
    async fn click(&mut self, selector: &str) -> Result<bool, BoardError> {
        self.require_loaded()?;
        if self.splash {
            if self.adapter.start_selector().as_deref() != Some(selector) {
                return Ok(false);
            }
            self.splash = false;
            self.popups = self.adapter.dismiss_selectors().clone();
            debug!("Splash screen closed");
            return Ok(true);
        }

        match self.popups.iter().position(|p| p == selector) {
            Some(index) => {
                self.popups.remove(index);
                debug!(remaining = self.popups.len(), "Popup closed");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    #[instrument(skip(self))]
    async fn click_button(&mut self, label: &str) -> Result<bool, BoardError> {
        self.require_loaded()?;
        if self.adapter.new_game_button().as_deref() != Some(label) {
            return Ok(false);
        }
        self.game += 1;
        self.reset_game();
        info!(game = self.game, "Simulated page started a new game");
        Ok(true)
    }
}
