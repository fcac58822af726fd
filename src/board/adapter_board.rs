//! Board implementation driven entirely by adapter data.

use std::time::Duration;

use async_trait::async_trait;
use derive_getters::Getters;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};
use wordle_board::{GameAdapterConfig, RowResult};

use super::{Board, BoardError, Key, PageDriver};

/// Bounds on polling the page for a settled visual state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct SettlePolicy {
    /// Maximum number of reads.
    attempts: u32,
    /// Pause between reads.
    interval: Duration,
}

impl SettlePolicy {
    /// Creates a policy; `attempts` is clamped to at least one read.
    pub fn new(attempts: u32, interval: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            interval,
        }
    }

    /// Single read, no waiting.
    pub fn immediate() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self::new(10, Duration::from_millis(500))
    }
}

/// A [`Board`] that locates rows and tiles through a [`GameAdapterConfig`].
#[derive(Debug)]
pub struct AdapterBoard<P> {
    page: P,
    adapter: GameAdapterConfig,
    settle: SettlePolicy,
    key_delay: Duration,
}

impl<P: PageDriver> AdapterBoard<P> {
    /// Wraps `page` using `adapter` for all selector and label decisions.
    #[instrument(skip(page, adapter), fields(adapter = %adapter.name()))]
    pub fn new(page: P, adapter: GameAdapterConfig, settle: SettlePolicy) -> Self {
        debug!(?settle, "Creating adapter board");
        Self {
            page,
            adapter,
            settle,
            key_delay: Duration::ZERO,
        }
    }

    /// Pause inserted between typed letters.
    pub fn with_key_delay(mut self, key_delay: Duration) -> Self {
        self.key_delay = key_delay;
        self
    }

    /// The active adapter.
    pub fn adapter(&self) -> &GameAdapterConfig {
        &self.adapter
    }

    /// The underlying page.
    pub fn page(&self) -> &P {
        &self.page
    }

    /// Mutable access to the underlying page.
    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    /// Clicks past the adapter's splash button and popups.
    ///
    /// A missing element means the page is already past that step, so
    /// nothing here fails; board polling decides whether the page is usable.
    #[instrument(skip(self), fields(adapter = %self.adapter.name()))]
    async fn prepare_page(&mut self) {
        if let Some(selector) = self.adapter.start_selector().clone() {
            match self.page.click(&selector).await {
                Ok(true) => {
                    info!(%selector, "Clicked start button");
                    pause(*self.settle.interval()).await;
                }
                Ok(false) => debug!(%selector, "No start button, game may already be open"),
                Err(e) => warn!(%selector, error = %e, "Failed to click start button"),
            }
        }

        for selector in self.adapter.dismiss_selectors().clone() {
            match self.page.click(&selector).await {
                Ok(true) => info!(%selector, "Closed popup"),
                Ok(false) => debug!(%selector, "No popup to close"),
                Err(e) => warn!(%selector, error = %e, "Failed to close popup"),
            }
        }
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        sleep(delay).await;
    }
}

#[async_trait]
impl<P: PageDriver> Board for AdapterBoard<P> {
    #[instrument(skip(self), fields(adapter = %self.adapter.name()))]
    async fn navigate(&mut self, url: &str) -> Result<(), BoardError> {
        info!("Opening game page");
        self.page.goto(url).await?;
        self.prepare_page().await;

        let attempts = *self.settle.attempts();
        for attempt in 1..=attempts {
            if self.page.exists(self.adapter.board_selector()).await? {
                info!(attempt, "Game board found");
                return Ok(());
            }
            debug!(attempt, "Board not rendered yet");
            if attempt < attempts {
                pause(*self.settle.interval()).await;
            }
        }

        Err(BoardError::new(format!(
            "board `{}` not found after {} attempts",
            self.adapter.board_selector(),
            attempts
        )))
    }

    #[instrument(skip(self))]
    async fn submit_word(&mut self, word: &str) -> Result<(), BoardError> {
        for letter in word.chars() {
            self.page.press(Key::Char(letter.to_ascii_lowercase())).await?;
            pause(self.key_delay).await;
        }
        self.page.press(Key::Enter).await?;
        debug!("Word submitted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn erase_current_word(&mut self, length: usize) -> Result<(), BoardError> {
        for _ in 0..length {
            self.page.press(Key::Backspace).await?;
        }
        debug!("Typed word erased");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn read_row(&mut self, index: usize) -> RowResult {
        let row_selector = self.adapter.row_selector(index + 1);
        let attempts = *self.settle.attempts();
        let mut result = RowResult::Indeterminate;

        for attempt in 1..=attempts {
            match self
                .page
                .tile_attributes(
                    &row_selector,
                    self.adapter.tile_selector(),
                    self.adapter.state_attribute(),
                )
                .await
            {
                Ok(states) => {
                    result = self.adapter.classify(&states);
                    if result.is_accepted() {
                        debug!(attempt, %result, "Row settled");
                        return result;
                    }
                    debug!(
                        attempt,
                        settled = self.adapter.settled_tiles(&states),
                        %result,
                        "Row not settled yet"
                    );
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Failed to read row tiles");
                    result = RowResult::Indeterminate;
                }
            }

            if attempt < attempts {
                pause(*self.settle.interval()).await;
            }
        }

        info!(%result, "Row did not settle into feedback");
        result
    }

    #[instrument(skip(self))]
    async fn click_new_game(&mut self) -> bool {
        let Some(label) = self.adapter.new_game_button().clone() else {
            info!(adapter = %self.adapter.name(), "Site has no new game button");
            return false;
        };

        match self.page.click_button(&label).await {
            Ok(true) => {
                info!("Clicked new game button");
                pause(*self.settle.interval()).await;
                true
            }
            Ok(false) => {
                warn!(%label, "New game button not visible");
                false
            }
            Err(e) => {
                warn!(error = %e, "Failed to click new game button");
                false
            }
        }
    }
}
