//! Low-level page capability that an adapter-driven board is built on.

use async_trait::async_trait;

use super::BoardError;

/// A key press sent to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// Submit the current row.
    Enter,
    /// Delete the last typed letter.
    Backspace,
}

/// The handful of browser operations the relay needs.
///
/// A WebDriver or DevTools client implements this; [`SimulatedPage`] is an
/// in-process implementation for offline play and tests.
///
/// [`SimulatedPage`]: super::SimulatedPage
#[async_trait]
pub trait PageDriver: Send {
    /// Loads `url`.
    async fn goto(&mut self, url: &str) -> Result<(), BoardError>;

    /// True if at least one element matches `selector`.
    async fn exists(&mut self, selector: &str) -> Result<bool, BoardError>;

    /// Sends one key press to the focused document.
    async fn press(&mut self, key: Key) -> Result<(), BoardError>;

    /// Reads `attribute` from every element matching `tile_selector` inside
    /// the element matching `row_selector`, in document order.
    ///
    /// A tile without the attribute yields `None`.
    async fn tile_attributes(
        &mut self,
        row_selector: &str,
        tile_selector: &str,
        attribute: &str,
    ) -> Result<Vec<Option<String>>, BoardError>;

    /// Clicks the first element matching `selector`.
    ///
    /// Returns `Ok(false)` if nothing matches.
    async fn click(&mut self, selector: &str) -> Result<bool, BoardError>;

    /// Clicks the visible button whose text is `label`.
    ///
    /// Returns `Ok(false)` if no such button is displayed.
    async fn click_button(&mut self, label: &str) -> Result<bool, BoardError>;
}
