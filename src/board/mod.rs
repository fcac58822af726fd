//! Board Interface: everything the relay does to the game page.

mod adapter_board;
mod error;
mod page;
mod simulated;

pub use adapter_board::{AdapterBoard, SettlePolicy};
pub use error::BoardError;
pub use page::{Key, PageDriver};
pub use simulated::SimulatedPage;

use async_trait::async_trait;
use wordle_board::RowResult;

/// Actions the session needs from a game page.
///
/// Implementations make every selector and label decision from the active
/// adapter; callers only deal in words, row indices and [`RowResult`]s.
#[async_trait]
pub trait Board: Send {
    /// Opens the game at `url` and waits for the board to render.
    async fn navigate(&mut self, url: &str) -> Result<(), BoardError>;

    /// Types `word` and submits it.
    async fn submit_word(&mut self, word: &str) -> Result<(), BoardError>;

    /// Deletes `length` typed letters from the current row.
    async fn erase_current_word(&mut self, length: usize) -> Result<(), BoardError>;

    /// Reads the row at 0-based `index`.
    async fn read_row(&mut self, index: usize) -> RowResult;

    /// Starts a fresh game. Returns `false` if the site has no such
    /// affordance or it could not be used.
    async fn click_new_game(&mut self) -> bool;
}
