//! Built-in adapters for the sites the relay knows how to play.

use crate::GameAdapterConfig;

/// Registry id of the New York Times board.
pub const NYT: &str = "nyt";

/// Registry id of wordly.org.
pub const WORDLY: &str = "wordly";

/// The New York Times daily puzzle.
///
/// Tiles expose their state through a `data-state` attribute. The board sits
/// behind a "Play" splash button and a help popup. There is one puzzle per
/// day, so the site has no new-game button.
pub fn nyt() -> GameAdapterConfig {
    GameAdapterConfig::new("NYT Wordle", "https://www.nytimes.com/games/wordle/index.html")
        .with_board_selector("[data-testid='game-board']")
        .with_row_selector_template("[role='group']:nth-child({row})")
        .with_tile_selector("[data-testid='tile']")
        .with_state_attribute("data-state")
        .with_correct_label("correct")
        .with_present_label("present")
        .with_absent_label("absent")
        .with_unresolved_label("tbd")
        .with_start_selector("button[data-testid='Play']")
        .with_dismiss_selectors(vec!["[data-testid='icon-close']".to_string()])
}

/// wordly.org, which encodes tile state in compound class lists and offers
/// unlimited games.
pub fn wordly() -> GameAdapterConfig {
    GameAdapterConfig::new("Wordly", "https://wordly.org/")
        .with_board_selector("div.game_rows")
        .with_row_selector_template("div.Row:nth-child({row})")
        .with_tile_selector("div.Row-letter")
        .with_state_attribute("class")
        .with_correct_label("Row-letter letter-correct")
        .with_present_label("Row-letter letter-elsewhere")
        .with_absent_label("Row-letter letter-absent")
        .with_unresolved_label("Row-letter selected")
        .with_new_game_button("New game")
}
