//! Tests for settle polling and page preparation in the adapter board.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use wordle_relay::{
    AdapterBoard, Board, BoardError, Feedback, Key, PageDriver, RowResult, SettlePolicy,
    SimulatedPage, presets,
};

fn labels(list: &[&str]) -> Vec<Option<String>> {
    list.iter().map(|l| Some(l.to_string())).collect()
}

/// Replays tile reads in order, repeating the last one once the script runs out.
#[derive(Debug, Default)]
struct ScriptedPage {
    rows: VecDeque<Result<Vec<Option<String>>, BoardError>>,
    last_row: Vec<Option<String>>,
    /// The board appears on this `exists` call (1-based); `None` means never.
    board_on_check: Option<usize>,
    /// Selectors that match a clickable element.
    clickable: Vec<String>,
    fail_clicks: bool,
    row_reads: usize,
    board_checks: usize,
    clicked: Vec<String>,
    pressed: Vec<Key>,
}

impl ScriptedPage {
    fn with_rows(rows: impl IntoIterator<Item = Vec<Option<String>>>) -> Self {
        Self {
            rows: rows.into_iter().map(Ok).collect(),
            board_on_check: Some(1),
            ..Self::default()
        }
    }
}

#[async_trait]
impl PageDriver for ScriptedPage {
    async fn goto(&mut self, _url: &str) -> Result<(), BoardError> {
        Ok(())
    }

    async fn exists(&mut self, _selector: &str) -> Result<bool, BoardError> {
        self.board_checks += 1;
        Ok(self.board_on_check.is_some_and(|n| self.board_checks >= n))
    }

    async fn press(&mut self, key: Key) -> Result<(), BoardError> {
        self.pressed.push(key);
        Ok(())
    }

    async fn tile_attributes(
        &mut self,
        _row_selector: &str,
        _tile_selector: &str,
        _attribute: &str,
    ) -> Result<Vec<Option<String>>, BoardError> {
        self.row_reads += 1;
        match self.rows.pop_front() {
            Some(Ok(row)) => {
                self.last_row = row.clone();
                Ok(row)
            }
            Some(Err(e)) => Err(e),
            None => Ok(self.last_row.clone()),
        }
    }

    async fn click(&mut self, selector: &str) -> Result<bool, BoardError> {
        if self.fail_clicks {
            return Err(BoardError::new("click failed"));
        }
        self.clicked.push(selector.to_string());
        Ok(self.clickable.iter().any(|c| c == selector))
    }

    async fn click_button(&mut self, _label: &str) -> Result<bool, BoardError> {
        Ok(false)
    }
}

fn policy(attempts: u32) -> SettlePolicy {
    SettlePolicy::new(attempts, Duration::from_millis(1))
}

#[tokio::test]
async fn test_read_row_waits_for_flip_to_finish() {
    let page = ScriptedPage::with_rows([
        labels(&["tbd", "tbd", "tbd", "tbd", "tbd"]),
        labels(&["absent", "absent", "tbd", "tbd", "tbd"]),
        labels(&["absent", "absent", "absent", "absent", "absent"]),
    ]);
    let mut board = AdapterBoard::new(page, presets::nyt(), policy(10));

    let result = board.read_row(0).await;
    let expected: Feedback = "bbbbb".parse().expect("Valid feedback");
    assert_eq!(result, RowResult::Feedback(expected));
    assert_eq!(board.page().row_reads, 3);
}

#[tokio::test]
async fn test_unsettled_row_stops_after_attempts() {
    let page = ScriptedPage::with_rows([labels(&["tbd", "tbd", "tbd", "tbd", "tbd"])]);
    let mut board = AdapterBoard::new(page, presets::nyt(), policy(4));

    assert_eq!(board.read_row(2).await, RowResult::Rejected);
    assert_eq!(board.page().row_reads, 4);
}

#[tokio::test]
async fn test_half_flipped_row_stays_indeterminate() {
    let page = ScriptedPage::with_rows([labels(&["correct", "present", "", "", ""])]);
    let mut board = AdapterBoard::new(page, presets::nyt(), policy(3));

    assert_eq!(board.read_row(0).await, RowResult::Indeterminate);
    assert_eq!(board.page().row_reads, 3);
}

#[tokio::test]
async fn test_read_errors_are_retried_then_indeterminate() {
    let mut page = ScriptedPage::with_rows([]);
    page.rows.push_back(Err(BoardError::new("stale element")));
    page.rows
        .push_back(Ok(labels(&["correct", "correct", "correct", "correct", "correct"])));
    let mut board = AdapterBoard::new(page, presets::nyt(), policy(3));
    assert_eq!(board.read_row(0).await, RowResult::Feedback(Feedback::SOLVED));
    assert_eq!(board.page().row_reads, 2);

    let mut page = ScriptedPage::with_rows([]);
    page.rows.extend((0..2).map(|_| Err(BoardError::new("stale element"))));
    let mut board = AdapterBoard::new(page, presets::nyt(), policy(2));
    assert_eq!(board.read_row(0).await, RowResult::Indeterminate);
    assert_eq!(board.page().row_reads, 2);
}

#[tokio::test]
async fn test_navigate_fails_when_board_never_renders() {
    let mut page = ScriptedPage::with_rows([]);
    page.board_on_check = None;
    let mut board = AdapterBoard::new(page, presets::wordly(), policy(5));

    let err = board.navigate("https://wordly.org/").await.unwrap_err();
    assert!(err.message.contains("div.game_rows"), "{err}");
    assert_eq!(board.page().board_checks, 5);
}

#[tokio::test]
async fn test_navigate_waits_for_late_board() {
    let mut page = ScriptedPage::with_rows([]);
    page.board_on_check = Some(3);
    let mut board = AdapterBoard::new(page, presets::wordly(), policy(5));

    board.navigate("https://wordly.org/").await.expect("Board appears");
    assert_eq!(board.page().board_checks, 3);
}

#[tokio::test]
async fn test_navigate_clicks_start_then_popups() {
    let mut page = ScriptedPage::with_rows([]);
    page.clickable = vec![
        "button[data-testid='Play']".to_string(),
        "[data-testid='icon-close']".to_string(),
    ];
    let mut board = AdapterBoard::new(page, presets::nyt(), policy(1));

    board
        .navigate("https://www.nytimes.com/games/wordle/index.html")
        .await
        .expect("Navigate");
    assert_eq!(
        board.page().clicked,
        ["button[data-testid='Play']", "[data-testid='icon-close']"]
    );
}

#[tokio::test]
async fn test_missing_or_failing_start_button_is_tolerated() {
    // No start button or popup showing: the game is already open.
    let page = ScriptedPage::with_rows([]);
    let mut board = AdapterBoard::new(page, presets::nyt(), policy(1));
    board.navigate("https://example.test").await.expect("Navigate");
    assert_eq!(board.page().clicked.len(), 2);

    let mut page = ScriptedPage::with_rows([]);
    page.fail_clicks = true;
    let mut board = AdapterBoard::new(page, presets::nyt(), policy(1));
    board.navigate("https://example.test").await.expect("Navigate");
}

#[tokio::test]
async fn test_adapter_without_setup_clicks_nothing() {
    let page = ScriptedPage::with_rows([]);
    let mut board = AdapterBoard::new(page, presets::wordly(), policy(1));
    board.navigate("https://wordly.org/").await.expect("Navigate");
    assert!(board.page().clicked.is_empty());
}

#[tokio::test]
async fn test_simulated_splash_hides_board_until_started() {
    let adapter = presets::nyt();
    let url = adapter.url().clone();
    let mut page = SimulatedPage::new(adapter.clone(), Vec::new(), vec!["crate".to_string()])
        .expect("Page");

    page.goto(&url).await.expect("Goto");
    assert!(page.is_blocked());
    assert!(!page.exists(adapter.board_selector()).await.expect("Exists"));
    page.press(Key::Char('c')).await.expect("Press");
    assert_eq!(page.typed(), "");

    assert!(page.click("button[data-testid='Play']").await.expect("Click"));
    assert!(page.exists(adapter.board_selector()).await.expect("Exists"));
    assert!(page.is_blocked());
    assert!(page.click("[data-testid='icon-close']").await.expect("Click"));
    assert!(!page.is_blocked());
    assert!(!page.click("[data-testid='icon-close']").await.expect("Click"));

    // Without the setup clicks a board never shows up.
    let mut bare = AdapterBoard::new(page.clone(), adapter.clone(), policy(2));
    bare.page_mut().goto(&url).await.expect("Goto");
    assert!(!bare.page_mut().exists(adapter.board_selector()).await.expect("Exists"));

    let mut board = AdapterBoard::new(page, adapter, SettlePolicy::immediate());
    board.navigate(&url).await.expect("Navigate");
    assert!(!board.page().is_blocked());
    board.submit_word("crate").await.expect("Submit");
    assert_eq!(board.read_row(0).await, RowResult::Feedback(Feedback::SOLVED));
}
