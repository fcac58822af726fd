//! Tests for the adapter-driven board on the simulated page.

use async_trait::async_trait;
use wordle_relay::{
    AdapterBoard, Board, ChannelError, Feedback, Key, MatchEnd, MatchRunner, MatchStatistics,
    PageDriver, RowResult, SettlePolicy, SimulatedPage, Solver, SolverMessage, SolverRequest,
    SpawnError, presets,
};

const DICTIONARY: &[&str] = &[
    "crane", "slate", "pilot", "humor", "dunks", "trace", "crate", "grate", "irate", "caret",
];

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

fn board_for(
    adapter: wordle_relay::GameAdapterConfig,
    answers: &[&str],
) -> AdapterBoard<SimulatedPage> {
    let page = SimulatedPage::new(adapter.clone(), words(DICTIONARY), words(answers))
        .expect("Failed to build simulated page");
    AdapterBoard::new(page, adapter, SettlePolicy::immediate())
}

#[tokio::test]
async fn test_scored_row_matches_reference_scoring() {
    for adapter in [presets::nyt(), presets::wordly()] {
        let url = adapter.url().clone();
        let mut board = board_for(adapter, &["crate"]);
        board.navigate(&url).await.expect("Navigate failed");

        board.submit_word("TRACE").await.expect("Submit failed");
        let expected = Feedback::score("trace", "crate").expect("Valid words");
        assert_eq!(board.read_row(0).await, RowResult::Feedback(expected));
        assert_eq!(expected.to_string(), "yggyg");
    }
}

#[tokio::test]
async fn test_unknown_word_is_rejected_and_erasable() {
    for adapter in [presets::nyt(), presets::wordly()] {
        let url = adapter.url().clone();
        let mut board = board_for(adapter, &["crate"]);
        board.navigate(&url).await.expect("Navigate failed");

        board.submit_word("qzxvw").await.expect("Submit failed");
        assert_eq!(board.read_row(0).await, RowResult::Rejected);

        board.erase_current_word(5).await.expect("Erase failed");
        assert_eq!(board.page().typed(), "");

        board.submit_word("crate").await.expect("Submit failed");
        assert_eq!(
            board.read_row(0).await,
            RowResult::Feedback(Feedback::SOLVED)
        );
    }
}

#[tokio::test]
async fn test_unplayed_row_is_indeterminate() {
    let adapter = presets::nyt();
    let url = adapter.url().clone();
    let mut board = board_for(adapter, &["crate"]);
    board.navigate(&url).await.expect("Navigate failed");

    assert_eq!(board.read_row(3).await, RowResult::Indeterminate);
}

#[tokio::test]
async fn test_new_game_affordance_follows_adapter() {
    let nyt = presets::nyt();
    let url = nyt.url().clone();
    let mut board = board_for(nyt, &["crate", "slate"]);
    board.navigate(&url).await.expect("Navigate failed");
    assert!(!board.click_new_game().await);

    let wordly = presets::wordly();
    let url = wordly.url().clone();
    let mut board = board_for(wordly, &["crate", "slate"]);
    board.navigate(&url).await.expect("Navigate failed");
    assert_eq!(board.page().answer(), "crate");
    assert!(board.click_new_game().await);
    assert_eq!(board.page().answer(), "slate");
    assert!(board.page().scored_words().is_empty());
}

#[tokio::test]
async fn test_page_reads_fail_before_navigation() {
    let adapter = presets::wordly();
    let row_selector = adapter.row_selector(1);
    let mut page =
        SimulatedPage::new(adapter.clone(), words(DICTIONARY), words(&["crate"])).expect("Page");

    assert!(page.press(Key::Char('c')).await.is_err());
    assert!(
        page.tile_attributes(&row_selector, adapter.tile_selector(), adapter.state_attribute())
            .await
            .is_err()
    );
    assert!(!page.exists(adapter.board_selector()).await.expect("Exists"));
}

#[test]
fn test_simulated_page_needs_answers() {
    assert!(SimulatedPage::new(presets::nyt(), words(DICTIONARY), Vec::new()).is_err());
    assert!(SimulatedPage::new(presets::nyt(), words(DICTIONARY), words(&["toolong"])).is_err());
}

/// Keeps every dictionary word consistent with the feedback so far.
struct FilteringSolver {
    candidates: Vec<String>,
    current: Option<String>,
    running: bool,
}

impl FilteringSolver {
    fn new(candidates: &[&str]) -> Self {
        Self {
            candidates: words(candidates),
            current: None,
            running: false,
        }
    }

    fn next_word(&mut self) -> SolverMessage {
        match self.candidates.first() {
            Some(word) => {
                self.current = Some(word.clone());
                SolverMessage::Word(word.clone())
            }
            None => SolverMessage::Failed,
        }
    }
}

#[async_trait]
impl Solver for FilteringSolver {
    async fn start(&mut self) -> Result<(), SpawnError> {
        self.running = true;
        Ok(())
    }

    async fn read_first_word(&mut self) -> Result<String, ChannelError> {
        match self.next_word() {
            SolverMessage::Word(word) => Ok(word),
            _ => Err(ChannelError::Closed),
        }
    }

    async fn request_next(
        &mut self,
        request: SolverRequest,
    ) -> Result<SolverMessage, ChannelError> {
        let current = self.current.take().ok_or(ChannelError::NotRunning)?;
        match request {
            SolverRequest::Solved => Ok(SolverMessage::Solved {
                word: current,
                attempts: 0,
            }),
            SolverRequest::Skip => {
                self.candidates.retain(|w| *w != current);
                Ok(self.next_word())
            }
            SolverRequest::Feedback(feedback) => {
                self.candidates
                    .retain(|w| Feedback::score(&current, w) == Some(feedback) && *w != current);
                Ok(self.next_word())
            }
        }
    }

    async fn stop(&mut self) {
        self.running = false;
    }
}

#[tokio::test]
async fn test_match_on_simulated_page_wins() {
    let adapter = presets::wordly();
    let url = adapter.url().clone();
    let board = board_for(adapter, &["caret"]);
    // The first candidate is not in the page's dictionary and gets skipped.
    let solver = FilteringSolver::new(&["zzzzz", "crane", "trace", "crate", "caret", "irate"]);

    let mut stats = MatchStatistics::new();
    let mut runner = MatchRunner::new(board, solver, url);
    let report = runner.run(1, &mut stats).await.expect("Match should run");

    assert!(matches!(report.end(), MatchEnd::Completed));
    let session = &report.sessions()[0];
    assert!(session.outcome().is_won(), "outcome was {}", session.outcome());
    assert_eq!(session.history()[0].result(), &RowResult::Rejected);
    assert_eq!(*stats.games_won(), 1);
    assert_eq!(stats.wins_in(*session.attempts()), 1);
    assert_eq!(runner.board().page().scored_words().last(), Some(&"caret"));
}
