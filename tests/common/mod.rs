//! Scripted board and solver fakes shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;

use async_trait::async_trait;
use wordle_relay::{
    Board, BoardError, ChannelError, Feedback, RowResult, Solver, SolverMessage, SolverRequest,
    SpawnError,
};

/// Parses a feedback string, panicking on typos in the test itself.
pub fn fb(s: &str) -> Feedback {
    s.parse().expect("Invalid feedback in test")
}

/// Scripted row results for an accepted word.
pub fn row(s: &str) -> RowResult {
    RowResult::Feedback(fb(s))
}

/// Shorthand for a `WORD:` reply.
pub fn word(w: &str) -> Result<SolverMessage, ChannelError> {
    Ok(SolverMessage::Word(w.to_string()))
}

/// Board that returns scripted row results and records every call.
#[derive(Debug, Default)]
pub struct FakeBoard {
    pub rows: VecDeque<RowResult>,
    pub new_game_available: bool,
    pub fail_navigate: bool,
    pub fail_submit_at: Option<usize>,
    pub navigated: Vec<String>,
    pub submitted: Vec<String>,
    pub erased: Vec<usize>,
    pub reads: Vec<usize>,
    pub new_games: usize,
}

impl FakeBoard {
    pub fn new(rows: impl IntoIterator<Item = RowResult>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
            new_game_available: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl Board for FakeBoard {
    async fn navigate(&mut self, url: &str) -> Result<(), BoardError> {
        if self.fail_navigate {
            return Err(BoardError::new("board never rendered"));
        }
        self.navigated.push(url.to_string());
        Ok(())
    }

    async fn submit_word(&mut self, word: &str) -> Result<(), BoardError> {
        if self.fail_submit_at == Some(self.submitted.len()) {
            return Err(BoardError::new("keyboard not found"));
        }
        self.submitted.push(word.to_string());
        Ok(())
    }

    async fn erase_current_word(&mut self, length: usize) -> Result<(), BoardError> {
        self.erased.push(length);
        Ok(())
    }

    async fn read_row(&mut self, index: usize) -> RowResult {
        self.reads.push(index);
        self.rows.pop_front().unwrap_or(RowResult::Indeterminate)
    }

    async fn click_new_game(&mut self) -> bool {
        if self.new_game_available {
            self.new_games += 1;
        }
        self.new_game_available
    }
}

/// Solver that replays scripted replies and records every request.
#[derive(Debug, Default)]
pub struct FakeSolver {
    pub first_words: VecDeque<Result<String, ChannelError>>,
    pub replies: VecDeque<Result<SolverMessage, ChannelError>>,
    pub fail_start_at: Option<usize>,
    pub requests: Vec<SolverRequest>,
    pub starts: usize,
    pub stops: usize,
    pub running: bool,
}

impl FakeSolver {
    pub fn new(
        first_words: impl IntoIterator<Item = &'static str>,
        replies: impl IntoIterator<Item = Result<SolverMessage, ChannelError>>,
    ) -> Self {
        Self {
            first_words: first_words.into_iter().map(|w| Ok(w.to_string())).collect(),
            replies: replies.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Number of `ggggg` acknowledgements sent.
    pub fn solved_acks(&self) -> usize {
        self.requests
            .iter()
            .filter(|r| **r == SolverRequest::Solved)
            .count()
    }
}

#[async_trait]
impl Solver for FakeSolver {
    async fn start(&mut self) -> Result<(), SpawnError> {
        if self.fail_start_at == Some(self.starts) {
            return Err(SpawnError::new("fake-solver", "No such file or directory"));
        }
        self.starts += 1;
        self.running = true;
        Ok(())
    }

    async fn read_first_word(&mut self) -> Result<String, ChannelError> {
        if !self.running {
            return Err(ChannelError::NotRunning);
        }
        self.first_words.pop_front().unwrap_or(Err(ChannelError::Closed))
    }

    async fn request_next(
        &mut self,
        request: SolverRequest,
    ) -> Result<SolverMessage, ChannelError> {
        if !self.running {
            return Err(ChannelError::NotRunning);
        }
        self.requests.push(request);
        self.replies.pop_front().unwrap_or(Err(ChannelError::Closed))
    }

    async fn stop(&mut self) {
        if self.running {
            self.stops += 1;
        }
        self.running = false;
    }
}
