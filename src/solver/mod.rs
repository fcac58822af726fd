//! Solver Channel: the external word-solving process and its line protocol.

mod channel;
mod error;
mod link;
mod message;

pub use channel::{SolverChannel, SolverCommand};
pub use error::{ChannelError, SpawnError};
pub use link::SolverLink;
pub use message::{SolverMessage, SolverRequest};

use async_trait::async_trait;
use tracing::instrument;

/// Decision-making side of a session.
///
/// Requests are strictly sequential: callers never issue a second request
/// before the previous one has returned.
#[async_trait]
pub trait Solver: Send {
    /// Launches the solver.
    async fn start(&mut self) -> Result<(), SpawnError>;

    /// Reads the unsolicited opening suggestion.
    async fn read_first_word(&mut self) -> Result<String, ChannelError>;

    /// Sends `request` and returns the answer, never [`SolverMessage::Updated`].
    async fn request_next(&mut self, request: SolverRequest)
    -> Result<SolverMessage, ChannelError>;

    /// Stops the solver and starts a fresh one so candidate state does not
    /// carry over between puzzles.
    #[instrument(skip(self))]
    async fn reset(&mut self) -> Result<(), SpawnError> {
        self.stop().await;
        self.start().await
    }

    /// Terminates and reaps the solver. Idempotent.
    async fn stop(&mut self);
}
