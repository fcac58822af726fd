//! Line protocol over an arbitrary reader/writer pair.

use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, instrument, warn};

use super::{ChannelError, SolverMessage, SolverRequest};

/// Strict ping-pong exchange with a solver.
///
/// Every request is answered by exactly one reply, or two when the first is
/// `UPDATED`. The link never has more than one request outstanding.
#[derive(Debug)]
pub struct SolverLink<R, W> {
    reader: R,
    writer: W,
    reply_timeout: Option<Duration>,
}

impl<R, W> SolverLink<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Creates a link reading replies from `reader` and writing requests to
    /// `writer`.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            reply_timeout: None,
        }
    }

    /// Fails reads that take longer than `timeout`.
    pub fn with_reply_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.reply_timeout = timeout;
        self
    }

    /// Splits the link back into its reader and writer.
    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }

    /// Writes one request line and flushes it.
    #[instrument(skip(self), fields(line = %request))]
    pub async fn send(&mut self, request: &SolverRequest) -> Result<(), ChannelError> {
        let line = format!("{request}\n");
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;
        debug!("Request sent");
        Ok(())
    }

    /// Reads the next non-blank line.
    #[instrument(skip(self), fields(timeout = ?self.reply_timeout))]
    async fn read_line(&mut self) -> Result<String, ChannelError> {
        loop {
            let mut line = String::new();
            let read = match self.reply_timeout {
                Some(waited) => tokio::time::timeout(waited, self.reader.read_line(&mut line))
                    .await
                    .map_err(|_| ChannelError::Timeout { waited })??,
                None => self.reader.read_line(&mut line).await?,
            };

            if read == 0 {
                return Err(ChannelError::Closed);
            }
            if line.trim().is_empty() {
                debug!("Skipping blank line");
                continue;
            }
            return Ok(line);
        }
    }

    /// Reads and parses one reply.
    #[instrument(skip(self))]
    pub async fn read_message(&mut self) -> Result<SolverMessage, ChannelError> {
        let line = self.read_line().await?;
        let message = SolverMessage::parse(&line).inspect_err(|e| {
            warn!(error = %e, "Unparseable reply");
        })?;
        debug!(%message, "Reply received");
        Ok(message)
    }

    /// Reads the solver's unsolicited opening suggestion.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Desync`] if the first line is not a `WORD`.
    #[instrument(skip(self))]
    pub async fn read_first_word(&mut self) -> Result<String, ChannelError> {
        match self.read_message().await? {
            SolverMessage::Word(word) => Ok(word),
            other => Err(ChannelError::Desync {
                expected: "WORD",
                line: other.to_string(),
            }),
        }
    }

    /// Sends `request` and returns the answer.
    ///
    /// An `UPDATED` reply is consumed here and the follow-up line returned
    /// instead, so callers never see [`SolverMessage::Updated`].
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Desync`] if the line after `UPDATED` is not a
    /// `WORD` or `SOLVED`, and [`ChannelError::Protocol`] if the first reply
    /// cannot be parsed.
    #[instrument(skip(self), fields(request = %request))]
    pub async fn request_next(
        &mut self,
        request: &SolverRequest,
    ) -> Result<SolverMessage, ChannelError> {
        const FOLLOW_UP: &str = "WORD or SOLVED after UPDATED";

        self.send(request).await?;

        let remaining = match self.read_message().await? {
            SolverMessage::Updated(remaining) => remaining,
            other => return Ok(other),
        };
        debug!(remaining, "Solver narrowed its candidates");

        match self.read_message().await {
            Ok(message @ (SolverMessage::Word(_) | SolverMessage::Solved { .. })) => Ok(message),
            Ok(other) => Err(ChannelError::Desync {
                expected: FOLLOW_UP,
                line: other.to_string(),
            }),
            Err(ChannelError::Protocol { line }) => Err(ChannelError::Desync {
                expected: FOLLOW_UP,
                line,
            }),
            Err(ChannelError::Closed) => Err(ChannelError::Desync {
                expected: FOLLOW_UP,
                line: String::new(),
            }),
            Err(e) => Err(e),
        }
    }
}
