//! Solver process lifecycle.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tokio::io::BufReader;
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info, instrument, warn};

use super::{ChannelError, Solver, SolverLink, SolverMessage, SolverRequest, SpawnError};

fn default_auto_flag() -> Option<String> {
    Some("--auto".to_string())
}

fn default_shutdown_timeout_ms() -> u64 {
    2_000
}

fn default_reply_timeout_ms() -> Option<u64> {
    Some(30_000)
}

/// How to launch the external solver.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_", into)]
pub struct SolverCommand {
    /// Executable to run.
    program: String,

    /// Extra arguments passed before the automated-mode flag.
    #[serde(default)]
    args: Vec<String>,

    /// Flag that switches the solver into line-protocol mode.
    #[serde(default = "default_auto_flag")]
    auto_flag: Option<String>,

    /// Working directory for the solver.
    #[serde(default)]
    #[setters(strip_option)]
    working_dir: Option<PathBuf>,

    /// How long to wait for the solver to exit after closing its input.
    ///
    /// End of input is the graceful stop signal; a solver still running
    /// once this elapses is killed.
    #[serde(default = "default_shutdown_timeout_ms")]
    shutdown_timeout_ms: u64,

    /// How long to wait for any single reply. `None` waits forever.
    #[serde(default = "default_reply_timeout_ms")]
    reply_timeout_ms: Option<u64>,
}

impl SolverCommand {
    /// Runs `program` with default flags and timeouts.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            auto_flag: default_auto_flag(),
            working_dir: None,
            shutdown_timeout_ms: default_shutdown_timeout_ms(),
            reply_timeout_ms: default_reply_timeout_ms(),
        }
    }

    /// Full argument list, automated-mode flag last.
    pub fn full_args(&self) -> Vec<String> {
        let mut args = self.args.clone();
        if let Some(flag) = &self.auto_flag {
            args.push(flag.clone());
        }
        args
    }

    /// Shutdown timeout as a [`Duration`].
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// Reply timeout as a [`Duration`].
    pub fn reply_timeout(&self) -> Option<Duration> {
        self.reply_timeout_ms.map(Duration::from_millis)
    }
}

type ProcessLink = SolverLink<BufReader<ChildStdout>, ChildStdin>;

#[derive(Debug)]
struct RunningSolver {
    child: Child,
    link: ProcessLink,
}

/// Owns the external solver process and speaks the line protocol to it.
///
/// The child is spawned with `kill_on_drop`, and dropping the channel also
/// requests a kill, so no exit path leaves an orphaned solver behind. Prefer
/// [`Solver::stop`] for a graceful shutdown that reaps the process.
#[derive(Debug)]
pub struct SolverChannel {
    command: SolverCommand,
    running: Option<RunningSolver>,
}

impl SolverChannel {
    /// Creates a channel that will launch `command` on [`Solver::start`].
    pub fn new(command: SolverCommand) -> Self {
        Self {
            command,
            running: None,
        }
    }

    /// The launch configuration.
    pub fn command(&self) -> &SolverCommand {
        &self.command
    }

    /// True while a solver process is attached.
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// OS process id of the running solver.
    pub fn pid(&self) -> Option<u32> {
        self.running.as_ref().and_then(|r| r.child.id())
    }

    fn link(&mut self) -> Result<&mut ProcessLink, ChannelError> {
        self.running
            .as_mut()
            .map(|r| &mut r.link)
            .ok_or(ChannelError::NotRunning)
    }

    #[instrument(skip(self), fields(program = %self.command.program))]
    fn spawn(&self) -> Result<RunningSolver, SpawnError> {
        let program = &self.command.program;
        let args = self.command.full_args();

        info!(args = ?args, "Starting solver process");

        let mut command = Command::new(program);
        command.args(&args);

        if let Some(cwd) = &self.command.working_dir {
            command.current_dir(cwd);
        }

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpawnError::new(program.clone(), e.to_string()))?;

        let stdin = child.stdin.take().ok_or_else(|| {
            tracing::error!("Failed to capture solver stdin");
            SpawnError::new(program.clone(), "failed to capture stdin")
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            tracing::error!("Failed to capture solver stdout");
            SpawnError::new(program.clone(), "failed to capture stdout")
        })?;

        let link = SolverLink::new(BufReader::new(stdout), stdin)
            .with_reply_timeout(self.command.reply_timeout());

        info!(pid = ?child.id(), "Solver process started");
        Ok(RunningSolver { child, link })
    }

    #[instrument(skip(running), fields(pid = ?running.child.id()))]
    async fn shutdown(running: RunningSolver, grace: Duration) {
        let RunningSolver { mut child, link } = running;

        // Closing stdin is the solver's end-of-input.
        drop(link);

        match tokio::time::timeout(grace, child.wait()).await {
            Ok(Ok(status)) => {
                debug!(%status, "Solver exited");
                return;
            }
            Ok(Err(e)) => warn!(error = %e, "Failed to wait for solver"),
            Err(_) => warn!(?grace, "Solver did not exit in time, killing"),
        }

        if let Err(e) = child.kill().await {
            warn!(error = %e, "Failed to kill solver");
        }
    }
}

#[async_trait]
impl Solver for SolverChannel {
    #[instrument(skip(self), fields(program = %self.command.program))]
    async fn start(&mut self) -> Result<(), SpawnError> {
        if let Some(running) = self.running.take() {
            warn!("Solver already running, replacing it");
            Self::shutdown(running, self.command.shutdown_timeout()).await;
        }
        self.running = Some(self.spawn()?);
        Ok(())
    }

    #[instrument(skip(self), fields(program = %self.command.program))]
    async fn read_first_word(&mut self) -> Result<String, ChannelError> {
        self.link()?.read_first_word().await
    }

    #[instrument(skip(self, request), fields(program = %self.command.program, %request))]
    async fn request_next(
        &mut self,
        request: SolverRequest,
    ) -> Result<SolverMessage, ChannelError> {
        self.link()?.request_next(&request).await
    }

    #[instrument(skip(self), fields(program = %self.command.program))]
    async fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            info!("Stopping solver process");
            Self::shutdown(running, self.command.shutdown_timeout()).await;
        }
    }
}

impl Drop for SolverChannel {
    fn drop(&mut self) {
        if let Some(mut running) = self.running.take() {
            debug!("Killing abandoned solver process");
            let _ = running.child.start_kill();
        }
    }
}
