//! Process launching for the rendered command line.
//!
//! The compiler never spawns anything itself; it hands the argument vector to a
//! [`Launcher`]. [`ProcessLauncher`] is the real implementation: it runs the
//! program with `tokio::process`, forwards every line the child prints to
//! `tracing`, and reports how the child exited. OS errors are passed through
//! untouched.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to spawn {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to wait for {}: {source}", program.display())]
    Wait {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// How a launched process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl ExitOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for ExitOutcome {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(&self, program: &Path, args: &[String]) -> Result<ExitOutcome, LaunchError>;
}

/// Runs the program as a child process and waits for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

#[async_trait]
impl Launcher for ProcessLauncher {
    async fn launch(&self, program: &Path, args: &[String]) -> Result<ExitOutcome, LaunchError> {
        debug!("{} {}", program.display(), args.join(" "));

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: program.to_path_buf(),
                source,
            })?;

        let stdout = child.stdout.take().map(|out| tokio::spawn(forward_lines(out, false)));
        let stderr = child.stderr.take().map(|err| tokio::spawn(forward_lines(err, true)));

        let status: ExitStatus = child.wait().await.map_err(|source| LaunchError::Wait {
            program: program.to_path_buf(),
            source,
        })?;

        for handle in [stdout, stderr].into_iter().flatten() {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!("Lost output of {}: {err}", program.display()),
                Err(err) => warn!("Output forwarder for {} failed: {err}", program.display()),
            }
        }

        let outcome = ExitOutcome::from(status);
        match outcome.code {
            Some(0) => info!("{} exited cleanly", program.display()),
            Some(code) => warn!("{} exited with status {code}", program.display()),
            None => warn!("{} was terminated by a signal", program.display()),
        }
        Ok(outcome)
    }
}

/// Forwards the child's output until EOF.
///
/// Lines are decoded lossily and the pipe is drained to the end, so guest
/// bytes that are not UTF-8 never close the reader early.
async fn forward_lines<R>(reader: R, is_stderr: bool) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf: Vec<u8> = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }

        let decoded = String::from_utf8_lossy(&buf);
        let line: &str = decoded.trim_end_matches(['\r', '\n']);
        if is_stderr {
            warn!(target: "qcmd::child", "{line}");
        } else {
            debug!(target: "qcmd::child", "{line}");
        }
    }
}


// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
