#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    ffi::{OsStr, OsString},
    process::{ExitStatus, Stdio},
    time::Duration,
};

use anyhow::{Context, Result};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader},
    process::{Child, Command},
    time::timeout,
};

/// Kills the wrapped child if it is dropped before being awaited, e.g. when
/// a timeout fires.
struct ChildDropGuard(Option<Child>);

impl ChildDropGuard {
    /// Wraps the provided child process.
    fn new(child: Child) -> Self {
        Self(Some(child))
    }

    /// Returns a mutable reference to the underlying child process.
    fn child_mut(&mut self) -> Result<&mut Child> {
        self.0
            .as_mut()
            .context("child process already taken from guard")
    }

    /// Prevents the guard from killing the process on drop.
    fn disarm(mut self) {
        self.0 = None;
    }
}

impl Drop for ChildDropGuard {
    fn drop(&mut self) {
        if let Some(child) = self.0.as_mut() {
            let _ = child.start_kill();
        }
    }
}

/// Captured result of a finished subprocess.
#[derive(Debug)]
pub struct Collected {
    /// Exit status returned by the process.
    pub status: ExitStatus,
    /// Contents written to stdout.
    pub stdout: Vec<u8>,
    /// Contents written to stderr.
    pub stderr: Vec<u8>,
}

impl Collected {
    /// stdout followed by stderr, lossily decoded.
    pub fn combined_output(&self) -> String {
        let mut text = String::from_utf8_lossy(&self.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&self.stderr));
        text
    }
}

/// Describes how stdin should be wired for the spawned process.
#[derive(Debug)]
pub enum StdinSource {
    /// Attach nothing to stdin.
    Null,
    /// Write the provided bytes, then close stdin.
    Bytes(Vec<u8>),
}

/// Reads a pipe to the end on a separate task.
fn drain<R>(pipe: R, name: &'static str) -> tokio::task::JoinHandle<Result<Vec<u8>>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(pipe);
        let mut buf = Vec::new();
        reader
            .read_to_end(&mut buf)
            .await
            .with_context(|| format!("failed to read {name}"))?;
        Ok(buf)
    })
}

/// Spawns a command, feeds stdin, and collects stdout/stderr once the
/// process exits.
pub async fn run_collect(
    program: impl AsRef<OsStr>,
    args: &[OsString],
    stdin: StdinSource,
    deadline: Option<Duration>,
) -> Result<Collected> {
    let program = program.as_ref();
    tracing::debug!("running {} {:?}", program.to_string_lossy(), args);

    let mut cmd = Command::new(program);
    cmd.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());
    match &stdin {
        StdinSource::Null => cmd.stdin(Stdio::null()),
        StdinSource::Bytes(_) => cmd.stdin(Stdio::piped()),
    };

    let child = cmd
        .spawn()
        .with_context(|| format!("failed to spawn {}", program.to_string_lossy()))?;
    let mut guard = ChildDropGuard::new(child);

    if let StdinSource::Bytes(bytes) = stdin
        && let Some(mut handle) = guard.child_mut()?.stdin.take()
    {
        // The target may exit without reading everything; a broken pipe here
        // is not an error.
        tokio::spawn(async move {
            if !bytes.is_empty() {
                let _ = handle.write_all(&bytes).await;
            }
            let _ = handle.shutdown().await;
        });
    }

    let out_task = drain(
        guard.child_mut()?.stdout.take().context("missing stdout pipe")?,
        "stdout",
    );
    let err_task = drain(
        guard.child_mut()?.stderr.take().context("missing stderr pipe")?,
        "stderr",
    );

    let wait_future = async move {
        let mut guard = guard;
        let status = guard
            .child_mut()?
            .wait()
            .await
            .context("failed to wait on process")?;
        let stdout = out_task.await.context("stdout task join error")??;
        let stderr = err_task.await.context("stderr task join error")??;
        guard.disarm();
        Ok(Collected {
            status,
            stdout,
            stderr,
        })
    };

    match deadline {
        Some(limit) => timeout(limit, wait_future)
            .await
            .with_context(|| format!("{} timed out", program.to_string_lossy()))?,
        None => wait_future.await,
    }
}

/// Runs a command attached to the terminal and returns its exit status.
pub async fn run_inherit(program: impl AsRef<OsStr>, args: &[OsString]) -> Result<ExitStatus> {
    let program = program.as_ref();
    tracing::debug!("running {} {:?}", program.to_string_lossy(), args);

    Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .with_context(|| format!("failed to run {}", program.to_string_lossy()))
}
