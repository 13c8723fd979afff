//! External process execution with a bounded timeout.
//!
//! Output from stdout and stderr is merged line by line into an
//! [`OutputSink`] while the process runs. Failures to start, non-zero exits
//! and timeouts are reported through [`ExecutionResult`], never raised.

use std::collections::VecDeque;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

use crate::constants::{
    MAX_CAPTURED_OUTPUT_LINES, OUTPUT_CHANNEL_CAPACITY, OUTPUT_DRAIN_GRACE_MS,
};

/// Receives process output as it arrives.
pub trait OutputSink: Send {
    fn accept_line(&mut self, line: &str);
}

/// Keeps the most recent lines of output, bounded to a fixed count.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    lines: VecDeque<String>,
    capacity: usize,
    dropped: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::with_capacity(MAX_CAPTURED_OUTPUT_LINES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Joined output, prefixed with a marker when older lines were discarded.
    pub fn text(&self) -> String {
        let body = self.lines.iter().cloned().collect::<Vec<_>>().join("\n");
        if self.dropped > 0 {
            format!("[{} earlier lines omitted]\n{}", self.dropped, body)
        } else {
            body
        }
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for LineBuffer {
    fn accept_line(&mut self, line: &str) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
            self.dropped += 1;
        }
        self.lines.push_back(line.to_string());
    }
}

/// How a command run ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    /// The process ran to completion with a zero exit status
    pub exited_cleanly: bool,
    /// The process was killed after exceeding its timeout
    pub timed_out: bool,
    pub exit_code: Option<i32>,
    /// Set when the process could not be started or waited on
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn success() -> Self {
        Self {
            exited_cleanly: true,
            exit_code: Some(0),
            ..Default::default()
        }
    }

    pub fn exited(code: Option<i32>) -> Self {
        Self {
            exited_cleanly: code == Some(0),
            exit_code: code,
            ..Default::default()
        }
    }

    pub fn timed_out() -> Self {
        Self {
            timed_out: true,
            ..Default::default()
        }
    }

    pub fn not_started(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn succeeded(&self) -> bool {
        self.exited_cleanly && !self.timed_out
    }

    /// Short explanation of a failed run.
    pub fn describe(&self) -> String {
        if self.timed_out {
            "timed out".to_string()
        } else if let Some(error) = &self.error {
            error.clone()
        } else {
            match self.exit_code {
                Some(0) => "exited cleanly".to_string(),
                Some(code) => format!("exited with code {}", code),
                None => "terminated by signal".to_string(),
            }
        }
    }
}

/// Runs an external command line.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        command_line: &[String],
        timeout: Duration,
        sink: &mut dyn OutputSink,
    ) -> ExecutionResult;
}

/// [`CommandRunner`] backed by real operating system processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

/// Forward output lines until EOF. Invalid UTF-8 is replaced, never fatal.
///
/// Once the receiver is gone the pipe is still drained, so a writer that
/// outlives the run does not die of SIGPIPE.
async fn forward_lines<R>(reader: R, tx: mpsc::Sender<String>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut forwarding = true;
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                if !forwarding {
                    continue;
                }
                while matches!(buf.last(), Some(b'\n' | b'\r')) {
                    buf.pop();
                }
                let line = String::from_utf8_lossy(&buf).into_owned();
                if tx.send(line).await.is_err() {
                    forwarding = false;
                }
            }
            Err(e) => {
                debug!("Stopped reading process output: {}", e);
                break;
            }
        }
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        command_line: &[String],
        timeout: Duration,
        sink: &mut dyn OutputSink,
    ) -> ExecutionResult {
        let Some((program, args)) = command_line.split_first() else {
            return ExecutionResult::not_started("empty command line");
        };

        debug!("Executing command: {:?} (timeout {:?})", command_line, timeout);

        let mut child = match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                let message = format!("Failed to start {}: {}", program, e);
                sink.accept_line(&message);
                return ExecutionResult::not_started(message);
            }
        };

        let (tx, mut rx) = mpsc::channel(OUTPUT_CHANNEL_CAPACITY);
        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_lines(stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_lines(stderr, tx.clone()));
        }
        drop(tx);

        let drive = async {
            loop {
                tokio::select! {
                    Some(line) = rx.recv() => sink.accept_line(&line),
                    status = child.wait() => break status,
                }
            }
        };
        let waited = tokio::time::timeout(timeout, drive).await;

        match waited {
            Ok(Ok(status)) => {
                // pipes may be held open by background children of the process
                let grace = Duration::from_millis(OUTPUT_DRAIN_GRACE_MS);
                let drain = async {
                    while let Some(line) = rx.recv().await {
                        sink.accept_line(&line);
                    }
                };
                if tokio::time::timeout(grace, drain).await.is_err() {
                    debug!("Output of {} still open after exit, no longer reading it", program);
                }
                ExecutionResult::exited(status.code())
            }
            Ok(Err(e)) => ExecutionResult::not_started(format!("Failed to wait for {}: {}", program, e)),
            Err(_) => {
                warn!("Command {} exceeded {:?}, killing it", program, timeout);
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill {}: {}", program, e);
                }
                ExecutionResult::timed_out()
            }
        }
    }
}
