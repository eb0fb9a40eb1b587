//! Spawning the test harness and reading its progress.
//!
//! [`CommandTestRunner`] runs a configured command (normally `cargo test`)
//! with name filters appended, streams libtest's human-readable output line
//! by line, and forwards each planned count and finished test as a
//! [`TestEvent`] so the tracker can update the record while the run is still
//! in flight.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::LazyLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use regex::Regex;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc::UnboundedSender;

use super::execution::{TestOutcome, TestResult};

/// Captured stderr is cut to this many trailing bytes.
const STDERR_TAIL_BYTES: usize = 4096;

static RUNNING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^running (\d+) tests?$").expect("valid regex"));

static RESULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^test (\S+) \.\.\. (ok|FAILED|ignored)").expect("valid regex")
});

/// Progress reported by a runner while tests execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestEvent {
    /// A test binary announced how many tests it will run.
    Planned(u32),
    Finished(TestResult),
}

/// How the harness process ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub exit_code: i32,
    pub stderr_tail: String,
    pub duration_ms: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum TestRunError {
    #[error("Failed to start test command: {0}")]
    Spawn(std::io::Error),

    #[error("I/O error during test execution: {0}")]
    Io(std::io::Error),

    #[error("Test execution timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },
}

/// Executes tests and streams their progress.
#[async_trait]
pub trait TestRunner: Send + Sync {
    async fn run(
        &self,
        filters: &[String],
        events: UnboundedSender<TestEvent>,
    ) -> Result<RunOutcome, TestRunError>;
}

/// Parse one line of libtest output.
pub fn parse_line(line: &str) -> Option<TestEvent> {
    let line = line.trim_end();
    if let Some(caps) = RUNNING_RE.captures(line) {
        return caps[1].parse().ok().map(TestEvent::Planned);
    }
    let caps = RESULT_RE.captures(line)?;
    let outcome = match &caps[2] {
        "ok" => TestOutcome::Passed,
        "FAILED" => TestOutcome::Failed,
        _ => TestOutcome::Skipped,
    };
    Some(TestEvent::Finished(TestResult {
        test_name: caps[1].to_string(),
        outcome,
    }))
}

// ---------------------------------------------------------------------------
// Command runner
// ---------------------------------------------------------------------------

/// Runs a test command as a child process.
#[derive(Debug, Clone)]
pub struct CommandTestRunner {
    program: String,
    args: Vec<String>,
    working_directory: Option<PathBuf>,
    timeout: Duration,
}

impl CommandTestRunner {
    /// Build from a whitespace-separated command line such as `cargo test --workspace`.
    pub fn from_command_line(
        command_line: &str,
        working_directory: Option<PathBuf>,
        timeout: Duration,
    ) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            working_directory,
            timeout,
        })
    }

    fn command(&self, filters: &[String]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if !filters.is_empty() {
            cmd.arg("--").args(filters);
        }
        if let Some(dir) = &self.working_directory {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl TestRunner for CommandTestRunner {
    async fn run(
        &self,
        filters: &[String],
        events: UnboundedSender<TestEvent>,
    ) -> Result<RunOutcome, TestRunError> {
        let start = Instant::now();
        let mut child = self.command(filters).spawn().map_err(TestRunError::Spawn)?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stderr_task = tokio::spawn(read_tail(stderr));

        let run = async {
            if let Some(stdout) = stdout {
                let mut lines = BufReader::new(stdout).lines();
                while let Some(line) = lines.next_line().await.map_err(TestRunError::Io)? {
                    if let Some(event) = parse_line(&line) {
                        // The tracker may have gone away; keep draining output.
                        let _ = events.send(event);
                    }
                }
            }
            child.wait().await.map_err(TestRunError::Io)
        };

        // On timeout `child` is dropped with kill_on_drop set.
        let status = match tokio::time::timeout(self.timeout, run).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(TestRunError::Timeout {
                    elapsed_ms: start.elapsed().as_millis() as u64,
                })
            }
        };

        let stderr_bytes = stderr_task.await.unwrap_or_default();
        Ok(RunOutcome {
            exit_code: status.code().unwrap_or(-1),
            stderr_tail: String::from_utf8_lossy(&stderr_bytes).into_owned(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Read a stream to the end, keeping only its last [`STDERR_TAIL_BYTES`].
async fn read_tail<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut tail = Vec::new();
    let Some(mut h) = handle else {
        return tail;
    };
    let mut chunk = [0u8; 1024];
    while let Ok(n) = h.read(&mut chunk).await {
        if n == 0 {
            break;
        }
        tail.extend_from_slice(&chunk[..n]);
        if tail.len() > STDERR_TAIL_BYTES {
            tail.drain(..tail.len() - STDERR_TAIL_BYTES);
        }
    }
    tail
}
