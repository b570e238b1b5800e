//! Sandboxed execution of candidate artifacts.
//!
//! The engine depends on the [`SandboxExecutor`] contract; isolation policy
//! lives in the implementation. [`ProcessSandbox`] runs candidates inside a
//! container runtime when an image is configured, and falls back to a
//! direct child process under a shorter timeout otherwise. Either way the
//! child is killed and reaped at the deadline; no process outlives a run.

use std::io;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use crate::schema::SandboxConfig;

/// Poll interval while waiting on a child process.
const WAIT_POLL: Duration = Duration::from_millis(25);

/// Captured result of one sandboxed run.
///
/// A timeout and a nonzero exit both surface as `succeeded: false`; the
/// caller treats them identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// Captured standard output.
    pub stdout: String,
    /// Whether the run exited zero within its deadline.
    pub succeeded: bool,
}

/// Runs one artifact under resource isolation.
pub trait SandboxExecutor: Send + Sync {
    /// Execute the artifact and capture its output.
    fn run(&self, artifact: &Path) -> io::Result<ExecutionOutcome>;
}

/// Process-backed sandbox with an optional container runtime.
pub struct ProcessSandbox {
    config: SandboxConfig,
}

impl ProcessSandbox {
    /// Create a sandbox from config.
    pub fn new(config: SandboxConfig) -> Self {
        Self { config }
    }

    fn command_for(&self, artifact: &Path) -> io::Result<(Command, Duration)> {
        match &self.config.container_image {
            Some(image) => {
                // The mount path must be absolute for the runtime.
                let host_path = artifact.canonicalize()?;
                let mut cmd = Command::new("docker");
                cmd.arg("run")
                    .arg("--rm")
                    .arg("--network")
                    .arg("none")
                    .arg("--memory")
                    .arg("256m")
                    .arg("-v")
                    .arg(format!("{}:/sandbox/solution:ro", host_path.display()))
                    .arg(image)
                    .arg(&self.config.interpreter)
                    .arg("/sandbox/solution");
                Ok((cmd, Duration::from_secs(self.config.timeout_secs)))
            }
            None => {
                let mut cmd = Command::new(&self.config.interpreter);
                cmd.arg(artifact);
                Ok((cmd, Duration::from_secs(self.config.fallback_timeout_secs)))
            }
        }
    }
}

impl SandboxExecutor for ProcessSandbox {
    fn run(&self, artifact: &Path) -> io::Result<ExecutionOutcome> {
        let (mut cmd, timeout) = self.command_for(artifact)?;
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        let mut child = cmd.spawn()?;
        let mut stdout_pipe = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("child stdout not captured"))?;

        // Drain stdout on a separate thread so a chatty child cannot fill
        // the pipe and block past the deadline check.
        let reader = thread::spawn(move || {
            let mut buf = String::new();
            stdout_pipe.read_to_string(&mut buf).ok();
            buf
        });

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait()? {
                Some(status) => break Some(status),
                None if Instant::now() >= deadline => {
                    debug!("candidate run exceeded {timeout:?}, killing");
                    child.kill().ok();
                    child.wait()?;
                    break None;
                }
                None => thread::sleep(WAIT_POLL),
            }
        };

        let stdout = reader.join().unwrap_or_default();
        Ok(ExecutionOutcome {
            stdout,
            succeeded: status.is_some_and(|s| s.success()),
        })
    }
}
