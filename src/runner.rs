use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use tokio::{fs, io::AsyncWriteExt, process::Command, time};
use tracing::{debug, warn};
use which::which;

use crate::error::Error;
use crate::languages::profile_for;
use crate::types::{EvalLimits, Language, RunOutput};

/// Explicit, minimal child environment. The child never inherits ambient
/// process state, so tests run fully isolated.
#[derive(Debug, Clone)]
pub struct ExecEnv {
    /// PATH handed to the child so language runtimes resolve.
    pub path: String,
    /// Additional variables, e.g. NODE_PATH or PYTHONPATH.
    pub vars: Vec<(String, String)>,
}

impl Default for ExecEnv {
    fn default() -> Self {
        Self {
            path: "/usr/local/bin:/usr/bin:/bin".to_string(),
            vars: Vec::new(),
        }
    }
}

impl ExecEnv {
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.push((key.into(), value.into()));
        self
    }
}

/// Distinguishing marker on a failed run. `Timeout` lets callers render
/// "Time Limit Exceeded" instead of a generic crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    NonZeroExit,
    Signal,
}

/// Raw failure of a child process, before classification.
#[derive(Debug, Clone)]
pub struct RunFailure {
    pub kind: FailureKind,
    pub exit_code: Option<i32>,
    pub stderr: String,
    pub details: String,
}

/// What a run produced: a clean exit with captured output, or a user-code
/// failure. Infrastructure faults are `Err` at the call site instead.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(RunOutput),
    Failed(RunFailure),
}

/// Executes assembled source as an isolated child process.
///
/// Each invocation is self-contained: its own scratch directory, its own
/// process group, its own environment. Concurrent runs cannot interfere.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    limits: EvalLimits,
    env: ExecEnv,
}

impl ProcessRunner {
    pub fn new(limits: EvalLimits) -> Self {
        Self {
            limits,
            env: ExecEnv::default(),
        }
    }

    pub fn with_env(limits: EvalLimits, env: ExecEnv) -> Self {
        Self { limits, env }
    }

    /// Write `source` to a uniquely named temp file, run the language's
    /// interpreter on it under the wall-clock limit, and capture output.
    ///
    /// stdin lines, when present, are written newline-terminated and the
    /// stream is closed. Scratch cleanup is best-effort on drop and never
    /// masks the execution result.
    pub async fn run(
        &self,
        source: &str,
        language: Language,
        stdin_lines: &[String],
    ) -> Result<RunOutcome, Error> {
        let profile = profile_for(language);

        let scratch = tempfile::Builder::new()
            .prefix("eval-")
            .tempdir()
            .map_err(|e| Error::Sandbox(format!("Failed to create scratch directory: {}", e)))?;
        let source_path = scratch
            .path()
            .join(format!("source.{}", profile.file_extension()));
        fs::write(&source_path, source)
            .await
            .map_err(|e| Error::Sandbox(format!("Failed to write source file: {}", e)))?;

        let interpreter = which(profile.interpreter()).map_err(|_| {
            Error::Sandbox(format!("Interpreter not found: {}", profile.interpreter()))
        })?;

        debug!(
            interpreter = %interpreter.display(),
            source = %source_path.display(),
            "spawning child process"
        );

        let mut command = Command::new(&interpreter);
        command
            .arg(&source_path)
            .env_clear()
            .env("PATH", &self.env.path)
            .env("HOME", scratch.path())
            .envs(self.env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(scratch.path())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if stdin_lines.is_empty() {
                Stdio::null()
            } else {
                Stdio::piped()
            })
            .kill_on_drop(true);

        // Child leads its own process group so a timeout kills the whole tree.
        unsafe {
            command.pre_exec(|| {
                nix::unistd::setpgid(Pid::from_raw(0), Pid::from_raw(0))
                    .map_err(|e| std::io::Error::from_raw_os_error(e as i32))
            });
        }

        let mut child = command
            .spawn()
            .map_err(|e| Error::Sandbox(format!("Failed to spawn process: {}", e)))?;

        if !stdin_lines.is_empty() {
            if let Some(mut stdin) = child.stdin.take() {
                for line in stdin_lines {
                    let written = async {
                        stdin.write_all(line.as_bytes()).await?;
                        stdin.write_all(b"\n").await
                    }
                    .await;
                    match written {
                        Ok(()) => {}
                        // A child that exits before draining its stdin is a
                        // user-code outcome; let the wait below classify it.
                        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => break,
                        Err(e) => {
                            return Err(Error::Sandbox(format!("Failed to write stdin: {}", e)))
                        }
                    }
                }
                // Dropping the handle closes the stream and signals EOF.
                drop(stdin);
            }
        }

        let pid = child.id();
        let output = match time::timeout(self.limits.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(Error::Sandbox(format!("Process error: {}", e))),
            Err(_) => {
                // kill_on_drop has already taken the direct child down with
                // the awaited future; sweep the rest of its group.
                warn!(
                    timeout_secs = self.limits.timeout.as_secs(),
                    "execution timed out, killing process group"
                );
                if let Some(pid) = pid {
                    let _ = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL);
                }
                return Ok(RunOutcome::Failed(RunFailure {
                    kind: FailureKind::Timeout,
                    exit_code: None,
                    stderr: String::new(),
                    details: format!(
                        "timed out after {} seconds",
                        self.limits.timeout.as_secs()
                    ),
                }));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if output.status.success() {
            debug!("child exited cleanly");
            return Ok(RunOutcome::Completed(RunOutput { stdout, stderr }));
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = output.status.signal() {
                return Ok(RunOutcome::Failed(RunFailure {
                    kind: FailureKind::Signal,
                    exit_code: None,
                    stderr,
                    details: format!("terminated by signal {}", signal),
                }));
            }
        }

        let details = match output.status.code() {
            Some(code) => format!("exited with code {}", code),
            None => "exited abnormally".to_string(),
        };
        Ok(RunOutcome::Failed(RunFailure {
            kind: FailureKind::NonZeroExit,
            exit_code: output.status.code(),
            stderr,
            details,
        }))
    }
}
