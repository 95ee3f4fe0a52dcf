use std::fmt::Display;
use std::process::Stdio;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use tokio::process::Command;

use crate::utils::tail_lines;

/// Lines of stderr carried into the error of a failed tool.
const STDERR_TAIL: usize = 20;

/// Outcome of one external tool invocation.
#[derive(Debug, Clone)]
pub(crate) struct ToolRun {
    pub(crate) program: String,
    /// Exit code, `None` if the process was killed by a signal.
    pub(crate) code: Option<i32>,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
    pub(crate) elapsed: Duration,
}

impl ToolRun {
    pub(crate) fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub(crate) fn exit(&self) -> impl Display {
        self.code
            .map_or_else(|| "signal".to_owned(), |code| code.to_string())
    }

    /// Turn a non-zero exit into an error carrying the end of stderr.
    pub(crate) fn ensure_success(self) -> Result<Self> {
        if !self.success() {
            bail!(
                "{} exited with {}:\n{}",
                self.program,
                self.exit(),
                tail_lines(&self.stderr, STDERR_TAIL)
            );
        }
        Ok(self)
    }
}

/// Run `cmd` to completion, capturing its output.
///
/// Only spawn failures and timeouts are errors here, a non-zero exit is
/// reported in the returned [`ToolRun`].
pub(crate) async fn run(mut cmd: Command, timeout: Option<Duration>) -> Result<ToolRun> {
    let program = cmd.as_std().get_program().to_string_lossy().into_owned();
    tracing::info!(
        "Running {program} in {}",
        cmd.as_std()
            .get_current_dir()
            .map_or_else(|| ".".into(), |d| d.display().to_string())
    );
    cmd.stdin(Stdio::null()).kill_on_drop(true);

    let started = Instant::now();
    let output = cmd.output();
    let output = if let Some(limit) = timeout {
        tokio::time::timeout(limit, output)
            .await
            .with_context(|| format!("{program} timed out after {limit:?}"))?
    } else {
        output.await
    }
    .with_context(|| format!("failed to spawn {program}"))?;

    let run = ToolRun {
        program,
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        elapsed: started.elapsed(),
    };
    tracing::info!(
        "{} exited with {} after {:.1}s",
        run.program,
        run.exit(),
        run.elapsed.as_secs_f64()
    );
    if !run.stdout.is_empty() {
        tracing::debug!("{} stdout:\n{}", run.program, run.stdout);
    }
    if !run.stderr.is_empty() {
        tracing::debug!("{} stderr:\n{}", run.program, run.stderr);
    }
    Ok(run)
}
