use std::fmt::Display;

use anyhow::{Context, Result};

use crate::comment::CommentStatus;
use crate::reports::ReportLinks;
use crate::tool::ToolRun;
use crate::traits::PipelineSteps;
use crate::workspace::Workspace;

mod live;

pub(crate) use live::LiveSteps;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    Checkout,
    Install,
    Test,
    CoverageReport,
    Lint,
    Publish,
    Notify,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Stage::Checkout => "checkout",
            Stage::Install => "dependency installation",
            Stage::Test => "test run",
            Stage::CoverageReport => "coverage report",
            Stage::Lint => "lint",
            Stage::Publish => "report publication",
            Stage::Notify => "pull request comment",
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum RunOutcome {
    /// Checkout or dependency installation failed, nothing else ran.
    Aborted,
    Completed {
        tests_passed: bool,
        links: ReportLinks,
        /// `None` when there was no pull request to comment on.
        comment: Option<CommentStatus>,
    },
}

/// Run every stage against `ws`, commenting on `pr_url` at the end.
///
/// A failed checkout or install ends the run with [`RunOutcome::Aborted`].
/// Failures after that are returned as errors with the failed [`Stage`] as
/// outermost context. A failing test suite still gets its reports published.
pub(crate) async fn run<S: PipelineSteps>(
    steps: &S,
    ws: &Workspace,
    pr_url: Option<&str>,
) -> Result<RunOutcome> {
    if let Err(error) = prepare(steps, ws).await {
        tracing::error!("Error during checkout or dependency installation: {error:#}");
        return Ok(RunOutcome::Aborted);
    }

    let tests = steps.run_tests(ws).await.context(Stage::Test)?;
    if !tests.success() {
        tracing::warn!(
            "Test suite failed with exit code {}, publishing reports anyway",
            tests.exit()
        );
    }
    steps
        .render_coverage(ws)
        .await
        .and_then(ToolRun::ensure_success)
        .context(Stage::CoverageReport)?;
    steps
        .lint(ws)
        .await
        .and_then(ToolRun::ensure_success)
        .context(Stage::Lint)?;
    steps.publish(ws).await.context(Stage::Publish)?;

    let links = steps.links();
    let comment = match pr_url {
        Some(pr_url) => Some(steps.notify(pr_url, &links).await.context(Stage::Notify)?),
        None => None,
    };
    Ok(RunOutcome::Completed {
        tests_passed: tests.success(),
        links,
        comment,
    })
}

async fn prepare<S: PipelineSteps>(steps: &S, ws: &Workspace) -> Result<()> {
    steps.checkout(ws).await.context(Stage::Checkout)?;
    steps
        .install(ws)
        .await
        .and_then(ToolRun::ensure_success)
        .context(Stage::Install)?;
    Ok(())
}
