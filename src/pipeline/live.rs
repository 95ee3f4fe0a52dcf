use anyhow::{Context, Result};
use tokio::process::Command;

use crate::cli::PipelineArgs;
use crate::comment::{self, CommentStatus};
use crate::constants::REQUIREMENTS;
use crate::credentials::Credential;
use crate::git;
use crate::reports::{self, ReportLinks};
use crate::tool::{self, ToolRun};
use crate::traits::{Credentials, PipelineSteps};
use crate::workspace::Workspace;

/// Stages backed by git, the Python tool chain and the GitHub API.
pub(crate) struct LiveSteps<C> {
    config: PipelineArgs,
    credentials: C,
}

impl<C: Credentials> LiveSteps<C> {
    pub(crate) fn new(config: PipelineArgs, credentials: C) -> Self {
        Self {
            config,
            credentials,
        }
    }

    fn command(&self, program: &str, ws: &Workspace) -> Command {
        let mut cmd = Command::new(program);
        cmd.current_dir(ws.project_dir(&self.config.project_dir));
        cmd
    }

    fn coverage_run(&self, ws: &Workspace) -> Command {
        let mut cmd = self.command("coverage", ws);
        cmd.arg("run")
            .arg(format!("--source={}", self.config.coverage_source))
            .args(["manage.py", "test"]);
        cmd
    }
}

impl<C: Credentials> PipelineSteps for LiveSteps<C> {
    async fn checkout(&self, ws: &Workspace) -> Result<()> {
        let token = self.credentials.token(Credential::Source)?;
        let url = self.config.source_repo.clone();
        let dest = ws.source_dir();
        let repo = tokio::task::spawn_blocking(move || git::clone_fresh(&url, &dest, &token))
            .await??;
        tracing::info!("Checked out {} to {:?}", self.config.source_repo, repo.path());
        Ok(())
    }

    async fn install(&self, ws: &Workspace) -> Result<ToolRun> {
        let mut cmd = Command::new("pip");
        cmd.arg("install")
            .arg("-r")
            .arg(ws.source_dir().join(REQUIREMENTS))
            .current_dir(ws.source_dir());
        tool::run(cmd, self.config.tool_timeout()).await
    }

    async fn run_tests(&self, ws: &Workspace) -> Result<ToolRun> {
        tool::run(self.coverage_run(ws), self.config.tool_timeout()).await
    }

    async fn render_coverage(&self, ws: &Workspace) -> Result<ToolRun> {
        // same directory as `run_tests`, where the coverage data file lives
        let mut cmd = self.command("coverage", ws);
        cmd.arg("html").arg("-d").arg(ws.coverage_dir());
        tool::run(cmd, self.config.tool_timeout()).await
    }

    async fn lint(&self, ws: &Workspace) -> Result<ToolRun> {
        let mut cmd = Command::new("flake8");
        cmd.args(["--exit-zero", "--format=html"])
            .arg(format!("--output-file={}", ws.lint_report().display()))
            .current_dir(ws.source_dir());
        tool::run(cmd, self.config.tool_timeout()).await
    }

    async fn publish(&self, ws: &Workspace) -> Result<()> {
        let token = self.credentials.token(Credential::Reports)?;
        let url = self.config.reports_repo.clone();
        let ws = ws.clone();
        tokio::task::spawn_blocking(move || reports::publish(&ws, &url, &token))
            .await
            .context("publish task panicked")?
    }

    async fn notify(&self, pr_url: &str, links: &ReportLinks) -> Result<CommentStatus> {
        let token = self.credentials.token(Credential::Reports)?;
        let github = comment::client(&self.config.github_api, &token)?;
        comment::post(&github, pr_url, &comment::make(links)?).await
    }

    fn links(&self) -> ReportLinks {
        ReportLinks::new(&self.config.pages_url)
    }
}
