use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::workspace;

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Start web hook server
    Serve(ServeArgs),
    /// Check out, test and publish reports once
    Run(RunArgs),
}

#[derive(Args)]
pub(crate) struct ServeArgs {
    /// IP and port to listen on
    #[arg(default_value = "0.0.0.0:5000")]
    pub(crate) addr: String,
    /// Webhook secret as configured on GitHub
    #[arg(long, env)]
    pub(crate) secret_token: Option<String>,
    #[command(flatten)]
    pub(crate) pipeline: PipelineArgs,
}

#[derive(Args)]
pub(crate) struct RunArgs {
    /// API url of a pull request to comment on (skip commenting if absent)
    #[arg(long)]
    pub(crate) pr_url: Option<String>,
    #[command(flatten)]
    pub(crate) pipeline: PipelineArgs,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct PipelineArgs {
    /// Git url of the repository to test
    #[arg(long, env)]
    pub(crate) source_repo: String,
    /// Git url of the repository the reports are pushed to
    #[arg(long, env)]
    pub(crate) reports_repo: String,
    /// Public base url the reports repository is served from
    #[arg(long, env)]
    pub(crate) pages_url: String,
    /// Base url of the GitHub REST API
    #[arg(long, env, default_value = "https://api.github.com")]
    pub(crate) github_api: String,
    /// Directory inside the checkout to run the test suite from
    #[arg(long, env, default_value = ".")]
    pub(crate) project_dir: PathBuf,
    /// Package to restrict coverage measurement to
    #[arg(long, env, default_value = ".")]
    pub(crate) coverage_source: String,
    /// Directory holding one workspace per run [default: user cache dir]
    #[arg(long, env)]
    pub(crate) workspace_dir: Option<PathBuf>,
    /// Environment variable holding the token for the repository under test
    #[arg(long, env, default_value = "SOURCE_REPO_TOKEN")]
    pub(crate) source_token_var: String,
    /// Environment variable holding the token for the reports repository and comments
    #[arg(long, env, default_value = "REPORTS_REPO_TOKEN")]
    pub(crate) reports_token_var: String,
    /// Kill any single tool that runs longer than this many seconds
    #[arg(long, env, value_name = "SECONDS")]
    pub(crate) tool_timeout: Option<u64>,
}

impl PipelineArgs {
    pub(crate) fn workspace_base(&self) -> &Path {
        self.workspace_dir
            .as_deref()
            .unwrap_or(workspace::default_base())
    }

    pub(crate) fn tool_timeout(&self) -> Option<Duration> {
        self.tool_timeout.map(Duration::from_secs)
    }
}
