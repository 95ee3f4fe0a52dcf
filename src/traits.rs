use std::future::Future;

use anyhow::Result;
use secrecy::SecretString;

use crate::comment::CommentStatus;
use crate::credentials::Credential;
use crate::reports::ReportLinks;
use crate::tool::ToolRun;
use crate::workspace::Workspace;

/// Supplies access tokens to network operations.
pub(crate) trait Credentials: Send + Sync {
    fn token(&self, credential: Credential) -> Result<SecretString>;
}

/// The side-effecting stages of a run, in the order [`crate::pipeline::run`] calls them.
pub(crate) trait PipelineSteps: Send + Sync {
    /// Fresh checkout of the repository under test into [`Workspace::source_dir`].
    fn checkout(&self, ws: &Workspace) -> impl Future<Output = Result<()>> + Send;
    fn install(&self, ws: &Workspace) -> impl Future<Output = Result<ToolRun>> + Send;
    fn run_tests(&self, ws: &Workspace) -> impl Future<Output = Result<ToolRun>> + Send;
    fn render_coverage(&self, ws: &Workspace) -> impl Future<Output = Result<ToolRun>> + Send;
    fn lint(&self, ws: &Workspace) -> impl Future<Output = Result<ToolRun>> + Send;
    /// Copy the reports into the reports repository and push them.
    fn publish(&self, ws: &Workspace) -> impl Future<Output = Result<()>> + Send;
    fn notify(
        &self,
        pr_url: &str,
        links: &ReportLinks,
    ) -> impl Future<Output = Result<CommentStatus>> + Send;
    fn links(&self) -> ReportLinks;
}
