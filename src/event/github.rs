use serde::Deserialize;

use crate::constants::OPENED;

use super::PullRequestOpened;

/// The two fields of a GitHub webhook payload a run depends on.
/// Everything else in the payload is ignored.
#[derive(Deserialize, Debug, Clone)]
pub(crate) struct PullRequestEvent {
    /// The action this event represents, absent e.g. for `ping`.
    pub action: Option<String>,
    /// The pull request this event corresponds to, if any.
    pub pull_request: Option<PullRequestRef>,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct PullRequestRef {
    pub url: String,
}

impl PullRequestEvent {
    /// The run to start, if this event opened a pull request.
    pub(crate) fn opened(self) -> Option<PullRequestOpened> {
        match (self.action.as_deref(), self.pull_request) {
            (Some(OPENED), Some(PullRequestRef { url })) => Some(PullRequestOpened { pr_url: url }),
            _ => None,
        }
    }
}
