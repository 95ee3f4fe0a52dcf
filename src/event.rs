use std::fmt::Display;

mod github;

pub(crate) use github::PullRequestEvent;

/// Work handed from the webhook listener to the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    PullRequestOpened(PullRequestOpened),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PullRequestOpened {
    /// API url of the pull request, comments are posted below it.
    pub pr_url: String,
}

impl From<PullRequestOpened> for Event {
    fn from(val: PullRequestOpened) -> Self {
        Event::PullRequestOpened(val)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::PullRequestOpened(opened) => write!(f, "{opened}"),
        }
    }
}

impl Display for PullRequestOpened {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "opened pull request {}", self.pr_url)
    }
}
