pub(crate) const APP_NAME: &str = "pr-report-bot";
pub(crate) const BOT_EMAIL: &str = "pr-report-bot@users.noreply.github.com";

/// Webhook action that starts a run.
pub(crate) const OPENED: &str = "opened";
/// Body of the acknowledgement returned for every accepted webhook.
pub(crate) const ACK_STATUS: &str = "received";

pub(crate) const COVERAGE_HTML_DIR: &str = "coverage_html";
pub(crate) const COVERAGE_INDEX: &str = "index.html";
pub(crate) const LINT_REPORT: &str = "tests.html";
pub(crate) const REQUIREMENTS: &str = "requirements.txt";

pub(crate) const COMMIT_MESSAGE: &str = "Update test and coverage reports";
pub(crate) const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
