use std::path::Path;

use anyhow::{Context, Result};
use secrecy::SecretString;

use crate::constants::{COMMIT_MESSAGE, COVERAGE_INDEX, LINT_REPORT};
use crate::git;
use crate::workspace::Workspace;

/// Public URLs of the two published reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReportLinks {
    pub(crate) coverage: String,
    pub(crate) lint: String,
}

impl ReportLinks {
    pub(crate) fn new(pages_url: &str) -> Self {
        let base = pages_url.trim_end_matches('/');
        Self {
            coverage: format!("{base}/{COVERAGE_INDEX}"),
            lint: format!("{base}/{LINT_REPORT}"),
        }
    }
}

/// Clone the reports repository fresh, overwrite both reports and push the result.
pub(crate) fn publish(ws: &Workspace, reports_repo: &str, token: &SecretString) -> Result<()> {
    let dest = ws.reports_dir();
    let repo = git::clone_fresh(reports_repo, &dest, token)?;
    tracing::info!("Checked out reports repository to {}", dest.display());

    for (artifact, name) in [
        (ws.coverage_index(), COVERAGE_INDEX),
        (ws.lint_report(), LINT_REPORT),
    ] {
        std::fs::copy(&artifact, dest.join(name)).with_context(|| {
            format!("failed to copy {} to reports repository", artifact.display())
        })?;
        if repo
            .status_file(Path::new(name))
            .is_ok_and(|status| status.contains(git2::Status::WT_NEW))
        {
            tracing::warn!("{name} is not tracked in the reports repository and will not be published");
        }
    }

    git::commit_tracked(&repo, COMMIT_MESSAGE)?;
    git::push_head(&repo, token)
}

#[cfg(test)]
mod tests {
    use crate::git::testing::{head_file, head_message, seed_bare};
    use crate::workspace::RunId;

    use super::*;

    fn write_artifacts(ws: &Workspace, coverage: &str, lint: &str) {
        std::fs::create_dir_all(ws.coverage_dir()).unwrap();
        std::fs::write(ws.coverage_index(), coverage).unwrap();
        std::fs::write(ws.lint_report(), lint).unwrap();
    }

    fn tree_names(path: &Path) -> Vec<String> {
        let repo = git2::Repository::open(path).unwrap();
        let tree = repo.head().unwrap().peel_to_tree().unwrap();
        tree.iter()
            .map(|e| e.name().unwrap().to_owned())
            .collect()
    }

    #[test]
    fn test_links() {
        let links = ReportLinks::new("https://someone.github.io/tests-repo/");
        assert_eq!(
            links,
            ReportLinks {
                coverage: "https://someone.github.io/tests-repo/index.html".to_owned(),
                lint: "https://someone.github.io/tests-repo/tests.html".to_owned(),
            }
        );
    }

    #[test]
    fn test_publish_overwrites_reports() {
        let tmp = tempfile::tempdir().unwrap();
        let remote = seed_bare(
            tmp.path(),
            &[
                ("README.md", "reports"),
                ("index.html", "old coverage"),
                ("tests.html", "old lint"),
            ],
        );
        let url = remote.to_str().unwrap();
        let token = SecretString::new("t".to_owned());
        let ws = Workspace::new(&tmp.path().join("runs"), RunId::generate());

        write_artifacts(&ws, "coverage 1", "lint 1");
        publish(&ws, url, &token).unwrap();
        assert_eq!(head_file(&remote, "index.html").as_deref(), Some("coverage 1"));
        assert_eq!(head_file(&remote, "tests.html").as_deref(), Some("lint 1"));
        assert_eq!(head_message(&remote), COMMIT_MESSAGE);

        // second run in the same workspace recreates the reports checkout
        std::fs::write(ws.reports_dir().join("scratch.txt"), "x").unwrap();
        write_artifacts(&ws, "coverage 2", "lint 2");
        publish(&ws, url, &token).unwrap();
        assert!(!ws.reports_dir().join("scratch.txt").exists());
        assert_eq!(head_file(&remote, "index.html").as_deref(), Some("coverage 2"));
        assert_eq!(head_file(&remote, "tests.html").as_deref(), Some("lint 2"));
        assert_eq!(
            tree_names(&remote),
            ["README.md", "index.html", "tests.html"]
        );
    }

    #[test]
    fn test_publish_requires_artifacts() {
        let tmp = tempfile::tempdir().unwrap();
        let remote = seed_bare(tmp.path(), &[("index.html", "old")]);
        let ws = Workspace::new(&tmp.path().join("runs"), RunId::generate());
        let error = publish(
            &ws,
            remote.to_str().unwrap(),
            &SecretString::new("t".to_owned()),
        )
        .unwrap_err();
        assert!(
            error.to_string().starts_with("failed to copy"),
            "{error}"
        );
        assert_eq!(head_file(&remote, "index.html").as_deref(), Some("old"));
    }
}
