use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Utc};
use directories::ProjectDirs;

use crate::constants::{APP_NAME, COVERAGE_HTML_DIR, COVERAGE_INDEX, LINT_REPORT};

static DEFAULT_BASE: LazyLock<PathBuf> = LazyLock::new(|| {
    ProjectDirs::from("org", "pr-reports", APP_NAME).map_or_else(
        || std::env::temp_dir().join(APP_NAME),
        |dirs| dirs.cache_dir().to_path_buf(),
    )
    .join("runs")
});

/// Directory holding one sub-directory per run, unless configured otherwise.
pub(crate) fn default_base() -> &'static Path {
    &DEFAULT_BASE
}

/// Identifies one pipeline run, e.g. `20261016T101500Z-1a2b3c4d`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunId(String);

impl RunId {
    const STAMP: &'static str = "%Y%m%dT%H%M%SZ";

    pub(crate) fn generate() -> Self {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self(format!(
            "{}-{}",
            Utc::now().format(Self::STAMP),
            &suffix[..8]
        ))
    }

    /// Whether a directory name was produced by [`RunId::generate`].
    fn matches(name: &str) -> bool {
        name.rsplit_once('-').is_some_and(|(stamp, suffix)| {
            NaiveDateTime::parse_from_str(stamp, Self::STAMP).is_ok()
                && suffix.len() == 8
                && suffix.bytes().all(|b| b.is_ascii_hexdigit())
        })
    }
}

impl Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Paths used by a single run. Every stage derives its directories from here.
#[derive(Debug, Clone)]
pub(crate) struct Workspace {
    run_id: RunId,
    root: PathBuf,
}

impl Workspace {
    pub(crate) fn new(base: &Path, run_id: RunId) -> Self {
        let root = base.join(&run_id.0);
        Self { run_id, root }
    }

    pub(crate) fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    /// Working copy of the repository under test.
    pub(crate) fn source_dir(&self) -> PathBuf {
        self.root.join("source")
    }

    /// Working copy of the reports repository.
    pub(crate) fn reports_dir(&self) -> PathBuf {
        self.root.join("reports")
    }

    /// Directory inside the working copy where the test suite is run.
    pub(crate) fn project_dir(&self, relative: &Path) -> PathBuf {
        self.source_dir().join(relative)
    }

    pub(crate) fn coverage_dir(&self) -> PathBuf {
        self.source_dir().join(COVERAGE_HTML_DIR)
    }

    pub(crate) fn coverage_index(&self) -> PathBuf {
        self.coverage_dir().join(COVERAGE_INDEX)
    }

    pub(crate) fn lint_report(&self) -> PathBuf {
        self.source_dir().join(LINT_REPORT)
    }

    /// Remove the directories of earlier runs next to this one.
    ///
    /// Only names shaped like a [`RunId`] are touched, anything else in the
    /// base directory is left alone. A missing base is not an error.
    pub(crate) fn prune_previous(&self) -> Result<()> {
        let Some(base) = self.root.parent() else {
            return Ok(());
        };
        let entries = match std::fs::read_dir(base) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to list {}", base.display()))
            }
        };
        for entry in entries {
            let path = entry?.path();
            let is_previous_run = path != self.root
                && path.is_dir()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(RunId::matches);
            if is_previous_run {
                tracing::info!("Removing previous run {}", path.display());
                std::fs::remove_dir_all(&path)
                    .with_context(|| format!("failed to remove {}", path.display()))?;
            }
        }
        Ok(())
    }
}

/// Delete `path` if it exists and make sure its parent does.
pub(crate) fn clear_dir(path: &Path) -> Result<()> {
    if path.exists() {
        tracing::info!("Removing existing {}", path.display());
        std::fs::remove_dir_all(path)
            .with_context(|| format!("failed to remove {}", path.display()))?;
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}
