use std::fmt::Display;

use anyhow::{Context, Result};
use secrecy::SecretString;

use crate::cli::PipelineArgs;
use crate::traits::Credentials;

/// Which of the two tokens a network operation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Credential {
    /// Clones the repository under test.
    Source,
    /// Clones and pushes the reports repository and posts the PR comment.
    Reports,
}

impl Display for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::Source => f.write_str("source token"),
            Credential::Reports => f.write_str("reports token"),
        }
    }
}

/// Reads tokens from environment variables each time one is needed.
#[derive(Debug, Clone)]
pub(crate) struct EnvCredentials {
    source_var: String,
    reports_var: String,
}

impl EnvCredentials {
    pub(crate) fn new(source_var: impl Into<String>, reports_var: impl Into<String>) -> Self {
        Self {
            source_var: source_var.into(),
            reports_var: reports_var.into(),
        }
    }

    pub(crate) fn from_args(args: &PipelineArgs) -> Self {
        Self::new(&args.source_token_var, &args.reports_token_var)
    }
}

impl Credentials for EnvCredentials {
    fn token(&self, credential: Credential) -> Result<SecretString> {
        let var = match credential {
            Credential::Source => &self.source_var,
            Credential::Reports => &self.reports_var,
        };
        std::env::var(var)
            .map(SecretString::new)
            .with_context(|| format!("{credential} missing: environment variable {var} is not set"))
    }
}
