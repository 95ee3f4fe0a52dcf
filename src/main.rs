#![warn(clippy::pedantic)]

use anyhow::{bail, Result};
use clap::Parser;

use pipeline::{LiveSteps, RunOutcome};
use workspace::{RunId, Workspace};

mod cli;
mod comment;
mod constants;
mod credentials;
mod event;
#[cfg(test)]
mod fixtures;
mod git;
mod pipeline;
mod reports;
mod server;
mod tool;
mod traits;
mod utils;
mod workspace;

#[tokio::main]
async fn main() -> Result<()> {
    cli::init_tracing();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Commands::Serve(args) => {
            server::serve(args).await?;
        }
        cli::Commands::Run(args) => {
            let ws = Workspace::new(args.pipeline.workspace_base(), RunId::generate());
            let steps = LiveSteps::new(
                args.pipeline.clone(),
                credentials::EnvCredentials::from_args(&args.pipeline),
            );
            match pipeline::run(&steps, &ws, args.pr_url.as_deref()).await? {
                RunOutcome::Aborted => bail!("Run aborted during checkout or dependency installation"),
                RunOutcome::Completed {
                    tests_passed,
                    links,
                    comment,
                } => {
                    tracing::info!("Coverage report: {}", links.coverage);
                    tracing::info!("Lint report: {}", links.lint);
                    if let Some(comment) = comment {
                        tracing::info!("Pull request comment: {comment:?}");
                    }
                    if !tests_passed {
                        bail!("Test suite failed");
                    }
                }
            }
        }
    }
    Ok(())
}
