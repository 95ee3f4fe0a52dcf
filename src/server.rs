use anyhow::Result;
use futures::FutureExt;
use futures::{channel::mpsc::channel, TryFutureExt};
use secrecy::SecretString;
use std::future::IntoFuture;
use tokio::net::TcpListener;
use tokio::task::JoinSet;

use crate::cli::ServeArgs;
use crate::credentials::EnvCredentials;
use crate::event::Event;
use crate::pipeline::LiveSteps;
use crate::utils::get_credential;

mod listener;
mod runner;

/// Events waiting for the runner before the listener starts dropping them.
const QUEUE_SIZE: usize = 32;

pub(crate) async fn serve(args: ServeArgs) -> Result<()> {
    let (sender, receiver) = channel::<Event>(QUEUE_SIZE);
    // If secret has not been passed via CLI or env, get it as a credential.
    let secret_token = args
        .secret_token
        .map(SecretString::new)
        .ok_or(())
        .or_else(|()| get_credential("webhook_secret"))?;

    let service = listener::listen(sender, secret_token);
    let workspaces = args.pipeline.workspace_base().to_path_buf();
    let steps = LiveSteps::new(
        args.pipeline.clone(),
        EnvCredentials::from_args(&args.pipeline),
    );
    let tcp_listener = TcpListener::bind(&args.addr).await?;
    tracing::info!("Listening on {}", args.addr);
    tracing::info!("Run workspaces go to {}", workspaces.display());

    let mut set: JoinSet<Result<()>> = JoinSet::new();
    set.spawn(axum::serve(tcp_listener, service).into_future().err_into());
    set.spawn(runner::runner(receiver, steps, workspaces).map(Result::Ok));
    while let Some(res) = set.join_next().await {
        res??;
    }
    Ok(())
}
