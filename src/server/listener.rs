use futures::channel::mpsc::Sender;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use axum_github_webhook_extract::{GithubEvent, GithubToken as GitHubSecret};
use tower_http::trace::TraceLayer;

use crate::constants::ACK_STATUS;
use crate::event::{Event, PullRequestEvent};

#[derive(Debug, Clone)]
struct AppState {
    /// One sender shared by all requests so the queue bound holds.
    sender: Arc<Mutex<Sender<Event>>>,
    secret: GitHubSecret,
}

impl FromRef<AppState> for GitHubSecret {
    fn from_ref(state: &AppState) -> GitHubSecret {
        state.secret.clone()
    }
}

/// The same body is returned whether or not a run was started.
#[derive(Debug, Serialize)]
struct Ack {
    status: &'static str,
}

const ACK: Ack = Ack {
    status: ACK_STATUS,
};

async fn handle(
    State(state): State<AppState>,
    GithubEvent(event): GithubEvent<PullRequestEvent>,
) -> Json<Ack> {
    let action = event.action.clone();
    match event.opened() {
        Some(opened) => {
            tracing::info!("Enqueueing run for {opened}");
            enqueue(&state.sender, opened.into());
        }
        None => tracing::info!("Ignoring event with action {action:?}"),
    }
    Json(ACK)
}

/// Never waits for the runner: a full or closed queue drops the event.
fn enqueue(sender: &Mutex<Sender<Event>>, event: Event) {
    let Ok(mut sender) = sender.lock() else {
        tracing::error!("Dropping {event}: queue sender poisoned");
        return;
    };
    if let Err(error) = sender.try_send(event) {
        let reason = if error.is_full() { "queue full" } else { "runner gone" };
        tracing::error!("Dropping {}: {reason}", error.into_inner());
    }
}

pub(crate) fn listen(sender: Sender<Event>, secret: SecretString) -> axum::Router {
    let state = AppState {
        sender: Arc::new(Mutex::new(sender)),
        secret: GitHubSecret(Arc::new(secret.expose_secret().to_owned())),
    };
    std::mem::drop(secret);

    Router::new()
        .route("/webhook", post(handle))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
