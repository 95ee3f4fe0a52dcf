use std::path::Path;

use anyhow::{Context, Result};
use git2::{build::RepoBuilder, Cred, FetchOptions, PushOptions, RemoteCallbacks, Repository};
use secrecy::{ExposeSecret, SecretString};

use crate::constants::{APP_NAME, BOT_EMAIL};
use crate::workspace::clear_dir;

/// Callbacks answering authentication requests with `token`, once.
fn callbacks(token: &SecretString) -> RemoteCallbacks<'_> {
    let mut callbacks = RemoteCallbacks::new();
    let mut attempted = false;
    callbacks.credentials(move |_url, _username, _allowed| {
        // libgit2 keeps asking as long as we keep answering
        if attempted {
            return Err(git2::Error::from_str("authentication with token failed"));
        }
        attempted = true;
        Cred::userpass_plaintext("x-access-token", token.expose_secret())
    });
    callbacks
}

/// Delete whatever is at `dest` and clone `url` into it.
pub(crate) fn clone_fresh(url: &str, dest: &Path, token: &SecretString) -> Result<Repository> {
    clear_dir(dest)?;
    let mut fetch = FetchOptions::new();
    fetch.remote_callbacks(callbacks(token));
    RepoBuilder::new()
        .fetch_options(fetch)
        .clone(url, dest)
        .with_context(|| format!("failed to clone {url}"))
}

/// Stage changes to tracked files (like `git add --update`) and commit them on HEAD.
pub(crate) fn commit_tracked(repo: &Repository, message: &str) -> Result<git2::Oid> {
    let mut index = repo.index()?;
    index.update_all(["*"].iter(), None)?;
    index.write()?;
    let tree = repo.find_tree(index.write_tree()?)?;
    let parent = repo
        .head()
        .and_then(|head| head.peel_to_commit())
        .context("reports repository has no commit to build on")?;
    let signature = repo
        .signature()
        .or_else(|_| git2::Signature::now(APP_NAME, BOT_EMAIL))?;
    let oid = repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        message,
        &tree,
        &[&parent],
    )?;
    tracing::info!("Committed {oid}");
    Ok(oid)
}

/// Push the current branch to `origin`. A rejected update is an error.
pub(crate) fn push_head(repo: &Repository, token: &SecretString) -> Result<()> {
    let head = repo.head()?;
    let branch = head
        .name()
        .context("HEAD is not valid UTF-8")?
        .to_owned();
    let mut remote = repo.find_remote("origin")?;

    let mut callbacks = callbacks(token);
    callbacks.push_update_reference(|reference, status| match status {
        Some(message) => Err(git2::Error::from_str(&format!(
            "push of {reference} rejected: {message}"
        ))),
        None => Ok(()),
    });
    let mut options = PushOptions::new();
    options.remote_callbacks(callbacks);

    remote
        .push(&[format!("{branch}:{branch}")], Some(&mut options))
        .with_context(|| format!("failed to push {branch} to origin"))?;
    tracing::info!("Pushed {branch}");
    Ok(())
}
