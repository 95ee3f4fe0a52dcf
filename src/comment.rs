use anyhow::{Context, Result};
use askama::Template;
use http::StatusCode;
use octocrab::Octocrab;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::constants::GITHUB_ACCEPT;
use crate::reports::ReportLinks;

/// What the comments endpoint made of our request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommentStatus {
    Posted,
    /// Any status other than `201 Created`.
    Rejected(u16),
}

#[derive(Template)]
#[template(path = "comment.md.j2", escape = "none")]
struct Comment<'a> {
    links: &'a ReportLinks,
}

#[derive(Serialize)]
struct CommentRequest<'a> {
    body: &'a str,
}

pub(crate) fn make(links: &ReportLinks) -> Result<String> {
    Ok(Comment { links }.render()?)
}

/// GitHub client authenticated with `token` against `api_base`.
pub(crate) fn client(api_base: &str, token: &SecretString) -> Result<Octocrab> {
    Octocrab::builder()
        .base_uri(api_base)
        .with_context(|| format!("invalid GitHub API url {api_base}"))?
        .personal_token(token.expose_secret().to_owned())
        .add_header(http::header::ACCEPT, GITHUB_ACCEPT.to_owned())
        .build()
        .context("failed to build GitHub client")
}

/// POST `body` to `{pr_url}/comments`.
pub(crate) async fn post(github: &Octocrab, pr_url: &str, body: &str) -> Result<CommentStatus> {
    let url = format!("{}/comments", pr_url.trim_end_matches('/'));
    let response = github
        ._post(url.as_str(), Some(&CommentRequest { body }))
        .await
        .with_context(|| format!("failed to post comment to {url}"))?;
    let status = response.status();
    if status == StatusCode::CREATED {
        tracing::info!("Comment posted to {url}");
        Ok(CommentStatus::Posted)
    } else {
        tracing::error!("Failed to post comment to {url}: {status}");
        Ok(CommentStatus::Rejected(status.as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    fn links() -> ReportLinks {
        ReportLinks::new("https://someone.github.io/tests-repo")
    }

    #[test]
    fn test_make_has_exactly_two_links() {
        let markdown = make(&links()).unwrap();
        assert!(markdown.starts_with("### Test Reports\n"));
        assert!(markdown.contains(
            "- [Code Coverage Report](https://someone.github.io/tests-repo/index.html)"
        ));
        assert!(markdown
            .contains("- [Linting Report](https://someone.github.io/tests-repo/tests.html)"));
        assert_eq!(markdown.matches("](").count(), 2);
    }

    async fn github_with(status: u16) -> (MockServer, Octocrab) {
        let server = MockServer::start().await;
        let body = make(&links()).unwrap();
        Mock::given(method("POST"))
            .and(path("/repos/someone/app/pulls/7/comments"))
            .and(header("authorization", "Bearer tok"))
            .and(header("accept", GITHUB_ACCEPT))
            .and(body_json(json!({ "body": body })))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "id": 1 })))
            .expect(1)
            .mount(&server)
            .await;
        let github = client(&server.uri(), &SecretString::new("tok".to_owned())).unwrap();
        (server, github)
    }

    #[tokio::test]
    async fn test_post_created() {
        let (server, github) = github_with(201).await;
        let pr_url = format!("{}/repos/someone/app/pulls/7", server.uri());
        let body = make(&links()).unwrap();
        assert_eq!(
            post(&github, &pr_url, &body).await.unwrap(),
            CommentStatus::Posted
        );
    }

    #[tokio::test]
    async fn test_post_rejected_is_not_an_error() {
        let (server, github) = github_with(422).await;
        let pr_url = format!("{}/repos/someone/app/pulls/7/", server.uri());
        let body = make(&links()).unwrap();
        assert_eq!(
            post(&github, &pr_url, &body).await.unwrap(),
            CommentStatus::Rejected(422)
        );
    }
}
