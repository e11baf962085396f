//! Blocking client for the handful of GitHub REST endpoints the updater uses.

use crate::error::{Result, UpdaterError};
use crate::release::{ReleaseLookup, ReleaseMetadata, ReleaseSource};
use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("gha-updater/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// GitHubApi
// ---------------------------------------------------------------------------

/// The remote calls the orchestrator makes besides release lookups.
pub trait GitHubApi: ReleaseSource {
    /// Paths of every workflow registered for `repository`, relative to the
    /// repository root.
    fn list_workflow_paths(&self, repository: &str) -> Result<Vec<String>>;

    fn create_pull_request(
        &self,
        repository: &str,
        request: &NewPullRequest,
    ) -> Result<PullRequest>;
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPullRequest {
    pub title: String,
    pub head: String,
    pub base: String,
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: String,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct LatestRelease {
    tag_name: String,
    html_url: String,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    body: Option<String>,
}

#[derive(Deserialize)]
struct WorkflowList {
    #[serde(default)]
    workflows: Vec<Workflow>,
}

#[derive(Deserialize)]
struct Workflow {
    path: String,
}

// ---------------------------------------------------------------------------
// GitHubClient
// ---------------------------------------------------------------------------

pub struct GitHubClient {
    http: Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    /// `api_url` is injected so tests and GitHub Enterprise hosts can point
    /// the client elsewhere. No timeout is set beyond the HTTP client's own.
    pub fn new(api_url: &str, token: &str) -> Result<Self> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }
}

impl ReleaseSource for GitHubClient {
    fn latest_release(&self, repository: &str) -> Result<ReleaseLookup> {
        let url = format!("{}/repos/{repository}/releases/latest", self.api_url);
        tracing::debug!(%url, "fetching latest release");
        let response = self.authorized(self.http.get(&url)).send()?;
        let status = response.status();
        if status != StatusCode::OK {
            return Ok(ReleaseLookup::Missing {
                status: status.as_u16(),
            });
        }
        let latest: LatestRelease = response.json()?;
        Ok(ReleaseLookup::Found(ReleaseMetadata {
            repository: repository.to_string(),
            tag_name: latest.tag_name,
            html_url: latest.html_url,
            published_at: latest.published_at,
            body: latest.body,
        }))
    }
}

impl GitHubApi for GitHubClient {
    fn list_workflow_paths(&self, repository: &str) -> Result<Vec<String>> {
        let url = format!("{}/repos/{repository}/actions/workflows", self.api_url);
        tracing::debug!(%url, "listing workflows");
        let response = self.authorized(self.http.get(&url)).send()?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(UpdaterError::WorkflowListing {
                repository: repository.to_string(),
                status: status.as_u16(),
            });
        }
        let list: WorkflowList = response.json()?;
        Ok(list.workflows.into_iter().map(|w| w.path).collect())
    }

    fn create_pull_request(
        &self,
        repository: &str,
        request: &NewPullRequest,
    ) -> Result<PullRequest> {
        let url = format!("{}/repos/{repository}/pulls", self.api_url);
        tracing::debug!(%url, head = %request.head, base = %request.base, "opening pull request");
        let response = self.authorized(self.http.post(&url)).json(request).send()?;
        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().unwrap_or_default();
            return Err(UpdaterError::PullRequestFailed {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json()?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::ServerGuard) -> GitHubClient {
        GitHubClient::new(&server.url(), "secret-token").unwrap()
    }

    #[test]
    fn latest_release_found() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/repos/actions/checkout/releases/latest")
            .match_header("authorization", "Bearer secret-token")
            .match_header("accept", "application/vnd.github+json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"tag_name":"v4","html_url":"https://github.com/actions/checkout/releases/tag/v4",
                    "published_at":"2023-09-04T12:00:00Z","body":"notes","id":1}"#,
            )
            .create();

        let lookup = client(&server).latest_release("actions/checkout").unwrap();
        mock.assert();
        let ReleaseLookup::Found(release) = lookup else {
            panic!("expected a release");
        };
        assert_eq!(release.repository, "actions/checkout");
        assert_eq!(release.tag_name, "v4");
        assert_eq!(release.body.as_deref(), Some("notes"));
        assert!(release.published_at.is_some());
    }

    #[test]
    fn latest_release_missing_reports_status() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/repos/owner/no-releases/releases/latest")
            .with_status(404)
            .with_body(r#"{"message":"Not Found"}"#)
            .create();

        let lookup = client(&server).latest_release("owner/no-releases").unwrap();
        assert_eq!(lookup, ReleaseLookup::Missing { status: 404 });
    }

    #[test]
    fn latest_release_bad_json_is_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/repos/a/b/releases/latest")
            .with_status(200)
            .with_body("not json")
            .create();

        assert!(client(&server).latest_release("a/b").is_err());
    }

    #[test]
    fn list_workflow_paths_ok() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/repos/octo/app/actions/workflows")
            .with_status(200)
            .with_body(
                r#"{"total_count":2,"workflows":[
                    {"id":1,"path":".github/workflows/ci.yml"},
                    {"id":2,"path":".github/workflows/release.yaml"}]}"#,
            )
            .create();

        let paths = client(&server).list_workflow_paths("octo/app").unwrap();
        assert_eq!(
            paths,
            vec![".github/workflows/ci.yml", ".github/workflows/release.yaml"]
        );
    }

    #[test]
    fn list_workflow_paths_failure_is_fatal() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/repos/octo/app/actions/workflows")
            .with_status(500)
            .create();

        let err = client(&server).list_workflow_paths("octo/app").unwrap_err();
        assert!(matches!(
            err,
            UpdaterError::WorkflowListing { status: 500, .. }
        ));
    }

    #[test]
    fn create_pull_request_posts_body() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/repos/octo/app/pulls")
            .match_body(Matcher::PartialJsonString(
                r#"{"title":"Update","head":"gh-actions-update-1","base":"main"}"#.to_string(),
            ))
            .with_status(201)
            .with_body(r#"{"number":7,"html_url":"https://github.com/octo/app/pull/7"}"#)
            .create();

        let pr = client(&server)
            .create_pull_request(
                "octo/app",
                &NewPullRequest {
                    title: "Update".into(),
                    head: "gh-actions-update-1".into(),
                    base: "main".into(),
                    body: "### GitHub Actions Version Updates\n".into(),
                },
            )
            .unwrap();
        mock.assert();
        assert_eq!(pr.number, 7);
        assert_eq!(pr.html_url, "https://github.com/octo/app/pull/7");
    }

    #[test]
    fn create_pull_request_rejected() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/repos/octo/app/pulls")
            .with_status(422)
            .with_body(r#"{"message":"Validation Failed"}"#)
            .create();

        let err = client(&server)
            .create_pull_request(
                "octo/app",
                &NewPullRequest {
                    title: "t".into(),
                    head: "h".into(),
                    base: "b".into(),
                    body: String::new(),
                },
            )
            .unwrap_err();
        match err {
            UpdaterError::PullRequestFailed { status, body } => {
                assert_eq!(status, 422);
                assert!(body.contains("Validation Failed"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
