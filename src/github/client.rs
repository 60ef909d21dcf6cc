//! GitHub REST API client

use anyhow::Result;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::event::RepoSlug;
use crate::github::error::GitHubError;

/// Files per page when listing pull request files.
pub const FILES_PER_PAGE: usize = 100;

/// Page limit for pull request files; the API stops listing at 3000 files.
pub const MAX_FILE_PAGES: usize = 30;

const API_VERSION: &str = "2022-11-28";

/// One entry of the pull request files listing
#[derive(Deserialize)]
struct PullRequestFile {
    filename: String,
}

/// Add-labels request body
#[derive(Serialize)]
struct AddLabelsRequest<'a> {
    labels: &'a [String],
}

/// Client for the handful of endpoints the action uses
pub struct GitHubClient {
    client: Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    /// Create a client for the given API root and token
    pub fn new(api_url: &str, token: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("pr-guard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GitHubError::NetworkError(e.to_string()))?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// List the paths of files changed by a pull request
    pub async fn list_pull_request_files(
        &self,
        repo: &RepoSlug,
        number: u64,
    ) -> Result<Vec<String>> {
        let mut files = Vec::new();

        for page in 1..=MAX_FILE_PAGES {
            let mut url = self.endpoint(&format!(
                "repos/{}/{}/pulls/{number}/files",
                repo.owner, repo.repo
            ))?;
            url.query_pairs_mut()
                .append_pair("per_page", &FILES_PER_PAGE.to_string())
                .append_pair("page", &page.to_string());

            debug!(%url, "Fetching pull request files");
            let response = self.send(self.client.get(url)).await?;
            let entries: Vec<PullRequestFile> = response
                .json()
                .await
                .map_err(|e| GitHubError::InvalidResponseFormat(e.to_string()))?;

            let count = entries.len();
            files.extend(entries.into_iter().map(|f| f.filename));
            if count < FILES_PER_PAGE {
                break;
            }
        }

        debug!(count = files.len(), "Fetched pull request files");
        Ok(files)
    }

    /// Add labels to an issue or pull request
    pub async fn add_labels(&self, repo: &RepoSlug, number: u64, labels: &[String]) -> Result<()> {
        let url = self.endpoint(&format!(
            "repos/{}/{}/issues/{number}/labels",
            repo.owner, repo.repo
        ))?;

        self.send(self.client.post(url).json(&AddLabelsRequest { labels }))
            .await?;
        info!("Labels added: {}", labels.join(", "));
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, GitHubError> {
        let raw = format!("{}/{path}", self.api_url);
        Url::parse(&raw).map_err(|e| GitHubError::InvalidUrl {
            url: raw,
            reason: e.to_string(),
        })
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, GitHubError> {
        let response = request
            .bearer_auth(&self.token)
            .header("accept", "application/vnd.github+json")
            .header("x-github-api-version", API_VERSION)
            .send()
            .await
            .map_err(|e| GitHubError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::ApiRequestFailed {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn slug() -> RepoSlug {
        RepoSlug {
            owner: "octo".to_string(),
            repo: "hello".to_string(),
        }
    }

    fn file_page(prefix: &str, count: usize) -> serde_json::Value {
        json!((0..count)
            .map(|i| json!({"filename": format!("{prefix}/{i}.rs"), "status": "modified"}))
            .collect::<Vec<_>>())
    }

    #[tokio::test]
    async fn lists_files_until_short_page() -> anyhow::Result<()> {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/pulls/7/files"))
            .and(query_param("per_page", "100"))
            .and(query_param("page", "1"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(file_page("a", 100)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/pulls/7/files"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(file_page("b", 2)))
            .expect(1)
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), "secret")?;
        let files = client.list_pull_request_files(&slug(), 7).await?;
        assert_eq!(files.len(), 102);
        assert_eq!(files[0], "a/0.rs");
        assert_eq!(files[101], "b/1.rs");
        Ok(())
    }

    #[tokio::test]
    async fn stops_at_page_limit() -> anyhow::Result<()> {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/pulls/1/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(file_page("x", 100)))
            .expect(MAX_FILE_PAGES as u64)
            .mount(&server)
            .await;

        let client = GitHubClient::new(&format!("{}/", server.uri()), "t")?;
        let files = client.list_pull_request_files(&slug(), 1).await?;
        assert_eq!(files.len(), MAX_FILE_PAGES * FILES_PER_PAGE);
        Ok(())
    }

    #[tokio::test]
    async fn reports_api_failures() -> anyhow::Result<()> {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), "t")?;
        let err = client.list_pull_request_files(&slug(), 9).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GitHubError>(),
            Some(GitHubError::ApiRequestFailed { status: 404, .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn adds_labels() -> anyhow::Result<()> {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/repos/octo/hello/issues/7/labels"))
            .and(header("accept", "application/vnd.github+json"))
            .and(body_json(json!({"labels": ["ci", "docs"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), "t")?;
        client
            .add_labels(&slug(), 7, &["ci".to_string(), "docs".to_string()])
            .await?;
        Ok(())
    }

    #[test]
    fn rejects_bad_api_url() -> anyhow::Result<()> {
        let client = GitHubClient::new("not a url", "t")?;
        assert!(matches!(
            client.endpoint("repos/a/b"),
            Err(GitHubError::InvalidUrl { .. })
        ));
        Ok(())
    }
}
