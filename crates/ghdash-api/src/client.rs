//! # API Client
//!
//! HTTP client for the GitHub REST API.

use std::fmt;

use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Credential;
use crate::error::{ApiError, ApiResult};
use crate::types::{
    Issue, PullRequest, RepositoryDetail, RepositorySummary, SearchResponse, UserProfile,
};

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Connection settings shared by every client handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Base URL of the REST API (GitHub Enterprise uses `https://host/api/v3`).
    pub api_url: String,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: concat!("ghdash/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Token-bound handle for GitHub API calls.
///
/// A handle without a token is valid but every operation fails with
/// [`ApiError::Uninitialized`] before touching the network. Handles are
/// never mutated: [`GitHubClient::with_token`] builds a new one. Cloning
/// is cheap and clones share the connection pool.
///
/// # Examples
///
/// ```rust,ignore
/// use ghdash_api::{ClientSettings, Credential, GitHubClient};
///
/// let client = GitHubClient::new(&ClientSettings::default(), Some(Credential::new("ghp_xxx")))?;
/// let repo = client.get_repository("facebook", "react").await?;
/// println!("{} has {} stars", repo.summary.full_name, repo.summary.stargazers_count);
/// ```
#[derive(Clone)]
pub struct GitHubClient {
    base_url: Url,
    http: Client,
    token: Option<Credential>,
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    /// Creates a client for `settings`, optionally bound to a token.
    ///
    /// No explicit request timeout is set; the transport default applies.
    ///
    /// # Errors
    ///
    /// * [`ApiError::InvalidConfig`] - The API URL cannot be parsed or has no path
    /// * [`ApiError::Network`] - The HTTP client could not be built
    pub fn new(settings: &ClientSettings, token: Option<Credential>) -> ApiResult<Self> {
        let base_url = Url::parse(&settings.api_url)
            .map_err(|e| ApiError::InvalidConfig(format!("{}: {e}", settings.api_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidConfig(format!(
                "{} cannot be used as a base URL",
                settings.api_url
            )));
        }

        let http = Client::builder().user_agent(&settings.user_agent).build()?;

        Ok(Self {
            base_url,
            http,
            token,
        })
    }

    /// Returns a new handle sharing this one's connection settings but bound
    /// to `token`.
    #[must_use]
    pub fn with_token(&self, token: Option<Credential>) -> Self {
        Self {
            base_url: self.base_url.clone(),
            http: self.http.clone(),
            token,
        }
    }

    /// Whether the handle carries a token.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.token.is_some()
    }

    /// The bound token, if any.
    #[must_use]
    pub fn credential(&self) -> Option<&Credential> {
        self.token.as_ref()
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidConfig(format!("{} has no path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issues an authenticated GET and decodes the JSON body.
    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> ApiResult<T> {
        let token = self.token.as_ref().ok_or(ApiError::Uninitialized)?;
        let url = self.endpoint(segments)?;

        tracing::debug!(url = %url, "GET");

        let mut request = self
            .http
            .get(url)
            .bearer_auth(token.expose())
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION);

        if !query.is_empty() {
            request = request.query(query);
        }

        let res = request.send().await?;
        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let err = ApiError::from_response(status, &body);
            tracing::debug!(status = status.as_u16(), error = %err, "GitHub request failed");
            return Err(err);
        }

        let body = res.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Fetches the profile of the token's owner.
    ///
    /// Used as the probe when a token is saved.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Uninitialized`] - No token is set
    /// * [`ApiError::Unauthorized`] - The token is invalid or expired
    /// * [`ApiError::Network`] - Network request failed
    pub async fn authenticated_user(&self) -> ApiResult<UserProfile> {
        self.get(&["user"], &[]).await
    }

    /// Searches repositories, in GitHub's ranking order.
    ///
    /// Only the first page of results is returned. A blank query returns
    /// an empty list without a request.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Uninitialized`] - No token is set, even for a blank query
    /// * [`ApiError::Remote`] - GitHub rejected the query (e.g. 422)
    /// * [`ApiError::Network`] - Network request failed
    pub async fn search_repositories(&self, query: &str) -> ApiResult<Vec<RepositorySummary>> {
        if !self.is_initialized() {
            return Err(ApiError::Uninitialized);
        }
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let res: SearchResponse = self
            .get(&["search", "repositories"], &[("q", query)])
            .await?;

        tracing::info!(query = %query, count = res.items.len(), "Searched repositories");
        Ok(res.items)
    }

    /// Retrieves a single repository by owner and name.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Uninitialized`] - No token is set
    /// * [`ApiError::NotFound`] - Repository missing or hidden from this token
    /// * [`ApiError::Forbidden`] - Access denied
    /// * [`ApiError::Network`] - Network request failed
    pub async fn get_repository(&self, owner: &str, name: &str) -> ApiResult<RepositoryDetail> {
        let repo: RepositoryDetail = self.get(&["repos", owner, name], &[]).await?;
        tracing::info!(owner = %owner, repo = %name, "Fetched repository");
        Ok(repo)
    }

    /// Lists open and closed issues, in GitHub's default order.
    ///
    /// Only the first page is returned.
    ///
    /// # Errors
    ///
    /// Same as [`GitHubClient::get_repository`].
    pub async fn list_issues(&self, owner: &str, name: &str) -> ApiResult<Vec<Issue>> {
        let issues: Vec<Issue> = self
            .get(&["repos", owner, name, "issues"], &[("state", "all")])
            .await?;
        tracing::info!(owner = %owner, repo = %name, count = issues.len(), "Listed issues");
        Ok(issues)
    }

    /// Lists open, closed and merged pull requests, in GitHub's default order.
    ///
    /// Only the first page is returned.
    ///
    /// # Errors
    ///
    /// Same as [`GitHubClient::get_repository`].
    pub async fn list_pull_requests(&self, owner: &str, name: &str) -> ApiResult<Vec<PullRequest>> {
        let pulls: Vec<PullRequest> = self
            .get(&["repos", owner, name, "pulls"], &[("state", "all")])
            .await?;
        tracing::info!(owner = %owner, repo = %name, count = pulls.len(), "Listed pull requests");
        Ok(pulls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(uri: &str) -> ClientSettings {
        ClientSettings {
            api_url: uri.to_string(),
            ..ClientSettings::default()
        }
    }

    #[test]
    fn test_client_creation_rejects_bad_url() {
        let result = GitHubClient::new(&settings("not a url"), None);
        assert!(matches!(result, Err(ApiError::InvalidConfig(_))));
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = GitHubClient::new(&settings("https://ghe.example.com/api/v3/"), None).unwrap();
        let url = client.endpoint(&["repos", "acme", "widget"]).unwrap();

        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/acme/widget"
        );
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = GitHubClient::new(&ClientSettings::default(), None).unwrap();
        let url = client.endpoint(&["repos", "a/b", "c d"]).unwrap();

        assert_eq!(url.as_str(), "https://api.github.com/repos/a%2Fb/c%20d");
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = GitHubClient::new(
            &ClientSettings::default(),
            Some(Credential::new("ghp_supersecretvalue1234")),
        )
        .unwrap();

        let debug = format!("{client:?}");
        assert!(!debug.contains("supersecret"));
    }

    #[test]
    fn test_with_token_builds_new_handle() {
        let base = GitHubClient::new(&ClientSettings::default(), None).unwrap();
        let bound = base.with_token(Some(Credential::new("ghp_token")));

        assert!(!base.is_initialized());
        assert!(bound.is_initialized());
        assert_eq!(bound.base_url(), base.base_url());
    }

    #[tokio::test]
    async fn test_sends_bearer_token_and_media_type() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("authorization", "Bearer ghp_token"))
            .and(header("accept", GITHUB_MEDIA_TYPE))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "id": 1, "login": "octocat" })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GitHubClient::new(
            &settings(&mock_server.uri()),
            Some(Credential::new("ghp_token")),
        )
        .unwrap();
        let user = client.authenticated_user().await.unwrap();

        assert_eq!(user.login, "octocat");
    }

    #[tokio::test]
    async fn test_list_issues_requests_all_states() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/issues"))
            .and(query_param("state", "all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GitHubClient::new(
            &settings(&mock_server.uri()),
            Some(Credential::new("ghp_token")),
        )
        .unwrap();

        assert!(client.list_issues("acme", "widget").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_body_is_invalid_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/widget"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&mock_server)
            .await;

        let client = GitHubClient::new(
            &settings(&mock_server.uri()),
            Some(Credential::new("ghp_token")),
        )
        .unwrap();

        let err = client.get_repository("acme", "widget").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_body_cut_short_is_network_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            // Promise more body than is sent, then hang up.
            let _ = socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 100\r\n\r\n{\"id\": 1",
                )
                .await;
            let _ = socket.shutdown().await;
        });

        let client = GitHubClient::new(
            &settings(&format!("http://{addr}")),
            Some(Credential::new("ghp_token")),
        )
        .unwrap();

        let err = client.get_repository("acme", "widget").await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
    }
}
