//! GitHub client implementation

use crate::error::ClientError;
use crate::service::{ClientResult, CredentialClient, not_authenticated, status_from_body};
use crate::types::{Identity, PermissionReport, Service};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Deserialize;
use tracing::debug;

/// Public GitHub API endpoint; anything else is treated as Enterprise
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Number of repositories requested by the permission probe
const PROBE_REPO_COUNT: u8 = 5;

/// Subset of `GET /user` we report on
#[derive(Deserialize)]
struct GitHubUser {
    login: String,
    id: u64,
    name: Option<String>,
    email: Option<String>,
    public_repos: Option<u64>,
    followers: Option<u64>,
}

impl From<GitHubUser> for Identity {
    fn from(user: GitHubUser) -> Self {
        let mut identity = Self::new(user.login, user.id.to_string())
            .with_display_name(user.name)
            .with_email(user.email);
        if let Some(repos) = user.public_repos {
            identity = identity.with_fact("Public Repos", repos);
        }
        if let Some(followers) = user.followers {
            identity = identity.with_fact("Followers", followers);
        }
        identity
    }
}

/// GitHub client using octocrab
pub struct GitHubClient {
    base_url: String,
    client: Option<Octocrab>,
}

impl GitHubClient {
    /// Create a client for the given API base URL
    ///
    /// No request is made until [`CredentialClient::authenticate`].
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: None,
        }
    }

    fn build(&self, token: &str) -> ClientResult<Octocrab> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        if self.base_url != GITHUB_API_URL {
            debug!(base_url = %self.base_url, "using GitHub Enterprise endpoint");
            builder = builder
                .base_uri(self.base_url.as_str())
                .map_err(|e| ClientError::other("InvalidBaseUrl", e.to_string()))?;
        }

        builder
            .build()
            .map_err(|e| ClientError::other("ClientBuildError", e.to_string()))
    }

    fn client(&self) -> ClientResult<&Octocrab> {
        self.client
            .as_ref()
            .ok_or_else(|| not_authenticated(Service::GitHub))
    }

    /// `GET /user`, keeping the status of non-JSON error bodies
    ///
    /// Proxies and SSO gateways in front of Enterprise servers answer with
    /// plain-text errors that octocrab's typed `get` cannot decode.
    async fn fetch_user(client: &Octocrab) -> ClientResult<Identity> {
        let response = client._get("/user").await?;
        let status = response.status();
        let body = client.body_to_string(response).await?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "GitHub rejected /user");
            return Err(status_from_body(
                status.as_u16(),
                status.canonical_reason(),
                &body,
            ));
        }

        let user: GitHubUser = serde_json::from_str(&body)
            .map_err(|e| ClientError::other("DecodeError", e.to_string()))?;
        Ok(user.into())
    }
}

#[async_trait]
impl CredentialClient for GitHubClient {
    fn service(&self) -> Service {
        Service::GitHub
    }

    async fn authenticate(&mut self, _handle: Option<&str>, secret: &str) -> ClientResult<Identity> {
        debug!("authenticating with GitHub");
        let client = self.build(secret)?;
        let identity = Self::fetch_user(&client).await?;
        self.client = Some(client);
        debug!(login = %identity.handle, "authenticated with GitHub");
        Ok(identity)
    }

    async fn get_identity(&self) -> ClientResult<Identity> {
        Self::fetch_user(self.client()?).await
    }

    async fn probe_read_permission(&self) -> ClientResult<PermissionReport> {
        let client = self.client()?;
        debug!("listing repositories");

        let repos = client
            .current()
            .list_repos_for_authenticated_user()
            .per_page(PROBE_REPO_COUNT)
            .send()
            .await?;
        debug!(count = repos.items.len(), "listed repositories");

        let mut report = PermissionReport {
            granted: vec!["Can read repositories (repo scope working)".to_string()],
            notes: Vec::new(),
        };

        // Rate limit info is optional
        match client.ratelimit().get().await {
            Ok(limits) => report.notes.push(format!(
                "API rate limit: {}/{} remaining",
                limits.rate.remaining, limits.rate.limit
            )),
            Err(e) => debug!(error = %e, "rate limit lookup failed"),
        }

        Ok(report)
    }
}
