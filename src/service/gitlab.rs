//! GitLab client implementation

use crate::error::ClientError;
use crate::service::{
    ClientResult, CredentialClient, DEFAULT_TIMEOUT_SECS, USER_AGENT, join_url,
    not_authenticated, status_error,
};
use crate::types::{Identity, PermissionReport, Service};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Subset of `GET /user`
#[derive(Deserialize)]
struct GitLabUser {
    id: u64,
    username: String,
    name: Option<String>,
    email: Option<String>,
    public_email: Option<String>,
    state: Option<String>,
}

impl From<GitLabUser> for Identity {
    fn from(user: GitLabUser) -> Self {
        // `email` is only visible to admins and to the user themselves
        let email = user.email.or(user.public_email);
        let mut identity = Self::new(user.username, user.id.to_string())
            .with_display_name(user.name)
            .with_email(email);
        if let Some(state) = user.state {
            identity = identity.with_fact("State", state);
        }
        identity
    }
}

/// `GET /personal_access_tokens/self`
#[derive(Deserialize)]
struct TokenInfo {
    #[serde(default)]
    scopes: Vec<String>,
    expires_at: Option<String>,
}

/// GitLab client using reqwest
pub struct GitLabClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GitLabClient {
    /// Create a client for the given GitLab instance
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClientError::other("ClientBuildError", e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            token: None,
        })
    }

    fn api_url(&self, path: &str) -> String {
        join_url(&self.base_url, &format!("/api/v4{path}"))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> ClientResult<T> {
        let response = self
            .client
            .get(self.api_url(path))
            .header("PRIVATE-TOKEN", token)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(response.json().await?)
    }

    fn token(&self) -> ClientResult<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| not_authenticated(Service::GitLab))
    }
}

#[async_trait]
impl CredentialClient for GitLabClient {
    fn service(&self) -> Service {
        Service::GitLab
    }

    async fn authenticate(&mut self, _handle: Option<&str>, secret: &str) -> ClientResult<Identity> {
        debug!(base_url = %self.base_url, "authenticating with GitLab");
        let user: GitLabUser = self.get_json(secret, "/user", &[]).await?;
        self.token = Some(secret.to_string());
        debug!(username = %user.username, "authenticated with GitLab");
        Ok(user.into())
    }

    async fn get_identity(&self) -> ClientResult<Identity> {
        let user: GitLabUser = self.get_json(self.token()?, "/user", &[]).await?;
        Ok(user.into())
    }

    async fn probe_read_permission(&self) -> ClientResult<PermissionReport> {
        let token = self.token()?;
        debug!("listing owned projects");

        let projects: Vec<serde_json::Value> = self
            .get_json(token, "/projects", &[("owned", "true"), ("per_page", "1")])
            .await?;
        debug!(count = projects.len(), "listed owned projects");

        let mut report = PermissionReport {
            granted: vec!["Can read projects (read_api scope working)".to_string()],
            notes: Vec::new(),
        };

        // Older GitLab versions lack this endpoint; scopes are informational
        match self
            .get_json::<TokenInfo>(token, "/personal_access_tokens/self", &[])
            .await
        {
            Ok(info) => {
                if !info.scopes.is_empty() {
                    report
                        .notes
                        .push(format!("Token scopes: {}", info.scopes.join(", ")));
                }
                if let Some(expires) = info.expires_at {
                    report.notes.push(format!("Token expires: {expires}"));
                }
            }
            Err(e) => debug!(error = %e, "token introspection failed"),
        }

        Ok(report)
    }
}
