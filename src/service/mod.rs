//! Service clients for GitHub, GitLab and Bluesky
//!
//! Provides a unified capability interface so a single validator can check
//! credentials for any supported service.

mod bluesky;
mod factory;
mod github;
mod gitlab;

pub use bluesky::BlueskyClient;
pub use factory::create_client;
pub use github::GitHubClient;
pub use gitlab::GitLabClient;

use crate::error::ClientError;
use crate::types::{Identity, PermissionReport, Service};
use async_trait::async_trait;
use serde::Deserialize;

/// Result type for client calls
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Default request timeout in seconds
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent sent with raw HTTP requests
pub(crate) const USER_AGENT: &str = concat!("cred-check/", env!("CARGO_PKG_VERSION"));

/// Capability set needed to validate a credential
///
/// Each adapter wraps one third-party API. `authenticate` must be called
/// before the other operations.
#[async_trait]
pub trait CredentialClient: Send + Sync {
    /// Service this client talks to
    fn service(&self) -> Service;

    /// Log in with the credential and return the authenticated principal
    ///
    /// `handle` is only meaningful for services that log in with a
    /// handle/password pair (Bluesky).
    async fn authenticate(&mut self, handle: Option<&str>, secret: &str) -> ClientResult<Identity>;

    /// Re-read the authenticated principal's profile
    async fn get_identity(&self) -> ClientResult<Identity>;

    /// Perform low-risk read-only calls that need minimal scope
    async fn probe_read_permission(&self) -> ClientResult<PermissionReport>;
}

/// Error returned when an operation runs before `authenticate`
pub(crate) fn not_authenticated(service: Service) -> ClientError {
    ClientError::other(
        "NotAuthenticated",
        format!("{service} client used before authenticate"),
    )
}

/// Join a base URL and an absolute path without doubling slashes
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Error body shapes returned by GitLab and XRPC endpoints
#[derive(Deserialize, Default)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Turn a non-success response into a [`ClientError::Status`]
pub(crate) async fn status_error(response: reqwest::Response) -> ClientError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    status_from_body(status.as_u16(), status.canonical_reason(), &body)
}

/// Build a [`ClientError::Status`] from a raw error body
///
/// Prefers the service's own message over the raw body, and the raw body
/// over the canonical reason phrase.
pub(crate) fn status_from_body(status: u16, reason: Option<&str>, body: &str) -> ClientError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

    let message = parsed
        .message
        .or(parsed.error_description)
        .or(parsed.error)
        .filter(|m| !m.is_empty())
        .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
        .unwrap_or_else(|| reason.unwrap_or("unknown error").to_string());

    ClientError::Status { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_trims_trailing_slash() {
        assert_eq!(
            join_url("https://gitlab.example.com/", "/api/v4/user"),
            "https://gitlab.example.com/api/v4/user"
        );
        assert_eq!(
            join_url("https://bsky.social", "/xrpc/x"),
            "https://bsky.social/xrpc/x"
        );
    }

    #[test]
    fn test_status_from_body_prefers_service_message() {
        let err = status_from_body(403, Some("Forbidden"), r#"{"message": "Bad credentials"}"#);
        assert_eq!(
            err,
            ClientError::Status {
                status: 403,
                message: "Bad credentials".to_string()
            }
        );
    }

    #[test]
    fn test_status_from_body_plain_text_and_empty() {
        let err = status_from_body(401, Some("Unauthorized"), "Unauthorized by proxy\n");
        assert_eq!(
            err,
            ClientError::Status {
                status: 401,
                message: "Unauthorized by proxy".to_string()
            }
        );

        let err = status_from_body(502, Some("Bad Gateway"), "");
        assert_eq!(
            err,
            ClientError::Status {
                status: 502,
                message: "Bad Gateway".to_string()
            }
        );
    }
}
