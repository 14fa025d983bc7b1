//! Client factory

use crate::config::CredentialConfig;
use crate::service::{BlueskyClient, ClientResult, CredentialClient, GitHubClient, GitLabClient};
use crate::types::Service;

/// Create the client matching the configured service
pub fn create_client(config: &CredentialConfig) -> ClientResult<Box<dyn CredentialClient>> {
    match config.service {
        Service::GitHub => Ok(Box::new(GitHubClient::new(&config.base_url))),
        Service::GitLab => Ok(Box::new(GitLabClient::new(&config.base_url)?)),
        Service::Bluesky => Ok(Box::new(BlueskyClient::new(&config.base_url)?)),
    }
}
