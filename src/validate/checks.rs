//! Superficial credential format checks
//!
//! These only ever produce warnings; a credential with an unusual shape
//! still goes on to the connection phase.

use crate::config::CredentialConfig;
use crate::types::Service;

/// Tokens longer than this are assumed to be legacy/opaque formats
const OPAQUE_TOKEN_MIN_LEN: usize = 20;

const GITHUB_PREFIXES: &[&str] = &["ghp_", "github_pat_"];
const GITLAB_PREFIX: &str = "glpat-";
const BLUESKY_DEFAULT_SUFFIX: &str = ".bsky.social";

/// Non-fatal warnings about the shape of the configured credential
pub fn format_warnings(config: &CredentialConfig) -> Vec<String> {
    let secret = config.secret.as_ref().map(|s| s.expose()).unwrap_or_default();
    let opaque = secret.chars().count() > OPAQUE_TOKEN_MIN_LEN;

    match config.service {
        Service::GitHub => {
            if secret.starts_with(GITLAB_PREFIX) {
                vec![
                    "Token starts with 'glpat-' - this looks like a GitLab token, not a GitHub token! \
                     GitHub tokens typically start with 'ghp_' or 'github_pat_'."
                        .to_string(),
                ]
            } else if !(GITHUB_PREFIXES.iter().any(|p| secret.starts_with(p)) || opaque) {
                vec![
                    "Token format doesn't match typical GitHub token patterns. \
                     GitHub tokens usually start with 'ghp_' or 'github_pat_'."
                        .to_string(),
                ]
            } else {
                Vec::new()
            }
        }
        Service::GitLab => {
            if secret.starts_with("ghp_") {
                vec![
                    "Token starts with 'ghp_' - this looks like a GitHub token, not a GitLab token! \
                     GitLab tokens typically start with 'glpat-' or are alphanumeric strings."
                        .to_string(),
                ]
            } else if !(secret.starts_with(GITLAB_PREFIX) || opaque) {
                vec![
                    "Token format doesn't match typical GitLab token patterns. \
                     GitLab tokens usually start with 'glpat-' or are long alphanumeric strings."
                        .to_string(),
                ]
            } else {
                Vec::new()
            }
        }
        Service::Bluesky => match config.handle.as_deref() {
            Some(handle) if !handle.ends_with(BLUESKY_DEFAULT_SUFFIX) => vec![format!(
                "Handle doesn't end with '{BLUESKY_DEFAULT_SUFFIX}' - ensure it's correct"
            )],
            _ => Vec::new(),
        },
    }
}
